pub mod config;
pub mod constants;
pub mod convert;
pub mod geo;
pub mod region;

pub use config::{MapViewOptions, TileLayerOptions};
pub use convert::ZoomRange;
pub use geo::{LatLng, LatLngBounds, Point};
pub use region::{Boundaries, Camera, Coordinate, Region};
