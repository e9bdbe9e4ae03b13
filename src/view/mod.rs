pub mod callback;
pub mod effect;
pub mod map_ref;
pub mod map_view;
pub mod marker;

// Re-export the essential types
pub use callback::Callback;
pub use effect::{Cleanup, Effect};
pub use map_ref::MapRef;
pub use map_view::{MapHost, MapViewHandle, MapViewProps, MapViewRef, RegionCallback};
pub use marker::{ImageSource, MarkerAdapter, MarkerProps};
