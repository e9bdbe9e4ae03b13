//! # maplet-view
//!
//! A declarative map view on top of an imperative map engine, in the style
//! of Leaflet.
//!
//! A [`MapHost`] owns one engine map and reconciles [`MapViewProps`] onto it
//! on every render: it pans on region changes, keeps engine event
//! subscriptions in step with the callbacks it was given, and manages keyed
//! [`MarkerAdapter`] children. Engines plug in through the traits in
//! [`engine`]; [`engine::headless`] ships an in-memory engine that records
//! every call it receives.

pub mod core;
pub mod engine;
pub mod input;
pub mod prelude;
pub mod view;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{MapViewOptions, TileLayerOptions},
    convert::ZoomRange,
    geo::{LatLng, LatLngBounds, Point},
    region::{Boundaries, Camera, Coordinate, Region},
};

pub use engine::{EngineMap, EngineMarker, Evented, MapEngine};

pub use input::{EventKind, MarkerPressEvent, NativeEvent, PanDragEvent, RegionChangeDetails};

pub use view::{
    Callback, ImageSource, MapHost, MapRef, MapViewHandle, MapViewProps, MapViewRef,
    MarkerAdapter, MarkerProps,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Construction error: {0}")]
    Construction(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = MapError;
