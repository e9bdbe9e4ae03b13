//! Prelude module for common maplet-view types and traits
//!
//! This module re-exports the most commonly used types and traits for easy
//! importing with `use maplet_view::prelude::*;`

pub use crate::core::{
    config::{MapViewOptions, TileLayerOptions},
    convert::ZoomRange,
    geo::{LatLng, LatLngBounds, Point},
    region::{Boundaries, Camera, Coordinate, Region},
};

pub use crate::engine::{
    EngineMap, EngineMarker, Evented, Icon, MapEngine, MapOptions, MarkerOptions, TileLayerSpec,
};

pub use crate::input::{
    EventAction, EventKind, Listener, ListenerId, MarkerPressEvent, NativeEvent, PanDragEvent,
    RegionChangeDetails,
};

pub use crate::view::{
    Callback, ImageSource, MapHost, MapRef, MapViewHandle, MapViewProps, MapViewRef,
    MarkerAdapter, MarkerProps,
};

pub use crate::{Error as MapError, Result};

pub use std::rc::Rc;

pub use fxhash::FxHashMap as HashMap;
