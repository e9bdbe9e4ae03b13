//! Interface of the imperative map engine
//!
//! The adapter only ever talks to an engine through these traits. Engine
//! objects are handles: every method takes `&self`, and implementations keep
//! their mutable state behind interior mutability so that listeners can call
//! back into the object that is emitting.

pub mod headless;

use crate::{
    core::geo::{LatLng, LatLngBounds, Point},
    input::{EventKind, Listener, ListenerId},
    Result,
};

/// Objects that emit engine events
pub trait Evented {
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Removing an unknown or already removed listener is a no-op.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// A live map instance
pub trait EngineMap: Evented {
    type Marker: EngineMarker + 'static;

    fn pan_to(&self, center: LatLng);
    fn set_zoom(&self, zoom: f64);
    fn zoom(&self) -> f64;
    fn center(&self) -> LatLng;
    fn bounds(&self) -> LatLngBounds;

    /// Destroys the map. Further calls on it are ignored.
    fn remove(&self);

    /// Creates a marker and adds it to this map.
    fn add_marker(&self, position: LatLng, options: MarkerOptions) -> Self::Marker;
}

/// A marker object owned by a map
pub trait EngineMarker: Evented {
    fn set_opacity(&self, opacity: f64);
    fn set_icon(&self, icon: Icon);
    fn set_lat_lng(&self, position: LatLng);

    /// Removes the marker from its map. Idempotent.
    fn remove(&self);
}

/// Factory for map instances
pub trait MapEngine {
    /// Rendering surface a map is mounted into
    type Container;
    type Map: EngineMap + 'static;

    fn create_map(&self, container: &Self::Container, options: MapOptions) -> Result<Self::Map>;
}

/// Tile layer added at construction time
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayerSpec {
    pub url_template: String,
    pub attribution: String,
    pub subdomains: Vec<String>,
}

/// Map construction options
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub layers: Vec<TileLayerSpec>,
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

/// Custom marker image
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub url: String,
    pub retina_url: String,
    /// Explicit size; the engine default is used when absent
    pub size: Option<Point>,
    /// Hot-spot inside the image; the engine default is used when absent
    pub anchor: Option<Point>,
}

/// Marker construction options
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerOptions {
    pub title: String,
    pub opacity: Option<f64>,
    /// Custom icon; the engine's default glyph is used when absent
    pub icon: Option<Icon>,
}
