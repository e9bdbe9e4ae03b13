//! Core constants derived from Leaflet defaults and the declarative map API.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom the engine starts at before min/max clamping.
pub const DEFAULT_ZOOM: f64 = 16.0;

/// Base tile layer URL template.
pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.osm.org/{z}/{x}/{y}.png";

/// Attribution shown for the base tile layer.
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"http://osm.org/copyright\">OpenStreetMap</a> contributors";

/// Tile server subdomains substituted for `{s}`.
pub const OSM_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

/// Opacity applied when a marker's opacity prop is absent or zero.
pub const DEFAULT_MARKER_OPACITY: f64 = 1.0;

/// Pixel size of the headless engine's container when none is given.
pub const DEFAULT_CONTAINER_SIZE: (f64, f64) = (800.0, 600.0);
