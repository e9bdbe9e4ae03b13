//! Conversions between declarative values and engine values, plus zoom
//! validation shared by construction and the camera handle.

use crate::core::{
    geo::{LatLng, LatLngBounds},
    region::{Boundaries, Coordinate},
};

/// A zoom value is usable when it is present and not NaN.
pub fn is_valid_zoom(zoom: Option<f64>) -> bool {
    matches!(zoom, Some(z) if !z.is_nan())
}

/// Optional `[min, max]` zoom constraint taken from the declarative props
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ZoomRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Lower bound, if it is a usable number
    pub fn valid_min(&self) -> Option<f64> {
        self.min.filter(|z| !z.is_nan())
    }

    /// Upper bound, if it is a usable number
    pub fn valid_max(&self) -> Option<f64> {
        self.max.filter(|z| !z.is_nan())
    }

    /// Clamps `zoom` into the range.
    ///
    /// The upper bound is checked first. Bounds that are absent or NaN do not
    /// constrain anything, and an inverted range never panics.
    pub fn clamp(&self, zoom: f64) -> f64 {
        match (self.valid_min(), self.valid_max()) {
            (_, Some(max)) if zoom > max => max,
            (Some(min), _) if zoom < min => min,
            _ => zoom,
        }
    }
}

impl From<Coordinate> for LatLng {
    fn from(coord: Coordinate) -> Self {
        LatLng::new(coord.latitude, coord.longitude)
    }
}

impl From<LatLng> for Coordinate {
    fn from(lat_lng: LatLng) -> Self {
        Coordinate::new(lat_lng.lat, lat_lng.lng)
    }
}

impl From<LatLngBounds> for Boundaries {
    fn from(bounds: LatLngBounds) -> Self {
        Boundaries {
            north_east: bounds.north_east().into(),
            south_west: bounds.south_west().into(),
        }
    }
}
