//! Value types of the declarative map-view API
//!
//! These mirror the shapes callers of the declarative layer work with. They
//! are converted to and from engine types at the boundary and never mutated
//! in place.

use serde::{Deserialize, Serialize};

/// Geographic coordinate as seen by the declarative layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Viewport descriptor: a center plus a span
///
/// Only the center is meaningful to a 2D engine. The deltas are carried for
/// interface compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Region centered on `center` with zero span, the shape region-change
    /// callbacks report.
    pub fn from_center(center: Coordinate) -> Self {
        Self::new(center.latitude, center.longitude, 0.0, 0.0)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Visible area snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundaries {
    pub north_east: Coordinate,
    pub south_west: Coordinate,
}

/// Camera state
///
/// `heading`, `pitch` and `altitude` are always zero: the engine is 2D-only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub center: Coordinate,
    pub heading: f64,
    pub pitch: f64,
    pub zoom: f64,
    pub altitude: f64,
}

impl Camera {
    pub fn flat(center: Coordinate, zoom: f64) -> Self {
        Self {
            center,
            heading: 0.0,
            pitch: 0.0,
            zoom,
            altitude: 0.0,
        }
    }
}
