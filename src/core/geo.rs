use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Engine-native geographical coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Projects to world pixel coordinates at the given zoom (256px tiles)
    pub fn project(&self, zoom: f64) -> Point {
        let scale = crate::core::constants::TILE_SIZE as f64 * 2_f64.powf(zoom);
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let y = (PI / 4.0 + Self::clamp_lat(self.lat).to_radians() / 2.0)
            .tan()
            .ln()
            * EARTH_RADIUS;
        let extent = 2.0 * PI * EARTH_RADIUS;

        Point::new(
            (x + PI * EARTH_RADIUS) / extent * scale,
            (-y + PI * EARTH_RADIUS) / extent * scale,
        )
    }

    /// Inverse of [`LatLng::project`]
    pub fn unproject(point: &Point, zoom: f64) -> Self {
        let scale = crate::core::constants::TILE_SIZE as f64 * 2_f64.powf(zoom);
        let extent = 2.0 * PI * EARTH_RADIUS;
        let x = point.x / scale * extent - PI * EARTH_RADIUS;
        let y = PI * EARTH_RADIUS - point.y / scale * extent;

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    pub fn north_east(&self) -> LatLng {
        self.north_east
    }

    pub fn south_west(&self) -> LatLng {
        self.south_west
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
    }

    #[test]
    fn test_projection_inverts() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let pixel = nyc.project(10.0);
        let back = LatLng::unproject(&pixel, 10.0);

        assert!((back.lat - nyc.lat).abs() < 1e-9);
        assert!((back.lng - nyc.lng).abs() < 1e-9);
    }

    #[test]
    fn test_origin_projects_to_world_center() {
        let pixel = LatLng::new(0.0, 0.0).project(0.0);
        assert!((pixel.x - 128.0).abs() < 1e-9);
        assert!((pixel.y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);
        let point_inside = LatLng::new(40.5, -74.0);
        let point_outside = LatLng::new(42.0, -74.0);

        assert!(bounds.contains(&point_inside));
        assert!(!bounds.contains(&point_outside));
        assert_eq!(bounds.center(), LatLng::new(40.5, -74.0));
    }
}
