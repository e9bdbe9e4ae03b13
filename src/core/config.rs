//! Configuration for map-view construction
//!
//! Options can be built in code or loaded from JSON. Every field has a
//! default, so a partial document only overrides what it names.

use crate::{
    core::constants::{DEFAULT_ZOOM, OSM_ATTRIBUTION, OSM_SUBDOMAINS, OSM_TILE_TEMPLATE},
    MapError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewOptions {
    /// Zoom the engine is constructed with, before min/max clamping
    pub default_zoom: f64,
    /// Base tile layer added at construction
    pub tile_layer: TileLayerOptions,
}

impl Default for MapViewOptions {
    fn default() -> Self {
        Self {
            default_zoom: DEFAULT_ZOOM,
            tile_layer: TileLayerOptions::default(),
        }
    }
}

impl MapViewOptions {
    /// Parses options from a JSON document and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json).map_err(MapError::from)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.default_zoom.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "default_zoom must be a finite number, got {}",
                self.default_zoom
            ))
            .into());
        }
        self.tile_layer.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g., "https://{s}.tile.osm.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Attribution text
    pub attribution: String,
    /// Available subdomains for `{s}`
    pub subdomains: Vec<String>,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_TEMPLATE.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            subdomains: OSM_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TileLayerOptions {
    pub fn validate(&self) -> Result<()> {
        if self.url_template.trim().is_empty() {
            return Err(MapError::InvalidConfig("tile url_template is empty".to_string()).into());
        }
        if self.url_template.contains("{s}") && self.subdomains.is_empty() {
            return Err(MapError::InvalidConfig(
                "tile url_template uses {s} but no subdomains are configured".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MapViewOptions::default();
        assert_eq!(options.default_zoom, 16.0);
        assert_eq!(options.tile_layer.url_template, OSM_TILE_TEMPLATE);
        assert!(options.tile_layer.attribution.contains("OpenStreetMap"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options = MapViewOptions::from_json_str(r#"{ "default_zoom": 12 }"#).unwrap();
        assert_eq!(options.default_zoom, 12.0);
        assert_eq!(options.tile_layer, TileLayerOptions::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(MapViewOptions::from_json_str("{ not json").is_err());
    }

    #[test]
    fn test_validation_rejects_empty_template() {
        let json = r#"{ "tile_layer": { "url_template": "  " } }"#;
        let err = MapViewOptions::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("url_template"));
    }

    #[test]
    fn test_validation_rejects_missing_subdomains() {
        let options = MapViewOptions {
            tile_layer: TileLayerOptions {
                subdomains: Vec::new(),
                ..TileLayerOptions::default()
            },
            ..MapViewOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
