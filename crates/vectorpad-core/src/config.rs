//! Tunables for hit-testing, handle hotzones, curve fitting and snapping.

use crate::error::GeometryResult;
use serde::{Deserialize, Serialize};

/// Distance (device units) within which a point hits a thin shape's path.
pub const HIT_TOLERANCE: f64 = 3.0;
/// Side length of the square hotzone centred on each corner handle.
pub const HOTZONE_SIZE: f64 = 20.0;
/// Maximum distance between a raw freehand point and the fitted curve.
pub const FIT_TOLERANCE: f64 = 0.75;
/// Corner radius of the rounded-rectangle primitive.
pub const CORNER_RADIUS: f64 = 5.0;
/// Smallest width or height a corner drag may shrink a shape to.
pub const MIN_SHAPE_SIZE: f64 = 1.0;
/// Shapes thinner than this fall back to the start/end midpoint as rotation centre.
pub const DEGENERATE_EXTENT: f64 = 4.0;
/// Distance from a line endpoint that counts as grabbing that endpoint.
pub const ENDPOINT_GRAB_RADIUS: f64 = 10.0;
/// Grid size for snapped moves.
pub const GRID_SIZE: f64 = 20.0;

/// Geometry settings shared by the canvas and the behaviour engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub hit_tolerance: f64,
    pub hotzone_size: f64,
    pub fit_tolerance: f64,
    pub corner_radius: f64,
    pub min_shape_size: f64,
    pub endpoint_grab_radius: f64,
    pub grid_size: f64,
    /// Snap whole-picture moves to the grid.
    pub snap_to_grid: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: HIT_TOLERANCE,
            hotzone_size: HOTZONE_SIZE,
            fit_tolerance: FIT_TOLERANCE,
            corner_radius: CORNER_RADIUS,
            min_shape_size: MIN_SHAPE_SIZE,
            endpoint_grab_radius: ENDPOINT_GRAB_RADIUS,
            grid_size: GRID_SIZE,
            snap_to_grid: false,
        }
    }
}

impl GeometryConfig {
    /// Parse a JSON override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> GeometryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> GeometryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Half the hotzone side, i.e. the distance from a corner to its hotzone edge.
    pub fn hotzone_half(&self) -> f64 {
        self.hotzone_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeometryConfig::default();
        assert!((config.hit_tolerance - 3.0).abs() < f64::EPSILON);
        assert!((config.hotzone_size - 20.0).abs() < f64::EPSILON);
        assert!((config.fit_tolerance - 0.75).abs() < f64::EPSILON);
        assert!(!config.snap_to_grid);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GeometryConfig::from_json(r#"{ "snap_to_grid": true, "grid_size": 10.0 }"#).unwrap();
        assert!(config.snap_to_grid);
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert!((config.hotzone_size - HOTZONE_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_json() {
        assert!(GeometryConfig::from_json("{ not json").is_err());
    }
}
