// Data-driven engine configuration.
//
// Every physical constant the engine uses lives in `NavConfig`, expressed in
// meters and loaded from JSON. `NavConfig::resolve()` is the single point
// where those lengths are converted into the building's working units (see
// `CoordinateFrame::meters_to_units`); everything downstream reads
// `ResolvedParams` and never sees a raw meter value or a magic number.
//
// All fields default, so a partial JSON object (or `{}`) is a valid config.
//
// See also: `building.rs` which owns a `NavConfig` per building,
// `projection.rs` for the coordinate frames.
//
// **Critical constraint: determinism.** Config values, together with the
// input features, fully determine the output graph. The simplifier seed is a
// config value; nothing reads OS entropy.

use crate::error::NavError;
use crate::projection::CoordinateFrame;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Frame of the input coordinates.
    pub frame: CoordinateFrame,
    /// Walkability lattice spacing.
    pub grid_step_m: f64,
    /// Wall thickness. Used as the door-on-outline tolerance and as the
    /// sliver width the conflict resolver erodes away.
    pub wall_thickness_m: f64,
    /// Wall distance beyond which A* stops penalizing a step. At zero
    /// distance a step costs twice its length.
    pub wall_comfort_distance_m: f64,
    /// Minimum wall distance the path simplifier keeps for surviving points
    /// and shortcut segments.
    pub path_clearance_m: f64,
    /// Sub-points checked for walkability along a candidate shortcut.
    pub walk_check_samples: usize,
    /// Sub-points checked for wall clearance along a candidate shortcut.
    pub clearance_check_samples: usize,
    /// Seed for the simplifier's pass order.
    pub simplify_seed: u64,
    /// Emit one edge per unordered vertex pair in the interchange output.
    pub export_bidirectional: bool,
    /// Run per-space path synthesis on the rayon pool.
    pub parallel: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            frame: CoordinateFrame::Planar,
            grid_step_m: 0.5,
            wall_thickness_m: 0.3,
            wall_comfort_distance_m: 1.1,
            path_clearance_m: 0.5,
            walk_check_samples: 30,
            clearance_check_samples: 10,
            simplify_seed: 0,
            export_bidirectional: true,
            parallel: true,
        }
    }
}

/// `NavConfig` lengths converted into the building's working units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedParams {
    pub grid_step: f64,
    /// Max distance from a wall segment for a door to count as on it.
    pub outline_tolerance: f64,
    /// Erode/dilate distance for conflict-resolution cleanup.
    pub sliver_width: f64,
    /// Ring-cleanup tolerance applied when spaces are constructed.
    pub ring_tolerance: f64,
    /// `K` in the A* step penalty `2 - min(1, wall_distance * K)`.
    pub comfort_scale: f64,
    pub path_clearance: f64,
    /// Triangle area under which three path points count as collinear.
    pub collinear_epsilon: f64,
    pub walk_check_samples: usize,
    pub clearance_check_samples: usize,
    pub simplify_seed: u64,
}

impl NavConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, NavError> {
        let config: NavConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NavError> {
        let lengths = [
            ("grid_step_m", self.grid_step_m),
            ("wall_thickness_m", self.wall_thickness_m),
            ("wall_comfort_distance_m", self.wall_comfort_distance_m),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(NavError::InvalidConfig(format!(
                    "{name} must be a positive finite length, got {value}"
                )));
            }
        }
        if !self.path_clearance_m.is_finite() || self.path_clearance_m < 0.0 {
            return Err(NavError::InvalidConfig(format!(
                "path_clearance_m must be finite and non-negative, got {}",
                self.path_clearance_m
            )));
        }
        if self.walk_check_samples == 0 || self.clearance_check_samples == 0 {
            return Err(NavError::InvalidConfig(
                "sample counts must be at least 1".to_string(),
            ));
        }
        if let Some(origin) = self.frame.origin() {
            if !(-90.0..=90.0).contains(&origin.lat) || !origin.lon.is_finite() {
                return Err(NavError::InvalidConfig(format!(
                    "geodetic origin out of range: ({}, {})",
                    origin.lat, origin.lon
                )));
            }
        }
        Ok(())
    }

    pub fn resolve(&self) -> ResolvedParams {
        let units = |m: f64| self.frame.meters_to_units(m);
        let grid_step = units(self.grid_step_m);
        let wall = units(self.wall_thickness_m);
        ResolvedParams {
            grid_step,
            outline_tolerance: wall,
            sliver_width: wall,
            ring_tolerance: wall,
            comfort_scale: 1.0 / units(self.wall_comfort_distance_m),
            path_clearance: units(self.path_clearance_m),
            collinear_epsilon: 1e-6 * grid_step * grid_step,
            walk_check_samples: self.walk_check_samples,
            clearance_check_samples: self.clearance_check_samples,
            simplify_seed: self.simplify_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{GeoOrigin, METERS_PER_DEGREE_LAT};

    #[test]
    fn default_config_serializes() {
        let config = NavConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored: NavConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn config_loads_from_json_string() {
        let json = r#"{
            "frame": { "kind": "geodetic", "origin": { "lat": 50.80977, "lon": 8.81048 } },
            "grid_step_m": 1.0,
            "wall_thickness_m": 0.25,
            "simplify_seed": 42,
            "parallel": false
        }"#;
        let config = NavConfig::from_json_str(json).unwrap();
        assert_eq!(config.grid_step_m, 1.0);
        assert_eq!(config.wall_thickness_m, 0.25);
        assert_eq!(config.simplify_seed, 42);
        assert!(!config.parallel);
        // Unlisted fields take defaults.
        assert_eq!(config.walk_check_samples, 30);
        assert_eq!(
            config.frame.origin(),
            Some(GeoOrigin::new(50.80977, 8.81048))
        );
    }

    #[test]
    fn empty_object_is_default() {
        let config = NavConfig::from_json_str("{}").unwrap();
        assert_eq!(config, NavConfig::default());
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = NavConfig::from_json_str(r#"{ "grid_step_m": 0.0 }"#).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig(_)));
        let err = NavConfig::from_json_str(r#"{ "walk_check_samples": 0 }"#).unwrap_err();
        assert!(matches!(err, NavError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = NavConfig::from_json_str(r#"{ "grid_step_m": "wide" }"#).unwrap_err();
        assert!(matches!(err, NavError::Json(_)));
    }

    #[test]
    fn planar_resolve_is_identity_on_lengths() {
        let params = NavConfig::default().resolve();
        assert_eq!(params.grid_step, 0.5);
        assert_eq!(params.outline_tolerance, 0.3);
        assert_eq!(params.sliver_width, 0.3);
        assert!((params.comfort_scale - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn geodetic_resolve_converts_to_degrees() {
        let config = NavConfig {
            frame: CoordinateFrame::Geodetic {
                origin: GeoOrigin::new(50.0, 8.0),
            },
            ..NavConfig::default()
        };
        let params = config.resolve();
        assert!((params.outline_tolerance - 0.3 / METERS_PER_DEGREE_LAT).abs() < 1e-15);
        assert!((params.comfort_scale - METERS_PER_DEGREE_LAT / 1.1).abs() < 1e-6);
    }
}
