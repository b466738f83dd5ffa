// Coordinate frames and the flat-earth normalizer.
//
// Input geometry arrives either in geodetic degrees (`(x, y) = (lon, lat)`,
// GeoJSON order) or already in planar meters. The whole pipeline runs in
// the input frame; physical tolerances from `NavConfig` are converted into
// that frame exactly once through `CoordinateFrame::meters_to_units`. After
// pruning, a geodetic building is rewritten into local meters relative to
// the frame's origin (`GeoOrigin::normalize`): `x` = meters east, `y` =
// meters north, no sign flip. Vertices, path polylines, space footprints and
// door points all go through this one function.
//
// Flat-earth approximation: one degree of latitude is a fixed 111 320 m, one
// degree of longitude is the equatorial circumference scaled by the cosine
// of the origin latitude. Good to centimeters over a single building.
//
// See also: `graph.rs` (`NavGraph::normalize_coordinates`), `config.rs`
// (`NavConfig::resolve`, the only caller of `meters_to_units`).

use crate::types::Point2;
use serde::{Deserialize, Serialize};

pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_000.0;

/// Reference point for local meter offsets.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoOrigin {
    pub lat: f64,
    pub lon: f64,
}

impl GeoOrigin {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn meters_per_degree_lon(&self) -> f64 {
        EARTH_CIRCUMFERENCE_M * self.lat.to_radians().cos() / 360.0
    }

    /// Degree offsets to meter offsets: returns `(east, north)`.
    pub fn latlon_to_meters(&self, dlat: f64, dlon: f64) -> (f64, f64) {
        (
            dlon * self.meters_per_degree_lon(),
            dlat * METERS_PER_DEGREE_LAT,
        )
    }

    /// Meter offsets to degree offsets: returns `(dlat, dlon)`.
    pub fn meters_to_latlon(&self, east: f64, north: f64) -> (f64, f64) {
        (
            north / METERS_PER_DEGREE_LAT,
            east / self.meters_per_degree_lon(),
        )
    }

    /// `(lon, lat)` point to `(east, north)` meters relative to this origin.
    pub fn normalize(&self, point: Point2) -> Point2 {
        let (east, north) = self.latlon_to_meters(point.y - self.lat, point.x - self.lon);
        Point2::new(east, north)
    }

    /// Inverse of `normalize`.
    pub fn denormalize(&self, local: Point2) -> Point2 {
        let (dlat, dlon) = self.meters_to_latlon(local.x, local.y);
        Point2::new(self.lon + dlon, self.lat + dlat)
    }
}

/// Which planar frame the input geometry is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoordinateFrame {
    /// Lon/lat degrees; normalized to meters around `origin` after pruning.
    Geodetic { origin: GeoOrigin },
    /// Already meters. Normalization is a no-op.
    #[default]
    Planar,
}

impl CoordinateFrame {
    /// Convert a physical length into this frame's working units.
    ///
    /// Geodetic frames use the latitude scale on both axes, so east-west
    /// tolerances come out slightly tighter than configured (by
    /// `cos(origin_lat)`).
    pub fn meters_to_units(&self, meters: f64) -> f64 {
        match self {
            CoordinateFrame::Geodetic { .. } => meters / METERS_PER_DEGREE_LAT,
            CoordinateFrame::Planar => meters,
        }
    }

    pub fn origin(&self) -> Option<GeoOrigin> {
        match self {
            CoordinateFrame::Geodetic { origin } => Some(*origin),
            CoordinateFrame::Planar => None,
        }
    }
}
