// Core types shared across the engine.
//
// Planar points (`Point2`), floor levels, and the compact integer ids used
// for vertices, spaces (rooms and stairs), and doors. Ids are sequential
// `u32` newtypes handed out in insertion order; `SpaceId`/`DoorId` double
// as indices into the building's `Vec<Space>` / `Vec<Door>`.
//
// Points are in whatever planar frame the building is in: (lon, lat)
// degrees for geodetic input, meters for planar input, and meters
// (east, north) once the graph has been normalized. See `projection.rs`.
//
// **Critical constraint: determinism.** Ids are never reused and never
// derived from hashing. All ordered collections key on these ids.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// Floor index. Stairs connect `level` to `level + 1`.
pub type Level = i32;

/// A point in the building's planar frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at parameter `t` along the segment `self -> other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Stable surrogate key for a graph vertex. Survives coordinate
/// normalization; positions are looked up through a separate index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Index of a room or stair in `Building::spaces`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SpaceId(pub u32);

/// Index of a door in `Building::doors`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorId(pub u32);

impl SpaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl DoorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
