// Rooms, stairs, and doors.
//
// A `Space` is any walkable polygon on one floor. Rooms and stairs share
// everything (footprint, doors, path synthesis) and differ only in the
// stair-specific data carried by `SpaceKind::Stair`: an anchor vertex at the
// stair's bounding-box center and the links to the stair directly above and
// below, filled in by `stairs.rs`.
//
// Doors are points with a graph vertex of their own. Which spaces a door
// belongs to is decided later by `linker.rs`, after conflict resolution has
// settled every footprint.
//
// Constructors come in two flavours: from plain data (`Space::room`,
// `Space::stair`, `Door::new`) and from classified input features
// (`*_from_feature`). The feature constructors check the door/stair tag and
// fail with `InvalidDoor` / `InvalidStair` on mismatch.
//
// See also: `feature.rs` (classification), `resolve.rs` (rewrites
// footprints), `building.rs` (owns the `Vec<Space>` / `Vec<Door>`).

use crate::error::NavError;
use crate::feature::{self, Feature};
use crate::geometry::{BoundingBox, Footprint, open_ring, simplify_ring};
use crate::graph::{NavGraph, Position};
use crate::types::{DoorId, Level, Point2, SpaceId, VertexId};

pub const DOOR_LABEL: &str = "Door";

/// Stair-only state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StairLinks {
    pub anchor: VertexId,
    pub above: Option<SpaceId>,
    pub below: Option<SpaceId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpaceKind {
    Room,
    Stair(StairLinks),
}

#[derive(Clone, Debug)]
pub struct Space {
    pub id: SpaceId,
    pub level: Level,
    pub name: String,
    footprint: Footprint,
    pub doors: Vec<DoorId>,
    pub kind: SpaceKind,
}

impl Space {
    /// Room from plain data. The outer ring is cleaned with
    /// `simplify_ring(ring_tolerance)`.
    pub fn room(
        id: SpaceId,
        level: Level,
        name: &str,
        outer: Vec<Point2>,
        holes: Vec<Vec<Point2>>,
        ring_tolerance: f64,
    ) -> Result<Self, NavError> {
        let footprint = clean_footprint(name, level, outer, holes, ring_tolerance)?;
        Ok(Self {
            id,
            level,
            name: name.to_string(),
            footprint,
            doors: Vec::new(),
            kind: SpaceKind::Room,
        })
    }

    /// Stair from plain data. Inserts its anchor vertex into `graph`.
    pub fn stair(
        id: SpaceId,
        level: Level,
        name: &str,
        outer: Vec<Point2>,
        holes: Vec<Vec<Point2>>,
        ring_tolerance: f64,
        graph: &mut NavGraph,
    ) -> Result<Self, NavError> {
        let footprint = clean_footprint(name, level, outer, holes, ring_tolerance)?;
        let anchor = graph.add_vertex(Position::new(footprint.bbox().center(), level), name);
        graph.attach_room(anchor, name);
        Ok(Self {
            id,
            level,
            name: name.to_string(),
            footprint,
            doors: Vec::new(),
            kind: SpaceKind::Stair(StairLinks {
                anchor,
                above: None,
                below: None,
            }),
        })
    }

    pub fn room_from_feature(
        id: SpaceId,
        feature: &Feature,
        ring_tolerance: f64,
    ) -> Result<Self, NavError> {
        let info = feature::classify(feature)?;
        let (outer, holes) = feature::rings_of(feature)?;
        Self::room(id, info.level, &info.name, outer, holes, ring_tolerance)
    }

    pub fn stair_from_feature(
        id: SpaceId,
        feature: &Feature,
        ring_tolerance: f64,
        graph: &mut NavGraph,
    ) -> Result<Self, NavError> {
        let info = feature::classify(feature)?;
        if info.stairs_tag.as_deref() != Some("yes") {
            return Err(NavError::InvalidStair {
                tag: info.stairs_tag,
            });
        }
        let (outer, holes) = feature::rings_of(feature)?;
        Self::stair(
            id,
            info.level,
            &info.name,
            outer,
            holes,
            ring_tolerance,
            graph,
        )
    }

    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    pub fn bbox(&self) -> &BoundingBox {
        self.footprint.bbox()
    }

    pub fn area(&self) -> f64 {
        self.footprint.area()
    }

    /// Replace the footprint (conflict resolution).
    pub fn set_footprint(&mut self, footprint: Footprint) {
        self.footprint = footprint;
    }

    pub fn is_stair(&self) -> bool {
        matches!(self.kind, SpaceKind::Stair(_))
    }

    pub fn stair_links(&self) -> Option<&StairLinks> {
        match &self.kind {
            SpaceKind::Stair(links) => Some(links),
            SpaceKind::Room => None,
        }
    }

    pub fn stair_links_mut(&mut self) -> Option<&mut StairLinks> {
        match &mut self.kind {
            SpaceKind::Stair(links) => Some(links),
            SpaceKind::Room => None,
        }
    }
}

fn clean_footprint(
    name: &str,
    level: Level,
    outer: Vec<Point2>,
    holes: Vec<Vec<Point2>>,
    ring_tolerance: f64,
) -> Result<Footprint, NavError> {
    let outer = open_ring(outer);
    if outer.len() < 3 {
        return Err(NavError::DegenerateGeometry {
            name: name.to_string(),
            level,
            points: outer.len(),
        });
    }
    let outer = simplify_ring(&outer, ring_tolerance);
    Ok(Footprint::new(outer, holes))
}

#[derive(Clone, Debug)]
pub struct Door {
    pub id: DoorId,
    pub level: Level,
    pub point: Point2,
    pub vertex: VertexId,
    /// Spaces whose outline this door sits on. Normally one or two.
    pub rooms: Vec<SpaceId>,
}

impl Door {
    pub fn new(id: DoorId, level: Level, point: Point2, graph: &mut NavGraph) -> Self {
        let vertex = graph.add_vertex(Position::new(point, level), DOOR_LABEL);
        Self {
            id,
            level,
            point,
            vertex,
            rooms: Vec::new(),
        }
    }

    pub fn from_feature(
        id: DoorId,
        feature: &Feature,
        graph: &mut NavGraph,
    ) -> Result<Self, NavError> {
        let info = feature::classify(feature)?;
        if info.door_tag.as_deref() != Some("yes") {
            return Err(NavError::InvalidDoor { tag: info.door_tag });
        }
        let point = feature::point_of(feature)?;
        Ok(Self::new(id, info.level, point, graph))
    }
}
