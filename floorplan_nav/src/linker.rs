// Door-to-space attachment.
//
// A door belongs to every space on its floor whose outline (outer ring or
// any hole ring) passes within the outline tolerance of the door point.
// Doors between two rooms end up with two spaces; doors on the building
// shell with one. More than two means the floor plan has stacked or
// mis-drawn walls: that is logged and reported, never fatal.
//
// Runs after conflict resolution, against final footprints.
//
// See also: `geometry.rs` (`Footprint::is_on_outline`), `synth.rs` which
// consumes each space's door list.

use crate::graph::NavGraph;
use crate::space::{Door, Space};
use crate::types::DoorId;
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OverLinkedDoor {
    pub door: DoorId,
    /// Number of spaces the door ended up attached to.
    pub spaces: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkReport {
    /// Door/space attachments made.
    pub links: usize,
    pub over_linked: Vec<OverLinkedDoor>,
    /// Doors attached to nothing.
    pub orphaned: Vec<DoorId>,
}

pub fn link_doors(
    spaces: &mut [Space],
    doors: &mut [Door],
    graph: &mut NavGraph,
    tolerance: f64,
) -> LinkReport {
    let mut report = LinkReport::default();
    for space in spaces.iter_mut() {
        for door in doors.iter_mut() {
            if door.level != space.level
                || !space.footprint().is_on_outline(door.point, tolerance)
            {
                continue;
            }
            door.rooms.push(space.id);
            space.doors.push(door.id);
            graph.attach_room(door.vertex, &space.name);
            report.links += 1;
            if door.rooms.len() > 2 {
                warn!(
                    door = ?door.id,
                    point = %door.point,
                    level = door.level,
                    spaces = door.rooms.len(),
                    "door attached to more than two spaces"
                );
            }
        }
    }
    for door in doors.iter() {
        if door.rooms.len() > 2 {
            report.over_linked.push(OverLinkedDoor {
                door: door.id,
                spaces: door.rooms.len(),
            });
        } else if door.rooms.is_empty() {
            report.orphaned.push(door.id);
        }
    }
    report
}
