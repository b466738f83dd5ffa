// Per-space path synthesis: one graph edge per reachable door pair.
//
// For a space with at least two doors this builds the space's `WalkGrid`
// once, then for every unordered door pair `(i, j)`, `i < j`:
//
//   - snap each door to its nearest walkable cell;
//   - run wall-averse A* between the two cells;
//   - weight = grid path length + the two door-to-cell offsets;
//   - drop the path's end cells (the door vertices stand in for them) and
//     simplify what is left into the edge polyline.
//
// An unreachable pair produces no edge and is counted in `missing`.
//
// This is a pure function of the space, its door anchors and the resolved
// parameters. It never touches the graph; `building.rs` runs it for all
// spaces (on rayon when enabled) and then inserts the returned edges from a
// single thread, in space order.
//
// See also: `grid.rs`, `astar.rs`, `simplify.rs`.

use crate::astar::{find_path, path_length};
use crate::config::ResolvedParams;
use crate::graph::NavigationPath;
use crate::grid::WalkGrid;
use crate::prng::PassRng;
use crate::simplify::PathSimplifier;
use crate::space::Space;
use crate::types::{DoorId, Point2, SpaceId, VertexId};
use tracing::debug;

/// A door as seen from one space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorAnchor {
    pub door: DoorId,
    pub vertex: VertexId,
    pub point: Point2,
}

/// One edge to insert: `path` runs `from -> to`.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomEdge {
    pub from: VertexId,
    pub to: VertexId,
    pub path: NavigationPath,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomPaths {
    pub space: SpaceId,
    pub edges: Vec<RoomEdge>,
    /// Door pairs A* could not connect.
    pub missing: Vec<(DoorId, DoorId)>,
    /// The grid fell back to a single center cell.
    pub synthetic_grid: bool,
}

pub fn synthesize_room_paths(
    space: &Space,
    anchors: &[DoorAnchor],
    params: &ResolvedParams,
) -> RoomPaths {
    let mut out = RoomPaths {
        space: space.id,
        ..RoomPaths::default()
    };
    if anchors.len() < 2 {
        return out;
    }

    let grid = WalkGrid::build(space.footprint(), space.bbox(), params.grid_step);
    out.synthetic_grid = grid.is_synthetic();
    let simplifier = PathSimplifier::new(space.footprint(), params);

    let mut pair_index = 0u64;
    for (i, a) in anchors.iter().enumerate() {
        for b in &anchors[i + 1..] {
            pair_index += 1;
            if a.vertex == b.vertex {
                continue;
            }
            let (Some(start), Some(goal)) = (grid.nearest_cell(a.point), grid.nearest_cell(b.point))
            else {
                out.missing.push((a.door, b.door));
                continue;
            };
            let raw = find_path(&grid, start, goal, params.comfort_scale);
            let (Some(&first), Some(&last)) = (raw.first(), raw.last()) else {
                debug!(space = %space.name, door_a = ?a.door, door_b = ?b.door, "no path between doors");
                out.missing.push((a.door, b.door));
                continue;
            };

            let weight = path_length(&raw) + a.point.distance(first) + b.point.distance(last);
            let inner = if raw.len() > 2 {
                raw[1..raw.len() - 1].to_vec()
            } else {
                Vec::new()
            };
            let stream = (u64::from(space.id.0) << 32) | pair_index;
            let mut rng = PassRng::for_stream(params.simplify_seed, stream);
            let points = simplifier.simplify(inner, &mut rng);

            out.edges.push(RoomEdge {
                from: a.vertex,
                to: b.vertex,
                path: NavigationPath::new(weight, points),
            });
        }
    }
    out
}
