// Vertical linking of stairs across adjacent floors.
//
// A stair on level `n` links to a stair on level `n + 1` when either
//
//   (a) their bounding-box centers are closer than half the larger of the
//       two bounding-box diagonals (the same shaft drawn on both floors), or
//   (b) their names carry a `(<floor digits><suffix>)` designation with the
//       same suffix and floor numbers one apart, e.g. "Stairs (03A99)" on
//       level 3 and "Stairs (04A99)" on level 4. This catches shafts whose
//       outlines were drawn offset between floors.
//
// Lower stairs are scanned in space order and take the first upper stair
// that matches and has no `below` link yet, so each stair has at most one
// stair above and one below.
//
// Once linked, and only when both stairs have at least one door, the graph
// gets zero-weight edges from each stair's anchor vertex to each of its own
// doors and from the lower anchor to the upper anchor.
//
// See also: `space.rs` (`StairLinks`, anchor creation), `building.rs` which
// runs this after all per-space paths are in the graph.

use crate::geometry::BoundingBox;
use crate::graph::{NavGraph, NavigationPath};
use crate::space::{Door, Space};
use crate::types::SpaceId;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static DESIGNATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\((\d+)(.*)\)").ok());

/// Floor digits and trimmed suffix from a name like "Stairs (03A99)".
pub fn stair_designation(name: &str) -> Option<(u32, String)> {
    let caps = DESIGNATION.as_ref()?.captures(name)?;
    let floor = caps.get(1)?.as_str().parse().ok()?;
    let suffix = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
    Some((floor, suffix))
}

/// Names designate the same shaft on consecutive floors.
pub fn names_match_adjacent(lower: &str, upper: &str) -> bool {
    match (stair_designation(lower), stair_designation(upper)) {
        (Some((lf, ls)), Some((uf, us))) => ls == us && lf.checked_add(1) == Some(uf),
        _ => false,
    }
}

/// Bounding boxes describe the same shaft.
pub fn footprints_aligned(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.center().distance(b.center()) < a.diagonal().max(b.diagonal()) / 2.0
}

/// Set `above`/`below` on matching stairs. Returns `(lower, upper)` pairs in
/// link order.
pub fn link_stairs(spaces: &mut [Space]) -> Vec<(SpaceId, SpaceId)> {
    let stairs: Vec<usize> = spaces
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_stair())
        .map(|(i, _)| i)
        .collect();

    let mut pairs = Vec::new();
    for &lo in &stairs {
        let upper = stairs.iter().copied().find(|&hi| {
            let (lower, upper) = (&spaces[lo], &spaces[hi]);
            lower.level.checked_add(1) == Some(upper.level)
                && upper.stair_links().is_some_and(|l| l.below.is_none())
                && (footprints_aligned(lower.bbox(), upper.bbox())
                    || names_match_adjacent(&lower.name, &upper.name))
        });
        let Some(hi) = upper else { continue };

        let (lo_id, hi_id) = (spaces[lo].id, spaces[hi].id);
        if let Some(links) = spaces[lo].stair_links_mut() {
            links.above = Some(hi_id);
        }
        if let Some(links) = spaces[hi].stair_links_mut() {
            links.below = Some(lo_id);
        }
        debug!(lower = %spaces[lo].name, upper = %spaces[hi].name, "linked stairs");
        pairs.push((lo_id, hi_id));
    }
    pairs
}

/// Add the zero-weight edges for linked stair pairs. Returns how many pairs
/// were connected (both sides had doors).
pub fn connect_stairs(
    spaces: &[Space],
    doors: &[Door],
    pairs: &[(SpaceId, SpaceId)],
    graph: &mut NavGraph,
) -> usize {
    let mut connected = 0;
    for &(lo, hi) in pairs {
        let (Some(lower), Some(upper)) = (spaces.get(lo.index()), spaces.get(hi.index())) else {
            continue;
        };
        let (Some(lower_links), Some(upper_links)) = (lower.stair_links(), upper.stair_links())
        else {
            continue;
        };
        if lower.doors.is_empty() || upper.doors.is_empty() {
            debug!(lower = %lower.name, upper = %upper.name, "linked stairs without doors stay unconnected");
            continue;
        }
        for (stair, anchor) in [(lower, lower_links.anchor), (upper, upper_links.anchor)] {
            for door in stair.doors.iter().filter_map(|d| doors.get(d.index())) {
                graph.add_edge_bidirectional(anchor, door.vertex, NavigationPath::empty());
            }
        }
        graph.add_edge_bidirectional(
            lower_links.anchor,
            upper_links.anchor,
            NavigationPath::empty(),
        );
        connected += 1;
    }
    connected
}
