// Path simplification for raw grid routes.
//
// A* output is a staircase of lattice points. Before it becomes an edge
// polyline it goes through two passes:
//
// 1. Collinear removal: drop every point whose triangle with its current
//    neighbours has (near-)zero area. Straight runs collapse to their ends.
// 2. Shortcutting: drop a point when its neighbours can be joined directly.
//    A shortcut is allowed only if every sampled sub-point of the direct
//    segment is walkable, the dropped point itself keeps at least the
//    clearance margin from every wall, and no sampled sub-point comes closer
//    to a wall than that margin. Passes repeat until one removes nothing.
//
// The first and last points are never dropped. The start offset of each
// shortcut pass (1 or 2) and whether to skip a point after a removal come
// from a `PassRng`, which spreads removals along the path instead of always
// eating from the front. The caller seeds one stream per door pair, so the
// result does not depend on thread scheduling.
//
// See also: `synth.rs` which feeds trimmed A* paths through here,
// `floorplan_nav_prng` for the generator.

use crate::config::ResolvedParams;
use crate::geometry::{Footprint, triangle_area};
use crate::prng::PassRng;
use crate::types::Point2;

pub struct PathSimplifier<'a> {
    footprint: &'a Footprint,
    clearance: f64,
    collinear_epsilon: f64,
    walk_samples: usize,
    clearance_samples: usize,
}

impl<'a> PathSimplifier<'a> {
    pub fn new(footprint: &'a Footprint, params: &ResolvedParams) -> Self {
        Self {
            footprint,
            clearance: params.path_clearance,
            collinear_epsilon: params.collinear_epsilon,
            walk_samples: params.walk_check_samples.max(1),
            clearance_samples: params.clearance_check_samples.max(1),
        }
    }

    pub fn simplify(&self, points: Vec<Point2>, rng: &mut PassRng) -> Vec<Point2> {
        if points.len() <= 2 {
            return points;
        }
        let mut path = remove_collinear(points, self.collinear_epsilon);

        // A pass starting at offset 2 never looks at point 1, so an
        // unproductive offset-2 pass is followed by a full one before
        // declaring a fixed point.
        let mut force_full = false;
        while path.len() > 2 {
            let start = if force_full { 1 } else { 1 + rng.coin_step() };
            if self.shortcut_pass(&mut path, start, rng) {
                force_full = false;
            } else if start == 1 {
                break;
            } else {
                force_full = true;
            }
        }
        path
    }

    /// One sweep from `start`. Returns whether anything was dropped.
    fn shortcut_pass(&self, path: &mut Vec<Point2>, start: usize, rng: &mut PassRng) -> bool {
        let mut removed = false;
        let mut i = start;
        while i + 1 < path.len() {
            if self.can_drop(path[i - 1], path[i], path[i + 1]) {
                path.remove(i);
                removed = true;
                i += rng.coin_step();
            } else {
                i += 1;
            }
        }
        removed
    }

    fn can_drop(&self, prev: Point2, point: Point2, next: Point2) -> bool {
        self.segment_walkable(prev, next)
            && !self.too_close_to_wall(point)
            && !self.segment_too_close(prev, next)
    }

    /// Endpoints and `walk_samples - 1` interior sub-points are walkable.
    pub fn segment_walkable(&self, a: Point2, b: Point2) -> bool {
        let n = self.walk_samples;
        (0..=n).all(|i| self.footprint.contains(a.lerp(b, i as f64 / n as f64)))
    }

    fn too_close_to_wall(&self, p: Point2) -> bool {
        self.footprint.distance_to_wall(p) < self.clearance
    }

    fn segment_too_close(&self, a: Point2, b: Point2) -> bool {
        let n = self.clearance_samples;
        (1..n).any(|i| self.too_close_to_wall(a.lerp(b, i as f64 / n as f64)))
    }
}

/// Drop interior points collinear with their neighbours (triangle area at
/// most `epsilon`). Keeps both ends.
pub fn remove_collinear(points: Vec<Point2>, epsilon: f64) -> Vec<Point2> {
    if points.len() <= 2 {
        return points;
    }
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    let last = points.len() - 1;
    for (i, &p) in points.iter().enumerate() {
        if i > 0 && i < last {
            let prev = out[out.len() - 1];
            let next = points[i + 1];
            if triangle_area(prev, p, next) <= epsilon {
                continue;
            }
        }
        out.push(p);
    }
    out
}
