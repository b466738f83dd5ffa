// Wall-averse A* over a `WalkGrid`.
//
// Standard A* with a `BinaryHeap` min-heap (reversed ordering). Scores,
// parents and the closed set live in `Vec`s indexed by the grid's flat cell
// index, so there is no hashing anywhere on the hot path.
//
// Each step to a neighbour costs its Euclidean length times a penalty that
// grows as the neighbour gets closer to a wall:
//
//     penalty = 2.0 - min(1.0, wall_distance * comfort_scale)
//
// so routes hug the middle of corridors instead of scraping door frames.
// The penalty never drops below 1, which keeps the Euclidean heuristic
// admissible.
//
// Open-set ties (equal f-score) are broken by a strictly increasing
// insertion sequence, first in first out. Expansion order is therefore a
// pure function of the grid.
//
// See also: `grid.rs` for the lattice, `synth.rs` which runs this for every
// door pair of a space and turns the result into graph edges.

use crate::grid::WalkGrid;
use crate::types::Point2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Entry in the A* open set (min-heap via reversed ordering).
struct OpenEntry {
    cell: usize,
    f_score: f64,
    sequence: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score.total_cmp(&other.f_score) == Ordering::Equal
            && self.sequence == other.sequence
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest (f_score, sequence) is "greatest".
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Step multiplier for entering a cell `wall_distance` away from the nearest
/// wall. 2.0 at the wall, 1.0 from `1 / comfort_scale` outward.
pub fn wall_penalty(wall_distance: f64, comfort_scale: f64) -> f64 {
    2.0 - (wall_distance * comfort_scale).min(1.0)
}

/// Cheapest wall-averse route between two cells, as cell-center points from
/// `start` to `goal` inclusive. Empty when the goal is unreachable or either
/// index is not a walkable cell.
pub fn find_path(grid: &WalkGrid, start: usize, goal: usize, comfort_scale: f64) -> Vec<Point2> {
    let (Some(start_cell), Some(goal_cell)) = (grid.cell(start), grid.cell(goal)) else {
        return Vec::new();
    };
    if start == goal {
        return vec![start_cell.point];
    }
    let goal_point = goal_cell.point;

    let n = grid.len();
    // g_score[cell] = cost of the cheapest known route from start to cell.
    let mut g_score = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut sequence = 0u64;

    g_score[start] = 0.0;
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        cell: start,
        f_score: start_cell.point.distance(goal_point),
        sequence,
    });

    while let Some(current) = open.pop() {
        let ci = current.cell;
        if ci == goal {
            return reconstruct_path(grid, &came_from, start, goal);
        }
        if closed[ci] {
            continue;
        }
        closed[ci] = true;

        let Some(current_cell) = grid.cell(ci) else {
            continue;
        };
        let current_g = g_score[ci];

        for ni in grid.neighbors(ci) {
            if closed[ni] {
                continue;
            }
            let Some(neighbor) = grid.cell(ni) else {
                continue;
            };
            let step = current_cell.point.distance(neighbor.point)
                * wall_penalty(neighbor.wall_distance, comfort_scale);
            let tentative_g = current_g + step;
            if tentative_g < g_score[ni] {
                g_score[ni] = tentative_g;
                came_from[ni] = Some(ci);
                sequence += 1;
                open.push(OpenEntry {
                    cell: ni,
                    f_score: tentative_g + neighbor.point.distance(goal_point),
                    sequence,
                });
            }
        }
    }

    Vec::new()
}

/// Walk parent links back from `goal`.
fn reconstruct_path(
    grid: &WalkGrid,
    came_from: &[Option<usize>],
    start: usize,
    goal: usize,
) -> Vec<Point2> {
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from[current] {
            Some(prev) => {
                cells.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    cells.reverse();
    cells
        .into_iter()
        .filter_map(|i| grid.cell(i).map(|c| c.point))
        .collect()
}

/// Sum of segment lengths along a polyline.
pub fn path_length(points: &[Point2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Footprint, rect};

    fn grid_for(outer: Vec<Point2>, holes: Vec<Vec<Point2>>, step: f64) -> WalkGrid {
        let fp = Footprint::new(outer, holes);
        WalkGrid::build(&fp, fp.bbox(), step)
    }

    #[test]
    fn penalty_bounds() {
        assert_eq!(wall_penalty(0.0, 1.0), 2.0);
        assert_eq!(wall_penalty(0.5, 1.0), 1.5);
        assert_eq!(wall_penalty(10.0, 1.0), 1.0);
    }

    #[test]
    fn open_entries_pop_lowest_f_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(OpenEntry {
            cell: 1,
            f_score: 2.0,
            sequence: 0,
        });
        heap.push(OpenEntry {
            cell: 2,
            f_score: 1.0,
            sequence: 2,
        });
        heap.push(OpenEntry {
            cell: 3,
            f_score: 1.0,
            sequence: 1,
        });
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.cell)).collect();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn open_room_path_is_at_least_straight_line() {
        let grid = grid_for(rect(0.0, 0.0, 10.0, 6.0), Vec::new(), 0.5);
        let start = grid.nearest_cell(Point2::new(0.0, 0.0)).unwrap();
        let goal = grid.nearest_cell(Point2::new(10.0, 6.0)).unwrap();
        let path = find_path(&grid, start, goal, 1.0 / 1.1);

        let a = grid.cell(start).unwrap().point;
        let b = grid.cell(goal).unwrap().point;
        assert_eq!(path.first(), Some(&a));
        assert_eq!(path.last(), Some(&b));
        let straight = a.distance(b);
        let length = path_length(&path);
        assert!(length >= straight - 1e-9);
        // Penalty is at most 2x and an octile route is within 1.09x of straight.
        assert!(length <= 2.5 * straight, "{length} vs {straight}");
        // Consecutive points are lattice neighbours.
        for w in path.windows(2) {
            assert!(w[0].distance(w[1]) <= 0.5 * 2f64.sqrt() + 1e-9);
        }
    }

    #[test]
    fn wall_hugging_is_avoided() {
        // Straight along the wall is shorter, but a centered route is cheaper.
        let grid = grid_for(rect(0.0, 0.0, 20.0, 6.0), Vec::new(), 0.5);
        let start = grid.nearest_cell(Point2::new(2.0, 0.5)).unwrap();
        let goal = grid.nearest_cell(Point2::new(18.0, 0.5)).unwrap();
        let path = find_path(&grid, start, goal, 1.0 / 1.1);
        let max_y = path.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!(max_y >= 1.0, "path never left the wall: {max_y}");
    }

    #[test]
    fn blocked_room_has_no_path() {
        // A hole spanning the full height splits the room in two.
        let grid = grid_for(
            rect(0.0, 0.0, 10.0, 6.0),
            vec![rect(4.0, -1.0, 6.0, 7.0)],
            0.5,
        );
        let start = grid.nearest_cell(Point2::new(0.0, 3.0)).unwrap();
        let goal = grid.nearest_cell(Point2::new(10.0, 3.0)).unwrap();
        assert!(find_path(&grid, start, goal, 1.0).is_empty());
    }

    #[test]
    fn same_cell_is_a_single_point() {
        let grid = grid_for(rect(0.0, 0.0, 4.0, 4.0), Vec::new(), 1.0);
        let c = grid.index(2, 2).unwrap();
        assert_eq!(find_path(&grid, c, c, 1.0), vec![Point2::new(2.0, 2.0)]);
    }

    #[test]
    fn non_walkable_endpoints_yield_nothing() {
        let grid = grid_for(rect(0.0, 0.0, 4.0, 4.0), Vec::new(), 1.0);
        let wall = grid.index(0, 0).unwrap();
        let inside = grid.index(2, 2).unwrap();
        assert!(find_path(&grid, wall, inside, 1.0).is_empty());
    }

    #[test]
    fn identical_inputs_identical_paths() {
        let grid = grid_for(
            rect(0.0, 0.0, 12.0, 12.0),
            vec![rect(5.0, 5.0, 7.0, 7.0)],
            0.5,
        );
        let start = grid.nearest_cell(Point2::new(0.0, 0.0)).unwrap();
        let goal = grid.nearest_cell(Point2::new(12.0, 12.0)).unwrap();
        assert_eq!(
            find_path(&grid, start, goal, 1.0),
            find_path(&grid, start, goal, 1.0)
        );
    }
}
