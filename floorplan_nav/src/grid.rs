// Per-space walkability lattice with cached wall distance.
//
// The lattice covers the space's bounding box at a fixed step. Storage is a
// flat `Vec<Option<GridCell>>` indexed by `col + row * cols`; non-walkable
// positions hold `None`. Cell `(row, col)` sits at
// `(min_x + col * step, min_y + row * step)` (computed by multiplication, not
// accumulation, so the last column lands exactly on the box edge).
//
// A position is walkable when it is strictly inside the outer ring and
// outside every hole. Walkable cells cache their distance to the nearest
// wall segment, which A* turns into a step penalty.
//
// A footprint thinner than the step can produce zero walkable cells. The
// grid then holds one synthetic cell at the bounding-box center so the
// space's doors still connect through it; `is_synthetic()` reports this.
//
// See also: `astar.rs` which searches this grid, `geometry.rs` for the
// containment and wall-distance primitives.

use crate::geometry::{BoundingBox, Footprint};
use crate::types::Point2;
use smallvec::SmallVec;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub point: Point2,
    pub row: usize,
    pub col: usize,
    pub wall_distance: f64,
}

#[derive(Clone, Debug)]
pub struct WalkGrid {
    rows: usize,
    cols: usize,
    /// Flat storage: index = col + row * cols.
    cells: Vec<Option<GridCell>>,
    synthetic: bool,
}

/// Row/column offsets of the 8-neighbourhood.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl WalkGrid {
    /// Rasterize `footprint` over `bbox` at `step`.
    pub fn build(footprint: &Footprint, bbox: &BoundingBox, step: f64) -> Self {
        let cols = lattice_len(bbox.width(), step);
        let rows = lattice_len(bbox.height(), step);
        let mut cells = Vec::with_capacity(rows * cols);
        let mut walkable = 0usize;
        for row in 0..rows {
            let y = bbox.min_y + row as f64 * step;
            for col in 0..cols {
                let point = Point2::new(bbox.min_x + col as f64 * step, y);
                if footprint.contains(point) {
                    walkable += 1;
                    cells.push(Some(GridCell {
                        point,
                        row,
                        col,
                        wall_distance: footprint.distance_to_wall(point),
                    }));
                } else {
                    cells.push(None);
                }
            }
        }

        if walkable > 0 {
            return Self {
                rows,
                cols,
                cells,
                synthetic: false,
            };
        }

        let center = bbox.center();
        warn!(
            %center,
            step,
            width = bbox.width(),
            height = bbox.height(),
            "no walkable grid cells; substituting the bounding-box center"
        );
        Self {
            rows: 1,
            cols: 1,
            cells: vec![Some(GridCell {
                point: center,
                row: 0,
                col: 0,
                wall_distance: footprint.distance_to_wall(center),
            })],
            synthetic: true,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total lattice positions, walkable or not.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn cell(&self, index: usize) -> Option<&GridCell> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Flat index for `(row, col)`, or `None` outside the lattice.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| col + row * self.cols)
    }

    /// Walkable 8-connected neighbours of a walkable cell.
    pub fn neighbors(&self, index: usize) -> SmallVec<[usize; 8]> {
        let mut out = SmallVec::new();
        let Some(cell) = self.cell(index) else {
            return out;
        };
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            let (Some(row), Some(col)) = (
                cell.row.checked_add_signed(dr),
                cell.col.checked_add_signed(dc),
            ) else {
                continue;
            };
            if let Some(n) = self.index(row, col) {
                if self.cells[n].is_some() {
                    out.push(n);
                }
            }
        }
        out
    }

    /// Walkable cell closest to `point`; the lowest index wins ties.
    pub fn nearest_cell(&self, point: Point2) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, cell) in self.cells.iter().enumerate() {
            let Some(cell) = cell else { continue };
            let d = cell.point.distance(point);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn walkable(&self) -> impl Iterator<Item = (usize, &GridCell)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i, c)))
    }
}

/// Number of lattice positions in `[0, extent]` at `step`.
fn lattice_len(extent: f64, step: f64) -> usize {
    let n = (extent / step).floor();
    if n.is_finite() && n >= 0.0 {
        n as usize + 1
    } else {
        1
    }
}
