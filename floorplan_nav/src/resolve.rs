// Geometry conflict resolution between overlapping spaces on one floor.
//
// Floor plans drawn by hand overlap: two rooms claim the same strip of
// floor, or a stair is drawn on top of a corridor. Every space must own its
// floor area exclusively before grids are built, otherwise A* would route
// through a neighbour's interior.
//
// For each same-floor pair whose intersection has positive area, the
// larger space loses the overlap:
//
//   1. larger.outer - smaller, then minus each of the larger's own holes;
//   2. erode then dilate by the sliver width with miter joins, which removes
//      slivers thinner than a wall while keeping right-angle corners sharp;
//   3. if the result splits, keep the largest piece by area and log the rest.
//
// Any failure (empty result, degenerate ring) keeps the original geometry.
// Pairs are rejected by bounding box before any exact polygon test. Shared
// walls (zero-area intersection) are not conflicts, so running the pass on
// an already-disjoint set changes nothing.
//
// See also: `geometry.rs` for `Footprint`, `building.rs` which runs this to
// completion for every floor before `grid.rs` sees any footprint.

use crate::geometry::{Footprint, ring_to_line_string};
use crate::space::Space;
use crate::types::SpaceId;
use geo::algorithm::buffer::{BufferStyle, LineJoin};
use geo::{Area, BooleanOps, Buffer, Intersects, MultiPolygon, Polygon};
use tracing::{debug, warn};

/// Miter limit for the erode/dilate pass. Corners sharper than this ratio
/// get beveled.
const MITER_LIMIT: f64 = 4.0;

/// Overlaps below this fraction of the smaller area are numerical noise.
const OVERLAP_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Different floors, disjoint, or only touching.
    Disjoint,
    /// `space` lost the overlap; `discarded` fragments were dropped after a
    /// split.
    Trimmed { space: SpaceId, discarded: usize },
    /// The boolean ops produced nothing usable; `space` kept its geometry.
    Failed { space: SpaceId },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub trimmed: usize,
    pub failed: usize,
    pub discarded_fragments: usize,
}

/// Resolve every overlapping same-floor pair in `spaces`.
pub fn resolve_conflicts(spaces: &mut [Space], sliver_width: f64) -> ResolveReport {
    let mut report = ResolveReport::default();
    for j in 1..spaces.len() {
        let (head, tail) = spaces.split_at_mut(j);
        let b = &mut tail[0];
        for a in head.iter_mut() {
            match resolve_pair(a, b, sliver_width) {
                Resolution::Disjoint => {}
                Resolution::Trimmed { discarded, .. } => {
                    report.trimmed += 1;
                    report.discarded_fragments += discarded;
                }
                Resolution::Failed { .. } => report.failed += 1,
            }
        }
    }
    report
}

/// Remove the overlap between `a` and `b` from whichever is larger.
pub fn resolve_pair(a: &mut Space, b: &mut Space, sliver_width: f64) -> Resolution {
    if a.level != b.level
        || a.footprint().is_degenerate()
        || b.footprint().is_degenerate()
        || !a.bbox().intersects(b.bbox())
        || !a.footprint().shape().intersects(b.footprint().shape())
    {
        return Resolution::Disjoint;
    }

    let (area_a, area_b) = (a.area(), b.area());
    let overlap = multi(a.footprint().shape().clone())
        .intersection(&multi(b.footprint().shape().clone()))
        .unsigned_area();
    if overlap <= OVERLAP_EPSILON * area_a.min(area_b) {
        return Resolution::Disjoint;
    }

    if area_b > area_a {
        trim(b, a, sliver_width)
    } else {
        trim(a, b, sliver_width)
    }
}

fn trim(target: &mut Space, cutter: &Space, sliver_width: f64) -> Resolution {
    let mut remaining =
        multi(target.footprint().outer_shape()).difference(&multi(cutter.footprint().shape().clone()));
    for hole in target.footprint().holes() {
        let hole = Polygon::new(ring_to_line_string(hole), Vec::new());
        remaining = remaining.difference(&multi(hole));
    }

    let miter = |distance: f64| BufferStyle::new(distance).line_join(LineJoin::Miter(MITER_LIMIT));
    let opened = remaining
        .buffer_with_style(miter(-sliver_width))
        .buffer_with_style(miter(sliver_width));

    let mut pieces = opened.0;
    if pieces.is_empty() {
        warn!(space = %target.name, level = target.level, "overlap removal left nothing; keeping original");
        return Resolution::Failed { space: target.id };
    }

    let mut largest = 0;
    for (i, piece) in pieces.iter().enumerate() {
        if piece.unsigned_area() > pieces[largest].unsigned_area() {
            largest = i;
        }
    }
    let discarded = pieces.len() - 1;
    if discarded > 0 {
        let dropped: f64 = pieces
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != largest)
            .map(|(_, p)| p.unsigned_area())
            .sum();
        warn!(
            space = %target.name,
            level = target.level,
            fragments = discarded,
            dropped_area = dropped,
            "space split by overlap removal; keeping largest piece"
        );
    }

    let footprint = Footprint::from_geo(&pieces.swap_remove(largest));
    if footprint.is_degenerate() {
        warn!(space = %target.name, level = target.level, "overlap removal produced a degenerate ring; keeping original");
        return Resolution::Failed { space: target.id };
    }

    debug!(
        space = %target.name,
        cutter = %cutter.name,
        before = target.area(),
        after = footprint.area(),
        "trimmed overlap"
    );
    target.set_footprint(footprint);
    Resolution::Trimmed {
        space: target.id,
        discarded,
    }
}

fn multi(polygon: Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect;
    use crate::types::Level;

    fn room(id: u32, level: Level, x0: f64, y0: f64, x1: f64, y1: f64) -> Space {
        Space::room(
            SpaceId(id),
            level,
            &format!("room {id}"),
            rect(x0, y0, x1, y1),
            Vec::new(),
            0.3,
        )
        .unwrap()
    }

    #[test]
    fn disjoint_and_wall_sharing_sets_are_unchanged() {
        let mut spaces = vec![
            room(0, 0, 0.0, 0.0, 5.0, 5.0),
            room(1, 0, 5.0, 0.0, 10.0, 5.0),
            room(2, 0, 20.0, 0.0, 25.0, 5.0),
        ];
        let before: Vec<_> = spaces.iter().map(|s| s.footprint().outer().to_vec()).collect();
        let report = resolve_conflicts(&mut spaces, 0.3);
        assert_eq!(report, ResolveReport::default());
        let after: Vec<_> = spaces.iter().map(|s| s.footprint().outer().to_vec()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn different_floors_never_conflict() {
        let mut a = room(0, 0, 0.0, 0.0, 10.0, 10.0);
        let mut b = room(1, 1, 0.0, 0.0, 10.0, 10.0);
        assert_eq!(resolve_pair(&mut a, &mut b, 0.3), Resolution::Disjoint);
    }

    #[test]
    fn larger_space_loses_the_overlap() {
        // Small room listed first so the role swap is exercised.
        let mut small = room(0, 0, 8.0, 0.0, 12.0, 10.0);
        let mut big = room(1, 0, 0.0, 0.0, 10.0, 10.0);
        let result = resolve_pair(&mut small, &mut big, 0.3);
        assert_eq!(
            result,
            Resolution::Trimmed {
                space: SpaceId(1),
                discarded: 0
            }
        );
        assert!((big.area() - 80.0).abs() < 0.8, "area {}", big.area());
        assert!((big.bbox().max_x - 8.0).abs() < 0.05);
        assert!((small.area() - 40.0).abs() < 1e-9);

        // Resolved pair is now stable.
        assert_eq!(resolve_pair(&mut small, &mut big, 0.3), Resolution::Disjoint);
    }

    #[test]
    fn split_keeps_largest_piece() {
        let mut big = room(0, 0, 0.0, 0.0, 10.0, 10.0);
        let mut bar = room(1, 0, 3.0, -1.0, 5.0, 11.0);
        let result = resolve_pair(&mut big, &mut bar, 0.3);
        assert_eq!(
            result,
            Resolution::Trimmed {
                space: SpaceId(0),
                discarded: 1
            }
        );
        assert!((big.area() - 50.0).abs() < 0.5, "area {}", big.area());
        assert!((big.bbox().min_x - 5.0).abs() < 0.05);
    }

    #[test]
    fn trim_that_erases_the_space_keeps_the_original() {
        // What is left of the corridor is thinner than twice the sliver
        // width, so the opening wipes it out entirely.
        let mut corridor = room(0, 0, 0.0, 0.0, 40.0, 0.5);
        let mut office = room(1, 0, 10.0, -1.0, 13.0, 2.0);
        let before = corridor.footprint().outer().to_vec();
        assert_eq!(
            resolve_pair(&mut corridor, &mut office, 0.3),
            Resolution::Failed { space: SpaceId(0) }
        );
        assert_eq!(corridor.footprint().outer(), before.as_slice());
        assert!((corridor.area() - 20.0).abs() < 1e-9);

        let mut spaces = vec![
            room(0, 0, 0.0, 0.0, 40.0, 0.5),
            room(1, 0, 10.0, -1.0, 13.0, 2.0),
        ];
        let report = resolve_conflicts(&mut spaces, 0.3);
        assert_eq!(
            report,
            ResolveReport {
                trimmed: 0,
                failed: 1,
                discarded_fragments: 0
            }
        );
        assert_eq!(spaces[0].footprint().outer(), before.as_slice());
    }

    #[test]
    fn slivers_thinner_than_a_wall_are_removed() {
        // Cutting leaves 0.2-wide strips along the top and right edges.
        let mut big = room(0, 0, 0.0, 0.0, 10.0, 10.0);
        let mut notch = room(1, 0, -1.0, 5.0, 9.8, 9.8);
        let result = resolve_pair(&mut big, &mut notch, 0.3);
        assert!(matches!(result, Resolution::Trimmed { space: SpaceId(0), .. }));
        // The 0.2 strip along y = 9.8..10 does not survive the opening.
        assert!(big.bbox().max_y < 9.9, "max_y {}", big.bbox().max_y);
    }
}
