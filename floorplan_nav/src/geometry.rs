// Planar geometry primitives: bounding boxes, footprints, distances.
//
// A `Footprint` is a room or stair outline: one outer ring plus zero or more
// hole rings, stored open (no repeated closing point). It also caches the
// equivalent `geo::Polygon` for containment tests and for the boolean ops
// in `resolve.rs`. A footprint is replaced wholesale when its geometry
// changes (`Footprint::from_geo`); it is never edited ring by ring, so the
// cache cannot go stale.
//
// Wall distance is the minimum clamped point-to-segment distance over every
// outer and hole segment. Walkability is strict interior of the outer ring
// and outside every hole, via `geo::Contains`.
//
// See also: `grid.rs` (samples walkability and wall distance per cell),
// `resolve.rs` (rewrites footprints), `linker.rs` (door-on-outline test).

use crate::types::Point2;
use geo::{Area, Contains, Coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bounding box
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Box around `points`. An empty slice yields a zero box at the origin.
    pub fn from_points(points: &[Point2]) -> Self {
        let Some(first) = points.first() else {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            };
        };
        let mut bbox = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn diagonal(&self) -> f64 {
        self.width().hypot(self.height())
    }

    /// Closed-interval overlap test (touching boxes intersect).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Distance from `p` to segment `a-b`, projecting onto the segment and
/// clamping to its endpoints.
pub fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point2::new(a.x + t * dx, a.y + t * dy))
}

/// Unsigned area of the triangle `a b c`.
pub fn triangle_area(a: Point2, b: Point2, c: Point2) -> f64 {
    ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
}

/// Drop a repeated closing point, if present.
pub fn open_ring(mut ring: Vec<Point2>) -> Vec<Point2> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Clean a ring captured from hand-drawn floor plans.
///
/// Merges consecutive points closer than `tolerance`, then repeatedly drops
/// the vertex lying closest to the line through its neighbours while that
/// distance is under `tolerance / 4`. Never reduces a ring below three
/// points. Input and output are open rings.
pub fn simplify_ring(ring: &[Point2], tolerance: f64) -> Vec<Point2> {
    let mut points: Vec<Point2> = Vec::with_capacity(ring.len());
    for &p in ring {
        match points.last() {
            Some(&last) if last.distance(p) < tolerance => {}
            _ => points.push(p),
        }
    }
    // Wrap-around duplicate.
    while points.len() > 3 {
        match (points.first(), points.last()) {
            (Some(&first), Some(&last)) if first.distance(last) < tolerance => {
                points.pop();
            }
            _ => break,
        }
    }
    if points.len() <= 3 {
        return if points.len() == 3 { points } else { ring.to_vec() };
    }

    let threshold = tolerance / 4.0;
    while points.len() > 3 {
        let n = points.len();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let d = distance_to_line(points[i], prev, next);
            if d < threshold && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        match best {
            Some((i, _)) => {
                points.remove(i);
            }
            None => break,
        }
    }
    points
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn distance_to_line(p: Point2, a: Point2, b: Point2) -> f64 {
    let len = a.distance(b);
    if len == 0.0 {
        return p.distance(a);
    }
    2.0 * triangle_area(a, p, b) / len
}

pub(crate) fn ring_to_line_string(ring: &[Point2]) -> LineString<f64> {
    ring.iter().map(|p| Coord { x: p.x, y: p.y }).collect()
}

fn line_string_to_ring(ls: &LineString<f64>) -> Vec<Point2> {
    open_ring(ls.coords().map(|c| Point2::new(c.x, c.y)).collect())
}

/// Iterate the closing-inclusive segments of an open ring.
fn ring_segments(ring: &[Point2]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    let n = ring.len();
    let count = if n >= 2 { n } else { 0 };
    (0..count).map(move |i| (ring[i], ring[(i + 1) % n]))
}

// ---------------------------------------------------------------------------
// Footprint
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Footprint {
    outer: Vec<Point2>,
    holes: Vec<Vec<Point2>>,
    shape: Polygon<f64>,
    bbox: BoundingBox,
}

impl Footprint {
    pub fn new(outer: Vec<Point2>, holes: Vec<Vec<Point2>>) -> Self {
        let outer = open_ring(outer);
        let holes: Vec<Vec<Point2>> = holes
            .into_iter()
            .map(open_ring)
            .filter(|h| h.len() >= 3)
            .collect();
        let shape = Polygon::new(
            ring_to_line_string(&outer),
            holes.iter().map(|h| ring_to_line_string(h)).collect(),
        );
        let bbox = BoundingBox::from_points(&outer);
        Self {
            outer,
            holes,
            shape,
            bbox,
        }
    }

    pub fn from_geo(polygon: &Polygon<f64>) -> Self {
        Self::new(
            line_string_to_ring(polygon.exterior()),
            polygon.interiors().iter().map(line_string_to_ring).collect(),
        )
    }

    /// Same footprint with every ring point mapped through `f`.
    pub fn transformed(&self, f: impl Fn(Point2) -> Point2) -> Self {
        Self::new(
            self.outer.iter().map(|&p| f(p)).collect(),
            self.holes
                .iter()
                .map(|h| h.iter().map(|&p| f(p)).collect())
                .collect(),
        )
    }

    pub fn outer(&self) -> &[Point2] {
        &self.outer
    }

    pub fn holes(&self) -> &[Vec<Point2>] {
        &self.holes
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Full polygon including holes.
    pub fn shape(&self) -> &Polygon<f64> {
        &self.shape
    }

    /// Polygon of the outer ring alone.
    pub fn outer_shape(&self) -> Polygon<f64> {
        Polygon::new(self.shape.exterior().clone(), Vec::new())
    }

    pub fn area(&self) -> f64 {
        self.shape.unsigned_area()
    }

    pub fn is_degenerate(&self) -> bool {
        self.outer.len() < 3
    }

    /// Strictly inside the outer ring and outside every hole.
    pub fn contains(&self, p: Point2) -> bool {
        self.bbox.contains(p) && self.shape.contains(&geo::Point::new(p.x, p.y))
    }

    /// Every wall segment: outer ring first, then each hole.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        ring_segments(&self.outer).chain(self.holes.iter().flat_map(|h| ring_segments(h)))
    }

    /// Distance to the nearest wall segment. Zero for a footprint with no
    /// segments.
    pub fn distance_to_wall(&self, p: Point2) -> f64 {
        let d = self
            .segments()
            .map(|(a, b)| distance_to_segment(p, a, b))
            .fold(f64::INFINITY, f64::min);
        if d.is_finite() { d } else { 0.0 }
    }

    /// Whether `p` lies within `tolerance` of any wall segment.
    pub fn is_on_outline(&self, p: Point2, tolerance: f64) -> bool {
        self.segments()
            .any(|(a, b)| distance_to_segment(p, a, b) <= tolerance)
    }
}

/// Axis-aligned rectangle ring, counter-clockwise from `(x0, y0)`.
#[cfg(test)]
pub(crate) fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Point2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Point2::new(-3.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Point2::new(13.0, 4.0), a, b), 5.0);
        // Zero-length segment degrades to point distance.
        assert_eq!(distance_to_segment(Point2::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn bbox_center_and_diagonal() {
        let bbox = BoundingBox::from_points(&rect(0.0, 0.0, 6.0, 8.0));
        assert_eq!(bbox.center(), Point2::new(3.0, 4.0));
        assert_eq!(bbox.diagonal(), 10.0);
    }

    #[test]
    fn bbox_touching_counts_as_intersecting() {
        let a = BoundingBox::from_points(&rect(0.0, 0.0, 5.0, 5.0));
        let b = BoundingBox::from_points(&rect(5.0, 0.0, 10.0, 5.0));
        let c = BoundingBox::from_points(&rect(6.0, 0.0, 10.0, 5.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn footprint_strips_closing_point() {
        let mut ring = rect(0.0, 0.0, 4.0, 2.0);
        ring.push(ring[0]);
        let fp = Footprint::new(ring, Vec::new());
        assert_eq!(fp.outer().len(), 4);
        assert!((fp.area() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn contains_respects_holes_and_boundary() {
        let fp = Footprint::new(rect(0.0, 0.0, 10.0, 10.0), vec![rect(4.0, 4.0, 6.0, 6.0)]);
        assert!(fp.contains(Point2::new(1.0, 1.0)));
        assert!(!fp.contains(Point2::new(5.0, 5.0)));
        assert!(!fp.contains(Point2::new(0.0, 5.0)));
        assert!(!fp.contains(Point2::new(11.0, 5.0)));
        assert!((fp.area() - 96.0).abs() < 1e-9);
    }

    #[test]
    fn wall_distance_includes_hole_segments() {
        let fp = Footprint::new(rect(0.0, 0.0, 10.0, 10.0), vec![rect(4.0, 4.0, 6.0, 6.0)]);
        assert_eq!(fp.distance_to_wall(Point2::new(1.0, 5.0)), 1.0);
        assert_eq!(fp.distance_to_wall(Point2::new(3.5, 5.0)), 0.5);
        assert_eq!(fp.segments().count(), 8);
    }

    #[test]
    fn door_on_outline_tolerance() {
        let fp = Footprint::new(rect(0.0, 0.0, 10.0, 6.0), Vec::new());
        let tolerance = 0.3;
        assert!(fp.is_on_outline(Point2::new(5.0, tolerance / 2.0), tolerance));
        assert!(!fp.is_on_outline(Point2::new(5.0, tolerance * 2.0), tolerance));
    }

    #[test]
    fn from_geo_round_trips_rings() {
        let fp = Footprint::new(rect(0.0, 0.0, 10.0, 10.0), vec![rect(2.0, 2.0, 3.0, 3.0)]);
        let back = Footprint::from_geo(fp.shape());
        assert_eq!(back.outer(), fp.outer());
        assert_eq!(back.holes().len(), 1);
        assert_eq!(back.holes()[0], fp.holes()[0]);
    }

    #[test]
    fn simplify_ring_drops_near_collinear_and_close_points() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.01),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 0.05),
            Point2::new(10.0, 6.0),
            Point2::new(0.0, 6.0),
        ];
        let cleaned = simplify_ring(&ring, 0.3);
        assert_eq!(cleaned, rect(0.0, 0.0, 10.0, 6.0));
    }

    #[test]
    fn transformed_maps_rings_and_bbox() {
        let fp = Footprint::new(rect(0.0, 0.0, 4.0, 4.0), vec![rect(1.0, 1.0, 2.0, 2.0)]);
        let moved = fp.transformed(|p| Point2::new(p.x + 10.0, p.y * 2.0));
        assert_eq!(moved.outer()[2], Point2::new(14.0, 8.0));
        assert_eq!(moved.holes()[0][0], Point2::new(11.0, 2.0));
        assert_eq!(moved.bbox().min_x, 10.0);
        assert!((moved.area() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn simplify_ring_keeps_triangles() {
        let tri = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert_eq!(simplify_ring(&tri, 0.3), tri);
    }
}
