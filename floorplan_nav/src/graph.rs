// Navigation graph: positioned vertices joined by weighted polyline edges.
//
// Vertices are stored in a `BTreeMap` keyed by a stable `VertexId` handed
// out in insertion order. A separate position index maps `(x, y, floor)` to
// the id, so `add_vertex` upserts by position while identity never depends
// on coordinates. Normalizing coordinates rewrites positions and rebuilds
// the index without touching any id.
//
// Edges are directed entries in a `BTreeMap<(from, to), NavigationPath>`.
// `add_edge_bidirectional` always writes both directions, the reverse
// carrying the flipped polyline, and records mutual neighbour membership.
// A vertex's incident edges are the `(id, _)` range of that map.
//
// Connectivity: BFS from the smallest unvisited id partitions the vertices
// into components in ascending order of their smallest member, which makes
// "earliest component wins" the natural tie-break in
// `keep_largest_component`.
//
// Export assigns dense ids `0..n` in ascending `VertexId` order and, in
// bidirectional mode, emits only the `from < to` direction of each pair.
//
// See also: `building.rs` which owns the graph, `synth.rs` and `stairs.rs`
// which add edges, `projection.rs` for `normalize_coordinates`.
//
// **Critical constraint: determinism.** No `HashMap`. Iteration order of
// every map here is the id order, so two runs over the same input export
// byte-identical JSON.

use crate::error::NavError;
use crate::projection::GeoOrigin;
use crate::types::{Level, Point2, VertexId};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Vertices and paths
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub floor: Level,
}

type PositionKey = (OrderedFloat<f64>, OrderedFloat<f64>, Level);

impl Position {
    pub fn new(point: Point2, floor: Level) -> Self {
        Self {
            x: point.x,
            y: point.y,
            floor,
        }
    }

    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    fn key(&self) -> PositionKey {
        // `+ 0.0` folds -0.0 into 0.0 so both land on the same key.
        (
            OrderedFloat(self.x + 0.0),
            OrderedFloat(self.y + 0.0),
            self.floor,
        )
    }
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub id: VertexId,
    position: Position,
    pub label: String,
    rooms: BTreeSet<String>,
    neighbours: BTreeSet<VertexId>,
}

impl Vertex {
    pub fn position(&self) -> Position {
        self.position
    }

    /// Names of the rooms/stairs this vertex is attached to.
    pub fn rooms(&self) -> &BTreeSet<String> {
        &self.rooms
    }

    pub fn neighbours(&self) -> &BTreeSet<VertexId> {
        &self.neighbours
    }
}

/// Weighted polyline between two vertices. The points are the interior of
/// the route; the endpoints are the vertices themselves.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationPath {
    /// In working units: degrees for geodetic input, even after normalization.
    pub weight: f64,
    pub points: Vec<Point2>,
}

impl NavigationPath {
    pub fn new(weight: f64, points: Vec<Point2>) -> Self {
        Self { weight, points }
    }

    /// Zero weight, no polyline. Used for stair links.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Same route walked the other way.
    pub fn flip(&self) -> Self {
        Self {
            weight: self.weight,
            points: self.points.iter().rev().copied().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// What `keep_largest_component` removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub components: usize,
    pub kept_vertices: usize,
    pub removed_vertices: usize,
    /// Directed edge entries removed.
    pub removed_edges: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConnectivityReport {
    pub vertices: usize,
    /// Unordered vertex pairs with an edge.
    pub links: usize,
    pub isolated: usize,
    /// Component sizes, in discovery order.
    pub component_sizes: Vec<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct NavGraph {
    vertices: BTreeMap<VertexId, Vertex>,
    by_position: BTreeMap<PositionKey, VertexId>,
    edges: BTreeMap<(VertexId, VertexId), NavigationPath>,
    next_id: u32,
}

impl NavGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex, or return the id already at this position and
    /// floor. An existing vertex keeps its label.
    pub fn add_vertex(&mut self, position: Position, label: &str) -> VertexId {
        let key = position.key();
        if let Some(&id) = self.by_position.get(&key) {
            return id;
        }
        let id = VertexId(self.next_id);
        self.next_id += 1;
        self.vertices.insert(
            id,
            Vertex {
                id,
                position,
                label: label.to_string(),
                rooms: BTreeSet::new(),
                neighbours: BTreeSet::new(),
            },
        );
        self.by_position.insert(key, id);
        id
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn vertex_at(&self, point: Point2, floor: Level) -> Option<VertexId> {
        self.by_position
            .get(&Position::new(point, floor).key())
            .copied()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Directed edge entries (twice the number of links).
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn link_count(&self) -> usize {
        self.edges.keys().filter(|(a, b)| a < b).count()
    }

    /// Record that `id` belongs to the named room. No-op for unknown ids.
    pub fn attach_room(&mut self, id: VertexId, room: &str) {
        if let Some(v) = self.vertices.get_mut(&id) {
            v.rooms.insert(room.to_string());
        }
    }

    /// Store `path` for `u -> v` and its flip for `v -> u`. Re-adding a pair
    /// replaces both paths. Returns false (and stores nothing) for a
    /// self-loop or an unknown endpoint.
    pub fn add_edge_bidirectional(
        &mut self,
        u: VertexId,
        v: VertexId,
        path: NavigationPath,
    ) -> bool {
        if u == v || !self.vertices.contains_key(&u) || !self.vertices.contains_key(&v) {
            debug!(?u, ?v, "rejected edge");
            return false;
        }
        let reverse = path.flip();
        self.edges.insert((u, v), path);
        self.edges.insert((v, u), reverse);
        if let Some(vu) = self.vertices.get_mut(&u) {
            vu.neighbours.insert(v);
        }
        if let Some(vv) = self.vertices.get_mut(&v) {
            vv.neighbours.insert(u);
        }
        true
    }

    /// Remove both directions of a link. Returns whether it existed.
    pub fn remove_edge_bidirectional(&mut self, u: VertexId, v: VertexId) -> bool {
        let forward = self.edges.remove(&(u, v)).is_some();
        let backward = self.edges.remove(&(v, u)).is_some();
        if let Some(vu) = self.vertices.get_mut(&u) {
            vu.neighbours.remove(&v);
        }
        if let Some(vv) = self.vertices.get_mut(&v) {
            vv.neighbours.remove(&u);
        }
        forward || backward
    }

    /// Remove a vertex and every edge touching it. Returns the number of
    /// directed edge entries removed.
    pub fn remove_vertex(&mut self, id: VertexId) -> usize {
        let Some(vertex) = self.vertices.remove(&id) else {
            return 0;
        };
        self.by_position.remove(&vertex.position.key());
        let mut removed = 0;
        for n in &vertex.neighbours {
            if self.edges.remove(&(id, *n)).is_some() {
                removed += 1;
            }
            if self.edges.remove(&(*n, id)).is_some() {
                removed += 1;
            }
            if let Some(other) = self.vertices.get_mut(n) {
                other.neighbours.remove(&id);
            }
        }
        removed
    }

    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<&NavigationPath> {
        self.edges.get(&(from, to))
    }

    /// Outgoing edges of `id`, in target order.
    pub fn edges_from(
        &self,
        id: VertexId,
    ) -> impl Iterator<Item = (VertexId, &NavigationPath)> {
        self.edges
            .range((id, VertexId(0))..=(id, VertexId(u32::MAX)))
            .map(|(&(_, to), path)| (to, path))
    }

    /// Every directed edge in `(from, to)` order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, &NavigationPath)> {
        self.edges.iter().map(|(&(a, b), p)| (a, b, p))
    }

    // -----------------------------------------------------------------------
    // Connectivity
    // -----------------------------------------------------------------------

    /// Vertices with no neighbours.
    pub fn get_disconnected_vertices(&self) -> Vec<VertexId> {
        self.vertices
            .values()
            .filter(|v| v.neighbours.is_empty())
            .map(|v| v.id)
            .collect()
    }

    /// Partition into connected components. Components come out ordered by
    /// their smallest vertex id.
    pub fn get_disconnected_components(&self) -> Vec<BTreeSet<VertexId>> {
        let mut unvisited: BTreeSet<VertexId> = self.vertices.keys().copied().collect();
        let mut components = Vec::new();
        while let Some(start) = unvisited.pop_first() {
            let mut component = BTreeSet::from([start]);
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                let Some(vertex) = self.vertices.get(&current) else {
                    continue;
                };
                for &n in &vertex.neighbours {
                    if unvisited.remove(&n) {
                        component.insert(n);
                        queue.push_back(n);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Delete everything outside the largest component. Among components of
    /// equal size the one holding the smallest vertex id is kept.
    pub fn keep_largest_component(&mut self) -> PruneReport {
        let components = self.get_disconnected_components();
        let mut report = PruneReport {
            components: components.len(),
            kept_vertices: self.vertices.len(),
            ..PruneReport::default()
        };
        if components.len() <= 1 {
            return report;
        }
        let mut largest = 0;
        for (i, c) in components.iter().enumerate() {
            if c.len() > components[largest].len() {
                largest = i;
            }
        }
        for (i, component) in components.iter().enumerate() {
            if i == largest {
                continue;
            }
            for &id in component {
                report.removed_edges += self.remove_vertex(id);
                report.removed_vertices += 1;
            }
        }
        report.kept_vertices = self.vertices.len();
        report
    }

    pub fn connectivity_report(&self) -> ConnectivityReport {
        ConnectivityReport {
            vertices: self.vertices.len(),
            links: self.link_count(),
            isolated: self.get_disconnected_vertices().len(),
            component_sizes: self
                .get_disconnected_components()
                .iter()
                .map(BTreeSet::len)
                .collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Coordinates
    // -----------------------------------------------------------------------

    /// Rewrite every vertex position and edge polyline from `(lon, lat)`
    /// degrees to local meters around `origin`, then rebuild the position
    /// index.
    pub fn normalize_coordinates(&mut self, origin: GeoOrigin) {
        for vertex in self.vertices.values_mut() {
            let p = origin.normalize(vertex.position.point());
            vertex.position = Position::new(p, vertex.position.floor);
        }
        for path in self.edges.values_mut() {
            for p in &mut path.points {
                *p = origin.normalize(*p);
            }
        }
        self.by_position.clear();
        for vertex in self.vertices.values() {
            if let Some(previous) = self.by_position.insert(vertex.position.key(), vertex.id) {
                warn!(
                    kept = ?vertex.id,
                    shadowed = ?previous,
                    "two vertices collapsed onto one position during normalization"
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Interchange form. With `bidirectional`, each unordered pair appears
    /// once (the `v1 < v2` direction); otherwise every directed entry.
    pub fn to_export(&self, bidirectional: bool) -> GraphExport {
        let dense: BTreeMap<VertexId, usize> = self
            .vertices
            .keys()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();

        let vertices = self
            .vertices
            .values()
            .map(|v| VertexRecord {
                id: dense[&v.id],
                lat: v.position.y,
                lon: v.position.x,
                floor: v.position.floor,
                name: v.label.clone(),
                rooms: v.rooms.iter().cloned().collect(),
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .filter(|((a, b), _)| !bidirectional || a < b)
            .filter_map(|((a, b), path)| {
                Some(EdgeRecord {
                    v1: *dense.get(a)?,
                    v2: *dense.get(b)?,
                    path: PathRecord {
                        weight: path.weight,
                        points: path.points.iter().map(|p| [p.x, p.y]).collect(),
                    },
                })
            })
            .collect();

        GraphExport {
            bidirectional,
            vertices,
            edges,
        }
    }

    pub fn export_json(&self, bidirectional: bool) -> Result<String, NavError> {
        Ok(serde_json::to_string(&self.to_export(bidirectional))?)
    }
}

// ---------------------------------------------------------------------------
// Interchange records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub bidirectional: bool,
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: usize,
    pub lat: f64,
    pub lon: f64,
    pub floor: Level,
    pub name: String,
    pub rooms: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub v1: usize,
    pub v2: usize,
    pub path: PathRecord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Route length in the input frame's units. Normalization rewrites
    /// positions and points but not weights, so a geodetic building exports
    /// degree-scale weights next to meter positions.
    pub weight: f64,
    /// `[x, y]` pairs (`[lon, lat]` before normalization).
    pub points: Vec<[f64; 2]>,
}
