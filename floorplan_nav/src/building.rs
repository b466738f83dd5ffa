// Building pipeline: from input features to a finished navigation graph.
//
// A `Building` owns everything one run needs: the config and its resolved
// parameters, the spaces and doors, the `NavGraph`, and a `BuildSummary` of
// everything that was recovered from along the way. Stages run in a fixed
// order and each one checks the current `BuildStage` first, so calling them
// out of order is an error rather than a silently wrong graph:
//
//   Collecting -> resolve_conflicts -> Resolved
//              -> link_doors        -> DoorsLinked
//              -> synthesize_paths  -> PathsBuilt
//              -> link_floors       -> FloorsLinked
//              -> prune             -> Pruned
//              -> normalize         -> Normalized
//
// Path synthesis is the only expensive stage. Every space is independent
// there, so `synthesize_room_paths` runs per space on rayon (when
// `NavConfig::parallel` is set) and returns plain edge lists; this module
// then inserts them into the graph from one thread, in space order. Workers
// never see the graph mutably.
//
// See also: `synth.rs` (per-space work), `stairs.rs` (floor linking),
// `graph.rs` (pruning, normalization, export).
//
// **Critical constraint: determinism.** Spaces and doors get ids in feature
// order, per-space results are drained in space order, and the simplifier
// is seeded per door pair. The output does not depend on the rayon pool
// size or on `parallel` at all.

use crate::config::{NavConfig, ResolvedParams};
use crate::error::NavError;
use crate::feature::{self, Feature, FeatureKind};
use crate::graph::{GraphExport, NavGraph};
use crate::linker::{self, OverLinkedDoor};
use crate::resolve;
use crate::space::{Door, Space};
use crate::stairs;
use crate::synth::{DoorAnchor, RoomPaths, synthesize_room_paths};
use crate::types::{DoorId, Level, Point2, SpaceId};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildStage {
    Collecting,
    Resolved,
    DoorsLinked,
    PathsBuilt,
    FloorsLinked,
    Pruned,
    Normalized,
}

impl BuildStage {
    pub fn name(self) -> &'static str {
        match self {
            BuildStage::Collecting => "collecting",
            BuildStage::Resolved => "resolved",
            BuildStage::DoorsLinked => "doors_linked",
            BuildStage::PathsBuilt => "paths_built",
            BuildStage::FloorsLinked => "floors_linked",
            BuildStage::Pruned => "pruned",
            BuildStage::Normalized => "normalized",
        }
    }
}

/// A feature that classified fine but could not be constructed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedFeature {
    /// Position in the input feature list.
    pub index: usize,
    pub reason: String,
}

/// Counters for everything the pipeline recovered from. Nothing in here is
/// an error; a clean building simply has most of these at zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BuildSummary {
    pub features_seen: usize,
    /// Features without usable `properties` / `level`.
    pub broken_features: usize,
    pub skipped_features: Vec<SkippedFeature>,
    pub rooms: usize,
    pub stairs: usize,
    pub doors: usize,
    pub trimmed_spaces: usize,
    pub resolution_failures: usize,
    pub discarded_fragments: usize,
    pub door_links: usize,
    pub over_linked_doors: Vec<OverLinkedDoor>,
    pub orphaned_doors: usize,
    pub synthetic_grids: usize,
    pub missing_paths: usize,
    pub room_edges: usize,
    pub stair_links: usize,
    /// Linked stair pairs that got graph edges (both sides had doors).
    pub connected_stairs: usize,
    pub isolated_vertices: usize,
    /// Component sizes before pruning, in component order.
    pub component_sizes: Vec<usize>,
    pub pruned_vertices: usize,
    pub pruned_edges: usize,
}

impl BuildSummary {
    pub fn log(&self) {
        info!(
            features = self.features_seen,
            broken = self.broken_features,
            skipped = self.skipped_features.len(),
            rooms = self.rooms,
            stairs = self.stairs,
            doors = self.doors,
            trimmed = self.trimmed_spaces,
            resolution_failures = self.resolution_failures,
            discarded_fragments = self.discarded_fragments,
            door_links = self.door_links,
            over_linked = self.over_linked_doors.len(),
            orphaned_doors = self.orphaned_doors,
            room_edges = self.room_edges,
            missing_paths = self.missing_paths,
            synthetic_grids = self.synthetic_grids,
            stair_links = self.stair_links,
            isolated_vertices = self.isolated_vertices,
            components = self.component_sizes.len(),
            pruned_vertices = self.pruned_vertices,
            "navigation graph built"
        );
    }
}

pub struct Building {
    config: NavConfig,
    params: ResolvedParams,
    spaces: Vec<Space>,
    doors: Vec<Door>,
    graph: NavGraph,
    summary: BuildSummary,
    stage: BuildStage,
}

impl Building {
    pub fn new(config: NavConfig) -> Result<Self, NavError> {
        config.validate()?;
        let params = config.resolve();
        Ok(Self {
            config,
            params,
            spaces: Vec::new(),
            doors: Vec::new(),
            graph: NavGraph::new(),
            summary: BuildSummary::default(),
            stage: BuildStage::Collecting,
        })
    }

    pub fn from_features(features: &[Feature], config: NavConfig) -> Result<Self, NavError> {
        let mut building = Self::new(config)?;
        for (index, feature) in features.iter().enumerate() {
            building.add_feature(index, feature)?;
        }
        Ok(building)
    }

    // -----------------------------------------------------------------------
    // Collecting
    // -----------------------------------------------------------------------

    /// Classify and construct one input feature. Broken or unconstructible
    /// features land in the summary; the only error is calling this after
    /// the collecting stage.
    pub fn add_feature(&mut self, index: usize, feature: &Feature) -> Result<(), NavError> {
        self.expect_stage("add_feature", BuildStage::Collecting)?;
        self.summary.features_seen += 1;

        let info = match feature::classify(feature) {
            Ok(info) => info,
            Err(err) => {
                debug!(index, %err, "broken feature");
                self.summary.broken_features += 1;
                return Ok(());
            }
        };

        let built = match info.kind {
            FeatureKind::Door => {
                Door::from_feature(self.next_door_id(), feature, &mut self.graph).map(|door| {
                    self.doors.push(door);
                    self.summary.doors += 1;
                })
            }
            FeatureKind::Stair => Space::stair_from_feature(
                self.next_space_id(),
                feature,
                self.params.ring_tolerance,
                &mut self.graph,
            )
            .map(|space| {
                self.spaces.push(space);
                self.summary.stairs += 1;
            }),
            FeatureKind::Room => {
                Space::room_from_feature(self.next_space_id(), feature, self.params.ring_tolerance)
                    .map(|space| {
                        self.spaces.push(space);
                        self.summary.rooms += 1;
                    })
            }
        };

        if let Err(err) = built {
            warn!(index, name = %info.name, level = info.level, %err, "skipping feature");
            self.summary.skipped_features.push(SkippedFeature {
                index,
                reason: err.to_string(),
            });
        }
        Ok(())
    }

    /// Add a room that is not part of the input features.
    pub fn add_room(
        &mut self,
        level: Level,
        name: &str,
        outer: Vec<Point2>,
        holes: Vec<Vec<Point2>>,
    ) -> Result<SpaceId, NavError> {
        self.expect_stage("add_room", BuildStage::Collecting)?;
        let id = self.next_space_id();
        let space = Space::room(id, level, name, outer, holes, self.params.ring_tolerance)?;
        self.spaces.push(space);
        self.summary.rooms += 1;
        Ok(id)
    }

    pub fn add_stair(
        &mut self,
        level: Level,
        name: &str,
        outer: Vec<Point2>,
        holes: Vec<Vec<Point2>>,
    ) -> Result<SpaceId, NavError> {
        self.expect_stage("add_stair", BuildStage::Collecting)?;
        let id = self.next_space_id();
        let space = Space::stair(
            id,
            level,
            name,
            outer,
            holes,
            self.params.ring_tolerance,
            &mut self.graph,
        )?;
        self.spaces.push(space);
        self.summary.stairs += 1;
        Ok(id)
    }

    pub fn add_door(&mut self, level: Level, point: Point2) -> Result<DoorId, NavError> {
        self.expect_stage("add_door", BuildStage::Collecting)?;
        let id = self.next_door_id();
        self.doors.push(Door::new(id, level, point, &mut self.graph));
        self.summary.doors += 1;
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Stages
    // -----------------------------------------------------------------------

    pub fn resolve_conflicts(&mut self) -> Result<(), NavError> {
        self.expect_stage("resolve_conflicts", BuildStage::Collecting)?;
        let report = resolve::resolve_conflicts(&mut self.spaces, self.params.sliver_width);
        debug!(
            trimmed = report.trimmed,
            failed = report.failed,
            discarded = report.discarded_fragments,
            "resolved overlapping spaces"
        );
        self.summary.trimmed_spaces = report.trimmed;
        self.summary.resolution_failures = report.failed;
        self.summary.discarded_fragments = report.discarded_fragments;
        self.stage = BuildStage::Resolved;
        Ok(())
    }

    pub fn link_doors(&mut self) -> Result<(), NavError> {
        self.expect_stage("link_doors", BuildStage::Resolved)?;
        let report = linker::link_doors(
            &mut self.spaces,
            &mut self.doors,
            &mut self.graph,
            self.params.outline_tolerance,
        );
        if !report.orphaned.is_empty() {
            debug!(orphaned = report.orphaned.len(), "doors on no space outline");
        }
        self.summary.door_links = report.links;
        self.summary.orphaned_doors = report.orphaned.len();
        self.summary.over_linked_doors = report.over_linked;
        self.stage = BuildStage::DoorsLinked;
        Ok(())
    }

    pub fn synthesize_paths(&mut self) -> Result<(), NavError> {
        self.expect_stage("synthesize_paths", BuildStage::DoorsLinked)?;

        let anchors: Vec<Vec<DoorAnchor>> = self
            .spaces
            .iter()
            .map(|space| {
                space
                    .doors
                    .iter()
                    .filter_map(|id| self.doors.get(id.index()))
                    .map(|door| DoorAnchor {
                        door: door.id,
                        vertex: door.vertex,
                        point: door.point,
                    })
                    .collect()
            })
            .collect();

        let params = self.params;
        let results: Vec<RoomPaths> = if self.config.parallel {
            self.spaces
                .par_iter()
                .zip(anchors.par_iter())
                .map(|(space, anchors)| synthesize_room_paths(space, anchors, &params))
                .collect()
        } else {
            self.spaces
                .iter()
                .zip(&anchors)
                .map(|(space, anchors)| synthesize_room_paths(space, anchors, &params))
                .collect()
        };

        for result in results {
            if result.synthetic_grid {
                self.summary.synthetic_grids += 1;
            }
            self.summary.missing_paths += result.missing.len();
            for edge in result.edges {
                if self.graph.add_edge_bidirectional(edge.from, edge.to, edge.path) {
                    self.summary.room_edges += 1;
                }
            }
        }
        debug!(
            edges = self.summary.room_edges,
            missing = self.summary.missing_paths,
            "synthesized room paths"
        );
        self.stage = BuildStage::PathsBuilt;
        Ok(())
    }

    pub fn link_floors(&mut self) -> Result<(), NavError> {
        self.expect_stage("link_floors", BuildStage::PathsBuilt)?;
        let pairs = stairs::link_stairs(&mut self.spaces);
        let connected = stairs::connect_stairs(&self.spaces, &self.doors, &pairs, &mut self.graph);
        debug!(links = pairs.len(), connected, "linked floors");
        self.summary.stair_links = pairs.len();
        self.summary.connected_stairs = connected;
        self.stage = BuildStage::FloorsLinked;
        Ok(())
    }

    pub fn prune(&mut self) -> Result<(), NavError> {
        self.expect_stage("prune", BuildStage::FloorsLinked)?;
        let before = self.graph.connectivity_report();
        if before.isolated > 0 {
            warn!(isolated = before.isolated, "vertices without any edge");
        }
        let report = self.graph.keep_largest_component();
        self.summary.isolated_vertices = before.isolated;
        self.summary.component_sizes = before.component_sizes;
        self.summary.pruned_vertices = report.removed_vertices;
        self.summary.pruned_edges = report.removed_edges;
        self.stage = BuildStage::Pruned;
        Ok(())
    }

    /// Rewrite a geodetic building into local meters: graph vertices and
    /// polylines, space footprints and door points all go through the same
    /// `GeoOrigin::normalize`. Planar buildings only advance the stage.
    pub fn normalize(&mut self) -> Result<(), NavError> {
        self.expect_stage("normalize", BuildStage::Pruned)?;
        if let Some(origin) = self.config.frame.origin() {
            self.graph.normalize_coordinates(origin);
            for space in &mut self.spaces {
                let footprint = space.footprint().transformed(|p| origin.normalize(p));
                space.set_footprint(footprint);
            }
            for door in &mut self.doors {
                door.point = origin.normalize(door.point);
            }
        }
        self.stage = BuildStage::Normalized;
        Ok(())
    }

    /// Every stage from conflict resolution through normalization.
    pub fn run(&mut self) -> Result<(), NavError> {
        self.resolve_conflicts()?;
        self.link_doors()?;
        self.synthesize_paths()?;
        self.link_floors()?;
        self.prune()?;
        self.normalize()?;
        self.summary.log();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    pub fn export(&self) -> GraphExport {
        self.graph.to_export(self.config.export_bidirectional)
    }

    pub fn export_json(&self) -> Result<String, NavError> {
        self.graph.export_json(self.config.export_bidirectional)
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn summary(&self) -> &BuildSummary {
        &self.summary
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn expect_stage(&self, attempted: &'static str, expected: BuildStage) -> Result<(), NavError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(NavError::StageOrder {
                attempted,
                expected: expected.name(),
                current: self.stage.name(),
            })
        }
    }

    fn next_space_id(&self) -> SpaceId {
        SpaceId(self.spaces.len() as u32)
    }

    fn next_door_id(&self) -> DoorId {
        DoorId(self.doors.len() as u32)
    }
}

/// Build, run and return a building for `features`.
pub fn generate_nav_graph(features: &[Feature], config: NavConfig) -> Result<Building, NavError> {
    let mut building = Building::from_features(features, config)?;
    building.run()?;
    Ok(building)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::rect;
    use crate::projection::{CoordinateFrame, GeoOrigin};
    use serde_json::{Value, json};

    fn room(level: i32, name: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
        json!({
            "properties": {"level": level, "name": name},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]
            }
        })
    }

    fn stair(level: i32, name: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
        let mut value = room(level, name, x0, y0, x1, y1);
        value["properties"]["stairs"] = json!("yes");
        value
    }

    fn door(level: i32, x: f64, y: f64) -> Value {
        json!({
            "properties": {"level": level, "door": "yes"},
            "geometry": {"type": "Point", "coordinates": [x, y]}
        })
    }

    fn features(values: Vec<Value>) -> Vec<Feature> {
        values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap())
            .collect()
    }

    /// Two rooms and a stair on floor 0, the stair and one room on floor 1,
    /// plus an unreachable two-door room far away on floor 0.
    fn two_floor_building() -> Vec<Feature> {
        features(vec![
            room(0, "A", 0.0, 0.0, 10.0, 6.0),
            room(0, "B", 10.0, 0.0, 20.0, 6.0),
            stair(0, "Stairs (00N)", 20.0, 0.0, 24.0, 6.0),
            stair(1, "Stairs (01N)", 20.0, 0.0, 24.0, 6.0),
            room(1, "C", 10.0, 0.0, 20.0, 6.0),
            room(0, "Island", 100.0, 0.0, 104.0, 2.0),
            door(0, 0.0, 3.0),
            door(0, 10.0, 3.0),
            door(0, 20.0, 3.0),
            door(1, 20.0, 3.0),
            door(0, 100.0, 1.0),
            door(0, 104.0, 1.0),
        ])
    }

    #[test]
    fn two_floors_form_one_component_and_the_island_is_pruned() {
        let building = generate_nav_graph(&two_floor_building(), NavConfig::default()).unwrap();
        let graph = building.graph();
        let summary = building.summary();

        assert_eq!(building.stage(), BuildStage::Normalized);
        // Door vertices d0..d3 plus both stair anchors.
        assert_eq!(graph.vertex_count(), 6);
        // A: d0-d1, B: d1-d2, stairs: anchor-d2, anchor-d3, anchor-anchor.
        assert_eq!(graph.link_count(), 5);
        assert_eq!(graph.get_disconnected_components().len(), 1);
        let floors: std::collections::BTreeSet<Level> =
            graph.vertices().map(|v| v.position().floor).collect();
        assert_eq!(floors.into_iter().collect::<Vec<_>>(), vec![0, 1]);

        assert_eq!(summary.rooms, 4);
        assert_eq!(summary.stairs, 2);
        assert_eq!(summary.doors, 6);
        assert_eq!(summary.room_edges, 3);
        assert_eq!(summary.stair_links, 1);
        assert_eq!(summary.connected_stairs, 1);
        assert_eq!(summary.isolated_vertices, 0);
        let mut sizes = summary.component_sizes.clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 6]);
        assert_eq!(summary.pruned_vertices, 2);
        assert_eq!(summary.pruned_edges, 2);
        assert!(summary.over_linked_doors.is_empty());
    }

    #[test]
    fn shared_wall_door_joins_both_rooms() {
        let building = generate_nav_graph(&two_floor_building(), NavConfig::default()).unwrap();
        let d1 = &building.doors()[1];
        assert_eq!(d1.rooms, vec![SpaceId(0), SpaceId(1)]);
        let rooms: Vec<&str> = building
            .graph()
            .vertex(d1.vertex)
            .unwrap()
            .rooms()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(rooms, vec!["A", "B"]);

        let d0 = building.doors()[0].vertex;
        let path = building.graph().edge(d0, d1.vertex).unwrap();
        assert!((path.weight - 10.0).abs() < 1e-9);
    }

    #[test]
    fn sequential_and_parallel_runs_agree() {
        let input = two_floor_building();
        let parallel = generate_nav_graph(&input, NavConfig::default()).unwrap();
        let sequential = generate_nav_graph(
            &input,
            NavConfig {
                parallel: false,
                ..NavConfig::default()
            },
        )
        .unwrap();
        assert_eq!(parallel.export(), sequential.export());
        assert_eq!(
            parallel.export_json().unwrap(),
            sequential.export_json().unwrap()
        );
    }

    #[test]
    fn broken_and_unconstructible_features_are_recorded() {
        let mut values = vec![
            json!({"properties": {"name": "no level"}}),
            json!({}),
            room(0, "A", 0.0, 0.0, 10.0, 6.0),
            json!({
                "properties": {"level": 0, "name": "Sliver"},
                "geometry": {"type": "Polygon", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
            }),
            json!({
                "properties": {"level": 0, "door": "yes"},
                "geometry": {"type": "Point", "coordinates": "nowhere"}
            }),
        ];
        values.push(door(0, 0.0, 3.0));
        let building = Building::from_features(&features(values), NavConfig::default()).unwrap();
        let summary = building.summary();

        assert_eq!(summary.features_seen, 6);
        assert_eq!(summary.broken_features, 2);
        let skipped: Vec<usize> = summary.skipped_features.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![3, 4]);
        assert_eq!(building.spaces().len(), 1);
        assert_eq!(building.doors().len(), 1);
        assert_eq!(building.doors()[0].id, DoorId(0));
    }

    #[test]
    fn stages_out_of_order_are_rejected() {
        let mut building = Building::new(NavConfig::default()).unwrap();
        let err = building.link_floors().unwrap_err();
        assert!(matches!(
            err,
            NavError::StageOrder {
                attempted: "link_floors",
                expected: "paths_built",
                current: "collecting",
            }
        ));

        building.resolve_conflicts().unwrap();
        assert!(building.resolve_conflicts().is_err());
        assert!(
            building
                .add_room(0, "late", rect(0.0, 0.0, 1.0, 1.0), Vec::new())
                .is_err()
        );
        assert_eq!(building.stage(), BuildStage::Resolved);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = NavConfig {
            grid_step_m: 0.0,
            ..NavConfig::default()
        };
        assert!(matches!(
            Building::new(config),
            Err(NavError::InvalidConfig(_))
        ));
    }

    #[test]
    fn plain_data_constructors_feed_the_pipeline() {
        let mut building = Building::new(NavConfig::default()).unwrap();
        let hall = building
            .add_room(0, "Hall", rect(0.0, 0.0, 10.0, 6.0), Vec::new())
            .unwrap();
        building.add_door(0, Point2::new(0.0, 3.0)).unwrap();
        building.add_door(0, Point2::new(10.0, 3.0)).unwrap();
        building.run().unwrap();

        assert_eq!(building.spaces()[hall.index()].doors.len(), 2);
        assert_eq!(building.graph().link_count(), 1);
        let json: Value = serde_json::from_str(&building.export_json().unwrap()).unwrap();
        assert_eq!(json["bidirectional"], true);
        assert_eq!(json["edges"].as_array().unwrap().len(), 1);
        assert_eq!(json["vertices"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn door_on_no_outline_is_counted_and_pruned() {
        let mut building = Building::new(NavConfig::default()).unwrap();
        building
            .add_room(0, "Hall", rect(0.0, 0.0, 10.0, 6.0), Vec::new())
            .unwrap();
        building.add_door(0, Point2::new(0.0, 3.0)).unwrap();
        building.add_door(0, Point2::new(10.0, 3.0)).unwrap();
        building.add_door(0, Point2::new(40.0, 40.0)).unwrap();
        building.run().unwrap();

        let summary = building.summary();
        assert_eq!(summary.orphaned_doors, 1);
        assert_eq!(summary.isolated_vertices, 1);
        assert_eq!(summary.pruned_vertices, 1);
        assert_eq!(building.graph().link_count(), 1);
    }

    #[test]
    fn overlapping_rooms_are_trimmed_before_linking() {
        let mut building = Building::new(NavConfig::default()).unwrap();
        building
            .add_room(0, "Big", rect(0.0, 0.0, 10.0, 10.0), Vec::new())
            .unwrap();
        building
            .add_room(0, "Small", rect(8.0, 0.0, 12.0, 10.0), Vec::new())
            .unwrap();
        building.run().unwrap();

        assert_eq!(building.summary().trimmed_spaces, 1);
        assert!((building.spaces()[0].area() - 80.0).abs() < 0.8);
        assert!((building.spaces()[1].area() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn geodetic_graph_is_normalized_to_meters() {
        let origin = GeoOrigin::new(50.80977, 8.81048);
        let deg = |x: f64, y: f64| {
            let p = origin.denormalize(Point2::new(x, y));
            [p.x, p.y]
        };
        let values = vec![
            json!({
                "properties": {"level": 0, "name": "Hall"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [deg(0.0, 0.0), deg(10.0, 0.0), deg(10.0, 6.0), deg(0.0, 6.0)]
                }
            }),
            json!({
                "properties": {"level": 0, "door": "yes"},
                "geometry": {"type": "Point", "coordinates": deg(0.0, 3.0)}
            }),
            json!({
                "properties": {"level": 0, "door": "yes"},
                "geometry": {"type": "Point", "coordinates": deg(10.0, 3.0)}
            }),
        ];
        let config = NavConfig {
            frame: CoordinateFrame::Geodetic { origin },
            ..NavConfig::default()
        };
        let building = generate_nav_graph(&features(values), config).unwrap();
        let graph = building.graph();

        assert_eq!(graph.link_count(), 1);
        let mut points: Vec<Point2> = graph.vertices().map(|v| v.position().point()).collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert!(points[0].distance(Point2::new(0.0, 3.0)) < 1e-6);
        assert!(points[1].distance(Point2::new(10.0, 3.0)) < 1e-6);
        let hall = &building.spaces()[0];
        assert!((hall.area() - 60.0).abs() < 1e-3, "area {}", hall.area());
        assert!(building.doors()[1].point.distance(Point2::new(10.0, 3.0)) < 1e-6);
        for (_, _, path) in graph.edges() {
            for p in &path.points {
                assert!((0.0..=10.0).contains(&p.x) && (0.0..=6.0).contains(&p.y), "{p}");
            }
        }
    }
}
