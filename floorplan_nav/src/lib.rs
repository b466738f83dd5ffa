// floorplan_nav: indoor navigation graph generation.
//
// Takes the rooms, stairs and doors of a multi-floor building (GeoJSON-shaped
// features, one `level` per feature) and produces a weighted navigation
// graph: one vertex per door and stair anchor, one edge per walkable route
// between two doors of the same space, zero-weight edges up and down stair
// shafts. Edges carry the simplified polyline a client can draw.
//
// Module overview:
// - `building.rs`:   Building pipeline: stage ordering, BuildSummary, `generate_nav_graph`.
// - `feature.rs`:    Input features and their classification (door / stair / room / broken).
// - `space.rs`:      Space (room or stair) and Door, with their constructors.
// - `geometry.rs`:   Point/ring helpers, BoundingBox, Footprint (polygon with holes).
// - `resolve.rs`:    Overlap removal between same-floor spaces (geo boolean ops).
// - `linker.rs`:     Door-to-space attachment by outline distance.
// - `grid.rs`:       Per-space walkability lattice with cached wall distances.
// - `astar.rs`:      Wall-averse A* over a WalkGrid.
// - `simplify.rs`:   Collinear removal + seeded shortcutting of grid routes.
// - `synth.rs`:      Per-space all-door-pairs path synthesis.
// - `stairs.rs`:     Stair linking across adjacent floors.
// - `graph.rs`:      NavGraph, pruning, normalization, interchange export.
// - `projection.rs`: Coordinate frames and the flat-earth normalizer.
// - `config.rs`:     NavConfig (meters, JSON) and ResolvedParams (working units).
// - `error.rs`:      NavError.
// - `prng`:          Re-exported from `floorplan_nav_prng`: xoshiro256++ with SplitMix64 seeding.
// - `types.rs`:      Point2, Level, and the id newtypes.
//
// **Critical constraint: determinism.** The same features and config always
// produce the same graph, byte for byte. No `HashMap`, no system time, no OS
// entropy. Use `BTreeMap` for ordered collections.

pub mod astar;
pub mod building;
pub mod config;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod graph;
pub mod grid;
pub mod linker;
pub use floorplan_nav_prng as prng;
pub mod projection;
pub mod resolve;
pub mod simplify;
pub mod space;
pub mod stairs;
pub mod synth;
pub mod types;

pub use building::{Building, BuildStage, BuildSummary, generate_nav_graph};
pub use config::NavConfig;
pub use error::NavError;
pub use feature::{Feature, FeatureCollection};
pub use graph::{GraphExport, NavGraph};
