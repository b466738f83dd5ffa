// Error type for structural failures.
//
// Only conditions that stop an operation are errors. Conditions the engine
// recovers from locally (boolean-op failure in the conflict resolver, no A*
// path, over-linked doors, empty walkability grids) are reported through
// outcome values and `tracing` events instead, so a single bad room never
// aborts a building.

use crate::types::Level;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    /// Feature lacks usable `properties` or `level`. Routed to the broken
    /// bucket by the pipeline.
    #[error("malformed feature: {reason}")]
    MalformedFeature { reason: String },

    /// Ring or point geometry with too few usable coordinates.
    #[error("degenerate geometry for '{name}' on level {level}: {points} usable points")]
    DegenerateGeometry {
        name: String,
        level: Level,
        points: usize,
    },

    #[error("feature is not tagged as a door (door={tag:?})")]
    InvalidDoor { tag: Option<String> },

    #[error("feature is not tagged as a stair (stairs={tag:?})")]
    InvalidStair { tag: Option<String> },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A pipeline stage was called out of order.
    #[error("stage {attempted} requires the building to be at {expected}, but it is at {current}")]
    StageOrder {
        attempted: &'static str,
        expected: &'static str,
        current: &'static str,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
