//! Planning failures.

use crate::graph::GraphError;
use thiserror::Error;
use weave_models::ModelError;

/// Errors raised while building graphs or driving a planning run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanningError {
    /// Some goal tasks have no provision at all.
    #[error("cannot realize all mashup tasks: {0}")]
    UnrealizableGoal(String),

    /// The last level of the graph requires only enabled actions.
    #[error("cannot extend satisfied graph")]
    SatisfiedGraph,

    /// No action provision could be derived for any required action.
    #[error("cannot satisfy any action")]
    NoActionProvisions,

    /// A goal without tasks.
    #[error("expecting one or more goal tasks")]
    EmptyGoal,

    /// Depth bounds violating `1 <= min <= max`.
    #[error("invalid depth range: {0}")]
    InvalidDepthRange(String),

    /// `advance` was called on a finished planning process.
    #[error("planning process is already done")]
    ProcessDone,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanningError>;
