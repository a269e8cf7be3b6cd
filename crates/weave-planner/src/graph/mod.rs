//! The planning graph and its building blocks.
//!
//! A graph is an immutable chain of levels. The initial level holds task
//! provisions satisfying the goal; every extension level holds action
//! provisions supporting actions required by the level before it. Extending
//! a graph creates a new graph sharing its base.

mod action_provision;
mod chain;
mod levels;
mod plan;
mod provision;

pub use action_provision::ActionProvision;
pub use chain::Graph;
pub use levels::{ExtensionLevel, InitialLevel, Level, LevelRef};
pub use plan::Plan;
pub use provision::{PropertyProvision, Provision, TaskProvision};

use thiserror::Error;
use weave_models::ModelError;

/// Validation errors of graph values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A level without provisions.
    #[error("expecting one or more provisions")]
    EmptyLevel,

    /// An action provision with neither precursor nor property provisions.
    #[error("expecting a precursor or property provisions for {0}")]
    EmptyActionProvision(String),

    /// The requested action has cleared pre-conditions but no precursor.
    #[error("action {0} requires a precursor")]
    MissingPrecursor(String),

    /// The precursor does not establish the request's cleared pre-conditions.
    #[error("precursor cannot precede action {0}")]
    InvalidPrecursor(String),

    /// The precursor is neither required nor fills any requested property.
    #[error("precursor satisfies nothing for action {0}")]
    UselessPrecursor(String),

    /// Two property provisions cover the same requested property.
    #[error("multiple provisions for property {0}")]
    DuplicatePropertyProvision(String),

    /// A requested property lacks a provision.
    #[error("missing provision for property {0}")]
    UncoveredProperty(String),

    /// A provision covers a property the request does not need provided.
    #[error("property {0} is not requested")]
    UnexpectedPropertyProvision(String),

    /// An extension level requests actions not required by the last level.
    #[error("insufficient graph extension")]
    InsufficientExtension,

    /// A graph which is not fully satisfied was asserted to be a plan.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
