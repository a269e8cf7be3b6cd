//! Error types for the mashup model.

use thiserror::Error;

/// Errors raised while constructing model values.
///
/// These are data errors: a value violating one of its invariants is never
/// created, so callers see the failure at construction time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An identifier was empty.
    #[error("empty identifier for {0}")]
    EmptyIdentifier(&'static str),

    /// A proposition set would contain a proposition and its negation.
    #[error("contradictory propositions for property {0}")]
    ContradictoryPropositions(String),

    /// Two actions were expected to belong to the same widget.
    #[error("expecting actions of the same widget, got {expected} and {actual}")]
    WidgetMismatch {
        /// Widget of the reference action.
        expected: String,
        /// Widget of the offending action.
        actual: String,
    },

    /// Composition was requested without any action.
    #[error("expecting one or more actions to compose")]
    EmptyComposition,

    /// The given actions cannot be composed into one action.
    #[error("expecting composable actions")]
    NotComposable,

    /// An offer names a subject its action does not provide.
    #[error("{kind} {subject} is not provided by the offering action")]
    InvalidOffer {
        /// Kind of subject, e.g. `property` or `task`.
        kind: &'static str,
        /// Display form of the subject.
        subject: String,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
