//! Mashup models for the Weave planner.
//!
//! Widgets expose actions. Actions have pre-conditions and effects over
//! properties, may publish properties to other widgets and may realize
//! tasks. This crate holds those value types, the proposition algebra the
//! planner reasons with, and the [`Repository`] query contract.

pub mod action;
pub mod error;
pub mod identifiers;
pub mod offer;
pub mod proposition;
pub mod repository;

pub use action::{Action, ActionBuilder};
pub use error::{ModelError, Result};
pub use identifiers::{Interaction, Property, Task, Type, Widget};
pub use offer::{Offer, PublishedProperty, RealizedTask, Subject};
pub use proposition::{Proposition, PropositionSet};
pub use repository::{InMemoryRepository, Repository};
