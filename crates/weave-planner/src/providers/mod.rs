//! Providers resolve requests of the planner against a repository.
//!
//! Task and property providers turn repository offers into provisions for
//! the requested subjects. Precursor providers supply same-widget actions to
//! run immediately before a requested action.

mod basic;
mod composing;
mod precursor;

pub use basic::{
    BasicPrecursorActionProvider, BasicPropertyProvisionProvider, BasicProvisionProvider,
    BasicTaskProvisionProvider,
};
pub use composing::{
    ComposingPropertyProvisionProvider, ComposingProvisionProvider, ComposingTaskProvisionProvider,
};
pub use precursor::{ComposingExtendedPrecursorActionProvider, ComposingMinimalPrecursorActionProvider};

use crate::graph::{PropertyProvision, TaskProvision};
use std::collections::BTreeSet;
use weave_models::{Action, Offer, Property, Repository, Subject, Task};

/// Resolves requested tasks into task provisions.
pub trait TaskProvisionProvider: Send + Sync {
    fn provisions_for_tasks(&self, tasks: &BTreeSet<Task>) -> BTreeSet<TaskProvision>;
}

/// Resolves requested properties into property provisions.
pub trait PropertyProvisionProvider: Send + Sync {
    fn provisions_for_properties(&self, properties: &BTreeSet<Property>)
    -> BTreeSet<PropertyProvision>;
}

/// Supplies candidate precursors for an action.
///
/// Candidates need not be filtered; the extender checks each one with
/// [`Action::can_be_precursor_of`].
pub trait PrecursorActionProvider: Send + Sync {
    fn precursor_actions_for(&self, action: &Action) -> BTreeSet<Action>;
}

/// A subject kind the repository can offer.
pub trait RepositorySubject: Subject + Send + Sync {
    fn compatible_offers(repository: &dyn Repository, request: &Self) -> BTreeSet<Offer<Self>>;
}

impl RepositorySubject for Task {
    fn compatible_offers(repository: &dyn Repository, request: &Self) -> BTreeSet<Offer<Self>> {
        repository.compatible_tasks(request)
    }
}

impl RepositorySubject for Property {
    fn compatible_offers(repository: &dyn Repository, request: &Self) -> BTreeSet<Offer<Self>> {
        repository.compatible_properties(request)
    }
}
