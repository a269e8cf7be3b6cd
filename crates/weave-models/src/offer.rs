//! Offers pair a subject with the action providing it.

use crate::action::Action;
use crate::error::{ModelError, Result};
use crate::identifiers::{Property, Task};
use std::fmt;
use std::hash::Hash;

/// Something an action can provide to a requester.
pub trait Subject: Clone + Ord + Hash + fmt::Debug + fmt::Display {
    /// Name of the subject kind, used in error messages.
    const KIND: &'static str;

    /// Checks whether `action` provides this subject.
    fn is_offered_by(&self, action: &Action) -> bool;

    /// Subjects of this kind offered by `action`.
    fn offered_by(action: &Action) -> Vec<Self>;
}

impl Subject for Property {
    const KIND: &'static str = "property";

    fn is_offered_by(&self, action: &Action) -> bool {
        action.publishes(self)
    }

    fn offered_by(action: &Action) -> Vec<Self> {
        action.published_properties().iter().cloned().collect()
    }
}

impl Subject for Task {
    const KIND: &'static str = "task";

    fn is_offered_by(&self, action: &Action) -> bool {
        action.realizes(self)
    }

    fn offered_by(action: &Action) -> Vec<Self> {
        action.realized_tasks().iter().cloned().collect()
    }
}

/// A subject together with an action providing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offer<S: Subject> {
    subject: S,
    action: Action,
}

impl<S: Subject> Offer<S> {
    /// Creates an offer.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidOffer` if `action` does not provide
    /// `subject`.
    pub fn new(subject: S, action: Action) -> Result<Self> {
        if !subject.is_offered_by(&action) {
            return Err(ModelError::InvalidOffer { kind: S::KIND, subject: subject.to_string() });
        }
        Ok(Self { subject, action })
    }

    pub fn subject(&self) -> &S {
        &self.subject
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

/// A property published by an action.
pub type PublishedProperty = Offer<Property>;

/// A task realized by an action.
pub type RealizedTask = Offer<Task>;
