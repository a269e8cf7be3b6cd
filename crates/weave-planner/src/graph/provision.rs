use std::fmt;
use weave_models::{Action, ModelError, Offer, Property, Subject, Task};

/// A match between a requested subject and an offer.
///
/// The offered subject may differ from the request when the repository
/// considers them compatible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Provision<S: Subject> {
    request: S,
    offer: Offer<S>,
}

impl<S: Subject> Provision<S> {
    #[must_use]
    pub fn new(request: S, offer: Offer<S>) -> Self {
        Self { request, offer }
    }

    /// Creates a provision from its parts, validating the offer.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidOffer` if `action` does not provide
    /// `subject`.
    pub fn from_parts(request: S, subject: S, action: Action) -> Result<Self, ModelError> {
        Ok(Self::new(request, Offer::new(subject, action)?))
    }

    pub fn request(&self) -> &S {
        &self.request
    }

    pub fn offer(&self) -> &Offer<S> {
        &self.offer
    }

    pub fn offered_subject(&self) -> &S {
        self.offer.subject()
    }

    pub fn providing_action(&self) -> &Action {
        self.offer.action()
    }
}

impl<S: Subject> fmt::Display for Provision<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {} by {}", self.request, self.offer.subject(), self.offer.action())
    }
}

/// Provision of a goal task.
pub type TaskProvision = Provision<Task>;

/// Provision of a property published by another widget.
pub type PropertyProvision = Provision<Property>;
