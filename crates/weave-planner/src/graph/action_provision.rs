use super::provision::PropertyProvision;
use super::{GraphError, Result};
use std::collections::BTreeSet;
use std::fmt;
use weave_models::{Action, Property};

/// Describes how a requested action becomes satisfiable.
///
/// An optional precursor of the same widget runs immediately before the
/// request and establishes its cleared pre-conditions and possibly some
/// filled ones. Every filled pre-condition left over is covered by exactly
/// one property provision of another widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionProvision {
    request: Action,
    precursor: Option<Action>,
    property_provisions: BTreeSet<PropertyProvision>,
}

impl ActionProvision {
    /// Creates an action provision with a precursor.
    pub fn with_precursor(
        request: Action,
        precursor: Action,
        property_provisions: impl IntoIterator<Item = PropertyProvision>,
    ) -> Result<Self> {
        Self::new(request, Some(precursor), property_provisions)
    }

    /// Creates an action provision relying on property provisions only.
    pub fn without_precursor(
        request: Action,
        property_provisions: impl IntoIterator<Item = PropertyProvision>,
    ) -> Result<Self> {
        Self::new(request, None, property_provisions)
    }

    /// Creates an action provision.
    ///
    /// # Errors
    /// Returns a `GraphError` when
    /// - the precursor belongs to another widget or cannot precede the request,
    /// - the precursor is neither required nor fills a requested property,
    /// - the request needs a precursor but none is given,
    /// - a requested property is covered twice, not covered, or needs no
    ///   provision at all.
    pub fn new(
        request: Action,
        precursor: Option<Action>,
        property_provisions: impl IntoIterator<Item = PropertyProvision>,
    ) -> Result<Self> {
        let property_provisions: BTreeSet<PropertyProvision> =
            property_provisions.into_iter().collect();

        let mut provided = BTreeSet::new();
        for pp in &property_provisions {
            if !provided.insert(pp.request().clone()) {
                return Err(GraphError::DuplicatePropertyProvision(pp.request().to_string()));
            }
        }

        let unmet = match &precursor {
            Some(p) => {
                let unmet = request.filled_properties_not_satisfied_by(p)?;
                if !p.can_be_precursor_of(&request) {
                    return Err(GraphError::InvalidPrecursor(request.to_string()));
                }
                if !request.requires_precursor()
                    && unmet.len() == request.filled_pre_properties().len()
                {
                    return Err(GraphError::UselessPrecursor(request.to_string()));
                }
                unmet
            }
            None => {
                if request.requires_precursor() {
                    return Err(GraphError::MissingPrecursor(request.to_string()));
                }
                if request.filled_pre_properties().is_empty() {
                    return Err(GraphError::EmptyActionProvision(request.to_string()));
                }
                request.filled_pre_properties().clone()
            }
        };

        if let Some(extra) = provided.difference(&unmet).next() {
            return Err(GraphError::UnexpectedPropertyProvision(extra.to_string()));
        }
        if let Some(missing) = unmet.difference(&provided).next() {
            return Err(GraphError::UncoveredProperty(missing.to_string()));
        }

        Ok(Self { request, precursor, property_provisions })
    }

    pub fn requested_action(&self) -> &Action {
        &self.request
    }

    pub fn precursor(&self) -> Option<&Action> {
        self.precursor.as_ref()
    }

    pub fn property_provisions(&self) -> &BTreeSet<PropertyProvision> {
        &self.property_provisions
    }

    /// Properties covered by property provisions.
    pub fn requested_properties(&self) -> BTreeSet<Property> {
        self.property_provisions.iter().map(|pp| pp.request().clone()).collect()
    }

    /// Actions providing properties to the request.
    pub fn providing_actions(&self) -> BTreeSet<Action> {
        self.property_provisions.iter().map(|pp| pp.providing_action().clone()).collect()
    }

    /// Providing actions plus the precursor, if any.
    pub fn required_actions(&self) -> BTreeSet<Action> {
        let mut actions = self.providing_actions();
        actions.extend(self.precursor.iter().cloned());
        actions
    }
}

impl fmt::Display for ActionProvision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.request)?;
        if let Some(p) = &self.precursor {
            write!(f, " after {p}")?;
        }
        for pp in &self.property_provisions {
            write!(f, "; {} <- {}", pp.request(), pp.providing_action())?;
        }
        Ok(())
    }
}
