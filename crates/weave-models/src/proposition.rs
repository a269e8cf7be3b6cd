//! Propositions about property state and consistent sets of them.

use crate::error::{ModelError, Result};
use crate::identifiers::Property;
use std::collections::BTreeSet;
use std::fmt;

/// Assertion that a property is either filled or cleared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proposition {
    property: Property,
    filled: bool,
}

impl Proposition {
    /// Asserts that `property` holds a value.
    #[must_use]
    pub fn filled(property: Property) -> Self {
        Self { property, filled: true }
    }

    /// Asserts that `property` holds no value.
    #[must_use]
    pub fn cleared(property: Property) -> Self {
        Self { property, filled: false }
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn is_cleared(&self) -> bool {
        !self.filled
    }

    /// Returns the proposition asserting the opposite state.
    #[must_use]
    pub fn negation(&self) -> Self {
        Self { property: self.property.clone(), filled: !self.filled }
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.filled { "filled" } else { "cleared" };
        write!(f, "{}({})", state, self.property)
    }
}

/// A set of propositions never containing a proposition and its negation.
///
/// Used for both pre-conditions and effects of actions. Ordering is
/// deterministic, which keeps every structure built on top of it stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropositionSet {
    propositions: BTreeSet<Proposition>,
}

impl PropositionSet {
    /// Creates a proposition set, rejecting contradictions.
    ///
    /// # Errors
    /// Returns `ModelError::ContradictoryPropositions` if a property is both
    /// filled and cleared.
    pub fn new(propositions: impl IntoIterator<Item = Proposition>) -> Result<Self> {
        let mut set = BTreeSet::new();
        for p in propositions {
            if set.contains(&p.negation()) {
                return Err(ModelError::ContradictoryPropositions(p.property.to_string()));
            }
            set.insert(p);
        }
        Ok(Self { propositions: set })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set asserting every given property cleared.
    #[must_use]
    pub fn cleared(properties: impl IntoIterator<Item = Property>) -> Self {
        Self { propositions: properties.into_iter().map(Proposition::cleared).collect() }
    }

    /// Creates a set asserting every given property filled.
    #[must_use]
    pub fn filled(properties: impl IntoIterator<Item = Property>) -> Self {
        Self { propositions: properties.into_iter().map(Proposition::filled).collect() }
    }

    /// Creates a set from properties to clear and properties to fill.
    ///
    /// # Errors
    /// Returns `ModelError::ContradictoryPropositions` if both sides share a
    /// property.
    pub fn from_properties(
        cleared: impl IntoIterator<Item = Property>,
        filled: impl IntoIterator<Item = Property>,
    ) -> Result<Self> {
        Self::new(
            cleared
                .into_iter()
                .map(Proposition::cleared)
                .chain(filled.into_iter().map(Proposition::filled)),
        )
    }

    pub fn contains(&self, proposition: &Proposition) -> bool {
        self.propositions.contains(proposition)
    }

    pub fn is_cleared(&self, property: &Property) -> bool {
        self.contains(&Proposition::cleared(property.clone()))
    }

    pub fn is_filled(&self, property: &Property) -> bool {
        self.contains(&Proposition::filled(property.clone()))
    }

    /// Returns true if the set says anything about `property`.
    pub fn mentions(&self, property: &Property) -> bool {
        self.is_cleared(property) || self.is_filled(property)
    }

    pub fn cleared_properties(&self) -> BTreeSet<Property> {
        self.propositions.iter().filter(|p| p.is_cleared()).map(|p| p.property.clone()).collect()
    }

    pub fn filled_properties(&self) -> BTreeSet<Property> {
        self.propositions.iter().filter(|p| p.is_filled()).map(|p| p.property.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposition> {
        self.propositions.iter()
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    /// Derives post-conditions, treating `self` as effects applied on `pre`.
    ///
    /// Effects always win; pre-conditions about properties the effects do
    /// not touch carry over unchanged.
    #[must_use]
    pub fn create_post_conditions(&self, pre: &PropositionSet) -> PropositionSet {
        let mut post = self.propositions.clone();
        post.extend(pre.iter().filter(|p| !self.mentions(&p.property)).cloned());
        PropositionSet { propositions: post }
    }

    /// Returns the union of both sets.
    ///
    /// # Errors
    /// Returns `ModelError::ContradictoryPropositions` if the union is
    /// contradictory.
    pub fn union(&self, other: &PropositionSet) -> Result<PropositionSet> {
        Self::new(self.iter().chain(other.iter()).cloned())
    }
}

impl fmt::Display for PropositionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, p) in self.propositions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{p}")?;
        }
        f.write_str("}")
    }
}

impl<'a> IntoIterator for &'a PropositionSet {
    type Item = &'a Proposition;
    type IntoIter = std::collections::btree_set::Iter<'a, Proposition>;

    fn into_iter(self) -> Self::IntoIter {
        self.propositions.iter()
    }
}
