use super::PrecursorActionProvider;
use crate::combinatorics::PowerSet;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use weave_models::{Action, Property, PropositionSet, Repository, Widget};

/// Composes minimal precursors from partial ones.
///
/// A partial precursor clears some of the properties the request requires
/// cleared without filling any of them first. Partials are combined with
/// maintenance actions keeping a property cleared, and every composite
/// able to precede the request is returned. Supersets of a returned
/// composite add nothing and are skipped.
pub struct ComposingMinimalPrecursorActionProvider {
    repository: Arc<dyn Repository>,
}

impl ComposingMinimalPrecursorActionProvider {
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    fn partial_precursors(&self, action: &Action) -> BTreeSet<Action> {
        let mut partials: BTreeSet<Action> = self
            .repository
            .widget_actions(action.widget())
            .into_iter()
            .filter(|candidate| is_partial_precursor(candidate, action))
            .collect();
        partials.extend(
            action
                .cleared_pre_properties()
                .iter()
                .map(|p| maintenance(action.widget(), PropositionSet::cleared([p.clone()]))),
        );
        partials
    }
}

impl PrecursorActionProvider for ComposingMinimalPrecursorActionProvider {
    fn precursor_actions_for(&self, action: &Action) -> BTreeSet<Action> {
        let mut precursors = BTreeSet::new();
        let mut subsets = PowerSet::new(self.partial_precursors(action));
        while let Some(subset) = subsets.next() {
            if !Action::is_composable(&subset) {
                subsets.exclude_supersets_of(&subset);
                continue;
            }
            let Ok(composite) = Action::compose(subset.iter().cloned()) else {
                continue;
            };
            if !composite.is_maintenance() && composite.can_be_precursor_of(action) {
                precursors.insert(composite);
                subsets.exclude_supersets_of(&subset);
            }
        }
        debug!(action = %action, precursors = precursors.len(), "composed minimal precursors");
        precursors
    }
}

/// Extends precursors of another provider with actions filling properties
/// the request requires filled.
pub struct ComposingExtendedPrecursorActionProvider {
    repository: Arc<dyn Repository>,
    precursors: Arc<dyn PrecursorActionProvider>,
}

impl ComposingExtendedPrecursorActionProvider {
    #[must_use]
    pub fn new(
        repository: Arc<dyn Repository>,
        precursors: Arc<dyn PrecursorActionProvider>,
    ) -> Self {
        Self { repository, precursors }
    }

    fn filling_actions(&self, action: &Action) -> BTreeSet<Action> {
        let required = action.filled_pre_properties();
        let mut filling: BTreeSet<Action> = self
            .repository
            .widget_actions(action.widget())
            .into_iter()
            .filter(|candidate| {
                candidate.post_conditions().filled_properties().iter().any(|p| required.contains(p))
            })
            .collect();
        filling.extend(
            required
                .iter()
                .map(|p| maintenance(action.widget(), PropositionSet::filled([p.clone()]))),
        );
        filling
    }
}

impl PrecursorActionProvider for ComposingExtendedPrecursorActionProvider {
    fn precursor_actions_for(&self, action: &Action) -> BTreeSet<Action> {
        let base = self.precursors.precursor_actions_for(action);
        let filling = self.filling_actions(action);
        let mut precursors = base.clone();

        for precursor in &base {
            let mut subsets = PowerSet::new(filling.iter().cloned());
            while let Some(subset) = subsets.next() {
                let mut combination: BTreeSet<Action> = subset.iter().cloned().collect();
                combination.insert(precursor.clone());
                if !Action::is_composable(&combination) {
                    subsets.exclude_supersets_of(&subset);
                    continue;
                }
                if let Ok(composite) = Action::compose(combination) {
                    precursors.insert(composite);
                }
            }
        }
        debug!(action = %action, precursors = precursors.len(), "composed extended precursors");
        precursors
    }
}

fn maintenance(widget: &Widget, pre_conditions: PropositionSet) -> Action {
    Action::maintenance(widget.clone(), pre_conditions)
}

/// Clears a property `action` requires cleared before filling any of them,
/// in property order.
fn is_partial_precursor(candidate: &Action, action: &Action) -> bool {
    let post = candidate.post_conditions();
    action
        .cleared_pre_properties()
        .iter()
        .find_map(|p: &Property| {
            if post.is_cleared(p) {
                Some(true)
            } else if post.is_filled(p) {
                Some(false)
            } else {
                None
            }
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::BasicPrecursorActionProvider;
    use weave_models::{InMemoryRepository, Interaction, Task, Type};

    fn property(name: &str) -> Property {
        Property::new(name, Type::new("text").unwrap()).unwrap()
    }

    fn widget() -> Widget {
        Widget::new("w").unwrap()
    }

    #[test]
    fn test_minimal_precursor_combines_partials() {
        let p = property("p");
        let q = property("q");
        let request = Action::builder(widget())
            .pre_conditions(PropositionSet::cleared([p.clone(), q.clone()]))
            .realizes(Task::new("t").unwrap())
            .build();
        let clear_p = Action::builder(widget())
            .effects(PropositionSet::cleared([p.clone()]))
            .interaction(Interaction::new("reset p"))
            .build();
        let clear_q = Action::builder(widget())
            .effects(PropositionSet::cleared([q.clone()]))
            .interaction(Interaction::new("reset q"))
            .build();
        let repository =
            InMemoryRepository::new().with_action(clear_p.clone()).with_action(clear_q.clone());
        let provider = ComposingMinimalPrecursorActionProvider::new(Arc::new(repository));

        let precursors = provider.precursor_actions_for(&request);

        let keep_p = Action::maintenance(widget(), PropositionSet::cleared([p]));
        let keep_q = Action::maintenance(widget(), PropositionSet::cleared([q]));
        assert!(precursors.contains(&Action::compose([clear_p.clone(), clear_q.clone()]).unwrap()));
        assert!(precursors.contains(&Action::compose([clear_p.clone(), keep_q]).unwrap()));
        assert!(precursors.contains(&Action::compose([clear_q.clone(), keep_p]).unwrap()));
        assert!(!precursors.contains(&clear_p));
        assert!(precursors.iter().all(|a| a.can_be_precursor_of(&request)));
        assert!(precursors.iter().all(|a| !a.is_maintenance()));
    }

    #[test]
    fn test_partial_precursor_must_not_fill_first() {
        let p = property("p");
        let request = Action::builder(widget())
            .pre_conditions(PropositionSet::cleared([p.clone()]))
            .build();
        let filling = Action::builder(widget()).effects(PropositionSet::filled([p.clone()])).build();
        let clearing = Action::builder(widget()).effects(PropositionSet::cleared([p])).build();

        assert!(!is_partial_precursor(&filling, &request));
        assert!(is_partial_precursor(&clearing, &request));
    }

    #[test]
    fn test_extended_precursor_adds_filling_actions() {
        let c = property("c");
        let f = property("f");
        let request = Action::builder(widget())
            .pre_conditions(PropositionSet::from_properties([c.clone()], [f.clone()]).unwrap())
            .build();
        let clearing = Action::builder(widget()).effects(PropositionSet::cleared([c])).build();
        let filling = Action::builder(widget())
            .effects(PropositionSet::filled([f.clone()]))
            .interaction(Interaction::new("type"))
            .build();
        let repository: Arc<dyn Repository> =
            Arc::new(InMemoryRepository::new().with_action(clearing.clone()).with_action(filling.clone()));
        let provider = ComposingExtendedPrecursorActionProvider::new(
            repository.clone(),
            Arc::new(BasicPrecursorActionProvider::new(repository)),
        );

        let precursors = provider.precursor_actions_for(&request);

        let extended = Action::compose([clearing.clone(), filling]).unwrap();
        assert!(precursors.contains(&clearing));
        assert!(precursors.contains(&extended));
        assert!(request.filled_properties_not_satisfied_by(&extended).unwrap().is_empty());
        assert!(precursors.iter().all(|a| a.can_be_precursor_of(&request)));
    }
}
