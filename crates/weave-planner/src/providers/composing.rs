use super::{BasicProvisionProvider, PropertyProvisionProvider, RepositorySubject, TaskProvisionProvider};
use crate::combinatorics::PowerSet;
use crate::graph::{PropertyProvision, Provision, TaskProvision};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;
use weave_models::{Action, Offer, Property, Repository, Task, Widget};

/// Extends direct provisions with composites of one widget's offering
/// actions, so a single interaction step can provide several requests.
///
/// Every composable subset of a widget's offering actions is composed.
/// Singletons compose to themselves, which keeps the direct provisions.
pub struct ComposingProvisionProvider<S> {
    basic: BasicProvisionProvider<S>,
}

impl<S: RepositorySubject> ComposingProvisionProvider<S> {
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { basic: BasicProvisionProvider::new(repository) }
    }

    pub fn provisions(&self, requests: &BTreeSet<S>) -> BTreeSet<Provision<S>> {
        let direct = self.basic.provisions(requests);

        let mut requests_by_offer: BTreeMap<S, BTreeSet<S>> = BTreeMap::new();
        let mut actions_by_widget: BTreeMap<Widget, BTreeSet<Action>> = BTreeMap::new();
        for provision in &direct {
            requests_by_offer
                .entry(provision.offered_subject().clone())
                .or_default()
                .insert(provision.request().clone());
            let action = provision.providing_action();
            actions_by_widget.entry(action.widget().clone()).or_default().insert(action.clone());
        }

        let mut provisions = BTreeSet::new();
        for (widget, actions) in actions_by_widget {
            let mut subsets = PowerSet::new(actions);
            while let Some(subset) = subsets.next() {
                if !Action::is_composable(&subset) {
                    subsets.exclude_supersets_of(&subset);
                    continue;
                }
                let Ok(composite) = Action::compose(subset) else {
                    continue;
                };
                for (offered, requested) in &requests_by_offer {
                    let Ok(offer) = Offer::new(offered.clone(), composite.clone()) else {
                        continue;
                    };
                    provisions.extend(
                        requested.iter().map(|request| Provision::new(request.clone(), offer.clone())),
                    );
                }
            }
            debug!(widget = %widget, provisions = provisions.len(), "composed offering actions");
        }
        provisions
    }
}

pub type ComposingTaskProvisionProvider = ComposingProvisionProvider<Task>;

pub type ComposingPropertyProvisionProvider = ComposingProvisionProvider<Property>;

impl TaskProvisionProvider for ComposingTaskProvisionProvider {
    fn provisions_for_tasks(&self, tasks: &BTreeSet<Task>) -> BTreeSet<TaskProvision> {
        self.provisions(tasks)
    }
}

impl PropertyProvisionProvider for ComposingPropertyProvisionProvider {
    fn provisions_for_properties(
        &self,
        properties: &BTreeSet<Property>,
    ) -> BTreeSet<PropertyProvision> {
        self.provisions(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_models::{InMemoryRepository, PropositionSet, Type};

    fn property(name: &str) -> Property {
        Property::new(name, Type::new("text").unwrap()).unwrap()
    }

    #[test]
    fn test_composes_actions_of_one_widget() {
        let w = Widget::new("w").unwrap();
        let t1 = Task::new("t1").unwrap();
        let t2 = Task::new("t2").unwrap();
        let a1 = Action::builder(w.clone()).realizes(t1.clone()).build();
        let a2 = Action::builder(w).realizes(t2.clone()).build();
        let repository = InMemoryRepository::new().with_action(a1.clone()).with_action(a2.clone());
        let provider = ComposingTaskProvisionProvider::new(Arc::new(repository));

        let provisions = provider.provisions_for_tasks(&BTreeSet::from([t1.clone(), t2.clone()]));
        let composite = Action::compose([a1.clone(), a2.clone()]).unwrap();

        assert_eq!(
            provisions,
            BTreeSet::from([
                TaskProvision::from_parts(t1.clone(), t1.clone(), a1).unwrap(),
                TaskProvision::from_parts(t2.clone(), t2.clone(), a2).unwrap(),
                TaskProvision::from_parts(t1.clone(), t1, composite.clone()).unwrap(),
                TaskProvision::from_parts(t2.clone(), t2, composite).unwrap(),
            ])
        );
    }

    #[test]
    fn test_skips_mutex_actions() {
        let w = Widget::new("w").unwrap();
        let p = property("p");
        let q = property("q");
        let filling = Action::builder(w.clone())
            .effects(PropositionSet::filled([p.clone()]))
            .publishes(p.clone())
            .build();
        let clearing = Action::builder(w)
            .pre_conditions(PropositionSet::filled([q.clone()]))
            .effects(PropositionSet::cleared([p.clone()]))
            .publishes(q.clone())
            .build();
        let repository =
            InMemoryRepository::new().with_action(filling.clone()).with_action(clearing.clone());
        let provider = ComposingPropertyProvisionProvider::new(Arc::new(repository));

        let provisions = provider.provisions_for_properties(&BTreeSet::from([p, q]));
        assert_eq!(provisions.len(), 2);
        assert!(provisions.iter().all(|pp| !pp.providing_action().is_composite()));
    }

    #[test]
    fn test_keeps_widgets_apart() {
        let t1 = Task::new("t1").unwrap();
        let t2 = Task::new("t2").unwrap();
        let a1 = Action::builder(Widget::new("w").unwrap()).realizes(t1.clone()).build();
        let a2 = Action::builder(Widget::new("v").unwrap()).realizes(t2.clone()).build();
        let repository = InMemoryRepository::new().with_action(a1).with_action(a2);
        let provider = ComposingTaskProvisionProvider::new(Arc::new(repository));

        let provisions = provider.provisions_for_tasks(&BTreeSet::from([t1, t2]));
        assert_eq!(provisions.len(), 2);
    }
}
