use super::{
    PrecursorActionProvider, PropertyProvisionProvider, RepositorySubject, TaskProvisionProvider,
};
use crate::graph::{PropertyProvision, Provision, TaskProvision};
use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;
use weave_models::{Action, Property, Repository, Task};

/// Queries the repository once per requested subject and unions the
/// results.
pub struct BasicProvisionProvider<S> {
    repository: Arc<dyn Repository>,
    subject: PhantomData<fn() -> S>,
}

impl<S: RepositorySubject> BasicProvisionProvider<S> {
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository, subject: PhantomData }
    }

    pub fn provisions(&self, requests: &BTreeSet<S>) -> BTreeSet<Provision<S>> {
        let provisions: BTreeSet<Provision<S>> = requests
            .iter()
            .flat_map(|request| {
                S::compatible_offers(self.repository.as_ref(), request)
                    .into_iter()
                    .map(move |offer| Provision::new(request.clone(), offer))
            })
            .collect();
        debug!(
            kind = S::KIND,
            requests = requests.len(),
            provisions = provisions.len(),
            "resolved provisions"
        );
        provisions
    }
}

pub type BasicTaskProvisionProvider = BasicProvisionProvider<Task>;

pub type BasicPropertyProvisionProvider = BasicProvisionProvider<Property>;

impl TaskProvisionProvider for BasicTaskProvisionProvider {
    fn provisions_for_tasks(&self, tasks: &BTreeSet<Task>) -> BTreeSet<TaskProvision> {
        self.provisions(tasks)
    }
}

impl PropertyProvisionProvider for BasicPropertyProvisionProvider {
    fn provisions_for_properties(
        &self,
        properties: &BTreeSet<Property>,
    ) -> BTreeSet<PropertyProvision> {
        self.provisions(properties)
    }
}

/// Offers the widget's own actions able to precede the request.
pub struct BasicPrecursorActionProvider {
    repository: Arc<dyn Repository>,
}

impl BasicPrecursorActionProvider {
    #[must_use]
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }
}

impl PrecursorActionProvider for BasicPrecursorActionProvider {
    fn precursor_actions_for(&self, action: &Action) -> BTreeSet<Action> {
        self.repository
            .widget_actions(action.widget())
            .into_iter()
            .filter(|candidate| candidate.can_be_precursor_of(action))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_models::{InMemoryRepository, PropositionSet, Type, Widget};

    fn property(name: &str) -> Property {
        Property::new(name, Type::new("text").unwrap()).unwrap()
    }

    #[test]
    fn test_task_provisions_carry_request() {
        let t = Task::new("t").unwrap();
        let a = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();
        let repository = Arc::new(InMemoryRepository::new().with_action(a.clone()));
        let provider = BasicTaskProvisionProvider::new(repository);

        let provisions = provider.provisions_for_tasks(&BTreeSet::from([t.clone()]));
        assert_eq!(provisions.len(), 1);
        let provision = provisions.iter().next().unwrap();
        assert_eq!(provision.request(), &t);
        assert_eq!(provision.providing_action(), &a);

        let unknown = BTreeSet::from([Task::new("u").unwrap()]);
        assert!(provider.provisions_for_tasks(&unknown).is_empty());
    }

    #[test]
    fn test_property_provisions_follow_subtypes() {
        let mut repository = InMemoryRepository::new();
        repository.declare_subtype(Type::new("email").unwrap(), Type::new("text").unwrap());
        let email = Property::new("contact", Type::new("email").unwrap()).unwrap();
        let publisher = Action::builder(Widget::new("x").unwrap())
            .effects(PropositionSet::filled([email.clone()]))
            .publishes(email.clone())
            .build();
        repository.add_action(publisher);
        let provider = BasicPropertyProvisionProvider::new(Arc::new(repository));

        let request = property("contact");
        let provisions = provider.provisions_for_properties(&BTreeSet::from([request.clone()]));
        assert_eq!(provisions.len(), 1);
        let provision = provisions.iter().next().unwrap();
        assert_eq!(provision.request(), &request);
        assert_eq!(provision.offered_subject(), &email);
    }

    #[test]
    fn test_precursors_are_filtered() {
        let w = Widget::new("w").unwrap();
        let p = property("p");
        let request = Action::builder(w.clone())
            .pre_conditions(PropositionSet::cleared([p.clone()]))
            .realizes(Task::new("t").unwrap())
            .build();
        let clearing = Action::builder(w.clone()).effects(PropositionSet::cleared([p])).build();
        let idle = Action::builder(w).interaction(weave_models::Interaction::new("wait")).build();
        let repository = InMemoryRepository::new().with_action(clearing.clone()).with_action(idle);
        let provider = BasicPrecursorActionProvider::new(Arc::new(repository));

        assert_eq!(provider.precursor_actions_for(&request), BTreeSet::from([clearing]));
    }
}
