//! Read-only query surface over widgets and their actions.

use crate::action::Action;
use crate::identifiers::{Property, Task, Type, Widget};
use crate::offer::{Offer, PublishedProperty, RealizedTask};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Supplies candidate actions and offers to the planner.
///
/// Implementations must be side-effect free: the planner queries them
/// repeatedly without caching.
pub trait Repository: Send + Sync {
    /// All actions of a widget.
    fn widget_actions(&self, widget: &Widget) -> BTreeSet<Action>;

    /// Offers of tasks compatible with the requested task.
    fn compatible_tasks(&self, task: &Task) -> BTreeSet<RealizedTask>;

    /// Offers of properties compatible with the requested property.
    fn compatible_properties(&self, property: &Property) -> BTreeSet<PublishedProperty>;
}

/// Repository holding all actions in memory.
///
/// Tasks match by equality. A published property matches a request with the
/// same name when its type equals the requested type or is a declared
/// subtype of it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    actions: BTreeMap<Widget, BTreeSet<Action>>,
    supertypes: BTreeMap<Type, BTreeSet<Type>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action under its widget.
    pub fn add_action(&mut self, action: Action) {
        self.actions.entry(action.widget().clone()).or_default().insert(action);
    }

    /// Registers an action, builder style.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.add_action(action);
        self
    }

    /// Declares `sub` to be a direct subtype of `sup`.
    pub fn declare_subtype(&mut self, sub: Type, sup: Type) {
        self.supertypes.entry(sub).or_default().insert(sup);
    }

    /// Checks whether `sub` equals `sup` or is a transitive subtype of it.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending = vec![sub];
        while let Some(t) = pending.pop() {
            if t == sup {
                return true;
            }
            if seen.insert(t) {
                if let Some(parents) = self.supertypes.get(t) {
                    pending.extend(parents.iter());
                }
            }
        }
        false
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.actions.keys()
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values().flatten()
    }
}

impl Repository for InMemoryRepository {
    fn widget_actions(&self, widget: &Widget) -> BTreeSet<Action> {
        self.actions.get(widget).cloned().unwrap_or_default()
    }

    fn compatible_tasks(&self, task: &Task) -> BTreeSet<RealizedTask> {
        let offers: BTreeSet<RealizedTask> = self
            .actions()
            .filter(|a| a.realizes(task))
            .filter_map(|a| Offer::new(task.clone(), a.clone()).ok())
            .collect();
        debug!(task = %task, offers = offers.len(), "resolved compatible tasks");
        offers
    }

    fn compatible_properties(&self, property: &Property) -> BTreeSet<PublishedProperty> {
        let mut offers = BTreeSet::new();
        for action in self.actions() {
            for published in action.published_properties() {
                if published.name() == property.name()
                    && self.is_subtype(published.ty(), property.ty())
                {
                    if let Ok(offer) = Offer::new(published.clone(), action.clone()) {
                        offers.insert(offer);
                    }
                }
            }
        }
        debug!(property = %property, offers = offers.len(), "resolved compatible properties");
        offers
    }
}
