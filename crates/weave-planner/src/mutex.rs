//! Pairwise action exclusion per graph level.
//!
//! Mutexes are computed once from the last level to the first. Two actions
//! of a level exclude each other when one publishes a property the other
//! requires cleared, or when their pre-conditions are mutex according to the
//! propositions carried down from the level after. A level's post-conditions
//! then become mutex for the level before when every pair of achieving
//! actions is mutex.

use crate::graph::{Graph, Level};
use std::collections::{BTreeMap, BTreeSet};
use weave_models::{Action, Proposition};

/// Symmetric set of excluded pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MutexSet<T: Ord> {
    pairs: BTreeMap<T, BTreeSet<T>>,
}

impl<T: Ord> Default for MutexSet<T> {
    fn default() -> Self {
        Self { pairs: BTreeMap::new() }
    }
}

impl<T: Ord + Clone> MutexSet<T> {
    fn insert(&mut self, x: &T, y: &T) {
        self.pairs.entry(x.clone()).or_default().insert(y.clone());
        self.pairs.entry(y.clone()).or_default().insert(x.clone());
    }

    fn contains(&self, x: &T, y: &T) -> bool {
        self.pairs.get(x).is_some_and(|excluded| excluded.contains(y))
    }

    fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Action mutexes of every level of a graph, keyed by level position
/// (0 for the initial level, `k` for the k-th extension).
#[derive(Debug, Clone)]
pub struct ActionMutexIndex {
    index: BTreeMap<usize, MutexSet<Action>>,
}

impl ActionMutexIndex {
    #[must_use]
    pub fn new(graph: &Graph) -> Self {
        let mut index = BTreeMap::new();
        let mut pre_mutexes = MutexSet::<Proposition>::default();

        for (position, level) in graph.levels().into_iter().enumerate().rev() {
            let actions = level.required_actions();
            let achievers = index_by_post_conditions(actions);
            let action_mutexes = determine_mutex_actions(actions, &pre_mutexes);
            pre_mutexes = propagate_mutexes(&action_mutexes, &achievers);
            index.insert(position, action_mutexes);
        }

        Self { index }
    }

    /// Checks whether two actions exclude each other at a level.
    pub fn is_mutex(&self, level: usize, a: &Action, b: &Action) -> bool {
        self.index.get(&level).is_some_and(|m| m.contains(a, b))
    }

    /// Checks whether a level contains any mutex actions.
    pub fn has_mutex_actions(&self, level: usize) -> bool {
        self.index.get(&level).is_some_and(|m| !m.is_empty())
    }

    /// Checks whether any level contains mutex actions.
    pub fn has_any_mutexes(&self) -> bool {
        self.index.values().any(|m| !m.is_empty())
    }
}

fn index_by_post_conditions(actions: &BTreeSet<Action>) -> BTreeMap<Proposition, BTreeSet<Action>> {
    let mut index: BTreeMap<Proposition, BTreeSet<Action>> = BTreeMap::new();
    for a in actions {
        for p in a.post_conditions() {
            index.entry(p.clone()).or_default().insert(a.clone());
        }
    }
    index
}

fn determine_mutex_actions(
    actions: &BTreeSet<Action>,
    pre_mutexes: &MutexSet<Proposition>,
) -> MutexSet<Action> {
    let mut mutexes = MutexSet::default();
    for (i, x) in actions.iter().enumerate() {
        for y in actions.iter().skip(i + 1) {
            if is_mashup_mutex(x, y)
                || is_mashup_mutex(y, x)
                || have_competing_needs(x, y, pre_mutexes)
            {
                mutexes.insert(x, y);
            }
        }
    }
    mutexes
}

fn propagate_mutexes(
    action_mutexes: &MutexSet<Action>,
    achievers: &BTreeMap<Proposition, BTreeSet<Action>>,
) -> MutexSet<Proposition> {
    let mut mutexes = MutexSet::default();
    for (i, (p, p_achievers)) in achievers.iter().enumerate() {
        for (q, q_achievers) in achievers.iter().skip(i + 1) {
            let achievable = p_achievers.iter().any(|ai| {
                q_achievers.iter().any(|aj| ai == aj || !action_mutexes.contains(ai, aj))
            });
            if !achievable {
                mutexes.insert(p, q);
            }
        }
    }
    mutexes
}

fn have_competing_needs(x: &Action, y: &Action, pre_mutexes: &MutexSet<Proposition>) -> bool {
    if pre_mutexes.is_empty() {
        return false;
    }
    x.pre_conditions()
        .iter()
        .any(|p| y.pre_conditions().iter().any(|q| pre_mutexes.contains(p, q)))
}

/// `x` publishes a property which `y` requires cleared.
fn is_mashup_mutex(x: &Action, y: &Action) -> bool {
    x.published_properties().iter().any(|p| y.pre_conditions().is_cleared(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ActionProvision, ExtensionLevel, InitialLevel, PropertyProvision, TaskProvision};
    use weave_models::{Property, PropositionSet, Task, Type, Widget};

    fn property(name: &str) -> Property {
        Property::new(name, Type::new("text").unwrap()).unwrap()
    }

    fn widget(id: &str) -> Widget {
        Widget::new(id).unwrap()
    }

    #[test]
    fn test_mashup_mutex_in_initial_level() {
        let p = property("p");
        let t1 = Task::new("t1").unwrap();
        let t2 = Task::new("t2").unwrap();
        let publisher = Action::builder(widget("x")).publishes(p.clone()).realizes(t1.clone()).build();
        let clearing = Action::builder(widget("w"))
            .pre_conditions(PropositionSet::cleared([p]))
            .realizes(t2.clone())
            .build();
        let graph = Graph::new(
            InitialLevel::new([
                TaskProvision::from_parts(t1.clone(), t1, publisher.clone()).unwrap(),
                TaskProvision::from_parts(t2.clone(), t2, clearing.clone()).unwrap(),
            ])
            .unwrap(),
        );

        let index = ActionMutexIndex::new(&graph);
        assert!(index.is_mutex(0, &publisher, &clearing));
        assert!(index.is_mutex(0, &clearing, &publisher));
        assert!(index.has_mutex_actions(0));
        assert!(index.has_any_mutexes());
        assert!(!index.is_mutex(1, &publisher, &clearing));
        assert!(!index.has_mutex_actions(7));
    }

    #[test]
    fn test_no_mutexes_for_independent_actions() {
        let t1 = Task::new("t1").unwrap();
        let t2 = Task::new("t2").unwrap();
        let a = Action::builder(widget("x")).realizes(t1.clone()).build();
        let b = Action::builder(widget("y")).realizes(t2.clone()).build();
        let graph = Graph::new(
            InitialLevel::new([
                TaskProvision::from_parts(t1.clone(), t1, a.clone()).unwrap(),
                TaskProvision::from_parts(t2.clone(), t2, b.clone()).unwrap(),
            ])
            .unwrap(),
        );

        let index = ActionMutexIndex::new(&graph);
        assert!(!index.is_mutex(0, &a, &b));
        assert!(!index.has_any_mutexes());
    }

    #[test]
    fn test_competing_needs_propagate_from_deeper_level() {
        // The only achievers of p and q are mutex, so a1 needing p and a2
        // needing q have competing needs.
        let p = property("p");
        let q = property("q");
        let r = property("r");
        let t1 = Task::new("t1").unwrap();
        let t2 = Task::new("t2").unwrap();

        let a1 = Action::builder(widget("w"))
            .pre_conditions(PropositionSet::filled([p.clone()]))
            .realizes(t1.clone())
            .build();
        let a2 = Action::builder(widget("v"))
            .pre_conditions(PropositionSet::filled([q.clone()]))
            .realizes(t2.clone())
            .build();
        let pp = Action::builder(widget("x"))
            .effects(PropositionSet::filled([p.clone()]))
            .publishes(p.clone())
            .publishes(r.clone())
            .build();
        let pq = Action::builder(widget("y"))
            .effects(PropositionSet::filled([q.clone()]))
            .publishes(q.clone())
            .build();
        let pq_blocked = Action::builder(widget("y"))
            .pre_conditions(PropositionSet::cleared([r]))
            .effects(PropositionSet::filled([q.clone()]))
            .publishes(q.clone())
            .build();

        let initial = InitialLevel::new([
            TaskProvision::from_parts(t1.clone(), t1, a1.clone()).unwrap(),
            TaskProvision::from_parts(t2.clone(), t2, a2.clone()).unwrap(),
        ])
        .unwrap();
        let extension = ExtensionLevel::new([
            ActionProvision::without_precursor(
                a1.clone(),
                [PropertyProvision::from_parts(p.clone(), p, pp.clone()).unwrap()],
            )
            .unwrap(),
            ActionProvision::without_precursor(
                a2.clone(),
                [PropertyProvision::from_parts(q.clone(), q, pq_blocked.clone()).unwrap()],
            )
            .unwrap(),
        ])
        .unwrap();
        let graph = Graph::with_extensions(initial, [extension]).unwrap();

        let index = ActionMutexIndex::new(&graph);
        assert!(index.is_mutex(1, &pp, &pq_blocked));
        assert!(!index.is_mutex(1, &pp, &pq));
        assert!(index.is_mutex(0, &a1, &a2));
        assert!(index.is_mutex(0, &a2, &a1));
    }
}
