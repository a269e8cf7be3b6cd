//! Reachability of actions within a graph.
//!
//! An action is reachable at a level when it is enabled, or when some
//! provision of the next level requests it and every action that provision
//! requires is itself reachable there. Actions which are not reachable can
//! never be enabled within the graph's depth, so extraction prunes them.

use crate::graph::{ExtensionLevel, Graph, Level};
use std::collections::{BTreeMap, BTreeSet};
use weave_models::Action;

/// Reachable actions per level position (0 for the initial level, `k` for
/// the k-th extension).
#[derive(Debug, Clone)]
pub struct ActionReachabilityIndex {
    index: BTreeMap<usize, BTreeSet<Action>>,
}

impl ActionReachabilityIndex {
    #[must_use]
    pub fn new(graph: &Graph) -> Self {
        let mut index = BTreeMap::new();
        let mut targets = BTreeSet::new();

        for (offset, level) in graph.extension_levels_rev().enumerate() {
            let position = graph.extension_depth() - offset;
            let reachable = combine_enabled(level, targets);
            targets = enabled_targets(level, &reachable);
            index.insert(position, reachable);
        }
        index.insert(0, combine_enabled(graph.initial_level(), targets));

        Self { index }
    }

    /// Checks whether `action` is reachable at the level at `position`.
    pub fn is_reachable(&self, position: usize, action: &Action) -> bool {
        self.index.get(&position).is_some_and(|actions| actions.contains(action))
    }
}

fn combine_enabled(level: &dyn Level, mut reachable: BTreeSet<Action>) -> BTreeSet<Action> {
    reachable.extend(level.required_actions().iter().filter(|a| a.is_enabled()).cloned());
    reachable
}

/// Requested actions of `level` whose provisions need only reachable actions.
fn enabled_targets(level: &ExtensionLevel, reachable: &BTreeSet<Action>) -> BTreeSet<Action> {
    level
        .action_provisions()
        .iter()
        .filter(|ap| ap.required_actions().iter().all(|a| reachable.contains(a)))
        .map(|ap| ap.requested_action().clone())
        .collect()
}
