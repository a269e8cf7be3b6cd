//! Detection of cyclic dependencies between actions.
//!
//! Actions compare structurally, so extending a graph could make an action
//! depend on itself, directly or through a composite representing it. Such
//! a dependency has no valid execution order.

use crate::graph::Graph;
use std::collections::BTreeSet;
use weave_models::Action;

/// Decides whether supporting an action would close a cycle.
pub trait CyclicDependencyDetector: Send + Sync {
    /// Checks whether `support` supporting `dependent` in the next extension
    /// of `graph` creates a cyclic dependency.
    fn creates_cyclic_dependency_via(&self, support: &Action, dependent: &Action, graph: &Graph)
    -> bool;
}

/// Walks the dependency paths of `dependent` back through the graph and
/// reports a cycle if `support` represents any action on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathWalkingCyclicDependencyDetector;

impl CyclicDependencyDetector for PathWalkingCyclicDependencyDetector {
    fn creates_cyclic_dependency_via(
        &self,
        support: &Action,
        dependent: &Action,
        graph: &Graph,
    ) -> bool {
        if support.represents(dependent) {
            return true;
        }
        let mut dependents = BTreeSet::from([dependent.clone()]);
        for level in graph.extension_levels_rev() {
            dependents = level
                .action_provisions()
                .iter()
                .filter(|ap| ap.required_actions().iter().any(|a| dependents.contains(a)))
                .map(|ap| ap.requested_action().clone())
                .collect();
            if dependents.iter().any(|a| support.represents(a)) {
                return true;
            }
        }
        false
    }
}
