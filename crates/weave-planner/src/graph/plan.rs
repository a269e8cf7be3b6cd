use super::chain::Graph;
use super::levels::{Level, LevelRef};
use super::{GraphError, Result};
use crate::mutex::ActionMutexIndex;
use std::collections::BTreeSet;
use std::fmt;
use weave_models::Action;

/// A graph whose every required action is satisfied.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Plan {
    graph: Graph,
}

impl Plan {
    /// Asserts `graph` to be a plan.
    ///
    /// # Errors
    /// Returns `GraphError::InvalidPlan` when a level offers alternatives
    /// for a requested subject, a required action is neither enabled nor
    /// provided by the next level, or a level contains mutex actions.
    pub fn new(graph: Graph) -> Result<Self> {
        let initial = graph.initial_level();
        for task in initial.requested_tasks() {
            if initial.provisions_for(&task).count() > 1 {
                return Err(GraphError::InvalidPlan(format!(
                    "multiple provisions for task {task}"
                )));
            }
        }

        let mut provided = BTreeSet::new();
        for level in graph.extension_levels_rev() {
            let requested = level.requested_actions();
            for action in &requested {
                if level.provisions_for(action).count() > 1 {
                    return Err(GraphError::InvalidPlan(format!(
                        "multiple provisions for action {action}"
                    )));
                }
            }
            check_required_actions(&LevelRef::Extension(level), &provided)?;
            provided = requested;
        }
        check_required_actions(&LevelRef::Initial(initial), &provided)?;

        if ActionMutexIndex::new(&graph).has_any_mutexes() {
            return Err(GraphError::InvalidPlan("mutex actions".to_string()));
        }

        Ok(Self { graph })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn depth(&self) -> usize {
        self.graph.depth()
    }

    /// Every action the plan requires, over all levels.
    pub fn actions(&self) -> BTreeSet<Action> {
        self.graph
            .levels()
            .iter()
            .flat_map(|level| level.required_actions().iter().cloned())
            .collect()
    }
}

fn check_required_actions(level: &dyn Level, provided: &BTreeSet<Action>) -> Result<()> {
    match level
        .required_actions()
        .iter()
        .find(|a| !provided.contains(*a) && !a.is_enabled())
    {
        Some(action) => Err(GraphError::InvalidPlan(format!("unsatisfied action {action}"))),
        None => Ok(()),
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan").field("graph", &self.graph).finish()
    }
}
