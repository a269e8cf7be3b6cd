//! Creation of the initial planning graph for a goal.

use crate::error::{PlanningError, Result};
use crate::graph::{Graph, InitialLevel, TaskProvision};
use crate::problem::Goal;
use crate::providers::TaskProvisionProvider;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;
use weave_models::Task;

/// Creates the initial graph of a planning run.
pub trait GraphFactory: Send + Sync {
    /// Creates a graph whose initial level provides every goal task.
    ///
    /// # Errors
    /// Returns `PlanningError::UnrealizableGoal` if some task has no
    /// provision.
    fn create_graph(&self, goal: &Goal) -> Result<Graph>;
}

/// Builds the initial level from every provision of the goal tasks.
pub struct DefaultGraphFactory {
    tasks: Arc<dyn TaskProvisionProvider>,
}

impl DefaultGraphFactory {
    #[must_use]
    pub fn new(tasks: Arc<dyn TaskProvisionProvider>) -> Self {
        Self { tasks }
    }
}

impl GraphFactory for DefaultGraphFactory {
    fn create_graph(&self, goal: &Goal) -> Result<Graph> {
        let provisions: BTreeSet<TaskProvision> = self
            .tasks
            .provisions_for_tasks(goal.tasks())
            .into_iter()
            .filter(|p| goal.tasks().contains(p.request()))
            .collect();

        let provided: BTreeSet<&Task> = provisions.iter().map(TaskProvision::request).collect();
        let missing: Vec<String> = goal
            .tasks()
            .iter()
            .filter(|t| !provided.contains(t))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(PlanningError::UnrealizableGoal(missing.join(", ")));
        }

        let graph = Graph::new(InitialLevel::new(provisions)?);
        info!(
            tasks = goal.tasks().len(),
            provisions = graph.initial_level().task_provisions().len(),
            "created planning graph"
        );
        Ok(graph)
    }
}
