//! Goals and the depth-bounded problems built from them.

use crate::error::{PlanningError, Result};
use std::collections::BTreeSet;
use weave_models::Task;

/// The tasks a mashup must realize.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Goal {
    tasks: BTreeSet<Task>,
}

impl Goal {
    /// Creates a goal.
    ///
    /// # Errors
    /// Returns `PlanningError::EmptyGoal` if there are no tasks.
    pub fn new(tasks: impl IntoIterator<Item = Task>) -> Result<Self> {
        let tasks: BTreeSet<Task> = tasks.into_iter().collect();
        if tasks.is_empty() {
            return Err(PlanningError::EmptyGoal);
        }
        Ok(Self { tasks })
    }

    pub fn tasks(&self) -> &BTreeSet<Task> {
        &self.tasks
    }
}

/// A goal to plan for within `[min_depth, max_depth]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanningProblem {
    goal: Goal,
    min_depth: usize,
    max_depth: usize,
}

impl PlanningProblem {
    pub const MIN_DEPTH: usize = 1;

    pub const MAX_DEPTH: usize = usize::MAX;

    /// Creates a problem.
    ///
    /// # Errors
    /// Returns `PlanningError::InvalidDepthRange` unless
    /// `1 <= min_depth <= max_depth`.
    pub fn new(goal: Goal, min_depth: usize, max_depth: usize) -> Result<Self> {
        if min_depth < Self::MIN_DEPTH {
            return Err(PlanningError::InvalidDepthRange(format!(
                "minimum depth must be at least {}",
                Self::MIN_DEPTH
            )));
        }
        if min_depth > max_depth {
            return Err(PlanningError::InvalidDepthRange(format!(
                "minimum depth {min_depth} exceeds maximum depth {max_depth}"
            )));
        }
        Ok(Self { goal, min_depth, max_depth })
    }

    /// Creates a problem without a depth limit.
    #[must_use]
    pub fn unbounded(goal: Goal) -> Self {
        Self { goal, min_depth: Self::MIN_DEPTH, max_depth: Self::MAX_DEPTH }
    }

    pub fn goal(&self) -> &Goal {
        &self.goal
    }

    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
