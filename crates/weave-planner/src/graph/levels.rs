use super::action_provision::ActionProvision;
use super::provision::TaskProvision;
use super::{GraphError, Result};
use std::collections::BTreeSet;
use weave_models::{Action, Task};

/// One layer of the planning graph.
pub trait Level {
    /// Actions this level depends on.
    fn required_actions(&self) -> &BTreeSet<Action>;

    /// A level is enabled when every required action is enabled.
    fn is_enabled(&self) -> bool {
        self.required_actions().iter().all(Action::is_enabled)
    }
}

/// The goal-facing level holding task provisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InitialLevel {
    provisions: BTreeSet<TaskProvision>,
    required: BTreeSet<Action>,
}

impl InitialLevel {
    /// Creates an initial level.
    ///
    /// # Errors
    /// Returns `GraphError::EmptyLevel` if there are no provisions.
    pub fn new(provisions: impl IntoIterator<Item = TaskProvision>) -> Result<Self> {
        let provisions: BTreeSet<TaskProvision> = provisions.into_iter().collect();
        if provisions.is_empty() {
            return Err(GraphError::EmptyLevel);
        }
        Ok(Self::from_choice(provisions))
    }

    /// Creates a level from a non-empty choice of provisions.
    pub(crate) fn from_choice(provisions: BTreeSet<TaskProvision>) -> Self {
        debug_assert!(!provisions.is_empty());
        let required = provisions.iter().map(|p| p.providing_action().clone()).collect();
        Self { provisions, required }
    }

    pub fn task_provisions(&self) -> &BTreeSet<TaskProvision> {
        &self.provisions
    }

    pub fn requested_tasks(&self) -> BTreeSet<Task> {
        self.provisions.iter().map(|p| p.request().clone()).collect()
    }

    /// Alternatives provisioning `task`.
    pub fn provisions_for<'a>(&'a self, task: &'a Task) -> impl Iterator<Item = &'a TaskProvision> {
        self.provisions.iter().filter(move |p| p.request() == task)
    }
}

impl Level for InitialLevel {
    fn required_actions(&self) -> &BTreeSet<Action> {
        &self.required
    }
}

/// A backward elaboration supporting actions of the previous level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionLevel {
    provisions: BTreeSet<ActionProvision>,
    required: BTreeSet<Action>,
}

impl ExtensionLevel {
    /// Creates an extension level.
    ///
    /// # Errors
    /// Returns `GraphError::EmptyLevel` if there are no provisions.
    pub fn new(provisions: impl IntoIterator<Item = ActionProvision>) -> Result<Self> {
        let provisions: BTreeSet<ActionProvision> = provisions.into_iter().collect();
        if provisions.is_empty() {
            return Err(GraphError::EmptyLevel);
        }
        Ok(Self::from_choice(provisions))
    }

    pub(crate) fn from_choice(provisions: BTreeSet<ActionProvision>) -> Self {
        debug_assert!(!provisions.is_empty());
        let required = provisions.iter().flat_map(ActionProvision::required_actions).collect();
        Self { provisions, required }
    }

    pub fn action_provisions(&self) -> &BTreeSet<ActionProvision> {
        &self.provisions
    }

    pub fn requested_actions(&self) -> BTreeSet<Action> {
        self.provisions.iter().map(|p| p.requested_action().clone()).collect()
    }

    /// Alternatives supporting `action`.
    pub fn provisions_for<'a>(
        &'a self,
        action: &'a Action,
    ) -> impl Iterator<Item = &'a ActionProvision> {
        self.provisions.iter().filter(move |p| p.requested_action() == action)
    }

    /// Checks whether every requested action is required by `level`.
    pub fn can_extend_on(&self, level: &dyn Level) -> bool {
        let required = level.required_actions();
        self.provisions.iter().all(|p| required.contains(p.requested_action()))
    }
}

impl Level for ExtensionLevel {
    fn required_actions(&self) -> &BTreeSet<Action> {
        &self.required
    }
}

/// Borrowed view of either kind of level.
#[derive(Debug, Clone, Copy)]
pub enum LevelRef<'a> {
    Initial(&'a InitialLevel),
    Extension(&'a ExtensionLevel),
}

impl Level for LevelRef<'_> {
    fn required_actions(&self) -> &BTreeSet<Action> {
        match self {
            LevelRef::Initial(level) => level.required_actions(),
            LevelRef::Extension(level) => level.required_actions(),
        }
    }
}
