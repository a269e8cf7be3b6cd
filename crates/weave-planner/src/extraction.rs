//! Backward-chaining extraction of plans from a planning graph.
//!
//! Extraction keeps a stack of frames, one per graph level under
//! consideration. Each frame enumerates the combinations choosing one
//! provision per subject requested by the level above it. The stack grows
//! towards deeper graph levels while the current choice is not enabled and
//! shrinks when a frame runs out of combinations.

use crate::combinatorics::ProductSet;
use crate::error::{PlanningError, Result};
use crate::graph::{
    ActionProvision, ExtensionLevel, Graph, InitialLevel, Level, LevelRef, Plan, TaskProvision,
};
use crate::mutex::ActionMutexIndex;
use crate::reachability::ActionReachabilityIndex;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use weave_models::Action;

/// Extracts plans from a graph.
pub trait PlanExtractor: Send + Sync {
    /// Lazily enumerates plans with a depth in `[min_depth, max_depth]`.
    ///
    /// # Errors
    /// Returns `PlanningError::InvalidDepthRange` unless
    /// `1 <= min_depth <= max_depth`.
    fn extract_plans(
        &self,
        graph: &Graph,
        min_depth: usize,
        max_depth: usize,
    ) -> Result<Box<dyn Iterator<Item = Plan> + Send>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BackwardChainingPlanExtractor;

impl PlanExtractor for BackwardChainingPlanExtractor {
    fn extract_plans(
        &self,
        graph: &Graph,
        min_depth: usize,
        max_depth: usize,
    ) -> Result<Box<dyn Iterator<Item = Plan> + Send>> {
        Ok(Box::new(BackwardChainingPlanIterator::new(graph.clone(), min_depth, max_depth)?))
    }
}

/// Levels a frame can build from a choice of provisions.
trait FromChoice<P> {
    fn from_provisions(provisions: BTreeSet<P>) -> Self;
}

impl FromChoice<TaskProvision> for InitialLevel {
    fn from_provisions(provisions: BTreeSet<TaskProvision>) -> Self {
        InitialLevel::from_choice(provisions)
    }
}

impl FromChoice<ActionProvision> for ExtensionLevel {
    fn from_provisions(provisions: BTreeSet<ActionProvision>) -> Self {
        ExtensionLevel::from_choice(provisions)
    }
}

struct Frame<P, L> {
    combinations: ProductSet<P>,
    /// Position of the graph level the combinations are drawn from.
    position: usize,
    level: Option<L>,
}

impl<P: Clone + Ord, L: FromChoice<P>> Frame<P, L> {
    fn new(alternatives: Vec<Vec<P>>, position: usize) -> Self {
        Self { combinations: ProductSet::new(alternatives), position, level: None }
    }

    fn advance(&mut self) {
        self.level = self.combinations.next().map(|c| L::from_provisions(c.into_iter().collect()));
    }
}

/// Iterator over the plans of a graph within a depth range.
pub struct BackwardChainingPlanIterator {
    graph: Graph,
    min_depth: usize,
    max_depth: usize,
    initial: Frame<TaskProvision, InitialLevel>,
    extensions: Vec<Frame<ActionProvision, ExtensionLevel>>,
    reachability: ActionReachabilityIndex,
    mutexes: ActionMutexIndex,
}

impl BackwardChainingPlanIterator {
    /// Creates an iterator over the plans of `graph`.
    ///
    /// # Errors
    /// Returns `PlanningError::InvalidDepthRange` unless
    /// `1 <= min_depth <= max_depth`.
    pub fn new(graph: Graph, min_depth: usize, max_depth: usize) -> Result<Self> {
        if min_depth < 1 {
            return Err(PlanningError::InvalidDepthRange("expecting minimum depth >= 1".to_string()));
        }
        if min_depth > max_depth {
            return Err(PlanningError::InvalidDepthRange(format!(
                "expecting minimum depth {min_depth} <= maximum depth {max_depth}"
            )));
        }

        let initial_level = graph.initial_level();
        let alternatives: Vec<Vec<TaskProvision>> = initial_level
            .requested_tasks()
            .iter()
            .map(|t| initial_level.provisions_for(t).cloned().collect())
            .collect();

        Ok(Self {
            initial: Frame::new(alternatives, 0),
            extensions: Vec::with_capacity(graph.extension_depth()),
            reachability: ActionReachabilityIndex::new(&graph),
            mutexes: ActionMutexIndex::new(&graph),
            graph,
            min_depth,
            max_depth,
        })
    }

    fn depth(&self) -> usize {
        1 + self.extensions.len()
    }

    /// The level chosen by the top frame and the position it derives from.
    fn current(&self) -> Option<(usize, LevelRef<'_>)> {
        match self.extensions.last() {
            Some(frame) => frame.level.as_ref().map(|l| (frame.position, LevelRef::Extension(l))),
            None => self.initial.level.as_ref().map(|l| (0, LevelRef::Initial(l))),
        }
    }

    fn evolve(&mut self) {
        while let Some(frame) = self.extensions.last_mut() {
            frame.advance();
            if frame.level.is_some() {
                return;
            }
            self.extensions.pop();
            debug!(depth = self.depth(), "popped exhausted frame");
        }
        self.initial.advance();
    }

    fn is_enabled(&self) -> bool {
        self.current().is_some_and(|(_, level)| level.is_enabled())
    }

    fn create_plan(&self) -> Option<Plan> {
        if !self.is_enabled() || self.depth() < self.min_depth {
            return None;
        }
        let initial = self.initial.level.clone()?;
        let extensions: Vec<ExtensionLevel> =
            self.extensions.iter().filter_map(|f| f.level.clone()).collect();
        match Graph::with_extensions(initial, extensions).and_then(Plan::new) {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!(depth = self.depth(), error = %e, "skipped invalid plan");
                None
            }
        }
    }

    fn can_grow(&self) -> bool {
        self.depth() < self.max_depth
            && self.extensions.len() < self.graph.extension_depth()
            && !self.is_enabled()
            && self.is_reachable()
            && !self.is_mutex()
    }

    fn is_reachable(&self) -> bool {
        self.current().is_some_and(|(position, level)| {
            level.required_actions().iter().all(|a| self.reachability.is_reachable(position, a))
        })
    }

    fn is_mutex(&self) -> bool {
        let Some((position, level)) = self.current() else {
            return false;
        };
        if !self.mutexes.has_mutex_actions(position) {
            return false;
        }
        let actions: Vec<&Action> = level.required_actions().iter().collect();
        actions.iter().enumerate().any(|(i, x)| {
            actions[i + 1..].iter().any(|y| self.mutexes.is_mutex(position, x, y))
        })
    }

    fn grow(&mut self) {
        if !self.can_grow() {
            return;
        }
        let Some(level) = self.graph.extension_level(self.extensions.len()) else {
            return;
        };
        let Some((_, current)) = self.current() else {
            return;
        };
        let alternatives: Vec<Vec<ActionProvision>> = current
            .required_actions()
            .iter()
            .map(|a| level.provisions_for(a).cloned().collect::<Vec<_>>())
            .filter(|aps| !aps.is_empty())
            .collect();
        let position = self.extensions.len() + 1;
        self.extensions.push(Frame::new(alternatives, position));
        debug!(depth = self.depth(), "pushed extension frame");
    }
}

impl Iterator for BackwardChainingPlanIterator {
    type Item = Plan;

    fn next(&mut self) -> Option<Plan> {
        loop {
            self.evolve();
            if self.initial.level.is_none() {
                return None;
            }
            if let Some(plan) = self.create_plan() {
                return Some(plan);
            }
            self.grow();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyProvision;
    use weave_models::{Property, PropositionSet, Task, Type, Widget};

    fn property(name: &str) -> Property {
        Property::new(name, Type::new("text").unwrap()).unwrap()
    }

    #[test]
    fn test_rejects_invalid_depth_range() {
        let t = Task::new("t").unwrap();
        let a = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();
        let graph =
            Graph::new(InitialLevel::new([TaskProvision::from_parts(t.clone(), t, a).unwrap()]).unwrap());

        let extractor = BackwardChainingPlanExtractor;
        assert!(extractor.extract_plans(&graph, 0, 1).is_err());
        assert!(extractor.extract_plans(&graph, 2, 1).is_err());
        assert!(extractor.extract_plans(&graph, 1, 1).is_ok());
    }

    #[test]
    fn test_alternatives_yield_separate_plans() {
        let t = Task::new("t").unwrap();
        let a = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();
        let b = Action::builder(Widget::new("v").unwrap()).realizes(t.clone()).build();
        let graph = Graph::new(
            InitialLevel::new([
                TaskProvision::from_parts(t.clone(), t.clone(), a).unwrap(),
                TaskProvision::from_parts(t.clone(), t, b).unwrap(),
            ])
            .unwrap(),
        );

        let plans: Vec<Plan> = BackwardChainingPlanIterator::new(graph, 1, 1).unwrap().collect();
        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|p| p.graph().initial_level().task_provisions().len() == 1));
    }

    #[test]
    fn test_chains_through_extension() {
        let p = property("p");
        let t = Task::new("t").unwrap();
        let a1 = Action::builder(Widget::new("w").unwrap())
            .pre_conditions(PropositionSet::filled([p.clone()]))
            .realizes(t.clone())
            .build();
        let a2 = Action::builder(Widget::new("x").unwrap())
            .effects(PropositionSet::filled([p.clone()]))
            .publishes(p.clone())
            .build();
        let graph = Graph::with_extensions(
            InitialLevel::new([TaskProvision::from_parts(t.clone(), t, a1.clone()).unwrap()]).unwrap(),
            [ExtensionLevel::new([ActionProvision::without_precursor(
                a1,
                [PropertyProvision::from_parts(p.clone(), p, a2).unwrap()],
            )
            .unwrap()])
            .unwrap()],
        )
        .unwrap();

        let plans: Vec<Plan> = BackwardChainingPlanIterator::new(graph.clone(), 1, 2).unwrap().collect();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].graph(), &graph);

        let shallow: Vec<Plan> = BackwardChainingPlanIterator::new(graph, 1, 1).unwrap().collect();
        assert!(shallow.is_empty());
    }
}
