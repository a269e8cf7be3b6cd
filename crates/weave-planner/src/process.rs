//! Iterative deepening over a planning graph.
//!
//! Each call to [`PlanningProcess::advance`] grows the graph to the next
//! target depth and extracts the plans of exactly that depth, so plans reach
//! the collector in non-decreasing depth order. Callers drive the process
//! and may stop at any time.

use crate::collector::{CollectDecision, PlanCollector};
use crate::error::{PlanningError, Result};
use crate::graph::Graph;
use crate::planner::Planner;
use crate::problem::PlanningProblem;
use tracing::{debug, info};

pub struct PlanningProcess<'a> {
    planner: &'a dyn Planner,
    collector: &'a mut dyn PlanCollector,
    problem: PlanningProblem,
    graph: Option<Graph>,
    target_depth: usize,
    done: bool,
}

impl<'a> PlanningProcess<'a> {
    #[must_use]
    pub fn new(
        planner: &'a dyn Planner,
        collector: &'a mut dyn PlanCollector,
        problem: PlanningProblem,
    ) -> Self {
        let target_depth = problem.min_depth();
        Self { planner, collector, problem, graph: None, target_depth, done: false }
    }

    /// Creates a process continuing from an existing graph.
    #[must_use]
    pub fn with_graph(
        planner: &'a dyn Planner,
        collector: &'a mut dyn PlanCollector,
        problem: PlanningProblem,
        graph: Graph,
    ) -> Self {
        Self { graph: Some(graph), ..Self::new(planner, collector, problem) }
    }

    pub fn problem(&self) -> &PlanningProblem {
        &self.problem
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// Depth of the plans the next call to `advance` extracts.
    pub fn target_depth(&self) -> usize {
        self.target_depth
    }

    /// A process is done after an error or a stop request, once the target
    /// depth exceeds the maximum depth, or once a satisfied graph cannot
    /// grow to the target depth.
    pub fn is_done(&self) -> bool {
        self.done
            || self.graph.as_ref().is_some_and(|g| {
                self.target_depth > self.problem.max_depth()
                    || (g.depth() < self.target_depth && g.is_satisfied())
            })
    }

    /// Extracts the plans of the next depth.
    ///
    /// # Errors
    /// Returns `PlanningError::ProcessDone` if the process is done. Any
    /// error creating or extending the graph finishes the process and is
    /// returned.
    pub fn advance(&mut self) -> Result<()> {
        if self.is_done() {
            return Err(PlanningError::ProcessDone);
        }
        if let Err(e) = self.evolve_graph().and_then(|()| self.extract_plans()) {
            self.done = true;
            return Err(e);
        }
        match self.target_depth.checked_add(1) {
            Some(depth) => self.target_depth = depth,
            None => self.done = true,
        }
        Ok(())
    }

    fn evolve_graph(&mut self) -> Result<()> {
        let mut graph = match self.graph.take() {
            Some(graph) => graph,
            None => self.planner.create_graph(self.problem.goal())?,
        };
        while graph.depth() < self.target_depth && !graph.is_satisfied() {
            match self.planner.extend_graph(&graph) {
                Ok(extended) => graph = extended,
                Err(e) => {
                    self.graph = Some(graph);
                    return Err(e);
                }
            }
        }
        self.graph = Some(graph);
        Ok(())
    }

    fn extract_plans(&mut self) -> Result<()> {
        let Some(graph) = &self.graph else {
            return Ok(());
        };
        let plans = self.planner.extract_plans(graph, self.target_depth, self.target_depth)?;

        let mut collected = 0_usize;
        for plan in plans {
            collected += 1;
            match self.collector.collect(plan) {
                CollectDecision::Continue => {}
                CollectDecision::SkipLevel => {
                    debug!(depth = self.target_depth, "skipping rest of depth");
                    break;
                }
                CollectDecision::Stop => {
                    debug!(depth = self.target_depth, "collector requested stop");
                    self.done = true;
                    break;
                }
            }
        }
        info!(depth = self.target_depth, plans = collected, "extracted plans");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::SequentialPlanCollector;
    use crate::planner::DefaultPlanner;
    use crate::problem::Goal;
    use std::sync::Arc;
    use weave_models::{Action, InMemoryRepository, Task, Widget};

    #[test]
    fn test_done_after_satisfied_graph() {
        let t = Task::new("t").unwrap();
        let a = Action::builder(Widget::new("w").unwrap()).realizes(t.clone()).build();
        let planner = DefaultPlanner::from_repository(Arc::new(InMemoryRepository::new().with_action(a)));
        let mut collector = SequentialPlanCollector::new();
        let problem = PlanningProblem::new(Goal::new([t]).unwrap(), 1, 5).unwrap();

        let mut process = PlanningProcess::new(&planner, &mut collector, problem);
        assert!(!process.is_done());
        process.advance().unwrap();
        assert_eq!(process.target_depth(), 2);
        assert!(process.is_done());
        assert_eq!(process.advance(), Err(PlanningError::ProcessDone));
        drop(process);

        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_error_finishes_process() {
        let planner = DefaultPlanner::from_repository(Arc::new(InMemoryRepository::new()));
        let mut collector = SequentialPlanCollector::new();
        let problem = PlanningProblem::unbounded(Goal::new([Task::new("t").unwrap()]).unwrap());

        let mut process = PlanningProcess::new(&planner, &mut collector, problem);
        assert!(matches!(process.advance(), Err(PlanningError::UnrealizableGoal(_))));
        assert!(process.is_done());
    }
}
