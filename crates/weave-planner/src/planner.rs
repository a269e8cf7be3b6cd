//! The three planning stages behind one interface.

use crate::cycle::{CyclicDependencyDetector, PathWalkingCyclicDependencyDetector};
use crate::error::Result;
use crate::extender::{DefaultGraphExtender, GraphExtender};
use crate::extraction::{BackwardChainingPlanExtractor, PlanExtractor};
use crate::factory::{DefaultGraphFactory, GraphFactory};
use crate::graph::{Graph, Plan};
use crate::problem::Goal;
use crate::providers::{
    BasicPrecursorActionProvider, BasicPropertyProvisionProvider, BasicTaskProvisionProvider,
    PrecursorActionProvider, PropertyProvisionProvider, TaskProvisionProvider,
};
use std::sync::Arc;
use weave_models::Repository;

/// Creates, extends and extracts plans from planning graphs.
pub trait Planner: Send + Sync {
    /// # Errors
    /// Returns `PlanningError::UnrealizableGoal` if some goal task has no
    /// provision.
    fn create_graph(&self, goal: &Goal) -> Result<Graph>;

    /// # Errors
    /// Returns `PlanningError::SatisfiedGraph` or
    /// `PlanningError::NoActionProvisions` if the graph cannot be extended.
    fn extend_graph(&self, graph: &Graph) -> Result<Graph>;

    /// # Errors
    /// Returns `PlanningError::InvalidDepthRange` for an invalid range.
    fn extract_plans(
        &self,
        graph: &Graph,
        min_depth: usize,
        max_depth: usize,
    ) -> Result<Box<dyn Iterator<Item = Plan> + Send>>;
}

/// Planner delegating to a graph factory, a graph extender and a plan
/// extractor.
pub struct DefaultPlanner {
    factory: Box<dyn GraphFactory>,
    extender: Box<dyn GraphExtender>,
    extractor: Box<dyn PlanExtractor>,
}

impl DefaultPlanner {
    #[must_use]
    pub fn new(
        factory: Box<dyn GraphFactory>,
        extender: Box<dyn GraphExtender>,
        extractor: Box<dyn PlanExtractor>,
    ) -> Self {
        Self { factory, extender, extractor }
    }

    /// Wires the default stages from providers.
    #[must_use]
    pub fn from_providers(
        tasks: Arc<dyn TaskProvisionProvider>,
        properties: Arc<dyn PropertyProvisionProvider>,
        precursors: Arc<dyn PrecursorActionProvider>,
    ) -> Self {
        let cycles: Arc<dyn CyclicDependencyDetector> = Arc::new(PathWalkingCyclicDependencyDetector);
        Self::new(
            Box::new(DefaultGraphFactory::new(tasks)),
            Box::new(DefaultGraphExtender::new(precursors, properties, cycles)),
            Box::new(BackwardChainingPlanExtractor),
        )
    }

    /// Wires the default stages with basic providers over `repository`.
    #[must_use]
    pub fn from_repository(repository: Arc<dyn Repository>) -> Self {
        Self::from_providers(
            Arc::new(BasicTaskProvisionProvider::new(repository.clone())),
            Arc::new(BasicPropertyProvisionProvider::new(repository.clone())),
            Arc::new(BasicPrecursorActionProvider::new(repository)),
        )
    }
}

impl Planner for DefaultPlanner {
    fn create_graph(&self, goal: &Goal) -> Result<Graph> {
        self.factory.create_graph(goal)
    }

    fn extend_graph(&self, graph: &Graph) -> Result<Graph> {
        self.extender.extend_graph(graph)
    }

    fn extract_plans(
        &self,
        graph: &Graph,
        min_depth: usize,
        max_depth: usize,
    ) -> Result<Box<dyn Iterator<Item = Plan> + Send>> {
        self.extractor.extract_plans(graph, min_depth, max_depth)
    }
}
