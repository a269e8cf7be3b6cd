//! Planning-graph engine composing widget actions into mashup plans.
//!
//! Planning starts from a [`Goal`] of tasks. A [`GraphFactory`] resolves the
//! tasks into the initial level of a [`Graph`]; a [`GraphExtender`] grows the
//! graph backwards, one level at a time, until every required action is
//! enabled; a [`PlanExtractor`] enumerates the valid [`Plan`]s within a depth
//! range. [`PlanningProcess`] interleaves extension and extraction with
//! iterative deepening, and [`PlannerJob`] runs it to completion.
//!
//! ```no_run
//! use std::sync::Arc;
//! use weave_models::InMemoryRepository;
//! use weave_planner::{Goal, PlannerConfig, PlannerJob, SequentialPlanCollector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(InMemoryRepository::new());
//! let config = PlannerConfig::default();
//! let planner = config.composition.build_planner(repository);
//! let problem = config.problem(Goal::new([weave_models::Task::new("share")?])?)?;
//!
//! let mut collector = SequentialPlanCollector::new();
//! PlannerJob::new(&planner).run(problem, &mut collector)?;
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod combinatorics;
pub mod config;
pub mod cycle;
pub mod error;
pub mod extender;
pub mod extraction;
pub mod factory;
pub mod graph;
pub mod job;
pub mod mutex;
pub mod planner;
pub mod problem;
pub mod process;
pub mod providers;
pub mod rating;
pub mod reachability;

pub use collector::{
    Admission, CollectDecision, Collected, PlanCollector, RatingPlanCollector, SequentialPlanCollector,
};
pub use config::{CompositionStrategy, ConfigError, PlannerConfig, PrecursorComposition};
pub use cycle::{CyclicDependencyDetector, PathWalkingCyclicDependencyDetector};
pub use error::{PlanningError, Result};
pub use extender::{DefaultGraphExtender, GraphExtender};
pub use extraction::{BackwardChainingPlanExtractor, BackwardChainingPlanIterator, PlanExtractor};
pub use factory::{DefaultGraphFactory, GraphFactory};
pub use graph::{
    ActionProvision, ExtensionLevel, Graph, GraphError, InitialLevel, Level, LevelRef, Plan,
    PropertyProvision, TaskProvision,
};
pub use job::{PlannerJob, PlanningReport};
pub use mutex::ActionMutexIndex;
pub use planner::{DefaultPlanner, Planner};
pub use problem::{Goal, PlanningProblem};
pub use process::PlanningProcess;
pub use rating::{
    InteractionCountRater, PlanRater, PlanRaterVisitor, RatedPlan, Rating, TraversingPlanRater,
};
pub use reachability::ActionReachabilityIndex;
