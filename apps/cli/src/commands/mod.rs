//! Command implementations for the Weave CLI.

pub mod graph;
pub mod plan;

use crate::document::MashupDocument;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use weave_models::Repository;
use weave_planner::{DefaultPlanner, Goal, PlannerConfig};

/// Everything a command needs to start planning.
pub struct Session {
    pub config: PlannerConfig,
    pub goal: Goal,
    pub planner: DefaultPlanner,
}

impl Session {
    /// Loads the document and the configuration, falling back to defaults
    /// without a configuration file.
    pub fn load(document: &Path, config: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => PlannerConfig::load_from_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
            None => PlannerConfig::default(),
        };
        let document = MashupDocument::load(document)?;
        let goal = document.goal()?;
        let repository: Arc<dyn Repository> = Arc::new(document.to_repository()?);
        let planner = config.composition.build_planner(repository);
        Ok(Self { config, goal, planner })
    }
}
