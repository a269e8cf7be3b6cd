//! Planner configuration.
//!
//! The configuration may be a bare TOML table or live under a `[planner]`
//! section of a larger file:
//!
//! ```toml
//! [planner]
//! min_depth = 1
//! max_depth = 4
//! limit = 10
//!
//! [planner.composition]
//! precursors = "extended_minimal"
//! tasks = true
//! properties = true
//! ```

use crate::planner::DefaultPlanner;
use crate::problem::{Goal, PlanningProblem};
use crate::providers::{
    BasicPrecursorActionProvider, BasicPropertyProvisionProvider, BasicTaskProvisionProvider,
    ComposingExtendedPrecursorActionProvider, ComposingMinimalPrecursorActionProvider,
    ComposingPropertyProvisionProvider, ComposingTaskProvisionProvider, PrecursorActionProvider,
    PropertyProvisionProvider, TaskProvisionProvider,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use weave_models::Repository;

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Settings of a planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Depth of the shallowest plans to extract.
    #[serde(default = "default_min_depth")]
    pub min_depth: usize,

    /// Depth of the deepest plans to extract.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Which providers compose actions.
    #[serde(default)]
    pub composition: CompositionStrategy,

    /// Stop after this many plans. Zero collects nothing and stops at the
    /// first plan found.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_depth: default_min_depth(),
            max_depth: default_max_depth(),
            composition: CompositionStrategy::default(),
            limit: None,
        }
    }
}

fn default_min_depth() -> usize {
    PlanningProblem::MIN_DEPTH
}

fn default_max_depth() -> usize {
    3
}

impl PlannerConfig {
    /// Loads configuration from a specific file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    /// Returns `ConfigError` if the text cannot be parsed or validated.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(contents)?;
        let config: Self = match table.remove("planner") {
            Some(section) => section.try_into()?,
            None => toml::Value::Table(table).try_into()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` unless `1 <= min_depth <= max_depth`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_depth < PlanningProblem::MIN_DEPTH {
            return Err(ConfigError::Validation(format!(
                "min_depth must be at least {}, got {}",
                PlanningProblem::MIN_DEPTH,
                self.min_depth
            )));
        }
        if self.min_depth > self.max_depth {
            return Err(ConfigError::Validation(format!(
                "min_depth {} exceeds max_depth {}",
                self.min_depth, self.max_depth
            )));
        }
        Ok(())
    }

    /// Creates the planning problem for `goal` within the configured depths.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` for invalid depths.
    pub fn problem(&self, goal: Goal) -> Result<PlanningProblem, ConfigError> {
        PlanningProblem::new(goal, self.min_depth, self.max_depth)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}

/// How precursors are composed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecursorComposition {
    /// Atomic precursors only.
    #[default]
    None,
    /// Partial precursors composed with maintenance actions.
    Minimal,
    /// Atomic precursors extended with filling actions.
    ExtendedAtomic,
    /// Minimal precursors extended with filling actions.
    ExtendedMinimal,
}

/// Selects the providers of a planner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionStrategy {
    #[serde(default)]
    pub precursors: PrecursorComposition,

    /// Compose actions realizing tasks.
    #[serde(default)]
    pub tasks: bool,

    /// Compose actions publishing properties.
    #[serde(default)]
    pub properties: bool,
}

impl CompositionStrategy {
    /// Wires a planner over `repository` with the selected providers.
    #[must_use]
    pub fn build_planner(&self, repository: Arc<dyn Repository>) -> DefaultPlanner {
        let tasks: Arc<dyn TaskProvisionProvider> = if self.tasks {
            Arc::new(ComposingTaskProvisionProvider::new(repository.clone()))
        } else {
            Arc::new(BasicTaskProvisionProvider::new(repository.clone()))
        };

        let properties: Arc<dyn PropertyProvisionProvider> = if self.properties {
            Arc::new(ComposingPropertyProvisionProvider::new(repository.clone()))
        } else {
            Arc::new(BasicPropertyProvisionProvider::new(repository.clone()))
        };

        let basic = || -> Arc<dyn PrecursorActionProvider> {
            Arc::new(BasicPrecursorActionProvider::new(repository.clone()))
        };
        let minimal = || -> Arc<dyn PrecursorActionProvider> {
            Arc::new(ComposingMinimalPrecursorActionProvider::new(repository.clone()))
        };
        let precursors: Arc<dyn PrecursorActionProvider> = match self.precursors {
            PrecursorComposition::None => basic(),
            PrecursorComposition::Minimal => minimal(),
            PrecursorComposition::ExtendedAtomic => {
                Arc::new(ComposingExtendedPrecursorActionProvider::new(repository.clone(), basic()))
            }
            PrecursorComposition::ExtendedMinimal => Arc::new(
                ComposingExtendedPrecursorActionProvider::new(repository.clone(), minimal()),
            ),
        };

        DefaultPlanner::from_providers(tasks, properties, precursors)
    }
}
