//! Graph command implementation.

use super::Session;
use crate::render::print_levels;
use anyhow::{Context, bail};
use colored::Colorize;
use std::path::Path;
use tracing::warn;
use weave_planner::{Planner, PlanningError};

/// Execute the graph command.
pub fn execute(document: &Path, config: Option<&Path>, depth: usize) -> anyhow::Result<()> {
    if depth == 0 {
        bail!("Graph depth must be at least 1");
    }
    let Session { goal, planner, .. } = Session::load(document, config)?;

    let mut graph = planner.create_graph(&goal).context("Failed to create planning graph")?;
    while graph.depth() < depth && !graph.is_satisfied() {
        match planner.extend_graph(&graph) {
            Ok(extended) => graph = extended,
            Err(e @ PlanningError::NoActionProvisions) => {
                warn!(depth = graph.depth(), error = %e, "graph cannot be extended");
                break;
            }
            Err(e) => return Err(e).context("Failed to extend planning graph"),
        }
    }

    println!("{}", "weave graph".bold().cyan());
    println!();
    println!(
        "Depth {}, {}",
        graph.depth(),
        if graph.is_satisfied() { "satisfied" } else { "unsatisfied" }
    );
    print_levels(&graph);
    Ok(())
}
