//! Plan command implementation.
//!
//! Runs a planning job over a mashup document and prints the plans found.

use super::Session;
use crate::render::{PlanView, print_plan};
use anyhow::Context;
use colored::Colorize;
use std::path::PathBuf;
use weave_planner::{PlannerJob, SequentialPlanCollector};

pub struct PlanOptions {
    pub document: PathBuf,
    pub config: Option<PathBuf>,
    pub min_depth: Option<usize>,
    pub max_depth: Option<usize>,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Execute the plan command.
pub fn execute(options: PlanOptions) -> anyhow::Result<()> {
    let Session { mut config, goal, planner } =
        Session::load(&options.document, options.config.as_deref())?;

    if let Some(min_depth) = options.min_depth {
        config.min_depth = min_depth;
    }
    if let Some(max_depth) = options.max_depth {
        config.max_depth = max_depth;
    }
    if options.limit.is_some() {
        config.limit = options.limit;
    }
    config.validate().context("Invalid planner settings")?;

    let problem = config.problem(goal).context("Invalid planning problem")?;
    let mut collector = match config.limit {
        Some(limit) => SequentialPlanCollector::with_limit(limit),
        None => SequentialPlanCollector::new(),
    };
    let report = PlannerJob::new(&planner)
        .run(problem, &mut collector)
        .context("Planning failed")?;

    if options.json {
        let views: Vec<PlanView> = collector.plans().iter().map(PlanView::new).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    println!("{}", "weave plan".bold().cyan());
    println!();
    for (index, plan) in collector.plans().iter().enumerate() {
        print_plan(index + 1, plan);
    }
    println!("Found {} plan(s), deepest at depth {}", report.plans, report.max_depth);
    Ok(())
}
