//! Text and JSON rendering of graphs and plans.

use colored::Colorize;
use serde::Serialize;
use weave_planner::{Graph, LevelRef, Plan};

/// JSON view of one graph level.
#[derive(Debug, Serialize)]
pub struct LevelView {
    pub position: usize,
    pub kind: &'static str,
    pub provisions: Vec<String>,
}

/// JSON view of a plan.
#[derive(Debug, Serialize)]
pub struct PlanView {
    pub depth: usize,
    pub actions: Vec<String>,
    pub levels: Vec<LevelView>,
}

impl PlanView {
    pub fn new(plan: &Plan) -> Self {
        Self {
            depth: plan.depth(),
            actions: plan.actions().iter().map(ToString::to_string).collect(),
            levels: level_views(plan.graph()),
        }
    }
}

pub fn level_views(graph: &Graph) -> Vec<LevelView> {
    graph
        .levels()
        .into_iter()
        .enumerate()
        .map(|(position, level)| match level {
            LevelRef::Initial(initial) => LevelView {
                position,
                kind: "initial",
                provisions: initial.task_provisions().iter().map(ToString::to_string).collect(),
            },
            LevelRef::Extension(extension) => LevelView {
                position,
                kind: "extension",
                provisions: extension.action_provisions().iter().map(ToString::to_string).collect(),
            },
        })
        .collect()
}

pub fn print_levels(graph: &Graph) {
    for level in level_views(graph) {
        println!("  {} {} ({})", "Level".bold(), level.position, level.kind.dimmed());
        for provision in &level.provisions {
            println!("    {provision}");
        }
    }
}

pub fn print_plan(index: usize, plan: &Plan) {
    println!("{} (depth {})", format!("Plan {index}").bold().green(), plan.depth());
    print_levels(plan.graph());
    println!();
}
