//! Weave CLI - command-line driver for the Weave mashup planner
//!
//! This CLI provides a `weave` command which loads a mashup document,
//! builds planning graphs over its widgets and prints the plans found.

mod commands;
mod document;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Weave - plans widget mashups realizing a set of tasks
#[derive(Parser, Debug)]
#[command(
    name = "weave",
    author,
    version,
    about = "Weave - widget mashup planner",
    long_about = "Weave composes the actions of mashup widgets into plans realizing a goal.\nPlans are searched backwards from the goal tasks with a planning graph."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find plans realizing the goal of a mashup document
    ///
    /// Plans are printed in order of increasing depth.
    Plan {
        /// Path to the JSON mashup document
        document: PathBuf,

        /// Planner configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Minimum plan depth (overrides the configuration)
        #[arg(long)]
        min_depth: Option<usize>,

        /// Maximum plan depth (overrides the configuration)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Stop after this many plans (overrides the configuration)
        #[arg(long)]
        limit: Option<usize>,

        /// Output plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the planning graph of a mashup document
    ///
    /// Extends the graph until it reaches the given depth or is satisfied.
    Graph {
        /// Path to the JSON mashup document
        document: PathBuf,

        /// Planner configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Depth of the graph
        #[arg(short, long, default_value_t = 3)]
        depth: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Plan { document, config, min_depth, max_depth, limit, json } => {
            commands::plan::execute(commands::plan::PlanOptions {
                document,
                config,
                min_depth,
                max_depth,
                limit,
                json,
            })
        }
        Command::Graph { document, config, depth } => {
            commands::graph::execute(&document, config.as_deref(), depth)
        }
    }
}
