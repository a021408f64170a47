//! Command-line runner for the branch-and-bound engine.
//!
//! Solves a built-in instance or a JSON instance file, prints a summary and
//! optionally the search tree, and can export the run as JSON.

mod instances;
mod layout;
mod report;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use bnb_core::{MipSettings, Traversal};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use instances::{load_instance, Builtin, OracleChoice};
use report::{render_tree, save_json, summary, Export};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TraversalChoice {
    Recursive,
    Stack,
}

impl From<TraversalChoice> for Traversal {
    fn from(choice: TraversalChoice) -> Self {
        match choice {
            TraversalChoice::Recursive => Traversal::Recursive,
            TraversalChoice::Stack => Traversal::ExplicitStack,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in instance to solve. Ignored when `--file` is given.
    #[arg(short, long, value_enum, default_value_t = Builtin::Knapsack)]
    instance: Builtin,

    /// JSON instance file (see `instances/q4.json`).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Relaxation oracle. `greedy` only applies to knapsack instances.
    #[arg(short, long, value_enum, default_value_t = OracleChoice::Lp)]
    oracle: OracleChoice,

    /// How the depth-first search is driven.
    #[arg(long, value_enum, default_value_t = TraversalChoice::Recursive)]
    traversal: TraversalChoice,

    /// Integrality and improvement tolerance.
    #[arg(long, default_value_t = 1e-6)]
    eps: f64,

    /// Write the run (instance, solution, nodes, layout) to this file.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the search tree.
    #[arg(long)]
    tree: bool,

    /// Log search progress.
    #[arg(short, long)]
    verbose: bool,
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    configure_logging(args.verbose);

    let (name, instance) = match &args.file {
        Some(path) => (path.display().to_string(), load_instance(path)?),
        None => (args.instance.name().to_string(), args.instance.instance()),
    };
    info!("solving {} ({})", name, instance.kind());

    let mut settings = if args.verbose {
        MipSettings::verbose()
    } else {
        MipSettings::default()
    };
    settings = settings
        .with_tolerance(args.eps)
        .with_traversal(args.traversal.into());

    let run = instance
        .solve(args.oracle, settings)
        .with_context(|| format!("solve {}", name))?;

    if args.tree {
        println!("{}", render_tree(&run.result.nodes, &run.var_names));
    }
    print!("{}", summary(&name, &run));

    if let Some(path) = &args.json {
        save_json(&Export::new(&name, &instance, &run), path)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
