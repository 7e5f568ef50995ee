use anyhow::Result;
use clap::{Parser, Subcommand};
use geopipe::{
    acquire, clean, clean::CollisionPolicy, logging, pipeline, validate, PipelineConfig,
    StepOutcome,
};
use std::path::PathBuf;
use tracing::info;

/// Geospatial pipeline steps over one pipeline root.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Pipeline root holding data/raw and data/processed
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create data/raw and write its retention marker
    Acquire,
    /// Normalise columns and drop duplicate rows of the raw CSV
    Clean {
        /// Keep columns whose normalised names collide instead of failing
        #[arg(long)]
        allow_collisions: bool,
    },
    /// Count features, invalid and empty geometries in the boundaries file
    Validate {
        /// Print the counts as a JSON object
        #[arg(long)]
        json: bool,
    },
    /// Run acquire, clean and validate in order, stopping at the first failure
    All {
        #[arg(long)]
        allow_collisions: bool,
    },
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init("info");
    let args = Args::parse();

    // ─── 2) resolve layout ───────────────────────────────────────────
    let cfg = PipelineConfig::resolve(&args.root)?;
    info!(root = %cfg.root.display(), "pipeline root");

    // ─── 3) dispatch ─────────────────────────────────────────────────
    match args.command {
        Command::Acquire => {
            println!("{}", acquire::run(&cfg.acquire())?);
        }
        Command::Clean { allow_collisions } => {
            let cfg = cfg.with_collisions(policy(allow_collisions));
            println!("{}", clean::message(&clean::run(&cfg.clean())?));
        }
        Command::Validate { json } => {
            let outcome = validate::run(&cfg.validate())?;
            match outcome {
                StepOutcome::Completed(report) if json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                other => println!("{}", validate::message(&other)),
            }
        }
        Command::All { allow_collisions } => {
            let cfg = cfg.with_collisions(policy(allow_collisions));
            let report = pipeline::run_all(&cfg);
            for record in &report.records {
                println!("[{}] {}", record.step.as_str(), record.status.as_str());
                println!("{}", record.message);
            }
            report.into_result()?;
        }
    }

    Ok(())
}

fn policy(allow_collisions: bool) -> CollisionPolicy {
    if allow_collisions {
        CollisionPolicy::Allow
    } else {
        CollisionPolicy::Reject
    }
}
