// src/clean/mod.rs
use anyhow::{Context, Result};
use std::{fmt, fs, path::PathBuf};
use tracing::{debug, info};

use crate::config::CleanConfig;
use crate::outcome::StepOutcome;

pub mod columns;
pub mod table;

pub use columns::{normalize_column, normalize_headers, CollisionPolicy};
pub use table::Table;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub output: PathBuf,
    pub columns: Vec<String>,
    pub input_rows: usize,
    pub output_rows: usize,
}

impl CleanSummary {
    pub fn duplicates_removed(&self) -> usize {
        self.input_rows - self.output_rows
    }
}

impl fmt::Display for CleanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wrote cleaned dataset to {}", self.output.display())
    }
}

/// Console line for a finished clean run, skipped or not.
pub fn message(outcome: &StepOutcome<CleanSummary>) -> String {
    match outcome {
        StepOutcome::Completed(summary) => summary.to_string(),
        StepOutcome::Skipped { missing } => format!(
            "{} not found. Add a small sample CSV to run this step.",
            missing.display()
        ),
    }
}

/// Normalise headers, drop exact duplicate rows, and write the cleaned CSV.
///
/// - The processed directory is created first, even if the input turns out to be missing.
/// - A missing input is a skip, not an error, and leaves no output behind.
#[tracing::instrument(level = "info", skip(cfg), fields(input = %cfg.input.display()))]
pub fn run(cfg: &CleanConfig) -> Result<StepOutcome<CleanSummary>> {
    fs::create_dir_all(&cfg.processed_dir)
        .with_context(|| format!("creating processed directory {:?}", &cfg.processed_dir))?;

    let present = cfg
        .input
        .try_exists()
        .with_context(|| format!("checking raw dataset {:?}", &cfg.input))?;
    if !present {
        info!("input missing; skipping");
        return Ok(StepOutcome::Skipped {
            missing: cfg.input.clone(),
        });
    }

    let mut table = Table::read_csv(&cfg.input)
        .with_context(|| format!("reading raw dataset {:?}", &cfg.input))?;
    let input_rows = table.rows.len();

    table.headers = normalize_headers(&table.headers, cfg.collisions)
        .with_context(|| format!("normalizing columns of {:?}", &cfg.input))?;
    debug!(columns = ?table.headers, "normalized columns");

    let removed = table.dedup_rows();
    info!(input_rows, removed, "dropped duplicate rows");

    table
        .write_csv_atomic(&cfg.output)
        .with_context(|| format!("writing cleaned dataset {:?}", &cfg.output))?;
    info!(output = %cfg.output.display(), rows = table.rows.len(), "wrote cleaned dataset");

    Ok(StepOutcome::Completed(CleanSummary {
        output: cfg.output.clone(),
        columns: table.headers,
        input_rows,
        output_rows: table.rows.len(),
    }))
}
