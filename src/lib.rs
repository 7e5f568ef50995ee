//! Local geospatial ETL steps: initialise the raw data directory, clean a
//! tabular extract, and validate a vector boundaries file.
//!
//! Each step is independent and takes its paths from [`config::PipelineConfig`].

pub mod acquire;
pub mod clean;
pub mod config;
pub mod logging;
pub mod outcome;
pub mod pipeline;
pub mod validate;

#[cfg(test)]
mod testing;

pub use config::PipelineConfig;
pub use outcome::{StepOutcome, StepStatus};
