//! Clean `data/raw/acs_example.csv` into `data/processed/acs_example_clean.csv`.
//!
//! A missing input prints a hint and exits successfully.

use anyhow::Result;
use geopipe::{clean, logging, PipelineConfig};

fn main() -> Result<()> {
    logging::init("warn");

    let cfg = PipelineConfig::from_current_dir()?;
    let outcome = clean::run(&cfg.clean())?;
    println!("{}", clean::message(&outcome));

    Ok(())
}
