//! Report feature, invalid and empty geometry counts for
//! `data/processed/boundaries.geojson`.

use anyhow::Result;
use geopipe::{logging, validate, PipelineConfig};

fn main() -> Result<()> {
    logging::init("warn");

    let cfg = PipelineConfig::from_current_dir()?;
    let outcome = validate::run(&cfg.validate())?;
    println!("{}", validate::message(&outcome));

    Ok(())
}
