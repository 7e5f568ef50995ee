//! Initialise `data/raw` under the current directory and write its retention marker.

use anyhow::Result;
use geopipe::{acquire, logging, PipelineConfig};

fn main() -> Result<()> {
    logging::init("warn");

    let cfg = PipelineConfig::from_current_dir()?;
    let summary = acquire::run(&cfg.acquire())?;
    println!("{}", summary);

    Ok(())
}
