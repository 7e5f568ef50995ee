// src/acquire.rs

use anyhow::{Context, Result};
use std::{fmt, fs, path::PathBuf};
use tracing::{debug, info};

use crate::config::{AcquireConfig, RETENTION_NOTE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireSummary {
    pub raw_dir: PathBuf,
    pub marker_file: PathBuf,
}

impl fmt::Display for AcquireSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Initialized raw data directory at {}", self.raw_dir.display())
    }
}

/// Make sure the raw directory exists and (re)write its retention marker.
///
/// Purely local: nothing is downloaded. Safe to call repeatedly.
#[tracing::instrument(level = "info", skip(cfg), fields(raw_dir = %cfg.raw_dir.display()))]
pub fn run(cfg: &AcquireConfig) -> Result<AcquireSummary> {
    fs::create_dir_all(&cfg.raw_dir)
        .with_context(|| format!("creating raw directory {:?}", &cfg.raw_dir))?;
    debug!("raw directory ready");

    fs::write(&cfg.marker_file, RETENTION_NOTE)
        .with_context(|| format!("writing marker file {:?}", &cfg.marker_file))?;
    info!(marker = %cfg.marker_file.display(), "wrote retention marker");

    Ok(AcquireSummary {
        raw_dir: cfg.raw_dir.clone(),
        marker_file: cfg.marker_file.clone(),
    })
}
