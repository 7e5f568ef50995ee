// src/config.rs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::clean::CollisionPolicy;

/// Marker written into the raw directory by the acquire step.
pub const MARKER_FILE: &str = "README.txt";
/// Retention note stored in the marker file.
pub const RETENTION_NOTE: &str =
    "Raw ACS data stored locally and not committed to version control.\n";

pub const RAW_CSV: &str = "acs_example.csv";
pub const CLEAN_CSV: &str = "acs_example_clean.csv";
pub const BOUNDARIES: &str = "boundaries.geojson";

/// Directory layout of one pipeline root:
///
/// ```text
/// <root>/data/raw        acquire marker, raw CSV
/// <root>/data/processed  cleaned CSV, boundaries
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub root: PathBuf,
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub collisions: CollisionPolicy,
}

impl PipelineConfig {
    /// Lay out the standard directories under `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data = root.join("data");
        Self {
            raw_dir: data.join("raw"),
            processed_dir: data.join("processed"),
            root,
            collisions: CollisionPolicy::default(),
        }
    }

    /// Resolve `root` against the working directory so messages name absolute paths.
    pub fn resolve(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let abs = std::path::absolute(root)
            .with_context(|| format!("resolving pipeline root {:?}", root))?;
        Ok(Self::new(abs))
    }

    /// Pipeline rooted at the current working directory.
    pub fn from_current_dir() -> Result<Self> {
        let cwd = std::env::current_dir().context("reading current directory")?;
        Ok(Self::new(cwd))
    }

    pub fn with_collisions(mut self, collisions: CollisionPolicy) -> Self {
        self.collisions = collisions;
        self
    }

    pub fn acquire(&self) -> AcquireConfig {
        AcquireConfig {
            raw_dir: self.raw_dir.clone(),
            marker_file: self.raw_dir.join(MARKER_FILE),
        }
    }

    pub fn clean(&self) -> CleanConfig {
        CleanConfig {
            input: self.raw_dir.join(RAW_CSV),
            processed_dir: self.processed_dir.clone(),
            output: self.processed_dir.join(CLEAN_CSV),
            collisions: self.collisions,
        }
    }

    pub fn validate(&self) -> ValidateConfig {
        ValidateConfig {
            input: self.processed_dir.join(BOUNDARIES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireConfig {
    pub raw_dir: PathBuf,
    pub marker_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanConfig {
    pub input: PathBuf,
    /// Created before the input is looked up, even when the step is skipped.
    pub processed_dir: PathBuf,
    pub output: PathBuf,
    pub collisions: CollisionPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateConfig {
    pub input: PathBuf,
}
