// src/validate/mod.rs
use anyhow::{Context, Result};
use geojson::{Feature, GeoJson};
use serde::{Deserialize, Serialize};
use std::{fmt, fs};
use tracing::{debug, info};

use crate::config::ValidateConfig;
use crate::outcome::StepOutcome;

pub mod geometry;

pub use geometry::{check, is_empty, Defect};

/// Counts printed by the validate step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub features: usize,
    pub invalid: usize,
    pub empty: usize,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Feature count: {}", self.features)?;
        writeln!(f, "Invalid geometries: {}", self.invalid)?;
        write!(f, "Empty geometries: {}", self.empty)
    }
}

impl ValidationReport {
    /// Tally one feature. A null geometry counts as invalid and not empty.
    pub fn record(&mut self, index: usize, feature: &Feature) {
        self.features += 1;
        let Some(geom) = &feature.geometry else {
            debug!(index, "feature has no geometry");
            self.invalid += 1;
            return;
        };
        if let Err(defect) = check(&geom.value) {
            debug!(index, %defect, "invalid geometry");
            self.invalid += 1;
        }
        if is_empty(&geom.value) {
            self.empty += 1;
        }
    }
}

/// Console output for a finished validate run, skipped or not.
pub fn message(outcome: &StepOutcome<ValidationReport>) -> String {
    match outcome {
        StepOutcome::Completed(report) => report.to_string(),
        StepOutcome::Skipped { missing } => format!(
            "{} not found. Export a small sample vector file to validate.",
            missing.display()
        ),
    }
}

/// Flatten any GeoJSON document into its features.
///
/// A lone Feature is one feature; a bare Geometry is one feature carrying it.
pub fn features(doc: GeoJson) -> Vec<Feature> {
    match doc {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature::from(g)],
    }
}

/// Score every geometry in a GeoJSON string.
pub fn validate_str(text: &str) -> Result<ValidationReport> {
    let doc: GeoJson = text.parse().context("parsing GeoJSON")?;
    let mut report = ValidationReport::default();
    for (index, feature) in features(doc).iter().enumerate() {
        report.record(index, feature);
    }
    Ok(report)
}

/// Load the boundaries file and count features, invalid and empty geometries.
///
/// Read-only: nothing is written besides the returned report.
#[tracing::instrument(level = "info", skip(cfg), fields(input = %cfg.input.display()))]
pub fn run(cfg: &ValidateConfig) -> Result<StepOutcome<ValidationReport>> {
    let present = cfg
        .input
        .try_exists()
        .with_context(|| format!("checking vector file {:?}", &cfg.input))?;
    if !present {
        info!("input missing; skipping");
        return Ok(StepOutcome::Skipped {
            missing: cfg.input.clone(),
        });
    }

    let text = fs::read_to_string(&cfg.input)
        .with_context(|| format!("reading vector file {:?}", &cfg.input))?;
    let report =
        validate_str(&text).with_context(|| format!("validating {:?}", &cfg.input))?;
    info!(
        features = report.features,
        invalid = report.invalid,
        empty = report.empty,
        "validated geometries"
    );

    Ok(StepOutcome::Completed(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::testing::{init_test_logging, write_fixture};
    use tempfile::TempDir;

    const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "properties": {"tract": "000100"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,4],[0,4],[0,0]]]}},
    {"type": "Feature", "properties": {"tract": "000200"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,2],[2,0],[0,2],[0,0]]]}},
    {"type": "Feature", "properties": {"tract": "000300"},
     "geometry": {"type": "MultiPolygon", "coordinates": []}},
    {"type": "Feature", "properties": {"tract": "000400"}, "geometry": null},
    {"type": "Feature", "properties": {"tract": "000500"},
     "geometry": {"type": "Point", "coordinates": [-117.16, 32.71]}}
  ]
}"#;

    fn setup(geojson: Option<&str>) -> (TempDir, ValidateConfig) {
        let tmp = TempDir::new().unwrap();
        let cfg = PipelineConfig::new(tmp.path()).validate();
        if let Some(contents) = geojson {
            write_fixture(&cfg.input, contents);
        }
        (tmp, cfg)
    }

    #[test]
    fn counts_features() -> Result<()> {
        init_test_logging();
        let (_tmp, cfg) = setup(Some(BOUNDARIES));

        let report = run(&cfg)?.completed().expect("validate should complete");

        assert_eq!(
            report,
            ValidationReport {
                features: 5,
                invalid: 2,
                empty: 1
            }
        );
        assert!(report.invalid <= report.features);
        assert!(report.empty <= report.features);
        Ok(())
    }

    #[test]
    fn prints_three_lines() {
        let report = ValidationReport {
            features: 12,
            invalid: 1,
            empty: 0,
        };
        assert_eq!(
            message(&StepOutcome::Completed(report)),
            "Feature count: 12\nInvalid geometries: 1\nEmpty geometries: 0"
        );
    }

    #[test]
    fn skips_missing_input() -> Result<()> {
        let (_tmp, cfg) = setup(None);

        let outcome = run(&cfg)?;

        assert!(outcome.is_skipped());
        assert_eq!(
            message(&outcome),
            format!(
                "{} not found. Export a small sample vector file to validate.",
                cfg.input.display()
            )
        );
        assert!(!cfg.input.parent().unwrap().exists());
        Ok(())
    }

    #[test]
    fn input_behind_a_file_is_an_error() -> Result<()> {
        let (_tmp, cfg) = setup(None);
        write_fixture(cfg.input.parent().unwrap(), "not a directory");

        let err = run(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("checking vector file"));
        Ok(())
    }

    #[test]
    fn single_feature_and_bare_geometry() -> Result<()> {
        let feature = r#"{"type": "Feature", "properties": null,
            "geometry": {"type": "LineString", "coordinates": []}}"#;
        assert_eq!(
            validate_str(feature)?,
            ValidationReport {
                features: 1,
                invalid: 0,
                empty: 1
            }
        );

        let geometry = r#"{"type": "Polygon", "coordinates": [[[0,0],[1,0],[0,0],[0,0]]]}"#;
        assert_eq!(
            validate_str(geometry)?,
            ValidationReport {
                features: 1,
                invalid: 1,
                empty: 0
            }
        );
        Ok(())
    }

    #[test]
    fn empty_collection() -> Result<()> {
        let report = validate_str(r#"{"type": "FeatureCollection", "features": []}"#)?;
        assert_eq!(report, ValidationReport::default());
        Ok(())
    }

    #[test]
    fn unreadable_input_propagates() -> Result<()> {
        let (_tmp, cfg) = setup(Some("tract,geometry\n000100,POLYGON EMPTY\n"));

        let err = run(&cfg).unwrap_err();
        assert!(format!("{err:#}").contains("parsing GeoJSON"));
        Ok(())
    }

    #[test]
    fn report_serializes_to_json() -> Result<()> {
        let report = ValidationReport {
            features: 3,
            invalid: 1,
            empty: 2,
        };
        let json = serde_json::to_string(&report)?;
        assert_eq!(json, r#"{"features":3,"invalid":1,"empty":2}"#);
        Ok(())
    }
}
