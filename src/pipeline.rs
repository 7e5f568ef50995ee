// src/pipeline.rs

use anyhow::Result;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::outcome::StepStatus;
use crate::{acquire, clean, validate};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Acquire,
    Clean,
    Validate,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Acquire, Step::Clean, Step::Validate];

    pub fn as_str(&self) -> &str {
        match self {
            Step::Acquire => "acquire",
            Step::Clean => "clean",
            Step::Validate => "validate",
        }
    }
}

/// One step's status plus the line it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub status: StepStatus,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub records: Vec<StepRecord>,
    /// Error of the step that stopped the run, if any.
    pub failure: Option<anyhow::Error>,
}

impl RunReport {
    pub fn into_result(self) -> Result<Vec<StepRecord>> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

/// Run one step and render its console message.
pub fn run_step(step: Step, cfg: &PipelineConfig) -> Result<(StepStatus, String)> {
    match step {
        Step::Acquire => {
            let summary = acquire::run(&cfg.acquire())?;
            Ok((StepStatus::Completed, summary.to_string()))
        }
        Step::Clean => {
            let outcome = clean::run(&cfg.clean())?;
            Ok((outcome.status(), clean::message(&outcome)))
        }
        Step::Validate => {
            let outcome = validate::run(&cfg.validate())?;
            Ok((outcome.status(), validate::message(&outcome)))
        }
    }
}

/// Run acquire → clean → validate in order, stopping at the first failure.
/// Skipped steps do not stop the run.
pub fn run_all(cfg: &PipelineConfig) -> RunReport {
    let mut report = RunReport::default();
    for step in Step::ALL {
        match run_step(step, cfg) {
            Ok((status, message)) => {
                info!(step = step.as_str(), status = status.as_str(), "step finished");
                report.records.push(StepRecord {
                    step,
                    status,
                    message,
                });
            }
            Err(err) => {
                error!(step = step.as_str(), "step failed: {:#}", err);
                report.records.push(StepRecord {
                    step,
                    status: StepStatus::Failed,
                    message: format!("{:#}", err),
                });
                report.failure = Some(err.context(format!("{} step failed", step.as_str())));
                break;
            }
        }
    }
    report
}
