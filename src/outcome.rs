use std::path::PathBuf;

/// What a step did when it returned `Ok`. Failures travel as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Completed(T),
    /// The optional input was absent, so there was nothing to do.
    Skipped { missing: PathBuf },
}

impl<T> StepOutcome<T> {
    pub fn status(&self) -> StepStatus {
        match self {
            StepOutcome::Completed(_) => StepStatus::Completed,
            StepOutcome::Skipped { .. } => StepStatus::Skipped,
        }
    }

    #[cfg(test)]
    pub(crate) fn completed(self) -> Option<T> {
        match self {
            StepOutcome::Completed(v) => Some(v),
            StepOutcome::Skipped { .. } => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped { .. })
    }
}

/// Flattened status of one step run, including failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepStatus {
    Completed,
    Skipped,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
            StepStatus::Failed => "failed",
        }
    }
}
