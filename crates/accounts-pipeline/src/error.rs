use std::fmt::Debug;

use thiserror::Error;

/// Error from a failed backward step.
#[derive(Debug, thiserror::Error)]
#[error("compensation failed for step '{step}': {description}")]
pub struct CompensationError<E> {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The underlying error.
    #[source]
    pub error: E,
}

/// Error from pipeline execution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError<E: Debug> {
    /// A step failed and every earlier step was rolled back.
    #[error("step '{step}' failed")]
    StepFailed {
        /// Name of the step that failed.
        step: String,
        /// The error that caused the step to fail.
        #[source]
        source: E,
    },

    /// A step failed and some of the rollbacks failed too.
    #[error("step '{failed_step}' failed, and {} compensation(s) also failed", compensation_errors.len())]
    CompensationFailed {
        /// Name of the step that originally failed.
        failed_step: String,
        /// The error from the failed step.
        #[source]
        step_error: E,
        /// Errors from failed compensations, in the order they were attempted.
        compensation_errors: Vec<CompensationError<E>>,
    },
}

impl<E: Debug> PipelineError<E> {
    /// Name of the step whose forward action failed.
    #[must_use]
    pub fn failed_step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
            Self::CompensationFailed { failed_step, .. } => failed_step,
        }
    }

    /// The error returned by the failed forward action.
    #[must_use]
    pub fn step_error(&self) -> &E {
        match self {
            Self::StepFailed { source, .. } => source,
            Self::CompensationFailed { step_error, .. } => step_error,
        }
    }

    /// Compensation failures collected during rollback; empty when the
    /// rollback completed.
    #[must_use]
    pub fn compensation_errors(&self) -> &[CompensationError<E>] {
        match self {
            Self::StepFailed { .. } => &[],
            Self::CompensationFailed {
                compensation_errors,
                ..
            } => compensation_errors,
        }
    }

    /// Whether the rollback left every earlier step undone.
    #[must_use]
    pub fn is_fully_compensated(&self) -> bool {
        self.compensation_errors().is_empty()
    }

    /// Discard the rollback diagnostics and keep the original step error.
    #[must_use]
    pub fn into_step_error(self) -> E {
        match self {
            Self::StepFailed { source, .. } => source,
            Self::CompensationFailed { step_error, .. } => step_error,
        }
    }
}
