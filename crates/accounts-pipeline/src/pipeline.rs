use std::fmt::Debug;

use tracing::{debug, warn};

use crate::action::Action;
use crate::audit::PipelineAuditLog;
use crate::error::{CompensationError, PipelineError};

pub(crate) type BoxedAction<S, C, E> = Box<dyn Action<Services = S, Context = C, Error = E>>;

/// A built pipeline ready for execution.
///
/// Actions run in order against one shared context. If an action fails,
/// every action that already ran is rolled back in reverse order (LIFO) and
/// the failure of the forward action is reported. A failing rollback does
/// not stop the remaining rollbacks.
///
/// A pipeline holds no per-execution state and can be executed any number
/// of times.
pub struct Pipeline<S, C, E> {
    actions: Vec<BoxedAction<S, C, E>>,
}

impl<S, C, E> Pipeline<S, C, E> {
    pub(crate) fn from_actions(actions: Vec<BoxedAction<S, C, E>>) -> Self {
        Self { actions }
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.actions.iter().map(|a| a.name()).collect()
    }
}

impl<S, C, E> Pipeline<S, C, E>
where
    E: Debug,
{
    /// Run every action in order.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::StepFailed` if an action fails and every
    /// earlier action was rolled back, or `PipelineError::CompensationFailed`
    /// if some of the rollbacks failed as well.
    pub fn execute(&self, services: &S, ctx: &mut C) -> Result<(), PipelineError<E>> {
        let (result, _audit_log) = self.execute_internal(services, ctx);
        result
    }

    /// Run every action in order and return the audit log alongside the
    /// result.
    pub fn execute_with_audit(
        &self,
        services: &S,
        ctx: &mut C,
    ) -> (Result<(), PipelineError<E>>, PipelineAuditLog) {
        self.execute_internal(services, ctx)
    }

    fn execute_internal(
        &self,
        services: &S,
        ctx: &mut C,
    ) -> (Result<(), PipelineError<E>>, PipelineAuditLog) {
        let mut audit_log = PipelineAuditLog::new();
        let mut completed: Vec<usize> = Vec::with_capacity(self.actions.len());

        for (index, action) in self.actions.iter().enumerate() {
            audit_log.record_start(action.name());

            match action.forward(services, ctx) {
                Ok(()) => {
                    debug!(step = action.name(), "pipeline step completed");
                    audit_log.record_success(action.backward_description());
                    completed.push(index);
                }
                Err(error) => {
                    debug!(step = action.name(), ?error, "pipeline step failed");
                    audit_log.record_failure();
                    let err = self.roll_back(
                        services,
                        ctx,
                        &mut audit_log,
                        completed,
                        action.name(),
                        error,
                    );
                    return (Err(err), audit_log);
                }
            }
        }

        (Ok(()), audit_log)
    }

    fn roll_back(
        &self,
        services: &S,
        ctx: &mut C,
        audit_log: &mut PipelineAuditLog,
        mut completed: Vec<usize>,
        failed_step: &str,
        step_error: E,
    ) -> PipelineError<E> {
        let mut compensation_errors = Vec::new();

        while let Some(index) = completed.pop() {
            let action = &self.actions[index];
            let description = action.backward_description();

            match action.backward(services, ctx) {
                Ok(()) => {
                    debug!(step = action.name(), %description, "pipeline step rolled back");
                    audit_log.record_compensated(index);
                }
                Err(error) => {
                    warn!(
                        step = action.name(),
                        %description,
                        ?error,
                        failed_step,
                        "rollback failed; stores may be inconsistent"
                    );
                    audit_log.record_compensation_failed(index);
                    compensation_errors.push(CompensationError {
                        step: action.name().to_string(),
                        description,
                        error,
                    });
                }
            }
        }

        if compensation_errors.is_empty() {
            PipelineError::StepFailed {
                step: failed_step.to_string(),
                source: step_error,
            }
        } else {
            PipelineError::CompensationFailed {
                failed_step: failed_step.to_string(),
                step_error,
                compensation_errors,
            }
        }
    }
}
