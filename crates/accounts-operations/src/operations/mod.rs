mod keys;
mod provisioning;
mod queries;
mod services;

use accounts_pipeline::Pipeline;
use tracing::{debug, error};

pub use keys::{KeyContext, KeyOperation};
pub use provisioning::{DeleteOutcome, ProvisioningContext, ProvisioningOperation};
pub use queries::AccountQueries;
pub use services::AccountServices;

use crate::{OperationError, Result};

/// Run `pipeline` and reduce its outcome to the error of the failed step.
///
/// Rollback failures leave the document store and the repository manager
/// out of sync. They are logged here and not returned to the caller.
fn run_pipeline<S, C>(
    pipeline: &Pipeline<S, C, OperationError>,
    services: &S,
    ctx: &mut C,
    operation: &'static str,
    email: &str,
) -> Result<()> {
    let (result, audit_log) = pipeline.execute_with_audit(services, ctx);
    result.map_err(|err| {
        debug!(operation, email, steps = %audit_log.summary(), "pipeline rolled back");
        for failure in err.compensation_errors() {
            error!(
                operation,
                email,
                step = %failure.step,
                compensation = %failure.description,
                error = %failure.error,
                "compensation failed; document store and repository manager are out of sync"
            );
        }
        err.into_step_error()
    })
}
