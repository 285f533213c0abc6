/// A reversible unit of work inside a [`Pipeline`](crate::Pipeline).
///
/// Every action of one pipeline shares the same `Services` (injected
/// collaborators, read-only) and `Context` (state threaded through the run
/// and mutated by forward steps). An action that needs to undo itself later
/// records what it did in the context during [`forward`](Action::forward).
///
/// # Type Parameters
///
/// - `Services`: Collaborators the action talks to (stores, remote services)
/// - `Context`: Mutable state shared by all actions of one execution
/// - `Error`: The error type for forward and backward failures
pub trait Action: Send + Sync {
    /// Injected collaborators.
    type Services;

    /// State shared by all actions of one execution.
    type Context;

    /// Error type for action failures.
    type Error;

    /// Human-readable name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Perform the action.
    ///
    /// # Errors
    ///
    /// Returns an error if the action could not be completed. Actions that
    /// already ran are then rolled back by the pipeline.
    fn forward(
        &self,
        services: &Self::Services,
        ctx: &mut Self::Context,
    ) -> Result<(), Self::Error>;

    /// Undo the effects of a successful [`forward`](Action::forward).
    ///
    /// Called only when a later action fails. The default implementation is
    /// a no-op, suitable for the last action of a pipeline or for read-only
    /// actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the compensation failed.
    fn backward(
        &self,
        services: &Self::Services,
        ctx: &mut Self::Context,
    ) -> Result<(), Self::Error> {
        let _ = (services, ctx);
        Ok(())
    }

    /// Human-readable description of what [`backward`](Action::backward) does.
    fn backward_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
