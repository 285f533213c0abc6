//! Compensating action pipeline.
//!
//! A [`Pipeline`] runs an ordered list of [`Action`]s against a shared,
//! mutable context. When an action fails, the actions that already ran are
//! undone in reverse order and the original failure is reported.

mod action;
mod audit;
mod builder;
mod error;
mod pipeline;

pub use action::Action;
pub use audit::{PipelineAuditLog, StepRecord, StepStatus};
pub use builder::{Empty, PipelineBuilder, Ready};
pub use error::{CompensationError, PipelineError};
pub use pipeline::Pipeline;
