use std::time::Instant;

/// Status of a step in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Forward action succeeded.
    Executed,
    /// Forward action failed.
    Failed,
    /// Step was rolled back successfully.
    Compensated,
    /// Rolling the step back failed.
    CompensationFailed,
}

/// Record of one step of a pipeline execution.
#[derive(Debug)]
pub struct StepRecord {
    /// Name of the step.
    pub name: String,
    /// Current status.
    pub status: StepStatus,
    /// When the forward action started.
    pub started_at: Instant,
    /// When the step last changed status.
    pub completed_at: Option<Instant>,
    /// What rolling this step back does, once it has executed.
    pub compensation_description: Option<String>,
}

/// Per-execution record of what each step did.
///
/// Records are positional: the n-th record belongs to the n-th step that
/// started, so two steps sharing a name are tracked independently.
#[derive(Debug, Default)]
pub struct PipelineAuditLog {
    records: Vec<StepRecord>,
}

impl PipelineAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            status: StepStatus::Executed,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
    }

    pub(crate) fn record_success(&mut self, compensation_description: String) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        self.set_status(index, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize) {
        self.set_status(index, StepStatus::CompensationFailed);
    }

    fn set_status(&mut self, index: usize, status: StepStatus) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Names of the steps with the given status, in execution order.
    #[must_use]
    pub fn steps_with_status(&self, status: StepStatus) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.name.as_str())
            .collect()
    }

    /// One line per step, prefixed with a status marker.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| {
                let marker = match record.status {
                    StepStatus::Executed => "✓",
                    StepStatus::Failed => "✗",
                    StepStatus::Compensated => "↩",
                    StepStatus::CompensationFailed => "⚠",
                };
                format!("{marker} {}", record.name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
