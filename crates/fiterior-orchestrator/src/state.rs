use serde::Serialize;
use strum::{AsRefStr, Display};

/// Lifecycle of one attempt.
///
/// `Idle -> Running -> Completing -> Done`, or `Running -> Failed`. Only a
/// retry leaves `Done`/`Failed`, and it always re-enters `Running` at step 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobPhase {
    /// Not activated yet
    #[default]
    Idle,
    /// Backend call in flight, steps advancing on the timer
    Running,
    /// Backend answered; final step shown, grace delay pending
    Completing,
    /// Completion callback has fired
    Done,
    /// The attempt produced no usable result
    Failed,
}

impl JobPhase {
    /// `Done` or `Failed`: nothing more happens without a retry.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Snapshot of a job as published to observers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobState {
    /// Index into the step timeline; never decreases within an attempt
    pub step_index: usize,
    /// User-facing message, set only in [`JobPhase::Failed`]
    pub error: Option<String>,
    /// Incremented by every retry
    pub attempt: u32,
    /// Where the attempt is in its lifecycle
    pub phase: JobPhase,
}

impl JobState {
    /// Fresh state for the start of `attempt`.
    #[must_use]
    pub(crate) fn running(attempt: u32) -> Self {
        Self {
            step_index: 0,
            error: None,
            attempt,
            phase: JobPhase::Running,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.phase == JobPhase::Failed
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.phase == JobPhase::Done
    }
}
