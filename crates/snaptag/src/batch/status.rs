use serde::{Deserialize, Serialize};

/// Aggregate state of the current (or most recently finished) run.
///
/// Handed out by value; a snapshot never tracks later engine state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    /// Number of files in the job.
    pub total: usize,
    /// Files finished with a successful result.
    pub completed: usize,
    /// Files finished with an error result.
    pub failed: usize,
    /// True from job acceptance until the last item resolves or the run is
    /// reset.
    pub in_progress: bool,
}

impl RunStatus {
    /// Status at job acceptance.
    pub fn started(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            failed: 0,
            in_progress: true,
        }
    }

    /// Files attempted so far.
    pub fn attempted(&self) -> usize {
        self.completed + self.failed
    }

    /// True once every file has a recorded outcome.
    pub fn is_finished(&self) -> bool {
        self.attempted() == self.total
    }
}
