use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a single task.
///
/// `Running` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Running,
    /// Process exited with code 0.
    OkFinished,
    /// Process exited non-zero, was killed by a foreign signal, or could not be observed.
    ErrorFinished,
    /// Process was killed because the group deadline elapsed.
    ErrorTerminatedTimeout,
    /// Process could not be started (only under `SpawnPolicy::Record`).
    ErrorSpawnFailed,
}

impl TaskStatus {
    /// Status for a process that exited on its own with `code`.
    pub fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            TaskStatus::OkFinished
        } else {
            TaskStatus::ErrorFinished
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Running)
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TaskStatus::ErrorFinished
                | TaskStatus::ErrorTerminatedTimeout
                | TaskStatus::ErrorSpawnFailed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "RUNNING",
            TaskStatus::OkFinished => "OK_FINISHED",
            TaskStatus::ErrorFinished => "ERROR_FINISHED",
            TaskStatus::ErrorTerminatedTimeout => "ERROR_TERMINATED_TIMEOUT",
            TaskStatus::ErrorSpawnFailed => "ERROR_SPAWN_FAILED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
