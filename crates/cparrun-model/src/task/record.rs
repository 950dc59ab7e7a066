use serde::{Deserialize, Serialize};

use crate::{CommandSpec, ModelError, ModelResult, TaskStatus};

/// Runtime record of one command, from spawn to terminal status.
///
/// Transitions are one-shot: once the status leaves [`TaskStatus::Running`] every
/// further transition fails with [`ModelError::AlreadyTerminal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    task_id: String,
    command: CommandSpec,
    stdout: Option<String>,
    stderr: Option<String>,
    return_code: Option<i32>,
    status: TaskStatus,
}

impl TaskRecord {
    /// Record for a freshly spawned process.
    pub fn running(task_id: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            task_id: task_id.into(),
            command,
            stdout: None,
            stderr: None,
            return_code: None,
            status: TaskStatus::Running,
        }
    }

    /// Record for a command whose process never started.
    pub fn spawn_failed(
        task_id: impl Into<String>,
        command: CommandSpec,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            command,
            stdout: None,
            stderr: Some(reason.into()),
            return_code: None,
            status: TaskStatus::ErrorSpawnFailed,
        }
    }

    /// Process exited on its own; status follows the return code.
    pub fn finish(&mut self, stdout: String, stderr: String, return_code: i32) -> ModelResult<()> {
        self.ensure_running()?;
        self.stdout = Some(stdout);
        self.stderr = Some(stderr);
        self.return_code = Some(return_code);
        self.status = TaskStatus::from_exit_code(return_code);
        Ok(())
    }

    /// Process outcome could not be observed (wait or pipe failure).
    pub fn fail(&mut self, reason: impl Into<String>) -> ModelResult<()> {
        self.ensure_running()?;
        self.stdout = None;
        self.stderr = Some(reason.into());
        self.return_code = None;
        self.status = TaskStatus::ErrorFinished;
        Ok(())
    }

    /// Process was killed on deadline; partial output is discarded.
    pub fn time_out(&mut self) -> ModelResult<()> {
        self.ensure_running()?;
        self.stdout = None;
        self.stderr = None;
        self.return_code = None;
        self.status = TaskStatus::ErrorTerminatedTimeout;
        Ok(())
    }

    fn ensure_running(&self) -> ModelResult<()> {
        if self.status.is_terminal() {
            return Err(ModelError::AlreadyTerminal {
                task_id: self.task_id.clone(),
                status: self.status,
            });
        }
        Ok(())
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }

    pub fn return_code(&self) -> Option<i32> {
        self.return_code
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }
}
