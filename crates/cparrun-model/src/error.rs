use thiserror::Error;

use crate::TaskStatus;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unsupported segment kind: {0}")]
    UnsupportedSegment(String),

    #[error("alternatives segment must contain at least one value")]
    EmptyAlternatives,

    #[error("invalid environment assignment: {0:?} (expected KEY=VALUE)")]
    InvalidAssignment(String),

    #[error("unknown shell mode: {0}")]
    UnknownShellMode(String),

    #[error("unknown spawn policy: {0}")]
    UnknownSpawnPolicy(String),

    #[error("task '{task_id}' is already terminal ({status})")]
    AlreadyTerminal { task_id: String, status: TaskStatus },

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
