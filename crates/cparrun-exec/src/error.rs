use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("invalid batch configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid command #{index}: {reason}")]
    InvalidSpec { index: usize, reason: String },

    #[error("failed to spawn command #{index} `{command}`: {source}")]
    Spawn {
        index: usize,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}
