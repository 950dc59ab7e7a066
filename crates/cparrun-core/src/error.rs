use thiserror::Error;

use cparrun_model::ModelError;

use crate::template::{ExpandError, ParseError};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("template parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("template expansion error: {0}")]
    Expand(#[from] ExpandError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
