use thiserror::Error;

use cparrun_model::{ModelError, Segment};

/// Template markup could not be parsed.
///
/// Every variant that can occur mid-template carries the segments parsed
/// before the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("start and end tokens must be non-empty")]
    EmptyToken,

    #[error("unbalanced markup near byte {offset}: start token has no matching end token")]
    Unbalanced { offset: usize, parsed: Vec<Segment> },

    #[error("template has more than {limit} alternative groups")]
    TooManyGroups { limit: usize, parsed: Vec<Segment> },
}

impl ParseError {
    /// Segments accumulated before parsing stopped.
    pub fn parsed(&self) -> &[Segment] {
        match self {
            ParseError::EmptyToken => &[],
            ParseError::Unbalanced { parsed, .. } | ParseError::TooManyGroups { parsed, .. } => {
                parsed
            }
        }
    }
}

/// Segment list could not be expanded. No partial combinations are returned.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("segment {index}: unsupported segment kind: {kind}")]
    UnsupportedKind { index: usize, kind: String },

    #[error("segment {index}: {source}")]
    InvalidSegment {
        index: usize,
        #[source]
        source: ModelError,
    },
}

impl ExpandError {
    pub(crate) fn at(index: usize, err: ModelError) -> Self {
        match err {
            ModelError::UnsupportedSegment(kind) => ExpandError::UnsupportedKind { index, kind },
            source => ExpandError::InvalidSegment { index, source },
        }
    }
}
