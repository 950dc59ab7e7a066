//! Command templates: markup parsing and combinatorial expansion.
//!
//! A template such as `ping -c1 %[10.0.0.1, 10.0.0.2]%` is parsed into
//! [`Segment`](cparrun_model::Segment)s and expanded into one concrete command
//! per combination of alternatives.
mod error;
pub use error::{ExpandError, ParseError};

mod parser;
pub use parser::{DEFAULT_END_TOKEN, DEFAULT_MAX_GROUPS, DEFAULT_START_TOKEN, TemplateParser, parse};

mod combinator;
pub use combinator::{Combination, collapse, combination_count, expand, expand_values};
