pub mod error;
pub mod runner;
pub mod template;

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::runner::{RunContext, TaskIds};
    pub use crate::template::{
        Combination, ExpandError, ParseError, TemplateParser, collapse, expand, expand_values,
        parse,
    };
}
