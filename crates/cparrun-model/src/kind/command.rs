use std::fmt;

use serde::{Deserialize, Serialize};

/// Command to execute, in the form the caller supplied it.
///
/// The form is preserved in results: `Argv` serializes as an array of strings,
/// `Line` as a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// Program followed by its arguments.
    Argv(Vec<String>),
    /// Single command line, normally mediated by a shell.
    Line(String),
}

/// Shape a combination is collapsed into before execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandForm {
    /// Keep tokens separate (`CommandSpec::Argv`).
    Argv,
    /// Concatenate tokens without separator (`CommandSpec::Line`).
    #[default]
    Line,
}

impl CommandSpec {
    pub fn argv<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::Argv(tokens.into_iter().map(Into::into).collect())
    }

    pub fn line(line: impl Into<String>) -> Self {
        CommandSpec::Line(line.into())
    }

    pub fn form(&self) -> CommandForm {
        match self {
            CommandSpec::Argv(_) => CommandForm::Argv,
            CommandSpec::Line(_) => CommandForm::Line,
        }
    }

    /// Returns `true` if there is nothing to execute.
    pub fn is_blank(&self) -> bool {
        match self {
            CommandSpec::Argv(tokens) => tokens.first().is_none_or(|p| p.trim().is_empty()),
            CommandSpec::Line(line) => line.trim().is_empty(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSpec::Argv(tokens) => f.write_str(&tokens.join(" ")),
            CommandSpec::Line(line) => f.write_str(line),
        }
    }
}

impl From<&str> for CommandSpec {
    fn from(line: &str) -> Self {
        CommandSpec::Line(line.to_string())
    }
}

impl From<Vec<String>> for CommandSpec {
    fn from(tokens: Vec<String>) -> Self {
        CommandSpec::Argv(tokens)
    }
}
