use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CommandSpec, ModelError};

/// Whether commands are mediated by a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellMode {
    /// `Line` commands go through the shell, `Argv` commands run directly.
    #[default]
    Auto,
    /// Every command goes through the shell.
    Always,
    /// No command goes through the shell.
    Never,
}

impl ShellMode {
    /// Decide shell mediation for a concrete command.
    pub fn use_shell(&self, command: &CommandSpec) -> bool {
        match self {
            ShellMode::Always => true,
            ShellMode::Never => false,
            ShellMode::Auto => matches!(command, CommandSpec::Line(_)),
        }
    }
}

/// Maps the tri-state `shell` override (`None` = decide per command).
impl From<Option<bool>> for ShellMode {
    fn from(shell: Option<bool>) -> Self {
        match shell {
            None => ShellMode::Auto,
            Some(true) => ShellMode::Always,
            Some(false) => ShellMode::Never,
        }
    }
}

impl FromStr for ShellMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" | "true" | "yes" => Ok(Self::Always),
            "never" | "false" | "no" => Ok(Self::Never),
            _ => Err(ModelError::UnknownShellMode(s.to_string())),
        }
    }
}

impl fmt::Display for ShellMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShellMode::Auto => "auto",
            ShellMode::Always => "always",
            ShellMode::Never => "never",
        })
    }
}
