//! Spawning and supervising one external process.
mod command;
pub use command::{build_command, shell_program};

mod task;
pub(crate) use task::{Outcome, TaskEvent, supervise};
pub use task::exit_code;
