mod segment;
pub use segment::Segment;

mod command;
pub use command::{CommandForm, CommandSpec};

mod shell;
pub use shell::ShellMode;
