use std::process::Stdio;

use tokio::process::Command;
use tracing::trace;

use cparrun_model::{CommandSpec, Env};

use crate::ExecError;

/// Shell interpreter and its "run this string" flag for the current platform.
pub fn shell_program() -> (&'static str, &'static str) {
    if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") }
}

/// Build a ready-to-spawn command for task `index`.
///
/// - With `use_shell`, the command line (argv joined by single spaces) is handed
///   to the platform shell.
/// - Without it, argv runs directly and a line is split on whitespace.
///
/// `env` is layered on top of the inherited environment. stdout and stderr are
/// piped, stdin is closed, and on Unix the child leads a new process group.
pub fn build_command(
    index: usize,
    spec: &CommandSpec,
    use_shell: bool,
    env: &Env,
) -> Result<Command, ExecError> {
    if spec.is_blank() {
        return Err(ExecError::InvalidSpec {
            index,
            reason: "command is empty".into(),
        });
    }

    let mut cmd = if use_shell {
        let (shell, flag) = shell_program();
        let mut cmd = Command::new(shell);
        cmd.arg(flag).arg(spec.to_string());
        cmd
    } else {
        let argv: Vec<&str> = match spec {
            CommandSpec::Argv(tokens) => tokens.iter().map(String::as_str).collect(),
            CommandSpec::Line(line) => line.split_whitespace().collect(),
        };
        let mut cmd = Command::new(argv[0]);
        cmd.args(&argv[1..]);
        cmd
    };

    for kv in env.iter() {
        cmd.env(kv.key(), kv.value());
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    trace!(index, use_shell, env_len = env.len(), command = %spec, "command built");
    Ok(cmd)
}
