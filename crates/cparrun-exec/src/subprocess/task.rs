use std::{io, process::ExitStatus};

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Child,
    sync::mpsc::UnboundedSender,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::utils::terminate;

/// Final observation of one supervised process.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Process exited on its own; output fully drained.
    Exited {
        stdout: String,
        stderr: String,
        code: i32,
    },
    /// Group deadline elapsed; process group killed, output discarded.
    TimedOut,
    /// Waiting on the process or reading its pipes failed.
    Failed(String),
}

/// Message posted by a supervisor to the batch controller.
#[derive(Debug)]
pub(crate) struct TaskEvent {
    pub index: usize,
    pub outcome: Outcome,
}

/// Own `child` until it exits or `cancel` fires, then report exactly one event.
///
/// stdout and stderr are drained concurrently with the wait, so a child writing
/// more than a pipe buffer never blocks on a full pipe.
pub(crate) async fn supervise(
    index: usize,
    mut child: Child,
    cancel: CancellationToken,
    events: UnboundedSender<TaskEvent>,
) {
    // Group id equals the leader pid; the leader may be reaped before the deadline.
    let pgid = child.id();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let finished = tokio::select! {
        biased;
        res = collect(&mut child, stdout, stderr) => Some(res),
        _ = cancel.cancelled() => None,
    };

    let outcome = match finished {
        Some(Ok((status, stdout, stderr))) => {
            let code = exit_code(status);
            trace!(index, code, "subprocess exited");
            Outcome::Exited {
                stdout: String::from_utf8_lossy(&stdout).into_owned(),
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                code,
            }
        }
        Some(Err(e)) => {
            debug!(index, "subprocess supervision failed: {e}");
            terminate(&mut child, pgid).await;
            Outcome::Failed(format!("failed to collect process output: {e}"))
        }
        None => {
            debug!(index, "deadline reached; killing subprocess");
            terminate(&mut child, pgid).await;
            Outcome::TimedOut
        }
    };

    if events.send(TaskEvent { index, outcome }).is_err() {
        debug!(index, "controller is gone; dropping task event");
    }
}

async fn collect<O, E>(
    child: &mut Child,
    stdout: Option<O>,
    stderr: Option<E>,
) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let (status, stdout, stderr) = tokio::join!(child.wait(), drain(stdout), drain(stderr));
    Ok((status?, stdout?, stderr?))
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Numeric return code of a finished process.
///
/// A process killed by a signal reports the negated signal number (e.g. `-9`);
/// `-1` when neither code nor signal is available.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
