//! Forced termination of supervised children.
//!
//! Children are spawned as leaders of their own process group (see
//! [`crate::subprocess::build_command`]), so on Unix the whole group is killed.
//! This also takes down grandchildren started by `sh -c`, which would otherwise
//! keep the output pipes open after the shell itself is gone.

use tokio::process::Child;
use tracing::trace;

/// Kill `child` and everything in its process group, then reap it.
///
/// `pgid` must be read from the child right after spawn: once the leader has
/// been reaped, `Child::id` returns `None` while background members of the
/// group may still be alive.
pub(crate) async fn terminate(child: &mut Child, pgid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pgid) = pgid {
            kill_process_group(pgid);
        }
    }
    #[cfg(not(unix))]
    let _ = pgid;

    if let Err(e) = child.kill().await {
        trace!("kill after group signal: {e}");
    }
}

#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg only sends a signal; a stale or foreign group yields ESRCH/EPERM.
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        trace!(pgid, "killpg failed: {}", std::io::Error::last_os_error());
    }
}
