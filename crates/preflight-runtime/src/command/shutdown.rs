//! Termination of an interrupted child with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;

use tokio::process::Child;

#[cfg(unix)]
use std::time::Duration;
#[cfg(unix)]
use tokio::time::timeout;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// How long a child gets to exit after SIGTERM before it is killed.
#[cfg(unix)]
const TERM_GRACE: Duration = Duration::from_secs(5);

/// Terminate a child process, escalating to SIGKILL if needed, and reap it.
///
/// # Strategy
/// 1. Send SIGTERM and wait up to [`TERM_GRACE`] for exit
/// 2. If still running, send SIGKILL
/// 3. Wait for reaping (required to avoid zombies)
///
/// On Windows the child is killed immediately.
pub async fn terminate_child(child: &mut Child) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        terminate_unix(child).await
    }

    #[cfg(not(unix))]
    {
        child.kill().await?;
        child.wait().await
    }
}

#[cfg(unix)]
async fn terminate_unix(child: &mut Child) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // Already reaped.
        return child.wait().await;
    };
    let pid = i32::try_from(pid).map_err(io::Error::other)?;

    if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        return Err(io::Error::other(e));
    }

    if let Ok(result) = timeout(TERM_GRACE, child.wait()).await {
        return result;
    }

    child.kill().await?;
    child.wait().await
}
