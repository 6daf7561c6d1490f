//! Subprocess execution for the bootstrap orchestrator.
//!
//! [`SystemCommandRunner`] implements `CommandRunner` on top of
//! `tokio::process`. Each call spawns one child and returns only after it
//! has terminated. A cancelled token terminates the active child and turns
//! the call into `RunError::Interrupted`.

mod shutdown;

use async_trait::async_trait;
use preflight_core::ports::{CommandOutput, CommandRunner, CommandSpec, OutputMode, RunError};
use std::process::{ExitStatus, Stdio};
use tokio::io::AsyncReadExt;
use tokio::process::{ChildStdout, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use shutdown::terminate_child;

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    cancel: CancellationToken,
}

impl SystemCommandRunner {
    /// Create a runner that aborts the active child when `cancel` fires.
    pub const fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

enum Waited {
    Exited(std::io::Result<ExitStatus>),
    Cancelled,
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, RunError> {
        if self.cancel.is_cancelled() {
            return Err(RunError::Interrupted {
                program: spec.program.clone(),
            });
        }

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).stdin(Stdio::inherit()).kill_on_drop(true);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        match mode {
            OutputMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::inherit());
            }
            OutputMode::Discard => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }

        debug!(command = %spec.display(), ?mode, "spawning");
        let mut child = cmd.spawn().map_err(|source| RunError::Launch {
            program: spec.program.clone(),
            source,
        })?;

        // Drain stdout concurrently so a chatty child cannot fill the pipe and stall.
        let reader = child.stdout.take().map(|out| tokio::spawn(read_all(out)));

        let waited = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Waited::Cancelled,
            status = child.wait() => Waited::Exited(status),
        };

        let status = match waited {
            Waited::Exited(status) => status.map_err(|source| RunError::Wait {
                program: spec.program.clone(),
                source,
            })?,
            Waited::Cancelled => {
                warn!("Interrupt received, terminating '{}'", spec.program);
                if let Err(e) = terminate_child(&mut child).await {
                    warn!("Failed to terminate '{}': {e}", spec.program);
                }
                return Err(RunError::Interrupted {
                    program: spec.program.clone(),
                });
            }
        };

        // A terminal interrupt reaches the child too; it often exits on its
        // own before the cancel branch is polled.
        if self.cancel.is_cancelled() {
            debug!("'{}' exited during an interrupt", spec.program);
            return Err(RunError::Interrupted {
                program: spec.program.clone(),
            });
        }

        let stdout = match reader {
            Some(handle) => handle.await.unwrap_or_default(),
            None => String::new(),
        };

        let exit_code = exit_code_of(status);
        debug!(command = %spec.display(), exit_code, "exited");
        Ok(CommandOutput::with_stdout(exit_code, stdout))
    }
}

async fn read_all(mut out: ChildStdout) -> String {
    let mut buf = Vec::new();
    if let Err(e) = out.read_to_end(&mut buf).await {
        debug!("Failed to read child stdout: {e}");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Exit code of a terminated child; signal deaths map to `128 + signal`.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").args(["-c", script])
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let runner = SystemCommandRunner::default();
        let output = runner
            .run(&sh("echo hello; exit 3"), OutputMode::Capture)
            .await
            .unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn discard_mode_returns_empty_stdout() {
        let runner = SystemCommandRunner::default();
        let output = runner
            .run(&sh("echo ignored"), OutputMode::Discard)
            .await
            .unwrap();

        assert!(output.success());
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn runs_in_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemCommandRunner::default();
        let output = runner
            .run(&sh("pwd").current_dir(dir.path()), OutputMode::Capture)
            .await
            .unwrap();

        let reported = std::path::PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn missing_program_is_a_launch_error() {
        let runner = SystemCommandRunner::default();
        let err = runner
            .run(
                &CommandSpec::new("definitely_not_a_real_command_12345"),
                OutputMode::Discard,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RunError::Launch { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[tokio::test]
    async fn cancellation_terminates_active_child() {
        let cancel = CancellationToken::new();
        let runner = SystemCommandRunner::new(cancel.clone());

        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let started = std::time::Instant::now();
        let err = runner
            .run(&CommandSpec::new("sleep").arg("30"), OutputMode::Discard)
            .await
            .unwrap_err();
        trigger.await.unwrap();

        assert!(err.is_interrupted());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn child_failing_on_interrupt_still_reads_as_interrupted() {
        let cancel = CancellationToken::new();
        let runner = SystemCommandRunner::new(cancel.clone());

        let trigger = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        // Exits 1 as soon as it is asked to stop, like pip on Ctrl-C.
        let err = runner
            .run(&sh("trap 'exit 1' TERM INT; sleep 30 & wait"), OutputMode::Inherit)
            .await
            .unwrap_err();
        trigger.await.unwrap();

        assert!(err.is_interrupted());
        assert_eq!(err.exit_code(), 130);
    }

    #[tokio::test]
    async fn already_cancelled_token_spawns_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let runner = SystemCommandRunner::new(cancel);

        let err = runner
            .run(&sh("exit 0"), OutputMode::Discard)
            .await
            .unwrap_err();
        assert!(err.is_interrupted());
    }

    #[test]
    fn signal_deaths_map_above_128() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status for "killed by SIGKILL".
        let status = ExitStatus::from_raw(9);
        assert_eq!(exit_code_of(status), 137);
    }
}
