//! Command runner port.
//!
//! Every external invocation the orchestrator makes (probe, installs,
//! verification, the task itself) goes through [`CommandRunner`]. The only
//! observable outputs of a command are its exit code and, when asked for,
//! its stdout text.

use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when the program could not be found (shell convention).
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code used when the program exists but could not be executed.
pub const EXIT_CANNOT_EXECUTE: i32 = 126;

/// Exit code of a run aborted by an interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// A concrete command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Space-joined command line for logs. Not shell-quoted.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What happens to the child's stdout/stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Stream straight to the user's terminal.
    Inherit,
    /// Collect stdout into [`CommandOutput::stdout`]; stderr is inherited.
    Capture,
    /// Throw both away.
    Discard,
}

/// A command that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    /// Empty unless the command ran with [`OutputMode::Capture`].
    pub stdout: String,
}

impl CommandOutput {
    pub fn exited(exit_code: i32) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
        }
    }

    pub fn with_stdout(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
        }
    }

    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// A command that did not run to completion.
#[derive(Debug, Error)]
pub enum RunError {
    /// The program could not be started.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// An interrupt arrived; the child was terminated.
    #[error("interrupted while running '{program}'")]
    Interrupted { program: String },

    /// Waiting on the child failed.
    #[error("failed to wait on '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// Exit code this error stands for, following shell conventions.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Launch { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                EXIT_NOT_FOUND
            }
            Self::Launch { .. } => EXIT_CANNOT_EXECUTE,
            Self::Interrupted { .. } => EXIT_INTERRUPTED,
            Self::Wait { .. } => 1,
        }
    }

    pub const fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

/// Port for running external commands.
///
/// Implementations block the caller until the child has terminated; at most
/// one command is ever active.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, RunError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock implementation for testing.
    struct MockRunner {
        seen: Mutex<Vec<String>>,
        exit_code: i32,
    }

    #[async_trait]
    impl CommandRunner for MockRunner {
        async fn run(
            &self,
            spec: &CommandSpec,
            _mode: OutputMode,
        ) -> Result<CommandOutput, RunError> {
            self.seen.lock().unwrap().push(spec.display());
            Ok(CommandOutput::exited(self.exit_code))
        }
    }

    #[tokio::test]
    async fn test_mock_runner_via_trait_object() {
        let runner = MockRunner {
            seen: Mutex::new(Vec::new()),
            exit_code: 2,
        };
        let dyn_runner: &dyn CommandRunner = &runner;

        let spec = CommandSpec::new("python3").args(["-m", "pip", "--version"]);
        let output = dyn_runner.run(&spec, OutputMode::Discard).await.unwrap();

        assert!(!output.success());
        assert_eq!(runner.seen.lock().unwrap().as_slice(), ["python3 -m pip --version"]);
    }

    #[test]
    fn test_launch_error_exit_codes() {
        let missing = RunError::Launch {
            program: "python3".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let denied = RunError::Launch {
            program: "python3".to_string(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };

        assert_eq!(missing.exit_code(), EXIT_NOT_FOUND);
        assert_eq!(denied.exit_code(), EXIT_CANNOT_EXECUTE);
        assert_eq!(
            RunError::Interrupted {
                program: "python3".to_string()
            }
            .exit_code(),
            EXIT_INTERRUPTED
        );
    }
}
