//! Error taxonomy for a bootstrap run.
//!
//! Every variant is fatal. The binary reports the message and exits with
//! [`BootstrapError::exit_code`], which passes the failing step's own exit
//! code through unchanged.

use thiserror::Error;

use crate::domain::StepRef;
use crate::paths::PathError;
use crate::ports::{AssetError, EXIT_INTERRUPTED};

/// Errors that halt a bootstrap run.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// An install step (the conditional install or a pipeline step) exited non-zero.
    #[error("install step {step} failed with exit code {exit_code}")]
    InstallStepFailure { step: StepRef, exit_code: i32 },

    /// The capability module could not be loaded during the precondition check.
    #[error("verification of '{capability}' failed (exit code {exit_code}): {reason}")]
    VerificationFailure {
        capability: String,
        exit_code: i32,
        reason: String,
    },

    /// The downstream task exited non-zero.
    #[error("task exited with code {exit_code}")]
    TaskFailure { exit_code: i32 },

    /// An interrupt arrived; the active step was terminated.
    #[error("interrupted during {stage}")]
    Interrupted { stage: String },

    /// Artifacts required by the task are unavailable.
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The working directory could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),
}

impl BootstrapError {
    pub fn interrupted(stage: impl Into<String>) -> Self {
        Self::Interrupted {
            stage: stage.into(),
        }
    }

    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InstallStepFailure { exit_code, .. }
            | Self::VerificationFailure { exit_code, .. }
            | Self::TaskFailure { exit_code } => *exit_code,
            Self::Interrupted { .. } | Self::Asset(AssetError::Interrupted) => EXIT_INTERRUPTED,
            Self::Asset(_) | Self::Path(_) => 1,
        }
    }
}

/// Result type alias for bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;
