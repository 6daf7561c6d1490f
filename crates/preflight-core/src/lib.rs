//! Core domain types and ports for the preflight bootstrap orchestrator.
//!
//! This crate is pure: it describes *what* a bootstrap run consists of
//! (interpreter handles, capability packages, install steps, accelerator
//! reports, asset plans) and the ports through which adapters execute
//! commands, locate binaries and fetch artifacts. Nothing here spawns a
//! process or touches the network.
//!
//! Adapters live in `preflight-runtime`; the composition root is the
//! `preflight` binary in `preflight-cli`.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod paths;
pub mod ports;
pub mod templates;

// Re-export commonly used types for convenience
pub use config::{
    BootstrapConfig, FALLBACK_INTERPRETER, INTERPRETER_OVERRIDE_VAR, InterpreterPreference,
    MANIFEST_FILE, PREFERRED_INTERPRETER, TASK_ENTRY_POINT, WORKDIR_OVERRIDE_VAR,
    interpreter_override_from_env,
};
pub use domain::{
    AcceleratorReport, AssetBundle, AssetPlan, CapabilityPackage, CapabilityStatus,
    CommandTemplate, InstallStep, InterpreterHandle, InterpreterSource, PipelineResult,
    RequiredFile, StepOutcome, StepRef, TemplateContext,
};
pub use error::{BootstrapError, BootstrapResult};
pub use paths::{PathError, WorkdirResolution, WorkdirSource, resolve_workdir};
pub use ports::{
    AssetError, AssetFetcher, BinaryLocator, CommandOutput, CommandRunner, CommandSpec,
    EXIT_CANNOT_EXECUTE, EXIT_INTERRUPTED, EXIT_NOT_FOUND, OutputMode, RunError,
};

#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio as _;
