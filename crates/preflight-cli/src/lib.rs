//! The `preflight` binary: provision the environment, then run the task.
//!
//! `main` parses arguments and sets up logging; [`run`] composes the
//! adapters, drives the orchestrator and turns the outcome into a process
//! exit code.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings
#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod parser;
pub mod presentation;

pub use bootstrap::{bootstrap, build_ports, spawn_signal_listener};
pub use parser::Cli;

use anyhow::Result;
use preflight_core::config::interpreter_override_from_env;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Run the bootstrap to completion and return the process exit code.
///
/// Errors are only returned for failures before the orchestrator starts
/// (working directory, HTTP client); the caller reports them with exit 1.
pub async fn run() -> Result<i32> {
    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let orchestrator = bootstrap(cancel)?;
    let interpreter_override = interpreter_override_from_env();

    match orchestrator.run(interpreter_override.as_deref()).await {
        Ok(summary) => {
            for line in presentation::summary_lines(&summary) {
                info!("{line}");
            }
            Ok(summary.task_exit_code)
        }
        Err(e) => {
            eprintln!("{}", presentation::failure_message(&e));
            Ok(e.exit_code())
        }
    }
}
