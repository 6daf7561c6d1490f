//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where concrete adapters are wired together:
//! - Process runner and signal-driven cancellation (via preflight-runtime)
//! - `PATH` lookup for interpreter auto-detection
//! - HTTP asset fetcher
//!
//! The composed [`Orchestrator`] is handed back to `run`, which drives it.

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use preflight_core::config::{BootstrapConfig, MANIFEST_FILE, WORKDIR_OVERRIDE_VAR};
use preflight_core::paths::{WorkdirResolution, resolve_workdir};
use preflight_runtime::{HttpAssetFetcher, Orchestrator, PathLocator, Ports, SystemCommandRunner};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolve the working directory from the process environment.
pub fn resolve_workdir_from_env() -> Result<WorkdirResolution> {
    let env_override = env::var(WORKDIR_OVERRIDE_VAR).ok();
    let executable_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from));

    let resolution = resolve_workdir(
        env_override.as_deref(),
        executable_dir.as_deref(),
        env::current_dir(),
        MANIFEST_FILE,
    )
    .with_context(|| format!("Failed to resolve working directory (set {WORKDIR_OVERRIDE_VAR} to override)"))?;

    info!(
        "Working directory {} ({:?})",
        resolution.path.display(),
        resolution.source
    );
    Ok(resolution)
}

/// Build the production adapters, all sharing one cancellation token.
pub fn build_ports(cancel: &CancellationToken) -> Result<Ports> {
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(Ports {
        runner: Arc::new(SystemCommandRunner::new(cancel.clone())),
        locator: Arc::new(PathLocator),
        fetcher: Arc::new(HttpAssetFetcher::new(client)),
    })
}

/// Compose the orchestrator for this invocation.
pub fn bootstrap(cancel: CancellationToken) -> Result<Orchestrator> {
    let workdir = resolve_workdir_from_env()?;
    let config = BootstrapConfig::default();
    debug!("Bootstrap configuration:\n{}", config.to_json_pretty());

    let ports = build_ports(&cancel)?;
    Ok(Orchestrator::new(config, workdir.path, ports, cancel))
}

/// Cancel `cancel` on the first Ctrl-C (or SIGTERM on unix).
///
/// The active child is then terminated by the runner and the run ends with
/// the interrupt exit code.
pub fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(cancel_on_signal(wait_for_shutdown_signal(), cancel));
}

/// Cancel `cancel` once `signal` resolves successfully.
///
/// A handler that could not be installed leaves the token alone for the
/// rest of the run.
async fn cancel_on_signal<F>(signal: F, cancel: CancellationToken)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            warn!("Interrupt received, stopping");
            cancel.cancel();
        }
        Err(e) => {
            warn!("Could not listen for Ctrl-C, interrupts will not stop running steps cleanly: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            debug!("SIGTERM handler unavailable: {e}");
            return tokio::signal::ctrl_c().await;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        Some(()) = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
