//! The bootstrap sequence.
//!
//! Resolve → Probe → (conditionally) Install → Pipeline → Verify → Assets →
//! Invoke. Exactly one step is active at a time and the first failure ends
//! the run.

use preflight_core::config::BootstrapConfig;
use preflight_core::domain::{
    AcceleratorReport, CapabilityStatus, InterpreterHandle, PipelineResult, StepOutcome,
    TemplateContext,
};
use preflight_core::error::{BootstrapError, BootstrapResult};
use preflight_core::ports::{AssetFetcher, BinaryLocator, CommandRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::assets::AssetPreflight;
use crate::installer::install_if_missing;
use crate::invoke::invoke_task;
use crate::pipeline::DependencyPipeline;
use crate::probe::probe_capability;
use crate::resolver::resolve_interpreter;
use crate::verify::{print_report, verify_accelerator};

/// Adapters the orchestrator drives.
#[derive(Clone)]
pub struct Ports {
    pub runner: Arc<dyn CommandRunner>,
    pub locator: Arc<dyn BinaryLocator>,
    pub fetcher: Arc<dyn AssetFetcher>,
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub interpreter: InterpreterHandle,
    pub capability: CapabilityStatus,
    /// The conditional install, when it ran.
    pub installed: Option<StepOutcome>,
    pub pipeline: PipelineResult,
    pub report: AcceleratorReport,
    /// Names of asset bundles downloaded during this run.
    pub fetched_assets: Vec<String>,
    pub task_exit_code: i32,
}

pub struct Orchestrator {
    config: BootstrapConfig,
    workdir: PathBuf,
    ports: Ports,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub const fn new(
        config: BootstrapConfig,
        workdir: PathBuf,
        ports: Ports,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            workdir,
            ports,
            cancel,
        }
    }

    /// Run the whole sequence.
    ///
    /// `interpreter_override` is the raw override value, if any. Returns a
    /// summary only when the task exited 0; any other outcome is an error
    /// whose [`BootstrapError::exit_code`] is the process exit code.
    pub async fn run(&self, interpreter_override: Option<&str>) -> BootstrapResult<RunSummary> {
        let runner = self.ports.runner.as_ref();
        let capability = &self.config.capability;

        let interpreter = resolve_interpreter(
            interpreter_override,
            &self.config.interpreter,
            self.ports.locator.as_ref(),
        );
        info!("Using interpreter {interpreter}");
        info!("Working directory: {}", self.workdir.display());
        let ctx = TemplateContext::new(&interpreter, &self.workdir);

        let status = probe_capability(runner, &interpreter, &capability.module).await;
        info!("{} is {status:?}", capability.module);
        self.check_cancelled("probe")?;

        let installed = self.unless_cancelled(
            "install",
            install_if_missing(runner, &ctx, status, capability).await,
        )?;

        let pipeline = DependencyPipeline::new(runner, ctx)
            .run(&self.config.steps)
            .await?;
        if let Some(step) = &pipeline.halted_at {
            self.check_cancelled(&format!("step {step}"))?;
            let exit_code = pipeline.halted_exit_code().unwrap_or(1);
            return Err(BootstrapError::InstallStepFailure {
                step: step.clone(),
                exit_code,
            });
        }
        info!("Dependency pipeline complete ({} steps)", pipeline.executed.len());

        let report = self.unless_cancelled(
            "verification",
            verify_accelerator(runner, &interpreter, &capability.module).await,
        )?;
        print_report(&report, &capability.module);

        let fetched_assets = if self.config.assets.is_empty() {
            Vec::new()
        } else {
            AssetPreflight::new(self.ports.fetcher.as_ref(), &self.workdir, self.cancel.clone())
                .ensure(&self.config.assets)
                .await?
        };

        let task_exit_code = invoke_task(runner, &ctx, &self.config.task).await?;
        if task_exit_code != 0 {
            self.check_cancelled("task")?;
            error!("Task exited with code {task_exit_code}");
            return Err(BootstrapError::TaskFailure {
                exit_code: task_exit_code,
            });
        }
        info!("Task completed successfully");

        Ok(RunSummary {
            interpreter,
            capability: status,
            installed,
            pipeline,
            report,
            fetched_assets,
            task_exit_code,
        })
    }

    /// Steps that fail because of an interrupt report the interrupt, not the
    /// failure. The probe swallows interrupts entirely.
    fn check_cancelled(&self, stage: &str) -> BootstrapResult<()> {
        if self.cancel.is_cancelled() {
            return Err(BootstrapError::interrupted(stage));
        }
        Ok(())
    }

    fn unless_cancelled<T>(&self, stage: &str, result: BootstrapResult<T>) -> BootstrapResult<T> {
        match result {
            Err(e) if !matches!(e, BootstrapError::Interrupted { .. }) && self.cancel.is_cancelled() => {
                Err(BootstrapError::interrupted(stage))
            }
            other => other,
        }
    }
}
