//! Fail-fast dependency pipeline.

use preflight_core::domain::{InstallStep, PipelineResult, StepOutcome, TemplateContext};
use preflight_core::error::{BootstrapError, BootstrapResult};
use preflight_core::ports::{CommandRunner, OutputMode};
use tracing::{debug, error, info, warn};

/// Run a single install step to completion.
///
/// Launch failures are recorded as the shell would report them (127 for a
/// missing program, 126 otherwise) so a missing interpreter halts the
/// pipeline like any other failing step. Only an interrupt is an error.
pub async fn execute_step(
    runner: &dyn CommandRunner,
    ctx: &TemplateContext<'_>,
    step: &InstallStep,
) -> BootstrapResult<StepOutcome> {
    let spec = step.command.render(ctx);
    info!("Running step {}", step.reference());
    debug!("  {}", spec.display());

    let exit_code = match runner.run(&spec, OutputMode::Inherit).await {
        Ok(output) => output.exit_code,
        Err(e) if e.is_interrupted() => {
            return Err(BootstrapError::interrupted(format!("step {}", step.reference())));
        }
        Err(e) => {
            error!("{e}");
            e.exit_code()
        }
    };

    Ok(StepOutcome {
        step: step.reference(),
        exit_code,
    })
}

/// Executes install steps strictly in ascending order, one at a time.
pub struct DependencyPipeline<'a> {
    runner: &'a dyn CommandRunner,
    ctx: TemplateContext<'a>,
}

impl<'a> DependencyPipeline<'a> {
    pub const fn new(runner: &'a dyn CommandRunner, ctx: TemplateContext<'a>) -> Self {
        Self { runner, ctx }
    }

    /// Run `steps` by ascending `order`.
    ///
    /// The first required step that exits non-zero stops the pipeline and is
    /// recorded in `halted_at`; nothing after it runs. A failing optional
    /// step is recorded and the pipeline carries on.
    pub async fn run(&self, steps: &[InstallStep]) -> BootstrapResult<PipelineResult> {
        let mut ordered: Vec<&InstallStep> = steps.iter().collect();
        ordered.sort_by_key(|step| step.order);

        let mut result = PipelineResult::default();
        for step in ordered {
            let outcome = execute_step(self.runner, &self.ctx, step).await?;
            let failed = !outcome.succeeded();
            let exit_code = outcome.exit_code;
            result.executed.push(outcome);

            if !failed {
                continue;
            }
            if step.required {
                error!(
                    "Step {} failed with exit code {exit_code}, halting",
                    step.reference()
                );
                result.halted_at = Some(step.reference());
                break;
            }
            warn!(
                "Optional step {} failed with exit code {exit_code}, continuing",
                step.reference()
            );
        }

        Ok(result)
    }
}
