//! Downstream task invocation.

use preflight_core::domain::{CommandTemplate, TemplateContext};
use preflight_core::error::{BootstrapError, BootstrapResult};
use preflight_core::ports::{CommandRunner, OutputMode};
use tracing::{error, info};

/// Run the task with the terminal attached and return its exit code.
///
/// No retries, no timeout, no output parsing. A launch failure is reported
/// as the shell would (127/126); only an interrupt is an error.
pub async fn invoke_task(
    runner: &dyn CommandRunner,
    ctx: &TemplateContext<'_>,
    task: &CommandTemplate,
) -> BootstrapResult<i32> {
    let spec = task.render(ctx);
    info!("Launching task: {}", spec.display());

    match runner.run(&spec, OutputMode::Inherit).await {
        Ok(output) => Ok(output.exit_code),
        Err(e) if e.is_interrupted() => Err(BootstrapError::interrupted("task")),
        Err(e) => {
            error!("{e}");
            Ok(e.exit_code())
        }
    }
}
