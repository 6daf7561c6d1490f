//! Conditional install of the pinned capability package.

use preflight_core::domain::{CapabilityPackage, CapabilityStatus, StepOutcome, TemplateContext};
use preflight_core::error::{BootstrapError, BootstrapResult};
use preflight_core::ports::CommandRunner;
use tracing::info;

use crate::pipeline::execute_step;

/// Install `package` unless the probe already found it.
///
/// Returns `Ok(None)` without running anything when `status` is `Present`.
/// Otherwise runs exactly one package-manager invocation with the pinned
/// version, variant and alternate index; a non-zero exit is fatal.
pub async fn install_if_missing(
    runner: &dyn CommandRunner,
    ctx: &TemplateContext<'_>,
    status: CapabilityStatus,
    package: &CapabilityPackage,
) -> BootstrapResult<Option<StepOutcome>> {
    if status.is_present() {
        info!("{} already present, skipping install", package.module);
        return Ok(None);
    }

    info!(
        "{} not found, installing {} from {}",
        package.module,
        package.pinned_requirement(),
        package.source_index
    );
    let step = package.install_step();
    let outcome = execute_step(runner, ctx, &step).await?;

    if !outcome.succeeded() {
        return Err(BootstrapError::InstallStepFailure {
            step: outcome.step,
            exit_code: outcome.exit_code,
        });
    }
    Ok(Some(outcome))
}
