//! Capability probe.

use preflight_core::domain::{CapabilityStatus, InterpreterHandle};
use preflight_core::ports::{CommandRunner, CommandSpec, OutputMode};
use preflight_core::templates::probe_program;
use tracing::debug;

/// Ask the interpreter whether `module` can be found.
///
/// Never fails: a non-zero exit, a launch failure or an interrupt all read
/// as `Absent`. The query locates the module without importing it, so the
/// probe changes nothing in the environment.
pub async fn probe_capability(
    runner: &dyn CommandRunner,
    interpreter: &InterpreterHandle,
    module: &str,
) -> CapabilityStatus {
    let spec = CommandSpec::new(interpreter.program()).args(["-c".to_string(), probe_program(module)]);

    match runner.run(&spec, OutputMode::Discard).await {
        Ok(output) if output.success() => CapabilityStatus::Present,
        Ok(output) => {
            debug!("Probe for '{module}' exited with {}", output.exit_code);
            CapabilityStatus::Absent
        }
        Err(e) => {
            debug!("Probe for '{module}' could not run: {e}");
            CapabilityStatus::Absent
        }
    }
}
