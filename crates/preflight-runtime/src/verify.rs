//! Accelerator verification: the precondition gate before the task runs.

use preflight_core::domain::{AcceleratorReport, InterpreterHandle};
use preflight_core::error::{BootstrapError, BootstrapResult};
use preflight_core::ports::{CommandRunner, CommandSpec, OutputMode};
use preflight_core::templates::report_program;
use tracing::{debug, info};

/// Load `module` and report accelerator availability.
///
/// Fatal by contract: if the module cannot be imported (non-zero exit or
/// launch failure) or its report cannot be parsed, the run stops here and
/// the task is never invoked.
pub async fn verify_accelerator(
    runner: &dyn CommandRunner,
    interpreter: &InterpreterHandle,
    module: &str,
) -> BootstrapResult<AcceleratorReport> {
    let spec =
        CommandSpec::new(interpreter.program()).args(["-c".to_string(), report_program(module)]);
    info!("Verifying {module} with {interpreter}");

    let output = match runner.run(&spec, OutputMode::Capture).await {
        Ok(output) => output,
        Err(e) if e.is_interrupted() => return Err(BootstrapError::interrupted("verification")),
        Err(e) => {
            return Err(BootstrapError::VerificationFailure {
                capability: module.to_string(),
                exit_code: e.exit_code(),
                reason: e.to_string(),
            });
        }
    };

    if !output.success() {
        return Err(BootstrapError::VerificationFailure {
            capability: module.to_string(),
            exit_code: output.exit_code,
            reason: format!("{module} could not be loaded"),
        });
    }

    debug!("Verification output: {}", output.stdout.trim());
    AcceleratorReport::from_query_output(&output.stdout).map_err(|e| {
        BootstrapError::VerificationFailure {
            capability: module.to_string(),
            exit_code: 1,
            reason: format!("unreadable report: {e}"),
        }
    })
}

/// Print the report, one line per field, to stdout.
pub fn print_report(report: &AcceleratorReport, module: &str) {
    for line in report.diagnostic_lines(module) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use preflight_core::domain::InterpreterSource;
    use preflight_core::ports::{CommandOutput, RunError};

    struct Canned(Result<CommandOutput, ()>);

    #[async_trait]
    impl CommandRunner for Canned {
        async fn run(
            &self,
            spec: &CommandSpec,
            mode: OutputMode,
        ) -> Result<CommandOutput, RunError> {
            assert_eq!(mode, OutputMode::Capture);
            self.0.clone().map_err(|()| RunError::Interrupted {
                program: spec.program.clone(),
            })
        }
    }

    fn python() -> InterpreterHandle {
        InterpreterHandle::new("python3", InterpreterSource::Preferred)
    }

    #[tokio::test]
    async fn parses_available_device() {
        let runner = Canned(Ok(CommandOutput::with_stdout(
            0,
            r#"{"version": "2.1.0+cu118", "available": true, "device_count": 1, "device_name": "NVIDIA L4"}"#,
        )));
        let report = verify_accelerator(&runner, &python(), "torch").await.unwrap();

        assert!(report.available);
        assert_eq!(report.device_count, 1);
        assert_eq!(report.first_device_name.as_deref(), Some("NVIDIA L4"));
    }

    #[tokio::test]
    async fn load_failure_is_fatal_with_exit_code() {
        let runner = Canned(Ok(CommandOutput::exited(1)));
        let err = verify_accelerator(&runner, &python(), "torch").await.unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::VerificationFailure { exit_code: 1, .. }
        ));
    }

    #[tokio::test]
    async fn garbage_output_is_fatal() {
        let runner = Canned(Ok(CommandOutput::with_stdout(0, "hello")));
        let err = verify_accelerator(&runner, &python(), "torch").await.unwrap_err();
        assert!(matches!(err, BootstrapError::VerificationFailure { .. }));
    }

    #[tokio::test]
    async fn interrupt_is_not_a_verification_failure() {
        let runner = Canned(Err(()));
        let err = verify_accelerator(&runner, &python(), "torch").await.unwrap_err();
        assert!(matches!(err, BootstrapError::Interrupted { .. }));
    }
}
