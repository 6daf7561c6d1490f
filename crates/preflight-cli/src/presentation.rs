//! User-facing run summaries and failure messages.
//!
//! Format-only: no decisions are made here.

use preflight_core::error::BootstrapError;
use preflight_runtime::RunSummary;

/// Short recap of a successful run, for the log.
pub fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!("Interpreter: {}", summary.interpreter)];

    match &summary.installed {
        Some(outcome) => lines.push(format!("Installed capability ({})", outcome.step)),
        None => lines.push("Capability already present".to_string()),
    }
    lines.push(format!(
        "Dependency steps: {}",
        summary.pipeline.executed_names().join(", ")
    ));
    if !summary.fetched_assets.is_empty() {
        lines.push(format!("Fetched assets: {}", summary.fetched_assets.join(", ")));
    }
    lines
}

/// Message printed to stderr when the run fails.
pub fn failure_message(err: &BootstrapError) -> String {
    match err {
        BootstrapError::VerificationFailure { capability, .. } => format!(
            "Error: {err}\n{capability} is installed but could not be loaded; the task was not started."
        ),
        BootstrapError::Interrupted { .. } => "Interrupted.".to_string(),
        _ => format!("Error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preflight_core::domain::{
        AcceleratorReport, CapabilityStatus, InterpreterHandle, InterpreterSource,
        PipelineResult, StepOutcome, StepRef,
    };

    fn step(order: u32, name: &str) -> StepOutcome {
        StepOutcome {
            step: StepRef {
                order,
                name: name.to_string(),
            },
            exit_code: 0,
        }
    }

    fn summary(installed: Option<StepOutcome>) -> RunSummary {
        RunSummary {
            interpreter: InterpreterHandle::new("python3", InterpreterSource::Preferred),
            capability: CapabilityStatus::Present,
            installed,
            pipeline: PipelineResult {
                executed: vec![step(1, "upgrade-installer"), step(2, "requirements")],
                halted_at: None,
            },
            report: AcceleratorReport::default(),
            fetched_assets: Vec::new(),
            task_exit_code: 0,
        }
    }

    #[test]
    fn test_summary_mentions_steps() {
        let lines = summary_lines(&summary(None));
        assert_eq!(lines[0], "Interpreter: python3 (preferred)");
        assert_eq!(lines[1], "Capability already present");
        assert_eq!(lines[2], "Dependency steps: upgrade-installer, requirements");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_summary_mentions_install() {
        let lines = summary_lines(&summary(Some(step(0, "install-torch"))));
        assert_eq!(lines[1], "Installed capability (#0 install-torch)");
    }

    #[test]
    fn test_failure_message_for_interrupt() {
        let err = BootstrapError::interrupted("task");
        assert_eq!(failure_message(&err), "Interrupted.");
    }

    #[test]
    fn test_failure_message_for_verification() {
        let err = BootstrapError::VerificationFailure {
            capability: "torch".to_string(),
            exit_code: 1,
            reason: "torch could not be loaded".to_string(),
        };
        let message = failure_message(&err);
        assert!(message.starts_with("Error: verification of 'torch' failed"));
        assert!(message.contains("the task was not started"));
    }
}
