//! Install steps, command templates and pipeline results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::interpreter::InterpreterHandle;
use crate::ports::CommandSpec;

/// Placeholder replaced by the working directory when a template is rendered.
pub const WORKDIR_PLACEHOLDER: &str = "{workdir}";

/// Interpreter arguments, rendered against a [`TemplateContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    pub args: Vec<String>,
}

impl CommandTemplate {
    /// A template that runs the resolved interpreter with `args`.
    pub fn interpreter<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Render into a concrete command run from the working directory.
    pub fn render(&self, ctx: &TemplateContext<'_>) -> CommandSpec {
        let workdir = ctx.workdir.to_string_lossy();

        CommandSpec::new(ctx.interpreter.program())
            .args(
                self.args
                    .iter()
                    .map(|arg| arg.replace(WORKDIR_PLACEHOLDER, &workdir)),
            )
            .current_dir(ctx.workdir)
    }
}

/// Values substituted into command templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    pub interpreter: &'a InterpreterHandle,
    pub workdir: &'a Path,
}

impl<'a> TemplateContext<'a> {
    pub const fn new(interpreter: &'a InterpreterHandle, workdir: &'a Path) -> Self {
        Self {
            interpreter,
            workdir,
        }
    }
}

/// One atomic external command at a fixed position in the run order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStep {
    pub order: u32,
    pub name: String,
    pub command: CommandTemplate,
    /// Only runs when a probe asked for it (the capability install).
    pub conditional: bool,
    /// A failing required step halts everything after it.
    pub required: bool,
}

impl InstallStep {
    /// An unconditional, required step.
    pub fn required(order: u32, name: impl Into<String>, command: CommandTemplate) -> Self {
        Self {
            order,
            name: name.into(),
            command,
            conditional: false,
            required: true,
        }
    }

    #[must_use]
    pub const fn conditional(mut self) -> Self {
        self.conditional = true;
        self
    }

    /// Mark the step as best-effort: a failure is recorded but does not halt.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn reference(&self) -> StepRef {
        StepRef {
            order: self.order,
            name: self.name.clone(),
        }
    }
}

/// Identifies a step in results and errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRef {
    pub order: u32,
    pub name: String,
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.order, self.name)
    }
}

/// A step that ran to completion, with its exit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: StepRef,
    pub exit_code: i32,
}

impl StepOutcome {
    pub const fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// What the dependency pipeline did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Steps in the order they ran.
    pub executed: Vec<StepOutcome>,
    /// The required step whose failure stopped the pipeline.
    pub halted_at: Option<StepRef>,
}

impl PipelineResult {
    pub const fn is_success(&self) -> bool {
        self.halted_at.is_none()
    }

    /// Exit code of the halting step, if the pipeline halted.
    pub fn halted_exit_code(&self) -> Option<i32> {
        let halted = self.halted_at.as_ref()?;
        self.executed
            .iter()
            .rev()
            .find(|outcome| &outcome.step == halted)
            .map(|outcome| outcome.exit_code)
    }

    pub fn executed_names(&self) -> Vec<&str> {
        self.executed
            .iter()
            .map(|outcome| outcome.step.name.as_str())
            .collect()
    }
}
