//! Domain types for a single bootstrap run.
//!
//! Every value here is created fresh per invocation and discarded on exit.
//! The only state that outlives a run is whatever the install steps leave
//! behind in the target environment.

mod accelerator;
mod assets;
mod capability;
mod interpreter;
mod step;

pub use accelerator::AcceleratorReport;
pub use assets::{AssetBundle, AssetPlan, RequiredFile};
pub use capability::{CapabilityPackage, CapabilityStatus};
pub use interpreter::{InterpreterHandle, InterpreterSource};
pub use step::{
    CommandTemplate, InstallStep, PipelineResult, StepOutcome, StepRef,
    TemplateContext,
};
