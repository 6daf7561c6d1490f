//! Optional heavy capability: probe status and the pinned package that provides it.

use serde::{Deserialize, Serialize};

use super::step::{CommandTemplate, InstallStep};

/// Result of probing the interpreter for a capability module.
///
/// Deliberately two-valued: a probe that could not run at all is `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityStatus {
    Present,
    Absent,
}

impl CapabilityStatus {
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// A pinned, accelerator-specific build of the capability package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityPackage {
    /// Distribution name passed to the package manager (e.g. `torch`).
    pub name: String,
    /// Importable module name probed and verified (usually equal to `name`).
    pub module: String,
    /// Exact version literal.
    pub version: String,
    /// Local version qualifier selecting the accelerator build (e.g. `cu118`).
    pub variant: String,
    /// Alternate package index the build is served from.
    pub source_index: String,
}

impl CapabilityPackage {
    /// Order reserved for the conditional install, ahead of every pipeline step.
    pub const INSTALL_ORDER: u32 = 0;

    /// Requirement string with the pinned version and variant,
    /// e.g. `torch==2.1.0+cu118`.
    pub fn pinned_requirement(&self) -> String {
        if self.variant.is_empty() {
            format!("{}=={}", self.name, self.version)
        } else {
            format!("{}=={}+{}", self.name, self.version, self.variant)
        }
    }

    /// The conditional install expressed as step 0 of the pipeline.
    pub fn install_step(&self) -> InstallStep {
        let command = CommandTemplate::interpreter([
            "-m".to_string(),
            "pip".to_string(),
            "install".to_string(),
            self.pinned_requirement(),
            "--index-url".to_string(),
            self.source_index.clone(),
        ]);

        InstallStep::required(
            Self::INSTALL_ORDER,
            format!("install-{}", self.name),
            command,
        )
        .conditional()
    }
}
