//! Bootstrap configuration.
//!
//! Behavior is fixed per invocation: the defaults below carry the pinned
//! literals, and the only runtime inputs are the interpreter override and
//! working-directory override environment variables.

use serde::{Deserialize, Serialize};
use std::env::{self, VarError};
use tracing::{debug, warn};

use crate::domain::{
    AssetBundle, AssetPlan, CapabilityPackage, CommandTemplate, InstallStep, RequiredFile,
};

/// Environment variable holding a literal interpreter binary name or path.
pub const INTERPRETER_OVERRIDE_VAR: &str = "PYTHON_BIN";

/// Environment variable overriding the working directory.
pub const WORKDIR_OVERRIDE_VAR: &str = "PREFLIGHT_WORKDIR";

/// Interpreter tried first during auto-detection.
pub const PREFERRED_INTERPRETER: &str = "python3";

/// Generic interpreter name used when the preferred one is not on `PATH`.
pub const FALLBACK_INTERPRETER: &str = "python";

/// Dependency manifest, relative to the working directory.
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Downstream task entry point, relative to the working directory.
pub const TASK_ENTRY_POINT: &str = "run_inference.py";

const DEPS_BUNDLE_URL: &str = "https://1drv.ms/u/s!ApyE_Lf3PFl2i4NcE8mgVUN3oX9nTQ?e=345HR5";
const CHECKPOINT_BUNDLE_URL: &str = "https://1drv.ms/u/s!ApyE_Lf3PFl2i4Nb_QxAif-rcumPlg?e=O82IX1";
const DATASET_HINT: &str = "Place Mean.npy and Std.npy under data/HumanML3D before running inference. \
     The HumanML3D dataset contains both files; follow the dataset instructions in the project README.";

/// Interpreter names tried during auto-detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterPreference {
    pub preferred: String,
    pub fallback: String,
}

impl Default for InterpreterPreference {
    fn default() -> Self {
        Self {
            preferred: PREFERRED_INTERPRETER.to_string(),
            fallback: FALLBACK_INTERPRETER.to_string(),
        }
    }
}

/// Everything a bootstrap run does, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    pub interpreter: InterpreterPreference,
    /// Heavy capability probed for and installed on demand.
    pub capability: CapabilityPackage,
    /// Unconditional pipeline steps; executed by ascending `order`.
    pub steps: Vec<InstallStep>,
    /// Artifacts checked after verification, before the task runs.
    pub assets: AssetPlan,
    /// The terminal step.
    pub task: CommandTemplate,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            interpreter: InterpreterPreference::default(),
            capability: default_capability(),
            steps: default_steps(),
            assets: default_assets(),
            task: CommandTemplate::interpreter([TASK_ENTRY_POINT]),
        }
    }
}

impl BootstrapConfig {
    /// Render the configuration as pretty JSON for debug output.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}

fn default_capability() -> CapabilityPackage {
    CapabilityPackage {
        name: "torch".to_string(),
        module: "torch".to_string(),
        version: "2.1.0".to_string(),
        variant: "cu118".to_string(),
        source_index: "https://download.pytorch.org/whl/cu118".to_string(),
    }
}

fn default_steps() -> Vec<InstallStep> {
    vec![
        InstallStep::required(
            1,
            "upgrade-installer",
            CommandTemplate::interpreter(["-m", "pip", "install", "--upgrade", "pip"]),
        ),
        InstallStep::required(
            2,
            "requirements",
            CommandTemplate::interpreter([
                "-m".to_string(),
                "pip".to_string(),
                "install".to_string(),
                "-r".to_string(),
                format!("{{workdir}}/{MANIFEST_FILE}"),
            ]),
        ),
        InstallStep::required(
            3,
            "local-package",
            CommandTemplate::interpreter(["-m", "pip", "install", "-e", "{workdir}"]),
        ),
    ]
}

fn default_assets() -> AssetPlan {
    AssetPlan {
        downloads_dir: "downloads".to_string(),
        bundles: vec![
            AssetBundle {
                name: "dependencies".to_string(),
                url: DEPS_BUNDLE_URL.to_string(),
                archive_name: "deps.zip".to_string(),
                expected_paths: vec!["deps/glove".to_string(), "deps/t2m_guo".to_string()],
            },
            AssetBundle {
                name: "checkpoints".to_string(),
                url: CHECKPOINT_BUNDLE_URL.to_string(),
                archive_name: "checkpoints.zip".to_string(),
                expected_paths: vec!["checkpoints/hml3d.ckpt".to_string()],
            },
        ],
        required_files: ["Mean.npy", "Std.npy"]
            .into_iter()
            .map(|file| RequiredFile {
                path: format!("data/HumanML3D/{file}"),
                hint: DATASET_HINT.to_string(),
            })
            .collect(),
    }
}

/// Read the interpreter override.
///
/// Unset and empty are treated the same; any other value is returned
/// verbatim, without trimming or validation.
pub fn interpreter_override_from_env() -> Option<String> {
    interpreter_override(env::var(INTERPRETER_OVERRIDE_VAR))
}

fn interpreter_override(value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(value) if !value.is_empty() => {
            debug!("{INTERPRETER_OVERRIDE_VAR} is set to {value:?}");
            Some(value)
        }
        Ok(_) | Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!("Ignoring {INTERPRETER_OVERRIDE_VAR}: {raw:?} is not valid UTF-8");
            None
        }
    }
}
