//! Artifacts the downstream task reads from the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A zip archive that provides one or more expected paths once unpacked
/// into the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
    pub name: String,
    /// Download location; share links are converted by the fetcher.
    pub url: String,
    /// File name used under the downloads directory.
    pub archive_name: String,
    /// Paths relative to the working directory that the archive provides.
    pub expected_paths: Vec<String>,
}

impl AssetBundle {
    /// Expected paths that do not exist under `workdir`.
    pub fn missing_paths(&self, workdir: &Path) -> Vec<PathBuf> {
        self.expected_paths
            .iter()
            .map(|relative| workdir.join(relative))
            .filter(|path| !path.exists())
            .collect()
    }
}

/// A file that must already exist; it cannot be fetched automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredFile {
    pub path: String,
    /// Shown to the user when the file is missing.
    pub hint: String,
}

/// Everything the asset preflight checks before the task is invoked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPlan {
    /// Directory (relative to the working directory) archives are saved to.
    pub downloads_dir: String,
    pub bundles: Vec<AssetBundle>,
    pub required_files: Vec<RequiredFile>,
}

impl AssetPlan {
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty() && self.required_files.is_empty()
    }
}
