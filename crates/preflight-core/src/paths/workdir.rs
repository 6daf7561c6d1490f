//! Resolution of the directory the orchestrator works in.

use std::path::{Path, PathBuf};

use super::error::PathError;

/// How the working directory was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkdirSource {
    /// `PREFLIGHT_WORKDIR` was set.
    EnvVar,
    /// The directory containing the orchestrator executable.
    Executable,
    /// The process's current directory.
    CurrentDir,
}

/// Resolution result for the working directory.
#[derive(Debug, Clone)]
pub struct WorkdirResolution {
    pub path: PathBuf,
    pub source: WorkdirSource,
}

/// Resolve the working directory.
///
/// Resolution order:
/// 1. `env_override` when non-blank (must be an existing directory)
/// 2. The executable's directory, when it contains `marker` (the dependency manifest)
/// 3. `current_dir`
pub fn resolve_workdir(
    env_override: Option<&str>,
    executable_dir: Option<&Path>,
    current_dir: Result<PathBuf, std::io::Error>,
    marker: &str,
) -> Result<WorkdirResolution, PathError> {
    if let Some(raw) = env_override.map(str::trim).filter(|raw| !raw.is_empty()) {
        let path = PathBuf::from(raw);
        if !path.exists() {
            return Err(PathError::DirectoryNotFound(path));
        }
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path));
        }
        return Ok(WorkdirResolution {
            path,
            source: WorkdirSource::EnvVar,
        });
    }

    if let Some(dir) = executable_dir
        && dir.join(marker).is_file()
    {
        return Ok(WorkdirResolution {
            path: dir.to_path_buf(),
            source: WorkdirSource::Executable,
        });
    }

    let path = current_dir.map_err(|e| PathError::CurrentDirError(e.to_string()))?;
    Ok(WorkdirResolution {
        path,
        source: WorkdirSource::CurrentDir,
    })
}
