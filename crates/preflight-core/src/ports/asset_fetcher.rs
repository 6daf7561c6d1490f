//! Asset fetcher port for downloading and unpacking artifact archives.

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while making artifacts available.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The server answered with a non-success status.
    #[error("download of {url} failed: HTTP {status}")]
    Http { url: String, status: u16 },

    /// The transfer itself failed.
    #[error("download of {url} failed: {reason}")]
    Transfer { url: String, reason: String },

    /// A local file operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The archive could not be read or unpacked.
    #[error("failed to unpack {path}: {reason}")]
    Archive { path: PathBuf, reason: String },

    /// Paths still missing after the bundle was unpacked.
    #[error("expected artifacts missing after unpacking '{bundle}': {}", format_paths(.paths))]
    StillMissing { bundle: String, paths: Vec<PathBuf> },

    /// A file that must be provided by the user is missing.
    #[error("missing required file {path}. {hint}")]
    RequiredFileMissing { path: PathBuf, hint: String },

    /// An interrupt arrived while a download was in flight.
    #[error("interrupted while fetching assets")]
    Interrupted,
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Port for fetching artifact archives.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Download `url` to `dest`, creating parent directories as needed.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), AssetError>;

    /// Unpack the archive at `archive` into `into`.
    fn unpack(&self, archive: &Path, into: &Path) -> Result<(), AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn still_missing_lists_every_path() {
        let err = AssetError::StillMissing {
            bundle: "checkpoints".to_string(),
            paths: vec![PathBuf::from("a/b.ckpt"), PathBuf::from("c")],
        };
        assert_eq!(
            err.to_string(),
            "expected artifacts missing after unpacking 'checkpoints': a/b.ckpt, c"
        );
    }
}
