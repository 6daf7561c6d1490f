//! Asset preflight: make sure the task's model artifacts are on disk.
//!
//! Bundles whose expected paths already exist are left alone. Missing ones
//! are downloaded into the downloads directory and unpacked into the
//! working directory. Files that cannot be fetched automatically are only
//! checked for, with a hint when absent.

mod fetch;
mod share_link;

pub use fetch::{HttpAssetFetcher, extract_zip};
pub use share_link::direct_download_url;

use preflight_core::domain::{AssetBundle, AssetPlan};
use preflight_core::ports::{AssetError, AssetFetcher};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct AssetPreflight<'a> {
    fetcher: &'a dyn AssetFetcher,
    workdir: &'a Path,
    cancel: CancellationToken,
}

impl<'a> AssetPreflight<'a> {
    pub const fn new(
        fetcher: &'a dyn AssetFetcher,
        workdir: &'a Path,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            workdir,
            cancel,
        }
    }

    /// Bring every bundle in `plan` up to date, then check required files.
    ///
    /// Returns the names of bundles that were fetched.
    pub async fn ensure(&self, plan: &AssetPlan) -> Result<Vec<String>, AssetError> {
        let downloads = self.workdir.join(&plan.downloads_dir);
        let mut fetched = Vec::new();

        for bundle in &plan.bundles {
            if self.ensure_bundle(bundle, &downloads).await? {
                fetched.push(bundle.name.clone());
            }
        }

        for required in &plan.required_files {
            let path = self.workdir.join(&required.path);
            if !path.is_file() {
                return Err(AssetError::RequiredFileMissing {
                    path,
                    hint: required.hint.clone(),
                });
            }
        }

        Ok(fetched)
    }

    async fn ensure_bundle(&self, bundle: &AssetBundle, downloads: &Path) -> Result<bool, AssetError> {
        let missing = bundle.missing_paths(self.workdir);
        if missing.is_empty() {
            debug!("Bundle '{}' already in place", bundle.name);
            return Ok(false);
        }

        let archive = downloads.join(&bundle.archive_name);
        if archive.is_file() {
            info!("Reusing downloaded archive {}", archive.display());
        } else {
            info!("Downloading '{}' ({} paths missing)", bundle.name, missing.len());
            tokio::select! {
                result = self.fetcher.fetch(&bundle.url, &archive) => result?,
                () = self.cancel.cancelled() => return Err(AssetError::Interrupted),
            }
        }

        info!("Unpacking {} into {}", archive.display(), self.workdir.display());
        self.fetcher.unpack(&archive, self.workdir)?;

        let still_missing = bundle.missing_paths(self.workdir);
        if !still_missing.is_empty() {
            return Err(AssetError::StillMissing {
                bundle: bundle.name.clone(),
                paths: still_missing,
            });
        }
        Ok(true)
    }
}
