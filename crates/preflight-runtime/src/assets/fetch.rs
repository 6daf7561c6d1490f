//! HTTP download and zip extraction.

use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use preflight_core::ports::{AssetError, AssetFetcher};
use reqwest::Client;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::share_link::direct_download_url;

const USER_AGENT: &str = concat!("preflight/", env!("CARGO_PKG_VERSION"));

/// [`AssetFetcher`] that streams archives over HTTP and unpacks zip files.
#[derive(Debug, Clone, Default)]
pub struct HttpAssetFetcher {
    client: Client,
}

impl HttpAssetFetcher {
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);
    pb
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), AssetError> {
        let resolved = direct_download_url(url);
        debug!("Resolved {url} to {resolved}");

        let transfer = |e: reqwest::Error| AssetError::Transfer {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(&resolved)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(transfer)?;

        if !response.status().is_success() {
            return Err(AssetError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
        }

        // Written beside the destination and renamed on completion, so an
        // interrupted download never looks like a finished archive.
        let partial = dest.with_extension("part");
        let mut file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| AssetError::io(&partial, e))?;

        let pb = progress_bar(response.content_length().unwrap_or(0));
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transfer)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| AssetError::io(&partial, e))?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush().await.map_err(|e| AssetError::io(&partial, e))?;
        drop(file);
        pb.finish_and_clear();

        fs::rename(&partial, dest).map_err(|e| AssetError::io(dest, e))?;
        info!("Downloaded {} ({downloaded} bytes)", dest.display());
        Ok(())
    }

    fn unpack(&self, archive: &Path, into: &Path) -> Result<(), AssetError> {
        extract_zip(archive, into)
    }
}

/// Extract every entry of the zip at `archive` under `into`.
///
/// Entries whose names would escape `into` are skipped.
pub fn extract_zip(archive: &Path, into: &Path) -> Result<(), AssetError> {
    let corrupt = |reason: String| AssetError::Archive {
        path: archive.to_path_buf(),
        reason,
    };

    let file = File::open(archive).map_err(|e| AssetError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| corrupt(e.to_string()))?;
    info!("Extracting {} entries from {}", zip.len(), archive.display());

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| corrupt(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            debug!("Skipping unsafe entry {}", entry.name());
            continue;
        };
        let dest_path = into.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| AssetError::io(&dest_path, e))?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
        }

        let mut dest_file =
            File::create(&dest_path).map_err(|e| AssetError::io(&dest_path, e))?;
        io::copy(&mut entry, &mut dest_file).map_err(|e| AssetError::io(&dest_path, e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode & 0o777))
                .map_err(|e| AssetError::io(&dest_path, e))?;
        }
    }

    Ok(())
}
