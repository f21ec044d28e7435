// src/services/download.rs

//! Bounded-concurrency image downloader with idempotent skip.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{DownloadConfig, GallerySet, ImageStub};
use crate::utils::http::Fetcher;

/// Outcome of one image download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded,
    /// Destination file already exists
    SkippedExisting,
    /// Stub never resolved to a binary URL
    SkippedUnresolved,
    /// Destination directory is missing
    MissingDir,
    Failed,
}

/// Tally of download outcomes for one set or one whole run.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub skipped_unresolved: usize,
    pub failed: usize,
}

impl DownloadStats {
    pub fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::SkippedExisting => self.skipped_existing += 1,
            DownloadOutcome::SkippedUnresolved => self.skipped_unresolved += 1,
            DownloadOutcome::MissingDir | DownloadOutcome::Failed => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: &DownloadStats) {
        self.downloaded += other.downloaded;
        self.skipped_existing += other.skipped_existing;
        self.skipped_unresolved += other.skipped_unresolved;
        self.failed += other.failed;
    }
}

/// Downloads a set's resolved images into its own subdirectory.
pub struct Downloader<'a> {
    fetcher: &'a Fetcher,
    config: &'a DownloadConfig,
}

impl<'a> Downloader<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a DownloadConfig) -> Self {
        Self { fetcher, config }
    }

    fn set_dir(&self, set: &GallerySet) -> PathBuf {
        Path::new(&self.config.output_dir).join(set.dir_name())
    }

    /// Path of a set's completion marker.
    pub fn marker_path(&self, set: &GallerySet) -> PathBuf {
        self.set_dir(set).join("info.txt")
    }

    /// Whether a set already carries its completion marker.
    pub fn is_complete(&self, set: &GallerySet) -> bool {
        self.marker_path(set).is_file()
    }

    /// Download every resolved image of a set under the bounded pool, then
    /// write the completion marker.
    ///
    /// The marker is written after the sweep regardless of per-image
    /// outcomes: a marked set is never revisited on later runs.
    pub async fn download_set(&self, set: &GallerySet) -> Result<DownloadStats> {
        let dir = self.set_dir(set);
        tokio::fs::create_dir_all(&dir).await?;

        let mut stats = DownloadStats::default();
        {
            let mut outcomes = stream::iter(&set.images)
                .map(|stub| self.download_image(&dir, stub))
                .buffer_unordered(self.config.pool_size.max(1));
            while let Some(outcome) = outcomes.next().await {
                stats.record(outcome);
            }
        }

        self.write_marker(set).await?;
        log::info!(
            "Set '{}': {} downloaded, {} already present, {} unresolved, {} failed",
            set.title,
            stats.downloaded,
            stats.skipped_existing,
            stats.skipped_unresolved,
            stats.failed
        );
        Ok(stats)
    }

    /// Download a single image into `dir`.
    ///
    /// Never fails the caller: missing directory, unresolved stub, existing
    /// file, and transfer errors all map to their outcome.
    pub async fn download_image(&self, dir: &Path, stub: &ImageStub) -> DownloadOutcome {
        if !dir.is_dir() {
            log::warn!("Destination directory missing: {}", dir.display());
            return DownloadOutcome::MissingDir;
        }

        let Some(image) = &stub.resolved else {
            log::debug!("Skipping unresolved image {}", stub.page_url);
            return DownloadOutcome::SkippedUnresolved;
        };

        let dest = dir.join(image.file_name());
        if dest.is_file() {
            log::debug!("Already exists, skipping {}", dest.display());
            return DownloadOutcome::SkippedExisting;
        }

        match self.fetch_to_file(&image.binary_url, &dest).await {
            Ok(()) => {
                log::debug!("Downloaded {}", dest.display());
                DownloadOutcome::Downloaded
            }
            Err(e) => {
                log::warn!("Download failed for {}: {e}", image.binary_url);
                DownloadOutcome::Failed
            }
        }
    }

    /// Stream the binary to a temp file, then rename into place so a failed
    /// transfer never leaves a partial destination file.
    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<()> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let response = self
            .fetcher
            .fetch_stream(url, timeout)
            .await
            .map_err(|e| AppError::download(url, e))?;

        let tmp = dest.with_extension("part");
        match self.write_stream(response, &tmp).await {
            Ok(()) => {
                tokio::fs::rename(&tmp, dest)
                    .await
                    .map_err(|e| AppError::download(url, e))?;
                Ok(())
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&tmp).await;
                Err(AppError::download(url, e))
            }
        }
    }

    async fn write_stream(&self, response: reqwest::Response, tmp: &Path) -> Result<()> {
        let mut file = tokio::fs::File::create(tmp).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }

    async fn write_marker(&self, set: &GallerySet) -> Result<()> {
        let content = format!("Set url: {}\nFetched: {}\n", set.url, Utc::now().to_rfc3339());
        tokio::fs::write(self.marker_path(set), content).await?;
        Ok(())
    }
}
