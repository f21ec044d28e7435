// src/storage/checkpoint.rs

//! Append-only checkpoint of completed listing pages.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Durable record of fully processed listing pages.
///
/// Failures here are the one fatal error class of the pipeline: a run that
/// cannot read or append its checkpoint aborts.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the set of completed page numbers. A missing store is empty.
    async fn load(&self) -> Result<BTreeSet<u32>>;

    /// Durably append one completed page number. Entries are never removed.
    async fn append(&self, page: u32) -> Result<()>;
}

/// File-backed checkpoint store: one page number per line, append-only.
pub struct FsCheckpoint {
    path: PathBuf,
}

impl FsCheckpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl CheckpointStore for FsCheckpoint {
    async fn load(&self) -> Result<BTreeSet<u32>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(AppError::checkpoint(self.path_str(), e)),
        };

        let mut pages = BTreeSet::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let page = line.parse::<u32>().map_err(|e| {
                AppError::checkpoint(self.path_str(), format!("bad line '{line}': {e}"))
            })?;
            pages.insert(page);
        }
        Ok(pages)
    }

    async fn append(&self, page: u32) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::checkpoint(self.path_str(), e))?;

        file.write_all(format!("{page}\n").as_bytes())
            .await
            .map_err(|e| AppError::checkpoint(self.path_str(), e))?;
        file.flush()
            .await
            .map_err(|e| AppError::checkpoint(self.path_str(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCheckpoint::new(dir.path().join("done.txt"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsCheckpoint::new(dir.path().join("done.txt"));

        store.append(1).await.unwrap();
        store.append(3).await.unwrap();

        let pages = store.load().await.unwrap();
        assert_eq!(pages.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_append_preserves_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.txt");
        std::fs::write(&path, "1\n2\n").unwrap();

        let store = FsCheckpoint::new(&path);
        store.append(5).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "1\n2\n5\n");
    }

    #[tokio::test]
    async fn test_corrupt_line_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("done.txt");
        std::fs::write(&path, "1\nnot-a-number\n").unwrap();

        let store = FsCheckpoint::new(&path);
        assert!(store.load().await.is_err());
    }
}
