//! Durable cache store for snapshot records.
//!
//! One file at a fixed, project-root-relative path holds the single snapshot
//! generation. Every save fully replaces prior contents; there is no append or
//! merge. Save and load are never invoked concurrently with each other, that
//! discipline is enforced by the lifecycle state machine rather than by
//! locking.

use crate::env;
use crate::snapshot::record::{SnapshotRecord, SnapshotSet};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{info, warn};

/// Reads and writes the snapshot cache artifact
pub struct CacheStore {
    cache_path: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at the given project directory
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            cache_path: env::cache_file_path(project_root.as_ref()),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Persist the records, fully replacing any prior cache.
    ///
    /// Not transactional against crashes between delete and write; a crash
    /// mid-write can leave an empty or missing cache, which the startup
    /// recovery restore tolerates.
    pub async fn save(&self, records: Vec<SnapshotRecord>) -> Result<()> {
        let set = SnapshotSet {
            cached_objects: records,
        };
        let json =
            serde_json::to_string_pretty(&set).context("failed to serialize snapshot set")?;

        if self.cache_path.exists() {
            async_fs::remove_file(&self.cache_path)
                .await
                .with_context(|| {
                    format!("failed to delete stale cache: {}", self.cache_path.display())
                })?;
        }

        async_fs::write(&self.cache_path, json)
            .await
            .with_context(|| {
                format!("failed to write cache file: {}", self.cache_path.display())
            })?;

        info!(
            "Cached {} objects to {}",
            set.cached_objects.len(),
            self.cache_path.display()
        );
        Ok(())
    }

    /// Load the cached records.
    ///
    /// A missing cache file is "nothing to restore", not an error. A cache
    /// that exists but fails to parse is logged and treated as empty so the
    /// restore path stays available.
    pub async fn load(&self) -> Result<Vec<SnapshotRecord>> {
        if !self.cache_path.exists() {
            return Ok(Vec::new());
        }

        let content = async_fs::read_to_string(&self.cache_path)
            .await
            .with_context(|| {
                format!("failed to read cache file: {}", self.cache_path.display())
            })?;

        match serde_json::from_str::<SnapshotSet>(&content) {
            Ok(set) => Ok(set.cached_objects),
            Err(e) => {
                warn!(
                    "Cache file {} is malformed, treating as empty: {}",
                    self.cache_path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Delete the cache artifact if present
    pub async fn delete(&self) -> Result<()> {
        if self.cache_path.exists() {
            async_fs::remove_file(&self.cache_path)
                .await
                .with_context(|| {
                    format!("failed to delete cache file: {}", self.cache_path.display())
                })?;
            info!("Deleted snapshot cache {}", self.cache_path.display());
        }
        Ok(())
    }
}
