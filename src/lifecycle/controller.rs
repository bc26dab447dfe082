//! The lifecycle controller and its restore procedure.

use crate::index::AssetIndex;
use crate::registry::TrackedTypeRegistry;
use crate::snapshot::{CacheStore, SnapshotRecord, capture_all};
use anyhow::Result;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the controller currently sits relative to a transient session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session running; saves trigger snapshots
    Idle,
    /// A transient session is running; saves are passed through untouched
    SessionActive,
    /// The session ended and a delayed restore is scheduled
    RestorePending,
}

/// Configuration for the lifecycle controller
#[derive(Debug, Clone)]
pub struct PreserveConfig {
    /// How long to wait after session end before touching object state, so
    /// the host finishes tearing the session down first
    pub restore_delay: Duration,
}

impl Default for PreserveConfig {
    fn default() -> Self {
        Self {
            restore_delay: Duration::from_secs(1),
        }
    }
}

/// Orchestrates snapshot capture around saves and delayed restoration around
/// session boundaries.
///
/// Snapshot and restore are mutually exclusive by construction: a
/// save-triggered snapshot is suppressed while a session is active, and a
/// session cannot end twice without an intervening begin. The cache file is
/// the only shared mutable resource and is never accessed concurrently.
pub struct PreserveController {
    index: Arc<dyn AssetIndex>,
    registry: TrackedTypeRegistry,
    store: Arc<CacheStore>,
    phase: Arc<RwLock<SessionPhase>>,
    config: PreserveConfig,
}

impl PreserveController {
    /// Create a controller whose cache lives under the given project root
    pub fn new(
        index: Arc<dyn AssetIndex>,
        registry: TrackedTypeRegistry,
        project_root: impl AsRef<Path>,
        config: PreserveConfig,
    ) -> Self {
        Self {
            index,
            registry,
            store: Arc::new(CacheStore::new(project_root)),
            phase: Arc::new(RwLock::new(SessionPhase::Idle)),
            config,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.read()
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Process-start hook.
    ///
    /// When the process is not about to enter a session, a stale cache left by
    /// an unexpected prior exit is applied immediately, as if a session had
    /// just ended.
    pub async fn on_startup(&self, entering_session: bool) -> Result<usize> {
        if entering_session {
            debug!("Startup while entering a session, skipping recovery restore");
            return Ok(0);
        }

        info!("Running startup recovery restore");
        self.restore_now().await
    }

    /// Pre-save hook.
    ///
    /// Outside a session the full snapshot procedure runs synchronously before
    /// the save proceeds. While a session is active or a restore is pending
    /// the snapshot is skipped, the cache already reflects pre-session state.
    pub async fn on_will_save(&self) -> Result<()> {
        if *self.phase.read() != SessionPhase::Idle {
            debug!("Session active, skipping pre-save snapshot");
            return Ok(());
        }

        let records = capture_all(self.index.as_ref(), &self.registry);
        self.store.save(records).await
    }

    /// Session-begin hook. State is tracked only so the save-skip logic above
    /// can branch.
    pub fn on_session_begin(&self) {
        *self.phase.write() = SessionPhase::SessionActive;
        debug!("Transient session began");
    }

    /// Session-end hook.
    ///
    /// Loads the cached set and schedules a one-shot deferred job carrying it
    /// as payload: sleep for the configured delay, apply the restore, then
    /// transition back to idle. The job is never cancelled; if the process
    /// exits during the delay the next startup's recovery restore covers it.
    pub async fn on_session_end(&self) -> JoinHandle<()> {
        *self.phase.write() = SessionPhase::RestorePending;
        debug!("Transient session ended, restore pending");

        let records = match self.store.load().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load snapshot cache, restoring nothing: {}", e);
                Vec::new()
            }
        };

        let delay = self.config.restore_delay;
        let index = self.index.clone();
        let phase = self.phase.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            apply_records(index.as_ref(), &records);
            *phase.write() = SessionPhase::Idle;
        })
    }

    /// Load the cache and apply it immediately. Returns the number of objects
    /// restored.
    pub async fn restore_now(&self) -> Result<usize> {
        let records = self.store.load().await?;
        Ok(apply_records(self.index.as_ref(), &records))
    }
}

/// Overwrite live object state from cached records.
///
/// A record whose identifier no longer resolves is skipped, never failing the
/// batch. Every successfully-updated instance is flagged as having unsaved
/// changes, and the index is asked to refresh once after the batch. An empty
/// set is a no-op and does not trigger a refresh.
fn apply_records(index: &dyn AssetIndex, records: &[SnapshotRecord]) -> usize {
    if records.is_empty() {
        debug!("No cached objects to restore");
        return 0;
    }

    let mut restored = 0;
    for record in records {
        let Some(asset) = index.resolve(&record.asset_guid) else {
            warn!(
                "Cached object {} ({}) no longer resolves, skipping",
                record.asset_guid, record.type_identity
            );
            continue;
        };

        let mut asset = asset.lock();
        if let Err(e) = asset.overwrite_from_json(&record.json) {
            warn!(
                "Failed to restore {} ({}): {}",
                record.asset_guid, record.type_identity, e
            );
            continue;
        }
        asset.mark_dirty();
        restored += 1;
    }

    index.refresh();
    info!("Restored {} of {} cached objects", restored, records.len());
    restored
}
