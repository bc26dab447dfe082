use crate::asset::{self, AssetError, PersistentAsset};
use crate::index::InMemoryAssetIndex;
use crate::lifecycle::*;
use crate::registry::{TrackedType, TrackedTypeRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerStats {
    level: u32,
    score: i64,
    high_score: i64,
    #[serde(skip)]
    dirty: bool,
}

impl PlayerStats {
    fn new(level: u32, score: i64, high_score: i64) -> Self {
        Self {
            level,
            score,
            high_score,
            dirty: false,
        }
    }
}

impl PersistentAsset for PlayerStats {
    fn type_identity(&self) -> &str {
        "game::PlayerStats"
    }

    fn to_json(&self, pretty: bool) -> Result<String, AssetError> {
        asset::to_json(self, pretty)
    }

    fn overwrite_from_json(&mut self, json: &str) -> Result<(), AssetError> {
        asset::merge_overwrite(self, json)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

fn test_config() -> PreserveConfig {
    PreserveConfig {
        restore_delay: Duration::from_millis(10),
    }
}

fn test_controller(
    temp_dir: &TempDir,
) -> (Arc<InMemoryAssetIndex>, Arc<PreserveController>) {
    let mut registry = TrackedTypeRegistry::new();
    registry.register(TrackedType::new("game::PlayerStats").persist_field("high_score"));

    let index = Arc::new(InMemoryAssetIndex::new());
    let controller = Arc::new(PreserveController::new(
        index.clone(),
        registry,
        temp_dir.path(),
        test_config(),
    ));
    (index, controller)
}

#[tokio::test]
async fn test_snapshot_and_restore_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 1, 0));

    controller.on_will_save().await.unwrap();

    controller.on_session_begin();
    stats.lock().score = 99;
    stats.lock().level = 7;

    let restore = controller.on_session_end().await;
    restore.await.unwrap();

    let stats = stats.lock();
    assert_eq!(stats.score, 1);
    assert_eq!(stats.level, 1);
    assert!(stats.is_dirty());
    assert_eq!(index.refresh_count(), 1);
}

#[tokio::test]
async fn test_excluded_field_keeps_in_session_value() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 10, 5));

    controller.on_will_save().await.unwrap();

    // The cached blob carries the rewritten key, not the original one
    let cached = tokio::fs::read_to_string(controller.store().cache_path())
        .await
        .unwrap();
    assert!(cached.contains("high_score__IGNORED"));

    controller.on_session_begin();
    stats.lock().high_score = 42;
    stats.lock().score = 999;

    let restore = controller.on_session_end().await;
    restore.await.unwrap();

    let stats = stats.lock();
    assert_eq!(stats.high_score, 42, "persist field keeps in-session value");
    assert_eq!(stats.score, 10, "other fields revert to snapshotted values");
}

#[tokio::test]
async fn test_save_during_session_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 1, 0));

    controller.on_will_save().await.unwrap();

    controller.on_session_begin();
    stats.lock().score = 99;

    // An in-session save must not re-capture the mutated state
    controller.on_will_save().await.unwrap();

    let restore = controller.on_session_end().await;
    restore.await.unwrap();

    assert_eq!(stats.lock().score, 1);
}

#[tokio::test]
async fn test_missing_object_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (doomed_guid, _doomed) = index.insert(PlayerStats::new(1, 1, 0));
    let (_guid, survivor) = index.insert(PlayerStats::new(2, 2, 0));

    controller.on_will_save().await.unwrap();

    controller.on_session_begin();
    survivor.lock().score = 99;
    assert!(index.remove(&doomed_guid));

    let restore = controller.on_session_end().await;
    restore.await.unwrap();

    // The unresolvable record is skipped, the rest of the batch still applies
    assert_eq!(survivor.lock().score, 2);
    assert_eq!(index.refresh_count(), 1);
}

#[tokio::test]
async fn test_empty_cache_restore_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 55, 0));

    let restored = controller.restore_now().await.unwrap();

    assert_eq!(restored, 0);
    assert_eq!(stats.lock().score, 55);
    assert!(!stats.lock().is_dirty());
    assert_eq!(index.refresh_count(), 0, "empty set must not trigger a refresh");
}

#[tokio::test]
async fn test_startup_recovery_applies_stale_cache() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 1, 0));

    controller.on_will_save().await.unwrap();

    // Simulate a crashed process that never ran its post-session restore
    stats.lock().score = 99;

    let restored = controller.on_startup(false).await.unwrap();

    assert_eq!(restored, 1);
    assert_eq!(stats.lock().score, 1);
}

#[tokio::test]
async fn test_startup_entering_session_skips_recovery() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 1, 0));

    controller.on_will_save().await.unwrap();
    stats.lock().score = 99;

    let restored = controller.on_startup(true).await.unwrap();

    assert_eq!(restored, 0);
    assert_eq!(stats.lock().score, 99);
}

#[tokio::test]
async fn test_idempotent_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, _stats) = index.insert(PlayerStats::new(3, 30, 300));

    controller.on_will_save().await.unwrap();
    let first = controller.store().load().await.unwrap();

    controller.on_will_save().await.unwrap();
    let second = controller.store().load().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_phase_transitions() {
    let temp_dir = TempDir::new().unwrap();
    let (_index, controller) = test_controller(&temp_dir);

    assert_eq!(controller.phase(), SessionPhase::Idle);

    controller.on_session_begin();
    assert_eq!(controller.phase(), SessionPhase::SessionActive);

    let restore = controller.on_session_end().await;
    assert_eq!(controller.phase(), SessionPhase::RestorePending);

    restore.await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::Idle);
}

#[tokio::test]
async fn test_event_subscription_dispatch() {
    let temp_dir = TempDir::new().unwrap();
    let (index, controller) = test_controller(&temp_dir);
    let (_guid, stats) = index.insert(PlayerStats::new(1, 1, 0));

    let subscription = controller.subscribe();

    assert!(subscription.notify(SessionEvent::WillSave));
    assert!(subscription.notify(SessionEvent::SessionBegin));

    // Wait for the listener to drain both events
    for _ in 0..100 {
        if controller.phase() == SessionPhase::SessionActive {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(controller.phase(), SessionPhase::SessionActive);

    stats.lock().score = 99;
    assert!(subscription.notify(SessionEvent::SessionEnd));

    for _ in 0..100 {
        if controller.phase() == SessionPhase::Idle {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(stats.lock().score, 1);
}

#[tokio::test]
async fn test_resubscribing_after_drop() {
    let temp_dir = TempDir::new().unwrap();
    let (_index, controller) = test_controller(&temp_dir);

    drop(controller.subscribe());

    // A fresh subscription works; there is no global slot to double-register
    let subscription = controller.subscribe();
    assert!(subscription.notify(SessionEvent::SessionBegin));

    for _ in 0..100 {
        if controller.phase() == SessionPhase::SessionActive {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(controller.phase(), SessionPhase::SessionActive);
}
