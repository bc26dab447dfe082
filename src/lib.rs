//! # sopreserve
//!
//! Snapshots the mutable state of tracked scriptable-object assets immediately
//! before a transient session begins and restores that exact state after the
//! session ends. In-session mutations are discarded, while explicitly marked
//! fields are allowed to persist across the session boundary.
//!
//! ## Architecture Overview
//!
//! The engine consists of a few cooperating modules:
//!
//! - **[`registry`]**: Load-time registry of tracked types and their
//!   persist-across-restore field lists
//! - **[`index`]**: The host's lookup-by-identifier service, consumed through
//!   the [`AssetIndex`] trait
//! - **[`snapshot`]**: Capture, field-exclusion marking, and the single-file
//!   cache store
//! - **[`lifecycle`]**: The state machine deciding when snapshots are taken
//!   and when the delayed restore runs
//!
//! Control flow: the controller drives discovery and serialization into the
//! cache store on every save outside a session, and applies the cache back
//! onto live objects after a session ends (and proactively at process start,
//! covering an unexpected prior exit).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sopreserve::{
//!     InMemoryAssetIndex, PreserveConfig, PreserveController, SessionEvent, TrackedType,
//!     TrackedTypeRegistry,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut registry = TrackedTypeRegistry::new();
//!     registry.register(TrackedType::new("game::PlayerStats").persist_field("high_score"));
//!
//!     let index = Arc::new(InMemoryAssetIndex::new());
//!     let controller = Arc::new(PreserveController::new(
//!         index,
//!         registry,
//!         ".",
//!         PreserveConfig::default(),
//!     ));
//!
//!     // Apply any stale cache left behind by an unexpected prior exit
//!     controller.on_startup(false).await?;
//!
//!     // Bridge the host's session notifications into the controller
//!     let subscription = controller.subscribe();
//!     subscription.notify(SessionEvent::WillSave);
//!     Ok(())
//! }
//! ```

/// Live-object surface: the `PersistentAsset` trait plus the merge-overwrite
/// deserialization helpers used to apply cached state in place.
pub mod asset;

/// Cache path constants and helpers.
pub mod env;

/// Asset index collaborator trait and its in-memory reference implementation.
pub mod index;

/// Session lifecycle controller, events, and subscription plumbing.
pub mod lifecycle;

/// Tracked-type registry mapping type identity to persist-field lists.
pub mod registry;

/// Snapshot capture, field-exclusion marking, and the on-disk cache store.
pub mod snapshot;

pub use asset::{AssetError, PersistentAsset, SharedAsset};
pub use index::{AssetGuid, AssetIndex, InMemoryAssetIndex};
pub use lifecycle::{
    EventSubscription, PreserveConfig, PreserveController, SessionEvent, SessionPhase,
};
pub use registry::{TrackedType, TrackedTypeRegistry};
pub use snapshot::{CacheStore, IGNORED_SUFFIX, SnapshotRecord, SnapshotSet};
