//! In-memory reference implementation of the asset index.

use crate::asset::{PersistentAsset, SharedAsset};
use crate::index::{AssetGuid, AssetIndex};
use crate::registry::TrackedTypeRegistry;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

struct Entry {
    guid: AssetGuid,
    type_identity: String,
    asset: SharedAsset,
}

/// Asset index backed by an in-memory table.
///
/// Guids are minted as v4 UUIDs at insertion, mirroring the index-assigned
/// identifiers of a real host. Insertion order is preserved and drives
/// discovery order.
#[derive(Default)]
pub struct InMemoryAssetIndex {
    entries: RwLock<Vec<Entry>>,
    refresh_count: AtomicUsize,
}

impl InMemoryAssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an asset, minting a stable guid for it.
    ///
    /// Returns the guid and a typed handle sharing state with the index entry.
    pub fn insert<A>(&self, asset: A) -> (AssetGuid, Arc<Mutex<A>>)
    where
        A: PersistentAsset + 'static,
    {
        let type_identity = asset.type_identity().to_string();
        let guid: AssetGuid = uuid::Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(asset));
        let shared: SharedAsset = handle.clone();

        self.entries.write().push(Entry {
            guid: guid.clone(),
            type_identity,
            asset: shared,
        });

        (guid, handle)
    }

    /// Remove an asset from the index, simulating deletion from storage
    pub fn remove(&self, guid: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|entry| entry.guid != guid);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of refresh requests received, for test observability
    pub fn refresh_count(&self) -> usize {
        self.refresh_count.load(Ordering::SeqCst)
    }
}

impl AssetIndex for InMemoryAssetIndex {
    fn find_tracked(&self, registry: &TrackedTypeRegistry) -> Vec<(AssetGuid, SharedAsset)> {
        self.entries
            .read()
            .iter()
            .filter(|entry| registry.is_tracked(&entry.type_identity))
            .map(|entry| (entry.guid.clone(), entry.asset.clone()))
            .collect()
    }

    fn resolve(&self, guid: &str) -> Option<SharedAsset> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.guid == guid)
            .map(|entry| entry.asset.clone())
    }

    fn refresh(&self) {
        self.refresh_count.fetch_add(1, Ordering::SeqCst);
        debug!("asset index refresh requested");
    }
}
