//! Persistent asset index collaborator.
//!
//! The index is the host environment's lookup-by-identifier service: it
//! enumerates live instances of tracked types, resolves a stable identifier
//! back to an instance, and refreshes its view of persistent storage. The
//! engine consumes it through the [`AssetIndex`] trait; [`InMemoryAssetIndex`]
//! is a reference implementation used by tests and embedders without a host.

pub mod memory;

pub use memory::InMemoryAssetIndex;

use crate::asset::SharedAsset;
use crate::registry::TrackedTypeRegistry;

/// Stable identifier assigned by the index.
///
/// Must keep resolving to the same logical object even if its storage location
/// changes between snapshot and restore.
pub type AssetGuid = String;

/// Host-provided lookup service over persistent asset instances
pub trait AssetIndex: Send + Sync {
    /// Enumerate every live instance whose type is registered as tracked,
    /// paired with its stable identifier, in index order
    fn find_tracked(&self, registry: &TrackedTypeRegistry) -> Vec<(AssetGuid, SharedAsset)>;

    /// Resolve a stable identifier to a live instance, `None` when the object
    /// has been deleted or moved out of the index
    fn resolve(&self, guid: &str) -> Option<SharedAsset>;

    /// Ask the index to re-scan persistent storage
    fn refresh(&self);
}
