//! Snapshot capture: discovery plus serialization of tracked assets.

use crate::index::AssetIndex;
use crate::registry::TrackedTypeRegistry;
use crate::snapshot::marker::mark_excluded_fields;
use crate::snapshot::record::SnapshotRecord;
use tracing::{debug, warn};

/// Capture the current state of every tracked asset the index knows about.
///
/// Records are emitted in discovery order. An instance that fails to serialize
/// or mark is logged and skipped; it never aborts the batch. Writing the
/// result to disk is the cache store's job.
pub fn capture_all(
    index: &dyn AssetIndex,
    registry: &TrackedTypeRegistry,
) -> Vec<SnapshotRecord> {
    let mut records = Vec::new();

    for (guid, asset) in index.find_tracked(registry) {
        let asset = asset.lock();

        let json = match asset.to_json(true) {
            Ok(json) => json,
            Err(e) => {
                warn!("Skipping asset {}: serialization failed: {}", guid, e);
                continue;
            }
        };

        let marked = match mark_excluded_fields(&json, registry.persist_fields(asset.type_identity()))
        {
            Ok(marked) => marked,
            Err(e) => {
                warn!("Skipping asset {}: field marking failed: {}", guid, e);
                continue;
            }
        };

        records.push(SnapshotRecord {
            type_identity: asset.type_identity().to_string(),
            json: marked,
            asset_guid: guid,
        });
    }

    debug!("Captured {} tracked assets", records.len());
    records
}
