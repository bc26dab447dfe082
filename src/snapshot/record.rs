//! Wire types for the snapshot cache artifact.
//!
//! The on-disk document has the fixed shape
//! `{ "cachedObjects": [ { "type", "json", "assetGuid" }, ... ] }`.
//! There is no version field; format changes are not backward compatible.

use serde::{Deserialize, Serialize};

/// One persisted object's captured state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Globally-resolvable type name of the captured object
    #[serde(rename = "type")]
    pub type_identity: String,

    /// JSON blob of all fields, with excluded field keys carrying the
    /// exclusion suffix
    pub json: String,

    /// Index-assigned stable identifier used to re-locate the live object
    #[serde(rename = "assetGuid")]
    pub asset_guid: String,
}

/// Root container wrapping the ordered collection of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSet {
    #[serde(rename = "cachedObjects")]
    pub cached_objects: Vec<SnapshotRecord>,
}
