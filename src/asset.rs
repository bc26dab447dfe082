//! The live-object surface consumed by the snapshot and restore paths.
//!
//! A [`PersistentAsset`] is any object whose field state can be serialized to
//! JSON and later overwritten in place from a cached blob. The overwrite is a
//! merge: only keys present in the blob under their original names touch the
//! target, unknown keys are ignored and never an error. Keys carrying the
//! exclusion suffix therefore leave their fields untouched by construction.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a live asset instance, as handed out by the asset index.
pub type SharedAsset = Arc<parking_lot::Mutex<dyn PersistentAsset>>;

/// Errors at the asset serialization boundary
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to serialize asset state: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("cached state is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("merged state no longer matches the asset type: {0}")]
    Apply(#[source] serde_json::Error),
}

/// A persistent object whose mutable state can be snapshotted and restored.
///
/// Implementations typically delegate to [`to_json`] and [`merge_overwrite`]
/// for any type that derives `Serialize` and `Deserialize`.
pub trait PersistentAsset: Send {
    /// Globally-resolvable type name for this asset (e.g. `game::PlayerStats`)
    fn type_identity(&self) -> &str;

    /// Serialize the full field state to JSON
    fn to_json(&self, pretty: bool) -> Result<String, AssetError>;

    /// Overwrite field state in place from a cached JSON blob.
    ///
    /// Merge semantics: only keys matching a field name are applied, all other
    /// keys are silently ignored.
    fn overwrite_from_json(&mut self, json: &str) -> Result<(), AssetError>;

    /// Flag this instance as having unsaved changes
    fn mark_dirty(&mut self);

    /// Whether this instance currently has unsaved changes
    fn is_dirty(&self) -> bool;
}

/// Serialize any serde value to JSON, optionally pretty-printed
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, AssetError> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(AssetError::Serialize)
}

/// Merge-overwrite `target` from a JSON blob.
///
/// The current state is lifted to a JSON document, every top-level key of the
/// blob that names an existing field replaces that field's value, and the
/// merged document is deserialized back into the target. Keys absent from the
/// target (including exclusion-marked keys) are dropped.
pub fn merge_overwrite<T>(target: &mut T, json: &str) -> Result<(), AssetError>
where
    T: Serialize + DeserializeOwned,
{
    let patch: Value = serde_json::from_str(json).map_err(AssetError::Parse)?;
    let mut current = serde_json::to_value(&*target).map_err(AssetError::Serialize)?;

    if let (Value::Object(fields), Value::Object(patch)) = (&mut current, patch) {
        for (key, value) in patch {
            if let Some(slot) = fields.get_mut(&key) {
                *slot = value;
            }
        }
    }

    *target = serde_json::from_value(current).map_err(AssetError::Apply)?;
    Ok(())
}
