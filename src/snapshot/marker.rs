//! Field exclusion marking.
//!
//! Excluded fields are made self-describing inside the serialized blob: their
//! keys are rewritten with the [`IGNORED_SUFFIX`], so the restore merge skips
//! them without needing any side-channel metadata. The rewrite operates on the
//! parsed JSON document rather than on raw text, so a field name that happens
//! to appear as a substring elsewhere in the blob is never touched.

use anyhow::{Context, Result};
use serde_json::Value;

/// Suffix appended to the keys of excluded fields inside the cached blob.
pub const IGNORED_SUFFIX: &str = "__IGNORED";

/// Rewrite every key in `json` matching an excluded field name so the restore
/// merge skips it.
///
/// With zero excluded fields the input is returned unchanged without parsing.
/// Keys are renamed recursively, so excluded names inside nested serialized
/// sub-objects behave the same as at the top level.
pub fn mark_excluded_fields(json: &str, excluded: &[String]) -> Result<String> {
    if excluded.is_empty() {
        return Ok(json.to_string());
    }

    let mut doc: Value =
        serde_json::from_str(json).context("serialized state is not valid JSON")?;
    rename_excluded_keys(&mut doc, excluded);

    serde_json::to_string_pretty(&doc).context("failed to re-serialize marked state")
}

fn rename_excluded_keys(value: &mut Value, excluded: &[String]) {
    match value {
        Value::Object(map) => {
            let matches: Vec<String> = map
                .keys()
                .filter(|key| excluded.iter().any(|name| name == *key))
                .cloned()
                .collect();
            for key in matches {
                if let Some(field) = map.remove(&key) {
                    map.insert(format!("{}{}", key, IGNORED_SUFFIX), field);
                }
            }
            for nested in map.values_mut() {
                rename_excluded_keys(nested, excluded);
            }
        }
        Value::Array(items) => {
            for item in items {
                rename_excluded_keys(item, excluded);
            }
        }
        _ => {}
    }
}
