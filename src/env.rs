//! Environment constants and path utilities for the snapshot cache.
//!
//! Centralizes the hardcoded file names and path construction used by the
//! cache store so they are easy to maintain and modify.

use std::path::{Path, PathBuf};

/// File name of the snapshot cache artifact, created at the project root.
pub const CACHE_FILE_NAME: &str = "scriptable_objects.cache";

/// Build the snapshot cache file path from a project root
pub fn cache_file_path(project_root: &Path) -> PathBuf {
    project_root.join(CACHE_FILE_NAME)
}
