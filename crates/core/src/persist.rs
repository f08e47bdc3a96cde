//! Persistence (component L, ambient) — the `.codebasemap` JSON file
//! described in §6's external interfaces. Plain `serde_json` round-trip;
//! no network, no database.

use crate::error::{CoreError, Result};
use crate::model::ProjectIndex;
use std::path::Path;

/// Default persisted index filename.
pub const DEFAULT_INDEX_FILENAME: &str = ".codebasemap";

/// Alternate filename recognized when locating an existing index.
pub const ALTERNATE_INDEX_FILENAME: &str = "PROJECT_INDEX.json";

fn wrap_io(path: &Path, operation: &str, source: std::io::Error) -> CoreError {
    CoreError::Filesystem { path: path.to_path_buf(), operation: operation.to_string(), source }
}

/// Serializes `index` as pretty JSON and writes it to `path`.
pub fn save_index(index: &ProjectIndex, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(index).map_err(|e| CoreError::Unexpected {
        operation: "serializing project index".to_string(),
        cause: e.to_string(),
    })?;
    std::fs::write(path, json).map_err(|e| wrap_io(path, "writing index file", e))
}

/// Reads and deserializes a `ProjectIndex` from `path`.
pub fn load_index(path: &Path) -> Result<ProjectIndex> {
    let contents = std::fs::read_to_string(path).map_err(|e| wrap_io(path, "reading index file", e))?;
    serde_json::from_str(&contents).map_err(|e| CoreError::Unexpected {
        operation: "deserializing project index".to_string(),
        cause: e.to_string(),
    })
}

/// Locates an existing index under `dir`, preferring the default filename
/// over the alternate.
pub fn find_index_file(dir: &Path) -> Option<std::path::PathBuf> {
    let default_path = dir.join(DEFAULT_INDEX_FILENAME);
    if default_path.is_file() {
        return Some(default_path);
    }
    let alternate_path = dir.join(ALTERNATE_INDEX_FILENAME);
    if alternate_path.is_file() {
        return Some(alternate_path);
    }
    None
}
