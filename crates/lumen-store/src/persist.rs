//! Project files: the snapshot document as indented JSON.

use std::fs;
use std::path::Path;

use lumen_catalog::write_atomic;
use lumen_model::ProjectSnapshot;
use tracing::info;

use crate::error::{Result, StoreError};

/// Write `doc` to `path` atomically (temp file, sync, rename).
pub fn save_project(path: &Path, doc: &ProjectSnapshot) -> Result<()> {
    let text = serde_json::to_string_pretty(doc)
        .map_err(|source| StoreError::Serialization { source })?;
    write_atomic(path, text.as_bytes()).map_err(|source| StoreError::Io {
        operation: "write",
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        chains = doc.chains.len(),
        nodes = doc.nodes.len(),
        "saved project"
    );
    Ok(())
}

pub fn load_project(path: &Path) -> Result<ProjectSnapshot> {
    let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    let doc: ProjectSnapshot =
        serde_json::from_str(&text).map_err(|source| StoreError::Deserialization {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        chains = doc.chains.len(),
        nodes = doc.nodes.len(),
        "loaded project"
    );
    Ok(doc)
}
