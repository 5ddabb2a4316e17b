//! Catalog document persistence.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogFormat, Result};

/// Persistence hook for the shared catalog.
///
/// The catalog is always replaced as a whole document; there is no partial
/// update.
pub trait CatalogStorage {
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Catalog>>;

    fn save(&self, catalog: &Catalog) -> Result<()>;
}

/// Catalog stored in a single JSON or TOML file.
#[derive(Debug, Clone)]
pub struct FileCatalogStorage {
    path: PathBuf,
}

impl FileCatalogStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStorage for FileCatalogStorage {
    fn load(&self) -> Result<Option<Catalog>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_catalog(&self.path).map(Some)
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        save_catalog(catalog, &self.path)
    }
}

/// Read a catalog document; the format follows the file extension.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::io("read", path, e))?;
    let catalog =
        Catalog::parse(&text, CatalogFormat::from_path(path)).map_err(|e| e.at_path(path))?;
    info!(path = %path.display(), kinds = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Write a catalog document atomically; the format follows the file extension.
pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let text = catalog.render(CatalogFormat::from_path(path))?;
    write_atomic(path, text.as_bytes()).map_err(|e| CatalogError::io("write", path, e))?;
    info!(path = %path.display(), kinds = catalog.len(), "saved catalog");
    Ok(())
}

/// Write to a sibling temp file, sync, then rename over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CatalogEntry;
    use tempfile::tempdir;

    #[test]
    fn write_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.json");
        write_atomic(&path, b"{}").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!dir.path().join("nested").join("catalog.json.tmp").exists());
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let storage = FileCatalogStorage::new(dir.path().join("absent.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_catalog(&path).unwrap_err();
        match err {
            CatalogError::Parse { path: Some(p), format, .. } => {
                assert_eq!(p, path);
                assert_eq!(format, CatalogFormat::Json);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn storage_round_trips() {
        let dir = tempdir().unwrap();
        let storage = FileCatalogStorage::new(dir.path().join("catalog.json"));
        let catalog =
            Catalog::new().with_entry("Lens", CatalogEntry::new("Lens").with_factor("coating", "AR", 0.97));
        storage.save(&catalog).unwrap();
        assert_eq!(storage.load().unwrap(), Some(catalog));
    }
}
