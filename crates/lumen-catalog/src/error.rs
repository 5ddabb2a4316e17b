#![deny(unsafe_code)]

use std::fmt;
use std::path::{Path, PathBuf};

/// On-disk encoding of a catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Toml,
}

impl CatalogFormat {
    /// `.toml` files are TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => CatalogFormat::Toml,
            _ => CatalogFormat::Json,
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogFormat::Json => f.write_str("JSON"),
            CatalogFormat::Toml => f.write_str("TOML"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to {operation} catalog file {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {format} catalog{}: {message}", display_path(.path))]
    Parse {
        format: CatalogFormat,
        path: Option<PathBuf>,
        message: String,
    },

    #[error("failed to encode catalog as {format}: {message}")]
    Encode {
        format: CatalogFormat,
        message: String,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" {}", p.display()))
        .unwrap_or_default()
}

impl CatalogError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn at_path(self, path: &Path) -> Self {
        match self {
            Self::Parse {
                format, message, ..
            } => Self::Parse {
                format,
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
