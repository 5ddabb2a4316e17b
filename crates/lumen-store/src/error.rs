//! Store error types.
//!
//! Actions never fail; errors only come from reading and writing project
//! files.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {operation} project file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize project document")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid project document: {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Short message suitable for a status line.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the file at {}", operation, path.display()),
            Self::Serialization { .. } => {
                "An error occurred while encoding the project.".to_string()
            }
            Self::Deserialization { path, source } => format!(
                "The file at {} is not a valid project document ({source}).",
                path.display()
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
