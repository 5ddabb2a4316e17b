use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid {kind} id: {value:?}")]
    InvalidId { kind: &'static str, value: String },
    #[error("invalid interval [{min}, {max}]: bounds must be finite with 0 <= min <= max")]
    InvalidInterval { min: f64, max: f64 },
    #[error("malformed project document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
