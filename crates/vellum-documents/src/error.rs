//! Document error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document \"{0}\" is not supported")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Digest mismatch for {path}, file may be corrupted")]
    DigestMismatch { path: String },

    #[error("Document type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}
