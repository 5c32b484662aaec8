//! Attestation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttestationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed attestation response: {0}")]
    MalformedResponse(String),

    #[error("Signer error: {0}")]
    Signer(String),
}
