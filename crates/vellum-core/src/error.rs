//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] vellum_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] vellum_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] vellum_session::SessionError),

    #[error("Document error: {0}")]
    Document(#[from] vellum_documents::DocumentError),

    #[error("Attestation error: {0}")]
    Attestation(#[from] vellum_attestation::AttestationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shell not initialized")]
    NotInitialized,
}
