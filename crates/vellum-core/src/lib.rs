//! Vellum Core
//!
//! Central coordination layer for the Vellum shell. The shell owns all
//! state; the presentation layer renders what the shell reports and
//! funnels every intent back through it.

mod config;
mod error;
mod recent;
mod shell;

pub use config::Config;
pub use error::CoreError;
pub use recent::{RecentDocument, RecentDocuments};
pub use shell::{ConnectStatus, Shell};

// Re-export core components
pub use vellum_attestation::{
    check_connect_attestation, Attestation, AttestationClient, AttestationError,
    AttestationRequest, AttestationSigner, ConnectAttestation, SchemaField,
};
pub use vellum_documents::{
    load_document, save_document, Document, DocumentCodec, DocumentError, DocumentType,
};
pub use vellum_session::{Session, SessionError, SessionManager};
pub use vellum_storage::{Database, StorageError};
pub use vellum_tabs::{
    handle_drag_end, handle_root_drop, reorder, CollectionHandle, DragEndEvent, DropPayload,
    DropPosition, Tab, TabCollection, TabError, ViewportBounds,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
