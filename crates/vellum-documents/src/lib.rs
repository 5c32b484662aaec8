//! Vellum Document Handling
//!
//! Save and load for the supported structured document types. The body
//! of a document (`state`) is opaque here; this crate owns only the
//! on-disk container, the integrity digest, and dispatch by document
//! type.

mod codec;
mod document;
mod error;

pub use codec::{
    codec_for, load_document, save_document, BudgetStatementCodec, DocumentCodec,
    ScopeFrameworkCodec,
};
pub use document::{Document, DocumentType};
pub use error::DocumentError;

pub type Result<T> = std::result::Result<T, DocumentError>;
