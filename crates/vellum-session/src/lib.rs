//! Vellum Session Management
//!
//! A session is one window's persisted tab set: the ordered tab tokens
//! plus the selection pointer. Sessions auto-save on any mutation and are
//! restored at startup.

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;
