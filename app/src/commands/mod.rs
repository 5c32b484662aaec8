//! Host commands
//!
//! These commands bridge the window views to the Rust core. The shell
//! owns all state; views are stateless.

pub mod attestations;
pub mod documents;
pub mod sessions;
pub mod tabs;
pub mod windows;
