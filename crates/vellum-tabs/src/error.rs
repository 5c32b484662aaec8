//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Malformed tab token: {0}")]
    MalformedToken(#[from] serde_json::Error),

    #[error("Unsupported tab token version: {0}")]
    UnsupportedTokenVersion(u32),

    #[error("Tab token is missing an id")]
    MissingId,
}
