//! Tab token codec
//!
//! Tabs cross process boundaries as a single string: text-drag payloads
//! and host add/remove messages. The wire form is a versioned JSON
//! envelope so a foreign or stale payload is rejected instead of
//! misread.

use serde::{Deserialize, Serialize};

use crate::error::TabError;
use crate::tab::Tab;
use crate::Result;

pub const TOKEN_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct TokenEnvelope {
    v: u32,
    #[serde(flatten)]
    tab: Tab,
}

impl Tab {
    /// Serialize to the single-string wire form.
    pub fn to_token(&self) -> Result<String> {
        let envelope = TokenEnvelope {
            v: TOKEN_VERSION,
            tab: self.clone(),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Parse the wire form back into a tab.
    ///
    /// Tokens originate from untrusted sources (drag payloads, other
    /// processes); callers are expected to log and drop the error rather
    /// than propagate it.
    pub fn from_token(token: &str) -> Result<Tab> {
        let envelope: TokenEnvelope = serde_json::from_str(token)?;

        if envelope.v != TOKEN_VERSION {
            return Err(TabError::UnsupportedTokenVersion(envelope.v));
        }

        if envelope.tab.id.is_empty() {
            return Err(TabError::MissingId);
        }

        Ok(envelope.tab)
    }
}
