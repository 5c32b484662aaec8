//! Tab data structure
//!
//! A tab is one open document/view. The collection only cares about `id`
//! and `name`; the remaining fields exist so a dropped or detached tab can
//! be reconstructed on the other side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Unique identifier, also the drag/drop key
    pub id: String,
    /// Display label
    pub name: String,
    /// Document type tag, e.g. "powerhouse/budget-statement"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    /// Backing file, once the document has been saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_path: Option<PathBuf>,
    /// Opaque open arguments forwarded to the view
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
}

impl Tab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            document_type: None,
            document_path: None,
            args: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn for_document(
        name: impl Into<String>,
        document_type: impl Into<String>,
        document_path: Option<PathBuf>,
    ) -> Self {
        let mut tab = Self::new(name);
        tab.document_type = Some(document_type.into());
        tab.document_path = document_path;
        tab
    }

    /// Update the display label
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Get display label (with fallback for unnamed tabs)
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled"
        } else {
            &self.name
        }
    }
}
