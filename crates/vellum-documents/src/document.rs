//! Document data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DocumentError;

/// The structured document types this shell can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "powerhouse/budget-statement")]
    BudgetStatement,
    #[serde(rename = "makerdao/scope-framework")]
    ScopeFramework,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::BudgetStatement => "powerhouse/budget-statement",
            DocumentType::ScopeFramework => "makerdao/scope-framework",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "powerhouse/budget-statement" => Ok(DocumentType::BudgetStatement),
            "makerdao/scope-framework" => Ok(DocumentType::ScopeFramework),
            other => Err(DocumentError::Unsupported(other.to_string())),
        }
    }
}

/// One structured document. `state` is the serializer's business; the
/// shell never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Which document model owns the state
    pub document_type: DocumentType,
    /// When the document was created
    pub created: DateTime<Utc>,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// Monotonic revision counter
    pub revision: u32,
    /// Opaque document-model state
    pub state: serde_json::Value,
}

impl Document {
    pub fn new(name: impl Into<String>, document_type: DocumentType) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            document_type,
            created: now,
            last_modified: now,
            revision: 0,
            state: serde_json::Value::Null,
        }
    }

    /// Record a mutation: bump the revision and the modification time.
    pub fn touch(&mut self) {
        self.revision += 1;
        self.last_modified = Utc::now();
    }
}
