//! Session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Whether this is the currently active session
    pub is_active: bool,
    /// Id of the selected tab, if any
    pub selected_tab: Option<String>,
}

impl Session {
    pub fn new(name: String) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: now,
            updated_at: now,
            is_active: false,
            selected_tab: None,
        }
    }

    /// Create a default session for new users
    pub fn default_session() -> Self {
        let mut session = Self::new("Default".to_string());
        session.is_active = true;
        session
    }

    /// Rename the session
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new("Work".to_string());
        assert_eq!(session.name, "Work");
        assert!(!session.is_active);
        assert_eq!(session.selected_tab, None);
    }

    #[test]
    fn test_rename_touches_updated_at() {
        let mut session = Session::new("Work".to_string());
        let before = session.updated_at;
        session.rename("Budget review".to_string());
        assert_eq!(session.name, "Budget review");
        assert!(session.updated_at >= before);
    }
}
