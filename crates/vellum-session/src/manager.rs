//! Session Manager
//!
//! Handles session persistence and restoration. Sessions auto-save on
//! any mutation; a window's live `TabCollection` is written back as
//! ordered token rows plus the selection pointer.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use vellum_storage::Database;
use vellum_tabs::{Tab, TabCollection};

use crate::error::SessionError;
use crate::session::Session;
use crate::Result;

pub struct SessionManager {
    /// In-memory session cache
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    /// Currently active session ID
    active_session_id: Arc<RwLock<Option<String>>>,
    /// Database for persistence
    db: Database,
}

impl SessionManager {
    pub fn new(db: Database) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            active_session_id: Arc::new(RwLock::new(None)),
            db,
        }
    }

    /// Initialize and load sessions from database
    /// Returns the active session or creates a default one
    pub fn initialize(&self) -> Result<Session> {
        let sessions = self.load_all_sessions()?;

        let active_session = sessions
            .iter()
            .find(|s| s.is_active)
            .cloned()
            .unwrap_or_else(|| {
                let session = Session::default_session();
                if let Err(e) = self.save_session(&session) {
                    tracing::error!("Failed to save default session: {}", e);
                }
                session
            });

        *self.active_session_id.write() = Some(active_session.id.clone());

        tracing::info!(
            session_id = %active_session.id,
            session_name = %active_session.name,
            "Initialized session"
        );

        Ok(active_session)
    }

    /// Load all sessions from database
    fn load_all_sessions(&self) -> Result<Vec<Session>> {
        let sessions = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, created_at, updated_at, is_active, selected_tab FROM sessions",
            )?;

            let sessions: Vec<Session> = stmt
                .query_map([], |row| {
                    // Parse datetime strings
                    let created_str: String = row.get(2)?;
                    let updated_str: String = row.get(3)?;

                    let created_at = DateTime::parse_from_rfc3339(&created_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());
                    let updated_at = DateTime::parse_from_rfc3339(&updated_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now());

                    Ok(Session {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at,
                        updated_at,
                        is_active: row.get::<_, i32>(4)? != 0,
                        selected_tab: row.get(5)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(sessions)
        })?;

        // Cache in memory
        {
            let mut cache = self.sessions.write();
            for session in &sessions {
                cache.insert(session.id.clone(), session.clone());
            }
        }

        Ok(sessions)
    }

    /// Save session to database (auto-save on mutation)
    fn save_session(&self, session: &Session) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO sessions
                 (id, name, created_at, updated_at, is_active, selected_tab)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    session.id,
                    session.name,
                    session.created_at.to_rfc3339(),
                    session.updated_at.to_rfc3339(),
                    session.is_active as i32,
                    session.selected_tab,
                ],
            )?;
            Ok(())
        })?;

        // Update cache
        self.sessions
            .write()
            .insert(session.id.clone(), session.clone());

        Ok(())
    }

    /// Get the currently active session
    pub fn active_session(&self) -> Result<Session> {
        let active_id = self
            .active_session_id
            .read()
            .clone()
            .ok_or(SessionError::NoActiveSession)?;

        self.sessions
            .read()
            .get(&active_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(active_id))
    }

    pub fn get_session(&self, session_id: &str) -> Result<Session> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Create a new session
    pub fn create_session(&self, name: String) -> Result<Session> {
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }

        let session = Session::new(name);
        self.save_session(&session)?;

        tracing::info!(
            session_id = %session.id,
            session_name = %session.name,
            "Created new session"
        );

        Ok(session)
    }

    /// Switch to a different session
    pub fn switch_session(&self, session_id: &str) -> Result<Session> {
        // Deactivate current session
        if let Ok(mut current) = self.active_session() {
            current.is_active = false;
            self.save_session(&current)?;
        }

        // Activate new session
        let mut session = self
            .sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        session.is_active = true;
        self.save_session(&session)?;
        *self.active_session_id.write() = Some(session.id.clone());

        tracing::info!(
            session_id = %session.id,
            session_name = %session.name,
            "Switched to session"
        );

        Ok(session)
    }

    /// Get all sessions
    pub fn list_sessions(&self) -> Vec<Session> {
        self.sessions.read().values().cloned().collect()
    }

    /// Rename a session
    pub fn rename_session(&self, session_id: &str, name: String) -> Result<Session> {
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }

        let mut session = self
            .sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        session.rename(name);
        self.save_session(&session)?;

        Ok(session)
    }

    /// Delete a session (cannot delete the last session)
    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        let session_count = self.sessions.read().len();
        if session_count <= 1 {
            return Err(SessionError::CannotDeleteLastSession);
        }

        // If deleting active session, switch to another first
        {
            let active_id = self.active_session_id.read().clone();
            if active_id.as_deref() == Some(session_id) {
                if let Some(other_session) = self
                    .sessions
                    .read()
                    .values()
                    .find(|s| s.id != session_id)
                    .cloned()
                {
                    self.switch_session(&other_session.id)?;
                }
            }
        }

        // Delete from database (cascades to tab rows)
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM sessions WHERE id = ?1", [session_id])?;
            Ok(())
        })?;

        // Remove from cache
        self.sessions.write().remove(session_id);

        tracing::info!(session_id = %session_id, "Deleted session");

        Ok(())
    }

    /// Persist a window's collection: ordered token rows plus the
    /// selection pointer, replaced transactionally.
    pub fn save_collection(&self, session_id: &str, collection: &TabCollection) -> Result<()> {
        let mut session = self.get_session(session_id)?;

        let mut rows = Vec::with_capacity(collection.len());
        for tab in collection.items() {
            rows.push((tab.id.clone(), tab.to_token()?));
        }

        self.db.transaction(|conn| {
            conn.execute("DELETE FROM tabs WHERE session_id = ?1", [session_id])?;
            for (position, (tab_id, token)) in rows.iter().enumerate() {
                conn.execute(
                    "INSERT INTO tabs (id, session_id, position, token)
                     VALUES (?1, ?2, ?3, ?4)",
                    rusqlite::params![tab_id, session_id, position as i64, token],
                )?;
            }
            Ok(())
        })?;

        session.selected_tab = collection.selected_tab().map(str::to_string);
        session.updated_at = Utc::now();
        self.save_session(&session)?;

        tracing::debug!(
            session_id = %session_id,
            tab_count = collection.len(),
            "Persisted collection"
        );

        Ok(())
    }

    /// Number of persisted tabs in a session.
    pub fn tab_count(&self, session_id: &str) -> Result<usize> {
        let count: i64 = self.db.with_connection(|conn| {
            Ok(conn.query_row(
                "SELECT COUNT(*) FROM tabs WHERE session_id = ?1",
                [session_id],
                |row| row.get(0),
            )?)
        })?;

        Ok(count as usize)
    }

    /// Rebuild a collection from persisted rows. Rows whose token fails
    /// to parse are logged and skipped.
    pub fn load_collection(&self, session_id: &str) -> Result<TabCollection> {
        let session = self.get_session(session_id)?;

        let tokens: Vec<String> = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT token FROM tabs WHERE session_id = ?1 ORDER BY position ASC",
            )?;

            let tokens: Vec<String> = stmt
                .query_map([session_id], |row| row.get(0))?
                .filter_map(|r| r.ok())
                .collect();

            Ok(tokens)
        })?;

        let mut tabs = Vec::with_capacity(tokens.len());
        for token in &tokens {
            match Tab::from_token(token) {
                Ok(tab) => tabs.push(tab),
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Skipping unreadable tab row"
                    );
                }
            }
        }

        Ok(TabCollection::from_parts(tabs, session.selected_tab))
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            active_session_id: Arc::clone(&self.active_session_id),
            db: self.db.clone(),
        }
    }
}
