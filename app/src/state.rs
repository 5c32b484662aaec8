//! Application state management

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use vellum_core::{CollectionHandle, Config, CoreError, Result, Shell};

use crate::events::{TabEventBinding, TabEvents};

/// Everything the host tracks for one open window.
pub struct WindowState {
    pub session_id: String,
    pub events: TabEvents,
    pub handle: CollectionHandle,
    /// Keeps the channel subscriptions alive for the window's lifetime
    _binding: TabEventBinding,
}

/// Thread-safe application state wrapper
pub struct AppState {
    shell: Arc<RwLock<Option<Shell>>>,
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl AppState {
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let shell = Shell::new(config)?;

        Ok(Self {
            shell: Arc::new(RwLock::new(Some(shell))),
            windows: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Restore sessions and bind the main window to the active one.
    pub fn initialize(&self) -> Result<()> {
        let active_id = {
            let guard = self.shell.read();
            let shell = guard.as_ref().ok_or(CoreError::NotInitialized)?;
            shell.initialize()?;
            shell.session_manager().active_session()?.id
        };

        self.open_window("main", active_id)?;
        Ok(())
    }

    pub fn with_shell<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Shell) -> Result<T>,
    {
        let guard = self.shell.read();
        match guard.as_ref() {
            Some(shell) => f(shell),
            None => Err(CoreError::NotInitialized),
        }
    }

    /// Bind a window label to a session: restore its collection and wire
    /// the host channels to it.
    pub fn open_window(&self, window_label: &str, session_id: String) -> Result<()> {
        let handle = self.with_shell(|shell| shell.open_collection(&session_id))?;

        let events = TabEvents::new();
        let binding = TabEventBinding::bind(&events, handle.clone());

        self.windows.write().insert(
            window_label.to_string(),
            WindowState {
                session_id,
                events,
                handle,
                _binding: binding,
            },
        );

        tracing::info!(window_label = %window_label, "Opened window");

        Ok(())
    }

    /// Tear a window down: drop its channel subscriptions, persist and
    /// dispose its collection.
    pub fn close_window(&self, window_label: &str) -> Result<()> {
        let window = self.windows.write().remove(window_label);

        if let Some(window) = window {
            self.with_shell(|shell| shell.close_collection(&window.session_id))?;
            tracing::info!(window_label = %window_label, "Closed window");
        }

        Ok(())
    }

    pub fn session_id_for_window(&self, window_label: &str) -> Result<String> {
        if let Some(window) = self.windows.read().get(window_label) {
            return Ok(window.session_id.clone());
        }

        // Unknown label: adopt the active session, like a fresh window
        let id = self.with_shell(|shell| Ok(shell.session_manager().active_session()?.id))?;
        self.open_window(window_label, id.clone())?;
        Ok(id)
    }

    pub fn window_events(&self, window_label: &str) -> Option<TabEvents> {
        self.windows
            .read()
            .get(window_label)
            .map(|window| window.events.clone())
    }

    pub fn window_handle(&self, window_label: &str) -> Option<CollectionHandle> {
        self.windows
            .read()
            .get(window_label)
            .map(|window| window.handle.clone())
    }

    pub fn window_labels(&self) -> Vec<String> {
        self.windows.read().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_state(dir: &Path) -> AppState {
        let mut config = Config::new(dir.to_path_buf());
        config.documents_dir = dir.join("Documents");
        let state = AppState::with_config(config).unwrap();
        state.initialize().unwrap();
        state
    }

    #[test]
    fn test_initialize_opens_main_window() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        assert!(state.window_events("main").is_some());
        assert!(state.window_handle("main").is_some());
    }

    #[test]
    fn test_host_push_reaches_window_collection() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let tab = vellum_core::Tab::new("Pushed");
        let events = state.window_events("main").unwrap();
        events.publish_add(&tab.to_token().unwrap());

        let handle = state.window_handle("main").unwrap();
        assert!(handle.read(|collection| collection.contains(&tab.id)));
    }

    #[test]
    fn test_close_window_disposes_collection() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let handle = state.window_handle("main").unwrap();
        state.close_window("main").unwrap();

        assert!(!handle.is_live());
        assert!(state.window_events("main").is_none());
    }

    #[test]
    fn test_unknown_window_adopts_active_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let main_session = state.session_id_for_window("main").unwrap();
        let other_session = state.session_id_for_window("window-xyz").unwrap();

        assert_eq!(main_session, other_session);
        assert!(state.window_events("window-xyz").is_some());
    }
}
