//! Document commands
use std::path::PathBuf;

use vellum_core::{Document, RecentDocument};

use super::tabs::{CommandResult, TabInfo};
use crate::state::AppState;

/// Load a document file and open it in a new selected tab.
pub fn open_document(
    state: &AppState,
    window_label: &str,
    path: String,
) -> CommandResult<TabInfo> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.open_document(&session_id, &PathBuf::from(path))) {
        Ok(tab) => CommandResult::ok(tab.into()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Save a document through the codec its type names.
pub fn save_document(state: &AppState, document: Document, path: String) -> CommandResult<String> {
    let path = PathBuf::from(path);

    match state.with_shell(|shell| shell.save_document(&document, &path)) {
        Ok(()) => CommandResult::ok(path.display().to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn recent_documents(state: &AppState) -> CommandResult<Vec<RecentDocument>> {
    match state.with_shell(|shell| shell.recent_documents().list()) {
        Ok(documents) => CommandResult::ok(documents),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use vellum_core::{Config, DocumentType};

    fn test_state(dir: &Path) -> AppState {
        let mut config = Config::new(dir.to_path_buf());
        config.documents_dir = dir.join("Documents");
        let state = AppState::with_config(config).unwrap();
        state.initialize().unwrap();
        state
    }

    #[test]
    fn test_save_then_open_document() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let mut document = Document::new("Q1 Scope", DocumentType::ScopeFramework);
        document.state = serde_json::json!({"elements": [{"name": "Support"}]});

        let path = dir.path().join("q1.phd").display().to_string();
        assert!(save_document(&state, document, path.clone()).success);

        let opened = open_document(&state, "main", path);
        assert!(opened.success);
        let tab = opened.data.unwrap();
        assert_eq!(tab.name, "Q1 Scope");
        assert_eq!(
            tab.document_type.as_deref(),
            Some("makerdao/scope-framework")
        );

        let recent = recent_documents(&state);
        assert_eq!(recent.data.unwrap().len(), 1);
    }

    #[test]
    fn test_open_missing_document_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let result = open_document(&state, "main", "/nonexistent/file.phd".to_string());
        assert!(!result.success);
        assert!(result.error.is_some());
    }
}
