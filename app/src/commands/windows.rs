//! Window commands
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use super::tabs::{CommandResult, TabInfo};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct NewWindowInfo {
    pub window_label: String,
    pub session_id: String,
    pub tab: Option<TabInfo>,
}

fn next_window_label() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("window-{millis}")
}

/// Open a fresh window: its own session with one empty tab.
pub fn create_window(state: &AppState) -> CommandResult<NewWindowInfo> {
    let window_label = next_window_label();

    let session = match state.with_shell(|shell| {
        shell
            .session_manager()
            .create_session("Window".to_string())
            .map_err(Into::into)
    }) {
        Ok(s) => s,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let tab = match state.with_shell(|shell| shell.create_tab(&session.id, "")) {
        Ok(t) => t,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    if let Err(e) = state.open_window(&window_label, session.id.clone()) {
        return CommandResult::err(format!("Failed to create window: {e}"));
    }

    CommandResult::ok(NewWindowInfo {
        window_label,
        session_id: session.id,
        tab: Some(tab.into()),
    })
}

/// Move a tab into a window of its own: a host "remove" lands on the
/// source window's channel and a host "add" on the new window's, each
/// carrying the same serialized tab.
pub fn detach_tab_to_new_window(
    state: &AppState,
    window_label: &str,
    tab_id: String,
) -> CommandResult<NewWindowInfo> {
    let source_session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let tab = match state.with_shell(|shell| Ok(shell.tabs(&source_session_id)?)) {
        Ok(tabs) => match tabs.into_iter().find(|tab| tab.id == tab_id) {
            Some(tab) => tab,
            None => return CommandResult::err(format!("Tab not found: {tab_id}")),
        },
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let token = match tab.to_token() {
        Ok(token) => token,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    // Pull the tab out of the source window through its host channel
    if let Some(events) = state.window_events(window_label) {
        events.publish_remove(&token);
    }
    if let Some(handle) = state.window_handle(window_label) {
        if let Err(e) = state.with_shell(|shell| {
            Ok(shell
                .session_manager()
                .save_collection(&source_session_id, &handle.snapshot())?)
        }) {
            return CommandResult::err(e.to_string());
        }
    }

    let new_window_label = next_window_label();

    let session = match state.with_shell(|shell| {
        shell
            .session_manager()
            .create_session("Window".to_string())
            .map_err(Into::into)
    }) {
        Ok(s) => s,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    if let Err(e) = state.open_window(&new_window_label, session.id.clone()) {
        return CommandResult::err(format!("Failed to create window: {e}"));
    }

    // Land it in the new window through that window's host channel
    if let Some(events) = state.window_events(&new_window_label) {
        events.publish_add(&token);
    }
    if let Some(handle) = state.window_handle(&new_window_label) {
        if let Err(e) = state.with_shell(|shell| {
            Ok(shell
                .session_manager()
                .save_collection(&session.id, &handle.snapshot())?)
        }) {
            return CommandResult::err(e.to_string());
        }
    }

    CommandResult::ok(NewWindowInfo {
        window_label: new_window_label,
        session_id: session.id,
        tab: Some(tab.into()),
    })
}
