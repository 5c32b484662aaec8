//! Tab management commands
use serde::{Deserialize, Serialize};

use vellum_core::{DragEndEvent, DropPayload, DropPosition, Tab, ViewportBounds};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: String,
    pub name: String,
    pub document_type: Option<String>,
    pub document_path: Option<String>,
}

impl From<Tab> for TabInfo {
    fn from(tab: Tab) -> Self {
        Self {
            id: tab.id,
            name: tab.name,
            document_type: tab.document_type,
            document_path: tab
                .document_path
                .map(|path| path.display().to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

pub fn get_tabs(state: &AppState, window_label: &str) -> CommandResult<Vec<TabInfo>> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.tabs(&session_id)) {
        Ok(tabs) => CommandResult::ok(tabs.into_iter().map(TabInfo::from).collect()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn get_selected_tab(state: &AppState, window_label: &str) -> CommandResult<Option<String>> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.selected_tab(&session_id)) {
        Ok(selected) => CommandResult::ok(selected),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn new_tab(
    state: &AppState,
    window_label: &str,
    name: Option<String>,
) -> CommandResult<TabInfo> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let name = name.unwrap_or_default();
    match state.with_shell(|shell| shell.create_tab(&session_id, &name)) {
        Ok(tab) => CommandResult::ok(tab.into()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn close_tab(state: &AppState, window_label: &str, tab_id: String) -> CommandResult<()> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.close_tab(&session_id, &tab_id)) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn restore_last_closed_tab(
    state: &AppState,
    window_label: &str,
) -> CommandResult<Option<TabInfo>> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.restore_last_closed_tab(&session_id)) {
        Ok(tab) => CommandResult::ok(tab.map(TabInfo::from)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn select_tab(state: &AppState, window_label: &str, tab_id: String) -> CommandResult<bool> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.select_tab(&session_id, &tab_id)) {
        Ok(selected) => CommandResult::ok(selected),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn reorder_tabs(
    state: &AppState,
    window_label: &str,
    target: String,
    position: DropPosition,
    keys: Vec<String>,
) -> CommandResult<()> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.reorder_tabs(&session_id, &target, position, &keys)) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Drop onto the tab strip. Returns the paths of file and directory
/// payloads the core left for the file-opening layer.
pub fn root_drop(
    state: &AppState,
    window_label: &str,
    payloads: Vec<DropPayload>,
) -> CommandResult<Vec<String>> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| shell.root_drop(&session_id, payloads)) {
        Ok(unhandled) => CommandResult::ok(
            unhandled
                .into_iter()
                .map(|payload| match payload {
                    DropPayload::File(path) | DropPayload::Directory(path) => {
                        path.display().to_string()
                    }
                    DropPayload::Text(text) => text,
                })
                .collect(),
        ),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Drag end with the window extent; out-of-viewport drags detach.
pub fn drag_end(
    state: &AppState,
    window_label: &str,
    keys: Vec<String>,
    x: f64,
    y: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> CommandResult<Vec<TabInfo>> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let event = DragEndEvent { keys, x, y };
    let viewport = ViewportBounds::new(viewport_width, viewport_height);

    match state.with_shell(|shell| shell.drag_end(&session_id, &event, viewport)) {
        Ok(removed) => CommandResult::ok(removed.into_iter().map(TabInfo::from).collect()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
