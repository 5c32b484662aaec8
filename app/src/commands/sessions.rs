//! Session management commands
use serde::{Deserialize, Serialize};

use vellum_core::Session;

use super::tabs::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub tab_count: usize,
    pub selected_tab: Option<String>,
}

impl SessionInfo {
    fn from_session(session: Session, is_active: bool, tab_count: usize) -> Self {
        Self {
            id: session.id,
            name: session.name,
            is_active,
            tab_count,
            selected_tab: session.selected_tab,
        }
    }
}

pub fn get_sessions(state: &AppState, window_label: &str) -> CommandResult<Vec<SessionInfo>> {
    let active_id = state.session_id_for_window(window_label).ok();

    match state.with_shell(|shell| {
        let manager = shell.session_manager();
        let infos = manager
            .list_sessions()
            .into_iter()
            .map(|s| {
                let is_active = active_id.as_deref() == Some(s.id.as_str());
                let tab_count = manager.tab_count(&s.id).unwrap_or(0);
                SessionInfo::from_session(s, is_active, tab_count)
            })
            .collect();
        Ok(infos)
    }) {
        Ok(sessions) => CommandResult::ok(sessions),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn get_active_session(state: &AppState, window_label: &str) -> CommandResult<SessionInfo> {
    let session_id = match state.session_id_for_window(window_label) {
        Ok(id) => id,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    match state.with_shell(|shell| {
        let manager = shell.session_manager();
        let session = manager.get_session(&session_id)?;
        let tab_count = manager.tab_count(&session.id).unwrap_or(0);
        Ok(SessionInfo::from_session(session, true, tab_count))
    }) {
        Ok(info) => CommandResult::ok(info),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn create_session(state: &AppState, name: String) -> CommandResult<SessionInfo> {
    match state.with_shell(|shell| shell.session_manager().create_session(name).map_err(Into::into))
    {
        Ok(session) => CommandResult::ok(SessionInfo::from_session(session, false, 0)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn switch_session(
    state: &AppState,
    window_label: &str,
    session_id: String,
) -> CommandResult<SessionInfo> {
    match state.with_shell(|shell| {
        let manager = shell.session_manager();
        let session = manager.switch_session(&session_id)?;
        let tab_count = manager.tab_count(&session.id).unwrap_or(0);
        Ok((session, tab_count))
    }) {
        Ok((session, tab_count)) => {
            if let Err(e) = state.open_window(window_label, session.id.clone()) {
                return CommandResult::err(e.to_string());
            }
            CommandResult::ok(SessionInfo::from_session(session, true, tab_count))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn rename_session(
    state: &AppState,
    session_id: String,
    name: String,
) -> CommandResult<SessionInfo> {
    match state.with_shell(|shell| {
        let manager = shell.session_manager();
        let session = manager.rename_session(&session_id, name)?;
        let tab_count = manager.tab_count(&session.id).unwrap_or(0);
        Ok(SessionInfo::from_session(session, false, tab_count))
    }) {
        Ok(info) => CommandResult::ok(info),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn delete_session(state: &AppState, session_id: String) -> CommandResult<()> {
    match state.with_shell(|shell| {
        shell
            .session_manager()
            .delete_session(&session_id)
            .map_err(Into::into)
    }) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}
