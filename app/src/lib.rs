//! Vellum - Host Application
//!
//! The host process: owns the shell, one event channel pair per window,
//! and the command surface the window views call. Views are renderers;
//! every mutation funnels through here.

pub mod commands;
mod events;
mod state;

pub use events::{land_text_drop, Subscription, TabEventBinding, TabEvents};
pub use state::AppState;

/// Bootstrap the shell: logging, state, session restore, main window.
pub fn run() -> vellum_core::Result<AppState> {
    vellum_core::init_logging();

    let state = AppState::new()?;
    state.initialize()?;

    // Size the window like last time, when we know it
    if let Some(viewport) = state.with_shell(|shell| shell.last_viewport())? {
        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            "Restoring window size"
        );
    }

    tracing::info!("Vellum shell started");

    Ok(state)
}
