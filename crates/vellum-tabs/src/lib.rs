//! Vellum Tab Management
//!
//! Owns the ordered set of open editor tabs per window: insertion,
//! removal, reorder-by-drag, selection, and the string-token codec used
//! when a tab crosses a process boundary (drag payloads, host messages).

mod collection;
mod dnd;
mod error;
mod handle;
mod tab;
mod token;

pub use collection::TabCollection;
pub use dnd::{
    handle_drag_end, handle_root_drop, reorder, DragEndEvent, DropPayload, DropPosition,
    ViewportBounds,
};
pub use error::TabError;
pub use handle::CollectionHandle;
pub use tab::Tab;
pub use token::TOKEN_VERSION;

pub type Result<T> = std::result::Result<T, TabError>;
