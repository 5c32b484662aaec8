//! Drag and drop dispatch for the tab strip
//!
//! Maps presentation-layer drop events onto collection operations:
//! reorder drops onto move-before/after, foreign text drops onto token
//! parse + add, and out-of-viewport drag ends onto removal. Payload kinds
//! are a tagged variant; only text is interpreted here, file and
//! directory drops belong to the file-opening layer.

use std::path::PathBuf;

use crate::collection::TabCollection;
use crate::tab::Tab;

/// Where a reorder drop landed relative to its target tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

/// One item carried by a drop.
#[derive(Debug, Clone, PartialEq)]
pub enum DropPayload {
    Text(String),
    File(PathBuf),
    Directory(PathBuf),
}

/// A drag gesture ending, with the final pointer position in window
/// coordinates.
#[derive(Debug, Clone)]
pub struct DragEndEvent {
    pub keys: Vec<String>,
    pub x: f64,
    pub y: f64,
}

/// Current window extent, supplied explicitly by the presentation layer.
#[derive(Debug, Clone, Copy)]
pub struct ViewportBounds {
    pub width: f64,
    pub height: f64,
}

impl ViewportBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height
    }
}

/// Apply a reorder drop.
pub fn reorder(
    collection: &mut TabCollection,
    target: &str,
    position: DropPosition,
    keys: &[String],
) {
    match position {
        DropPosition::Before => collection.move_before(target, keys),
        DropPosition::After => collection.move_after(target, keys),
    }
}

/// Apply a drop onto the tab strip itself.
///
/// Each text payload is parsed as a tab token and opened; a payload that
/// fails to parse is logged and skipped without touching the collection.
/// File and directory payloads are returned unhandled for the caller to
/// forward.
pub fn handle_root_drop(
    collection: &mut TabCollection,
    payloads: Vec<DropPayload>,
) -> Vec<DropPayload> {
    let mut unhandled = Vec::new();

    for payload in payloads {
        match payload {
            DropPayload::Text(text) => match Tab::from_token(&text) {
                Ok(tab) => collection.add_tab(tab),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropped text is not a tab token, ignoring");
                }
            },
            DropPayload::File(path) => {
                tracing::debug!(path = %path.display(), "File dropped");
                unhandled.push(DropPayload::File(path));
            }
            DropPayload::Directory(path) => {
                tracing::debug!(path = %path.display(), "Directory dropped");
                unhandled.push(DropPayload::Directory(path));
            }
        }
    }

    unhandled
}

/// Interpret a drag that ended outside the viewport as a detach: every
/// dragged key is removed. Returns the removed tabs so the host can
/// re-open them elsewhere.
pub fn handle_drag_end(
    collection: &mut TabCollection,
    event: &DragEndEvent,
    viewport: ViewportBounds,
) -> Vec<Tab> {
    if viewport.contains(event.x, event.y) {
        return Vec::new();
    }

    tracing::debug!(
        x = event.x,
        y = event.y,
        keys = ?event.keys,
        "Drag ended outside viewport, detaching"
    );
    collection.remove(&event.keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection_of(names: &[&str]) -> (TabCollection, Vec<String>) {
        let mut collection = TabCollection::new();
        let mut ids = Vec::new();
        for name in names {
            let tab = Tab::new(*name);
            ids.push(tab.id.clone());
            collection.add_tab(tab);
        }
        (collection, ids)
    }

    #[test]
    fn test_reorder_before_and_after() {
        let (mut collection, ids) = collection_of(&["A", "B", "C"]);

        reorder(
            &mut collection,
            &ids[0],
            DropPosition::Before,
            &[ids[2].clone()],
        );
        let order: Vec<&str> = collection.items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            order,
            vec![ids[2].as_str(), ids[0].as_str(), ids[1].as_str()]
        );

        reorder(
            &mut collection,
            &ids[1],
            DropPosition::After,
            &[ids[2].clone()],
        );
        let order: Vec<&str> = collection.items().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            order,
            vec![ids[0].as_str(), ids[1].as_str(), ids[2].as_str()]
        );
    }

    #[test]
    fn test_text_drop_opens_tab() {
        let (mut collection, _) = collection_of(&["A"]);
        let dropped = Tab::new("Dragged in");
        let token = dropped.to_token().unwrap();

        let unhandled = handle_root_drop(&mut collection, vec![DropPayload::Text(token)]);

        assert!(unhandled.is_empty());
        assert_eq!(collection.len(), 2);
        assert!(collection.contains(&dropped.id));
    }

    #[test]
    fn test_malformed_text_drop_is_swallowed() {
        let (mut collection, ids) = collection_of(&["A", "B"]);
        let before: Vec<String> = collection.items().iter().map(|t| t.id.clone()).collect();

        let unhandled = handle_root_drop(
            &mut collection,
            vec![DropPayload::Text("garbage".to_string())],
        );

        assert!(unhandled.is_empty());
        let after: Vec<String> = collection.items().iter().map(|t| t.id.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(collection.selected_tab(), Some(ids[0].as_str()));
    }

    #[test]
    fn test_file_and_directory_drops_returned_unhandled() {
        let (mut collection, _) = collection_of(&["A"]);

        let unhandled = handle_root_drop(
            &mut collection,
            vec![
                DropPayload::File(PathBuf::from("/tmp/budget.phd")),
                DropPayload::Directory(PathBuf::from("/tmp/docs")),
            ],
        );

        assert_eq!(unhandled.len(), 2);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_mixed_drop_handles_text_only() {
        let (mut collection, _) = collection_of(&[]);
        let dropped = Tab::new("Dragged in");

        let unhandled = handle_root_drop(
            &mut collection,
            vec![
                DropPayload::File(PathBuf::from("/tmp/a")),
                DropPayload::Text(dropped.to_token().unwrap()),
            ],
        );

        assert_eq!(unhandled, vec![DropPayload::File(PathBuf::from("/tmp/a"))]);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_drag_out_of_bounds_removes() {
        let (mut collection, ids) = collection_of(&["A", "B"]);
        let viewport = ViewportBounds::new(1280.0, 800.0);

        let removed = handle_drag_end(
            &mut collection,
            &DragEndEvent {
                keys: vec![ids[1].clone()],
                x: 1400.0,
                y: 300.0,
            },
            viewport,
        );

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, ids[1]);
        assert!(!collection.contains(&ids[1]));
    }

    #[test]
    fn test_drag_negative_coordinates_removes() {
        let (mut collection, ids) = collection_of(&["A", "B"]);
        let viewport = ViewportBounds::new(1280.0, 800.0);

        handle_drag_end(
            &mut collection,
            &DragEndEvent {
                keys: vec![ids[0].clone()],
                x: -10.0,
                y: 300.0,
            },
            viewport,
        );

        assert!(!collection.contains(&ids[0]));
    }

    #[test]
    fn test_drag_inside_bounds_keeps_tabs() {
        let (mut collection, ids) = collection_of(&["A", "B"]);
        let viewport = ViewportBounds::new(1280.0, 800.0);

        let removed = handle_drag_end(
            &mut collection,
            &DragEndEvent {
                keys: vec![ids[0].clone()],
                x: 200.0,
                y: 40.0,
            },
            viewport,
        );

        assert!(removed.is_empty());
        assert_eq!(collection.len(), 2);
    }
}
