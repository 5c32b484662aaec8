//! The ordered tab collection
//!
//! Single authoritative owner of a window's open tabs and the selection
//! pointer. Every mutation entry point lives here; UI events and host
//! messages both funnel through these operations.
//!
//! Invariants held after every operation:
//! - tab ids are unique across the collection
//! - the selection is unset or names a present tab
//! - order changes only through explicit insert/move operations
//!
//! Unknown ids are benign no-ops throughout: fast successive drag and
//! selection events routinely race tab removal.

use std::collections::HashSet;

use crate::tab::Tab;

#[derive(Debug, Clone, Default)]
pub struct TabCollection {
    tabs: Vec<Tab>,
    selected: Option<String>,
}

impl TabCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a collection from restored parts. Tabs keep their given
    /// order; the first tab becomes selected, then `selected` is applied
    /// if it names a present tab.
    pub fn from_parts(tabs: Vec<Tab>, selected: Option<String>) -> Self {
        let mut collection = Self::new();
        for tab in tabs {
            collection.add_tab(tab);
        }
        if let Some(id) = selected {
            collection.set_selected_tab(&id);
        }
        collection
    }

    /// The current ordered sequence, for rendering.
    pub fn items(&self) -> &[Tab] {
        &self.tabs
    }

    /// Current selection, or unset.
    pub fn selected_tab(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tabs.iter().any(|tab| tab.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Append a tab.
    ///
    /// Duplicate-id policy: replace in place. The existing tab keeps its
    /// position, the incoming fields overwrite it, and the selection is
    /// untouched. Adding to an empty collection selects the new tab.
    pub fn add_tab(&mut self, tab: Tab) {
        let end = self.tabs.len();
        self.insert_tab(tab, end);
    }

    /// Insert a tab at `index` (clamped). Same duplicate policy as
    /// [`add_tab`](Self::add_tab).
    pub fn insert_tab(&mut self, tab: Tab, index: usize) {
        if let Some(existing) = self.tabs.iter_mut().find(|t| t.id == tab.id) {
            tracing::debug!(tab_id = %tab.id, "Tab already open, replacing in place");
            *existing = tab;
            return;
        }

        let was_empty = self.tabs.is_empty();
        let index = index.min(self.tabs.len());
        let id = tab.id.clone();

        tracing::debug!(tab_id = %id, index, "Opened tab");
        self.tabs.insert(index, tab);

        if was_empty {
            self.selected = Some(id);
        }
    }

    /// Remove zero or more tabs by id; absent ids are ignored.
    ///
    /// If the removed set includes the selection, the new selection is
    /// the nearest following survivor, else the nearest preceding one,
    /// else unset. Returns the removed tabs in their former order.
    pub fn remove<I, S>(&mut self, ids: I) -> Vec<Tab>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removing: HashSet<String> = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        if removing.is_empty() {
            return Vec::new();
        }

        let next_selected = self.selection_after_remove(&removing);

        let mut removed = Vec::new();
        self.tabs.retain(|tab| {
            if removing.contains(&tab.id) {
                removed.push(tab.clone());
                false
            } else {
                true
            }
        });

        for tab in &removed {
            tracing::debug!(tab_id = %tab.id, "Closed tab");
        }
        self.selected = next_selected;

        removed
    }

    /// Relocate `moving` (relative order preserved) to sit immediately
    /// before `target`. No-op when `target` is absent or in `moving`.
    pub fn move_before(&mut self, target: &str, moving: &[String]) {
        self.relocate(target, moving, false);
    }

    /// Relocate `moving` (relative order preserved) to sit immediately
    /// after `target`. No-op when `target` is absent or in `moving`.
    pub fn move_after(&mut self, target: &str, moving: &[String]) {
        self.relocate(target, moving, true);
    }

    /// Set the selection if `id` is present; otherwise leave it alone.
    pub fn set_selected_tab(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.selected = Some(id.to_string());
            true
        } else {
            tracing::debug!(tab_id = %id, "Selection target not present, ignoring");
            false
        }
    }

    /// New selection given the about-to-be-removed id set, computed
    /// against the pre-removal order.
    fn selection_after_remove(&self, removing: &HashSet<String>) -> Option<String> {
        let selected = self.selected.clone()?;
        if !removing.contains(&selected) {
            return Some(selected);
        }

        let index = self.tabs.iter().position(|tab| tab.id == selected)?;
        self.tabs[index + 1..]
            .iter()
            .find(|tab| !removing.contains(&tab.id))
            .or_else(|| {
                self.tabs[..index]
                    .iter()
                    .rev()
                    .find(|tab| !removing.contains(&tab.id))
            })
            .map(|tab| tab.id.clone())
    }

    fn relocate(&mut self, target: &str, moving: &[String], after: bool) {
        if moving.iter().any(|id| id == target) {
            return;
        }
        if !self.contains(target) {
            tracing::debug!(target, "Move target not present, ignoring");
            return;
        }

        let moving_set: HashSet<&str> = moving.iter().map(String::as_str).collect();
        let mut moved = Vec::new();
        let mut rest = Vec::new();
        for tab in self.tabs.drain(..) {
            if moving_set.contains(tab.id.as_str()) {
                moved.push(tab);
            } else {
                rest.push(tab);
            }
        }

        // target is in rest: it exists and is not in the moving set
        let target_index = rest
            .iter()
            .position(|tab| tab.id == target)
            .unwrap_or(rest.len());
        let insert_at = if after { target_index + 1 } else { target_index };

        self.tabs = rest;
        for (offset, tab) in moved.into_iter().enumerate() {
            self.tabs.insert(insert_at + offset, tab);
        }
    }
}
