//! Suggestion list state: rendered items, selection cursor and visibility.

use crate::{
    SuggestionItem,
    request::{RequestId, RequestRegion},
};

#[derive(Debug, Default)]
pub struct SuggestionPanel {
    items: Vec<SuggestionItem>,
    /// Index into `items`; always points at a selectable item.
    cursor: Option<usize>,
    visible: bool,
    region: RequestRegion,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a suggestion lookup that will later be passed to [`Self::render`].
    pub fn begin_request(&mut self) -> RequestId {
        self.region.issue()
    }

    /// Show `items` if `id` is still the latest lookup. Returns whether they were applied.
    pub fn render(&mut self, id: RequestId, items: Vec<SuggestionItem>) -> bool {
        if !self.region.is_latest(id) {
            return false;
        }
        self.visible = !items.is_empty();
        self.items = items;
        self.cursor = None;
        true
    }

    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&SuggestionItem> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    /// Hide the list. Lookups issued before this no longer render.
    pub fn hide(&mut self) {
        self.visible = false;
        self.cursor = None;
        self.region.issue();
    }

    pub fn move_down(&mut self) {
        let selectable = self.selectable();
        if selectable.is_empty() {
            return;
        }
        let next = match self.position_in(&selectable) {
            Some(pos) => (pos + 1) % selectable.len(),
            None => 0,
        };
        self.cursor = Some(selectable[next]);
    }

    pub fn move_up(&mut self) {
        let selectable = self.selectable();
        if selectable.is_empty() {
            return;
        }
        let prev = match self.position_in(&selectable) {
            Some(0) | None => selectable.len() - 1,
            Some(pos) => pos - 1,
        };
        self.cursor = Some(selectable[prev]);
    }

    /// Activate the item at `index`, returning the place to look up.
    pub fn activate(&mut self, index: usize) -> Option<String> {
        if !self.visible {
            return None;
        }
        let place = self.items.get(index)?.place()?.to_string();
        self.hide();
        Some(place)
    }

    /// Activate the item under the cursor, if any.
    pub fn activate_selected(&mut self) -> Option<String> {
        let index = self.cursor?;
        self.activate(index)
    }

    /// History entry to delete for the item at `index`. Never activates the item.
    pub fn delete(&mut self, index: usize) -> Option<String> {
        if !self.visible {
            return None;
        }
        match self.items.get(index)? {
            SuggestionItem::History(place) => Some(place.clone()),
            _ => None,
        }
    }

    fn selectable(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_selectable())
            .map(|(i, _)| i)
            .collect()
    }

    fn position_in(&self, selectable: &[usize]) -> Option<usize> {
        let cursor = self.cursor?;
        selectable.iter().position(|&i| i == cursor)
    }
}
