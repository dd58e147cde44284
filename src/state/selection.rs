use std::collections::HashSet;

/// Row selection keyed by stable row id, with anchor-based range extension
///
/// The anchor is the most recent single selection; when none exists the
/// last-selected row stands in. Extending replaces the whole selection with
/// the contiguous range between anchor and target, so re-extending never
/// leaves stale rows outside the new range.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<String>,
    anchor: Option<String>,
    last_selected: Option<String>,
}

impl SelectionState {
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Ids currently selected, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Collapse to a single row; this row becomes the range anchor
    pub fn select_single(&mut self, id: &str) {
        self.selected.clear();
        self.selected.insert(id.to_string());
        self.anchor = Some(id.to_string());
        self.last_selected = Some(id.to_string());
    }

    /// Add or remove one row without touching the rest
    pub fn toggle(&mut self, id: &str) {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        self.last_selected = Some(id.to_string());
    }

    /// Select every visible row
    pub fn select_all(&mut self, rows: &[String]) {
        self.selected = rows.iter().cloned().collect();
        self.last_selected = rows.last().cloned();
    }

    /// Replace the selection with the contiguous range anchor..=target
    ///
    /// `rows` is the visible display order. A missing anchor (or one
    /// filtered out of view) degrades to a single selection of the target.
    pub fn extend_to(&mut self, rows: &[String], target: &str) {
        let anchor_id = self
            .anchor
            .clone()
            .or_else(|| self.last_selected.clone());

        let anchor_pos = anchor_id
            .as_deref()
            .and_then(|id| rows.iter().position(|r| r == id));
        let target_pos = rows.iter().position(|r| r == target);

        match (anchor_pos, target_pos) {
            (Some(a), Some(t)) => {
                let (lo, hi) = if a <= t { (a, t) } else { (t, a) };
                self.selected = rows[lo..=hi].iter().cloned().collect();
                self.last_selected = Some(target.to_string());
            }
            _ => self.select_single(target),
        }
    }

    /// Drop the selection; the anchor survives for a later extension
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Full reset, used when a panel's data is replaced
    pub fn reset(&mut self) {
        self.selected.clear();
        self.anchor = None;
        self.last_selected = None;
    }
}
