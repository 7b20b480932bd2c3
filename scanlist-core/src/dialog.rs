//! Model behind the column configuration dialog.
//!
//! The dialog lists every discoverable column with a checkbox, pre-checked
//! for the currently visible ones. Applying yields the checked keys in
//! discovery order; the host hands that list to
//! [`ScanTable::set_visible_columns`](crate::panel::ScanTable::set_visible_columns).

use crate::config::{title_case, DEFAULT_VISIBLE_COLUMNS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogEntry {
    pub key: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDialog {
    entries: Vec<DialogEntry>,
}

impl ColumnDialog {
    pub fn new(available: &[String], visible: &[String]) -> Self {
        let entries = available
            .iter()
            .map(|key| DialogEntry {
                key: key.clone(),
                label: title_case(key),
                checked: visible.contains(key),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[DialogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip one entry by index. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.checked = !entry.checked;
        }
    }

    pub fn select_all(&mut self) {
        self.entries.iter_mut().for_each(|e| e.checked = true);
    }

    pub fn clear_all(&mut self) {
        self.entries.iter_mut().for_each(|e| e.checked = false);
    }

    /// Check exactly the default core columns that are available.
    pub fn reset_default(&mut self) {
        for entry in &mut self.entries {
            entry.checked = DEFAULT_VISIBLE_COLUMNS.contains(&entry.key.as_str());
        }
    }

    /// Checked keys in discovery order.
    pub fn apply(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.checked)
            .map(|e| e.key.clone())
            .collect()
    }
}
