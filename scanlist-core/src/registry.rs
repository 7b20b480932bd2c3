//! ColumnRegistry: turns the loaded rows plus configuration into the
//! ordered list of visible columns.
//!
//! Columns are never stored independently of the data: the candidate set is
//! recomputed from the rows on every load, and the visible set is always a
//! filter of that candidate set.

use std::collections::HashSet;

use crate::config::ColumnConfig;
use crate::row::{Row, IDENTITY_KEY, INTERNAL_PREFIX, RAW_KEY};

/// Fixed width of the frozen identity column.
pub const IDENTITY_COLUMN_WIDTH: u32 = 160;
/// Vertical scrollbar allowance.
pub const SCROLLBAR_WIDTH: u32 = 20;
/// Outer padding around the two panes.
pub const PANEL_PADDING: u32 = 10;

/// One visible data column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub tooltip: Option<String>,
    /// Rendered width in pixels.
    pub width: u32,
}

impl Column {
    pub fn new(key: &str, config: &ColumnConfig) -> Self {
        let label = config.display_label(key);
        Self {
            key: key.to_string(),
            width: column_width(&label),
            tooltip: config.tooltip(key).map(str::to_string),
            label,
        }
    }
}

/// `max(len(label) * 20 + 30, 70)`, length in characters.
pub fn column_width(label: &str) -> u32 {
    (label.chars().count() as u32 * 20 + 30).max(70)
}

/// Keys that can never be data columns.
pub fn is_reserved(key: &str) -> bool {
    key == IDENTITY_KEY || key == RAW_KEY || key.starts_with(INTERNAL_PREFIX)
}

/// Union of row keys in first-seen order, minus reserved keys.
pub fn candidate_keys(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !is_reserved(key) && seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

/// Candidates ∩ visible, ordered by priority index.
///
/// Keys absent from `priority` go after all listed ones; ties keep
/// candidate (discovery) order. Unknown visible keys are dropped.
pub fn resolve_keys(candidates: &[String], visible: &[String], priority: &[String]) -> Vec<String> {
    let visible: HashSet<&str> = visible.iter().map(String::as_str).collect();
    let mut keys: Vec<&String> = candidates
        .iter()
        .filter(|k| visible.contains(k.as_str()))
        .collect();
    keys.sort_by_key(|k| priority.iter().position(|p| p == *k).unwrap_or(usize::MAX));
    keys.into_iter().cloned().collect()
}

/// Total width a host needs to show both panes without clipping.
pub fn required_width(columns: &[Column]) -> u32 {
    IDENTITY_COLUMN_WIDTH
        + columns.iter().map(|c| c.width).sum::<u32>()
        + SCROLLBAR_WIDTH
        + PANEL_PADDING
}

/// Owns the current candidate set and visible column order.
#[derive(Default)]
pub struct ColumnRegistry {
    available: Vec<String>,
    columns: Vec<Column>,
    on_width_changed: Option<Box<dyn FnMut(u32)>>,
}

impl std::fmt::Debug for ColumnRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnRegistry")
            .field("available", &self.available)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl ColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer called with [`required_width`] after every column change.
    pub fn on_width_changed(&mut self, observer: impl FnMut(u32) + 'static) {
        self.on_width_changed = Some(Box::new(observer));
    }

    /// Recompute candidates from `rows` and resolve the visible columns
    /// from `config` (priority-ordered). Disabled columns resolve to none.
    pub fn resolve(&mut self, rows: &[Row], config: &ColumnConfig) -> &[Column] {
        self.available = candidate_keys(rows);
        let keys = if config.columns_enabled {
            resolve_keys(&self.available, &config.visible_columns, &config.column_priority)
        } else {
            Vec::new()
        };
        self.install(&keys, config);
        &self.columns
    }

    /// Show exactly `keys`, in the given order, minus keys that are not
    /// candidates. Used for drag commits and explicit visibility changes.
    pub fn apply_order(&mut self, keys: &[String], config: &ColumnConfig) -> &[Column] {
        let candidates: HashSet<&str> = self.available.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let keys: Vec<String> = keys
            .iter()
            .filter(|k| candidates.contains(k.as_str()) && seen.insert(k.as_str()))
            .cloned()
            .collect();
        self.install(&keys, config);
        &self.columns
    }

    fn install(&mut self, keys: &[String], config: &ColumnConfig) {
        self.columns = keys.iter().map(|k| Column::new(k, config)).collect();
        let width = self.required_width();
        tracing::debug!(columns = self.columns.len(), width, "columns resolved");
        if let Some(observer) = self.on_width_changed.as_mut() {
            observer(width);
        }
    }

    /// Every discoverable column key, in discovery order.
    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn widths(&self) -> Vec<u32> {
        self.columns.iter().map(|c| c.width).collect()
    }

    pub fn required_width(&self) -> u32 {
        required_width(&self.columns)
    }
}
