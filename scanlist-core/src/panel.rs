//! ScanTable: the dual-pane scan result table.
//!
//! One [`ScanTable`] owns every piece of view state: rows and their sorted
//! projection, the visible columns, the sort, the selection, the aggregate
//! row and the transient drag/tooltip gestures. The frozen identity pane and
//! the scrollable attribute pane are both rendered from [`ScanTable::display_rows`],
//! so they cannot disagree on which rows are shown or in which order.
//!
//! Pointer coordinates are pane-relative pixels. Terminal hosts convert
//! character cells before calling in.

use std::time::Instant;

use serde_json::Value;

use crate::aggregate::{
    owner_of, AggregateRow, AggregateRowManager, AggregateStats,
    AGGREGATE_SYMBOL_CELL,
};
use crate::config::{ColumnConfig, ColumnConfigSource};
use crate::dialog::ColumnDialog;
use crate::drag::{ColumnDragController, DragOutcome};
use crate::geometry::{HeaderGeometry, Point};
use crate::label::LabelMode;
use crate::registry::{Column, ColumnRegistry, IDENTITY_COLUMN_WIDTH};
use crate::row::{RawRecord, Row, IDENTITY_KEY};
use crate::selection::{Pane, PaneState, SelectionCoordinator, SelectionOutcome};
use crate::sort::{SortDirection, SortEngine, SortState};
use crate::store::{LoadSummary, RowStatsUpdate, RowStore};
use crate::tooltip::{Tooltip, TooltipController};
use crate::value::render_cell;

/// Receives `(identity, raw record)` for every new user selection.
pub type SelectionCallback = Box<dyn FnMut(&str, &RawRecord)>;

/// Pixel geometry the host reports for both panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub header_height: i32,
    pub row_height: i32,
    /// Number of body rows that fit in the viewport.
    pub viewport_rows: usize,
    /// Horizontal scroll of the scrollable pane.
    pub h_scroll: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            header_height: 30,
            row_height: 30,
            viewport_rows: 20,
            h_scroll: 0,
        }
    }
}

/// One entry of the shared display list.
#[derive(Debug, Clone, Copy)]
pub enum DisplayRow<'a> {
    Data(&'a Row),
    Aggregate(&'a AggregateRow),
}

impl DisplayRow<'_> {
    pub fn identity(&self) -> String {
        match self {
            DisplayRow::Data(row) => row.identity().to_string(),
            DisplayRow::Aggregate(agg) => agg.identity(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, DisplayRow::Aggregate(_))
    }

    /// Text of the frozen identity cell.
    pub fn frozen_cell(&self) -> String {
        match self {
            DisplayRow::Data(row) => row.identity().to_string(),
            DisplayRow::Aggregate(_) => AGGREGATE_SYMBOL_CELL.to_string(),
        }
    }

    /// Rendered value for one data column; absent values render empty.
    pub fn cell(&self, key: &str) -> String {
        match self {
            DisplayRow::Data(row) => render_cell(row.value_ref(key)),
            DisplayRow::Aggregate(agg) => render_cell(agg.value(key)),
        }
    }
}

/// Header cell of a rendered pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub width: u32,
    /// Set on the column the table is sorted by.
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneRow {
    pub identity: String,
    pub cells: Vec<String>,
    pub aggregate: bool,
}

/// Everything needed to draw one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSnapshot {
    pub pane: Pane,
    pub header: Vec<HeaderCell>,
    pub rows: Vec<PaneRow>,
    pub selected: Option<String>,
    pub scroll_top: usize,
}

impl PaneSnapshot {
    pub fn identities(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.identity.as_str()).collect()
    }
}

/// Result of a pointer gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerOutcome {
    None,
    Selection(SelectionOutcome),
    Sorted { column: String, direction: SortDirection },
    Reordered { order: Vec<String> },
}

/// Display index of an identity: the projection position, shifted by one
/// for rows below a materialized aggregate row.
fn display_index(store: &RowStore, aggregate: &AggregateRowManager, identity: &str) -> Option<usize> {
    if let Some(owner) = owner_of(identity) {
        return match aggregate.owner() {
            Some(current) if current == owner => aggregate.slot(),
            _ => None,
        };
    }
    let position = store.position(identity)?;
    match aggregate.slot() {
        Some(slot) if position >= slot => Some(position + 1),
        _ => Some(position),
    }
}

pub struct ScanTable {
    config: Box<dyn ColumnConfigSource>,
    store: RowStore,
    registry: ColumnRegistry,
    sort: SortEngine,
    selection: SelectionCoordinator,
    drag: ColumnDragController,
    tooltip: TooltipController,
    aggregate: AggregateRowManager,
    layout: Layout,
    /// Visible columns remembered while columns are switched off.
    stashed_columns: Option<Vec<String>>,
    frozen_header_pressed: bool,
    on_selection: Option<SelectionCallback>,
}

impl std::fmt::Debug for ScanTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanTable")
            .field("rows", &self.store.len())
            .field("registry", &self.registry)
            .field("sort", &self.sort)
            .field("selection", &self.selection)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl ScanTable {
    pub fn new(config: impl ColumnConfigSource + 'static) -> Self {
        Self::with_label_mode(config, LabelMode::default())
    }

    pub fn with_label_mode(config: impl ColumnConfigSource + 'static, label_mode: LabelMode) -> Self {
        Self {
            config: Box::new(config),
            store: RowStore::new(label_mode),
            registry: ColumnRegistry::new(),
            sort: SortEngine::new(),
            selection: SelectionCoordinator::new(),
            drag: ColumnDragController::default(),
            tooltip: TooltipController::default(),
            aggregate: AggregateRowManager::new(),
            layout: Layout::default(),
            stashed_columns: None,
            frozen_header_pressed: false,
            on_selection: None,
        }
    }

    // ── Callbacks & collaborators ───────────────────────────────────────

    pub fn on_selection_changed(&mut self, callback: impl FnMut(&str, &RawRecord) + 'static) {
        self.on_selection = Some(Box::new(callback));
    }

    pub fn on_width_changed(&mut self, callback: impl FnMut(u32) + 'static) {
        self.registry.on_width_changed(callback);
    }

    pub fn config(&self) -> ColumnConfig {
        self.config.column_config()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    // ── Data ────────────────────────────────────────────────────────────

    /// Replace every row. Gestures in flight are dropped, the aggregate row
    /// is cleared, columns are re-resolved and a remembered sort is reapplied.
    pub fn load(&mut self, results: &[Value]) -> LoadSummary {
        self.drop_transient_state();
        let summary = self.store.load(results);
        self.settle_after_load();
        summary
    }

    /// Load a `{ "results": [...] }` document.
    pub fn load_document(&mut self, document: &Value) -> LoadSummary {
        self.drop_transient_state();
        let summary = self.store.load_document(document);
        self.settle_after_load();
        summary
    }

    fn drop_transient_state(&mut self) {
        self.drag.cancel();
        self.tooltip.leave();
        self.aggregate.hide();
    }

    fn settle_after_load(&mut self) {
        if let Some(state) = self.sort.current() {
            self.store.apply_sort(&state.column, state.direction);
        }

        let config = self.config.column_config();
        self.registry.resolve(self.store.rows(), &config);
        if config.columns_enabled {
            self.stashed_columns = None;
        }

        let viewport = self.layout.viewport_rows;
        let (store, aggregate) = (&self.store, &self.aggregate);
        self.selection
            .after_reload(|id| display_index(store, aggregate, id), viewport);
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn row_count(&self) -> usize {
        self.store.len()
    }

    pub fn update_row_stats(&mut self, identity: &str, update: RowStatsUpdate) -> bool {
        self.store.update_row_stats(identity, update)
    }

    pub fn label_mode(&self) -> LabelMode {
        self.store.label_mode()
    }

    /// Switch the label summary. Row order is kept even when sorted by `label`.
    pub fn set_label_mode(&mut self, mode: LabelMode) {
        tracing::debug!(mode = %mode, "label mode changed");
        self.store.set_label_mode(mode);
    }

    // ── Columns ─────────────────────────────────────────────────────────

    pub fn columns(&self) -> &[Column] {
        self.registry.columns()
    }

    pub fn column_keys(&self) -> Vec<String> {
        self.registry.keys()
    }

    pub fn available_columns(&self) -> &[String] {
        self.registry.available()
    }

    pub fn required_width(&self) -> u32 {
        self.registry.required_width()
    }

    pub fn columns_enabled(&self) -> bool {
        self.config.column_config().columns_enabled
    }

    /// Show exactly `columns` in the given order and persist the list.
    ///
    /// While columns are switched off the list is persisted and remembered
    /// for when they come back.
    pub fn set_visible_columns(&mut self, columns: &[String]) {
        self.drag.cancel();
        self.tooltip.leave();
        self.config.set_visible_columns(columns);
        let config = self.config.column_config();
        if config.columns_enabled {
            self.registry.apply_order(columns, &config);
        } else {
            self.stashed_columns = Some(columns.to_vec());
        }
    }

    /// Flip the master column switch. Returns the new state.
    pub fn toggle_columns_enabled(&mut self) -> bool {
        self.drag.cancel();
        self.tooltip.leave();
        let enabled = !self.config.column_config().columns_enabled;
        self.config.set_columns_enabled(enabled);
        let config = self.config.column_config();
        if enabled {
            match self.stashed_columns.take() {
                Some(keys) => {
                    self.registry.apply_order(&keys, &config);
                }
                None => {
                    self.registry.resolve(self.store.rows(), &config);
                }
            }
        } else {
            self.stashed_columns = Some(self.registry.keys());
            self.registry.apply_order(&[], &config);
        }
        tracing::info!(enabled, "columns toggled");
        enabled
    }

    /// Context-menu toggle: hide a visible column or append a hidden one.
    pub fn toggle_column(&mut self, key: &str) {
        if !self.columns_enabled() {
            return;
        }
        let mut keys = self.registry.keys();
        match keys.iter().position(|k| k == key) {
            Some(index) => {
                keys.remove(index);
            }
            None if self.registry.available().iter().any(|k| k == key) => keys.push(key.to_string()),
            None => return,
        }
        self.set_visible_columns(&keys);
    }

    /// Dialog model pre-filled with the current columns. `None` while
    /// columns are switched off.
    pub fn column_dialog(&self) -> Option<ColumnDialog> {
        if !self.columns_enabled() {
            return None;
        }
        Some(ColumnDialog::new(self.registry.available(), &self.registry.keys()))
    }

    // ── Sorting ─────────────────────────────────────────────────────────

    /// Sort by a column key (`symbol` sorts by identity). Without an
    /// explicit direction the same column flips and a new one starts
    /// descending.
    pub fn sort_by(&mut self, column: &str, direction: Option<SortDirection>) -> SortDirection {
        let direction = self.sort.resolve(column, direction);
        self.aggregate.detach();
        self.store.apply_sort(column, direction);
        let store = &self.store;
        self.aggregate.rematerialize(|owner| store.position(owner));
        tracing::debug!(column, direction = %direction, "sorted");

        let selected = self.selection.selected().map(str::to_string);
        let viewport = self.layout.viewport_rows;
        let (store, aggregate) = (&self.store, &self.aggregate);
        self.selection.restore(
            selected.as_deref(),
            |id| display_index(store, aggregate, id),
            viewport,
        );
        direction
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.current()
    }

    /// Restore a remembered sort, applying it to the current rows.
    pub fn restore_sort(&mut self, state: Option<SortState>) {
        match state {
            Some(state) => {
                self.sort_by(&state.column, Some(state.direction));
            }
            None => self.sort.restore(None),
        }
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn selected_identity(&self) -> Option<&str> {
        self.selection.selected()
    }

    /// A selection event from either pane.
    pub fn select(&mut self, pane: Pane, identity: &str) -> SelectionOutcome {
        let is_new_row = owner_of(identity).is_none()
            && self.store.contains(identity)
            && self.selection.selected() != Some(identity)
            && !self.selection.is_propagating();
        if is_new_row && self.aggregate.owner().is_some_and(|owner| owner != identity) {
            self.aggregate.hide();
        }

        let viewport = self.layout.viewport_rows;
        let store = &self.store;
        let aggregate = &self.aggregate;
        let callback = &mut self.on_selection;
        self.selection.select(
            pane,
            identity,
            |id| display_index(store, aggregate, id),
            viewport,
            |id| {
                if let (Some(cb), Some(row)) = (callback.as_mut(), store.get(id)) {
                    cb(id, row.raw());
                }
            },
        )
    }

    /// Select the next real row below the current one (first row if none).
    pub fn select_next(&mut self) -> SelectionOutcome {
        self.step_selection(true)
    }

    /// Select the previous real row above the current one (last row if none).
    pub fn select_previous(&mut self) -> SelectionOutcome {
        self.step_selection(false)
    }

    fn step_selection(&mut self, forward: bool) -> SelectionOutcome {
        let data: Vec<String> = self.store.projection().map(|r| r.identity().to_string()).collect();
        if data.is_empty() {
            return SelectionOutcome::Ignored;
        }
        let current = self.selection.selected().and_then(|id| data.iter().position(|d| d == id));
        let target = match (current, forward) {
            (None, true) => 0,
            (None, false) => data.len() - 1,
            (Some(i), true) => (i + 1).min(data.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        let identity = data[target].clone();
        self.select(Pane::Frozen, &identity)
    }

    pub fn pane_state(&self, pane: Pane) -> &PaneState {
        self.selection.pane(pane)
    }

    /// Scroll both panes by `delta` rows.
    pub fn scroll_by(&mut self, delta: i32) {
        let rows = self.display_len();
        let max_top = rows.saturating_sub(self.layout.viewport_rows.max(1));
        let top = (self.selection.scroll_top() as i64 + delta as i64).clamp(0, max_top as i64);
        self.selection.scroll_to(top as usize);
    }

    // ── Aggregate row ───────────────────────────────────────────────────

    /// Insert the aggregate row beneath `owner`, which must be the selected
    /// row. Any other owner is refused.
    pub fn show_aggregate_row(&mut self, owner: &str, stats: AggregateStats) -> bool {
        if self.selection.selected() != Some(owner) {
            tracing::debug!(owner, "aggregate row refused: owner not selected");
            return false;
        }
        let position = self.store.position(owner);
        let shown = self.aggregate.show(owner, stats, position);
        if shown {
            tracing::debug!(owner, "aggregate row shown");
        }
        shown
    }

    pub fn hide_aggregate_row(&mut self) {
        self.aggregate.hide();
    }

    pub fn aggregate_row(&self) -> Option<&AggregateRow> {
        self.aggregate.row().filter(|_| self.aggregate.is_shown())
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn display_len(&self) -> usize {
        self.store.len() + usize::from(self.aggregate.is_shown())
    }

    /// The shared row list both panes render.
    pub fn display_rows(&self) -> Vec<DisplayRow<'_>> {
        let mut rows: Vec<DisplayRow<'_>> = self.store.projection().map(DisplayRow::Data).collect();
        if let (Some(slot), Some(agg)) = (self.aggregate.slot(), self.aggregate.row()) {
            if slot <= rows.len() {
                rows.insert(slot, DisplayRow::Aggregate(agg));
            }
        }
        rows
    }

    fn sort_marker(&self, key: &str) -> Option<SortDirection> {
        self.sort
            .current()
            .filter(|s| s.column == key)
            .map(|s| s.direction)
    }

    pub fn frozen_pane(&self) -> PaneSnapshot {
        let rows = self
            .display_rows()
            .iter()
            .map(|row| PaneRow {
                identity: row.identity(),
                cells: vec![row.frozen_cell()],
                aggregate: row.is_aggregate(),
            })
            .collect();
        let state = self.selection.pane(Pane::Frozen);
        PaneSnapshot {
            pane: Pane::Frozen,
            header: vec![HeaderCell {
                key: IDENTITY_KEY.to_string(),
                label: "Symbol".to_string(),
                width: IDENTITY_COLUMN_WIDTH,
                sort: self.sort_marker(IDENTITY_KEY),
            }],
            rows,
            selected: state.selected.clone(),
            scroll_top: state.scroll_top,
        }
    }

    pub fn scroll_pane(&self) -> PaneSnapshot {
        let columns = self.registry.columns();
        let rows = self
            .display_rows()
            .iter()
            .map(|row| PaneRow {
                identity: row.identity(),
                cells: columns.iter().map(|c| row.cell(&c.key)).collect(),
                aggregate: row.is_aggregate(),
            })
            .collect();
        let header = columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                width: c.width,
                sort: self.sort_marker(&c.key),
            })
            .collect();
        let state = self.selection.pane(Pane::Scrollable);
        PaneSnapshot {
            pane: Pane::Scrollable,
            header,
            rows,
            selected: state.selected.clone(),
            scroll_top: state.scroll_top,
        }
    }

    // ── Pointer input ───────────────────────────────────────────────────

    pub fn header_geometry(&self) -> HeaderGeometry {
        HeaderGeometry::new(self.registry.widths(), self.layout.h_scroll, self.layout.header_height)
    }

    fn row_at(&self, y: i32) -> Option<String> {
        if y < self.layout.header_height || self.layout.row_height <= 0 {
            return None;
        }
        let offset = ((y - self.layout.header_height) / self.layout.row_height) as usize;
        let index = self.selection.scroll_top() + offset;
        self.display_rows().get(index).map(DisplayRow::identity)
    }

    pub fn pointer_press(&mut self, pane: Pane, point: Point) -> PointerOutcome {
        self.frozen_header_pressed = false;
        if point.y < self.layout.header_height {
            match pane {
                Pane::Frozen => self.frozen_header_pressed = point.y >= 0,
                Pane::Scrollable => {
                    let geometry = self.header_geometry();
                    let keys = self.registry.keys();
                    if self.drag.press(point, &geometry, &keys) {
                        self.tooltip.leave();
                    }
                }
            }
            return PointerOutcome::None;
        }
        match self.row_at(point.y) {
            Some(identity) => PointerOutcome::Selection(self.select(pane, &identity)),
            None => PointerOutcome::None,
        }
    }

    /// Pointer motion, with or without a button held.
    pub fn pointer_move(&mut self, pane: Pane, point: Point, now: Instant) {
        if pane == Pane::Frozen {
            self.tooltip.leave();
            return;
        }
        if self.drag.column().is_some() {
            let geometry = self.header_geometry();
            self.drag.motion(point.x, &geometry);
            if self.drag.is_armed() {
                self.tooltip.leave();
            }
            return;
        }
        let geometry = self.header_geometry();
        let column = if geometry.in_header(point) {
            geometry.column_at(point.x).and_then(|i| self.registry.columns().get(i))
        } else {
            None
        };
        let key = column.map(|c| c.key.clone());
        self.tooltip.motion(key.as_deref(), point, now);
    }

    pub fn pointer_release(&mut self, pane: Pane, point: Point) -> PointerOutcome {
        match pane {
            Pane::Frozen => {
                let clicked = self.frozen_header_pressed
                    && point.y >= 0
                    && point.y < self.layout.header_height;
                self.frozen_header_pressed = false;
                if !clicked {
                    return PointerOutcome::None;
                }
                let direction = self.sort_by(IDENTITY_KEY, None);
                PointerOutcome::Sorted {
                    column: IDENTITY_KEY.to_string(),
                    direction,
                }
            }
            Pane::Scrollable => {
                let geometry = self.header_geometry();
                let keys = self.registry.keys();
                match self.drag.release(point.x, &geometry, &keys) {
                    DragOutcome::Click { column } if geometry.in_header(point) => {
                        let direction = self.sort_by(&column, None);
                        PointerOutcome::Sorted { column, direction }
                    }
                    DragOutcome::Reordered { order, .. } => {
                        self.set_visible_columns(&order);
                        PointerOutcome::Reordered { order }
                    }
                    DragOutcome::Click { .. } | DragOutcome::Unchanged | DragOutcome::None => {
                        PointerOutcome::None
                    }
                }
            }
        }
    }

    /// Pointer left a pane.
    pub fn pointer_leave(&mut self, _pane: Pane) {
        self.tooltip.leave();
    }

    /// Drop a drag gesture without changing the column order.
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_armed()
    }

    /// Column being dragged, once the threshold is crossed.
    pub fn dragged_column(&self) -> Option<&str> {
        self.drag.column().filter(|_| self.drag.is_armed())
    }

    /// Viewport x of the insertion indicator while dragging.
    pub fn drag_indicator(&self) -> Option<i32> {
        self.drag.indicator_x(&self.header_geometry())
    }

    /// Fire due timers. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let registry = &self.registry;
        self.tooltip
            .tick(now, |key| registry.column(key).and_then(|c| c.tooltip.clone()))
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.shown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use serde_json::json;

    fn table() -> ScanTable {
        let mut t = ScanTable::new(MemoryConfigStore::default());
        t.load_document(&json!({"results": [
            {"symbol": "AAPL", "total_breakouts": 3, "active_peaks": 1, "max_quality": 70.0},
            {"symbol": "MSFT", "total_breakouts": 5, "active_peaks": 2, "max_quality": 40.0},
            {"symbol": "NVDA", "total_breakouts": 1, "max_quality": 90.0},
        ]}));
        t
    }

    #[test]
    fn load_resolves_default_columns_in_priority_order() {
        let t = table();
        assert_eq!(t.column_keys(), vec!["total_breakouts", "active_peaks", "max_quality"]);
        assert_eq!(t.frozen_pane().identities(), vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn scroll_pane_renders_cells() {
        let t = table();
        let pane = t.scroll_pane();
        assert_eq!(pane.rows[0].cells, vec!["3", "1", "70.0"]);
        assert_eq!(pane.rows[2].cells, vec!["1", "", "90.0"]);
        assert_eq!(pane.header[0].label, "Total Breakouts");
    }

    #[test]
    fn body_click_selects_row_under_pointer() {
        let mut t = table();
        // header 30px, rows 30px: y=65 is the second body row.
        let out = t.pointer_press(Pane::Scrollable, Point::new(5, 65));
        assert_eq!(
            out,
            PointerOutcome::Selection(SelectionOutcome::Selected { identity: "MSFT".into() })
        );
        assert_eq!(t.frozen_pane().selected.as_deref(), Some("MSFT"));
    }

    #[test]
    fn frozen_header_click_sorts_by_symbol() {
        let mut t = table();
        t.pointer_press(Pane::Frozen, Point::new(5, 5));
        let out = t.pointer_release(Pane::Frozen, Point::new(5, 5));
        assert_eq!(
            out,
            PointerOutcome::Sorted {
                column: "symbol".into(),
                direction: SortDirection::Descending
            }
        );
        assert_eq!(t.frozen_pane().identities(), vec!["NVDA", "MSFT", "AAPL"]);
        assert_eq!(t.frozen_pane().header[0].sort, Some(SortDirection::Descending));
    }

    #[test]
    fn header_press_released_below_header_does_not_sort() {
        let mut t = table();
        t.pointer_press(Pane::Scrollable, Point::new(5, 5));
        let out = t.pointer_release(Pane::Scrollable, Point::new(5, 65));
        assert_eq!(out, PointerOutcome::None);
        assert!(t.sort_state().is_none());
    }

    #[test]
    fn aggregate_row_needs_selected_owner() {
        let mut t = table();
        t.select(Pane::Frozen, "AAPL");
        assert!(!t.show_aggregate_row("MSFT", AggregateStats::new()));
        assert!(t.aggregate_row().is_none());
        assert!(t.show_aggregate_row("AAPL", AggregateStats::new()));
    }

    #[test]
    fn next_and_previous_skip_aggregate_row() {
        let mut t = table();
        t.select(Pane::Frozen, "AAPL");
        let mut stats = AggregateStats::new();
        stats.insert("max_quality".into(), 1.0.into());
        assert!(t.show_aggregate_row("AAPL", stats));
        assert_eq!(t.frozen_pane().identities(), vec!["AAPL", "__temp_AAPL", "MSFT", "NVDA"]);

        assert_eq!(
            t.select_next(),
            SelectionOutcome::Selected { identity: "MSFT".into() }
        );
        // Selecting another row drops the aggregate row.
        assert!(t.aggregate_row().is_none());
        t.select_previous();
        assert_eq!(t.selected_identity(), Some("AAPL"));
        t.select_previous();
        assert_eq!(t.selected_identity(), Some("AAPL"));
    }

    #[test]
    fn wheel_scroll_is_clamped() {
        let mut t = table();
        t.set_layout(Layout {
            viewport_rows: 2,
            ..Layout::default()
        });
        t.scroll_by(10);
        assert_eq!(t.pane_state(Pane::Frozen).scroll_top, 1);
        t.scroll_by(-5);
        assert_eq!(t.pane_state(Pane::Scrollable).scroll_top, 0);
    }

    #[test]
    fn toggle_column_appends_or_removes() {
        let mut t = table();
        t.toggle_column("active_peaks");
        assert_eq!(t.column_keys(), vec!["total_breakouts", "max_quality"]);
        t.toggle_column("avg_quality");
        assert_eq!(t.column_keys(), vec!["total_breakouts", "max_quality", "avg_quality"]);
        t.toggle_column("ghost");
        assert_eq!(t.column_keys().len(), 3);
    }

    #[test]
    fn dialog_unavailable_while_columns_off() {
        let mut t = table();
        assert!(t.column_dialog().is_some());
        t.toggle_columns_enabled();
        assert!(t.column_dialog().is_none());
    }
}
