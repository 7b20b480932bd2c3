//! Application state: single-owner, main-thread only.
//!
//! The table itself lives in [`ScanTable`]; this struct holds what the
//! terminal host adds around it: focus, overlays, pane rectangles and the
//! queue of notifications the table's callbacks produce.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use ratatui::layout::Rect;
use serde_json::Value;

use scanlist_core::export::export_csv_file;
use scanlist_core::{
    quality_score, read_scan_file, summarize_breakouts, CellValue, ColumnConfigSource, ColumnDialog,
    Layout as TableLayout, Pane, Point, PointerOutcome, RowStatsUpdate, ScanTable, SelectionOutcome,
    SortState,
};

use crate::ui::{self, PaneAreas};

/// Core coordinates are pixels; one terminal cell stands for this many.
pub const PIXELS_PER_CELL: i32 = 10;

/// Notifications pushed by the table callbacks, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    Selected { symbol: String, breakouts: usize },
    WidthChanged(u32),
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// One line of the header context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: String,
    pub label: String,
    pub visible: bool,
}

/// Modal overlays. Only one is open at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    None,
    Help,
    Columns { dialog: ColumnDialog, cursor: usize },
    ContextMenu { entries: Vec<MenuEntry>, cursor: usize, anchor: (u16, u16) },
}

pub struct AppState {
    pub running: bool,
    pub table: ScanTable,
    pub events: Receiver<TableEvent>,
    pub overlay: Overlay,
    pub help_seen: bool,
    pub status_message: Option<(String, StatusLevel)>,

    pub scan_path: Option<PathBuf>,
    /// Sort restored from the previous session, applied after the next load.
    pub pending_sort: Option<SortState>,
    /// Breakouts below this quality are left out of the aggregate row.
    pub min_quality: f64,

    pub focus: Pane,
    /// Index into the visible columns for keyboard sorting.
    pub column_cursor: usize,
    pub h_scroll: u16,
    pub last_selected: Option<(String, usize)>,

    pub panes: PaneAreas,
    /// Pane that owns the mouse between a press and its release.
    pub mouse_capture: Option<Pane>,
    pub hover: Option<Pane>,
}

impl AppState {
    /// Build the app around a column config store. Table callbacks are wired
    /// into the event channel here.
    pub fn new(config: impl ColumnConfigSource + 'static, scan_path: Option<PathBuf>) -> Self {
        let (tx, events) = mpsc::channel();
        let mut table = ScanTable::new(config);

        let selection_tx = tx.clone();
        table.on_selection_changed(move |symbol, record| {
            let breakouts = record
                .get("breakouts")
                .and_then(Value::as_array)
                .map_or(0, Vec::len);
            let _ = selection_tx.send(TableEvent::Selected {
                symbol: symbol.to_string(),
                breakouts,
            });
        });
        table.on_width_changed(move |width| {
            let _ = tx.send(TableEvent::WidthChanged(width));
        });

        Self {
            running: true,
            table,
            events,
            overlay: Overlay::None,
            help_seen: false,
            status_message: None,
            scan_path,
            pending_sort: None,
            min_quality: 0.0,
            focus: Pane::Scrollable,
            column_cursor: 0,
            h_scroll: 0,
            last_selected: None,
            panes: PaneAreas::default(),
            mouse_capture: None,
            hover: None,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        let message = msg.into();
        tracing::warn!(%message, "status error");
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Apply queued table notifications.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TableEvent::Selected { symbol, breakouts } => {
                    tracing::debug!(%symbol, breakouts, "row selected");
                    self.last_selected = Some((symbol, breakouts));
                }
                TableEvent::WidthChanged(width) => {
                    tracing::debug!(width, "required width changed");
                    self.clamp_h_scroll();
                    self.sync_layout();
                }
            }
        }
    }

    // ── Loading ─────────────────────────────────────────────────────────

    /// (Re)load the scan file named by `scan_path`.
    pub fn reload(&mut self) {
        let Some(path) = self.scan_path.clone() else {
            self.set_warning("No scan file; pass one on the command line");
            return;
        };
        match read_scan_file(&path) {
            Ok(document) => {
                self.load_document(&document);
                tracing::info!(path = %path.display(), rows = self.table.row_count(), "scan loaded");
            }
            Err(e) => self.set_error(format!("{}: {e}", path.display())),
        }
    }

    pub fn load_document(&mut self, document: &Value) {
        let summary = self.table.load_document(document);
        if let Some(sort) = self.pending_sort.take() {
            self.table.restore_sort(Some(sort));
        }
        self.column_cursor = self.column_cursor.min(self.table.columns().len().saturating_sub(1));
        self.drain_events();

        let mut msg = format!("Loaded {} symbols", summary.loaded);
        if summary.errored + summary.malformed + summary.duplicates > 0 {
            msg.push_str(&format!(
                " (skipped {} errored, {} malformed, {} duplicate)",
                summary.errored, summary.malformed, summary.duplicates
            ));
            self.set_warning(msg);
        } else {
            self.set_status(msg);
        }
    }

    // ── Geometry ────────────────────────────────────────────────────────

    /// Recompute pane rectangles for a new terminal size.
    pub fn resize(&mut self, area: Rect) {
        self.panes = ui::pane_areas(area);
        self.clamp_h_scroll();
        self.sync_layout();
    }

    fn sync_layout(&mut self) {
        let body = self.panes.scroll_inner().height.saturating_sub(1);
        self.table.set_layout(TableLayout {
            header_height: PIXELS_PER_CELL,
            row_height: PIXELS_PER_CELL,
            viewport_rows: body as usize,
            h_scroll: u32::from(self.h_scroll) * PIXELS_PER_CELL as u32,
        });
    }

    /// Columns hidden to the right, in cells.
    pub fn max_h_scroll(&self) -> u16 {
        let pixels: u32 = self.table.columns().iter().map(|c| c.width).sum();
        let content = pixels.div_ceil(PIXELS_PER_CELL as u32);
        let visible = u32::from(self.panes.scroll_inner().width);
        content.saturating_sub(visible).min(u32::from(u16::MAX)) as u16
    }

    fn clamp_h_scroll(&mut self) {
        self.h_scroll = self.h_scroll.min(self.max_h_scroll());
    }

    pub fn scroll_horizontal(&mut self, delta: i32) {
        let next = (i32::from(self.h_scroll) + delta).clamp(0, i32::from(self.max_h_scroll()));
        self.h_scroll = next as u16;
        self.sync_layout();
    }

    /// Pane and pane-relative point under a terminal cell.
    pub fn hit(&self, column: u16, row: u16) -> Option<(Pane, Point)> {
        [Pane::Frozen, Pane::Scrollable].into_iter().find_map(|pane| {
            let inner = self.panes.inner(pane);
            let inside = column >= inner.x
                && column < inner.x + inner.width
                && row >= inner.y
                && row < inner.y + inner.height;
            inside.then(|| (pane, self.point_in(pane, column, row)))
        })
    }

    /// Convert a terminal cell to a point relative to `pane`, even outside it.
    pub fn point_in(&self, pane: Pane, column: u16, row: u16) -> Point {
        let inner = self.panes.inner(pane);
        let px = |cell: u16, origin: u16| (i32::from(cell) - i32::from(origin)) * PIXELS_PER_CELL + PIXELS_PER_CELL / 2;
        Point::new(px(column, inner.x), px(row, inner.y))
    }

    // ── Table commands ──────────────────────────────────────────────────

    pub fn focused_column(&self) -> Option<String> {
        match self.focus {
            Pane::Frozen => Some("symbol".to_string()),
            Pane::Scrollable => self.table.columns().get(self.column_cursor).map(|c| c.key.clone()),
        }
    }

    pub fn move_column_cursor(&mut self, delta: i32) {
        let len = self.table.columns().len();
        if len == 0 {
            return;
        }
        let next = (self.column_cursor as i64 + i64::from(delta)).clamp(0, len as i64 - 1);
        self.column_cursor = next as usize;
    }

    pub fn sort_focused(&mut self) {
        if let Some(column) = self.focused_column() {
            let direction = self.table.sort_by(&column, None);
            self.set_status(format!("Sorted by {column} {}", direction.arrow()));
        }
    }

    pub fn cycle_label_mode(&mut self) {
        let mode = self.table.label_mode().next();
        self.table.set_label_mode(mode);
        self.set_status(format!("Label: {mode}"));
    }

    /// Summarize the selected symbol's breakouts above `min_quality` into
    /// the aggregate row beneath it.
    pub fn show_aggregate(&mut self) {
        let Some(symbol) = self.table.selected_identity().map(str::to_string) else {
            self.set_warning("Select a symbol first");
            return;
        };
        let Some(row) = self.table.store().get(&symbol) else {
            return;
        };
        let breakouts: Vec<Value> = row
            .raw()
            .get("breakouts")
            .and_then(Value::as_array)
            .map(|all| {
                all.iter()
                    .filter(|b| quality_score(b) >= self.min_quality)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let stats = summarize_breakouts(&breakouts, self.table.label_mode());
        if self.table.show_aggregate_row(&symbol, stats) {
            self.set_status(format!(
                "{symbol}: {} breakouts with quality >= {:.0}",
                breakouts.len(),
                self.min_quality
            ));
        }
    }

    /// Write the aggregate row's stats into its owner row.
    pub fn commit_aggregate(&mut self) {
        let Some(agg) = self.table.aggregate_row().cloned() else {
            self.set_warning("No aggregate row to apply");
            return;
        };
        let float = |key: &str| agg.value(key).and_then(CellValue::as_f64).unwrap_or(0.0);
        let update = RowStatsUpdate {
            avg_quality: float("avg_quality"),
            max_quality: float("max_quality"),
            total_breakouts: float("total_breakouts") as i64,
        };
        self.table.hide_aggregate_row();
        if self.table.update_row_stats(&agg.owner, update) {
            self.set_status(format!("Updated {}", agg.owner));
        }
    }

    pub fn adjust_min_quality(&mut self, delta: f64) {
        self.min_quality = (self.min_quality + delta).clamp(0.0, 100.0);
        self.set_status(format!("Min quality {:.0}", self.min_quality));
        if self.table.aggregate_row().is_some() {
            self.show_aggregate();
        }
    }

    pub fn open_column_dialog(&mut self) {
        match self.table.column_dialog() {
            Some(dialog) => self.overlay = Overlay::Columns { dialog, cursor: 0 },
            None => self.set_warning("Columns are switched off (C to enable)"),
        }
    }

    /// Context menu listing every discovered column with its visibility.
    pub fn open_context_menu(&mut self, anchor: (u16, u16)) {
        if !self.table.columns_enabled() {
            return;
        }
        let visible = self.table.column_keys();
        let config = self.table.config();
        let entries: Vec<MenuEntry> = self
            .table
            .available_columns()
            .iter()
            .map(|key| MenuEntry {
                key: key.clone(),
                label: config.display_label(key),
                visible: visible.contains(key),
            })
            .collect();
        if !entries.is_empty() {
            self.overlay = Overlay::ContextMenu { entries, cursor: 0, anchor };
        }
    }

    pub fn toggle_columns(&mut self) {
        let enabled = self.table.toggle_columns_enabled();
        self.column_cursor = 0;
        self.h_scroll = 0;
        self.sync_layout();
        self.set_status(if enabled { "Columns on" } else { "Columns off" });
    }

    pub fn export(&mut self) {
        let path = export_path(self.scan_path.as_deref(), chrono::Local::now());
        match export_csv_file(&self.table, &path) {
            Ok(rows) => self.set_status(format!("Exported {rows} rows to {}", path.display())),
            Err(e) => self.set_error(format!("Export failed: {e}")),
        }
    }

    /// Reflect a pointer gesture in focus and status.
    pub fn note_pointer(&mut self, outcome: PointerOutcome) {
        match outcome {
            PointerOutcome::Sorted { column, direction } => {
                if let Some(i) = self.table.columns().iter().position(|c| c.key == column) {
                    self.column_cursor = i;
                }
                self.set_status(format!("Sorted by {column} {}", direction.arrow()));
            }
            PointerOutcome::Reordered { order } => {
                self.set_status(format!("Columns: {}", order.join(", ")));
            }
            PointerOutcome::Selection(SelectionOutcome::Redirected { owner }) => {
                tracing::debug!(%owner, "aggregate click redirected");
            }
            PointerOutcome::Selection(_) | PointerOutcome::None => {}
        }
    }
}

/// `<scan stem>_<timestamp>.csv` next to the scan file, or in the working
/// directory when no file is loaded.
pub fn export_path(scan: Option<&Path>, now: chrono::DateTime<chrono::Local>) -> PathBuf {
    let stamp = now.format("%Y%m%d_%H%M%S");
    match scan {
        Some(path) => {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("scan");
            path.with_file_name(format!("{stem}_{stamp}.csv"))
        }
        None => PathBuf::from(format!("scanlist_{stamp}.csv")),
    }
}
