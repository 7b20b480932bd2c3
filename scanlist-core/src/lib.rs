//! Scanlist Core: the synchronized dual-pane scan result table.
//!
//! This crate holds everything the table does independently of a UI toolkit:
//! - Rows built from raw scan records, with label statistics per symbol
//! - Column discovery and ordering driven by persisted configuration
//! - Stable sorting with direction toggling and a total order for missing values
//! - Selection kept in lockstep across the frozen and scrollable panes
//! - Header drag-to-reorder and delayed header tooltips
//! - A synthetic aggregate row pinned beneath its owner
//! - CSV export of the current projection

pub mod aggregate;
pub mod config;
pub mod dialog;
pub mod drag;
pub mod error;
pub mod export;
pub mod geometry;
pub mod label;
pub mod panel;
pub mod registry;
pub mod row;
pub mod selection;
pub mod sort;
pub mod store;
pub mod tooltip;
pub mod value;

pub use aggregate::{summarize_breakouts, AggregateRow, AggregateStats};
pub use config::{ColumnConfig, ColumnConfigSource, ColumnLabel, FileConfigStore, MemoryConfigStore};
pub use dialog::ColumnDialog;
pub use error::{ConfigError, ExportError, LoadError};
pub use geometry::Point;
pub use label::{quality_score, LabelMode};
pub use panel::{DisplayRow, Layout, PaneSnapshot, PointerOutcome, ScanTable};
pub use row::{RawRecord, Row};
pub use selection::{Pane, SelectionOutcome};
pub use sort::{SortDirection, SortState};
pub use store::{read_scan_file, LoadSummary, RowStatsUpdate};
pub use value::CellValue;
