//! RowStore: the authoritative row collection and its sorted projection.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::label::LabelMode;
use crate::row::Row;
use crate::sort::{sort_indices, SortDirection};
use crate::value::CellValue;

/// Counts from one [`RowStore::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub errored: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

/// Fields patched after a per-symbol recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStatsUpdate {
    pub avg_quality: f64,
    pub max_quality: f64,
    pub total_breakouts: i64,
}

/// Owns every loaded row (in load order) and the projection shown to the
/// user as indices into that collection.
#[derive(Debug, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    by_identity: HashMap<String, usize>,
    projection: Vec<usize>,
    label_mode: LabelMode,
}

impl RowStore {
    pub fn new(label_mode: LabelMode) -> Self {
        Self {
            label_mode,
            ..Self::default()
        }
    }

    /// Replace all rows with the given raw scan results.
    ///
    /// Errored and malformed records are skipped. A repeated identity keeps
    /// its first record. The projection resets to load order.
    pub fn load(&mut self, results: &[Value]) -> LoadSummary {
        let mut summary = LoadSummary::default();
        self.rows.clear();
        self.by_identity.clear();

        for result in results {
            let Some(record) = result.as_object() else {
                summary.malformed += 1;
                continue;
            };
            if record.contains_key("error") {
                summary.errored += 1;
                continue;
            }
            let Some(row) = Row::from_raw(record.clone(), self.label_mode) else {
                summary.malformed += 1;
                continue;
            };
            if self.by_identity.contains_key(row.identity()) {
                tracing::warn!(symbol = row.identity(), "duplicate symbol in scan results, keeping first");
                summary.duplicates += 1;
                continue;
            }
            self.by_identity.insert(row.identity().to_string(), self.rows.len());
            self.rows.push(row);
        }

        self.projection = (0..self.rows.len()).collect();
        summary.loaded = self.rows.len();
        tracing::info!(
            loaded = summary.loaded,
            errored = summary.errored,
            malformed = summary.malformed,
            duplicates = summary.duplicates,
            "scan results loaded"
        );
        summary
    }

    /// Load a whole scan document: `{ "results": [...] }`.
    pub fn load_document(&mut self, document: &Value) -> LoadSummary {
        let results = document
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        self.load(results)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in load order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, identity: &str) -> Option<&Row> {
        self.by_identity.get(identity).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.by_identity.contains_key(identity)
    }

    /// Rows in projection order.
    pub fn projection(&self) -> impl Iterator<Item = &Row> + '_ {
        self.projection.iter().map(move |&i| &self.rows[i])
    }

    /// Position of a row within the projection.
    pub fn position(&self, identity: &str) -> Option<usize> {
        let index = *self.by_identity.get(identity)?;
        self.projection.iter().position(|&i| i == index)
    }

    /// A sorted view of the rows without touching the stored projection.
    ///
    /// Without a sort key this is the load order.
    pub fn project(&self, sort: Option<(&str, SortDirection)>) -> Vec<&Row> {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        if let Some((column, direction)) = sort {
            sort_indices(&self.rows, &mut order, column, direction);
        }
        order.into_iter().map(|i| &self.rows[i]).collect()
    }

    /// Re-sort the stored projection in place (stable w.r.t. its current order).
    pub fn apply_sort(&mut self, column: &str, direction: SortDirection) {
        sort_indices(&self.rows, &mut self.projection, column, direction);
    }

    pub fn label_mode(&self) -> LabelMode {
        self.label_mode
    }

    /// Switch the label summary shown in every row's `label` value.
    pub fn set_label_mode(&mut self, mode: LabelMode) {
        self.label_mode = mode;
        for row in &mut self.rows {
            row.set_label_mode(mode);
        }
    }

    /// Patch the quality aggregates of one row. Returns `false` for unknown rows.
    pub fn update_row_stats(&mut self, identity: &str, update: RowStatsUpdate) -> bool {
        let Some(&index) = self.by_identity.get(identity) else {
            return false;
        };
        let row = &mut self.rows[index];
        row.set_value("avg_quality", CellValue::Float(update.avg_quality));
        row.set_value("max_quality", CellValue::Float(update.max_quality));
        row.set_value("total_breakouts", CellValue::Int(update.total_breakouts));
        true
    }
}

/// Read and parse a scan results file.
pub fn read_scan_file(path: &Path) -> Result<Value, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
