//! The aggregate row: a synthetic, non-persistent row shown directly beneath
//! a selected symbol, carrying stats computed outside the table (for example
//! after the user re-ran detection with different parameters).
//!
//! It never enters the row collection, so it is invisible to column
//! discovery, sorting and export. Only its placement in the display list is
//! tracked here.

use indexmap::IndexMap;
use serde_json::Value;

use crate::label::{LabelMode, LabelStats};
use crate::row::{quality_aggregates, LABEL_KEY};
use crate::value::CellValue;

/// Identity prefix marking an aggregate row.
pub const AGGREGATE_PREFIX: &str = "__temp_";
/// Text shown in the frozen pane for the aggregate row.
pub const AGGREGATE_SYMBOL_CELL: &str = "↳ (UI)";

/// Column key -> value for the aggregate row.
pub type AggregateStats = IndexMap<String, CellValue>;

/// `"__temp_" + owner`.
pub fn aggregate_identity(owner: &str) -> String {
    format!("{AGGREGATE_PREFIX}{owner}")
}

/// The owning identity if `identity` names an aggregate row.
pub fn owner_of(identity: &str) -> Option<&str> {
    identity.strip_prefix(AGGREGATE_PREFIX)
}

/// Stats for one symbol's breakouts, in the shape the table columns use.
pub fn summarize_breakouts(breakouts: &[Value], mode: LabelMode) -> AggregateStats {
    let (avg, max) = quality_aggregates(breakouts);
    let mut stats = AggregateStats::new();
    stats.insert("avg_quality".to_string(), CellValue::Float(avg));
    stats.insert("max_quality".to_string(), CellValue::Float(max));
    stats.insert(
        "total_breakouts".to_string(),
        CellValue::Int(breakouts.len() as i64),
    );
    if let Some(label) = LabelStats::from_breakouts(breakouts).get(mode) {
        stats.insert(LABEL_KEY.to_string(), CellValue::Float(label));
    }
    stats
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub owner: String,
    pub stats: AggregateStats,
}

impl AggregateRow {
    pub fn identity(&self) -> String {
        aggregate_identity(&self.owner)
    }

    pub fn value(&self, key: &str) -> Option<&CellValue> {
        self.stats.get(key)
    }
}

/// Tracks the retained aggregate row and where it currently sits.
///
/// `slot` is the display index of the aggregate row (owner position + 1)
/// while materialized, `None` while detached.
#[derive(Debug, Clone, Default)]
pub struct AggregateRowManager {
    retained: Option<AggregateRow>,
    slot: Option<usize>,
}

impl AggregateRowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing aggregate row with one beneath `owner`.
    ///
    /// `owner_position` is the owner's index in the projection; an owner
    /// that is not shown leaves nothing retained.
    pub fn show(&mut self, owner: &str, stats: AggregateStats, owner_position: Option<usize>) -> bool {
        self.hide();
        let Some(position) = owner_position else {
            tracing::debug!(owner, "aggregate row owner not in projection, ignoring");
            return false;
        };
        self.retained = Some(AggregateRow {
            owner: owner.to_string(),
            stats,
        });
        self.slot = Some(position + 1);
        true
    }

    /// Remove the row and forget it.
    pub fn hide(&mut self) {
        self.retained = None;
        self.slot = None;
    }

    /// Take the row out of the display list but keep it for re-insertion.
    pub fn detach(&mut self) {
        self.slot = None;
    }

    /// Re-insert a detached row beneath its owner's new position. An owner
    /// that disappeared drops the retained row.
    pub fn rematerialize(&mut self, locate: impl FnOnce(&str) -> Option<usize>) {
        let Some(row) = &self.retained else {
            return;
        };
        match locate(&row.owner) {
            Some(position) => self.slot = Some(position + 1),
            None => self.hide(),
        }
    }

    pub fn row(&self) -> Option<&AggregateRow> {
        self.retained.as_ref()
    }

    pub fn owner(&self) -> Option<&str> {
        self.retained.as_ref().map(|r| r.owner.as_str())
    }

    /// Display index of the materialized row.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn is_shown(&self) -> bool {
        self.slot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stats() -> AggregateStats {
        let mut s = AggregateStats::new();
        s.insert("avg_quality".into(), CellValue::Float(0.42));
        s
    }

    #[test]
    fn identity_round_trip() {
        assert_eq!(aggregate_identity("AAPL"), "__temp_AAPL");
        assert_eq!(owner_of("__temp_AAPL"), Some("AAPL"));
        assert_eq!(owner_of("AAPL"), None);
    }

    #[test]
    fn show_places_row_after_owner() {
        let mut agg = AggregateRowManager::new();
        assert!(agg.show("AAPL", stats(), Some(2)));
        assert_eq!(agg.slot(), Some(3));
        assert_eq!(agg.owner(), Some("AAPL"));
        assert_eq!(agg.row().unwrap().identity(), "__temp_AAPL");
    }

    #[test]
    fn show_for_absent_owner_is_noop() {
        let mut agg = AggregateRowManager::new();
        agg.show("AAPL", stats(), Some(0));
        assert!(!agg.show("ZZZ", stats(), None));
        assert!(agg.row().is_none());
        assert!(!agg.is_shown());
    }

    #[test]
    fn detach_then_rematerialize_follows_owner() {
        let mut agg = AggregateRowManager::new();
        agg.show("AAPL", stats(), Some(0));
        agg.detach();
        assert!(!agg.is_shown());
        assert!(agg.row().is_some());
        agg.rematerialize(|owner| (owner == "AAPL").then_some(4));
        assert_eq!(agg.slot(), Some(5));
        assert_eq!(agg.row().unwrap().value("avg_quality"), Some(&CellValue::Float(0.42)));
    }

    #[test]
    fn rematerialize_without_owner_forgets_row() {
        let mut agg = AggregateRowManager::new();
        agg.show("AAPL", stats(), Some(0));
        agg.detach();
        agg.rematerialize(|_| None);
        assert!(agg.row().is_none());
    }

    #[test]
    fn summarize_uses_nonzero_scores_and_label_mode() {
        let bos = vec![
            json!({"quality_score": 60.0, "date": "2024-01-01", "labels": {"r": 0.1}}),
            json!({"quality_score": 0.0, "date": "2024-02-01", "labels": {"r": 0.5}}),
            json!({"quality_score": 80.0, "date": "2024-01-15", "labels": {"r": 0.3}}),
        ];
        let s = summarize_breakouts(&bos, LabelMode::Latest);
        assert_eq!(s.get("avg_quality"), Some(&CellValue::Float(70.0)));
        assert_eq!(s.get("max_quality"), Some(&CellValue::Float(80.0)));
        assert_eq!(s.get("total_breakouts"), Some(&CellValue::Int(3)));
        assert_eq!(s.get("label"), Some(&CellValue::Float(0.5)));
    }
}
