//! Rows: one per scanned symbol.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::label::{quality_score, LabelMode, LabelStats};
use crate::value::CellValue;

/// Key holding the row identity in raw records and in the sort API.
pub const IDENTITY_KEY: &str = "symbol";
/// Key reserved for the back-reference to the raw record.
pub const RAW_KEY: &str = "raw_data";
/// Key of the active label summary column.
pub const LABEL_KEY: &str = "label";
/// Keys starting with this marker are internal and never become columns.
pub const INTERNAL_PREFIX: &str = "_";

/// Raw-record keys that are never copied into the value map.
const SKIPPED_RAW_KEYS: [&str; 3] = [IDENTITY_KEY, "breakouts", "error"];
/// Raw-record prefix for precomputed label summaries (kept out of columns).
const RAW_LABEL_PREFIX: &str = "label_";

/// The untouched scan record a row was built from.
pub type RawRecord = Map<String, Value>;

/// One symbol and its attribute values.
#[derive(Debug, Clone)]
pub struct Row {
    identity: String,
    values: IndexMap<String, CellValue>,
    label_stats: LabelStats,
    label: Option<CellValue>,
    raw: Arc<RawRecord>,
}

impl Row {
    /// Build a row from a raw scan record.
    ///
    /// Returns `None` for records flagged with `error` or lacking a string
    /// `symbol`.
    pub fn from_raw(record: RawRecord, label_mode: LabelMode) -> Option<Row> {
        if record.contains_key("error") {
            return None;
        }
        let identity = record.get(IDENTITY_KEY)?.as_str()?.to_string();

        let breakouts: &[Value] = record
            .get("breakouts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let mut values = IndexMap::new();

        // Quality aggregates: precomputed values win, else derive from breakouts.
        if record.contains_key("avg_quality") && record.contains_key("max_quality") {
            for key in ["avg_quality", "max_quality"] {
                if let Some(v) = record.get(key).and_then(CellValue::from_json) {
                    values.insert(key.to_string(), v);
                }
            }
        } else {
            let (avg, max) = quality_aggregates(breakouts);
            values.insert("avg_quality".to_string(), CellValue::Float(avg));
            values.insert("max_quality".to_string(), CellValue::Float(max));
        }

        for (key, raw_value) in &record {
            if SKIPPED_RAW_KEYS.contains(&key.as_str()) || key.starts_with(RAW_LABEL_PREFIX) {
                continue;
            }
            if let Some(v) = CellValue::from_json(raw_value) {
                values.insert(key.clone(), v);
            }
        }

        let label_stats = LabelStats::from_breakouts(breakouts);
        let label = label_stats.get(label_mode).map(CellValue::Float);

        Some(Row {
            identity,
            values,
            label_stats,
            label,
            raw: Arc::new(record),
        })
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn raw(&self) -> &RawRecord {
        &self.raw
    }

    pub fn label_stats(&self) -> &LabelStats {
        &self.label_stats
    }

    /// Value for a column key. `symbol` resolves to the identity.
    pub fn value(&self, key: &str) -> Option<CellValue> {
        match key {
            IDENTITY_KEY => Some(CellValue::Text(self.identity.clone())),
            LABEL_KEY => self.label.clone(),
            _ => self.values.get(key).cloned(),
        }
    }

    /// Borrowing variant of [`Row::value`] for non-identity keys.
    pub fn value_ref(&self, key: &str) -> Option<&CellValue> {
        match key {
            LABEL_KEY => self.label.as_ref(),
            _ => self.values.get(key),
        }
    }

    /// Value-map keys in discovery order, `label` last.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values
            .keys()
            .map(String::as_str)
            .chain(std::iter::once(LABEL_KEY))
    }

    pub(crate) fn set_label_mode(&mut self, mode: LabelMode) {
        self.label = self.label_stats.get(mode).map(CellValue::Float);
    }

    pub(crate) fn set_value(&mut self, key: &str, value: CellValue) {
        self.values.insert(key.to_string(), value);
    }
}

/// Mean and max of the non-zero quality scores; `(0, 0)` when there are none.
pub fn quality_aggregates(breakouts: &[Value]) -> (f64, f64) {
    let scores: Vec<f64> = breakouts
        .iter()
        .map(quality_score)
        .filter(|q| *q != 0.0)
        .collect();
    if scores.is_empty() {
        return (0.0, 0.0);
    }
    let avg = scores.iter().sum::<f64>() / scores.len() as f64;
    let max = scores.iter().copied().fold(f64::MIN, f64::max);
    (avg, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn errored_records_are_skipped() {
        let r = record(json!({"symbol": "AAPL", "error": "no data"}));
        assert!(Row::from_raw(r, LabelMode::Avg).is_none());
    }

    #[test]
    fn records_without_symbol_are_skipped() {
        assert!(Row::from_raw(record(json!({"total_breakouts": 3})), LabelMode::Avg).is_none());
        assert!(Row::from_raw(record(json!({"symbol": 12})), LabelMode::Avg).is_none());
    }

    #[test]
    fn derives_quality_from_breakouts() {
        let r = record(json!({
            "symbol": "MSFT",
            "breakouts": [
                {"quality_score": 60.0},
                {"quality_score": 0},
                {"quality_score": 20.0},
                {}
            ]
        }));
        let row = Row::from_raw(r, LabelMode::Avg).unwrap();
        assert_eq!(row.value("avg_quality"), Some(CellValue::Float(40.0)));
        assert_eq!(row.value("max_quality"), Some(CellValue::Float(60.0)));
    }

    #[test]
    fn empty_breakouts_give_zero_quality() {
        let row = Row::from_raw(record(json!({"symbol": "X", "breakouts": []})), LabelMode::Avg).unwrap();
        assert_eq!(row.value("avg_quality"), Some(CellValue::Float(0.0)));
        assert_eq!(row.value("max_quality"), Some(CellValue::Float(0.0)));
    }

    #[test]
    fn precomputed_quality_wins() {
        let r = record(json!({
            "symbol": "NVDA",
            "avg_quality": 55,
            "max_quality": 91.5,
            "breakouts": [{"quality_score": 10.0}]
        }));
        let row = Row::from_raw(r, LabelMode::Avg).unwrap();
        assert_eq!(row.value("avg_quality"), Some(CellValue::Int(55)));
        assert_eq!(row.value("max_quality"), Some(CellValue::Float(91.5)));
    }

    #[test]
    fn copies_scalars_and_skips_reserved_fields() {
        let r = record(json!({
            "symbol": "TSLA",
            "total_breakouts": 4,
            "active_peaks": 2,
            "label_ret_avg": 0.3,
            "sector": "Auto",
            "params": {"window": 20},
            "breakouts": []
        }));
        let row = Row::from_raw(r, LabelMode::Avg).unwrap();
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(
            keys,
            vec!["avg_quality", "max_quality", "total_breakouts", "active_peaks", "sector", "label"]
        );
        assert_eq!(row.value("symbol"), Some(CellValue::Text("TSLA".into())));
        assert!(row.raw().contains_key("params"));
    }

    #[test]
    fn label_follows_mode() {
        let r = record(json!({
            "symbol": "AMD",
            "breakouts": [
                {"date": "2024-01-01", "quality_score": 90.0, "labels": {"r": 0.5}},
                {"date": "2024-02-01", "quality_score": 10.0, "labels": {"r": 0.1}}
            ]
        }));
        let mut row = Row::from_raw(r, LabelMode::Latest).unwrap();
        assert_eq!(row.value(LABEL_KEY), Some(CellValue::Float(0.1)));
        row.set_label_mode(LabelMode::BestQuality);
        assert_eq!(row.value(LABEL_KEY), Some(CellValue::Float(0.5)));
    }
}
