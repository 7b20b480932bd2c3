//! Column sorting with direction toggling and a total order for missing values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::row::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
    }
}

/// Last applied sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Remembers the last sort so repeated clicks on one header toggle direction.
#[derive(Debug, Clone, Default)]
pub struct SortEngine {
    last: Option<SortState>,
}

impl SortEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&SortState> {
        self.last.as_ref()
    }

    /// Restore a remembered sort (e.g. from persisted UI state) without sorting.
    pub fn restore(&mut self, state: Option<SortState>) {
        self.last = state;
    }

    /// Pick the direction for a sort request and remember it.
    ///
    /// Explicit directions win. Otherwise re-sorting the last column flips its
    /// direction and any other column starts descending.
    pub fn resolve(&mut self, column: &str, explicit: Option<SortDirection>) -> SortDirection {
        let direction = explicit.unwrap_or_else(|| match &self.last {
            Some(last) if last.column == column => last.direction.flipped(),
            _ => SortDirection::Descending,
        });
        self.last = Some(SortState {
            column: column.to_string(),
            direction,
        });
        direction
    }
}

/// Compare two rows on one column, ascending, missing values first.
///
/// Descending order is this comparator reversed, which moves missing values
/// last. Equal keys compare `Equal` so a stable sort keeps their order.
pub fn compare_rows(a: &Row, b: &Row, column: &str) -> Ordering {
    match (a.value(column), b.value(column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

/// Stable in-place sort of `order` (indices into `rows`).
pub fn sort_indices(rows: &[Row], order: &mut [usize], column: &str, direction: SortDirection) {
    order.sort_by(|&i, &j| {
        let ord = compare_rows(&rows[i], &rows[j], column);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::LabelMode;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        [
            json!({"symbol": "A", "score": 3}),
            json!({"symbol": "B"}),
            json!({"symbol": "C", "score": 7}),
            json!({"symbol": "D", "score": 3}),
            json!({"symbol": "E"}),
        ]
        .into_iter()
        .filter_map(|v| Row::from_raw(v.as_object().cloned().unwrap(), LabelMode::Avg))
        .collect()
    }

    fn ids(rows: &[Row], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| rows[i].identity().to_string()).collect()
    }

    #[test]
    fn toggles_on_repeat_and_defaults_descending() {
        let mut engine = SortEngine::new();
        assert_eq!(engine.resolve("score", None), SortDirection::Descending);
        assert_eq!(engine.resolve("score", None), SortDirection::Ascending);
        assert_eq!(engine.resolve("score", None), SortDirection::Descending);
        assert_eq!(engine.resolve("other", None), SortDirection::Descending);
    }

    #[test]
    fn explicit_direction_wins() {
        let mut engine = SortEngine::new();
        engine.resolve("score", None);
        assert_eq!(
            engine.resolve("score", Some(SortDirection::Descending)),
            SortDirection::Descending
        );
        assert_eq!(engine.resolve("score", None), SortDirection::Ascending);
    }

    #[test]
    fn descending_puts_missing_last_and_keeps_ties_stable() {
        let rows = rows();
        let mut order: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut order, "score", SortDirection::Descending);
        assert_eq!(ids(&rows, &order), vec!["C", "A", "D", "B", "E"]);
    }

    #[test]
    fn ascending_puts_missing_first_and_keeps_ties_stable() {
        let rows = rows();
        let mut order: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut order, "score", SortDirection::Ascending);
        assert_eq!(ids(&rows, &order), vec!["B", "E", "A", "D", "C"]);
    }

    #[test]
    fn identity_column_sorts_by_symbol() {
        let rows = rows();
        let mut order: Vec<usize> = (0..rows.len()).rev().collect();
        sort_indices(&rows, &mut order, "symbol", SortDirection::Ascending);
        assert_eq!(ids(&rows, &order), vec!["A", "B", "C", "D", "E"]);
    }
}
