//! CSV export of the table as currently shown.
//!
//! Rows follow the sorted projection and columns follow the visible order,
//! with `symbol` first. The aggregate row is display-only and never exported.

use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::panel::ScanTable;
use crate::row::IDENTITY_KEY;
use crate::value::render_cell;

/// Write the projection as CSV to any writer.
pub fn write_csv<W: Write>(table: &ScanTable, writer: W) -> Result<usize, ExportError> {
    let keys = table.column_keys();
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(keys.len() + 1);
    header.push(IDENTITY_KEY);
    header.extend(keys.iter().map(String::as_str));
    wtr.write_record(&header)?;

    let mut written = 0;
    for row in table.store().projection() {
        let mut record = Vec::with_capacity(keys.len() + 1);
        record.push(row.identity().to_string());
        record.extend(keys.iter().map(|k| render_cell(row.value_ref(k))));
        wtr.write_record(&record)?;
        written += 1;
    }
    wtr.flush()?;
    Ok(written)
}

/// Export to an in-memory string.
pub fn export_csv(table: &ScanTable) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Export to a file, creating parent directories.
pub fn export_csv_file(table: &ScanTable, path: &Path) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let written = write_csv(table, file)?;
    tracing::info!(path = %path.display(), rows = written, "csv exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateStats;
    use crate::config::MemoryConfigStore;
    use crate::selection::Pane;
    use crate::sort::SortDirection;
    use serde_json::json;

    fn table() -> ScanTable {
        let mut t = ScanTable::new(MemoryConfigStore::default());
        t.load_document(&json!({"results": [
            {"symbol": "AAPL", "total_breakouts": 3, "max_quality": 70.5},
            {"symbol": "BRK,B", "total_breakouts": 8},
        ]}));
        t
    }

    #[test]
    fn exports_projection_in_sorted_order() {
        let mut t = table();
        t.sort_by("total_breakouts", Some(SortDirection::Descending));
        let csv = export_csv(&t).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "symbol,total_breakouts,max_quality");
        assert_eq!(lines[1], "\"BRK,B\",8,0.0");
        assert_eq!(lines[2], "AAPL,3,70.5");
    }

    #[test]
    fn aggregate_row_is_not_exported() {
        let mut t = table();
        let mut stats = AggregateStats::new();
        stats.insert("total_breakouts".into(), 99i64.into());
        t.select(Pane::Frozen, "AAPL");
        assert!(t.show_aggregate_row("AAPL", stats));
        let csv = export_csv(&t).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(!csv.contains("99"));
    }

    #[test]
    fn file_export_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("scan.csv");
        assert_eq!(export_csv_file(&table(), &path).unwrap(), 2);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("symbol,"));
    }
}
