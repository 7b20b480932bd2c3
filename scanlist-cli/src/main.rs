//! Scanlist CLI: headless access to the scan result table.
//!
//! Commands:
//! - `summary`: print the table (symbol + visible columns) as aligned text
//! - `export`: write the table as CSV to a file or stdout
//! - `columns`: list discovered columns, or set the visible ones

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scanlist_core::export::{export_csv_file, write_csv};
use scanlist_core::{
    read_scan_file, FileConfigStore, LabelMode, MemoryConfigStore, ScanTable, SortDirection,
};

#[derive(Parser)]
#[command(name = "scanlist", about = "Scanlist CLI: breakout scan result tables")]
struct Cli {
    /// Column config TOML. Without it the built-in defaults are used and
    /// nothing is written.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that render rows.
#[derive(clap::Args)]
struct ViewArgs {
    /// Scan results JSON (`{"results": [...]}`).
    scan: PathBuf,

    /// Column to sort by (`symbol` or any data column).
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending instead of descending.
    #[arg(long, default_value_t = false)]
    asc: bool,

    /// Label summary: avg, max, best_quality or latest.
    #[arg(long, default_value = "avg")]
    label_mode: LabelMode,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table as aligned text.
    Summary {
        #[command(flatten)]
        view: ViewArgs,

        /// Only print the first N rows.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write the table as CSV.
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List discovered columns, or set the visible ones.
    Columns {
        /// Scan results JSON used to discover columns.
        scan: PathBuf,

        /// Comma-separated column keys to show, in order. Requires --config.
        #[arg(long, value_delimiter = ',')]
        set: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Summary { view, limit } => {
            let table = open_table(config.as_deref(), &view)?;
            print!("{}", render_table(&table, limit));
            Ok(())
        }
        Commands::Export { view, output } => {
            let table = open_table(config.as_deref(), &view)?;
            run_export(&table, output.as_deref())
        }
        Commands::Columns { scan, set } => run_columns(config.as_deref(), &scan, set),
    }
}

fn new_table(config: Option<&Path>, label_mode: LabelMode) -> ScanTable {
    match config {
        Some(path) => ScanTable::with_label_mode(FileConfigStore::open(path), label_mode),
        None => ScanTable::with_label_mode(MemoryConfigStore::default(), label_mode),
    }
}

fn load(table: &mut ScanTable, scan: &Path) -> Result<()> {
    let document = read_scan_file(scan).with_context(|| format!("reading {}", scan.display()))?;
    let summary = table.load_document(&document);
    tracing::info!(
        loaded = summary.loaded,
        errored = summary.errored,
        malformed = summary.malformed,
        duplicates = summary.duplicates,
        "scan loaded"
    );
    Ok(())
}

fn open_table(config: Option<&Path>, view: &ViewArgs) -> Result<ScanTable> {
    let mut table = new_table(config, view.label_mode);
    load(&mut table, &view.scan)?;
    if let Some(column) = &view.sort {
        let known = column == "symbol" || table.available_columns().iter().any(|k| k == column);
        if !known {
            bail!(
                "unknown sort column '{column}'. Available: symbol, {}",
                table.available_columns().join(", ")
            );
        }
        let direction = if view.asc {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        table.sort_by(column, Some(direction));
    }
    Ok(table)
}

/// Symbol + visible columns, left-aligned, widths fitted to content.
fn render_table(table: &ScanTable, limit: Option<usize>) -> String {
    let mut header = vec!["Symbol".to_string()];
    header.extend(table.columns().iter().map(|c| c.label.clone()));

    let pane = table.scroll_pane();
    let take = limit.unwrap_or(usize::MAX);
    let rows: Vec<Vec<String>> = pane
        .rows
        .iter()
        .filter(|r| !r.aggregate)
        .take(take)
        .map(|r| {
            let mut cells = vec![r.identity.clone()];
            cells.extend(r.cells.iter().cloned());
            cells
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&header);
    for row in &rows {
        out.push_str(&line(row));
    }
    out
}

fn run_export(table: &ScanTable, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let rows = export_csv_file(table, path)?;
            eprintln!("Exported {rows} rows to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_csv(table, &mut lock)?;
            lock.flush()?;
        }
    }
    Ok(())
}

fn run_columns(config: Option<&Path>, scan: &Path, set: Option<Vec<String>>) -> Result<()> {
    let mut table = new_table(config, LabelMode::default());
    load(&mut table, scan)?;

    if let Some(columns) = set {
        let Some(path) = config else {
            bail!("--set needs --config to know where to save");
        };
        let unknown: Vec<&String> = columns
            .iter()
            .filter(|c| !table.available_columns().contains(*c))
            .collect();
        if !unknown.is_empty() {
            bail!(
                "unknown columns: {}",
                unknown.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            );
        }
        table.set_visible_columns(&columns);
        println!("Saved {} visible columns to {}", columns.len(), path.display());
    }

    print!("{}", describe_columns(&table));
    Ok(())
}

fn describe_columns(table: &ScanTable) -> String {
    let config = table.config();
    let visible = table.column_keys();
    let mut out = String::new();
    if !config.columns_enabled {
        out.push_str("(columns are switched off)\n");
    }
    for key in table.available_columns() {
        let position = visible.iter().position(|k| k == key);
        let marker = match position {
            Some(i) => format!("{:>2}", i + 1),
            None => " -".to_string(),
        };
        out.push_str(&format!("{marker}  {key:<20} {}", config.display_label(key)));
        if let Some(tooltip) = config.tooltip(key) {
            out.push_str(&format!("  ({tooltip})"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> ScanTable {
        let mut t = ScanTable::new(MemoryConfigStore::default());
        t.load_document(&json!({"results": [
            {"symbol": "AAPL", "total_breakouts": 3, "active_peaks": 1, "max_quality": 70.0},
            {"symbol": "MSFT", "total_breakouts": 12, "max_quality": 40.0},
        ]}));
        t
    }

    #[test]
    fn render_table_aligns_columns() {
        let text = render_table(&table(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Symbol  Total Breakouts  Active Peaks  Max Quality");
        assert_eq!(lines[1], "AAPL    3                1             70.0");
        assert_eq!(lines[2], "MSFT    12                             40.0");
    }

    #[test]
    fn render_table_honors_limit() {
        let text = render_table(&table(), Some(1));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn describe_columns_marks_visible_positions() {
        let text = describe_columns(&table());
        let aq = text.lines().find(|l| l.contains("avg_quality")).unwrap();
        assert!(aq.starts_with(" -"));
        let tb = text.lines().find(|l| l.contains("total_breakouts")).unwrap();
        assert!(tb.starts_with(" 1"));
        assert!(tb.contains("Total Breakouts"));
    }
}
