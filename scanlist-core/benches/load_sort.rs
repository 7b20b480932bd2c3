//! Criterion benchmarks for table hot paths.
//!
//! Benchmarks:
//! 1. Loading a large scan (row building, label stats, column resolution)
//! 2. Sorting the projection by a numeric column
//! 3. Rendering both pane snapshots with an aggregate row shown

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

use scanlist_core::aggregate::AggregateStats;
use scanlist_core::config::MemoryConfigStore;
use scanlist_core::panel::ScanTable;
use scanlist_core::selection::Pane;
use scanlist_core::sort::SortDirection;
use scanlist_core::CellValue;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_results(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            let breakouts: Vec<Value> = (0..(i % 6))
                .map(|j| {
                    json!({
                        "date": format!("2024-{:02}-{:02}", j % 12 + 1, i % 28 + 1),
                        "quality_score": ((i * 7 + j * 13) % 100) as f64,
                        "labels": {"ret_20d": ((i + j) % 40) as f64 / 100.0 - 0.2}
                    })
                })
                .collect();
            json!({
                "symbol": format!("SYM{i:05}"),
                "total_breakouts": breakouts.len(),
                "active_peaks": i % 5,
                "sector": ["Tech", "Energy", "Health"][i % 3],
                "breakouts": breakouts,
            })
        })
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    for n in [1_000usize, 5_000] {
        let results = make_results(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &results, |b, results| {
            b.iter(|| {
                let mut table = ScanTable::new(MemoryConfigStore::default());
                black_box(table.load(results))
            })
        });
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let results = make_results(5_000);
    let mut table = ScanTable::new(MemoryConfigStore::default());
    table.load(&results);
    c.bench_function("sort_max_quality_5000", |b| {
        b.iter(|| black_box(table.sort_by("max_quality", None)))
    });
    c.bench_function("sort_symbol_5000", |b| {
        b.iter(|| black_box(table.sort_by("symbol", Some(SortDirection::Ascending))))
    });
}

fn bench_render(c: &mut Criterion) {
    let results = make_results(5_000);
    let mut table = ScanTable::new(MemoryConfigStore::default());
    table.load(&results);
    let mut stats = AggregateStats::new();
    stats.insert("max_quality".into(), CellValue::Float(99.0));
    table.select(Pane::Frozen, "SYM02500");
    table.show_aggregate_row("SYM02500", stats);
    c.bench_function("render_panes_5000", |b| {
        b.iter(|| {
            let frozen = table.frozen_pane();
            let scroll = table.scroll_pane();
            black_box((frozen.rows.len(), scroll.rows.len()))
        })
    });
}

criterion_group!(benches, bench_load, bench_sort, bench_render);
criterion_main!(benches);
