//! Criterion benchmarks for the table and search hot paths.
//!
//! Benchmarks:
//! 1. Header-click sort over screener-sized result sets
//! 2. Rendering every cell of a sorted table
//! 3. Local article search over a full news load

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use alpha_core::model::screener::result_columns;
use alpha_core::model::{Article, ScreenerRow};
use alpha_core::search::filter_articles;
use alpha_core::TableModel;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_rows(n: usize) -> Vec<ScreenerRow> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            ScreenerRow {
                ticker: format!("T{i:04}"),
                name: format!("Company {}", n - i),
                price: Some(10.0 + (x * 0.37).sin().abs() * 400.0),
                pe_ratio: Some(5.0 + (x * 0.11).cos().abs() * 40.0),
                pb_ratio: Some((x * 0.05).sin() * 3.0),
                roe: Some((x * 0.21).cos() * 30.0),
                dividend_yield: if i % 3 == 0 { None } else { Some(x % 7.0) },
                market_cap: Some(1.0e9 + x * 3.3e8),
                change_52w: Some((x * 0.13).sin() * 60.0),
            }
        })
        .collect()
}

fn make_articles(n: usize) -> Vec<Article> {
    (0..n)
        .map(|i| Article {
            title: format!("Headline {i} about markets"),
            url: format!("https://news.test/{i}"),
            description: Some("Stocks moved on earnings and guidance".into()),
            source: Some(["Reuters", "CNBC", "Bloomberg"][i % 3].into()),
            tickers: vec![["NVDA", "AAPL", "MSFT", "AMD"][i % 4].into()],
            ..Default::default()
        })
        .collect()
}

// ── 1. Sort ──────────────────────────────────────────────────────────

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_sort");

    for n in [100usize, 1_000, 5_000] {
        let rows = make_rows(n);
        group.bench_with_input(BenchmarkId::new("numeric_toggle", n), &rows, |b, rows| {
            let mut table = TableModel::from_items(result_columns(), rows);
            b.iter(|| {
                table.click_header(black_box("market_cap"));
            });
        });
        group.bench_with_input(BenchmarkId::new("text", n), &rows, |b, rows| {
            let mut table = TableModel::from_items(result_columns(), rows);
            b.iter(|| {
                table.click_header(black_box("name"));
            });
        });
    }

    group.finish();
}

// ── 2. Render ────────────────────────────────────────────────────────

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_render");
    let mut table = TableModel::from_items(result_columns(), &make_rows(1_000));
    table.click_header("roe");

    group.bench_function("render_1000_rows", |b| {
        b.iter(|| black_box(table.rendered_rows()));
    });

    group.finish();
}

// ── 3. Search ────────────────────────────────────────────────────────

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");
    let articles = make_articles(500);

    group.bench_function("query_500_articles", |b| {
        b.iter(|| black_box(filter_articles(&articles, None, black_box("nvda"))));
    });
    group.bench_function("source_and_query_500_articles", |b| {
        b.iter(|| black_box(filter_articles(&articles, Some("CNBC"), black_box("earnings"))));
    });

    group.finish();
}

criterion_group!(benches, bench_sort, bench_render, bench_search);
criterion_main!(benches);
