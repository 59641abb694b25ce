//! Benchmarks for triad selection

use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ht_triad::normalize::{Sample, WindowedSeries};
use ht_triad::triad::{SelectionPolicy, TriadSelector};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn lane(start: DateTime<Utc>, count: usize, step_secs: i64, price: Decimal) -> Vec<Sample> {
    (0..count)
        .map(|i| Sample {
            timestamp: start + Duration::seconds(i as i64 * step_secs),
            price,
        })
        .collect()
}

fn dense_series() -> WindowedSeries {
    let start = Utc.with_ymd_and_hms(2019, 5, 9, 14, 55, 0).unwrap();
    WindowedSeries::from_parts(
        lane(start, 100, 3, dec!(2.5)),
        lane(start + Duration::seconds(1), 100, 3, dec!(3.4)),
        lane(start + Duration::seconds(2), 100, 3, dec!(3.1)),
    )
}

fn sparse_series() -> WindowedSeries {
    let start = Utc.with_ymd_and_hms(2019, 5, 9, 14, 55, 0).unwrap();
    // roles drift apart so most references have no synchronized partner
    WindowedSeries::from_parts(
        lane(start, 40, 7, dec!(2.5)),
        lane(start + Duration::seconds(90), 10, 29, dec!(3.4)),
        lane(start + Duration::seconds(170), 6, 41, dec!(3.1)),
    )
}

fn benchmark_select_dense(c: &mut Criterion) {
    let selector = TriadSelector::with_defaults();
    let series = dense_series();

    c.bench_function("select_dense_300", |b| {
        b.iter(|| selector.select(black_box(&series)))
    });
}

fn benchmark_select_sparse(c: &mut Criterion) {
    let selector = TriadSelector::with_defaults();
    let series = sparse_series();

    c.bench_function("select_sparse_56", |b| {
        b.iter(|| selector.select(black_box(&series)))
    });
}

fn benchmark_select_tightest(c: &mut Criterion) {
    let selector = TriadSelector::new(Duration::seconds(180), SelectionPolicy::TightestSync);
    let series = dense_series();

    c.bench_function("select_dense_tightest", |b| {
        b.iter(|| selector.select(black_box(&series)))
    });
}

criterion_group!(
    benches,
    benchmark_select_dense,
    benchmark_select_sparse,
    benchmark_select_tightest
);
criterion_main!(benches);
