//! Criterion benchmarks for nested_logger

use chrono::{Local, TimeZone};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use nested_logger::order_fields;
use nested_logger::prelude::*;
use std::io;
use std::sync::Arc;

fn sample_record() -> LogRecord {
    LogRecord::new(LogLevel::Warn, "  disk usage above threshold  ")
        .with_timestamp(Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap())
        .with_field("component", "scheduler")
        .with_field("category", "storage")
        .with_field("disk", "sda1")
        .with_field("usage", 93.5)
        .with_field("attempt", 3)
        .with_caller(Caller::new("src/jobs/cleanup.rs", 42, "jobs::cleanup::run"))
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let record = sample_record();

    let default = NestedFormatter::default();
    group.bench_function("nested_default", |b| {
        b.iter(|| black_box(default.format(black_box(&record))))
    });

    let standard = NestedFormatter::standard();
    group.bench_function("nested_standard", |b| {
        b.iter(|| black_box(standard.format(black_box(&record))))
    });

    let plain = NestedFormatter::new(
        FormatterConfig::new()
            .with_colors(false)
            .with_fields_space(false)
            .with_full_level(true),
    );
    group.bench_function("nested_plain", |b| {
        b.iter(|| black_box(plain.format(black_box(&record))))
    });

    let json = JsonFormatter::new();
    group.bench_function("json", |b| {
        b.iter(|| black_box(json.format(black_box(&record))))
    });

    group.finish();
}

fn bench_field_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_ordering");

    let fields: Fields = (0..32).map(|i| (format!("field_{:02}", i), i)).collect();
    let order: Vec<String> = vec!["field_31".into(), "field_07".into(), "missing".into()];

    group.bench_function("sorted", |b| {
        b.iter(|| black_box(order_fields(None, black_box(&fields))))
    });

    group.bench_function("with_order", |b| {
        b.iter(|| black_box(order_fields(Some(order.as_slice()), black_box(&fields))))
    });

    group.finish();
}

// ============================================================================
// Logger Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder()
        .level(LogLevel::Info)
        .output(io::sink())
        .formatter(NestedFormatter::standard())
        .report_caller(true)
        .build();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")))
    });

    group.bench_function("with_fields", |b| {
        b.iter(|| {
            logger
                .with_field("component", "api")
                .field("status", 200)
                .info(black_box("request served"))
        })
    });

    group.bench_function("filtered", |b| {
        b.iter(|| logger.debug(black_box("Filtered message")))
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_function(format!("{}_threads", threads), |b| {
            let logger = Arc::new(
                Logger::builder()
                    .output(io::sink())
                    .formatter(NestedFormatter::default())
                    .build(),
            );
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|t| {
                        let logger = Arc::clone(&logger);
                        std::thread::spawn(move || {
                            for i in 0..100 {
                                let _ = logger.with_field("thread", t as i64).info(format!("m{}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_formatters,
    bench_field_ordering,
    bench_logging,
    bench_concurrent_logging
);
criterion_main!(benches);
