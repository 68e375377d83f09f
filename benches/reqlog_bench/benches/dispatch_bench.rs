//! Dispatch benchmarks
//!
//! Measures the per-request cost of the logging layer fanning an entry out
//! to in-memory transports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Request;
use reqlog_core::{error_logger, logger, LoggerOptions, RequestRecord};
use reqlog_transports::{LogFormat, LogFormatter, MemoryTransport};

fn request() -> Request<()> {
    Request::builder()
        .method("GET")
        .uri("/api/v1/users/42?fields=name,email")
        .header("host", "api.example.com")
        .header("accept", "application/json")
        .header("user-agent", "reqlog-bench/1.0")
        .body(())
        .unwrap()
}

/// Benchmark request logging with a growing number of transports
fn bench_request_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_logging");
    let req = request();

    for transport_count in [1, 3, 5].iter() {
        let mut options = LoggerOptions::new();
        for _ in 0..*transport_count {
            options = options.transport(MemoryTransport::bounded(1024));
        }
        let layer = logger(options).unwrap();

        group.bench_with_input(
            BenchmarkId::new("transports", transport_count),
            &req,
            |b, req| b.iter(|| layer.log_request(black_box(req))),
        );
    }

    group.finish();
}

/// Benchmark error reporting
fn bench_error_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("error_logging");
    let layer = error_logger(LoggerOptions::new().transport(MemoryTransport::bounded(1024))).unwrap();
    let record = RequestRecord::from_request(&request());

    group.bench_function("single_transport", |b| {
        b.iter(|| layer.log(black_box("upstream timed out"), black_box(&record)))
    });

    group.finish();
}

/// Benchmark line formatting
fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    let memory = MemoryTransport::new();
    logger(LoggerOptions::new().transport(memory.clone()))
        .unwrap()
        .log_request(&request());
    let entry = memory.last().unwrap();

    for format in [LogFormat::Json, LogFormat::Simple, LogFormat::Logfmt] {
        let formatter = format.formatter();
        group.bench_function(format.as_str(), |b| {
            b.iter(|| formatter.format(black_box(&entry)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_request_logging,
    bench_error_logging,
    bench_formatting
);
criterion_main!(benches);
