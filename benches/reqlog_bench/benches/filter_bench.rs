//! Request filtering benchmarks
//!
//! Measures building a record from an `http::Request` and cutting it down
//! to the allow-list.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use http::Request;
use reqlog_core::{
    default_request_filter, filter_request, filter_request_with, AllowList, RequestFields,
    RequestRecord,
};
use serde_json::json;

fn request_with_headers(count: usize) -> Request<()> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/orders?page=2&sort=desc&tag=a&tag=b")
        .header("host", "api.example.com:8443")
        .header("content-type", "application/json");

    for i in 0..count {
        builder = builder.header(format!("x-custom-header-{}", i), format!("value-{}", i));
    }

    let mut req = builder.body(()).unwrap();
    req.extensions_mut().insert(
        RequestFields::new().with("body", json!({"items": [1, 2, 3], "note": "leave at door"})),
    );
    req
}

/// Benchmark record construction
fn bench_record_from_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_from_request");

    for header_count in [0, 5, 20].iter() {
        let req = request_with_headers(*header_count);
        group.bench_with_input(
            BenchmarkId::new("headers", header_count),
            &req,
            |b, req| b.iter(|| RequestRecord::from_request(black_box(req))),
        );
    }

    group.finish();
}

/// Benchmark the allow-list filter
fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_request");
    let record = RequestRecord::from_request(&request_with_headers(5));

    group.bench_function("default_allow_list", |b| {
        b.iter(|| filter_request(black_box(&record), default_request_filter))
    });

    let wide = AllowList::default().with("hostname").with("path").with("body");
    group.bench_function("wide_allow_list", |b| {
        b.iter(|| filter_request_with(black_box(&record), &wide, default_request_filter))
    });

    let redact = AllowList::default();
    group.bench_function("redacting_selector", |b| {
        b.iter(|| {
            filter_request_with(black_box(&record), &redact, |record: &RequestRecord, field: &str| {
                match field {
                    "headers" => Some(json!("[redacted]")),
                    _ => record.get(field).cloned(),
                }
            })
        })
    });

    group.finish();
}

criterion_group!(benches, bench_record_from_request, bench_filter);
criterion_main!(benches);
