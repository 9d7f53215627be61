//! 响应信封解码性能基准测试

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use yamlstar::envelope::{decode_many, decode_one, Envelope};

fn nested_document(width: usize) -> Value {
    let users: Vec<Value> = (0..width)
        .map(|i| json!({"name": format!("user{}", i), "age": i, "tags": ["a", "b", "c"]}))
        .collect();
    json!({ "users": users })
}

fn bench_decode_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_one");

    let scalar = r#"{"data": "hello"}"#.to_string();
    group.bench_function("scalar", |b| {
        b.iter(|| black_box(decode_one::<Value>(black_box(&scalar)).unwrap()));
    });

    for width in [10, 100, 1000] {
        let response = json!({ "data": nested_document(width) }).to_string();
        group.bench_with_input(BenchmarkId::new("nested", width), &response, |b, response| {
            b.iter(|| black_box(decode_one::<Value>(black_box(response)).unwrap()));
        });
    }

    group.finish();
}

fn bench_decode_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_many");

    for count in [1, 10, 100] {
        let docs: Vec<Value> = (0..count).map(|_| nested_document(10)).collect();
        let response = json!({ "data": docs }).to_string();
        group.bench_with_input(BenchmarkId::new("documents", count), &response, |b, response| {
            b.iter(|| black_box(decode_many::<Value>(black_box(response)).unwrap()));
        });
    }

    group.finish();
}

fn bench_error_envelope(c: &mut Criterion) {
    let response = r#"{"error": {"cause": "found unexpected end of stream at line 1, column 15", "type": "ScannerException"}}"#;
    c.bench_function("parse_error_envelope", |b| {
        b.iter(|| black_box(Envelope::parse(black_box(response)).unwrap()));
    });
}

criterion_group!(benches, bench_decode_one, bench_decode_many, bench_error_envelope);
criterion_main!(benches);
