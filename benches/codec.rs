use criterion::{black_box, criterion_group, criterion_main, Criterion};
use incjson::{binarize, json, parse, stringify, unbinarize, Value};

fn sample_document() -> Value {
    let users: Value = (0..100)
        .map(|i| {
            json!({
                "id": (i),
                "name": (format!("user-{i}")),
                "active": (i % 3 == 0),
                "score": (i as f64 * 0.75),
                "tags": ["alpha", "beta", "gamma"]
            })
        })
        .collect();
    json!({"users": (users), "total": 100, "cursor": null})
}

fn bench_parse(c: &mut Criterion) {
    let text = stringify(&sample_document());
    c.bench_function("parse_document", |b| {
        b.iter(|| parse(black_box(&text)).unwrap())
    });
}

fn bench_stringify(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("stringify_document", |b| {
        b.iter(|| stringify(black_box(&doc)))
    });
}

fn bench_binarize(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("binarize_document", |b| {
        b.iter(|| binarize(black_box(&doc)))
    });
}

fn bench_unbinarize(c: &mut Criterion) {
    let bytes = binarize(&sample_document());
    c.bench_function("unbinarize_document", |b| {
        b.iter(|| unbinarize(black_box(&bytes)).unwrap())
    });
}

fn bench_clone_and_lookup(c: &mut Criterion) {
    let doc = sample_document();
    c.bench_function("clone_document", |b| b.iter(|| black_box(&doc).clone()));
    c.bench_function("key_lookup", |b| {
        b.iter(|| black_box(&doc)["users"][50]["name"].get_string().len())
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_stringify,
    bench_binarize,
    bench_unbinarize,
    bench_clone_and_lookup
);
criterion_main!(benches);
