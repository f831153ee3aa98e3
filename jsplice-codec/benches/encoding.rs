use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsplice_codec::{binary_to_json, binary_validate, json_to_binary};
use serde_json::json;

fn create_test_document(records: usize) -> String {
    let entries: Vec<_> = (0..records)
        .map(|i| {
            json!({
                "id": i,
                "user": format!("user{}", i % 100),
                "score": (i as f64) * 0.25,
                "tags": ["alpha", "beta", "gamma"],
                "active": i % 2 == 0,
            })
        })
        .collect();

    json!({ "records": entries }).to_string()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_to_binary");

    for records in [10, 100, 1000] {
        let document = create_test_document(records);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rec", records)),
            &document,
            |b, document| {
                b.iter(|| json_to_binary(black_box(document)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("binary_to_json");

    for records in [10, 100, 1000] {
        let binary = json_to_binary(&create_test_document(records)).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}rec", records)),
            &binary,
            |b, binary| {
                b.iter(|| binary_to_json(black_box(binary)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let binary = json_to_binary(&create_test_document(1000)).unwrap();

    c.bench_function("binary_validate/1000rec", |b| {
        b.iter(|| binary_validate(black_box(&binary)).unwrap());
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_validate);
criterion_main!(benches);
