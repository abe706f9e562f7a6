//! Criterion benchmark untuk encoder dan decoder
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use jrb::core::{DynamicIndex, StaticDictionary};
use jrb::{decode, encode, Map, Value};

/// Dokumen dengan banyak key berulang: kasus terbaik untuk dictionary
fn sample_document(records: usize) -> Value {
    let items = (0..records)
        .map(|i| {
            let mut map = Map::new();
            map.insert("id".into(), Value::Number(i as f64));
            map.insert("name".into(), Value::String(format!("user-{}", i % 50)));
            map.insert("active".into(), Value::Bool(i % 3 == 0));
            map.insert("score".into(), Value::Number(i as f64 * 0.25));
            map.insert(
                "tags".into(),
                Value::Array(vec!["alpha".into(), "beta".into()]),
            );
            Value::Object(map)
        })
        .collect();
    Value::Array(items)
}

fn bench_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let dict = StaticDictionary::new(["id", "name", "active", "score", "tags"]).unwrap();

    for records in [10usize, 1000] {
        let value = sample_document(records);
        let bytes = encode(&value, Some(&dict)).unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("encode_{}", records), |b| {
            b.iter(|| encode(black_box(&value), Some(&dict)).unwrap());
        });

        group.bench_function(format!("decode_{}", records), |b| {
            b.iter(|| decode(black_box(&bytes), Some(&dict)).unwrap());
        });
    }

    group.finish();
}

fn bench_dictionary(c: &mut Criterion) {
    let mut group = c.benchmark_group("dictionary");
    group.throughput(Throughput::Elements(1));

    let words: Vec<String> = (0..512).map(|i| format!("word-{i}")).collect();

    // Insert dengan wraparound dan eviction
    group.bench_function("observe", |b| {
        let mut index = DynamicIndex::new();
        let mut i = 0usize;
        b.iter(|| {
            index.observe(black_box(&words[i & 511]));
            i = i.wrapping_add(1);
        });
    });

    group.bench_function("lookup", |b| {
        let mut index = DynamicIndex::new();
        for word in &words[..100] {
            index.observe(word);
        }
        let mut i = 0usize;
        b.iter(|| {
            black_box(index.lookup(black_box(&words[i % 200])));
            i = i.wrapping_add(1);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_encode_decode, bench_dictionary);
criterion_main!(benches);
