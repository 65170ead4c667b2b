use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_csf::{from_str, to_string, to_value, Codec, Record, SchemaTable};

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            let mut record = Record::sample();
            record.id = i as u64;
            record.is_active = i % 2 == 0;
            record.phone_numbers.truncate(i % 3);
            if i % 5 == 0 {
                record.roles.push("guest".to_string());
            }
            record
        })
        .collect()
}

fn benchmark_encode(c: &mut Criterion) {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);
    let value = to_value(&Record::sample()).unwrap();

    c.bench_function("encode_value", |b| b.iter(|| codec.encode(black_box(&value))));
}

fn benchmark_decode(c: &mut Criterion) {
    let schema = SchemaTable::standard();
    let codec = Codec::new(&schema);
    let csf = codec.encode(&to_value(&Record::sample()).unwrap()).unwrap();

    c.bench_function("decode_value", |b| b.iter(|| codec.decode(black_box(&csf))));
}

fn benchmark_typed(c: &mut Criterion) {
    let schema = SchemaTable::standard();
    let record = Record::sample();
    let csf = to_string(&record, &schema).unwrap();

    c.bench_function("to_string_record", |b| {
        b.iter(|| to_string(black_box(&record), &schema))
    });
    c.bench_function("from_str_record", |b| {
        b.iter(|| from_str::<Record>(black_box(&csf), &schema))
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let schema = SchemaTable::standard();
    let mut group = c.benchmark_group("encode_batch");

    for size in [10, 100, 1000].iter() {
        let batch = records(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &batch, |b, batch| {
            b.iter(|| {
                batch
                    .iter()
                    .map(|r| to_string(r, &schema))
                    .collect::<Result<Vec<_>, _>>()
            })
        });
    }
    group.finish();
}

fn benchmark_vs_json(c: &mut Criterion) {
    let schema = SchemaTable::standard();
    let record = Record::sample();
    let mut group = c.benchmark_group("format_comparison");

    group.bench_function("csf", |b| b.iter(|| to_string(black_box(&record), &schema)));
    group.bench_function("json", |b| {
        b.iter(|| serde_json::to_string(black_box(&record)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_decode,
    benchmark_typed,
    benchmark_batch,
    benchmark_vs_json
);
criterion_main!(benches);
