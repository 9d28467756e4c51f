use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use iris_verifysort::{MemoryIndex, MemorySegment, Selector, SortVerifier, VerifyOptions};

fn build_index(count: u64) -> MemoryIndex {
    let years: Vec<Option<i64>> = (0..count as i64).map(Some).collect();
    let titles: Vec<Option<String>> = (0..count).map(|i| Some(format!("title_{i:010}"))).collect();
    let prices: Vec<Vec<i64>> = (0..count as i64).map(|i| vec![i, i + 1, i + 2]).collect();

    let mut builder = MemorySegment::builder("seg_0", count)
        .numeric("year", years)
        .dictionary("title", titles.clone())
        .bytes("key", titles)
        .multi_numeric("price", prices);
    // Every tenth document deleted.
    for doc_id in (0..count).step_by(10) {
        builder = builder.delete(doc_id);
    }
    MemoryIndex::single(builder.build().unwrap())
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sort Verification");
    group.sample_size(10);

    for count in [10_000u64, 100_000] {
        let index = build_index(count);
        group.throughput(Throughput::Elements(count));

        for field in ["year", "title", "key", "price"] {
            let verifier =
                SortVerifier::new(VerifyOptions::builder(field).selector(Selector::Max).build());
            group.bench_with_input(BenchmarkId::new(field, count), &index, |b, index| {
                b.iter(|| {
                    let outcome = verifier.verify(index);
                    assert!(outcome.is_pass());
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_verify);
criterion_main!(benches);
