use criterion::{criterion_group, criterion_main, Criterion};
use yesno::hash::hash64;

fn key_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("key hash");

    for len in [4, 8, 16, 64, 256] {
        let key = "a".repeat(len);

        group.bench_function(format!("xxh3 {len}B"), |b| {
            b.iter(|| hash64(key.as_bytes()));
        });
    }
}

criterion_group!(benches, key_hash);
criterion_main!(benches);
