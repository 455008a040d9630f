//! Benchmarks for ring membership changes and key lookup.

use corelib::{HashAlgorithm, HashRing, Member};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_ring(algorithm: HashAlgorithm, members: usize, weight: i64) -> HashRing {
    let ring = HashRing::builder().hash_algorithm(algorithm).build();
    for i in 0..members {
        let member = Member::new(format!("machine{i}"), format!("10.0.0.{i}:8080"));
        ring.add(member.with_weight(weight));
    }
    ring
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(1));

    for algorithm in HashAlgorithm::ALL {
        let ring = bench_ring(algorithm, 16, 256);
        let keys: Vec<String> = (0..1024).map(|i| format!("my_test_key_{i}")).collect();

        group.bench_with_input(BenchmarkId::from_parameter(algorithm), &keys, |b, keys| {
            let mut i = 0;
            b.iter(|| {
                i = (i + 1) % keys.len();
                black_box(ring.lookup(&keys[i]).unwrap());
            });
        });
    }
    group.finish();
}

fn bench_add_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_remove");

    for weight in [16i64, 256, 1024] {
        let ring = bench_ring(HashAlgorithm::Crc32, 16, 256);
        group.throughput(Throughput::Elements(weight as u64));
        group.bench_with_input(BenchmarkId::from_parameter(weight), &weight, |b, &weight| {
            b.iter(|| {
                ring.add(Member::new("churn", "10.0.1.1:8080").with_weight(weight));
                ring.remove("churn");
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_add_remove);
criterion_main!(benches);
