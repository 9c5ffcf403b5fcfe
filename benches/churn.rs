use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use probemap_rs::IntMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

// Random set/remove traffic over a small key space keeps the tables full of tombstones.
fn churn_keys(n: usize, key_space: i32) -> Vec<(bool, i32)> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n)
        .map(|_| (rng.gen_bool(0.5), rng.gen_range(0..key_space)))
        .collect()
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for key_space in [64, 1_024, 16_384] {
        let ops = churn_keys(100_000, key_space);

        group.bench_with_input(BenchmarkId::new("intmap", key_space), &ops, |b, ops| {
            b.iter(|| {
                let mut m: IntMap<i32> = IntMap::new();
                for &(insert, key) in ops {
                    if insert {
                        m.set(key, key);
                    } else {
                        m.remove(&key);
                    }
                }
                black_box((m.len(), m.capacity()))
            })
        });

        group.bench_with_input(BenchmarkId::new("hashmap", key_space), &ops, |b, ops| {
            b.iter(|| {
                let mut m: HashMap<i32, i32> = HashMap::new();
                for &(insert, key) in ops {
                    if insert {
                        m.insert(key, key);
                    } else {
                        m.remove(&key);
                    }
                }
                black_box((m.len(), m.capacity()))
            })
        });
    }
    group.finish();
}

fn bench_sliding_window(c: &mut Criterion) {
    c.bench_function("intmap_sliding_window", |b| {
        b.iter(|| {
            let mut m: IntMap<u32> = IntMap::new();
            for i in 0..100_000 {
                m.set(i, i as u32);
                if i >= 256 {
                    m.remove(&(i - 256));
                }
            }
            black_box(m.capacity())
        })
    });
}

criterion_group!(benches, bench_churn, bench_sliding_window);
criterion_main!(benches);
