use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dashmap::DashMap;
use probemap_rs::{IntMap, ProbeMap};

fn benchmark_probemap_init_only(c: &mut Criterion) {
    c.bench_function("probemap_init_only", |b| {
        b.iter(|| {
            let map: ProbeMap<i32, i32> = black_box(ProbeMap::new());
            drop(map);
        })
    });
}

fn benchmark_intmap_init_only(c: &mut Criterion) {
    c.bench_function("intmap_init_only", |b| {
        b.iter(|| {
            let map: IntMap<i32> = black_box(IntMap::new());
            drop(map);
        })
    });
}

fn benchmark_dashmap_init_only(c: &mut Criterion) {
    c.bench_function("dashmap_init_only", |b| {
        b.iter(|| {
            let map: DashMap<i32, i32> = black_box(DashMap::new());
            drop(map);
        })
    });
}

fn benchmark_intmap_with_capacity_init(c: &mut Criterion) {
    c.bench_function("intmap_with_capacity_init", |b| {
        b.iter(|| {
            let map: IntMap<i32> = black_box(IntMap::with_capacity(100_000));
            drop(map);
        })
    });
}

fn benchmark_dashmap_with_capacity_init(c: &mut Criterion) {
    c.bench_function("dashmap_with_capacity_init", |b| {
        b.iter(|| {
            let map: DashMap<i32, i32> = black_box(DashMap::with_capacity(100_000));
            drop(map);
        })
    });
}

fn benchmark_intmap_drop_after_insert(c: &mut Criterion) {
    c.bench_function("intmap_drop_after_insert", |b| {
        b.iter(|| {
            let mut map: IntMap<String> = IntMap::new();
            for i in 0..1000 {
                map.set(i, i.to_string());
            }
            // owned values make the drop walk every slot
            drop(black_box(map));
        })
    });
}

fn benchmark_dashmap_drop_after_insert(c: &mut Criterion) {
    c.bench_function("dashmap_drop_after_insert", |b| {
        b.iter(|| {
            let map: DashMap<i32, String> = DashMap::new();
            for i in 0..1000 {
                map.insert(i, i.to_string());
            }
            drop(black_box(map));
        })
    });
}

fn benchmark_intmap_clear_and_reuse(c: &mut Criterion) {
    c.bench_function("intmap_clear_and_reuse", |b| {
        let mut map: IntMap<i32> = IntMap::with_capacity(256);
        b.iter(|| {
            for i in 0..100 {
                map.set(i, i * 2);
            }
            for i in 0..100 {
                black_box(map.try_get(&i));
            }
            map.clear();
        })
    });
}

criterion_group!(
    benches,
    benchmark_probemap_init_only,
    benchmark_intmap_init_only,
    benchmark_dashmap_init_only,
    benchmark_intmap_with_capacity_init,
    benchmark_dashmap_with_capacity_init,
    benchmark_intmap_drop_after_insert,
    benchmark_dashmap_drop_after_insert,
    benchmark_intmap_clear_and_reuse
);
criterion_main!(benches);
