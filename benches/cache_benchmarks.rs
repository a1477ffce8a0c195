// Simple benchmarks using criterion instead of unstable test feature
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use freqcache::CacheEngine;

const CACHE_SIZE: usize = 1_000;
const NUM_OPERATIONS: usize = 10_000;

fn bench_create_fresh_keys(c: &mut Criterion) {
    c.bench_function("create_fresh_keys", |b| {
        b.iter(|| {
            let cache: CacheEngine<usize> = CacheEngine::with_capacity(CACHE_SIZE).unwrap();
            for i in 0..NUM_OPERATIONS {
                cache.create(format!("key{i}"), i, None);
            }
            black_box(cache.len());
        });
    });
}

fn bench_create_at_steady_state_capacity(c: &mut Criterion) {
    let cache: CacheEngine<usize> = CacheEngine::with_capacity(CACHE_SIZE).unwrap();
    for i in 0..CACHE_SIZE {
        cache.create(format!("key{i}"), i, None);
    }

    c.bench_function("create_under_eviction_pressure", |b| {
        let mut i = CACHE_SIZE;
        b.iter(|| {
            cache.create(format!("key{i}"), i, None);
            i += 1;
            black_box(cache.len());
        });
    });
}

fn bench_read_hit(c: &mut Criterion) {
    let cache: CacheEngine<usize> = CacheEngine::with_capacity(CACHE_SIZE).unwrap();
    for i in 0..CACHE_SIZE {
        cache.create(format!("key{i}"), i, None);
    }

    c.bench_function("read_hit", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let key = format!("key{}", i % CACHE_SIZE);
            i += 1;
            black_box(cache.read(&key));
        });
    });
}

fn bench_read_miss(c: &mut Criterion) {
    let cache: CacheEngine<usize> = CacheEngine::with_capacity(CACHE_SIZE).unwrap();

    c.bench_function("read_miss", |b| {
        b.iter(|| {
            black_box(cache.read("absent-key"));
        });
    });
}

fn bench_update_hot_key(c: &mut Criterion) {
    let cache: CacheEngine<usize> = CacheEngine::with_capacity(CACHE_SIZE).unwrap();
    cache.create("hotkey", 0, None);

    c.bench_function("update_hot_key", |b| {
        let mut i = 0usize;
        b.iter(|| {
            cache.update("hotkey", i, None);
            i += 1;
        });
    });
}

fn bench_create_read_delete_cycle(c: &mut Criterion) {
    let cache: CacheEngine<usize> = CacheEngine::with_capacity(CACHE_SIZE).unwrap();

    c.bench_function("create_read_delete_cycle", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let key = format!("cycle{i}");
            cache.create(key.clone(), i, None);
            black_box(cache.read(&key));
            cache.delete(&key);
            i += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_create_fresh_keys,
    bench_create_at_steady_state_capacity,
    bench_read_hit,
    bench_read_miss,
    bench_update_hot_key,
    bench_create_read_delete_cycle,
);
criterion_main!(benches);
