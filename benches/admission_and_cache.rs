use adgate_cache::TwoTierCache;
use adgate_core::{MemoryStore, Tier};
use adgate_quota::QuotaGovernor;
use adgate_scheduler::compute_priority;
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;

fn bench_can_run_gold(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let governor = runtime.block_on(async {
        let governor = QuotaGovernor::builder(Arc::new(MemoryStore::new())).build();
        governor.reset_global(1_000_000).await;
        governor.set_client_quota("acme", 500_000).await;
        governor
    });

    c.bench_function("can_run_gold_granted", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(governor.can_run("acme", 10, Tier::Gold).await) });
    });
}

fn bench_can_run_bronze_inside_reserve(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let governor = runtime.block_on(async {
        let governor = QuotaGovernor::builder(Arc::new(MemoryStore::new())).build();
        governor.reset_global(1_000_000).await;
        governor.set_client_quota("acme", 500_000).await;
        governor.charge("acme", 900_000).await;
        governor
    });

    c.bench_function("can_run_bronze_reserve_path", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(governor.can_run("acme", 10, Tier::Bronze).await) });
    });
}

fn bench_charge(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let governor = runtime.block_on(async {
        let governor = QuotaGovernor::builder(Arc::new(MemoryStore::new())).build();
        governor.reset_global(i64::MAX).await;
        governor.set_client_quota("acme", i64::MAX).await;
        governor
    });

    c.bench_function("charge_single_tenant", |b| {
        b.to_async(&runtime)
            .iter(|| async { governor.charge(black_box("acme"), black_box(10)).await });
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = runtime.block_on(async {
        let cache = TwoTierCache::builder(Arc::new(MemoryStore::new())).build();
        cache
            .set("acme", "campaign", &[("id", "1")], "campaign", &json!({"name": "spring"}))
            .await;
        cache
    });

    c.bench_function("cache_local_tier_hit", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(cache.get("acme", "campaign", &[("id", "1")]).await) });
    });
}

fn bench_cache_miss(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = TwoTierCache::builder(Arc::new(MemoryStore::new())).build();

    c.bench_function("cache_miss", |b| {
        b.to_async(&runtime)
            .iter(|| async { black_box(cache.get("acme", "campaign", &[("id", "absent")]).await) });
    });
}

fn bench_compute_priority(c: &mut Criterion) {
    c.bench_function("compute_priority_bronze", |b| {
        b.iter(|| black_box(compute_priority(black_box(50), black_box(Tier::Bronze))));
    });
}

criterion_group!(
    benches,
    bench_can_run_gold,
    bench_can_run_bronze_inside_reserve,
    bench_charge,
    bench_cache_hit,
    bench_cache_miss,
    bench_compute_priority,
);
criterion_main!(benches);
