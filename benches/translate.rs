//! Performance benchmarks for a3s-nav
//!
//! Run with: cargo bench

use a3s_nav::routing::{RawRoute, RawStep};
use a3s_nav::translator::{format_distance, translate};
use a3s_nav::{
    Coordinate, FixedEngine, MemorySessionStore, MemoryUserStore, RouteOrchestrator, RouteRequest,
    UserRecord,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn long_route(steps: usize) -> RawRoute {
    let modifiers = ["left", "right", "slight left", "slight right", "uturn", "straight"];
    let mut raw_steps =
        vec![RawStep::new("depart", Coordinate::new(37.5665, 126.978)).with_name("세종대로")];
    for i in 0..steps {
        let kind = if i % 3 == 0 { "new name" } else { "turn" };
        raw_steps.push(
            RawStep::new(kind, Coordinate::new(37.5665, 126.978))
                .with_modifier(modifiers[i % modifiers.len()])
                .with_name(if i % 2 == 0 { "종로" } else { "" })
                .with_distance((i * 137 % 2400) as f64),
        );
    }
    raw_steps.push(RawStep::new("arrive", Coordinate::new(37.57, 126.98)));

    RawRoute {
        distance: 12_345.0,
        duration: 9_000.0,
        steps: raw_steps,
    }
}

fn bench_format_distance(c: &mut Criterion) {
    c.bench_function("format_distance", |b| {
        b.iter(|| {
            for m in [45u32, 532, 999, 1500, 12_345] {
                criterion::black_box(format_distance(m));
            }
        });
    });
}

fn bench_translate(c: &mut Criterion) {
    let short = long_route(10);
    let long = long_route(200);

    c.bench_function("translate 12 steps", |b| {
        b.iter(|| translate(criterion::black_box(&short)));
    });

    c.bench_function("translate 202 steps", |b| {
        b.iter(|| translate(criterion::black_box(&long)));
    });
}

fn bench_calculate_route(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let user = uuid::Uuid::new_v4();
    let users = MemoryUserStore::new();
    rt.block_on(users.insert(UserRecord::new(user)));

    let nav = RouteOrchestrator::new(
        FixedEngine::new(long_route(20)),
        Arc::new(users),
        Arc::new(MemorySessionStore::new()),
    );
    let request = RouteRequest::new(Coordinate::new(37.5665, 126.978), Coordinate::new(37.57, 126.98));

    let nav = &nav;
    let request = &request;
    c.bench_function("calculate_route (memory + fixed)", |b| {
        b.to_async(&rt)
            .iter(|| async move { nav.calculate_route(user, request.clone()).await.unwrap() });
    });
}

criterion_group!(benches, bench_format_distance, bench_translate, bench_calculate_route);
criterion_main!(benches);
