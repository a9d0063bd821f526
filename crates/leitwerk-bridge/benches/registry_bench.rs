// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for callback registration and dispatch in the
// leitwerk-bridge crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::json;

use leitwerk_bridge::registry::CallbackRegistry;

fn bench_register_remove(c: &mut Criterion) {
    let registry = CallbackRegistry::new();
    c.bench_function("register_persistent + remove", |b| {
        b.iter(|| {
            let id = registry.register_persistent(|payload| {
                black_box(payload);
            });
            registry.remove(black_box(id));
        });
    });
}

fn bench_persistent_dispatch(c: &mut Criterion) {
    let registry = CallbackRegistry::new();
    let id = registry.register_persistent(|payload| {
        black_box(payload);
    });
    let payload = json!({ "event": "bench", "windowLabel": "main", "id": 1, "payload": "x" });

    c.bench_function("persistent dispatch", |b| {
        b.iter(|| {
            registry.dispatch(black_box(id), payload.clone());
        });
    });
}

fn bench_fire_once_round_trip(c: &mut Criterion) {
    let registry = CallbackRegistry::new();
    c.bench_function("fire-once register + dispatch", |b| {
        b.iter(|| {
            let id = registry.register_once(|payload| {
                black_box(payload);
            });
            registry.dispatch(id, json!(null));
        });
    });
}

criterion_group!(
    benches,
    bench_register_remove,
    bench_persistent_dispatch,
    bench_fire_once_round_trip
);
criterion_main!(benches);
