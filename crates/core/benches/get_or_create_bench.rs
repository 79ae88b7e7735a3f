//! Cleaner lifecycle benchmarks
//!
//! Measures the cached get-or-create path mutators hit on every request and
//! a full create/shutdown/reset epoch.
//!
//! Run with: `cargo bench --bench get_or_create_bench -p finalizer-core
//! --features test-utils`

use std::sync::atomic::{AtomicU32, Ordering};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finalizer_core::{CleanerResult, CleanerWorkerManager, CleanerWorkerPort, ThreadStateGuard};
use finalizer_domain::WorkerId;

#[derive(Default)]
struct CountingPort {
    created: AtomicU32,
}

impl CleanerWorkerPort for CountingPort {
    fn create_worker(&self) -> CleanerResult<WorkerId> {
        Ok(WorkerId::new(self.created.fetch_add(1, Ordering::Relaxed) + 1)?)
    }

    fn shutdown_worker(&self, _id: WorkerId, _drain: bool) -> CleanerResult<()> {
        Ok(())
    }
}

fn bench_cached_get(c: &mut Criterion) {
    let _native = ThreadStateGuard::native();
    let manager = CleanerWorkerManager::new(CountingPort::default());
    let _ = manager.get_or_create_worker();

    c.bench_function("cleaner_get_cached", |b| {
        b.iter(|| black_box(manager.get_or_create_worker()));
    });
}

fn bench_epoch(c: &mut Criterion) {
    let _native = ThreadStateGuard::native();
    let manager = CleanerWorkerManager::new(CountingPort::default());

    c.bench_function("cleaner_create_shutdown_reset", |b| {
        b.iter(|| {
            let _ = black_box(manager.get_or_create_worker());
            let _ = black_box(manager.shutdown_worker(true));
            manager.reset_for_tests();
        });
    });
}

criterion_group!(benches, bench_cached_get, bench_epoch);
criterion_main!(benches);
