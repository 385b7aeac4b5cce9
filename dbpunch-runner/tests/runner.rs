//! Stress and property tests for the dispatch loop.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dbpunch_runner::{Writer, run};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

fn limit(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

/// Counts calls and tracks the in-flight high-water mark, jittering each
/// write's duration so completions interleave with admissions.
#[derive(Default)]
struct InstrumentedWriter {
    calls: AtomicU64,
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

#[async_trait]
impl Writer for InstrumentedWriter {
    async fn write(&self, index: u64) -> anyhow::Result<()> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(current, Ordering::SeqCst);

        let jitter = SmallRng::seed_from_u64(index).random_range(0..4);
        tokio::time::sleep(Duration::from_millis(jitter)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Completes immediately, counting calls.
#[derive(Default)]
struct NoopWriter {
    calls: AtomicU64,
}

#[async_trait]
impl Writer for NoopWriter {
    async fn write(&self, _index: u64) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fails every write whose index is divisible by three.
#[derive(Default)]
struct FlakyWriter {
    calls: AtomicU64,
}

#[async_trait]
impl Writer for FlakyWriter {
    async fn write(&self, index: u64) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if index % 3 == 0 {
            anyhow::bail!("simulated write failure on record {index}");
        }
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_never_exceeds_the_budget() {
    for max_concurrent in [1, 2, 3, 8, 32] {
        let writer = Arc::new(InstrumentedWriter::default());
        let report = run(Arc::clone(&writer), 300, limit(max_concurrent)).await;

        assert_eq!(report.attempted, 300);
        assert_eq!(report.failed, 0);
        assert_eq!(writer.calls.load(Ordering::SeqCst), 300);
        assert!(
            writer.high_water.load(Ordering::SeqCst) <= max_concurrent,
            "high water {} exceeded budget {max_concurrent}",
            writer.high_water.load(Ordering::SeqCst),
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn all_outcomes_are_recorded() {
    for max_concurrent in [1, 7, 64, 2_000] {
        let writer = Arc::new(NoopWriter::default());
        let report = run(Arc::clone(&writer), 2_000, limit(max_concurrent)).await;

        assert_eq!(report.attempted, 2_000);
        assert_eq!(report.failed, 0);
        assert_eq!(writer.calls.load(Ordering::SeqCst), 2_000);
        assert!(report.latency.is_some());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failures_do_not_abort_the_run() {
    let writer = Arc::new(FlakyWriter::default());
    let report = run(Arc::clone(&writer), 100, limit(4)).await;

    // Indices 0, 3, ..., 99 fail; the other 66 still complete.
    assert_eq!(report.attempted, 100);
    assert_eq!(report.failed, 34);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 100);
    assert!(report.latency.is_some());
}

#[tokio::test]
async fn all_failures_yield_no_latency_data() {
    struct BrokenWriter;

    #[async_trait]
    impl Writer for BrokenWriter {
        async fn write(&self, _index: u64) -> anyhow::Result<()> {
            anyhow::bail!("backend unavailable");
        }
    }

    let report = run(Arc::new(BrokenWriter), 50, limit(8)).await;

    assert_eq!(report.attempted, 50);
    assert_eq!(report.failed, 50);
    assert_eq!(report.latency, None);
}

#[tokio::test]
async fn zero_records_completes_immediately() {
    let writer = Arc::new(NoopWriter::default());
    let report = run(Arc::clone(&writer), 0, limit(4)).await;

    assert_eq!(report.attempted, 0);
    assert_eq!(report.failed, 0);
    assert_eq!(report.latency, None);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fewer_records_than_progress_boundaries() {
    // Progress reporting is a no-op below 100 records and must not divide
    // by zero.
    let writer = Arc::new(NoopWriter::default());
    let report = run(Arc::clone(&writer), 37, limit(5)).await;

    assert_eq!(report.attempted, 37);
    assert_eq!(writer.calls.load(Ordering::SeqCst), 37);
}
