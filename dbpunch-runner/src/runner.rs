//! The dispatch loop driving a fixed number of writes through the limiter.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::limiter::Limiter;
use crate::metrics::{Metrics, Outcome, RunReport};

/// One write against the backing store.
///
/// The runner measures wall-clock latency around [`write`](Self::write)
/// itself; implementations only report success or failure.
#[async_trait]
pub trait Writer: Send + Sync + 'static {
    /// Performs the write for the given unit index.
    async fn write(&self, index: u64) -> anyhow::Result<()>;
}

/// Drives `records` independent writes to completion, with at most
/// `max_concurrent` in flight at any instant.
///
/// Every write gets exactly one attempt. A failed write is logged and
/// recorded as a failure, but never aborts the run or the other in-flight
/// writes. The function returns only once all `records` outcomes have been
/// recorded.
pub async fn run<W>(writer: Arc<W>, records: u64, max_concurrent: NonZeroUsize) -> RunReport
where
    W: Writer,
{
    let metrics = Arc::new(Metrics::default());
    if records == 0 {
        return metrics.summary();
    }

    // One log line per percent of progress; meaningless below 100 records.
    let progress_step = (records >= 100).then(|| records / 100);

    let limiter = Limiter::new(max_concurrent);
    for index in 0..records {
        let permit = limiter.acquire().await;

        if let Some(step) = progress_step {
            if index % step == 0 {
                tracing::info!("progress: {}%", index / step);
            }
        }

        let writer = Arc::clone(&writer);
        let metrics = Arc::clone(&metrics);
        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = match writer.write(index).await {
                Ok(()) => Outcome::Success {
                    latency: started.elapsed(),
                },
                Err(err) => {
                    let reason = format!("{err:#}");
                    tracing::warn!(index, error = %reason, "write failed");
                    Outcome::Failure { reason }
                }
            };

            // The outcome must be recorded before the permit is returned:
            // `wait_all` resolves on the last returned permit.
            metrics.record(outcome);
            drop(permit);
        });
    }

    limiter.wait_all().await;
    metrics.summary()
}
