//! Outcome accumulation and latency statistics.

use std::sync::Mutex;
use std::time::Duration;

/// The recorded result of one write execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The write succeeded.
    Success {
        /// Wall-clock duration measured around the write call.
        latency: Duration,
    },
    /// The write failed.
    Failure {
        /// Rendered error chain of the failed write.
        reason: String,
    },
}

/// Thread-safe collector of write outcomes.
///
/// Many in-flight executions record into the same collector. All mutation
/// happens under a single mutex, so no latency sample or failure increment
/// can be lost to a racing writer.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    latencies: Vec<Duration>,
    failed: u64,
}

impl Metrics {
    /// Records the outcome of one execution.
    pub fn record(&self, outcome: Outcome) {
        let mut inner = self.inner.lock().unwrap();
        match outcome {
            Outcome::Success { latency } => inner.latencies.push(latency),
            Outcome::Failure { .. } => inner.failed += 1,
        }
    }

    /// Computes the aggregate report over all recorded outcomes.
    ///
    /// Latency statistics are only present when at least one execution
    /// succeeded; a run with zero successes yields a report with
    /// `latency: None` instead of reducing an empty sequence.
    pub fn summary(&self) -> RunReport {
        let inner = self.inner.lock().unwrap();

        let mut latencies = inner.latencies.clone();
        latencies.sort_unstable();

        RunReport {
            attempted: latencies.len() as u64 + inner.failed,
            failed: inner.failed,
            latency: summarize(&latencies),
        }
    }
}

fn summarize(sorted: &[Duration]) -> Option<LatencySummary> {
    let (&minimum, &maximum) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return None,
    };

    let total: Duration = sorted.iter().sum();
    let average = total / sorted.len() as u32;

    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    };

    Some(LatencySummary {
        average,
        minimum,
        maximum,
        median,
    })
}

/// Aggregate view over all outcomes of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// Number of executions attempted.
    pub attempted: u64,
    /// Number of executions that failed.
    pub failed: u64,
    /// Latency statistics over the successful executions, when any exist.
    pub latency: Option<LatencySummary>,
}

/// Latency reductions over the successful executions of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatencySummary {
    /// Mean latency.
    pub average: Duration,
    /// Fastest write.
    pub minimum: Duration,
    /// Slowest write.
    pub maximum: Duration,
    /// Median latency; the mean of the two middle samples for even counts.
    pub median: Duration,
}
