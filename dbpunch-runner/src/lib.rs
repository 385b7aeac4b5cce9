//! Core driver for punching a backing store with concurrent writes.
//!
//! The [`run`] loop issues a fixed number of independent writes through a
//! [`Limiter`](limiter::Limiter) that caps how many are in flight at once.
//! Every write is timed and its [`Outcome`] recorded into a shared
//! [`Metrics`](metrics::Metrics) collector; once all writes have finished,
//! the collector is reduced into a [`RunReport`].
//!
//! The crate knows nothing about the backing store: it consumes a single
//! [`Writer`] capability and treats each write as an opaque, fallible
//! operation.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod limiter;
pub mod metrics;
pub mod runner;

pub use crate::metrics::{LatencySummary, Outcome, RunReport};
pub use crate::runner::{Writer, run};
