//! Admission control for concurrent write executions.
//!
//! [`Limiter`] caps the number of writes in flight using a tokio semaphore.
//! Each acquired [`Permit`] returns its slot on drop and notifies waiters,
//! allowing [`Limiter::wait_all`] to resolve once every admitted execution
//! has finished.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

/// Bounds how many write executions run concurrently.
///
/// Slots are acquired with [`acquire`](Self::acquire) and returned
/// automatically when the [`Permit`] is dropped, on every exit path of the
/// admitted work.
#[derive(Clone, Debug)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    max: usize,
    released: Arc<Notify>,
}

impl Limiter {
    /// Creates a limiter admitting at most `max` concurrent executions.
    pub fn new(max: NonZeroUsize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max.get())),
            max: max.get(),
            released: Arc::new(Notify::new()),
        }
    }

    /// Waits until a slot is free, then admits the caller.
    pub async fn acquire(&self) -> Permit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("limiter semaphore is never closed");

        Permit {
            permit: Some(permit),
            released: Arc::clone(&self.released),
        }
    }

    /// Returns the number of slots currently admitted.
    pub fn used_permits(&self) -> usize {
        self.max - self.semaphore.available_permits()
    }

    /// Waits until all admitted executions have returned their slots.
    ///
    /// Interest in the release notification is registered before the count
    /// is checked, so a release between the check and the wait cannot be
    /// missed.
    pub async fn wait_all(&self) {
        loop {
            let notified = self.released.notified();
            if self.used_permits() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// RAII guard for one admitted execution.
///
/// Dropping the permit frees its slot and notifies any task waiting in
/// [`Limiter::wait_all`].
#[derive(Debug)]
pub struct Permit {
    permit: Option<OwnedSemaphorePermit>,
    released: Arc<Notify>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        drop(self.permit.take());
        self.released.notify_waiters();
    }
}
