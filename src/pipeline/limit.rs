//! Bounded-concurrency permit pool for transformer calls.
//!
//! Every page's refinement future is created up front, so without a cap a
//! 120-slide deck would open 120 simultaneous connections to the
//! transformer. The pool bounds in-flight calls to a fixed capacity;
//! acquisition suspends the calling task until a permit frees up.
//!
//! Built on [`tokio::sync::Semaphore`] with *owned* permits: the permit is
//! a value whose drop returns capacity to the pool, so release is
//! unconditional on every exit path — normal return, error propagation via
//! `?`, or future cancellation. No permit can leak across a failed
//! transformer call.

use crate::error::SlidemarkError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A counting permit pool with fixed capacity.
///
/// Cloneable; clones share the same pool.
#[derive(Clone)]
pub struct RefineLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One unit of refinement capacity. Returned to the pool on drop.
pub struct RefinePermit {
    _permit: OwnedSemaphorePermit,
}

impl RefineLimiter {
    /// Create a pool with `capacity` permits. Capacity 0 would deadlock the
    /// first acquire; config validation rejects it before we get here.
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Configured capacity of the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Acquire one permit, suspending until one is free.
    ///
    /// The semaphore is never closed, so failure here means a bug in the
    /// pool itself rather than contention; it is surfaced as
    /// [`SlidemarkError::Internal`] instead of panicking in library code.
    pub async fn acquire(&self) -> Result<RefinePermit, SlidemarkError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| SlidemarkError::Internal(format!("permit pool closed: {e}")))?;
        Ok(RefinePermit { _permit: permit })
    }
}
