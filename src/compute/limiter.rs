//! Concurrency Limiter
//!
//! Counting admission gate in front of the compute workers.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::ComputeError;

// == Concurrency Limiter ==
/// Caps the number of predictions in flight.
///
/// Waiters are served in FIFO order. A permit is an RAII guard and goes back
/// to the pool when dropped, on every exit path. A waiter cancelled before it
/// acquires holds nothing.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    permits: usize,
}

/// One unit of admission, released on drop.
#[derive(Debug)]
pub struct ComputePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    pub fn new(permits: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(permits)),
            permits,
        }
    }

    /// Waits until a permit is free.
    pub async fn acquire(&self) -> Result<ComputePermit, ComputeError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| ComputeError::Worker(e.to_string()))?;
        Ok(ComputePermit { _permit: permit })
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Total permit count.
    pub fn capacity(&self) -> usize {
        self.permits
    }
}
