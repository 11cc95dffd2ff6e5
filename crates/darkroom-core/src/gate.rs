//! Admission control for pipeline runs.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds how many pipeline runs execute at once.
///
/// Waiters are served in arrival order, so a slow run cannot starve the
/// requests queued behind it, only delay them. The default capacity is one:
/// image work is memory-hungry and the safe baseline is full serialization.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Create a gate admitting at most `capacity` concurrent runs.
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of runs that could be admitted right now without waiting.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a slot. The returned permit releases the slot on drop.
    pub async fn admit(&self) -> AdmissionPermit {
        // The semaphore is never closed, so acquire cannot fail
        match self.semaphore.clone().acquire_owned().await {
            Ok(permit) => AdmissionPermit { _permit: permit },
            Err(_) => unreachable!("admission semaphore closed"),
        }
    }
}

/// A held admission slot. Dropping it admits the next waiter.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}
