//! Admission gate bounding how many transfers run at once.

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Returned by [`ConcurrencyGate::admit`] once the gate has been closed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("concurrency gate closed")]
pub struct GateClosed;

/// Shared counting gate. Waiters are admitted in FIFO order.
#[derive(Debug)]
pub struct ConcurrencyGate {
    capacity: usize,
    slots: Semaphore,
    admitted: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGate {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            slots: Semaphore::new(capacity),
            admitted: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Waits for a free slot. The slot is released when the permit drops.
    pub async fn admit(&self) -> Result<GatePermit<'_>, GateClosed> {
        let permit = self.slots.acquire().await.map_err(|_| GateClosed)?;
        let now = self.admitted.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(now, Ordering::AcqRel);
        Ok(GatePermit {
            gate: self,
            _permit: permit,
        })
    }

    /// Stops admitting: current and future waiters get [`GateClosed`].
    /// Holders of a permit are unaffected.
    pub fn close(&self) {
        self.slots.close();
    }

    pub fn is_closed(&self) -> bool {
        self.slots.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Transfers currently holding a slot.
    pub fn admitted(&self) -> usize {
        self.admitted.load(Ordering::Acquire)
    }

    /// Highest number of simultaneously admitted transfers seen so far.
    pub fn peak_admitted(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }
}

/// A held slot in a [`ConcurrencyGate`].
pub struct GatePermit<'a> {
    gate: &'a ConcurrencyGate,
    _permit: SemaphorePermit<'a>,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        // Runs before the semaphore permit field is dropped, so the count
        // never lags behind a newly admitted holder.
        self.gate.admitted.fetch_sub(1, Ordering::AcqRel);
    }
}
