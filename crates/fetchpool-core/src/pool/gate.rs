//! Admission gate bounding how many jobs execute at once.
//!
//! A counting semaphore of capacity W. Holders get a [`GatePermit`] that gives
//! the slot back when dropped, so every exit path (success, failure,
//! cancellation, panic unwinding) releases it. The gate also counts current
//! holders and remembers the peak so callers can check the bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct Occupancy {
    holders: AtomicUsize,
    peak: AtomicUsize,
}

#[derive(Debug)]
pub struct AdmissionGate {
    capacity: usize,
    semaphore: Arc<Semaphore>,
    occupancy: Arc<Occupancy>,
}

/// One held admission slot; released on drop.
#[derive(Debug)]
pub struct GatePermit {
    occupancy: Arc<Occupancy>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        // Runs before `_permit` is dropped, so `holders` never exceeds the semaphore's count.
        self.occupancy.holders.fetch_sub(1, Ordering::AcqRel);
    }
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            occupancy: Arc::new(Occupancy::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently held.
    pub fn in_use(&self) -> usize {
        self.occupancy.holders.load(Ordering::Acquire)
    }

    /// Highest number of simultaneous holders seen so far.
    pub fn peak(&self) -> usize {
        self.occupancy.peak.load(Ordering::Acquire)
    }

    /// Waits for a free slot. Returns `None` if `ctx` is cancelled first.
    pub async fn acquire(&self, ctx: &CancellationToken) -> Option<GatePermit> {
        let permit = tokio::select! {
            biased;
            _ = ctx.cancelled() => return None,
            permit = Arc::clone(&self.semaphore).acquire_owned() => permit.ok()?,
        };
        let now = self.occupancy.holders.fetch_add(1, Ordering::AcqRel) + 1;
        self.occupancy.peak.fetch_max(now, Ordering::AcqRel);
        Some(GatePermit {
            occupancy: Arc::clone(&self.occupancy),
            _permit: permit,
        })
    }
}
