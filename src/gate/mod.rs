//! Admission Control Module
//!
//! Bounds the number of requests executing at once. Excess requests are
//! rejected immediately; nothing is queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

// == Admission Gate ==
/// Counting admission controller.
///
/// Each successful `try_acquire` hands out an `AdmissionPermit` holding one
/// in-flight slot. The slot is returned when the permit is dropped, so every exit
/// path of the guarded work (early return, `?`, panic unwind) releases it.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    slots: Arc<Semaphore>,
    limit: usize,
    rejected: Arc<AtomicU64>,
}

/// One admitted request. Releases its slot on drop.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

/// Point-in-time view of the gate.
#[derive(Debug, Clone, Serialize)]
pub struct GateStats {
    pub limit: usize,
    pub in_flight: usize,
    pub rejected: u64,
}

impl AdmissionGate {
    // == Constructor ==
    /// Creates a gate admitting at most `limit` concurrent requests, clamped to
    /// `1..=Semaphore::MAX_PERMITS`.
    pub fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            slots: Arc::new(Semaphore::new(limit)),
            limit,
            rejected: Arc::new(AtomicU64::new(0)),
        }
    }

    // == Try Acquire ==
    /// Claims a slot without waiting. Returns `None` when all slots are taken.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        match self.slots.clone().try_acquire_owned() {
            Ok(permit) => Some(AdmissionPermit { _permit: permit }),
            Err(_) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(limit = self.limit, "admission rejected");
                None
            }
        }
    }

    /// Number of requests currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.limit - self.slots.available_permits()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Total number of rejected acquisition attempts.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> GateStats {
        GateStats {
            limit: self.limit,
            in_flight: self.in_flight(),
            rejected: self.rejected(),
        }
    }
}
