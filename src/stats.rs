//! Per-client delivery counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals updated by every publish.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    batches: AtomicU64,
    acked: AtomicU64,
    dropped: AtomicU64,
    retried: AtomicU64,
    write_bytes: AtomicU64,
    write_errors: AtomicU64,
}

/// Point-in-time copy of [`DeliveryStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliverySnapshot {
    /// Batches handed to `publish`.
    pub batches: u64,
    /// Events delivered and acknowledged.
    pub acked: u64,
    /// Events acknowledged without delivery after a failure.
    pub dropped: u64,
    /// Events handed back for retry.
    pub retried: u64,
    /// Framed bytes accepted by the socket.
    pub write_bytes: u64,
    /// Failed writes or flushes.
    pub write_errors: u64,
}

impl DeliveryStats {
    pub fn new_batch(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn acked(&self, events: u64) {
        self.acked.fetch_add(events, Ordering::Relaxed);
    }

    pub fn dropped(&self, events: u64) {
        self.dropped.fetch_add(events, Ordering::Relaxed);
    }

    pub fn retried(&self, events: u64) {
        self.retried.fetch_add(events, Ordering::Relaxed);
    }

    pub fn write_bytes(&self, bytes: u64) {
        self.write_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DeliverySnapshot {
        DeliverySnapshot {
            batches: self.batches.load(Ordering::Relaxed),
            acked: self.acked.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
            write_bytes: self.write_bytes.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
        }
    }
}
