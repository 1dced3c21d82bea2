//! Metrics registry
//!
//! - Counters only, monotonic, reset only on process start
//! - Atomic increments, `Relaxed` ordering; exactness per counter, not across counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the slot accounting service
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Slot rows created (committed)
    slots_created: AtomicU64,
    /// Slot requirement updates committed
    slots_updated: AtomicU64,
    /// Slot rows deleted (row count 1)
    slots_deleted: AtomicU64,
    /// Requests rejected for foreign-key or duplicate-pair conflicts
    conflicts: AtomicU64,
    /// Update/delete targeting a missing slot
    not_found: AtomicU64,
    /// Requests rejected by validation before any store call
    validation_rejections: AtomicU64,
    /// Unclassified store failures
    transaction_failures: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_slots_created(&self) {
        self.slots_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_slots_updated(&self) {
        self.slots_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_slots_deleted(&self) {
        self.slots_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_validation_rejections(&self) {
        self.validation_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_transaction_failures(&self) {
        self.transaction_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            slots_created: self.slots_created.load(Ordering::Relaxed),
            slots_updated: self.slots_updated.load(Ordering::Relaxed),
            slots_deleted: self.slots_deleted.load(Ordering::Relaxed),
            conflicts: self.conflicts.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
            transaction_failures: self.transaction_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub slots_created: u64,
    pub slots_updated: u64,
    pub slots_deleted: u64,
    pub conflicts: u64,
    pub not_found: u64,
    pub validation_rejections: u64,
    pub transaction_failures: u64,
}
