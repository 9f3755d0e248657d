//! Capacity-bounded audit trail.
//!
//! A ring buffer behind a mutex: appends and reads are serialized, so the
//! capacity bound holds under concurrent callers and every read sees a
//! consistent snapshot. Append order is the order callers acquire the lock,
//! and [`AuditTrail::record`] stamps entries while holding it, so timestamps
//! never decrease along the trail.

use chrono::Utc;
use keycode_core::{AuditConfig, DEFAULT_AUDIT_CAPACITY};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::entry::{AuditEntry, AuditRequest};

/// Append-only, capacity-bounded sequence of [`AuditEntry`].
///
/// Once full, each append evicts the oldest entry.
#[derive(Debug)]
pub struct AuditTrail {
    capacity: usize,
    entries: Mutex<VecDeque<AuditEntry>>,
}

impl AuditTrail {
    /// Create a trail retaining at most `capacity` entries (minimum 1).
    ///
    /// Storage grows with use; only the default capacity is reserved up front.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_AUDIT_CAPACITY))),
        }
    }

    /// Create a trail from configuration.
    pub fn from_config(config: &AuditConfig) -> Self {
        Self::new(config.capacity)
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Every critical section leaves the deque valid, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, VecDeque<AuditEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hash the request's inputs, stamp it, and append it.
    ///
    /// Returns a copy of the stored entry.
    pub fn record(&self, request: AuditRequest) -> AuditEntry {
        // Hash outside the critical section
        let entry = AuditEntry::from_request(request);

        let mut entries = self.lock();
        let entry = entry.stamped_at(Utc::now());
        self.append(&mut entries, entry.clone());
        entry
    }

    /// Append a prepared entry as-is, evicting the oldest if the trail is full.
    pub fn push(&self, entry: AuditEntry) {
        let mut entries = self.lock();
        self.append(&mut entries, entry);
    }

    fn append(&self, entries: &mut VecDeque<AuditEntry>, entry: AuditEntry) {
        if entries.len() >= self.capacity {
            entries.pop_front();
            tracing::trace!(capacity = self.capacity, "audit trail full, evicted oldest entry");
        }

        tracing::debug!(
            tool = %entry.tool(),
            outcome = %entry.outcome(),
            inputs_hash = %entry.inputs_hash(),
            "Audit entry recorded"
        );

        entries.push_back(entry);
    }

    /// Snapshot of every retained entry, oldest first.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock().iter().cloned().collect()
    }

    /// Snapshot of the last `count` entries, oldest first.
    ///
    /// Returns the whole trail when `count` exceeds its length.
    pub fn recent(&self, count: usize) -> Vec<AuditEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}
