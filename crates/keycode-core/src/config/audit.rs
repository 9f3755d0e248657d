//! Audit trail configuration.

use serde::{Deserialize, Serialize};

/// Default number of entries retained by the audit trail.
pub const DEFAULT_AUDIT_CAPACITY: usize = 1000;

/// Largest accepted `audit.capacity`.
pub const MAX_AUDIT_CAPACITY: usize = 1_000_000;

/// Default number of entries returned by a "recent entries" query.
pub const DEFAULT_RECENT_COUNT: usize = 50;

/// Configuration for the in-memory audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditConfig {
    /// Maximum entries retained; oldest are evicted first.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Entry count used when a caller asks for recent entries without a count.
    #[serde(default = "default_recent")]
    pub recent_default: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            recent_default: default_recent(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_AUDIT_CAPACITY
}

fn default_recent() -> usize {
    DEFAULT_RECENT_COUNT
}
