//! # keycode-audit
//!
//! In-memory audit trail for gated tool invocations.
//!
//! This crate provides:
//! - [`AuditEntry`]: immutable record of one invocation's disposition
//! - [`AuditRequest`]: what a tool adapter submits after a gated call
//! - [`AuditTrail`]: thread-safe ring buffer keeping the most recent entries
//!
//! Entries never contain raw tool inputs, only a 16-hex-character SHA-256
//! prefix of their canonical JSON form.
//!
//! ## Outcomes
//!
//! | Outcome | Description |
//! |---------|-------------|
//! | `success` | Side effect ran and succeeded |
//! | `error` | Side effect ran and failed |
//! | `dry-run` | Blocked by dry-run mode |
//! | `rejected` | Blocked by capability, confirmation or whitelist |
//!
//! ## Example Usage
//!
//! ```rust
//! use keycode_audit::{AuditOutcome, AuditRequest, AuditTrail};
//! use serde_json::json;
//!
//! let trail = AuditTrail::default();
//! trail.record(AuditRequest::new(
//!     "git.commit",
//!     "ci",
//!     json!({"message": "fix"}),
//!     AuditOutcome::Success,
//! ));
//!
//! assert_eq!(trail.recent(1)[0].tool(), "git.commit");
//! ```

pub mod entry;
pub mod error;
pub mod trail;

pub use entry::{inputs_hash, AuditEntry, AuditOutcome, AuditRequest, INPUTS_HASH_LEN};
pub use error::AuditError;
pub use trail::AuditTrail;
