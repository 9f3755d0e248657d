//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Tool inputs could not be converted to JSON for hashing.
    #[error("audit inputs are not serializable: {0}")]
    Serialization(#[from] serde_json::Error),
}
