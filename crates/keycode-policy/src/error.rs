//! Rejection types for gate decisions.
//!
//! Rejections are ordinary values carried by a [`Decision`](crate::Decision).
//! They become errors only when an adapter converts the decision with
//! [`Decision::into_result`](crate::Decision::into_result).

use keycode_core::Capability;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::request::WhitelistKind;

/// Why the gate refused an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// The kind of rejection.
    pub kind: RejectionKind,
    /// Human-readable explanation, safe to surface to the caller.
    pub reason: String,
}

impl Rejection {
    /// Create a new rejection.
    pub fn new(kind: RejectionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// The tool's capability domain is switched off.
    pub fn capability_disabled(capability: Capability) -> Self {
        Self::new(
            RejectionKind::CapabilityDisabled,
            format!(
                "Capability '{}' is disabled. Enable it in configuration.",
                capability
            ),
        )
    }

    /// Dry-run mode blocks unconfirmed calls.
    pub fn dry_run_block() -> Self {
        Self::new(
            RejectionKind::DryRunBlock,
            "Dry-run mode enabled. Set confirm:true to execute.",
        )
    }

    /// Live mode requires explicit confirmation.
    pub fn confirm_required() -> Self {
        Self::new(
            RejectionKind::ConfirmRequired,
            "Confirmation required. Set confirm:true to proceed.",
        )
    }

    /// The value matched none of the configured patterns.
    pub fn whitelist_violation(kind: WhitelistKind, value: &str, patterns: &[String]) -> Self {
        Self::new(
            RejectionKind::WhitelistViolation,
            format!(
                "{} '{}' not in whitelist. Allowed patterns: {}",
                kind,
                value,
                patterns.join(", ")
            ),
        )
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for Rejection {}

/// Categories of rejection, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectionKind {
    /// The tool's capability domain is disabled.
    CapabilityDisabled,
    /// Dry-run mode and no confirmation.
    DryRunBlock,
    /// Live mode requires confirmation and none was given.
    ConfirmRequired,
    /// A sensitive identifier is not whitelisted.
    WhitelistViolation,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::CapabilityDisabled => write!(f, "capability-disabled"),
            RejectionKind::DryRunBlock => write!(f, "dry-run-block"),
            RejectionKind::ConfirmRequired => write!(f, "confirm-required"),
            RejectionKind::WhitelistViolation => write!(f, "whitelist-violation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_reason() {
        let r = Rejection::capability_disabled(Capability::ManagedDatabase);
        assert_eq!(r.kind, RejectionKind::CapabilityDisabled);
        assert!(r.reason.contains("Capability 'managed_database' is disabled"));
    }

    #[test]
    fn test_whitelist_reason_lists_patterns() {
        let patterns = vec!["sandbox-*".to_string(), "test/*".to_string()];
        let r = Rejection::whitelist_violation(WhitelistKind::Branch, "main", &patterns);
        assert_eq!(
            r.to_string(),
            "branch 'main' not in whitelist. Allowed patterns: sandbox-*, test/*"
        );
    }

    #[test]
    fn test_kind_display_matches_serde() {
        for kind in [
            RejectionKind::CapabilityDisabled,
            RejectionKind::DryRunBlock,
            RejectionKind::ConfirmRequired,
            RejectionKind::WhitelistViolation,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
