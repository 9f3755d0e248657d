//! The policy gate.
//!
//! `PolicyGate` is the single decision point tool adapters consult before a
//! state-mutating side effect. Decisions are pure functions of the immutable
//! configuration and the call's inputs; only the owned audit trail is
//! mutable, and it serializes its own access.

use keycode_audit::{AuditEntry, AuditRequest, AuditTrail};
use keycode_core::{AuditConfig, Capability, KeycodeConfig, SecurityConfig, DEFAULT_RECENT_COUNT};
use serde_json::Value;

use crate::error::Rejection;
use crate::request::{Target, WhitelistKind};
use crate::whitelist::Whitelist;
use crate::Decision;

/// Decision engine plus audit trail for one configuration.
///
/// Share it across request handlers behind an `Arc`; every method takes `&self`.
///
/// # Examples
///
/// ```
/// use keycode_core::{Capability, CapabilityFlags, SecurityConfig};
/// use keycode_policy::PolicyGate;
/// use serde_json::json;
///
/// let gate = PolicyGate::new(SecurityConfig {
///     capabilities: CapabilityFlags::none().with(Capability::Git, true),
///     ..SecurityConfig::default()
/// });
///
/// // Dry-run is on by default: unconfirmed calls are blocked
/// let decision = gate.check_mutating_operation("git.commit", &json!({}), false);
/// assert!(!decision.is_allowed());
/// assert!(decision.dry_run());
///
/// let decision = gate.check_mutating_operation("git.commit", &json!({}), true);
/// assert!(decision.is_allowed());
/// ```
#[derive(Debug)]
pub struct PolicyGate {
    config: SecurityConfig,
    whitelist: Whitelist,
    trail: AuditTrail,
    recent_default: usize,
}

impl PolicyGate {
    /// Default count used by [`recent_audit_log`](Self::recent_audit_log).
    pub const DEFAULT_RECENT: usize = DEFAULT_RECENT_COUNT;

    /// Build a gate with the default audit capacity.
    pub fn new(config: SecurityConfig) -> Self {
        Self::with_audit_config(config, &AuditConfig::default())
    }

    /// Build a gate with explicit audit trail settings.
    pub fn with_audit_config(config: SecurityConfig, audit: &AuditConfig) -> Self {
        let whitelist = Whitelist::compile(&config.whitelist);
        Self {
            config,
            whitelist,
            trail: AuditTrail::from_config(audit),
            recent_default: audit.recent_default,
        }
    }

    /// Build a gate from a full configuration file.
    pub fn from_config(config: &KeycodeConfig) -> Self {
        Self::with_audit_config(config.security.clone(), &config.audit)
    }

    /// The configuration this gate was built with. Read-only.
    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Whether the host should run its human approval workflow.
    ///
    /// Surfaced for hosts only; no decision here depends on it.
    pub fn human_in_the_loop(&self) -> bool {
        self.config.human_in_the_loop
    }

    /// Decide whether a state-mutating tool call may run.
    ///
    /// Evaluated in order, first match wins:
    /// 1. the tool's capability domain is disabled -> reject
    /// 2. dry-run mode without `confirm` -> reject with `dry_run = true`
    /// 3. live mode, confirmation required, no `confirm` -> reject
    /// 4. otherwise allow
    ///
    /// `_args` is accepted so adapters can pass the call's inputs uniformly;
    /// it is not inspected. Tools with an unknown prefix are never blocked on
    /// capability grounds.
    pub fn check_mutating_operation(&self, tool: &str, _args: &Value, confirm: bool) -> Decision {
        let decision = self.evaluate(tool, confirm);

        if let Some(rejection) = decision.rejection() {
            tracing::debug!(
                tool = %tool,
                kind = %rejection.kind,
                dry_run = decision.dry_run(),
                "Mutating operation rejected"
            );
        }

        decision
    }

    fn evaluate(&self, tool: &str, confirm: bool) -> Decision {
        if let Some(capability) = Capability::from_tool(tool) {
            if !self.config.capabilities.is_enabled(capability) {
                return Decision::reject(Rejection::capability_disabled(capability), false);
            }
        }

        if self.config.dry_run && !confirm {
            return Decision::reject(Rejection::dry_run_block(), true);
        }

        if !self.config.dry_run && self.config.require_confirm && !confirm {
            return Decision::reject(Rejection::confirm_required(), false);
        }

        Decision::allow()
    }

    /// Decide whether `value` may be used as a `kind` identifier.
    ///
    /// An empty pattern list for the category allows anything.
    pub fn check_whitelist(&self, kind: WhitelistKind, value: &str) -> Decision {
        match self.whitelist.check(kind, value) {
            Ok(()) => Decision::allow(),
            Err(patterns) => {
                tracing::debug!(kind = %kind, "Whitelist check rejected");
                Decision::reject(Rejection::whitelist_violation(kind, value, &patterns), false)
            }
        }
    }

    /// Mutating-operation check followed by a whitelist check per target.
    ///
    /// Returns the first rejection, or an allow if every check passes.
    pub fn check_operation_target(
        &self,
        tool: &str,
        args: &Value,
        confirm: bool,
        targets: &[Target],
    ) -> Decision {
        let decision = self.check_mutating_operation(tool, args, confirm);
        if !decision.is_allowed() {
            return decision;
        }

        targets
            .iter()
            .map(|target| self.check_whitelist(target.kind, &target.value))
            .find(|d| !d.is_allowed())
            .unwrap_or(decision)
    }

    /// Record the disposition of a gated call.
    ///
    /// Returns a copy of the stored entry.
    pub fn audit(&self, request: AuditRequest) -> AuditEntry {
        self.trail.record(request)
    }

    /// Snapshot of the whole audit trail, oldest first.
    pub fn audit_log(&self) -> Vec<AuditEntry> {
        self.trail.entries()
    }

    /// Snapshot of the last `count` entries (configured default when `None`, normally 50).
    pub fn recent_audit_log(&self, count: Option<usize>) -> Vec<AuditEntry> {
        self.trail.recent(count.unwrap_or(self.recent_default))
    }

    /// Number of retained audit entries.
    pub fn audit_len(&self) -> usize {
        self.trail.len()
    }
}

impl Default for PolicyGate {
    fn default() -> Self {
        Self::new(SecurityConfig::default())
    }
}
