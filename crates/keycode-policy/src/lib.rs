//! Keycode Policy Gate
//!
//! Decides whether a state-mutating tool call may run, and whether a
//! sensitive identifier (repository, organization, branch) is whitelisted.
//!
//! Checks are fail-closed and ordered; see
//! [`PolicyGate::check_mutating_operation`]. Rejections are returned as
//! [`Decision`] values, never raised: adapters branch on them, or convert them
//! with [`Decision::into_result`] and propagate with `?`.

pub mod error;
pub mod gate;
pub mod request;
pub mod whitelist;

use keycode_audit::AuditOutcome;
use serde::{Serialize, Serializer};

pub use error::{Rejection, RejectionKind};
pub use gate::PolicyGate;
pub use request::{Target, WhitelistKind};
pub use whitelist::{glob_to_regex, GlobPattern, Whitelist};

/// Result of a gate check.
///
/// `allowed` is derived from the absence of a rejection, so an allowed
/// decision can never carry a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    rejection: Option<Rejection>,
    dry_run: bool,
}

impl Decision {
    /// The operation may proceed.
    pub fn allow() -> Self {
        Self {
            rejection: None,
            dry_run: false,
        }
    }

    /// The operation must not proceed.
    pub fn reject(rejection: Rejection, dry_run: bool) -> Self {
        Self {
            rejection: Some(rejection),
            dry_run,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.rejection.is_none()
    }

    /// True only when the call was blocked by dry-run mode.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    pub fn kind(&self) -> Option<RejectionKind> {
        self.rejection.as_ref().map(|r| r.kind)
    }

    pub fn reason(&self) -> Option<&str> {
        self.rejection.as_ref().map(|r| r.reason.as_str())
    }

    /// `Ok(())` if allowed, otherwise the rejection as an error.
    pub fn into_result(self) -> Result<(), Rejection> {
        match self.rejection {
            None => Ok(()),
            Some(rejection) => Err(rejection),
        }
    }

    /// Outcome to audit for this decision when the side effect is skipped.
    ///
    /// `None` for allowed decisions: their outcome depends on the side effect.
    pub fn audit_outcome(&self) -> Option<AuditOutcome> {
        self.rejection
            .as_ref()
            .map(|_| AuditOutcome::for_rejection(self.dry_run))
    }
}

#[derive(Serialize)]
struct DecisionView<'a> {
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<RejectionKind>,
    dry_run: bool,
}

impl Serialize for Decision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DecisionView {
            allowed: self.is_allowed(),
            reason: self.reason(),
            kind: self.kind(),
            dry_run: self.dry_run,
        }
        .serialize(serializer)
    }
}
