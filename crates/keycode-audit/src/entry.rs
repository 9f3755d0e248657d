//! Audit entry types.
//!
//! An entry identifies its inputs by a truncated SHA-256 of their canonical
//! JSON form, never by the raw inputs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::AuditError;

/// Number of hex characters kept from the input digest.
pub const INPUTS_HASH_LEN: usize = 16;

/// Disposition of a gated invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditOutcome {
    /// The side effect ran and succeeded.
    Success,
    /// The side effect ran and failed.
    Error,
    /// Blocked because the gate is in dry-run mode.
    DryRun,
    /// Blocked by capability, confirmation or whitelist policy.
    Rejected,
}

impl AuditOutcome {
    /// Outcome to record for a rejected call.
    pub fn for_rejection(dry_run: bool) -> Self {
        if dry_run { Self::DryRun } else { Self::Rejected }
    }
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::DryRun => write!(f, "dry-run"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// What a tool adapter hands to the trail after a gated call.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRequest {
    pub tool: String,
    pub caller: String,
    /// Raw tool arguments. Only their hash is retained.
    pub inputs: Value,
    pub outcome: AuditOutcome,
    pub error: Option<String>,
    pub dry_run: Option<bool>,
}

impl AuditRequest {
    /// Create a request with JSON inputs.
    pub fn new(
        tool: impl Into<String>,
        caller: impl Into<String>,
        inputs: Value,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            tool: tool.into(),
            caller: caller.into(),
            inputs,
            outcome,
            error: None,
            dry_run: None,
        }
    }

    /// Create a request from any serializable inputs.
    ///
    /// Fails only if `inputs` cannot be represented as JSON (for example a map
    /// with non-string keys), which is a defect in the caller.
    pub fn from_serializable<T: Serialize + ?Sized>(
        tool: impl Into<String>,
        caller: impl Into<String>,
        inputs: &T,
        outcome: AuditOutcome,
    ) -> Result<Self, AuditError> {
        Ok(Self::new(tool, caller, serde_json::to_value(inputs)?, outcome))
    }

    /// Set the error message.
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Set the dry-run flag.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }
}

/// Immutable record of one gated invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    timestamp: DateTime<Utc>,
    tool: String,
    caller: String,
    inputs_hash: String,
    outcome: AuditOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dry_run: Option<bool>,
}

impl AuditEntry {
    /// Build an entry from a request, stamping the current time.
    pub fn from_request(request: AuditRequest) -> Self {
        Self {
            timestamp: Utc::now(),
            inputs_hash: inputs_hash(&request.inputs),
            tool: request.tool,
            caller: request.caller,
            outcome: request.outcome,
            error: request.error,
            dry_run: request.dry_run,
        }
    }

    /// Replace the timestamp, keeping everything else.
    pub(crate) fn stamped_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn inputs_hash(&self) -> &str {
        &self.inputs_hash
    }

    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dry_run(&self) -> Option<bool> {
        self.dry_run
    }

    /// Format the entry as a human-readable log line.
    ///
    /// Format: `[timestamp] tool caller=... outcome=... inputs=... [error="..."] [dry_run=true]`
    pub fn to_log_line(&self) -> String {
        let mut line = format!(
            "[{}] {} caller={} outcome={} inputs={}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.tool,
            self.caller,
            self.outcome,
            self.inputs_hash,
        );

        if let Some(ref error) = self.error {
            line.push_str(&format!(" error=\"{}\"", error.replace('"', "'")));
        }

        if self.dry_run == Some(true) {
            line.push_str(" dry_run=true");
        }

        line
    }
}

/// Truncated SHA-256 (hex) of the canonical JSON form of `inputs`.
///
/// Object keys are sorted at every depth so the hash depends only on content.
pub fn inputs_hash(inputs: &Value) -> String {
    let canonical = canonicalize(inputs).to_string();
    let digest = Sha256::digest(canonical.as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(INPUTS_HASH_LEN);
    hash
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
