//! `keycode replay` command implementation.
//!
//! Reads a JSON Lines script of tool invocations, runs each through the gate
//! the way a tool adapter would, records one audit entry per invocation and
//! prints the most recent audit entries as JSON Lines.
//!
//! Script line format:
//!
//! ```json
//! {"tool": "git.branch", "caller": "agent", "args": {"name": "sandbox-x"},
//!  "confirm": true, "targets": [{"kind": "branch", "value": "sandbox-x"}],
//!  "outcome": "error", "error": "remote rejected"}
//! ```
//!
//! `outcome` stands in for the side effect of an allowed call and defaults to
//! `success`. It is ignored for rejected calls.

use anyhow::{Context, Result};
use keycode_audit::{AuditEntry, AuditOutcome, AuditRequest};
use keycode_log::{mask_value, SecureLogger};
use keycode_policy::{PolicyGate, Target};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Result of the simulated side effect for an allowed call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptedOutcome {
    #[default]
    Success,
    Error,
}

/// One scripted tool invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    pub tool: String,
    #[serde(default = "default_caller")]
    pub caller: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub confirm: bool,
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub outcome: ScriptedOutcome,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_caller() -> String {
    "replay".to_string()
}

/// Parse a script. Blank lines and lines starting with `#` are skipped.
pub fn parse_script<R: BufRead>(reader: R) -> Result<Vec<Invocation>> {
    let mut invocations = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read script")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let invocation: Invocation = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid invocation on line {}", index + 1))?;
        invocations.push(invocation);
    }

    Ok(invocations)
}

/// Gate, audit and log one invocation. Returns the stored audit entry.
pub fn execute(gate: &PolicyGate, logger: &SecureLogger, invocation: &Invocation) -> AuditEntry {
    let decision = gate.check_operation_target(
        &invocation.tool,
        &invocation.args,
        invocation.confirm,
        &invocation.targets,
    );

    if let Some(outcome) = decision.audit_outcome() {
        let mut request = AuditRequest::new(
            &invocation.tool,
            &invocation.caller,
            invocation.args.clone(),
            outcome,
        );
        if decision.dry_run() {
            request = request.dry_run(true);
        }
        logger.warn(
            &format!("{} blocked", invocation.tool),
            Some(&json!({
                "caller": invocation.caller,
                "kind": decision.kind(),
                "reason": decision.reason(),
            })),
        );
        return gate.audit(request);
    }

    let request = AuditRequest::new(
        &invocation.tool,
        &invocation.caller,
        invocation.args.clone(),
        match invocation.outcome {
            ScriptedOutcome::Success => AuditOutcome::Success,
            ScriptedOutcome::Error => AuditOutcome::Error,
        },
    );

    match invocation.outcome {
        ScriptedOutcome::Success => {
            logger.info(
                &format!("{} succeeded", invocation.tool),
                Some(&json!({ "caller": invocation.caller })),
            );
            gate.audit(request)
        }
        ScriptedOutcome::Error => {
            let message = invocation
                .error
                .clone()
                .unwrap_or_else(|| "unspecified error".to_string());
            logger.error(
                &format!("{} failed: {}", invocation.tool, message),
                Some(&json!({ "caller": invocation.caller })),
            );
            gate.audit(request.error(message))
        }
    }
}

pub fn run(gate: &PolicyGate, logger: &SecureLogger, path: &Path, recent: Option<usize>) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open script {:?}", path))?;
    let invocations = parse_script(BufReader::new(file))?;

    tracing::debug!(count = invocations.len(), "Replaying script");
    for invocation in &invocations {
        execute(gate, logger, invocation);
    }

    for entry in gate.recent_audit_log(recent) {
        let value = serde_json::to_value(&entry)?;
        println!("{}", serde_json::to_string(&mask_value(&value))?);
    }

    Ok(())
}
