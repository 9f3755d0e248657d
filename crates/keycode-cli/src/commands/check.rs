//! `keycode check` command implementation.
//!
//! Runs one tool invocation through the gate's mutating-operation check and
//! prints the decision as JSON.

use anyhow::{Context, Result};
use keycode_policy::{Decision, PolicyGate};
use serde_json::Value;

/// Evaluate a tool call with arguments given as a JSON document.
pub fn evaluate(gate: &PolicyGate, tool: &str, args: &str, confirm: bool) -> Result<Decision> {
    let args: Value = serde_json::from_str(args).context("--args is not valid JSON")?;
    Ok(gate.check_mutating_operation(tool, &args, confirm))
}

pub fn run(gate: &PolicyGate, tool: &str, args: &str, confirm: bool) -> Result<()> {
    let decision = evaluate(gate, tool, args, confirm)?;
    println!("{}", serde_json::to_string(&decision)?);
    Ok(())
}
