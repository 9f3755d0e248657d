//! `keycode whitelist` command implementation.

use anyhow::Result;
use keycode_policy::{PolicyGate, WhitelistKind};

pub fn run(gate: &PolicyGate, kind: WhitelistKind, value: &str) -> Result<()> {
    let decision = gate.check_whitelist(kind, value);
    println!("{}", serde_json::to_string(&decision)?);
    Ok(())
}
