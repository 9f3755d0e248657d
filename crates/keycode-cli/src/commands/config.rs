//! `keycode config` command implementation.
//!
//! Prints the effective configuration (file plus flag overrides) as YAML,
//! with credential-shaped values redacted.

use anyhow::{Context, Result};
use keycode_core::KeycodeConfig;
use keycode_log::mask_value;

/// Render the configuration as redacted YAML.
pub fn render(config: &KeycodeConfig) -> Result<String> {
    let value = serde_json::to_value(config).context("Failed to serialize configuration")?;
    let yaml = serde_yaml::to_string(&mask_value(&value))?;
    Ok(yaml)
}

pub fn run(config: &KeycodeConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}
