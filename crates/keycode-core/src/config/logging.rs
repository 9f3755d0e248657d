//! Diagnostic logging configuration.

use serde::{Deserialize, Serialize};

/// Configuration for diagnostic (tracing) output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive, e.g. `"info"` or `"keycode_policy=debug"`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}
