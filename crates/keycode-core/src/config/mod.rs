//! Configuration types for the Keycode tool host.
//!
//! Configuration is loaded from a single YAML file (`keycode.yaml`). Every
//! section is optional; missing sections fall back to fail-safe defaults
//! (dry-run on, confirmation required, only snippets enabled).
//!
//! ```yaml
//! security:
//!   dry_run: false
//!   require_confirm: true
//!   whitelist:
//!     repos: ["owner/allowed-repo"]
//!     branches: ["sandbox-*", "test/*"]
//!   capabilities:
//!     git: true
//! audit:
//!   capacity: 1000
//! logging:
//!   filter: info
//! ```

pub mod audit;
pub mod logging;
pub mod security;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use audit::{AuditConfig, DEFAULT_AUDIT_CAPACITY, DEFAULT_RECENT_COUNT, MAX_AUDIT_CAPACITY};
pub use logging::LoggingConfig;
pub use security::{Capability, CapabilityFlags, SecurityConfig, WhitelistConfig};

/// Complete Keycode configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeycodeConfig {
    /// Policy gate settings.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Diagnostic logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl KeycodeConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    ///
    /// An empty document yields the default configuration.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::from)
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audit.capacity == 0 {
            return Err(ConfigError::Config(
                "audit.capacity must be greater than zero".to_string(),
            ));
        }

        if self.audit.capacity > MAX_AUDIT_CAPACITY {
            return Err(ConfigError::Config(format!(
                "audit.capacity must be at most {}",
                MAX_AUDIT_CAPACITY
            )));
        }

        let whitelist = &self.security.whitelist;
        for (category, patterns) in [
            ("repos", &whitelist.repos),
            ("orgs", &whitelist.orgs),
            ("branches", &whitelist.branches),
        ] {
            if patterns.iter().any(|p| p.is_empty()) {
                return Err(ConfigError::Config(format!(
                    "whitelist.{} contains an empty pattern",
                    category
                )));
            }
        }

        Ok(())
    }
}
