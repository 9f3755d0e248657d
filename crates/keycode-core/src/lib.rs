// Configuration types shared across all Keycode crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    AuditConfig, Capability, CapabilityFlags, ConfigError, KeycodeConfig, LoggingConfig,
    SecurityConfig, WhitelistConfig, DEFAULT_AUDIT_CAPACITY, DEFAULT_RECENT_COUNT,
    MAX_AUDIT_CAPACITY,
};
