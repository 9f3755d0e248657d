//! Security gate configuration.
//!
//! Defines the operating mode (dry-run / confirmation), the per-domain
//! capability switches and the identifier whitelists consumed by the
//! policy gate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the policy gate.
///
/// Immutable once handed to a gate; reconfiguring means building a new gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Simulate-only switch. Unconfirmed mutating calls are blocked.
    #[serde(default = "default_true")]
    pub dry_run: bool,

    /// Whether live-mode operations additionally require explicit confirmation.
    #[serde(default = "default_true")]
    pub require_confirm: bool,

    /// Allow-lists for sensitive identifiers.
    #[serde(default)]
    pub whitelist: WhitelistConfig,

    /// Per-domain kill switches.
    #[serde(default)]
    pub capabilities: CapabilityFlags,

    /// Informational only. Surfaced to hosts running approval workflows;
    /// never consulted when deciding.
    #[serde(default = "default_true")]
    pub human_in_the_loop: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            require_confirm: true,
            whitelist: WhitelistConfig::default(),
            capabilities: CapabilityFlags::default(),
            human_in_the_loop: true,
        }
    }
}

/// Glob allow-lists. An empty list allows any value in that category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhitelistConfig {
    /// Repository patterns, e.g. `owner/repo`, `org/*`.
    #[serde(default)]
    pub repos: Vec<String>,

    /// Organization patterns.
    #[serde(default)]
    pub orgs: Vec<String>,

    /// Branch patterns, e.g. `sandbox-*`, `test/*`.
    ///
    /// Omitting the key keeps the default sandbox patterns; `branches: []`
    /// opts out of branch restrictions explicitly.
    #[serde(default = "default_branches")]
    pub branches: Vec<String>,
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            orgs: Vec::new(),
            branches: default_branches(),
        }
    }
}

fn default_branches() -> Vec<String> {
    vec![
        "sandbox-*".to_string(),
        "test/*".to_string(),
        "dev/*".to_string(),
    ]
}

impl WhitelistConfig {
    /// A whitelist with every category empty (allow anything).
    pub fn open() -> Self {
        Self {
            repos: Vec::new(),
            orgs: Vec::new(),
            branches: Vec::new(),
        }
    }
}

/// A capability domain: a family of mutating tools that can be switched off as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Snippet storage (`snippet.*`).
    Snippets,
    /// Version control (`git.*`).
    Git,
    /// Managed database access (`supabase.*`).
    ManagedDatabase,
    /// Edge deployments (`cloudflare.*`).
    EdgeDeploy,
    /// Mobile builds (`android.*`).
    MobileBuild,
}

impl Capability {
    /// All capability domains, in configuration order.
    pub const ALL: [Capability; 5] = [
        Capability::Snippets,
        Capability::Git,
        Capability::ManagedDatabase,
        Capability::EdgeDeploy,
        Capability::MobileBuild,
    ];

    /// Map a tool prefix (the segment before the first `.`) to its domain.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "snippet" => Some(Capability::Snippets),
            "git" => Some(Capability::Git),
            "supabase" => Some(Capability::ManagedDatabase),
            "cloudflare" => Some(Capability::EdgeDeploy),
            "android" => Some(Capability::MobileBuild),
            _ => None,
        }
    }

    /// Resolve the domain of a dotted tool identifier such as `git.commit`.
    ///
    /// Identifiers without a `.` or with an unknown prefix have no domain.
    pub fn from_tool(tool: &str) -> Option<Self> {
        let (prefix, _) = tool.split_once('.')?;
        Self::from_prefix(prefix)
    }

    /// Configuration key of this capability.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Snippets => "snippets",
            Capability::Git => "git",
            Capability::ManagedDatabase => "managed_database",
            Capability::EdgeDeploy => "edge_deploy",
            Capability::MobileBuild => "mobile_build",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enable flags, one per [`Capability`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapabilityFlags {
    #[serde(default = "default_true")]
    pub snippets: bool,

    #[serde(default)]
    pub git: bool,

    #[serde(default, alias = "supabase")]
    pub managed_database: bool,

    #[serde(default, alias = "cloudflare")]
    pub edge_deploy: bool,

    #[serde(default, alias = "android")]
    pub mobile_build: bool,
}

impl Default for CapabilityFlags {
    fn default() -> Self {
        Self {
            snippets: true,
            git: false,
            managed_database: false,
            edge_deploy: false,
            mobile_build: false,
        }
    }
}

impl CapabilityFlags {
    /// Every capability switched on.
    pub fn all_enabled() -> Self {
        Self {
            snippets: true,
            git: true,
            managed_database: true,
            edge_deploy: true,
            mobile_build: true,
        }
    }

    /// Every capability switched off.
    pub fn none() -> Self {
        Self {
            snippets: false,
            git: false,
            managed_database: false,
            edge_deploy: false,
            mobile_build: false,
        }
    }

    /// Whether the given capability is enabled.
    pub fn is_enabled(&self, capability: Capability) -> bool {
        match capability {
            Capability::Snippets => self.snippets,
            Capability::Git => self.git,
            Capability::ManagedDatabase => self.managed_database,
            Capability::EdgeDeploy => self.edge_deploy,
            Capability::MobileBuild => self.mobile_build,
        }
    }

    /// Return a copy with one capability set.
    pub fn with(mut self, capability: Capability, enabled: bool) -> Self {
        let flag = match capability {
            Capability::Snippets => &mut self.snippets,
            Capability::Git => &mut self.git,
            Capability::ManagedDatabase => &mut self.managed_database,
            Capability::EdgeDeploy => &mut self.edge_deploy,
            Capability::MobileBuild => &mut self.mobile_build,
        };
        *flag = enabled;
        self
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_from_tool() {
        assert_eq!(Capability::from_tool("git.commit"), Some(Capability::Git));
        assert_eq!(Capability::from_tool("snippet.search"), Some(Capability::Snippets));
        assert_eq!(
            Capability::from_tool("supabase.query"),
            Some(Capability::ManagedDatabase)
        );
        assert_eq!(
            Capability::from_tool("cloudflare.deploy"),
            Some(Capability::EdgeDeploy)
        );
        assert_eq!(
            Capability::from_tool("android.buildIme"),
            Some(Capability::MobileBuild)
        );
    }

    #[test]
    fn test_capability_unknown_or_undotted() {
        assert_eq!(Capability::from_tool("prompts.render"), None);
        assert_eq!(Capability::from_tool("git"), None);
        // Prefix must be the whole leading segment
        assert_eq!(Capability::from_tool("gitlab.push"), None);
        assert_eq!(Capability::from_tool(""), None);
    }

    #[test]
    fn test_default_config_is_fail_safe() {
        let config = SecurityConfig::default();
        assert!(config.dry_run);
        assert!(config.require_confirm);
        assert!(config.human_in_the_loop);
        assert!(config.capabilities.is_enabled(Capability::Snippets));
        assert!(!config.capabilities.is_enabled(Capability::Git));
        assert!(config.whitelist.repos.is_empty());
        assert_eq!(config.whitelist.branches.len(), 3);
    }

    #[test]
    fn test_flags_with() {
        let flags = CapabilityFlags::none().with(Capability::Git, true);
        assert!(flags.is_enabled(Capability::Git));
        for cap in Capability::ALL.iter().filter(|c| **c != Capability::Git) {
            assert!(!flags.is_enabled(*cap));
        }
    }

    #[test]
    fn test_vendor_aliases_deserialize() {
        let yaml = "supabase: true\ncloudflare: true\nandroid: false\n";
        let flags: CapabilityFlags = serde_yaml::from_str(yaml).unwrap();
        assert!(flags.managed_database);
        assert!(flags.edge_deploy);
        assert!(!flags.mobile_build);
        assert!(flags.snippets);
    }
}
