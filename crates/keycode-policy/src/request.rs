//! Whitelist request types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a security-sensitive identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhitelistKind {
    /// Repository name, e.g. `owner/repo`.
    Repo,
    /// Organization name.
    Org,
    /// Branch name.
    Branch,
}

impl fmt::Display for WhitelistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhitelistKind::Repo => write!(f, "repo"),
            WhitelistKind::Org => write!(f, "org"),
            WhitelistKind::Branch => write!(f, "branch"),
        }
    }
}

impl FromStr for WhitelistKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repo" => Ok(WhitelistKind::Repo),
            "org" => Ok(WhitelistKind::Org),
            "branch" => Ok(WhitelistKind::Branch),
            other => Err(format!(
                "unknown whitelist kind '{}' (expected repo, org or branch)",
                other
            )),
        }
    }
}

/// A sensitive identifier an operation is about to touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub kind: WhitelistKind,
    pub value: String,
}

impl Target {
    pub fn new(kind: WhitelistKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn repo(value: impl Into<String>) -> Self {
        Self::new(WhitelistKind::Repo, value)
    }

    pub fn org(value: impl Into<String>) -> Self {
        Self::new(WhitelistKind::Org, value)
    }

    pub fn branch(value: impl Into<String>) -> Self {
        Self::new(WhitelistKind::Branch, value)
    }
}
