//! Glob whitelists for sensitive identifiers.
//!
//! Patterns support `*` (any run of characters, including none) and `?`
//! (exactly one character). Every other character, `/` and regex
//! metacharacters included, matches literally. Matching is anchored at both
//! ends: `test` does not match `testing`.

use keycode_core::WhitelistConfig;
use regex::Regex;

use crate::request::WhitelistKind;

/// Translate a glob into an anchored regex source.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str(r"(?s)\A");
    let mut literal = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut literal))),
        }
    }
    source.push_str(r"\z");
    source
}

/// A glob compiled once at gate construction.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    // `None` if compilation failed; such a pattern matches nothing.
    regex: Option<Regex>,
}

impl GlobPattern {
    pub fn new(pattern: &str) -> Self {
        let regex = match Regex::new(&glob_to_regex(pattern)) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "Whitelist pattern failed to compile; it will match nothing");
                None
            }
        };
        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// The original glob text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `value` matches the whole pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(value))
    }
}

/// Compiled whitelists, one ordered pattern list per [`WhitelistKind`].
#[derive(Debug, Clone)]
pub struct Whitelist {
    repos: Vec<GlobPattern>,
    orgs: Vec<GlobPattern>,
    branches: Vec<GlobPattern>,
}

impl Whitelist {
    /// Compile every pattern in the configuration.
    pub fn compile(config: &WhitelistConfig) -> Self {
        fn compile(patterns: &[String]) -> Vec<GlobPattern> {
            patterns.iter().map(|p| GlobPattern::new(p)).collect()
        }
        Self {
            repos: compile(&config.repos),
            orgs: compile(&config.orgs),
            branches: compile(&config.branches),
        }
    }

    /// Patterns configured for a category.
    pub fn patterns(&self, kind: WhitelistKind) -> &[GlobPattern] {
        match kind {
            WhitelistKind::Repo => &self.repos,
            WhitelistKind::Org => &self.orgs,
            WhitelistKind::Branch => &self.branches,
        }
    }

    /// `Ok(())` if the category is unrestricted or some pattern matches,
    /// otherwise the list of configured patterns.
    pub fn check(&self, kind: WhitelistKind, value: &str) -> Result<(), Vec<String>> {
        let patterns = self.patterns(kind);

        // Empty category: whitelisting is opt-in
        if patterns.is_empty() {
            return Ok(());
        }

        if patterns.iter().any(|p| p.matches(value)) {
            return Ok(());
        }

        Err(patterns.iter().map(|p| p.as_str().to_string()).collect())
    }
}
