//! Blacklist/whitelist term configuration
//!
//! User-supplied literal terms are validated here, before they ever reach
//! the redaction engine: counts and lengths are capped by policy, and
//! markup/script-like content is rejected outright.

use chatscrub_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Most terms a single list may carry.
pub const MAX_TERMS: usize = 50;

/// Longest accepted term, in characters, after trimming.
pub const MAX_TERM_LEN: usize = 64;

/// Substrings that mark a term as markup/script-like.
const FORBIDDEN_SUBSTRINGS: &[&str] = &["<", ">", "javascript:", "script"];

/// User-configured literal term lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermListConfig {
    /// Terms forced into redaction (CUSTOM category)
    #[serde(default)]
    pub blacklist: Vec<String>,

    /// Terms protected from every rule
    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl TermListConfig {
    pub fn new(blacklist: Vec<String>, whitelist: Vec<String>) -> Self {
        Self {
            blacklist,
            whitelist,
        }
    }

    /// Validate both lists against policy. Invalid configuration is a hard
    /// error; it must never silently reach the engine.
    pub fn validate(&self) -> Result<()> {
        validate_list("blacklist", &self.blacklist)?;
        validate_list("whitelist", &self.whitelist)
    }

    /// Trimmed copies of the terms, empties dropped.
    pub(crate) fn trimmed(list: &[String]) -> Vec<String> {
        list.iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn validate_list(name: &str, list: &[String]) -> Result<()> {
    if list.len() > MAX_TERMS {
        return Err(Error::Config(format!(
            "{name} has {} terms; at most {MAX_TERMS} allowed",
            list.len()
        )));
    }

    for term in list {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(Error::Config(format!("{name} contains an empty term")));
        }
        if trimmed.chars().count() > MAX_TERM_LEN {
            return Err(Error::Config(format!(
                "{name} term exceeds {MAX_TERM_LEN} characters"
            )));
        }
        let lowered = trimmed.to_lowercase();
        if FORBIDDEN_SUBSTRINGS.iter().any(|f| lowered.contains(f)) {
            return Err(Error::Config(format!(
                "{name} term contains markup-like content"
            )));
        }
    }

    Ok(())
}
