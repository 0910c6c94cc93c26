//! Redaction engine
//!
//! Applies a profile's rule set to a string in five fixed steps:
//! 1. protect whitelist terms behind positional placeholder tokens,
//! 2. run the ordered builtin rules (validator-gated),
//! 3. run the blacklist,
//! 4. restore the protected terms verbatim,
//! 5. run the narrative-sensitivity pass, if the profile enables it.
//!
//! Because restore happens before step 5, the sensitivity pass is the one
//! rule whitelist protection does not cover.

use crate::config::TermListConfig;
use crate::counts::RedactionCounts;
use crate::profile::PrivacyProfile;
use crate::rules::{builtin_rules, placeholder, sensitive_rule, RedactionRule, CUSTOM_CATEGORY};
use aho_corasick::{AhoCorasick, MatchKind};
use chatscrub_core::Result;

/// Private-use-area delimiters for whitelist placeholder tokens; no
/// builtin pattern can match across or inside them.
const TOKEN_OPEN: char = '\u{E000}';
const TOKEN_CLOSE: char = '\u{E001}';

/// Compiled redaction engine for one profile + term-list configuration.
pub struct RedactionEngine {
    profile: PrivacyProfile,
    rules: Vec<RedactionRule>,
    sensitive: Option<RedactionRule>,
    whitelist: Option<AhoCorasick>,
    blacklist: Option<AhoCorasick>,
    custom_replacement: String,
}

impl RedactionEngine {
    /// Compile the rule set for a profile. Term lists are validated first;
    /// invalid configuration never reaches the matcher.
    pub fn new(profile: PrivacyProfile, terms: &TermListConfig) -> Result<Self> {
        terms.validate()?;

        let rules = builtin_rules(&profile)?;
        let sensitive = if profile.mask_narrative_sensitive {
            Some(sensitive_rule()?)
        } else {
            None
        };

        let whitelist = build_automaton(&TermListConfig::trimmed(&terms.whitelist))?;
        let blacklist = build_automaton(&TermListConfig::trimmed(&terms.blacklist))?;

        Ok(Self {
            profile,
            rules,
            sensitive,
            whitelist,
            blacklist,
            custom_replacement: placeholder(CUSTOM_CATEGORY),
        })
    }

    pub fn profile(&self) -> &PrivacyProfile {
        &self.profile
    }

    /// Redact one string, accumulating per-category counts.
    pub fn redact(&self, text: &str, counts: &mut RedactionCounts) -> String {
        let (protected, saved) = self.protect_whitelist(text);

        let mut out = protected;
        for rule in &self.rules {
            out = apply_rule(rule, &out, counts);
        }

        out = self.apply_blacklist(&out, counts);

        for (token, original) in &saved {
            out = out.replace(token, original);
        }

        if let Some(rule) = &self.sensitive {
            out = apply_rule(rule, &out, counts);
        }

        out
    }

    /// Replace whitelist occurrences with positional tokens, remembering
    /// the exact matched slices for restoration.
    fn protect_whitelist(&self, text: &str) -> (String, Vec<(String, String)>) {
        let Some(ac) = &self.whitelist else {
            return (text.to_string(), Vec::new());
        };

        let mut saved = Vec::new();
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (i, m) in ac.find_iter(text).enumerate() {
            out.push_str(&text[last..m.start()]);
            let token = format!("{TOKEN_OPEN}{i}{TOKEN_CLOSE}");
            out.push_str(&token);
            saved.push((token, text[m.start()..m.end()].to_string()));
            last = m.end();
        }
        out.push_str(&text[last..]);
        (out, saved)
    }

    fn apply_blacklist(&self, text: &str, counts: &mut RedactionCounts) -> String {
        let Some(ac) = &self.blacklist else {
            return text.to_string();
        };

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for m in ac.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            out.push_str(&self.custom_replacement);
            counts.increment(CUSTOM_CATEGORY);
            last = m.end();
        }
        out.push_str(&text[last..]);
        out
    }
}

/// Case-insensitive, leftmost-longest literal automaton; `None` when the
/// term list is empty.
fn build_automaton(terms: &[String]) -> Result<Option<AhoCorasick>> {
    if terms.is_empty() {
        return Ok(None);
    }
    let ac = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostLongest)
        .build(terms)
        .map_err(|e| chatscrub_core::Error::Config(format!("term automaton: {e}")))?;
    Ok(Some(ac))
}

/// Replace every accepted match of one rule. A match failing the rule's
/// validator is left untouched and uncounted.
fn apply_rule(rule: &RedactionRule, text: &str, counts: &mut RedactionCounts) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in rule.pattern.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        let accepted = rule.validator.map_or(true, |v| v(m.as_str()));
        if accepted {
            out.push_str(&rule.replacement);
            counts.increment(rule.name);
        } else {
            out.push_str(m.as_str());
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}
