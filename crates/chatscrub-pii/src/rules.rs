//! Builtin redaction rules
//!
//! Rules are applied in order; later rules see the output of earlier ones.
//! Replacements are fixed `[REDACTED:<CATEGORY>]` placeholders, chosen so
//! that no builtin pattern can ever match a placeholder — re-running the
//! engine on its own output is a no-op.

use crate::profile::PrivacyProfile;
use chatscrub_core::Result;
use regex::Regex;

/// Category name used for blacklist hits.
pub const CUSTOM_CATEGORY: &str = "CUSTOM";

/// Category name for the narrative-sensitive keyword pass.
pub const SENSITIVE_CATEGORY: &str = "SENSITIVE";

/// One compiled redaction rule.
pub struct RedactionRule {
    /// Category tag counted per accepted match
    pub name: &'static str,

    pub pattern: Regex,

    /// Optional match gate; a rejected match is left untouched and
    /// uncounted
    pub validator: Option<fn(&str) -> bool>,

    pub replacement: String,
}

impl RedactionRule {
    fn new(name: &'static str, pattern: &str) -> Result<Self> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            validator: None,
            replacement: placeholder(name),
        })
    }

    fn with_validator(mut self, validator: fn(&str) -> bool) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// The fixed mask for a category.
pub fn placeholder(name: &str) -> String {
    format!("[REDACTED:{name}]")
}

/// Assemble the ordered rule list for a profile.
pub fn builtin_rules(profile: &PrivacyProfile) -> Result<Vec<RedactionRule>> {
    let mut rules = vec![
        RedactionRule::new(
            "EMAIL",
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        )?,
        // Korean mobile numbers: 010-1234-5678, 01012345678, 010 1234 5678
        RedactionRule::new("PHONE", r"\b01[016789][-.\s]?\d{3,4}[-.\s]?\d{4}\b")?,
        // International format: +82-10-1234-5678, +1 555 123 4567
        RedactionRule::new("PHONE", r"\+\d{1,3}[-.\s]?\d{1,4}[-.\s]?\d{3,4}[-.\s]?\d{4}\b")?,
        // Resident registration number: 991231-1234567
        RedactionRule::new("RRN", r"\b\d{6}-[1-4]\d{6}\b")?,
        RedactionRule::new("CARD", r"\b(?:\d{4}[-\s]?){3}\d{4,7}\b")?.with_validator(luhn_valid),
        RedactionRule::new(
            "IP",
            r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
        )?,
        RedactionRule::new("HANDLE", r"@[A-Za-z0-9_]{2,30}\b")?,
    ];

    if profile.mask_address_hints {
        // Korean address hints: district + street/neighborhood, optional
        // building number
        rules.push(RedactionRule::new(
            "ADDRESS",
            r"[가-힣]{1,10}(?:시|군|구)\s*[가-힣0-9]{1,10}(?:동|읍|면|로|길)\s*(?:\d+(?:-\d+)?(?:번지|호)?)?",
        )?);
    }

    Ok(rules)
}

/// The narrative-sensitivity keyword rule, applied as a final pass for
/// profiles that enable it.
pub fn sensitive_rule() -> Result<RedactionRule> {
    RedactionRule::new(
        SENSITIVE_CATEGORY,
        r"(?i)자살|자해|목을 매|손목을 긋|죽여버리|살해|난도질|suicide|self[- ]harm|kill yourself",
    )
}

/// Luhn checksum over the digits of a candidate card number.
pub fn luhn_valid(number: &str) -> bool {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .filter_map(|c| c.to_digit(10))
        .collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let checksum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    checksum % 10 == 0
}
