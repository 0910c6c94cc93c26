//! Content policy gate
//!
//! An independent boolean classifier, not a redaction: text is blocked
//! when it combines a minor-age signal with a sexual-content signal. The
//! gate must always run on the original, unredacted text so that masking
//! can never be used to slip past the block.

use once_cell::sync::Lazy;
use regex::Regex;

static MINOR_AGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)미성년|초등학생|중학생|고등학생|여중생|남중생|여고생|남고생|\b1[0-7]\s*(?:살|세)\b|\bminor\b|\bunderage\b|\b1[0-7][-\s]?years?[-\s]?old\b",
    )
    .unwrap()
});

static SEXUAL_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)성관계|섹스|삽입|자위|음란|야설|애무|정사\s*장면|\bsex\b|\bsexual\b|\bnsfw\b|\berotic\b|\bnude\b|\bexplicit\b",
    )
    .unwrap()
});

/// Whether the text trips the minor+sexual-content block. Both keyword
/// groups must match independently.
pub fn is_blocked(text: &str) -> bool {
    MINOR_AGE.is_match(text) && SEXUAL_CONTENT.is_match(text)
}
