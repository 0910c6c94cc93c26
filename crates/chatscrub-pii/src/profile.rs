//! Privacy profiles
//!
//! A profile is a named bundle of rule toggles. The set is closed; exactly
//! one profile is active per pipeline run, and unrecognized keys silently
//! resolve to the default so a stale host setting can never disable
//! redaction outright.

use serde::{Deserialize, Serialize};

/// Key of the profile used when resolution fails.
pub const DEFAULT_PROFILE_KEY: &str = "standard";

/// One named redaction profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyProfile {
    pub key: String,
    pub label: String,

    /// Mask Korean address-hint phrases
    pub mask_address_hints: bool,

    /// Mask self-harm/violence keywords in narrative text
    pub mask_narrative_sensitive: bool,
}

impl PrivacyProfile {
    /// Baseline profile: pattern-backed PII only.
    pub fn standard() -> Self {
        Self {
            key: "standard".to_string(),
            label: "표준 보호".to_string(),
            mask_address_hints: false,
            mask_narrative_sensitive: false,
        }
    }

    /// Maximum-protection profile: addresses and sensitive narrative terms
    /// masked on top of the standard rules.
    pub fn safe() -> Self {
        Self {
            key: "safe".to_string(),
            label: "안전 보호".to_string(),
            mask_address_hints: true,
            mask_narrative_sensitive: true,
        }
    }

    /// The closed profile set.
    pub fn all() -> Vec<Self> {
        vec![Self::standard(), Self::safe()]
    }

    /// Resolve a profile key, falling back to the default on unknown input.
    pub fn resolve(key: &str) -> Self {
        Self::all()
            .into_iter()
            .find(|p| p.key == key.trim().to_lowercase())
            .unwrap_or_else(Self::standard)
    }
}

impl Default for PrivacyProfile {
    fn default() -> Self {
        Self::standard()
    }
}
