//! ChatScrub PII Redaction
//!
//! This crate provides the privacy layer of ChatScrub:
//! - Named privacy profiles (rule toggles)
//! - Blacklist/whitelist term configuration with policy validation
//! - The redaction engine (whitelist protection, validator-gated rules,
//!   blacklist augmentation)
//! - The content policy gate (a block decision, not a redaction)

pub mod config;
pub mod counts;
pub mod engine;
pub mod gate;
pub mod profile;
pub mod rules;

pub use config::{TermListConfig, MAX_TERMS, MAX_TERM_LEN};
pub use counts::{RedactionCounts, NO_REDACTIONS_SUMMARY};
pub use engine::RedactionEngine;
pub use gate::is_blocked;
pub use profile::{PrivacyProfile, DEFAULT_PROFILE_KEY};
pub use rules::{placeholder, RedactionRule, CUSTOM_CATEGORY};
