//! Structured snapshot wire types
//!
//! The collector can hand over an already part-typed representation of each
//! message alongside the flat raw text. These types mirror its JSON shape
//! (camelCase keys, `type` tag on parts) and are passed through the privacy
//! pipeline untouched except for their string content.

use serde::{Deserialize, Serialize};

/// One collector-structured message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredMessage {
    pub id: String,
    pub role: String,
    pub speaker: String,

    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// One typed part of a structured message (paragraph, list, image, ...).
///
/// Only string-valued content fields participate in redaction; `part_type`,
/// `flavor`, and `role` are structural tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub part_type: String,

    #[serde(default)]
    pub flavor: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,

    #[serde(default)]
    pub lines: Vec<String>,

    /// Pre-part-model line content, still emitted by older collectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_lines: Option<Vec<String>>,

    /// List items for list-flavored parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,

    /// Free text for parts without line structure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Alt text for image parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,

    /// Caption/title for captioned parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
