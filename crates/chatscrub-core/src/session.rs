//! Session model and summary metadata
//!
//! A session is one fully parsed transcript: the ordered turn sequence,
//! derived summary metadata, and any warnings the parser surfaced.

use crate::turn::TranscriptTurn;
use serde::{Deserialize, Serialize};

/// Per-channel turn counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCounts {
    pub user: usize,
    pub llm: usize,
}

/// Summary metadata derived from a parsed transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMeta {
    /// Session date/time as captured from the first header line
    pub date: String,

    /// Session mode label from the header
    pub mode: String,

    /// Place label from the header
    pub place: String,

    /// First collected title candidate, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Distinct player/npc speaker names, in order of first appearance
    pub actors: Vec<String>,

    /// Primary player alias
    pub player: String,

    /// User-channel turns
    pub turn_count: usize,

    /// All turns
    pub message_count: usize,

    /// Turns by channel
    pub channel_counts: ChannelCounts,
}

/// One parsed transcript session.
///
/// Invariant: `meta.message_count == turns.len()` and `turns` preserves the
/// original line order after merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSession {
    pub meta: TranscriptMeta,
    pub turns: Vec<TranscriptTurn>,
    pub warnings: Vec<String>,

    /// Where the raw text came from (collector identifier)
    pub source: String,

    /// Player aliases that were active during the parse
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub player_names: Vec<String>,
}
