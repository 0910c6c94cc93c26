//! Canonical turn model
//!
//! A turn is one attributed unit of dialogue or narration. Turns carry a
//! derived channel (who "owns" the text from the host's point of view) and
//! an internal provenance record pointing back at the normalized source
//! lines that produced them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fixed sentinel speaker name for narration beats.
pub const NARRATOR: &str = "내레이션";

/// Who is speaking, resolved against the configured alias set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The human player (any configured alias)
    Player,

    /// A non-player character
    Npc,

    /// Unattributed narration
    Narration,
}

impl Role {
    /// Derive the channel from the role. `Player` text belongs to the user
    /// channel; everything else was produced by the model.
    pub fn channel(self) -> Channel {
        match self {
            Role::Player => Channel::User,
            Role::Npc | Role::Narration => Channel::Llm,
        }
    }
}

/// Origin channel of a turn, always derived from [`Role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    User,
    Llm,
}

/// Source-line provenance for a turn.
///
/// Not part of the exported shape: it is skipped during serialization and
/// exists so hosts can trace a turn back to the normalized lines (and,
/// when an origin map is configured, collector blocks) it was built from.
/// Sets are sorted and de-duplicated by construction and additive across
/// merges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Normalized line indices that contributed to the turn
    pub lines: BTreeSet<usize>,

    /// Originating collector block indices, when an origin map is set
    pub blocks: BTreeSet<usize>,
}

impl Provenance {
    /// Record one contributing source line.
    pub fn record_line(&mut self, line: usize) {
        self.lines.insert(line);
    }

    /// Record one originating collector block.
    pub fn record_block(&mut self, block: usize) {
        self.blocks.insert(block);
    }

    /// Union another provenance record into this one.
    pub fn absorb(&mut self, other: &Provenance) {
        self.lines.extend(other.lines.iter().copied());
        self.blocks.extend(other.blocks.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.blocks.is_empty()
    }
}

/// One attributed utterance or narration beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    /// Normalized display name; narration uses [`NARRATOR`]
    pub speaker: String,

    /// Speaker role against the active alias set
    pub role: Role,

    /// Derived channel, never set independently of `role`
    pub channel: Channel,

    /// Sanitized, trimmed utterance text
    pub text: String,

    /// Monotonically increasing grouping hint
    pub scene_id: u32,

    /// Internal source provenance, never exported
    #[serde(skip)]
    pub provenance: Provenance,
}

impl TranscriptTurn {
    /// Create a new turn. The channel is derived from the role.
    pub fn new(
        speaker: impl Into<String>,
        role: Role,
        text: impl Into<String>,
        scene_id: u32,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            role,
            channel: role.channel(),
            text: text.into(),
            scene_id,
            provenance: Provenance::default(),
        }
    }

    /// Create a narration turn attributed to the fixed sentinel speaker.
    pub fn narration(text: impl Into<String>, scene_id: u32) -> Self {
        Self::new(NARRATOR, Role::Narration, text, scene_id)
    }

    /// Append merged text, separated by a single space.
    pub fn append_text(&mut self, fragment: &str) {
        if self.text.is_empty() {
            self.text = fragment.to_string();
        } else if !fragment.is_empty() {
            self.text.push(' ');
            self.text.push_str(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_derivation() {
        assert_eq!(Role::Player.channel(), Channel::User);
        assert_eq!(Role::Npc.channel(), Channel::Llm);
        assert_eq!(Role::Narration.channel(), Channel::Llm);
    }

    #[test]
    fn test_narration_turn_uses_sentinel() {
        let turn = TranscriptTurn::narration("바람이 분다", 0);
        assert_eq!(turn.speaker, NARRATOR);
        assert_eq!(turn.role, Role::Narration);
        assert_eq!(turn.channel, Channel::Llm);
    }

    #[test]
    fn test_append_text_spacing() {
        let mut turn = TranscriptTurn::new("민수", Role::Npc, "안녕", 0);
        turn.append_text("반가워");
        assert_eq!(turn.text, "안녕 반가워");

        let mut empty = TranscriptTurn::new("민수", Role::Npc, "", 0);
        empty.append_text("안녕");
        assert_eq!(empty.text, "안녕");
    }

    #[test]
    fn test_provenance_absorb_is_sorted_union() {
        let mut a = Provenance::default();
        a.record_line(5);
        a.record_line(1);

        let mut b = Provenance::default();
        b.record_line(3);
        b.record_line(1);
        b.record_block(0);

        a.absorb(&b);
        assert_eq!(a.lines.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(a.blocks.iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_provenance_survives_clone() {
        let mut turn = TranscriptTurn::new("민수", Role::Npc, "안녕", 0);
        turn.provenance.record_line(7);
        turn.provenance.record_block(2);

        let cloned = turn.clone();
        assert_eq!(cloned.provenance, turn.provenance);
    }

    #[test]
    fn test_provenance_skipped_in_serialization() {
        let mut turn = TranscriptTurn::new("민수", Role::Npc, "안녕", 0);
        turn.provenance.record_line(7);

        let json = serde_json::to_value(&turn).unwrap();
        assert!(json.get("provenance").is_none());
        assert_eq!(json["speaker"], "민수");
        assert_eq!(json["role"], "npc");
        assert_eq!(json["channel"], "llm");
    }
}
