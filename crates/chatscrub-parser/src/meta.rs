//! Summary meta derivation
//!
//! Pure fold over the parser's hints and turn sequence.

use crate::config::ParserConfig;
use crate::parser::MetaHints;
use chatscrub_core::{Channel, ChannelCounts, Role, TranscriptMeta, TranscriptTurn};

const UNKNOWN: &str = "unknown";

/// Derive session summary metadata from parse output.
pub fn derive_meta(
    hints: &MetaHints,
    turns: &[TranscriptTurn],
    config: &ParserConfig,
) -> TranscriptMeta {
    let (date, mode, place) = match &hints.header {
        Some(h) => (h.when.clone(), h.mode.clone(), h.place.clone()),
        None => (
            UNKNOWN.to_string(),
            UNKNOWN.to_string(),
            UNKNOWN.to_string(),
        ),
    };

    let title = hints
        .titles
        .iter()
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| Some(format!("{place} session")));

    let mut actors: Vec<String> = Vec::new();
    for turn in turns {
        if matches!(turn.role, Role::Player | Role::Npc) && !actors.contains(&turn.speaker) {
            actors.push(turn.speaker.clone());
        }
    }

    let user = turns.iter().filter(|t| t.channel == Channel::User).count();
    let llm = turns.len() - user;

    TranscriptMeta {
        date,
        mode,
        place,
        title,
        actors,
        player: config.primary_alias().to_string(),
        turn_count: user,
        message_count: turns.len(),
        channel_counts: ChannelCounts { user, llm },
    }
}
