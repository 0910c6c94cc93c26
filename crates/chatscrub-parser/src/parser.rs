//! Transcript parse state machine
//!
//! Walks the normalized line list through the priority classifier, holding
//! two pieces of cross-line state: the pending speaker (last attributed
//! name, used to claim otherwise unclassifiable lines) and the bare-name
//! lookahead buffer. Parsing never fails; every line lands in some turn or
//! is deliberately discarded.

use crate::classify::{classify, ends_with_closing_quote, strip_quotes, LineKind};
use crate::config::ParserConfig;
use crate::meta::derive_meta;
use crate::normalize::normalize_lines;
use chatscrub_core::{Provenance, Role, TranscriptSession, TranscriptTurn, NARRATOR};

/// First header line captures, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderHint {
    pub when: String,
    pub mode: String,
    pub place: String,
    pub rest: Option<String>,
}

/// Everything the parser learned that is not a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaHints {
    /// First header match
    pub header: Option<HeaderHint>,

    /// Title candidates, in order of appearance
    pub titles: Vec<String>,

    /// Record code strings, in order of appearance
    pub codes: Vec<String>,
}

/// Result of one parse run.
#[derive(Debug)]
pub struct ParseOutcome {
    pub turns: Vec<TranscriptTurn>,
    pub warnings: Vec<String>,
    pub hints: MetaHints,
}

struct ParseState<'a> {
    config: &'a ParserConfig,
    turns: Vec<TranscriptTurn>,
    warnings: Vec<String>,
    hints: MetaHints,
    scene_id: u32,
    pending: Option<(String, Role)>,
    player_turn_seen: bool,
}

impl<'a> ParseState<'a> {
    fn new(config: &'a ParserConfig) -> Self {
        Self {
            config,
            turns: Vec::new(),
            warnings: Vec::new(),
            hints: MetaHints::default(),
            scene_id: 0,
            pending: None,
            player_turn_seen: false,
        }
    }

    /// Emit a turn, merging into the previous turn when it has the same
    /// non-narration speaker and role.
    fn emit(&mut self, speaker: String, role: Role, text: String, lines: &[usize]) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }

        if role != Role::Narration {
            if let Some(last) = self.turns.last_mut() {
                if last.role == role && last.speaker == speaker {
                    last.append_text(&text);
                    record_provenance(self.config, &mut last.provenance, lines);
                    return;
                }
            }
        }

        if role == Role::Player {
            if self.player_turn_seen {
                self.scene_id += 1;
            } else {
                self.player_turn_seen = true;
            }
        }

        let mut turn = TranscriptTurn::new(speaker, role, text, self.scene_id);
        record_provenance(self.config, &mut turn.provenance, lines);
        self.turns.push(turn);
    }

    fn emit_narration(&mut self, text: String, lines: &[usize]) {
        self.emit(NARRATOR.to_string(), Role::Narration, text, lines);
    }

    /// Append a trailing fragment onto the last turn, if any. Returns false
    /// when there is no turn to extend.
    fn merge_trailing(&mut self, text: &str, line: usize) -> bool {
        let Some(last) = self.turns.last_mut() else {
            return false;
        };
        last.append_text(text);
        record_provenance(self.config, &mut last.provenance, &[line]);
        true
    }
}

/// Record source lines (and mapped collector blocks) onto a provenance set.
fn record_provenance(config: &ParserConfig, prov: &mut Provenance, lines: &[usize]) {
    for &idx in lines {
        prov.record_line(idx);
        if let Some(map) = &config.origin_map {
            if let Some(block) = map(idx) {
                prov.record_block(block);
            }
        }
    }
}

/// Bare-name lookahead: buffer dialogue lines for `speaker` until a
/// structural line interrupts or a buffered line does not close a quote.
/// Returns the buffered (index, text) pairs and the next unconsumed line.
fn run_lookahead(
    lines: &[String],
    start: usize,
    config: &ParserConfig,
) -> (Vec<(usize, String)>, usize) {
    let mut buffered = Vec::new();
    let mut j = start;

    while j < lines.len() {
        let line = lines[j].trim();
        if line.is_empty() {
            break;
        }
        let kind = classify(line, config);
        let interrupts = matches!(
            kind,
            LineKind::Header { .. }
                | LineKind::BreakMarker
                | LineKind::Noise
                | LineKind::BareName { .. }
                | LineKind::ForcedPlayer { .. }
        );
        if interrupts {
            break;
        }

        buffered.push((j, strip_quotes(line).to_string()));
        j += 1;

        // A line that does not close a quotation is the last continuation.
        if !ends_with_closing_quote(line) {
            break;
        }
    }

    (buffered, j)
}

/// Parse raw transcript text into an ordered turn sequence plus hints.
/// Never fails; unparseable lines degrade to narration.
pub fn parse(raw: &str, config: &ParserConfig) -> ParseOutcome {
    let mut state = ParseState::new(config);

    if raw.trim().is_empty() {
        state.warnings.push("empty transcript input".to_string());
        return ParseOutcome {
            turns: state.turns,
            warnings: state.warnings,
            hints: state.hints,
        };
    }

    let lines = normalize_lines(raw);
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        match classify(line, config) {
            LineKind::Header {
                when,
                mode,
                place,
                rest,
            } => {
                if state.hints.header.is_none() {
                    state.hints.header = Some(HeaderHint {
                        when,
                        mode,
                        place,
                        rest,
                    });
                }
                state.scene_id += 1;
                state.pending = None;
            }

            LineKind::Heading { title } => {
                if !title.is_empty() {
                    state.hints.titles.push(title);
                }
            }

            LineKind::RecordCode { code } => {
                state.hints.codes.push(code);
            }

            LineKind::BreakMarker => {
                state.scene_id += 1;
                state.pending = None;
            }

            LineKind::ForcedPlayer { text } => {
                let alias = config.primary_alias().to_string();
                let text = strip_quotes(&text).to_string();
                state.emit(alias, Role::Player, text, &[i]);
            }

            LineKind::Noise => {
                state.pending = None;
            }

            LineKind::Tagged { speaker, text } => {
                let role = config.resolve_role(&speaker);
                state.emit(speaker.clone(), role, text, &[i]);
                state.pending = Some((speaker, role));
            }

            LineKind::Labeled { speaker, text } => {
                let role = config.resolve_role(&speaker);
                state.emit(speaker, role, text, &[i]);
            }

            LineKind::Narrative {
                text,
                trailing_fragment,
            } => {
                if !(trailing_fragment && state.merge_trailing(&text, i)) {
                    state.emit_narration(text, &[i]);
                }
            }

            LineKind::BareName { name } => {
                let role = config.resolve_role(&name);
                let (buffered, next) = run_lookahead(&lines, i + 1, config);
                if buffered.is_empty() {
                    state.pending = Some((name, role));
                } else {
                    let indices: Vec<usize> = buffered.iter().map(|(idx, _)| *idx).collect();
                    let joined = buffered
                        .iter()
                        .map(|(_, text)| text.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    state.emit(name.clone(), role, joined, &indices);
                    state.pending = Some((name, role));
                    i = next;
                    continue;
                }
            }

            LineKind::Plain { text } => {
                if let Some((speaker, role)) = state.pending.clone() {
                    state.emit(speaker, role, text, &[i]);
                } else {
                    state.emit_narration(text, &[i]);
                }
            }
        }

        i += 1;
    }

    if !state.turns.is_empty() && state.turns.iter().all(|t| t.role == Role::Narration) {
        state
            .warnings
            .push("no attributable dialogue found; transcript is all narration".to_string());
    }

    ParseOutcome {
        turns: state.turns,
        warnings: state.warnings,
        hints: state.hints,
    }
}

/// Parse and fold into a full session in one step.
pub fn parse_session(
    raw: &str,
    config: &ParserConfig,
    source: impl Into<String>,
) -> TranscriptSession {
    let outcome = parse(raw, config);
    let meta = derive_meta(&outcome.hints, &outcome.turns, config);
    TranscriptSession {
        meta,
        turns: outcome.turns,
        warnings: outcome.warnings,
        source: source.into(),
        player_names: config.player_names.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscrub_core::Channel;

    fn config() -> ParserConfig {
        ParserConfig::with_player_names(vec!["플레이어".to_string()])
    }

    #[test]
    fn test_same_speaker_lines_merge() {
        let outcome = parse("Alice: hi\nAlice: there", &config());
        assert_eq!(outcome.turns.len(), 1);
        assert_eq!(outcome.turns[0].text, "hi there");
        assert_eq!(outcome.turns[0].speaker, "Alice");
        assert_eq!(outcome.turns[0].role, Role::Npc);
    }

    #[test]
    fn test_merge_unions_provenance() {
        let outcome = parse("Alice: hi\nAlice: there", &config());
        let prov = &outcome.turns[0].provenance;
        assert_eq!(prov.lines.iter().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_origin_map_provenance() {
        let mut cfg = config();
        cfg.origin_map = Some(Box::new(|line| Some(line * 10)));
        let outcome = parse("Alice: hi\nAlice: there", &cfg);
        let prov = &outcome.turns[0].provenance;
        assert_eq!(prov.blocks.iter().copied().collect::<Vec<_>>(), vec![0, 10]);
    }

    #[test]
    fn test_scene_increases_between_player_turns() {
        let raw = "⟦PLAYER⟧ 안녕\n민수: 반가워\n⟦PLAYER⟧ 오랜만이야";
        let outcome = parse(raw, &config());
        assert_eq!(outcome.turns.len(), 3);
        let first = outcome.turns[0].scene_id;
        let second = outcome.turns[2].scene_id;
        assert!(second > first);
    }

    #[test]
    fn test_header_and_break_bump_scene() {
        let raw = "민수: 하나\n2024.05.12 21:30 | 스토리 | 📍카페 | 기록\n민수: 둘\n[INFO]\n민수: 셋";
        let outcome = parse(raw, &config());
        // Same speaker throughout, but scene boundaries are visible on the
        // emitted turns; merging still applies since speaker/role match.
        assert_eq!(outcome.turns.len(), 1);
        assert!(outcome.hints.header.is_some());
        let header = outcome.hints.header.as_ref().unwrap();
        assert_eq!(header.place, "카페");
    }

    #[test]
    fn test_narration_never_merges() {
        let raw = "[바람이 분다]\n[새가 운다]";
        let outcome = parse(raw, &config());
        assert_eq!(outcome.turns.len(), 2);
        assert!(outcome.turns.iter().all(|t| t.role == Role::Narration));
    }

    #[test]
    fn test_bare_name_lookahead_buffers_dialogue() {
        let raw = "민수\n\"안녕하세요\"\n\"오랜만이에요\"\n정말 반가워요.\n플레이어: 응";
        let outcome = parse(raw, &config());
        assert_eq!(outcome.turns.len(), 2);
        assert_eq!(outcome.turns[0].speaker, "민수");
        assert_eq!(outcome.turns[0].text, "안녕하세요 오랜만이에요 정말 반가워요.");
        assert_eq!(
            outcome.turns[0]
                .provenance
                .lines
                .iter()
                .copied()
                .collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(outcome.turns[1].role, Role::Player);
    }

    #[test]
    fn test_bare_name_without_continuation_only_sets_pending() {
        // The unquoted continuation stops after one line; the next bare
        // name line has nothing to buffer and only arms the pending state.
        let raw = "민수\n하늘\n2024.05.12 | 일상 | 📍집 | x";
        let outcome = parse(raw, &config());
        // 민수's lookahead stops at the 하늘 name line; 하늘's lookahead
        // stops at the header; no dialogue was ever emitted.
        assert!(outcome.turns.is_empty());
    }

    #[test]
    fn test_pending_speaker_claims_plain_line() {
        let plain = "으".repeat(25);
        let raw = format!("@민수@ 안녕\n{}", plain);
        let outcome = parse(&raw, &config());
        // Claimed line merges into the tagged turn (same speaker and role)
        assert_eq!(outcome.turns.len(), 1);
        assert_eq!(outcome.turns[0].speaker, "민수");
        assert!(outcome.turns[0].text.contains(&plain));
    }

    #[test]
    fn test_noise_clears_pending() {
        let plain = "으".repeat(25);
        let raw = format!("@민수@ 안녕\n---\n{}", plain);
        let outcome = parse(&raw, &config());
        assert_eq!(outcome.turns.len(), 2);
        assert_eq!(outcome.turns[1].role, Role::Narration);
    }

    #[test]
    fn test_trailing_fragment_merges_into_previous_turn() {
        let raw = "민수: 안녕하세요\n정말로.";
        let outcome = parse(raw, &config());
        assert_eq!(outcome.turns.len(), 1);
        assert_eq!(outcome.turns[0].text, "안녕하세요 정말로.");
        assert_eq!(
            outcome.turns[0]
                .provenance
                .lines
                .iter()
                .copied()
                .collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_empty_input_warns() {
        let outcome = parse("   \n\n", &config());
        assert!(outcome.turns.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("empty"));
    }

    #[test]
    fn test_all_narration_warns() {
        let outcome = parse("[바람이 분다]", &config());
        assert_eq!(outcome.turns.len(), 1);
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("no attributable dialogue")));
    }

    #[test]
    fn test_heading_and_codes_collected() {
        let raw = "# 봄 소풍\nE-1234-5678-9012-3456\n민수: 안녕";
        let outcome = parse(raw, &config());
        assert_eq!(outcome.hints.titles, vec!["봄 소풍"]);
        assert_eq!(outcome.hints.codes, vec!["E-1234-5678-9012-3456"]);
        assert_eq!(outcome.turns.len(), 1);
    }

    #[test]
    fn test_end_to_end_korean_example() {
        let raw = "민수: 안녕\n민수: 반가워\n[조용한 바람이 분다]\n⟦PLAYER⟧ 안녕";
        let outcome = parse(raw, &config());

        assert_eq!(outcome.turns.len(), 3);

        assert_eq!(outcome.turns[0].speaker, "민수");
        assert_eq!(outcome.turns[0].role, Role::Npc);
        assert_eq!(outcome.turns[0].channel, Channel::Llm);
        assert_eq!(outcome.turns[0].text, "안녕 반가워");

        assert_eq!(outcome.turns[1].role, Role::Narration);
        assert_eq!(outcome.turns[1].text, "조용한 바람이 분다");

        assert_eq!(outcome.turns[2].speaker, "플레이어");
        assert_eq!(outcome.turns[2].role, Role::Player);
        assert_eq!(outcome.turns[2].channel, Channel::User);
        assert_eq!(outcome.turns[2].text, "안녕");
    }

    #[test]
    fn test_parse_session_invariants() {
        let raw = "민수: 안녕\n⟦PLAYER⟧ 반가워";
        let session = parse_session(raw, &config(), "collector");
        assert_eq!(session.meta.message_count, session.turns.len());
        assert_eq!(session.meta.channel_counts.user, 1);
        assert_eq!(session.meta.channel_counts.llm, 1);
        assert_eq!(session.source, "collector");
    }
}
