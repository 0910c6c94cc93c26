//! Priority-ordered line classification
//!
//! Each normalized line is consumed by exactly one branch, evaluated in a
//! fixed order. The order is a contract: reordering branches changes
//! parser output, so classification is an explicit match over [`LineKind`]
//! rather than nested conditionals, and every branch is testable on its
//! own.

use crate::config::{ParserConfig, PLAYER_MARKER};
use once_cell::sync::Lazy;
use regex::Regex;

/// Header line: `<when> | <mode> | 📍<place> | <rest>`. The first segment
/// must contain a digit so ordinary piped prose does not qualify.
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([^|]*\d[^|]*)\|([^|]+)\|\s*📍\s*([^|]+?)\s*(?:\|(.*))?$").unwrap()
});

/// Record code: one letter class and four numeric groups.
static RECORD_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Za-z]-\d{2,4}-\d{2,4}-\d{2,4}-\d{2,4}\s*$").unwrap());

static RECORD_CODE_INLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]-\d{2,4}-\d{2,4}-\d{2,4}-\d{2,4}").unwrap());

/// Tagged dialogue: `@Speaker@ text`.
static TAGGED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@([^@]+)@\s*(.*)$").unwrap());

static DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:-{3,}|={3,})\s*$").unwrap());

/// Administrative line prefixes discarded as noise.
const ADMIN_PREFIXES: &[&str] = &[
    "지도", "맵", "등장인물", "배역", "코드", "장면", "map", "cast", "codes", "scene",
];

/// Fixed placeholder strings the collector leaves where images were.
const IMAGE_PLACEHOLDERS: &[&str] = &["[이미지]", "(이미지)", "[image]", "[img]"];

const STOPWORD_LABELS: &[&str] = &[
    "http", "https", "tip", "note", "warning", "info", "ooc", "system", "시간", "장소", "날짜",
    "위치", "참고", "주의",
];

const TERMINAL_PUNCT: &[char] = &['.', '!', '?', '…', '。', '！', '？'];

const CLOSING_QUOTES: &[char] = &['"', '”', '\'', '’', '」', '』'];

const KOREAN_PARTICLES: &[char] = &['이', '가', '은', '는', '을', '를'];

const PRONOUN_PREFIXES: &[&str] = &[
    "그 ", "그녀", "그는", "그들", "당신", "너는", "네가", "he ", "she ", "they ", "you ",
];

/// The classification of one normalized line, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Session header; captures recorded as meta hints
    Header {
        when: String,
        mode: String,
        place: String,
        rest: Option<String>,
    },
    /// Short `#` heading, recorded as a title candidate
    Heading { title: String },
    /// Record code line, recorded as a code hint
    RecordCode { code: String },
    /// Explicit break marker (bracket-stripped `INFO` line)
    BreakMarker,
    /// Line carrying the reserved player marker, marker stripped
    ForcedPlayer { text: String },
    /// Meta/noise line, discarded
    Noise,
    /// `@Speaker@ text` dialogue
    Tagged { speaker: String, text: String },
    /// `Label: text` / `Label - text` dialogue
    Labeled { speaker: String, text: String },
    /// Narration beat; `trailing_fragment` marks a short punctuated line
    /// eligible for merging into the preceding turn
    Narrative { text: String, trailing_fragment: bool },
    /// Bare name line, opens the dialogue lookahead
    BareName { name: String },
    /// Nothing matched; pending-speaker carry-over or narration fallback
    Plain { text: String },
}

/// Classify one normalized, non-blank line. First match wins.
pub fn classify(line: &str, config: &ParserConfig) -> LineKind {
    let trimmed = line.trim();

    // 1. Header
    if let Some(caps) = HEADER.captures(trimmed) {
        return LineKind::Header {
            when: caps[1].trim().to_string(),
            mode: caps[2].trim().to_string(),
            place: caps[3].trim().to_string(),
            rest: caps
                .get(4)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
        };
    }

    // 2. Short heading
    if trimmed.starts_with('#') && trimmed.chars().count() <= config.heading_max_len {
        return LineKind::Heading {
            title: trimmed.trim_start_matches('#').trim().to_string(),
        };
    }

    // 3. Record code
    if RECORD_CODE.is_match(trimmed) {
        return LineKind::RecordCode {
            code: trimmed.to_string(),
        };
    }

    // 4. Explicit break marker
    if strip_brackets(trimmed).eq_ignore_ascii_case("INFO") {
        return LineKind::BreakMarker;
    }

    // 5. Forced-player prefix
    if let Some(rest) = trimmed.strip_prefix(PLAYER_MARKER) {
        return LineKind::ForcedPlayer {
            text: rest.trim().to_string(),
        };
    }

    // 6. Meta/noise
    if is_noise(trimmed) {
        return LineKind::Noise;
    }

    // 7. Tagged dialogue
    if let Some(caps) = TAGGED.captures(trimmed) {
        let speaker = caps[1].trim().to_string();
        if !speaker.is_empty() {
            return LineKind::Tagged {
                speaker,
                text: strip_quotes(caps[2].trim()).to_string(),
            };
        }
    }

    // 9. Label-colon dialogue (8 is the forced-player emission, handled by
    // the parser when it sees ForcedPlayer)
    if let Some((label, text)) = split_label(trimmed) {
        if is_likely_name(label, config) && !text.is_empty() {
            return LineKind::Labeled {
                speaker: label.trim().to_string(),
                text: strip_quotes(text).to_string(),
            };
        }
    }

    // 10. Narrative heuristics
    if let Some(kind) = narrative_kind(trimmed, config) {
        return kind;
    }

    // 11. Bare name line
    if is_likely_name(trimmed, config) {
        return LineKind::BareName {
            name: trimmed.to_string(),
        };
    }

    LineKind::Plain {
        text: trimmed.to_string(),
    }
}

fn narrative_kind(trimmed: &str, config: &ParserConfig) -> Option<LineKind> {
    if let Some(inner) = bracket_wrapped(trimmed) {
        return Some(LineKind::Narrative {
            text: inner.trim().to_string(),
            trailing_fragment: false,
        });
    }

    let plain_narrative = trimmed.starts_with('…')
        || trimmed.starts_with("...")
        || starts_with_pronoun(trimmed)
        || fully_quoted(trimmed)
        || has_particle_token(trimmed)
        || trimmed.split_whitespace().count() >= config.narrative_min_words;

    if plain_narrative {
        return Some(LineKind::Narrative {
            text: trimmed.to_string(),
            trailing_fragment: false,
        });
    }

    if ends_with_terminal_punct(trimmed) {
        // Punctuation alone is a weak signal; short lines like this are
        // usually the tail of the previous utterance.
        let trailing = trimmed.chars().count() <= config.trailing_fragment_max_len;
        return Some(LineKind::Narrative {
            text: trimmed.to_string(),
            trailing_fragment: trailing,
        });
    }

    None
}

fn is_noise(trimmed: &str) -> bool {
    // Actor stat rows: piped cells decorated with emoji markers
    if trimmed.contains('|') && contains_emoji(trimmed) {
        return true;
    }

    let lowered = trimmed.to_lowercase();
    if IMAGE_PLACEHOLDERS.iter().any(|p| lowered == *p) {
        return true;
    }

    if RECORD_CODE_INLINE.is_match(trimmed) {
        return true;
    }

    for prefix in ADMIN_PREFIXES {
        if let Some(rest) = lowered.strip_prefix(prefix) {
            if rest.starts_with(':') || rest.starts_with('：') {
                return true;
            }
        }
    }

    DIVIDER.is_match(trimmed)
}

/// Split `Label: text` or `Label - text`; the colon form wins.
fn split_label(line: &str) -> Option<(&str, &str)> {
    if let Some(idx) = line.find([':', '：']) {
        let (label, rest) = line.split_at(idx);
        let text = rest[rest.char_indices().nth(1).map(|(i, _)| i).unwrap_or(rest.len())..].trim();
        return Some((label.trim(), text));
    }
    if let Some(idx) = line.find(" - ") {
        return Some((line[..idx].trim(), line[idx + 3..].trim()));
    }
    None
}

/// Heuristic name-likelihood check: short, at most two tokens, free of
/// sentence punctuation and digits, not a known stopword.
pub fn is_likely_name(s: &str, config: &ParserConfig) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.chars().count() > config.name_max_len {
        return false;
    }
    if trimmed.split_whitespace().count() > 2 {
        return false;
    }
    if trimmed.chars().any(|c| {
        TERMINAL_PUNCT.contains(&c)
            || CLOSING_QUOTES.contains(&c)
            || c.is_ascii_digit()
            || matches!(c, ',' | ';' | '“' | '‘' | '「' | '『' | '@' | '#' | '|')
    }) {
        return false;
    }
    let lowered = trimmed.to_lowercase();
    !STOPWORD_LABELS.iter().any(|w| *w == lowered)
}

/// Strip one pair of matching wrapping quotes, if present.
pub fn strip_quotes(s: &str) -> &str {
    const PAIRS: &[(char, char)] = &[
        ('"', '"'),
        ('“', '”'),
        ('\'', '\''),
        ('‘', '’'),
        ('「', '」'),
        ('『', '』'),
    ];
    let trimmed = s.trim();
    for (open, close) in PAIRS {
        if let Some(inner) = trimmed
            .strip_prefix(*open)
            .and_then(|r| r.strip_suffix(*close))
        {
            if !inner.is_empty() {
                return inner.trim();
            }
        }
    }
    trimmed
}

/// Whether the line is wrapped in a single matching bracket pair.
fn bracket_wrapped(s: &str) -> Option<&str> {
    const PAIRS: &[(char, char)] = &[('[', ']'), ('(', ')'), ('【', '】'), ('〈', '〉')];
    for (open, close) in PAIRS {
        if let Some(inner) = s.strip_prefix(*open).and_then(|r| r.strip_suffix(*close)) {
            if !inner.contains(*open) && !inner.contains(*close) && !inner.is_empty() {
                return Some(inner);
            }
        }
    }
    None
}

/// Strip any leading/trailing bracket characters and whitespace.
fn strip_brackets(s: &str) -> &str {
    s.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '[' | ']' | '(' | ')' | '【' | '】' | '⟦' | '⟧' | '〈' | '〉')
    })
}

pub(crate) fn ends_with_terminal_punct(s: &str) -> bool {
    s.chars().last().is_some_and(|c| TERMINAL_PUNCT.contains(&c))
}

pub(crate) fn ends_with_closing_quote(s: &str) -> bool {
    s.chars().last().is_some_and(|c| CLOSING_QUOTES.contains(&c))
}

fn fully_quoted(s: &str) -> bool {
    let mut chars = s.chars();
    let first = chars.next();
    let last = chars.last();
    matches!(
        (first, last),
        (Some('"'), Some('"'))
            | (Some('“'), Some('”'))
            | (Some('「'), Some('」'))
            | (Some('『'), Some('』'))
    )
}

fn starts_with_pronoun(s: &str) -> bool {
    let lowered = s.to_lowercase();
    PRONOUN_PREFIXES.iter().any(|p| lowered.starts_with(p))
}

/// Whether any token carries a Korean subject/object particle suffix,
/// marking the line as a narrated noun phrase rather than dialogue.
fn has_particle_token(s: &str) -> bool {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    if tokens.len() < 2 {
        return false;
    }
    tokens.iter().any(|t| {
        let mut chars = t.chars();
        let last = chars.next_back();
        // A lone particle char is not a suffix
        last.is_some_and(|c| KOREAN_PARTICLES.contains(&c)) && chars.next().is_some()
    })
}

fn contains_emoji(s: &str) -> bool {
    s.chars().any(|c| {
        let cp = c as u32;
        (0x1F300..=0x1FAFF).contains(&cp)
            || (0x2600..=0x27BF).contains(&cp)
            || cp == 0x2764
            || cp == 0xFE0F
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ParserConfig {
        ParserConfig::default()
    }

    #[test]
    fn test_header_line() {
        let kind = classify("2024.05.12 21:30 | 스토리 | 📍강변 카페 | 3명", &config());
        assert_eq!(
            kind,
            LineKind::Header {
                when: "2024.05.12 21:30".to_string(),
                mode: "스토리".to_string(),
                place: "강변 카페".to_string(),
                rest: Some("3명".to_string()),
            }
        );
    }

    #[test]
    fn test_header_requires_digit_in_first_segment() {
        // A stat row with pipes and an emoji must not read as a header
        let kind = classify("민수 | 호감도 ❤️ | 📍강변", &config());
        assert_eq!(kind, LineKind::Noise);
    }

    #[test]
    fn test_short_heading() {
        let kind = classify("## 봄 소풍", &config());
        assert_eq!(
            kind,
            LineKind::Heading {
                title: "봄 소풍".to_string()
            }
        );
    }

    #[test]
    fn test_overlong_heading_is_not_a_title() {
        let long = format!("# {}", "가".repeat(90));
        assert!(!matches!(
            classify(&long, &config()),
            LineKind::Heading { .. }
        ));
    }

    #[test]
    fn test_record_code() {
        let kind = classify("E-1234-5678-9012-3456", &config());
        assert_eq!(
            kind,
            LineKind::RecordCode {
                code: "E-1234-5678-9012-3456".to_string()
            }
        );
    }

    #[test]
    fn test_break_marker_bracket_stripped() {
        assert_eq!(classify("[INFO]", &config()), LineKind::BreakMarker);
        assert_eq!(classify("⟦info⟧", &config()), LineKind::BreakMarker);
        assert_eq!(classify("INFO", &config()), LineKind::BreakMarker);
    }

    #[test]
    fn test_forced_player_marker() {
        let kind = classify("⟦PLAYER⟧ 안녕", &config());
        assert_eq!(
            kind,
            LineKind::ForcedPlayer {
                text: "안녕".to_string()
            }
        );
    }

    #[test]
    fn test_noise_lines() {
        assert_eq!(classify("체력 💕 80 | 민수", &config()), LineKind::Noise);
        assert_eq!(classify("[이미지]", &config()), LineKind::Noise);
        assert_eq!(classify("코드: E-12-34-56-78 발급", &config()), LineKind::Noise);
        assert_eq!(classify("등장인물: 민수, 하늘", &config()), LineKind::Noise);
        assert_eq!(classify("---", &config()), LineKind::Noise);
        assert_eq!(classify("=====", &config()), LineKind::Noise);
    }

    #[test]
    fn test_tagged_dialogue() {
        let kind = classify("@민수@ \"안녕, 오랜만이야\"", &config());
        assert_eq!(
            kind,
            LineKind::Tagged {
                speaker: "민수".to_string(),
                text: "안녕, 오랜만이야".to_string(),
            }
        );
    }

    #[test]
    fn test_labeled_dialogue() {
        let kind = classify("민수: 안녕", &config());
        assert_eq!(
            kind,
            LineKind::Labeled {
                speaker: "민수".to_string(),
                text: "안녕".to_string(),
            }
        );

        let kind = classify("민수 - 잘 지냈어", &config());
        assert_eq!(
            kind,
            LineKind::Labeled {
                speaker: "민수".to_string(),
                text: "잘 지냈어".to_string(),
            }
        );
    }

    #[test]
    fn test_stopword_label_is_not_dialogue() {
        assert!(!matches!(
            classify("참고: 다음 장면으로 이동", &config()),
            LineKind::Labeled { .. }
        ));
        assert!(!matches!(
            classify("https://example.com/page", &config()),
            LineKind::Labeled { .. }
        ));
    }

    #[test]
    fn test_narrative_bracket_wrapped() {
        let kind = classify("[조용한 바람이 분다]", &config());
        assert_eq!(
            kind,
            LineKind::Narrative {
                text: "조용한 바람이 분다".to_string(),
                trailing_fragment: false,
            }
        );
    }

    #[test]
    fn test_narrative_particle_phrase() {
        assert!(matches!(
            classify("햇살이 눈부시다", &config()),
            LineKind::Narrative { trailing_fragment: false, .. }
        ));
    }

    #[test]
    fn test_narrative_pronoun_led() {
        assert!(matches!(
            classify("그녀의 손끝이 떨렸다", &config()),
            LineKind::Narrative { .. }
        ));
        assert!(matches!(
            classify("She looked away slowly", &config()),
            LineKind::Narrative { .. }
        ));
    }

    #[test]
    fn test_narrative_word_count() {
        assert!(matches!(
            classify("through the window came soft light", &config()),
            LineKind::Narrative { .. }
        ));
    }

    #[test]
    fn test_fully_quoted_is_narrative() {
        assert!(matches!(
            classify("\"어서와\"", &config()),
            LineKind::Narrative { .. }
        ));
    }

    #[test]
    fn test_short_punctuated_line_is_trailing_fragment() {
        let kind = classify("정말로.", &config());
        assert_eq!(
            kind,
            LineKind::Narrative {
                text: "정말로.".to_string(),
                trailing_fragment: true,
            }
        );
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(
            classify("민수", &config()),
            LineKind::BareName {
                name: "민수".to_string()
            }
        );
    }

    #[test]
    fn test_plain_fallthrough() {
        // Too long for a name, too few words for narrative, no punctuation
        let line = "으".repeat(25);
        assert_eq!(
            classify(&line, &config()),
            LineKind::Plain { text: line.clone() }
        );
    }
}
