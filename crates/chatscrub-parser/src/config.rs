//! Parser configuration
//!
//! All parser behavior that used to live in process-wide state is carried
//! by an explicit [`ParserConfig`] the host constructs once and threads
//! through every `parse` call.

use chatscrub_core::{Role, NARRATOR};

/// Alias used for the player when the host configured no names.
pub const DEFAULT_PLAYER_ALIAS: &str = "플레이어";

/// Reserved line prefix that forces attribution to the primary player.
pub const PLAYER_MARKER: &str = "⟦PLAYER⟧";

/// Fixed aliases that always resolve to the player role, regardless of the
/// configured name list.
pub const SYSTEM_ALIASES: &[&str] = &["player", "user", "유저", "플레이어", "나"];

/// Maps a normalized line index to the collector block it came from.
pub type OriginMap = Box<dyn Fn(usize) -> Option<usize> + Send + Sync>;

/// Explicit parser configuration.
pub struct ParserConfig {
    /// Player aliases; element 0 is the primary alias
    pub player_names: Vec<String>,

    /// Optional line-index → block-index mapping for provenance
    pub origin_map: Option<OriginMap>,

    /// Longest line the trailing-fragment merge will absorb (chars)
    pub trailing_fragment_max_len: usize,

    /// Word count at which an unattributed line reads as narrative
    pub narrative_min_words: usize,

    /// Longest `#` line treated as a title candidate (chars)
    pub heading_max_len: usize,

    /// Longest string the name-likelihood check accepts (chars)
    pub name_max_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            player_names: Vec::new(),
            origin_map: None,
            trailing_fragment_max_len: 30,
            narrative_min_words: 4,
            heading_max_len: 80,
            name_max_len: 20,
        }
    }
}

impl ParserConfig {
    /// Configuration with the given player aliases.
    pub fn with_player_names(names: Vec<String>) -> Self {
        Self {
            player_names: names,
            ..Self::default()
        }
    }

    /// The primary player alias.
    pub fn primary_alias(&self) -> &str {
        self.player_names
            .first()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_PLAYER_ALIAS)
    }

    /// Resolve a speaker name to a role against the active alias set.
    pub fn resolve_role(&self, speaker: &str) -> Role {
        if speaker == NARRATOR {
            return Role::Narration;
        }
        let lowered = speaker.trim().to_lowercase();
        let is_player = SYSTEM_ALIASES.iter().any(|a| *a == lowered)
            || self
                .player_names
                .iter()
                .any(|n| n.trim().to_lowercase() == lowered);
        if is_player {
            Role::Player
        } else {
            Role::Npc
        }
    }
}

impl std::fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserConfig")
            .field("player_names", &self.player_names)
            .field("origin_map", &self.origin_map.is_some())
            .field("trailing_fragment_max_len", &self.trailing_fragment_max_len)
            .field("narrative_min_words", &self.narrative_min_words)
            .field("heading_max_len", &self.heading_max_len)
            .field("name_max_len", &self.name_max_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_alias_fallback() {
        let config = ParserConfig::default();
        assert_eq!(config.primary_alias(), DEFAULT_PLAYER_ALIAS);

        let config = ParserConfig::with_player_names(vec!["하늘".to_string()]);
        assert_eq!(config.primary_alias(), "하늘");
    }

    #[test]
    fn test_role_resolution() {
        let config = ParserConfig::with_player_names(vec!["하늘".to_string()]);

        assert_eq!(config.resolve_role("하늘"), Role::Player);
        assert_eq!(config.resolve_role("User"), Role::Player);
        assert_eq!(config.resolve_role("플레이어"), Role::Player);
        assert_eq!(config.resolve_role("민수"), Role::Npc);
        assert_eq!(config.resolve_role(NARRATOR), Role::Narration);
    }

    #[test]
    fn test_role_resolution_is_case_insensitive() {
        let config = ParserConfig::with_player_names(vec!["Aria".to_string()]);
        assert_eq!(config.resolve_role("aria"), Role::Player);
        assert_eq!(config.resolve_role("ARIA"), Role::Player);
    }
}
