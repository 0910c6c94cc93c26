//! ChatScrub Transcript Parser
//!
//! Turns loosely structured transcript text scraped from a chat UI into a
//! canonical, speaker-attributed turn sequence:
//! - Line normalization (endings, fences, exotic whitespace)
//! - Priority-ordered line classification with bounded lookahead
//! - Turn merging and scene grouping
//! - Summary meta derivation

pub mod classify;
pub mod config;
pub mod meta;
pub mod normalize;
pub mod parser;

pub use classify::{classify, LineKind};
pub use config::{ParserConfig, DEFAULT_PLAYER_ALIAS, PLAYER_MARKER, SYSTEM_ALIASES};
pub use meta::derive_meta;
pub use parser::{parse, parse_session, HeaderHint, MetaHints, ParseOutcome};
