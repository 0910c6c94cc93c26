//! ChatScrub Core Types
//!
//! This crate provides the fundamental types used throughout ChatScrub:
//! - Canonical transcript model (turns, sessions, meta)
//! - Structured snapshot wire types from the collector
//! - Core error types

pub mod error;
pub mod session;
pub mod structured;
pub mod turn;

pub use error::{Error, Result};
pub use session::{ChannelCounts, TranscriptMeta, TranscriptSession};
pub use structured::{MessagePart, StructuredMessage};
pub use turn::{Channel, Provenance, Role, TranscriptTurn, NARRATOR};
