//! ChatScrub Privacy Pipeline
//!
//! Composes the redaction engine and the content policy gate over a whole
//! session: turns, meta, warnings, player names, the raw text, and an
//! optional structured snapshot, all under one shared counts accumulator.
//! The input session is never mutated; the caller receives one consistent
//! sanitized bundle plus the block decision.

use chatscrub_core::{MessagePart, Result, StructuredMessage, TranscriptSession};
use chatscrub_pii::{
    is_blocked, PrivacyProfile, RedactionCounts, RedactionEngine, TermListConfig,
};
use serde::{Deserialize, Serialize};

/// Everything one pipeline run produces. Writers consume the sanitized
/// fields only; `blocked` is a hard stop the calling workflow must honor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// The profile that was actually applied (after key resolution)
    pub profile: PrivacyProfile,

    /// Sanitized deep copy of the input session
    pub session: TranscriptSession,

    /// Sanitized raw text
    pub raw: String,

    /// Sanitized structured snapshot, when one was supplied
    pub structured: Option<Vec<StructuredMessage>>,

    /// Sanitized player aliases
    pub player_names: Vec<String>,

    /// Per-category redaction counts for the whole run
    pub counts: RedactionCounts,

    /// Sum of all counts
    pub total_redactions: u64,

    /// Content policy gate decision, computed from the unredacted raw text
    pub blocked: bool,
}

impl PipelineReport {
    /// The human-readable audit line for this run.
    pub fn summary(&self) -> String {
        self.counts.summary()
    }
}

/// One compiled pipeline: a resolved profile plus its redaction engine.
pub struct PrivacyPipeline {
    engine: RedactionEngine,
}

impl PrivacyPipeline {
    /// Resolve the profile key (unknown keys fall back to the default) and
    /// compile the engine. Term-list validation errors surface here.
    pub fn new(profile_key: &str, terms: TermListConfig) -> Result<Self> {
        let profile = PrivacyProfile::resolve(profile_key);
        let engine = RedactionEngine::new(profile, &terms)?;
        Ok(Self { engine })
    }

    pub fn profile(&self) -> &PrivacyProfile {
        self.engine.profile()
    }

    /// Run the pipeline over one session.
    ///
    /// The block decision always comes from the original `raw` parameter,
    /// never from redacted text, so masking cannot bypass the gate.
    pub fn run(
        &self,
        session: &TranscriptSession,
        raw: &str,
        structured: Option<&[StructuredMessage]>,
    ) -> PipelineReport {
        let mut counts = RedactionCounts::new();

        let mut session = session.clone();
        self.sanitize_session(&mut session, &mut counts);

        let sanitized_raw = self.engine.redact(raw, &mut counts);
        let structured =
            structured.map(|msgs| self.sanitize_structured(msgs, &mut counts));

        let blocked = is_blocked(raw);
        if blocked {
            tracing::warn!(
                profile = %self.engine.profile().key,
                input_len = raw.len(),
                "content policy gate blocked export"
            );
        }
        tracing::debug!(
            profile = %self.engine.profile().key,
            input_len = raw.len(),
            total_redactions = counts.total(),
            blocked,
            "privacy pipeline run complete"
        );

        let player_names = session.player_names.clone();
        PipelineReport {
            profile: self.engine.profile().clone(),
            total_redactions: counts.total(),
            raw: sanitized_raw,
            structured,
            player_names,
            counts,
            session,
            blocked,
        }
    }

    fn sanitize_session(&self, session: &mut TranscriptSession, counts: &mut RedactionCounts) {
        for turn in &mut session.turns {
            turn.text = self.engine.redact(&turn.text, counts);
            turn.speaker = self.engine.redact(&turn.speaker, counts);
        }

        let meta = &mut session.meta;
        meta.date = self.engine.redact(&meta.date, counts);
        meta.mode = self.engine.redact(&meta.mode, counts);
        meta.place = self.engine.redact(&meta.place, counts);
        if let Some(title) = meta.title.take() {
            meta.title = Some(self.engine.redact(&title, counts));
        }
        for actor in &mut meta.actors {
            *actor = self.engine.redact(actor, counts);
        }
        meta.player = self.engine.redact(&meta.player, counts);

        for warning in &mut session.warnings {
            *warning = self.engine.redact(warning, counts);
        }
        for name in &mut session.player_names {
            *name = self.engine.redact(name, counts);
        }
    }

    fn sanitize_structured(
        &self,
        messages: &[StructuredMessage],
        counts: &mut RedactionCounts,
    ) -> Vec<StructuredMessage> {
        messages
            .iter()
            .map(|msg| {
                let mut msg = msg.clone();
                msg.speaker = self.engine.redact(&msg.speaker, counts);
                for part in &mut msg.parts {
                    self.sanitize_part(part, counts);
                }
                msg
            })
            .collect()
    }

    /// Redact the string content of one part; structural tags (type,
    /// flavor, role) pass through untouched.
    fn sanitize_part(&self, part: &mut MessagePart, counts: &mut RedactionCounts) {
        if let Some(speaker) = part.speaker.take() {
            part.speaker = Some(self.engine.redact(&speaker, counts));
        }
        for line in &mut part.lines {
            *line = self.engine.redact(line, counts);
        }
        if let Some(lines) = &mut part.legacy_lines {
            for line in lines {
                *line = self.engine.redact(line, counts);
            }
        }
        if let Some(items) = &mut part.items {
            for item in items {
                *item = self.engine.redact(item, counts);
            }
        }
        if let Some(text) = part.text.take() {
            part.text = Some(self.engine.redact(&text, counts));
        }
        if let Some(alt) = part.alt.take() {
            part.alt = Some(self.engine.redact(&alt, counts));
        }
        if let Some(title) = part.title.take() {
            part.title = Some(self.engine.redact(&title, counts));
        }
    }
}
