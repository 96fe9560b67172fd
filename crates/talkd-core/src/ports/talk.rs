//! Talk port — trait abstraction for the inbound speech request surface.
//!
//! # Design Rules
//!
//! - DTOs here are transport-agnostic wire shapes (no `talkd-voice` types).
//! - Conversion from pipeline-native types happens inside `talkd-voice`,
//!   never here. This keeps `talkd-core` free of any dependency on the
//!   pipeline crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::GoalOutcome;

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// Snapshot of what the speaker is doing right now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechStatus {
    /// Whether an utterance is currently speaking.
    pub speaking: bool,
    /// Estimated seconds of audio left to play, if speaking.
    pub remaining_secs: Option<f64>,
    /// The sentence currently being spoken, if any.
    pub sentence: Option<String>,
    /// Whether a tracked goal is bound to the current utterance.
    pub goal_active: bool,
    /// Wire codes of the languages with a loaded voice (e.g. `["ja", "en"]`).
    pub languages: Vec<String>,
}

// ── Error ────────────────────────────────────────────────────────────────────

/// Errors returned by [`TalkPort`] operations.
///
/// Degraded conditions are deliberately *not* here: a known language with no
/// loaded voice is a logged no-op, and a goal that could not start speaking
/// resolves `Aborted` rather than erroring, mirroring the accept-everything
/// goal protocol.
#[derive(Debug, Error)]
pub enum TalkPortError {
    /// The language string is not a recognized wire code.
    #[error("Unknown language code {0:?} (expected \"ja\" or \"en\")")]
    UnknownLanguage(String),

    /// Unexpected internal error (task dispatch, runtime shutdown).
    #[error("Internal speech error: {0}")]
    Internal(String),
}

// ── Port trait ───────────────────────────────────────────────────────────────

/// Port trait for speech requests.
///
/// Implemented by `TalkService` in `talkd-voice`; consumed by whatever
/// transport fronts the process.
#[async_trait]
pub trait TalkPort: Send + Sync {
    /// Speak `text` in `language`, preempting any current utterance.
    ///
    /// Fire-and-forget: returns once synthesis has been handed to the
    /// pipeline, not when audio finishes. A language with no loaded voice
    /// degrades to a logged no-op.
    async fn say(&self, text: &str, language: &str) -> Result<(), TalkPortError>;

    /// Speak `text` in `language` and wait for the terminal outcome.
    ///
    /// The request is tracked as a goal: it resolves `Succeeded` when the
    /// estimated duration elapses, `Canceled` on [`TalkPort::cancel`], and
    /// `Aborted` when preempted by a newer request or when speaking never
    /// started.
    async fn say_and_wait(&self, text: &str, language: &str)
    -> Result<GoalOutcome, TalkPortError>;

    /// Stop the current utterance (if any) and cancel its goal (if any).
    async fn cancel(&self) -> Result<(), TalkPortError>;

    /// Return the current speaker status.
    async fn status(&self) -> Result<SpeechStatus, TalkPortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_camel_case() {
        let status = SpeechStatus {
            speaking: true,
            remaining_secs: Some(0.5),
            sentence: Some("hello".to_owned()),
            goal_active: false,
            languages: vec!["ja".to_owned(), "en".to_owned()],
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"remainingSecs\":0.5"));
        assert!(json.contains("\"goalActive\":false"));
        assert!(json.contains("\"languages\":[\"ja\",\"en\"]"));
    }
}
