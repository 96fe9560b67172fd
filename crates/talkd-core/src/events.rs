//! Canonical event union for everything the speech pipeline reports outward.
//!
//! This module is the single source of truth for events consumed by observers
//! (SSE handlers, process-local subscribers, test harnesses).
//!
//! # Wire Format
//!
//! Events are serialized with a `type` tag:
//!
//! ```json
//! { "type": "speaking_started", "text": "hello", "language": "english" }
//! ```

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Terminal result of a tracked speech request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalOutcome {
    /// The utterance's estimated duration elapsed without interruption.
    Succeeded,
    /// The request was explicitly canceled while speaking.
    Canceled,
    /// The request was preempted by a newer one, or speaking never started.
    Aborted,
}

impl GoalOutcome {
    /// Stable label for wire protocols and log fields.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Canceled => "canceled",
            Self::Aborted => "aborted",
        }
    }
}

/// The latched "what is the speaker doing" value.
///
/// Unlike [`SpeechEvent`], which is a stream, this is a single current value:
/// late subscribers immediately observe the present state. It starts as
/// [`Announcement::Idle`] before the first utterance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Announcement {
    /// The speaker is free.
    #[default]
    Idle,
    /// The speaker is reading out `text`.
    Speaking {
        /// The sentence currently being spoken.
        text: String,
    },
}

impl Announcement {
    /// Whether the speaker is free.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The announced sentence, or `""` when idle.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Speaking { text } => text,
        }
    }
}

/// Canonical event types emitted by the speech pipeline.
///
/// Each variant carries enough context to be self-describing; observers never
/// need to correlate against pipeline-internal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpeechEvent {
    /// An utterance was synthesized and its playback window has started.
    SpeakingStarted {
        /// The sentence being spoken.
        text: String,
        /// Language of the voice speaking it.
        language: Language,
    },

    /// The active utterance's estimated duration elapsed, or it was canceled;
    /// the speaker is idle again. Not emitted on preemption (a new
    /// `SpeakingStarted` supersedes it).
    SpeakingFinished,

    /// A goal request was accepted (every submission is accepted).
    GoalAccepted {
        /// Identifier of the goal, unique per orchestrator.
        #[serde(rename = "goalId")]
        goal_id: u64,
    },

    /// Periodic remaining-time feedback for the active goal.
    GoalFeedback {
        /// Identifier of the goal.
        #[serde(rename = "goalId")]
        goal_id: u64,
        /// Estimated seconds of audio left to play.
        #[serde(rename = "remainingSecs")]
        remaining_secs: f64,
    },

    /// A goal reached its terminal state.
    GoalFinished {
        /// Identifier of the goal.
        #[serde(rename = "goalId")]
        goal_id: u64,
        /// The terminal outcome.
        outcome: GoalOutcome,
    },
}

impl SpeechEvent {
    /// Get the event name for wire protocols.
    ///
    /// This provides consistent event naming across transports; observers
    /// subscribe by these strings.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::SpeakingStarted { .. } => "speech:started",
            Self::SpeakingFinished => "speech:finished",
            Self::GoalAccepted { .. } => "goal:accepted",
            Self::GoalFeedback { .. } => "goal:feedback",
            Self::GoalFinished { .. } => "goal:finished",
        }
    }
}
