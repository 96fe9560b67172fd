//! Speaker configuration: voice fallback lists and raw voice parameters.
//!
//! These are pure domain types with no infrastructure dependencies. The
//! pipeline crate normalizes the raw integers into engine parameters; this
//! module only records what the operator asked for.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Ordered voice candidates tried for Japanese until one loads.
pub const DEFAULT_JAPANESE_VOICES: &[&str] = &["haruka"];

/// Ordered voice candidates tried for English until one loads.
pub const DEFAULT_ENGLISH_VOICES: &[&str] = &["julie"];

/// Sentinel for "leave this parameter at the engine default".
///
/// Any value outside a parameter's admissible range means unset; `-1` is the
/// conventional spelling since no parameter admits negatives.
pub const PARAM_UNSET: i32 = -1;

/// Speaker configuration.
///
/// All fields have serde defaults so a partial config file (or an empty one)
/// deserializes cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TalkConfig {
    /// Voice names tried in order for the Japanese slot.
    pub japanese_voices: Vec<String>,

    /// Voice names tried in order for the English slot.
    pub english_voices: Vec<String>,

    /// Voice pitch (admissible 50–200; out of range means engine default).
    pub pitch: i32,

    /// Speaking speed (admissible 50–400; out of range means engine default).
    pub speed: i32,

    /// Output volume (admissible 0–500; out of range means engine default).
    pub volume: i32,

    /// Inter-sentence pause in milliseconds (admissible 0–65535; out of range
    /// means engine default).
    pub pause: i32,
}

impl Default for TalkConfig {
    fn default() -> Self {
        Self {
            japanese_voices: DEFAULT_JAPANESE_VOICES.iter().map(|&v| v.to_owned()).collect(),
            english_voices: DEFAULT_ENGLISH_VOICES.iter().map(|&v| v.to_owned()).collect(),
            pitch: PARAM_UNSET,
            speed: PARAM_UNSET,
            volume: PARAM_UNSET,
            pause: PARAM_UNSET,
        }
    }
}

impl TalkConfig {
    /// The configured voice candidate list for `language`.
    #[must_use]
    pub fn voices(&self, language: Language) -> &[String] {
        match language {
            Language::Japanese => &self.japanese_voices,
            Language::English => &self.english_voices,
        }
    }
}
