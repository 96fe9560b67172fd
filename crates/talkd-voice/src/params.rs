//! Voice parameter normalization.
//!
//! The engine accepts four integer parameters, each with a fixed admissible
//! range. Anything outside a range means "leave this at the engine default" —
//! that is how operators disable a parameter, not an error.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use talkd_core::TalkConfig;

/// Admissible pitch values.
pub const PITCH_RANGE: RangeInclusive<i32> = 50..=200;

/// Admissible speaking-speed values.
pub const SPEED_RANGE: RangeInclusive<i32> = 50..=400;

/// Admissible volume values.
pub const VOLUME_RANGE: RangeInclusive<i32> = 0..=500;

/// Admissible inter-sentence pause values (milliseconds).
pub const PAUSE_RANGE: RangeInclusive<i32> = 0..=65_535;

/// Normalized voice parameters, immutable per `speak` call.
///
/// `None` means "engine default"; a `Some` value is guaranteed to sit inside
/// the admissible range for its field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceParams {
    /// Voice pitch, within [`PITCH_RANGE`].
    pub pitch: Option<i32>,
    /// Speaking speed, within [`SPEED_RANGE`].
    pub speed: Option<i32>,
    /// Output volume, within [`VOLUME_RANGE`].
    pub volume: Option<i32>,
    /// Inter-sentence pause in milliseconds, within [`PAUSE_RANGE`].
    pub pause: Option<i32>,
}

impl VoiceParams {
    /// Normalize raw integers, mapping out-of-range values to unset.
    #[must_use]
    pub fn new(pitch: i32, speed: i32, volume: i32, pause: i32) -> Self {
        Self {
            pitch: normalize(pitch, &PITCH_RANGE),
            speed: normalize(speed, &SPEED_RANGE),
            volume: normalize(volume, &VOLUME_RANGE),
            pause: normalize(pause, &PAUSE_RANGE),
        }
    }

    /// Build parameters from the raw integers in a [`TalkConfig`].
    #[must_use]
    pub fn from_config(config: &TalkConfig) -> Self {
        Self::new(config.pitch, config.speed, config.volume, config.pause)
    }

    /// Parameters with every field left at the engine default.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            pitch: None,
            speed: None,
            volume: None,
            pause: None,
        }
    }
}

fn normalize(value: i32, range: &RangeInclusive<i32>) -> Option<i32> {
    range.contains(&value).then_some(value)
}
