#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod events;
pub mod language;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{DEFAULT_ENGLISH_VOICES, DEFAULT_JAPANESE_VOICES, PARAM_UNSET, TalkConfig};
pub use events::{Announcement, GoalOutcome, SpeechEvent};
pub use language::{Language, ParseLanguageError};
pub use ports::{
    ChannelEmitter, NoopEmitter, SpeechEventEmitter, SpeechStatus, TalkPort, TalkPortError,
};
