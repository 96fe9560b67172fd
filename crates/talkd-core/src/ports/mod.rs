//! Port traits — the seams between the core domain and its adapters.
//!
//! Implementations live outside this crate (`talkd-voice` for the pipeline,
//! transport crates or test harnesses for emitters); the traits here keep the
//! dependency arrow pointing inward.

mod event_emitter;
mod talk;

pub use event_emitter::{ChannelEmitter, NoopEmitter, SpeechEventEmitter};
pub use talk::{SpeechStatus, TalkPort, TalkPortError};
