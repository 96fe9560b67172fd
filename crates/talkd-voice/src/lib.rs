#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod engine;
pub mod error;
pub mod goal;
pub mod orchestrator;
pub mod params;
pub mod service;
pub mod sink;
pub mod slots;
pub mod streamer;

// Re-export key types for convenience
pub use engine::{
    AudioChunk, BYTES_PER_SECOND, ChunkStream, EngineStatus, FileFormat, LoadedVoice,
    SAMPLE_RATE, SynthesisEngine, VoiceLoader,
};
pub use error::SpeechError;
pub use goal::{Goal, GoalState};
pub use orchestrator::TalkOrchestrator;
pub use params::VoiceParams;
pub use service::TalkService;
pub use sink::{PcmSink, WavFileSink};
pub use slots::SpeakerSlots;
pub use streamer::SpeechStreamer;
