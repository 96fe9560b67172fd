//! Speech pipeline error types.

use std::path::PathBuf;

/// Errors that can occur in the speech pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Voice license file missing — the engine refuses to initialize.
    #[error("Voice license not found at {0}")]
    LicenseNotFound(PathBuf),

    /// No loadable synthesis library for the named voice.
    #[error("Voice library not found for \"{0}\"")]
    VoiceLibraryNotFound(String),

    /// The voice was present but the engine failed to initialize it.
    #[error("Failed to initialize voice '{voice}': {source}")]
    EngineInit { voice: String, source: anyhow::Error },

    /// Text not representable in the voice's character encoding.
    #[error("Text not encodable in the voice's character set: {0}")]
    Encoding(String),

    /// The engine reported an unexpected negative status mid-synthesis.
    #[error("Speech synthesis failed with engine status {0}")]
    Synthesis(i32),

    /// An audio sink rejected a write.
    #[error("Audio sink write failed: {0}")]
    Sink(String),

    /// The streamer has been closed (or its consumer thread has died).
    #[error("Speech streamer is closed")]
    StreamerClosed,

    /// IO error (consumer thread spawn, file output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
