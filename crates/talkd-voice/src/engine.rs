//! Synthesis engine contracts: chunked audio, status codes, loader traits.
//!
//! The engine itself is a black box behind [`SynthesisEngine`]: given text and
//! [`VoiceParams`], it yields a lazy sequence of PCM chunks or a status code.
//! Everything in this module is the fixed call/return contract the rest of
//! the pipeline is written against.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use talkd_core::Language;

use crate::error::SpeechError;
use crate::params::VoiceParams;

/// Sample rate of all synthesized audio (Hz).
pub const SAMPLE_RATE: u32 = 16_000;

/// Bytes of S16LE mono audio per second of playback (2 bytes per sample).
pub const BYTES_PER_SECOND: u32 = SAMPLE_RATE * 2;

// ── Chunks ───────────────────────────────────────────────────────────────────

/// One synthesized unit of audio.
///
/// The buffer is S16LE mono at [`SAMPLE_RATE`]. The chunk owns its bytes —
/// engines that reuse an internal buffer must hand over a copy, never a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    /// Raw S16LE mono PCM.
    pub pcm: Vec<u8>,
}

impl AudioChunk {
    /// Wrap an owned PCM buffer.
    #[must_use]
    pub const fn new(pcm: Vec<u8>) -> Self {
        Self { pcm }
    }

    /// Play duration of this chunk, derived from its byte length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.pcm.len() as f64 / f64::from(BYTES_PER_SECOND))
    }

    /// Byte length of the PCM buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pcm.len()
    }

    /// Whether the chunk carries no audio.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pcm.is_empty()
    }
}

// ── Status codes ─────────────────────────────────────────────────────────────

/// Interpretation of a raw engine status code.
///
/// The engine reports progress through integer statuses: `1` closes the chunk
/// sequence, other non-negative values promise more data, and exactly one
/// negative code ([`EngineStatus::ZERO_LENGTH_CODE`]) is *not* an error — it
/// marks zero-length input, a valid empty result. Every other negative code
/// is a hard failure and surfaces as [`SpeechError::Synthesis`] carrying the
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// More chunks follow.
    MoreData,
    /// This chunk is the last one.
    FinalChunk,
    /// The input text contained nothing to speak.
    ZeroLength,
    /// Hard failure; the raw code is preserved.
    Failed(i32),
}

impl EngineStatus {
    /// The one negative status that is a valid empty result, not a failure.
    pub const ZERO_LENGTH_CODE: i32 = -4;

    /// Classify a raw engine status code.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::FinalChunk,
            c if c >= 0 => Self::MoreData,
            Self::ZERO_LENGTH_CODE => Self::ZeroLength,
            c => Self::Failed(c),
        }
    }
}

// ── File output formats ──────────────────────────────────────────────────────

/// Container/codec selector for [`SynthesisEngine::synthesize_to_file`].
///
/// The discriminants mirror the engine's own format table; code 6 is
/// unassigned there and has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Raw signed 16-bit PCM.
    S16Pcm,
    /// Raw A-law.
    ALaw,
    /// Raw µ-law.
    MuLaw,
    /// Dialogic ADPCM (VOX).
    DialogicAdpcm,
    /// Signed 16-bit PCM in a WAV container.
    S16PcmWav,
    /// Unsigned 8-bit PCM in a WAV container.
    U8PcmWav,
    /// A-law in a WAV container.
    ALawWav,
    /// µ-law in a WAV container.
    MuLawWav,
    /// µ-law in an AU container.
    MuLawAu,
}

impl FileFormat {
    /// The engine-level format code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::S16Pcm => 0,
            Self::ALaw => 1,
            Self::MuLaw => 2,
            Self::DialogicAdpcm => 3,
            Self::S16PcmWav => 4,
            Self::U8PcmWav => 5,
            Self::ALawWav => 7,
            Self::MuLawWav => 8,
            Self::MuLawAu => 9,
        }
    }

    /// Look up a variant by engine-level code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::S16Pcm),
            1 => Some(Self::ALaw),
            2 => Some(Self::MuLaw),
            3 => Some(Self::DialogicAdpcm),
            4 => Some(Self::S16PcmWav),
            5 => Some(Self::U8PcmWav),
            7 => Some(Self::ALawWav),
            8 => Some(Self::MuLawWav),
            9 => Some(Self::MuLawAu),
            _ => None,
        }
    }
}

// ── Engine traits ────────────────────────────────────────────────────────────

/// A lazy chunk sequence produced by one synthesis call.
///
/// The iterator borrows the engine; pulling the next item may run synthesis.
pub type ChunkStream<'a> = Box<dyn Iterator<Item = Result<AudioChunk, SpeechError>> + 'a>;

/// The synthesis engine contract.
///
/// Implementations wrap one loaded voice. Text handed to [`synthesize`] must
/// be encodable in that voice's character set (Shift_JIS for Japanese voices,
/// Windows-1252 otherwise); un-encodable text fails immediately with
/// [`SpeechError::Encoding`] and yields no chunks.
///
/// Empty input is not an error: the engine reports zero-length
/// ([`EngineStatus::ZeroLength`]) and the stream ends without items.
///
/// [`synthesize`]: SynthesisEngine::synthesize
pub trait SynthesisEngine: Send {
    /// Begin synthesis of `text`, returning the lazy chunk sequence.
    fn synthesize<'a>(
        &'a mut self,
        text: &str,
        params: &VoiceParams,
    ) -> Result<ChunkStream<'a>, SpeechError>;

    /// Render a whole utterance to an audio file instead of the chunk stream.
    ///
    /// Returns `Ok(true)` when a file was written and `Ok(false)` for
    /// zero-length input (nothing is written). Hard failures use the same
    /// taxonomy as [`SynthesisEngine::synthesize`].
    fn synthesize_to_file(
        &mut self,
        text: &str,
        path: &Path,
        format: FileFormat,
        params: &VoiceParams,
    ) -> Result<bool, SpeechError>;

    /// Name of the loaded voice (e.g. `"haruka"`).
    fn voice(&self) -> &str;
}

/// A loaded voice, ready to be wired into a streamer.
pub struct LoadedVoice {
    /// The initialized engine.
    pub engine: Box<dyn SynthesisEngine>,
    /// The sink its audio will be written to.
    pub sink: Box<dyn crate::sink::PcmSink>,
}

/// Factory for loaded voices.
///
/// `load` failures use the construction taxonomy
/// ([`SpeechError::LicenseNotFound`], [`SpeechError::VoiceLibraryNotFound`],
/// [`SpeechError::EngineInit`]) — all of them mean "this voice is
/// unavailable", which slot opening treats as "try the next candidate".
pub trait VoiceLoader {
    /// Load `voice` for `language`, producing an engine/sink pair.
    fn load(&self, language: Language, voice: &str) -> Result<LoadedVoice, SpeechError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_duration_follows_byte_length() {
        // 3200 bytes of S16LE mono at 16 kHz is exactly 0.1 s.
        let chunk = AudioChunk::new(vec![0u8; 3200]);
        assert_eq!(chunk.duration(), Duration::from_millis(100));
        assert_eq!(chunk.len(), 3200);
        assert!(!chunk.is_empty());

        let second = AudioChunk::new(vec![0u8; BYTES_PER_SECOND as usize]);
        assert_eq!(second.duration(), Duration::from_secs(1));
    }

    #[test]
    fn empty_chunk_has_zero_duration() {
        let chunk = AudioChunk::new(Vec::new());
        assert!(chunk.is_empty());
        assert_eq!(chunk.duration(), Duration::ZERO);
    }

    #[test]
    fn status_codes_classify() {
        assert_eq!(EngineStatus::from_code(0), EngineStatus::MoreData);
        assert_eq!(EngineStatus::from_code(2), EngineStatus::MoreData);
        assert_eq!(EngineStatus::from_code(1), EngineStatus::FinalChunk);
        assert_eq!(EngineStatus::from_code(-4), EngineStatus::ZeroLength);
        assert_eq!(EngineStatus::from_code(-5), EngineStatus::Failed(-5));
        assert_eq!(EngineStatus::from_code(-1), EngineStatus::Failed(-1));
    }

    #[test]
    fn file_format_codes_are_stable() {
        let formats = [
            (FileFormat::S16Pcm, 0),
            (FileFormat::ALaw, 1),
            (FileFormat::MuLaw, 2),
            (FileFormat::DialogicAdpcm, 3),
            (FileFormat::S16PcmWav, 4),
            (FileFormat::U8PcmWav, 5),
            (FileFormat::ALawWav, 7),
            (FileFormat::MuLawWav, 8),
            (FileFormat::MuLawAu, 9),
        ];
        for (format, code) in formats {
            assert_eq!(format.code(), code);
            assert_eq!(FileFormat::from_code(code), Some(format));
        }
        // Code 6 is a hole in the engine's table.
        assert_eq!(FileFormat::from_code(6), None);
    }
}
