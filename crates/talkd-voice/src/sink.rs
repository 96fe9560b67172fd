//! Audio sink contract and the WAV capture implementation.
//!
//! A sink accepts S16LE mono PCM at [`SAMPLE_RATE`] and writes it somewhere:
//! a playback device, a file, a test recorder. Writes are blocking and
//! ordered; the sink is "closed" by dropping it.
//!
//! | Implementor       | Target                                        |
//! |-------------------|-----------------------------------------------|
//! | [`WavFileSink`]   | RIFF/WAV file on disk (headless runs, tests)  |
//! | device adapters   | out of tree — behind the same trait           |
//!
//! [`SAMPLE_RATE`]: crate::engine::SAMPLE_RATE

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::engine::SAMPLE_RATE;
use crate::error::SpeechError;

/// Blocking audio output.
///
/// The consumer thread is the only writer, so implementations never see
/// concurrent calls. Write errors are surfaced but the pipeline treats output
/// as fire-and-forget: a failed write is logged by the consumer and the next
/// chunk is attempted anyway.
#[cfg_attr(test, mockall::automock)]
pub trait PcmSink: Send {
    /// Write one buffer of S16LE mono PCM, blocking until accepted.
    fn write(&mut self, pcm: &[u8]) -> Result<(), SpeechError>;
}

/// A [`PcmSink`] that captures the utterance into a WAV file.
pub struct WavFileSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
}

impl WavFileSink {
    /// Create the file and write a WAV header for S16LE mono at
    /// [`SAMPLE_RATE`].
    pub fn create(path: &Path) -> Result<Self, SpeechError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(path, spec)
            .map_err(|e| SpeechError::Sink(e.to_string()))?;
        Ok(Self {
            writer: Some(writer),
        })
    }

    /// Flush sample counts into the header and close the file.
    ///
    /// Dropping the sink finalizes too, but swallows errors; call this when
    /// the result matters.
    pub fn finalize(mut self) -> Result<(), SpeechError> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| SpeechError::Sink(e.to_string()))?;
        }
        Ok(())
    }
}

impl PcmSink for WavFileSink {
    fn write(&mut self, pcm: &[u8]) -> Result<(), SpeechError> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(SpeechError::Sink("WAV writer already finalized".to_owned()));
        };
        // S16LE means an even byte count; a stray trailing byte is dropped.
        for sample in pcm.chunks_exact(2) {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            writer
                .write_sample(value)
                .map_err(|e| SpeechError::Sink(e.to_string()))?;
        }
        Ok(())
    }
}
