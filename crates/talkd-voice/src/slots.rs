//! Per-language voice slots.
//!
//! Each supported language gets at most one [`SpeechStreamer`], picked by
//! trying the configured voice names in order and keeping the first one that
//! loads. A language whose voices all fail to load is simply absent; the
//! rest of the system treats requests for it as a no-op rather than an
//! error, so a partially provisioned install still speaks what it can.

use talkd_core::{Language, TalkConfig};

use crate::engine::VoiceLoader;
use crate::streamer::SpeechStreamer;

/// The set of loaded voices, one slot per language.
pub struct SpeakerSlots {
    // Config order, so status output is deterministic.
    slots: Vec<(Language, SpeechStreamer)>,
}

impl SpeakerSlots {
    /// Load a streamer for every language that has at least one usable voice.
    ///
    /// Load failures are logged and skipped, never fatal. The result can be
    /// empty, in which case every speech request degrades to a no-op.
    pub fn open(loader: &dyn VoiceLoader, config: &TalkConfig) -> Self {
        let mut slots = Vec::new();

        for language in [Language::Japanese, Language::English] {
            match Self::load_first(loader, language, config.voices(language)) {
                Some(streamer) => slots.push((language, streamer)),
                None => {
                    tracing::warn!(language = %language, "No usable voice; language disabled");
                }
            }
        }

        if slots.is_empty() {
            tracing::warn!("No voices loaded at all; speech requests will be ignored");
        }

        Self { slots }
    }

    fn load_first(
        loader: &dyn VoiceLoader,
        language: Language,
        voices: &[String],
    ) -> Option<SpeechStreamer> {
        for voice in voices {
            match loader.load(language, voice) {
                Ok(loaded) => match SpeechStreamer::new(loaded.engine, loaded.sink) {
                    Ok(streamer) => {
                        tracing::info!(language = %language, voice = %voice, "Voice loaded");
                        return Some(streamer);
                    }
                    Err(e) => {
                        tracing::warn!(language = %language, voice = %voice, error = %e, "Streamer start failed");
                    }
                },
                Err(e) => {
                    tracing::warn!(language = %language, voice = %voice, error = %e, "Voice load failed");
                }
            }
        }
        None
    }

    pub fn get(&self, language: Language) -> Option<&SpeechStreamer> {
        self.slots
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, s)| s)
    }

    pub fn get_mut(&mut self, language: Language) -> Option<&mut SpeechStreamer> {
        self.slots
            .iter_mut()
            .find(|(l, _)| *l == language)
            .map(|(_, s)| s)
    }

    pub fn has(&self, language: Language) -> bool {
        self.get(language).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Languages with a loaded voice, in configuration order.
    pub fn languages(&self) -> Vec<Language> {
        self.slots.iter().map(|(l, _)| *l).collect()
    }

    /// Discard queued audio on every loaded voice.
    pub fn cancel_all(&self) {
        for (_, streamer) in &self.slots {
            streamer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ChunkStream, FileFormat, LoadedVoice, SynthesisEngine};
    use crate::error::SpeechError;
    use crate::params::VoiceParams;
    use crate::sink::PcmSink;

    struct SilentEngine {
        name: String,
    }

    impl SynthesisEngine for SilentEngine {
        fn synthesize<'a>(
            &'a mut self,
            _text: &str,
            _params: &VoiceParams,
        ) -> Result<ChunkStream<'a>, SpeechError> {
            Ok(Box::new(std::iter::empty()))
        }

        fn synthesize_to_file(
            &mut self,
            _text: &str,
            _path: &std::path::Path,
            _format: FileFormat,
            _params: &VoiceParams,
        ) -> Result<bool, SpeechError> {
            Ok(true)
        }

        fn voice(&self) -> &str {
            &self.name
        }
    }

    struct NullSink;

    impl PcmSink for NullSink {
        fn write(&mut self, _pcm: &[u8]) -> Result<(), SpeechError> {
            Ok(())
        }
    }

    struct FakeLoader {
        available: Vec<(Language, &'static str)>,
    }

    impl VoiceLoader for FakeLoader {
        fn load(&self, language: Language, voice: &str) -> Result<LoadedVoice, SpeechError> {
            if self.available.iter().any(|(l, v)| *l == language && *v == voice) {
                Ok(LoadedVoice {
                    engine: Box::new(SilentEngine { name: voice.to_owned() }),
                    sink: Box::new(NullSink),
                })
            } else {
                Err(SpeechError::VoiceLibraryNotFound(voice.to_owned()))
            }
        }
    }

    #[test]
    fn first_available_voice_wins() {
        let loader = FakeLoader {
            available: vec![(Language::Japanese, "second"), (Language::English, "julie")],
        };
        let config = TalkConfig {
            japanese_voices: vec!["first".to_owned(), "second".to_owned()],
            ..TalkConfig::default()
        };

        let slots = SpeakerSlots::open(&loader, &config);
        assert_eq!(slots.get(Language::Japanese).unwrap().voice(), "second");
        assert_eq!(slots.get(Language::English).unwrap().voice(), "julie");
    }

    #[test]
    fn language_without_usable_voice_is_absent() {
        let loader = FakeLoader {
            available: vec![(Language::English, "julie")],
        };
        let slots = SpeakerSlots::open(&loader, &TalkConfig::default());

        assert!(!slots.has(Language::Japanese));
        assert_eq!(slots.languages(), vec![Language::English]);
    }

    #[test]
    fn no_voices_leaves_slots_empty() {
        let loader = FakeLoader { available: vec![] };
        let slots = SpeakerSlots::open(&loader, &TalkConfig::default());

        assert!(slots.is_empty());
        assert!(slots.languages().is_empty());
    }
}
