//! The synthesis-to-sink pipeline for one loaded voice.
//!
//! A [`SpeechStreamer`] owns one engine and one dedicated consumer thread
//! that owns the sink. `speak` runs synthesis on the caller's thread and
//! feeds chunks through an unbounded channel; the consumer drains them into
//! the sink at playback pace. Dropping the sender half is the shutdown
//! signal — the consumer exits when the channel disconnects, and the sink is
//! released when the consumer exits.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::engine::{AudioChunk, SynthesisEngine};
use crate::error::SpeechError;
use crate::params::VoiceParams;
use crate::sink::PcmSink;

/// Streams one voice's synthesized audio into its sink.
pub struct SpeechStreamer {
    engine: Box<dyn SynthesisEngine>,
    chunk_tx: Option<Sender<AudioChunk>>,
    drain_rx: Receiver<AudioChunk>,
    consumer: Option<thread::JoinHandle<()>>,
}

impl SpeechStreamer {
    /// Wire an engine to a sink and start the consumer thread.
    ///
    /// The sink moves into the consumer thread and is dropped (closed) when
    /// that thread exits.
    pub fn new(
        engine: Box<dyn SynthesisEngine>,
        sink: Box<dyn PcmSink>,
    ) -> Result<Self, SpeechError> {
        let (chunk_tx, chunk_rx) = crossbeam_channel::unbounded::<AudioChunk>();
        let drain_rx = chunk_rx.clone();

        let consumer = thread::Builder::new()
            .name(format!("talkd-stream-{}", engine.voice()))
            .spawn(move || run_consumer(&chunk_rx, sink))?;

        Ok(Self {
            engine,
            chunk_tx: Some(chunk_tx),
            drain_rx,
            consumer: Some(consumer),
        })
    }

    /// Synthesize `text` and enqueue its chunks, returning the summed play
    /// duration.
    ///
    /// Runs in the caller's control flow: the call blocks for the full
    /// synthesis time (engine throughput), not for playback time. Zero-length
    /// input returns `Duration::ZERO` with nothing enqueued.
    ///
    /// On a mid-stream engine failure the error is returned and no duration
    /// is reported, but chunks enqueued before the failure are not recalled;
    /// callers that must squelch them can follow up with [`cancel`].
    ///
    /// [`cancel`]: SpeechStreamer::cancel
    pub fn speak(&mut self, text: &str, params: &VoiceParams) -> Result<Duration, SpeechError> {
        let Some(chunk_tx) = self.chunk_tx.as_ref() else {
            return Err(SpeechError::StreamerClosed);
        };

        let mut total = Duration::ZERO;
        for chunk in self.engine.synthesize(text, params)? {
            let chunk = chunk?;
            total += chunk.duration();
            if chunk_tx.send(chunk).is_err() {
                // Consumer gone without close(): the thread panicked.
                return Err(SpeechError::StreamerClosed);
            }
        }
        Ok(total)
    }

    /// Synthesize straight to a file, bypassing the sink queue.
    pub fn synthesize_to_file(
        &mut self,
        text: &str,
        path: &std::path::Path,
        format: crate::engine::FileFormat,
        params: &VoiceParams,
    ) -> Result<bool, SpeechError> {
        self.engine.synthesize_to_file(text, path, format, params)
    }

    /// Name of the voice this streamer speaks with.
    pub fn voice(&self) -> &str {
        self.engine.voice()
    }

    /// Best-effort, non-blocking: discard every chunk currently queued.
    ///
    /// A chunk the consumer has already dequeued finishes writing; a chunk
    /// enqueued while the drain is in progress can survive it. Both are
    /// accepted behavior — cancellation suppresses queued audio, it does not
    /// interrupt the sink.
    pub fn cancel(&self) {
        let mut dropped = 0_usize;
        while self.drain_rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded queued audio chunks");
        }
    }

    /// Shut down: drain the queue, disconnect the channel, join the consumer.
    ///
    /// Idempotent — a second call (or the implicit one in `Drop`) is a no-op.
    pub fn close(&mut self) {
        self.cancel();
        self.chunk_tx.take();
        if let Some(consumer) = self.consumer.take() {
            if consumer.join().is_err() {
                tracing::warn!("Audio consumer thread panicked");
            }
        }
    }
}

impl Drop for SpeechStreamer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Consumer loop: drain chunks into the sink until the channel disconnects.
///
/// Write failures are logged and skipped — output is fire-and-forget, and a
/// failing sink must not stall or kill the pipeline.
fn run_consumer(chunk_rx: &Receiver<AudioChunk>, mut sink: Box<dyn PcmSink>) {
    while let Ok(chunk) = chunk_rx.recv() {
        if let Err(e) = sink.write(&chunk.pcm) {
            tracing::warn!(error = %e, bytes = chunk.len(), "Audio sink write failed; chunk dropped");
        }
    }
    tracing::debug!("Audio consumer exiting");
}
