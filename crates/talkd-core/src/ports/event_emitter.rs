//! Event emitter trait for cross-crate event broadcasting.
//!
//! This module defines the abstraction for emitting speech events.
//! Implementations handle transport details (channels, SSE, test capture).

use tokio::sync::mpsc;

use crate::events::SpeechEvent;

/// Trait for emitting speech events.
///
/// This abstraction keeps event plumbing consistent and prevents channel
/// types from becoming part of the public API surface.
///
/// # Implementations
///
/// - [`NoopEmitter`] - for tests and headless contexts that don't need events
/// - [`ChannelEmitter`] - in-process fan-in over a tokio unbounded channel
/// - Transport-specific implementations live in their own crates
pub trait SpeechEventEmitter: Send + Sync {
    /// Emit a speech event.
    ///
    /// Implementations should hand the event off without blocking; a slow or
    /// absent consumer must never stall the pipeline.
    fn emit(&self, event: SpeechEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn SpeechEventEmitter>` without
    /// requiring the underlying type to implement `Clone`.
    fn clone_box(&self) -> Box<dyn SpeechEventEmitter>;
}

/// A no-op event emitter for tests and headless contexts.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SpeechEventEmitter for NoopEmitter {
    fn emit(&self, _event: SpeechEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn SpeechEventEmitter> {
        Box::new(self.clone())
    }
}

/// An emitter backed by a tokio unbounded channel.
///
/// The sending side never blocks; if the receiving side has gone away the
/// event is dropped with a warning.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiver its events arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SpeechEventEmitter for ChannelEmitter {
    fn emit(&self, event: SpeechEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Speech event receiver dropped");
        }
    }

    fn clone_box(&self) -> Box<dyn SpeechEventEmitter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn noop_emitter_discards() {
        let emitter = NoopEmitter::new();
        emitter.emit(SpeechEvent::SpeakingFinished);
    }

    #[test]
    fn noop_emitter_clone_box() {
        let emitter = NoopEmitter::new();
        let _boxed: Box<dyn SpeechEventEmitter> = emitter.clone_box();
    }

    #[test]
    fn channel_emitter_delivers() {
        let (emitter, mut rx) = ChannelEmitter::new();
        emitter.emit(SpeechEvent::GoalAccepted { goal_id: 3 });

        match rx.try_recv() {
            Ok(SpeechEvent::GoalAccepted { goal_id }) => assert_eq!(goal_id, 3),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn channel_emitter_survives_dropped_receiver() {
        let (emitter, rx) = ChannelEmitter::new();
        drop(rx);
        // Must not panic.
        emitter.emit(SpeechEvent::SpeakingFinished);
    }

    #[test]
    fn arc_emitter_is_usable() {
        let emitter: Arc<dyn SpeechEventEmitter> = Arc::new(NoopEmitter::new());
        emitter.emit(SpeechEvent::SpeakingFinished);
    }
}
