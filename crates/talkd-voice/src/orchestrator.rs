//! Single-speaker utterance orchestration.
//!
//! The orchestrator enforces the one rule everything else leans on: at most
//! one utterance is active at a time. A new request preempts the old one,
//! preemption aborts the old request's goal, and every goal reaches exactly
//! one terminal outcome no matter how completion, cancellation, and
//! preemption race.
//!
//! Utterance starts are serialized by the inner lock, which is held for the
//! whole synthesis call. The periodic [`tick`] uses `try_lock` and skips a
//! beat instead of queueing behind synthesis, so the driver never stalls.
//!
//! [`tick`]: TalkOrchestrator::tick

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tokio::sync::{mpsc, watch};

use talkd_core::{Announcement, GoalOutcome, Language, SpeechEvent, SpeechStatus};

use crate::engine::FileFormat;
use crate::error::SpeechError;
use crate::goal::Goal;
use crate::params::VoiceParams;
use crate::slots::SpeakerSlots;

/// How long a goal waiter sleeps between terminal-outcome checks. The
/// condvar normally wakes it sooner; this is the safety-net cadence.
const GOAL_WAIT_INTERVAL: Duration = Duration::from_millis(50);

/// The utterance currently holding the speaker.
struct ActiveUtterance {
    text: String,
    estimated_end: Instant,
    goal: Option<Arc<Goal>>,
}

/// State guarded by the orchestrator lock.
struct OrchestratorInner {
    slots: SpeakerSlots,
    params: VoiceParams,
    active: Option<ActiveUtterance>,
}

/// Serializes speech requests onto the single speaker.
pub struct TalkOrchestrator {
    inner: Mutex<OrchestratorInner>,
    goal_wait: Mutex<()>,
    goal_done: Condvar,
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
    announce_tx: watch::Sender<Announcement>,
    next_goal_id: AtomicU64,
}

impl TalkOrchestrator {
    /// Create an orchestrator over the loaded voices.
    ///
    /// Returns the receiving half of the event channel; the caller decides
    /// how events leave the process. The announcement channel starts latched
    /// at [`Announcement::Idle`].
    pub fn new(
        slots: SpeakerSlots,
        params: VoiceParams,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (announce_tx, _) = watch::channel(Announcement::Idle);

        let orchestrator = Self {
            inner: Mutex::new(OrchestratorInner {
                slots,
                params,
                active: None,
            }),
            goal_wait: Mutex::new(()),
            goal_done: Condvar::new(),
            event_tx,
            announce_tx,
            next_goal_id: AtomicU64::new(1),
        };
        (orchestrator, event_rx)
    }

    /// Watch the latched speaking/idle announcement.
    pub fn subscribe_announcements(&self) -> watch::Receiver<Announcement> {
        self.announce_tx.subscribe()
    }

    /// Fire-and-forget speech request.
    ///
    /// Preempts any active utterance. Failures (no voice for the language,
    /// synthesis error) are logged and swallowed; there is nobody to reply
    /// to.
    pub fn handle_request(&self, text: &str, language: Language) {
        tracing::debug!(language = %language, "Speech request");
        self.start_utterance(text, language, None);
    }

    /// Tracked speech request: blocks the calling thread until the goal
    /// reaches its terminal outcome.
    ///
    /// Every submission is accepted. A request that does not start speaking
    /// (no voice, nothing to synthesize, engine failure) finalizes as
    /// [`GoalOutcome::Aborted`] immediately.
    pub fn handle_goal_request(&self, text: &str, language: Language) -> GoalOutcome {
        let id = self.next_goal_id.fetch_add(1, Ordering::Relaxed);
        let goal = Arc::new(Goal::new(id, text));
        tracing::debug!(goal_id = id, language = %language, "Goal request");
        self.emit(SpeechEvent::GoalAccepted { goal_id: id });

        if self.start_utterance(text, language, Some(&goal)) {
            self.wait_for_outcome(&goal)
        } else {
            goal.outcome().unwrap_or(GoalOutcome::Aborted)
        }
    }

    /// Stop the current utterance, if any.
    ///
    /// Queued audio is discarded best-effort; a chunk the sink consumer has
    /// already dequeued still plays out. An active goal finalizes as
    /// [`GoalOutcome::Canceled`]. With nothing active this is a no-op.
    pub fn cancel(&self) {
        let mut guard = self.inner.lock();
        guard.slots.cancel_all();
        let Some(finished) = guard.active.take() else {
            tracing::debug!("Cancel with no active utterance");
            return;
        };

        tracing::info!(text = %finished.text, "Speech canceled");
        self.emit(SpeechEvent::SpeakingFinished);
        self.announce(Announcement::Idle);
        drop(guard);

        if let Some(goal) = finished.goal {
            self.finalize_goal(&goal, GoalOutcome::Canceled);
        }
    }

    /// One beat of the completion/feedback driver.
    ///
    /// Finishes the active utterance once its estimated end time has passed,
    /// otherwise emits remaining-time feedback for a tracked goal. Never
    /// blocks: if the lock is held (an utterance is starting), the beat is
    /// skipped and the next one catches up.
    pub fn tick(&self) {
        let Some(mut guard) = self.inner.try_lock() else {
            return;
        };

        let now = Instant::now();
        let due = match guard.active.as_ref() {
            None => return,
            Some(active) => now >= active.estimated_end,
        };

        if due {
            let Some(finished) = guard.active.take() else {
                return;
            };
            tracing::debug!(text = %finished.text, "Speech finished");
            self.emit(SpeechEvent::SpeakingFinished);
            self.announce(Announcement::Idle);
            drop(guard);

            if let Some(goal) = finished.goal {
                self.finalize_goal(&goal, GoalOutcome::Succeeded);
            }
        } else if let Some(active) = guard.active.as_ref() {
            let Some(goal) = active.goal.as_ref() else {
                return;
            };
            let goal_id = goal.id();
            let remaining_secs = active
                .estimated_end
                .saturating_duration_since(now)
                .as_secs_f64();
            drop(guard);

            self.emit(SpeechEvent::GoalFeedback {
                goal_id,
                remaining_secs,
            });
        }
    }

    /// Snapshot of what the speaker is doing.
    pub fn status(&self) -> SpeechStatus {
        let guard = self.inner.lock();
        let (speaking, remaining_secs, sentence, goal_active) = match guard.active.as_ref() {
            Some(active) => (
                true,
                Some(
                    active
                        .estimated_end
                        .saturating_duration_since(Instant::now())
                        .as_secs_f64(),
                ),
                Some(active.text.clone()),
                active.goal.is_some(),
            ),
            None => (false, None, None, false),
        };

        SpeechStatus {
            speaking,
            remaining_secs,
            sentence,
            goal_active,
            languages: guard
                .slots
                .languages()
                .iter()
                .map(|l| l.code().to_owned())
                .collect(),
        }
    }

    /// Synthesize `text` into a file instead of the audio sink.
    ///
    /// Returns `Ok(false)` when no voice is loaded for the language or the
    /// engine declines the format; the current utterance is unaffected.
    pub fn synthesize_to_file(
        &self,
        text: &str,
        language: Language,
        path: &Path,
        format: FileFormat,
    ) -> Result<bool, SpeechError> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let params = inner.params;

        let Some(streamer) = inner.slots.get_mut(language) else {
            tracing::warn!(language = %language, "No voice loaded; cannot synthesize to file");
            return Ok(false);
        };
        streamer.synthesize_to_file(text, path, format, &params)
    }

    /// Preempt, synthesize, and mark the new utterance active.
    ///
    /// Holds the inner lock across the synthesis call, so concurrent starts
    /// run one at a time. Returns whether the utterance became active; on
    /// `false` a tracked goal has already been finalized.
    fn start_utterance(&self, text: &str, language: Language, goal: Option<&Arc<Goal>>) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if let Some(previous) = inner.active.take() {
            inner.slots.cancel_all();
            tracing::info!(interrupted = %previous.text, "Preempting active utterance");
            if let Some(previous_goal) = previous.goal {
                self.finalize_goal(&previous_goal, GoalOutcome::Aborted);
            }
        }

        let Some(streamer) = inner.slots.get_mut(language) else {
            tracing::warn!(language = %language, "No voice loaded; utterance dropped");
            self.announce(Announcement::Idle);
            if let Some(goal) = goal {
                self.finalize_goal(goal, GoalOutcome::Aborted);
            }
            return false;
        };

        let params = inner.params;
        match streamer.speak(text, &params) {
            // Zero-length input synthesizes nothing; the speaker stays idle
            // and a tracked goal has nothing to wait for.
            Ok(duration) if duration.is_zero() => {
                tracing::debug!("Nothing to speak");
                self.announce(Announcement::Idle);
                if let Some(goal) = goal {
                    self.finalize_goal(goal, GoalOutcome::Aborted);
                }
                false
            }
            Ok(duration) => {
                inner.active = Some(ActiveUtterance {
                    text: text.to_owned(),
                    estimated_end: Instant::now() + duration,
                    goal: goal.map(Arc::clone),
                });
                if let Some(goal) = goal {
                    goal.activate();
                }
                tracing::info!(duration_secs = duration.as_secs_f64(), "Speaking");
                self.emit(SpeechEvent::SpeakingStarted {
                    text: text.to_owned(),
                    language,
                });
                self.announce(Announcement::Speaking {
                    text: text.to_owned(),
                });
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Speech synthesis failed");
                self.announce(Announcement::Idle);
                if let Some(goal) = goal {
                    self.finalize_goal(goal, GoalOutcome::Aborted);
                }
                false
            }
        }
    }

    /// Assign a goal's terminal outcome and wake its waiter.
    ///
    /// The first caller wins; later calls for the same goal are no-ops, so
    /// the finished event fires exactly once per goal.
    fn finalize_goal(&self, goal: &Goal, outcome: GoalOutcome) {
        if goal.finalize(outcome) {
            tracing::info!(goal_id = goal.id(), outcome = outcome.label(), "Goal finished");
            self.emit(SpeechEvent::GoalFinished {
                goal_id: goal.id(),
                outcome,
            });
            drop(self.goal_wait.lock());
            self.goal_done.notify_all();
        }
    }

    /// Block until the goal's terminal outcome is set.
    fn wait_for_outcome(&self, goal: &Goal) -> GoalOutcome {
        let mut slot = self.goal_wait.lock();
        loop {
            if let Some(outcome) = goal.outcome() {
                return outcome;
            }
            // Timeout is only the safety-net cadence; the loop re-checks.
            let _ = self.goal_done.wait_for(&mut slot, GOAL_WAIT_INTERVAL);
        }
    }

    fn emit(&self, event: SpeechEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::warn!("Speech event receiver dropped; event lost");
        }
    }

    fn announce(&self, announcement: Announcement) {
        self.announce_tx.send_replace(announcement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{LoadedVoice, VoiceLoader};
    use talkd_core::TalkConfig;

    struct NoVoices;

    impl VoiceLoader for NoVoices {
        fn load(&self, _language: Language, voice: &str) -> Result<LoadedVoice, SpeechError> {
            Err(SpeechError::VoiceLibraryNotFound(voice.to_owned()))
        }
    }

    fn empty_orchestrator() -> (TalkOrchestrator, mpsc::UnboundedReceiver<SpeechEvent>) {
        let slots = SpeakerSlots::open(&NoVoices, &TalkConfig::default());
        TalkOrchestrator::new(slots, VoiceParams::unset())
    }

    #[test]
    fn request_without_voice_is_swallowed() {
        let (orchestrator, mut events) = empty_orchestrator();

        orchestrator.handle_request("hello", Language::English);

        let status = orchestrator.status();
        assert!(!status.speaking);
        assert!(status.languages.is_empty());
        assert!(events.try_recv().is_err());
        assert!(orchestrator.subscribe_announcements().borrow().is_idle());
    }

    #[test]
    fn goal_without_voice_aborts_immediately() {
        let (orchestrator, mut events) = empty_orchestrator();

        let outcome = orchestrator.handle_goal_request("hello", Language::Japanese);
        assert_eq!(outcome, GoalOutcome::Aborted);

        assert!(matches!(
            events.try_recv(),
            Ok(SpeechEvent::GoalAccepted { goal_id: 1 })
        ));
        assert!(matches!(
            events.try_recv(),
            Ok(SpeechEvent::GoalFinished {
                goal_id: 1,
                outcome: GoalOutcome::Aborted,
            })
        ));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn cancel_without_active_utterance_is_noop() {
        let (orchestrator, mut events) = empty_orchestrator();

        orchestrator.cancel();
        orchestrator.tick();

        assert!(events.try_recv().is_err());
    }

    #[test]
    fn goal_ids_are_monotonic() {
        let (orchestrator, mut events) = empty_orchestrator();

        orchestrator.handle_goal_request("a", Language::English);
        orchestrator.handle_goal_request("b", Language::English);

        let mut accepted = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let SpeechEvent::GoalAccepted { goal_id } = event {
                accepted.push(goal_id);
            }
        }
        assert_eq!(accepted, vec![1, 2]);
    }
}
