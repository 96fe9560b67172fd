//! Async service facade over the blocking orchestrator.
//!
//! [`TalkService`] implements the [`TalkPort`] trait for transport layers.
//! Every port call parses its wire-level arguments, then dispatches to the
//! orchestrator on the blocking thread pool so synthesis and goal waits
//! never occupy a runtime worker. Construction also spawns two background
//! tasks: the event bridge that forwards pipeline events to the configured
//! emitter, and the tick driver that beats the orchestrator's completion
//! clock.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use talkd_core::{
    Announcement, GoalOutcome, Language, SpeechEvent, SpeechEventEmitter, SpeechStatus,
    TalkConfig, TalkPort, TalkPortError,
};

use crate::engine::{FileFormat, VoiceLoader};
use crate::orchestrator::TalkOrchestrator;
use crate::params::VoiceParams;
use crate::slots::SpeakerSlots;

/// Cadence of the completion/feedback driver.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// The inbound speech surface: owns the orchestrator and its driver tasks.
pub struct TalkService {
    orchestrator: Arc<TalkOrchestrator>,
    bridge: JoinHandle<()>,
    ticker: JoinHandle<()>,
}

impl TalkService {
    /// Load voices from `config` and assemble the full pipeline.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        loader: &dyn VoiceLoader,
        config: &TalkConfig,
        emitter: Arc<dyn SpeechEventEmitter>,
    ) -> Self {
        let slots = SpeakerSlots::open(loader, config);
        let params = VoiceParams::from_config(config);
        let (orchestrator, event_rx) = TalkOrchestrator::new(slots, params);
        Self::new(orchestrator, event_rx, emitter)
    }

    /// Wrap an already-built orchestrator.
    ///
    /// Spawns the event bridge and the tick driver; both are aborted when
    /// the service drops. Must be called from within a tokio runtime.
    pub fn new(
        orchestrator: TalkOrchestrator,
        event_rx: mpsc::UnboundedReceiver<SpeechEvent>,
        emitter: Arc<dyn SpeechEventEmitter>,
    ) -> Self {
        let orchestrator = Arc::new(orchestrator);
        let bridge = spawn_event_bridge(event_rx, emitter);
        let ticker = spawn_tick_driver(Arc::clone(&orchestrator));
        Self {
            orchestrator,
            bridge,
            ticker,
        }
    }

    /// Watch the latched speaking/idle announcement.
    pub fn subscribe_announcements(&self) -> watch::Receiver<Announcement> {
        self.orchestrator.subscribe_announcements()
    }

    /// Synthesize `text` into a file instead of playing it.
    ///
    /// Returns `Ok(false)` when the language has no loaded voice or the
    /// engine declines the request.
    pub async fn save_to_file(
        &self,
        text: &str,
        language: &str,
        path: impl Into<PathBuf>,
        format: FileFormat,
    ) -> Result<bool, TalkPortError> {
        let language = parse_language(language)?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let text = text.to_owned();
        let path = path.into();

        tokio::task::spawn_blocking(move || {
            orchestrator.synthesize_to_file(&text, language, &path, format)
        })
        .await
        .map_err(to_port_err)?
        .map_err(|e| TalkPortError::Internal(e.to_string()))
    }
}

impl Drop for TalkService {
    fn drop(&mut self) {
        self.ticker.abort();
        self.bridge.abort();
    }
}

#[async_trait]
impl TalkPort for TalkService {
    async fn say(&self, text: &str, language: &str) -> Result<(), TalkPortError> {
        let language = parse_language(language)?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || orchestrator.handle_request(&text, language))
            .await
            .map_err(to_port_err)
    }

    async fn say_and_wait(
        &self,
        text: &str,
        language: &str,
    ) -> Result<GoalOutcome, TalkPortError> {
        let language = parse_language(language)?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let text = text.to_owned();

        tokio::task::spawn_blocking(move || orchestrator.handle_goal_request(&text, language))
            .await
            .map_err(to_port_err)
    }

    async fn cancel(&self) -> Result<(), TalkPortError> {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::task::spawn_blocking(move || orchestrator.cancel())
            .await
            .map_err(to_port_err)
    }

    async fn status(&self) -> Result<SpeechStatus, TalkPortError> {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::task::spawn_blocking(move || orchestrator.status())
            .await
            .map_err(to_port_err)
    }
}

/// Forward pipeline events to the configured emitter until the pipeline
/// side closes.
fn spawn_event_bridge(
    mut event_rx: mpsc::UnboundedReceiver<SpeechEvent>,
    emitter: Arc<dyn SpeechEventEmitter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            emitter.emit(event);
        }
        tracing::debug!("Speech event bridge exiting");
    })
}

/// Beat the orchestrator's completion clock at [`TICK_INTERVAL`].
fn spawn_tick_driver(orchestrator: Arc<TalkOrchestrator>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            orchestrator.tick();
        }
    })
}

fn parse_language(language: &str) -> Result<Language, TalkPortError> {
    language
        .parse()
        .map_err(|_| TalkPortError::UnknownLanguage(language.to_owned()))
}

fn to_port_err(e: tokio::task::JoinError) -> TalkPortError {
    TalkPortError::Internal(format!("Speech task failed: {e}"))
}
