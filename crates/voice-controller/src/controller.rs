//! The voice interaction controller.
//!
//! Two independent automata share one controller: Idle/Listening for
//! recognition and Idle/Speaking for synthesis. Engines report progress as
//! [`EngineEvent`]s on a channel; the controller applies them when the
//! owner calls [`VoiceController::dispatch_pending`] or
//! [`VoiceController::dispatch_next`]. Events tagged with a session or
//! utterance the controller no longer tracks are ignored.

use crate::{
    EngineEvent, EventSender, Notification, NotificationSink, OverlapPolicy, RecognitionConfig,
    RecognitionEngine, RecognitionEvent, SessionId, SynthesisEngine, SynthesisEvent, Utterance,
    UtteranceId, VoiceConfig, VoiceStatus,
};
use std::collections::HashSet;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Consumer-supplied handler for the final transcript of one session.
pub type TranscriptCallback = Box<dyn FnOnce(String) + Send>;

const UNSUPPORTED_TITLE: &str = "Speech Recognition Not Supported";
const UNSUPPORTED_DESCRIPTION: &str =
    "This platform has no speech recognition engine. Please type your input instead.";
const RECOGNITION_ERROR_TITLE: &str = "Voice Recognition Error";
const RECOGNITION_ERROR_DESCRIPTION: &str =
    "Please try again or check your microphone permissions.";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum SessionPhase {
    /// Requested, no start confirmation yet.
    Starting,
    Listening,
    /// `stop_listening` was called; waiting for the terminal event.
    Stopping,
}

struct RecognitionSlot {
    id: SessionId,
    phase: SessionPhase,
    callback: Option<TranscriptCallback>,
}

struct UtteranceSlot {
    id: UtteranceId,
}

pub struct VoiceController {
    config: VoiceConfig,
    recognizer: Option<Box<dyn RecognitionEngine>>,
    synthesizer: Box<dyn SynthesisEngine>,
    notifier: Box<dyn NotificationSink>,
    session: Option<RecognitionSlot>,
    /// Sessions replaced under [`OverlapPolicy::Legacy`] that are still running.
    orphans: HashSet<SessionId>,
    utterance: Option<UtteranceSlot>,
    status: watch::Sender<VoiceStatus>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: mpsc::UnboundedReceiver<EngineEvent>,
    next_session: u64,
    next_utterance: u64,
}

impl VoiceController {
    /// `recognizer` is `None` on platforms without speech recognition.
    pub fn new(
        config: VoiceConfig,
        recognizer: Option<Box<dyn RecognitionEngine>>,
        synthesizer: Box<dyn SynthesisEngine>,
        notifier: Box<dyn NotificationSink>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (status, _) = watch::channel(VoiceStatus::default());
        Self {
            config,
            recognizer,
            synthesizer,
            notifier,
            session: None,
            orphans: HashSet::new(),
            utterance: None,
            status,
            events_tx,
            events_rx,
            next_session: 0,
            next_utterance: 0,
        }
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn is_listening(&self) -> bool {
        self.status.borrow().listening
    }

    pub fn is_speaking(&self) -> bool {
        self.status.borrow().speaking
    }

    pub fn status(&self) -> VoiceStatus {
        *self.status.borrow()
    }

    /// Subscribe to flag changes. A new value is published only when a
    /// flag actually flips.
    pub fn subscribe(&self) -> watch::Receiver<VoiceStatus> {
        self.status.subscribe()
    }

    /// Sender for engines that report from outside the controller's calls.
    pub fn event_sender(&self) -> EventSender {
        EventSender::new(self.events_tx.clone())
    }

    /// Open a recognition session. `on_result` receives the final
    /// transcript at most once.
    ///
    /// Returns the new session id, or `None` when nothing was started
    /// (unsupported platform, overlap rejected, engine refused).
    pub fn start_listening(&mut self, on_result: Option<TranscriptCallback>) -> Option<SessionId> {
        let available = self
            .recognizer
            .as_ref()
            .is_some_and(|r| r.is_available());
        if !available {
            warn!("speech recognition unavailable, start_listening ignored");
            self.notifier
                .notify(Notification::destructive(UNSUPPORTED_TITLE, UNSUPPORTED_DESCRIPTION));
            return None;
        }

        if let Some(open) = self.session.take() {
            match (open.phase, self.config.overlap_policy) {
                (SessionPhase::Stopping, _) => {
                    debug!(session = %open.id, "detaching stopping session");
                }
                (_, OverlapPolicy::Reject) => {
                    warn!(session = %open.id, "recognition session already open, request rejected");
                    self.session = Some(open);
                    return None;
                }
                (_, OverlapPolicy::Supersede) => {
                    info!(session = %open.id, "superseding open recognition session");
                    self.stop_engine_session(open.id);
                    self.set_listening(false);
                }
                (_, OverlapPolicy::Legacy) => {
                    warn!(session = %open.id, "replacing open recognition session; it keeps running unobserved");
                    self.orphans.insert(open.id);
                }
            }
        }

        self.next_session += 1;
        let id = SessionId(self.next_session);
        let config = RecognitionConfig::single_utterance(self.config.locale.clone());
        let events = self.event_sender();
        let started = match self.recognizer.as_mut() {
            Some(recognizer) => recognizer.start(id, &config, events),
            None => Err(crate::VoiceError::UnsupportedCapability),
        };

        match started {
            Ok(()) => {
                info!(session = %id, locale = %config.locale, "recognition session requested");
                self.session = Some(RecognitionSlot {
                    id,
                    phase: SessionPhase::Starting,
                    callback: on_result,
                });
                Some(id)
            }
            Err(e) => {
                error!(session = %id, "recognition engine failed to start: {e}");
                self.notify_recognition_error();
                self.set_listening(false);
                None
            }
        }
    }

    /// Request termination of the open session, if any, and clear the
    /// listening flag without waiting for the engine.
    pub fn stop_listening(&mut self) {
        let open = match self.session.as_mut() {
            Some(slot) if slot.phase != SessionPhase::Stopping => {
                slot.phase = SessionPhase::Stopping;
                Some(slot.id)
            }
            _ => None,
        };
        match open {
            Some(id) => {
                info!(session = %id, "stopping recognition session");
                self.stop_engine_session(id);
            }
            None => debug!("stop_listening with no open session"),
        }
        // replaced sessions are stopped too; their late events are stale
        let orphans: Vec<SessionId> = self.orphans.drain().collect();
        for id in orphans {
            info!(session = %id, "stopping replaced recognition session");
            self.stop_engine_session(id);
        }
        self.set_listening(false);
    }

    /// Cancel whatever is being spoken and submit `text` as the only
    /// active utterance. Returns immediately.
    pub fn speak(&mut self, text: impl Into<String>) -> UtteranceId {
        let text = text.into();
        if text.trim().is_empty() {
            debug!("empty utterance submitted; engine may not speak it");
        }

        self.synthesizer.cancel();
        if let Some(prev) = self.utterance.take() {
            debug!(utterance = %prev.id, "previous utterance cancelled");
        }
        self.set_speaking(false);

        self.next_utterance += 1;
        let id = UtteranceId(self.next_utterance);
        let request = Utterance {
            text,
            params: self.config.utterance,
        };
        let events = self.event_sender();
        match self.synthesizer.speak(id, &request, events) {
            Ok(()) => {
                debug!(utterance = %id, text = %request.text, "utterance submitted");
                self.utterance = Some(UtteranceSlot { id });
            }
            Err(e) => warn!(utterance = %id, "synthesis engine rejected utterance: {e}"),
        }
        id
    }

    /// Cancel the active utterance and clear the speaking flag at once.
    pub fn stop_speaking(&mut self) {
        match self.utterance.take() {
            Some(active) => {
                info!(utterance = %active.id, "stopping speech");
                self.synthesizer.cancel();
            }
            None => debug!("stop_speaking with nothing in flight"),
        }
        self.set_speaking(false);
    }

    /// Apply every event already queued. Returns how many were applied.
    pub fn dispatch_pending(&mut self) -> usize {
        let mut n = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            n += 1;
        }
        n
    }

    /// Wait for the next engine event and apply it.
    ///
    /// The controller holds a sender itself, so this only returns once an
    /// event arrives.
    pub async fn dispatch_next(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Recognition { session, event } => self.on_recognition(session, event),
            EngineEvent::Synthesis { utterance, event } => self.on_synthesis(utterance, event),
        }
    }

    fn on_recognition(&mut self, id: SessionId, event: RecognitionEvent) {
        if !self.session.as_ref().is_some_and(|s| s.id == id) {
            if self.orphans.contains(&id) {
                self.on_orphan_recognition(id, event);
            } else {
                debug!(session = %id, ?event, "ignoring event for stale recognition session");
            }
            return;
        }
        let Some(slot) = self.session.as_mut() else {
            return;
        };

        match event {
            RecognitionEvent::Started => {
                if slot.phase == SessionPhase::Starting {
                    slot.phase = SessionPhase::Listening;
                    info!(session = %id, "voice recognition started");
                    self.set_listening(true);
                } else {
                    debug!(session = %id, "start confirmation after stop, ignored");
                }
            }
            RecognitionEvent::Result(text) => {
                info!(session = %id, transcript = %text, "voice input received");
                match slot.callback.take() {
                    Some(callback) => callback(text),
                    None => debug!(session = %id, "no callback pending for transcript"),
                }
            }
            RecognitionEvent::Error(kind) => {
                error!(session = %id, "speech recognition error: {kind}");
                self.session = None;
                self.notify_recognition_error();
                self.set_listening(false);
            }
            RecognitionEvent::Ended => {
                info!(session = %id, "voice recognition ended");
                self.session = None;
                self.set_listening(false);
            }
        }
    }

    fn on_orphan_recognition(&mut self, id: SessionId, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Started => self.set_listening(true),
            RecognitionEvent::Result(text) => {
                warn!(session = %id, transcript = %text, "transcript from replaced session dropped");
            }
            RecognitionEvent::Error(kind) => {
                error!(session = %id, "speech recognition error: {kind}");
                self.orphans.remove(&id);
                self.notify_recognition_error();
                self.set_listening(false);
            }
            RecognitionEvent::Ended => {
                self.orphans.remove(&id);
                self.set_listening(false);
            }
        }
    }

    fn on_synthesis(&mut self, id: UtteranceId, event: SynthesisEvent) {
        if !self.utterance.as_ref().is_some_and(|u| u.id == id) {
            debug!(utterance = %id, ?event, "ignoring event for superseded utterance");
            return;
        }
        match event {
            SynthesisEvent::Started => {
                info!(utterance = %id, "speech synthesis started");
                self.set_speaking(true);
            }
            SynthesisEvent::Ended => {
                info!(utterance = %id, "speech synthesis ended");
                self.utterance = None;
                self.set_speaking(false);
            }
            SynthesisEvent::Error(kind) => {
                // logged only; synthesis failures are not surfaced to the user
                if kind.is_cancellation() {
                    debug!(utterance = %id, "speech synthesis cancelled: {kind}");
                } else {
                    warn!(utterance = %id, "speech synthesis error: {kind}");
                }
                self.utterance = None;
                self.set_speaking(false);
            }
        }
    }

    fn stop_engine_session(&mut self, id: SessionId) {
        if let Some(recognizer) = self.recognizer.as_mut() {
            recognizer.stop(id);
        }
    }

    fn notify_recognition_error(&self) {
        self.notifier.notify(Notification::destructive(
            RECOGNITION_ERROR_TITLE,
            RECOGNITION_ERROR_DESCRIPTION,
        ));
    }

    fn set_listening(&self, value: bool) {
        self.status.send_if_modified(|s| {
            let changed = s.listening != value;
            s.listening = value;
            changed
        });
    }

    fn set_speaking(&self, value: bool) {
        self.status.send_if_modified(|s| {
            let changed = s.speaking != value;
            s.speaking = value;
            changed
        });
    }
}

impl std::fmt::Debug for VoiceController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceController")
            .field("config", &self.config)
            .field("status", &self.status())
            .field("session", &self.session.as_ref().map(|s| (s.id, s.phase)))
            .field("utterance", &self.utterance.as_ref().map(|u| u.id))
            .finish_non_exhaustive()
    }
}
