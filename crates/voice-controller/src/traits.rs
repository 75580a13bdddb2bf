use crate::{EventSender, Notification, RecognitionConfig, Result, SessionId, Utterance, UtteranceId};

/// A speech-recognition engine. Each `start` opens an independent session.
pub trait RecognitionEngine: Send {
    /// Whether the platform can recognize speech at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Open and start a session. Events for it go through `events`,
    /// never synchronously back into the caller.
    fn start(
        &mut self,
        session: SessionId,
        config: &RecognitionConfig,
        events: EventSender,
    ) -> Result<()>;

    /// Request cooperative termination. The engine still reports a
    /// terminal event for the session.
    fn stop(&mut self, session: SessionId);
}

/// The process-wide speech-synthesis engine.
pub trait SynthesisEngine: Send {
    fn speak(&mut self, utterance: UtteranceId, request: &Utterance, events: EventSender)
        -> Result<()>;

    /// Discard everything queued or in flight.
    fn cancel(&mut self);
}

/// Receiver of user-visible warnings.
pub trait NotificationSink: Send {
    fn notify(&self, notification: Notification);
}
