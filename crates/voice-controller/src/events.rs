use crate::{RecognitionErrorKind, SessionId, SynthesisErrorKind, UtteranceId};
use tokio::sync::mpsc;

/// Events a recognition engine reports for one session.
///
/// A session yields at most one `Result` followed by exactly one terminal
/// event, `Error` or `Ended`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Started,
    Result(String),
    Error(RecognitionErrorKind),
    Ended,
}

/// Events a synthesis engine reports for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    Started,
    Ended,
    Error(SynthesisErrorKind),
}

/// An engine event tagged with the sub-session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Recognition {
        session: SessionId,
        event: RecognitionEvent,
    },
    Synthesis {
        utterance: UtteranceId,
        event: SynthesisEvent,
    },
}

/// Handle engines use to report events back to the controller.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EventSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<EngineEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: EngineEvent) {
        if self.tx.send(event).is_err() {
            // controller gone; nothing left to observe the event
            tracing::debug!("voice controller dropped, engine event discarded");
        }
    }

    pub fn recognition(&self, session: SessionId, event: RecognitionEvent) {
        self.send(EngineEvent::Recognition { session, event });
    }

    pub fn synthesis(&self, utterance: UtteranceId, event: SynthesisEvent) {
        self.send(EngineEvent::Synthesis { utterance, event });
    }
}
