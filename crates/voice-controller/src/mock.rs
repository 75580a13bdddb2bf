//! In-process engines for tests and the demo binary.
//!
//! Each mock is a cheap `Clone` over shared state, so a test can hand one
//! clone to the controller and keep another to script outcomes and inspect
//! the calls it received.

use crate::{
    EventSender, Notification, NotificationSink, RecognitionConfig, RecognitionEngine,
    RecognitionErrorKind, RecognitionEvent, Result, SessionId, SynthesisEngine,
    SynthesisErrorKind, SynthesisEvent, Utterance, UtteranceId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// How the next recognition session plays out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Start, deliver the transcript, end.
    Transcript(String),
    /// Start, then fail.
    Error(RecognitionErrorKind),
    /// Start and end without hearing anything.
    Silence,
    /// Start and stay open until stopped.
    Hold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerCall {
    Start {
        session: SessionId,
        config: RecognitionConfig,
    },
    Stop {
        session: SessionId,
    },
}

#[derive(Default)]
struct RecognizerState {
    unavailable: bool,
    script: VecDeque<ScriptedOutcome>,
    open: HashMap<SessionId, EventSender>,
    calls: Vec<RecognizerCall>,
}

/// Scripted recognizer. Sessions with no scripted outcome are held open.
#[derive(Clone, Default)]
pub struct MockRecognizer {
    inner: Arc<Mutex<RecognizerState>>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recognizer reporting that the platform cannot recognize speech.
    pub fn unsupported() -> Self {
        let mock = Self::default();
        lock(&mock.inner).unavailable = true;
        mock
    }

    pub fn with_script(outcomes: impl IntoIterator<Item = ScriptedOutcome>) -> Self {
        let mock = Self::default();
        lock(&mock.inner).script.extend(outcomes);
        mock
    }

    pub fn push(&self, outcome: ScriptedOutcome) {
        lock(&self.inner).script.push_back(outcome);
    }

    /// Drop outcomes no session has consumed yet. Returns how many.
    pub fn clear_script(&self) -> usize {
        let mut st = lock(&self.inner);
        let n = st.script.len();
        st.script.clear();
        n
    }

    pub fn calls(&self) -> Vec<RecognizerCall> {
        lock(&self.inner).calls.clone()
    }

    /// Sessions started and not yet terminated by this engine.
    pub fn open_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = lock(&self.inner).open.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl RecognitionEngine for MockRecognizer {
    fn is_available(&self) -> bool {
        !lock(&self.inner).unavailable
    }

    fn start(
        &mut self,
        session: SessionId,
        config: &RecognitionConfig,
        events: EventSender,
    ) -> Result<()> {
        let mut st = lock(&self.inner);
        st.calls.push(RecognizerCall::Start {
            session,
            config: config.clone(),
        });
        events.recognition(session, RecognitionEvent::Started);
        match st.script.pop_front().unwrap_or(ScriptedOutcome::Hold) {
            ScriptedOutcome::Transcript(text) => {
                events.recognition(session, RecognitionEvent::Result(text));
                events.recognition(session, RecognitionEvent::Ended);
            }
            ScriptedOutcome::Error(kind) => {
                events.recognition(session, RecognitionEvent::Error(kind));
            }
            ScriptedOutcome::Silence => {
                events.recognition(session, RecognitionEvent::Ended);
            }
            ScriptedOutcome::Hold => {
                st.open.insert(session, events);
            }
        }
        Ok(())
    }

    fn stop(&mut self, session: SessionId) {
        let mut st = lock(&self.inner);
        st.calls.push(RecognizerCall::Stop { session });
        if let Some(events) = st.open.remove(&session) {
            events.recognition(session, RecognitionEvent::Ended);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesizerCall {
    Speak {
        utterance: UtteranceId,
        request: Utterance,
    },
    Cancel,
}

#[derive(Default)]
struct SynthesizerState {
    auto_complete: bool,
    in_flight: Option<(UtteranceId, EventSender)>,
    calls: Vec<SynthesizerCall>,
}

/// Synthesizer that plays nothing. Zero-length text is declined silently.
#[derive(Clone, Default)]
pub struct MockSynthesizer {
    inner: Arc<Mutex<SynthesizerState>>,
}

impl MockSynthesizer {
    /// Utterances stay in flight until [`finish`](Self::finish),
    /// [`fail`](Self::fail) or a cancel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every utterance reports start and end as soon as it is submitted.
    pub fn auto_complete() -> Self {
        let mock = Self::default();
        lock(&mock.inner).auto_complete = true;
        mock
    }

    /// Complete the in-flight utterance normally.
    pub fn finish(&self) -> Option<UtteranceId> {
        let (id, events) = lock(&self.inner).in_flight.take()?;
        events.synthesis(id, SynthesisEvent::Ended);
        Some(id)
    }

    pub fn fail(&self, kind: SynthesisErrorKind) -> Option<UtteranceId> {
        let (id, events) = lock(&self.inner).in_flight.take()?;
        events.synthesis(id, SynthesisEvent::Error(kind));
        Some(id)
    }

    pub fn in_flight(&self) -> Option<UtteranceId> {
        lock(&self.inner).in_flight.as_ref().map(|(id, _)| *id)
    }

    pub fn calls(&self) -> Vec<SynthesizerCall> {
        lock(&self.inner).calls.clone()
    }

    /// Text of every utterance submitted, in order.
    pub fn spoken(&self) -> Vec<String> {
        lock(&self.inner)
            .calls
            .iter()
            .filter_map(|c| match c {
                SynthesizerCall::Speak { request, .. } => Some(request.text.clone()),
                SynthesizerCall::Cancel => None,
            })
            .collect()
    }
}

impl SynthesisEngine for MockSynthesizer {
    fn speak(
        &mut self,
        utterance: UtteranceId,
        request: &Utterance,
        events: EventSender,
    ) -> Result<()> {
        let mut st = lock(&self.inner);
        st.calls.push(SynthesizerCall::Speak {
            utterance,
            request: request.clone(),
        });
        if request.text.is_empty() {
            return Ok(());
        }
        events.synthesis(utterance, SynthesisEvent::Started);
        if st.auto_complete {
            events.synthesis(utterance, SynthesisEvent::Ended);
        } else {
            st.in_flight = Some((utterance, events));
        }
        Ok(())
    }

    fn cancel(&mut self) {
        let mut st = lock(&self.inner);
        st.calls.push(SynthesizerCall::Cancel);
        if let Some((id, events)) = st.in_flight.take() {
            events.synthesis(id, SynthesisEvent::Error(SynthesisErrorKind::Interrupted));
        }
    }
}

/// Sink that keeps every notification for later inspection.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    received: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.received).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.received).is_empty()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.received).push(notification);
    }
}
