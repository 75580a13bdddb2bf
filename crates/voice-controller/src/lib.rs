//! voice-controller: owns speech recognition and speech synthesis sessions
//!
//! The controller exposes four capabilities (`start_listening`,
//! `stop_listening`, `speak`, `stop_speaking`) and publishes two flags,
//! listening and speaking. Engines are injected behind traits and report
//! back through typed events. The default build enables a `mock` backend so
//! that binaries and tests run on any host without audio devices.

mod types;
pub use types::{
    Notification, RecognitionConfig, SessionId, Severity, Utterance, UtteranceId,
    UtteranceParams, VoiceStatus,
};

mod error;
pub use error::{RecognitionErrorKind, Result, SynthesisErrorKind, VoiceError};

mod events;
pub use events::{EngineEvent, EventSender, RecognitionEvent, SynthesisEvent};

mod traits;
pub use traits::{NotificationSink, RecognitionEngine, SynthesisEngine};

mod config;
pub use config::{OverlapPolicy, VoiceConfig};

mod controller;
pub use controller::{TranscriptCallback, VoiceController};

mod notify;
pub use notify::TracingNotifier;

#[cfg(feature = "mock")]
pub mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockRecognizer, MockSynthesizer, RecordingNotifier, ScriptedOutcome};
