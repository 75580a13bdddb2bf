use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = VoiceError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech recognition is not supported on this platform")]
    UnsupportedCapability,
    #[error("engine error: {0}")]
    Engine(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Reason codes a recognition engine reports with its `error` event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecognitionErrorKind {
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    NotAllowed,
    ServiceNotAllowed,
    LanguageNotSupported,
    Other(String),
}

impl fmt::Display for RecognitionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSpeech => f.write_str("no-speech"),
            Self::Aborted => f.write_str("aborted"),
            Self::AudioCapture => f.write_str("audio-capture"),
            Self::Network => f.write_str("network"),
            Self::NotAllowed => f.write_str("not-allowed"),
            Self::ServiceNotAllowed => f.write_str("service-not-allowed"),
            Self::LanguageNotSupported => f.write_str("language-not-supported"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

/// Reason codes a synthesis engine reports with an utterance `error` event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesisErrorKind {
    Canceled,
    Interrupted,
    AudioBusy,
    AudioHardware,
    SynthesisFailed,
    VoiceUnavailable,
    TextTooLong,
    Other(String),
}

impl SynthesisErrorKind {
    /// Cancellation by a newer request or an explicit stop, not a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Canceled | Self::Interrupted)
    }
}

impl fmt::Display for SynthesisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canceled => f.write_str("canceled"),
            Self::Interrupted => f.write_str("interrupted"),
            Self::AudioBusy => f.write_str("audio-busy"),
            Self::AudioHardware => f.write_str("audio-hardware"),
            Self::SynthesisFailed => f.write_str("synthesis-failed"),
            Self::VoiceUnavailable => f.write_str("voice-unavailable"),
            Self::TextTooLong => f.write_str("text-too-long"),
            Self::Other(code) => write!(f, "{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_codes() {
        assert!(SynthesisErrorKind::Interrupted.is_cancellation());
        assert!(SynthesisErrorKind::Canceled.is_cancellation());
        assert!(!SynthesisErrorKind::AudioBusy.is_cancellation());
        assert!(!SynthesisErrorKind::Other("busy".into()).is_cancellation());
    }

    #[test]
    fn test_reason_codes_display_kebab_case() {
        assert_eq!(RecognitionErrorKind::NoSpeech.to_string(), "no-speech");
        assert_eq!(SynthesisErrorKind::TextTooLong.to_string(), "text-too-long");
    }
}
