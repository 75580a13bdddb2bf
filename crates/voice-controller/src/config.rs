use crate::{Result, UtteranceParams, VoiceError};
use serde::{Deserialize, Serialize};

/// What `start_listening` does while another session is still open.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Ignore the new request; its callback is dropped unused.
    #[default]
    Reject,
    /// Stop the open session and start the new one.
    Supersede,
    /// Replace the handle and callback, leaving the old session running
    /// unobserved. Its terminal event still clears the listening flag.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP 47 tag used for every recognition session.
    pub locale: String,
    pub utterance: UtteranceParams,
    pub overlap_policy: OverlapPolicy,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            utterance: UtteranceParams::default(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

impl VoiceConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(raw).map_err(|e| VoiceError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| VoiceError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.locale.trim().is_empty() {
            return Err(VoiceError::Config("locale must not be empty".into()));
        }
        let p = &self.utterance;
        if !(0.1..=10.0).contains(&p.rate) {
            return Err(VoiceError::Config(format!(
                "utterance rate {} outside 0.1..=10",
                p.rate
            )));
        }
        if !(0.0..=2.0).contains(&p.pitch) {
            return Err(VoiceError::Config(format!(
                "utterance pitch {} outside 0..=2",
                p.pitch
            )));
        }
        if !(0.0..=1.0).contains(&p.volume) {
            return Err(VoiceError::Config(format!(
                "utterance volume {} outside 0..=1",
                p.volume
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = VoiceConfig::default();
        assert_eq!(cfg.locale, "en-US");
        assert_eq!(cfg.overlap_policy, OverlapPolicy::Reject);
        assert!((cfg.utterance.rate - 0.9).abs() < f32::EPSILON);
        assert!((cfg.utterance.pitch - 1.0).abs() < f32::EPSILON);
        assert!((cfg.utterance.volume - 0.8).abs() < f32::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = VoiceConfig::from_json_str(r#"{"overlap_policy": "supersede"}"#).unwrap();
        assert_eq!(cfg.overlap_policy, OverlapPolicy::Supersede);
        assert_eq!(cfg.locale, "en-US");

        let cfg = VoiceConfig::from_json_str(r#"{"utterance": {"rate": 1.2}}"#).unwrap();
        assert!((cfg.utterance.rate - 1.2).abs() < f32::EPSILON);
        assert!((cfg.utterance.volume - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(VoiceConfig::from_json_str(r#"{"utterance": {"volume": 1.5}}"#).is_err());
        assert!(VoiceConfig::from_json_str(r#"{"utterance": {"rate": 0.0}}"#).is_err());
        assert!(VoiceConfig::from_json_str(r#"{"locale": "  "}"#).is_err());
        assert!(VoiceConfig::from_json_str(r#"{"overlap_policy": "queue"}"#).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let cfg = VoiceConfig {
            locale: "en-GB".into(),
            overlap_policy: OverlapPolicy::Legacy,
            ..VoiceConfig::default()
        };
        let back = VoiceConfig::from_json_str(&cfg.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }
}
