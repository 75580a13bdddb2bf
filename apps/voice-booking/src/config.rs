use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;
use voice_controller::VoiceConfig;

/// Read a JSON voice config. A missing file means defaults.
pub fn load(path: &Path) -> Result<VoiceConfig> {
    if !path.exists() {
        info!("config {} not found, using defaults", path.display());
        return Ok(VoiceConfig::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading voice config: {}", path.display()))?;
    VoiceConfig::from_json_str(&raw)
        .with_context(|| format!("parsing voice config: {}", path.display()))
}

pub fn save(config: &VoiceConfig, path: &Path) -> Result<()> {
    let json = config.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("writing voice config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_controller::OverlapPolicy;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(&dir.path().join("voice.json")).unwrap();
        assert_eq!(cfg, VoiceConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.json");
        let cfg = VoiceConfig {
            locale: "en-GB".into(),
            overlap_policy: OverlapPolicy::Supersede,
            ..VoiceConfig::default()
        };
        save(&cfg, &path).unwrap();
        assert_eq!(load(&path).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.json");
        fs::write(&path, r#"{"utterance": {"volume": 3.0}}"#).unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("volume"));
    }
}
