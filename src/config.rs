//! Configuration: tempo, audio clock, and pitch table, loaded from ~/.pinboard/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PinboardError, Result};
use crate::event::is_playable_bpm;
use crate::notes::PitchTable;

/// Settings loaded from YAML. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinboardConfig {
    /// Tempo used when a board does not set its own.
    #[serde(default = "PinboardConfig::default_bpm")]
    pub bpm: f64,
    /// Clock rate for the offline scheduler.
    #[serde(default = "PinboardConfig::default_sample_rate")]
    pub sample_rate: u32,
    /// Frames advanced per scheduler block.
    #[serde(default = "PinboardConfig::default_block_size")]
    pub block_size: u32,
    /// Optional YAML pitch table replacing the built-in one.
    #[serde(default)]
    pub pitch_table: Option<PathBuf>,
}

impl PinboardConfig {
    fn default_bpm() -> f64 {
        120.0
    }

    fn default_sample_rate() -> u32 {
        44100
    }

    fn default_block_size() -> u32 {
        1024
    }

    /// Standard location, `~/.pinboard/config.yaml`.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".pinboard");
        path.push("config.yaml");
        path
    }

    /// Load from the standard location. A missing file gives defaults; an
    /// unreadable or malformed one gives defaults and a warning.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|e| {
            log::warn!("ignoring config at {}: {e}", path.display());
            Self::default()
        })
    }

    /// Load from an explicit path. A tempo the transport cannot run at is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        if !is_playable_bpm(config.bpm) {
            return Err(PinboardError::InvalidTempo(config.bpm));
        }
        Ok(config)
    }

    /// The pitch table this config asks for, falling back to the built-in
    /// table (with a warning) if the named file cannot be loaded.
    pub fn resolve_pitch_table(&self) -> PitchTable {
        match &self.pitch_table {
            None => PitchTable::builtin(),
            Some(path) => PitchTable::load(path).unwrap_or_else(|e| {
                log::warn!(
                    "could not load pitch table {}: {e}; using built-in",
                    path.display()
                );
                PitchTable::builtin()
            }),
        }
    }
}

impl Default for PinboardConfig {
    fn default() -> Self {
        Self {
            bpm: Self::default_bpm(),
            sample_rate: Self::default_sample_rate(),
            block_size: Self::default_block_size(),
            pitch_table: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PinboardConfig::default();
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.block_size, 1024);
        assert!(config.pitch_table.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: PinboardConfig = serde_yaml::from_str("bpm: 96\n").unwrap();
        assert_eq!(config.bpm, 96.0);
        assert_eq!(config.sample_rate, 44100);
    }

    #[test]
    fn full_yaml() {
        let yaml = r#"
bpm: 140
sample_rate: 48000
block_size: 512
pitch_table: /tmp/pitches.yaml
"#;
        let config: PinboardConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.block_size, 512);
        assert_eq!(
            config.pitch_table.as_deref(),
            Some(Path::new("/tmp/pitches.yaml"))
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "sample_rate: 22050\n").unwrap();
        let config = PinboardConfig::load_from(&path).unwrap();
        assert_eq!(config.sample_rate, 22050);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "bpm: [fast]\n").unwrap();
        assert!(PinboardConfig::load_from(&path).is_err());
    }

    #[test]
    fn unplayable_tempo_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        for bpm in [".nan", ".inf", "0", "-90"] {
            std::fs::write(&path, format!("bpm: {bpm}\n")).unwrap();
            assert!(
                matches!(
                    PinboardConfig::load_from(&path),
                    Err(PinboardError::InvalidTempo(_))
                ),
                "bpm {bpm} was accepted"
            );
        }
    }

    #[test]
    fn missing_pitch_table_falls_back_to_builtin() {
        let config = PinboardConfig {
            pitch_table: Some(PathBuf::from("/nonexistent/pitches.yaml")),
            ..PinboardConfig::default()
        };
        assert_eq!(config.resolve_pitch_table(), PitchTable::builtin());
    }

    #[test]
    fn pitch_table_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pitches.yaml");
        std::fs::write(&path, "rows:\n  - [40]\n").unwrap();
        let config = PinboardConfig {
            pitch_table: Some(path),
            ..PinboardConfig::default()
        };
        assert_eq!(config.resolve_pitch_table().pitch(0, 0), Some(40));
    }

    #[test]
    fn load_does_not_panic() {
        let _ = PinboardConfig::load();
    }
}
