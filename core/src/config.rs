use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::storage::{SlotStore, default_export_dir, default_profiles_path};

const APP_NAME: &str = "kat";

/// User configuration, stored by `confy` in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Profile file; defaults to `<config>/kat/profiles.toml`
    pub profiles_file: Option<PathBuf>,
    /// Import/export slot directory; defaults to `<config>/kat/export`
    pub export_dir: Option<PathBuf>,
    /// On-screen time of messages that don't set their own
    pub message_duration_secs: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profiles_file: None,
            export_dir: None,
            message_duration_secs: 2.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] confy::ConfyError),

    #[error("no {0} configured and no platform config directory")]
    NoPath(&'static str),
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn store(&self) -> Result<(), ConfigError> {
        Ok(confy::store(APP_NAME, None, self)?)
    }

    /// Stored configuration, or defaults if it cannot be read
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default engine configuration");
            Self::default()
        })
    }

    pub fn profiles_path(&self) -> Result<PathBuf, ConfigError> {
        self.profiles_file
            .clone()
            .or_else(default_profiles_path)
            .ok_or(ConfigError::NoPath("profile file"))
    }

    pub fn slot_store(&self) -> Result<SlotStore, ConfigError> {
        self.export_dir
            .clone()
            .or_else(default_export_dir)
            .map(SlotStore::new)
            .ok_or(ConfigError::NoPath("export directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.message_duration_secs, 2.0);
        assert!(config.profiles_file.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: EngineConfig = toml::from_str("export_dir = \"/tmp/kat\"").unwrap();
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/kat")));
        assert_eq!(config.message_duration_secs, 2.0);
        assert_eq!(
            config.slot_store().unwrap().dir(),
            std::path::Path::new("/tmp/kat")
        );
    }

    #[test]
    fn test_explicit_profiles_path_wins() {
        let config = EngineConfig {
            profiles_file: Some(PathBuf::from("rules.toml")),
            ..Default::default()
        };
        assert_eq!(config.profiles_path().unwrap(), PathBuf::from("rules.toml"));
    }
}
