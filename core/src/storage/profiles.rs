use std::fs;
use std::path::{Path, PathBuf};

use kat_types::ProfilesConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::StorageError;

/// Load any persisted TOML document
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let contents = fs::read_to_string(path).map_err(|e| StorageError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| StorageError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a TOML document, creating the parent directory if needed
pub fn save_file<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let contents = toml::to_string_pretty(value).map_err(|e| StorageError::SerializeError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, contents).map_err(|e| StorageError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn load_profiles(path: &Path) -> Result<ProfilesConfig, StorageError> {
    let config: ProfilesConfig = load_file(path)?;
    tracing::info!(path = %path.display(), profiles = config.profiles.len(), "Loaded rule profiles");
    Ok(config)
}

pub fn save_profiles(path: &Path, config: &ProfilesConfig) -> Result<(), StorageError> {
    save_file(path, config)?;
    tracing::info!(path = %path.display(), profiles = config.profiles.len(), "Saved rule profiles");
    Ok(())
}

/// Missing files are a fresh start; unreadable ones are logged and replaced
/// by defaults
pub fn load_profiles_or_default(path: &Path) -> ProfilesConfig {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No profile file, starting fresh");
        return ProfilesConfig::default();
    }
    match load_profiles(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load rule profiles, using defaults");
            ProfilesConfig::default()
        }
    }
}

pub fn default_profiles_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kat").join("profiles.toml"))
}

pub fn default_export_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("kat").join("export"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kat_types::{RuleConfig, RuleSetConfig};

    fn sample() -> ProfilesConfig {
        let mut first = RuleSetConfig {
            name: "Ascent".to_string(),
            ..Default::default()
        };
        first.rules.push(RuleConfig::new("Stage3"));
        ProfilesConfig {
            current: 1,
            profiles: vec![
                first,
                RuleSetConfig {
                    name: "Landing".to_string(),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profiles.toml");

        save_profiles(&path, &sample()).unwrap();
        assert_eq!(load_profiles(&path).unwrap(), sample());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.toml");
        fs::write(&path, "current = [not toml").unwrap();

        assert!(matches!(load_profiles(&path), Err(StorageError::ParseError { .. })));
        assert_eq!(load_profiles_or_default(&path), ProfilesConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(load_profiles(&path), Err(StorageError::IoError { .. })));
        assert_eq!(load_profiles_or_default(&path), ProfilesConfig::default());
    }
}
