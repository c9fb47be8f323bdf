use std::fs;
use std::path::{Path, PathBuf};

use kat_types::{RULES_FORMAT_VERSION, RuleSetConfig, SlotFile};

use super::{StorageError, load_file, save_file};

const SLOT_PREFIX: &str = "triggers_";
const SLOT_EXTENSION: &str = "toml";

/// Directory of named rule set exports (`triggers_<name>.toml`)
#[derive(Debug, Clone)]
pub struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{SLOT_PREFIX}{name}.{SLOT_EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Importable slot names, sorted. A missing directory has none.
    pub fn list(&self) -> Result<Vec<String>, StorageError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.dir).map_err(|e| StorageError::IoError {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == SLOT_EXTENSION))
            .filter_map(|path| {
                path.file_stem()?
                    .to_str()?
                    .strip_prefix(SLOT_PREFIX)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    /// Write `config` to slot `name`. Returns false without writing when the
    /// slot exists and `overwrite` is not set.
    pub fn export(
        &self,
        name: &str,
        config: &RuleSetConfig,
        overwrite: bool,
    ) -> Result<bool, StorageError> {
        let path = self.path_for(name);
        if path.exists() && !overwrite {
            tracing::debug!(slot = name, "Export slot exists, not overwriting");
            return Ok(false);
        }
        save_file(&path, &SlotFile::new(config.clone()))?;
        tracing::info!(slot = name, path = %path.display(), "Exported rule set");
        Ok(true)
    }

    pub fn import(&self, name: &str) -> Result<RuleSetConfig, StorageError> {
        let path = self.path_for(name);
        let slot: SlotFile = load_file(&path)?;
        if slot.format_version > RULES_FORMAT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                path,
                found: slot.format_version,
            });
        }
        tracing::info!(slot = name, rules = slot.config.rules.len(), "Imported rule set");
        Ok(slot.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kat_types::RuleConfig;

    fn config(name: &str) -> RuleSetConfig {
        RuleSetConfig {
            name: name.to_string(),
            rules: vec![RuleConfig::new("Stage3")],
            timers: Vec::new(),
        }
    }

    #[test]
    fn test_export_refuses_overwrite_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::new(dir.path());

        assert!(store.export("ascent", &config("first"), false).unwrap());
        assert!(!store.export("ascent", &config("second"), false).unwrap());
        assert_eq!(store.import("ascent").unwrap().name, "first");

        assert!(store.export("ascent", &config("second"), true).unwrap());
        assert_eq!(store.import("ascent").unwrap().name, "second");
    }

    #[test]
    fn test_list_only_slot_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::new(dir.path());
        store.export("b", &config("b"), false).unwrap();
        store.export("a", &config("a"), false).unwrap();
        fs::write(dir.path().join("notes.toml"), "").unwrap();
        fs::write(dir.path().join("triggers_c.txt"), "").unwrap();

        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
        assert!(store.exists("a"));
        assert!(!store.exists("c"));
    }

    #[test]
    fn test_missing_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::new(dir.path().join("none"));
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.import("x"), Err(StorageError::IoError { .. })));
    }

    #[test]
    fn test_newer_format_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SlotStore::new(dir.path());
        fs::write(
            store.path_for("future"),
            "format_version = 99\n[config]\nname = \"x\"\n",
        )
        .unwrap();
        assert!(matches!(
            store.import("future"),
            Err(StorageError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
