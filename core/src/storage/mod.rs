//! TOML persistence for profiles and the import/export slot directory
//!
//! ```text
//! <config>/kat/profiles.toml         current + every profile of a vessel
//! <config>/kat/export/triggers_X.toml  one exported rule set per slot
//! ```

mod profiles;
mod slots;

pub use profiles::{
    default_export_dir, default_profiles_path, load_file, load_profiles, load_profiles_or_default,
    save_file, save_profiles,
};
pub use slots::SlotStore;

use std::path::PathBuf;

/// Errors from reading or writing persisted rules
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error on {path:?}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("serialize error for {path:?}: {source}")]
    SerializeError {
        path: PathBuf,
        source: toml::ser::Error,
    },

    #[error("unsupported format version {found} in {path:?}")]
    UnsupportedVersion { path: PathBuf, found: u32 },
}
