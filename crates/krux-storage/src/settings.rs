//! Device settings: cipher parameters and storage directories.
//!
//! Stored as plain JSON next to the flash store. Nothing here is secret;
//! settings are readable before any key is loaded.

use std::fs;
use std::path::{Path, PathBuf};

use krux_crypto_core::EncryptionSettings;
use serde::{Deserialize, Serialize};

use crate::store::write_atomic;

// ── Storage directories ────────────────────────────────────────────

/// Directories backing each [`StorageLocation`](crate::StorageLocation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSettings {
    /// Internal flash mount point.
    #[serde(default = "default_flash_dir")]
    pub flash_dir: PathBuf,

    /// SD card mount point; `None` disables the SD card location.
    #[serde(default = "default_sd_dir")]
    pub sd_dir: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            flash_dir: default_flash_dir(),
            sd_dir: default_sd_dir(),
        }
    }
}

impl StorageSettings {
    /// Flash-only settings rooted at `flash_dir`.
    #[must_use]
    pub fn flash_only(flash_dir: impl Into<PathBuf>) -> Self {
        Self {
            flash_dir: flash_dir.into(),
            sd_dir: None,
        }
    }
}

fn default_flash_dir() -> PathBuf {
    PathBuf::from("/flash")
}
#[allow(clippy::unnecessary_wraps)]
fn default_sd_dir() -> Option<PathBuf> {
    Some(PathBuf::from("/sd"))
}

// ── Top-level settings ─────────────────────────────────────────────

/// All persisted settings.
///
/// Persisted to `{data_dir}/settings.json`. Every field has a default, so
/// partial documents load.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Cipher used for new stored mnemonics and encrypted QR codes.
    #[serde(default)]
    pub encryption: EncryptionSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

// ── File I/O ───────────────────────────────────────────────────────

const SETTINGS_FILE: &str = "settings.json";

impl Settings {
    /// Load settings from `{data_dir}/settings.json`.
    ///
    /// Returns [`Default::default()`] when the file is missing or
    /// contains invalid JSON.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(SETTINGS_FILE);
        fs::read_to_string(&path).map_or_else(
            |_| Self::default(),
            |contents| {
                serde_json::from_str(&contents).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt settings");
                    Self::default()
                })
            },
        )
    }

    /// Persist settings to `{data_dir}/settings.json` atomically.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory does not exist or the
    /// file system rejects the write/rename.
    pub fn save(&self, data_dir: &Path) -> std::io::Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        write_atomic(data_dir, SETTINGS_FILE, &json)
    }
}

// ── Tests ──────────────────────────────────────────────────────────
