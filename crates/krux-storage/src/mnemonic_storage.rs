//! Encrypted mnemonics persisted by ID at two locations.
//!
//! Each record is keyed by its mnemonic ID, which doubles as the PBKDF2
//! salt. Encryption uses the configured [`EncryptionSettings`]; decryption
//! uses only what the record itself stores, so records written under older
//! settings stay readable.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use krux_crypto_core::{AesCipher, CryptoError, EncryptionSettings, AES_BLOCK_SIZE};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::StorageError;
use crate::location::StorageLocation;
use crate::settings::{Settings, StorageSettings};
use crate::store::{JsonStore, StoredRecord};

/// Encrypted mnemonic store over flash and an optional SD card.
#[derive(Debug, Clone)]
pub struct MnemonicStorage {
    encryption: EncryptionSettings,
    flash: JsonStore,
    sd_card: Option<JsonStore>,
}

impl MnemonicStorage {
    #[must_use]
    pub fn new(encryption: EncryptionSettings, storage: &StorageSettings) -> Self {
        Self {
            encryption,
            flash: JsonStore::new(storage.flash_dir.clone()),
            sd_card: storage.sd_dir.clone().map(JsonStore::new),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.encryption, &settings.storage)
    }

    #[must_use]
    pub const fn encryption(&self) -> &EncryptionSettings {
        &self.encryption
    }

    /// Whether an SD card directory is configured and mounted.
    #[must_use]
    pub fn has_sd_card(&self) -> bool {
        self.sd_card.as_ref().is_some_and(|s| s.dir().is_dir())
    }

    fn location(&self, location: StorageLocation) -> Option<&JsonStore> {
        match location {
            StorageLocation::Flash => Some(&self.flash),
            StorageLocation::SdCard => self.sd_card.as_ref().filter(|s| s.dir().is_dir()),
        }
    }

    // ── Queries ────────────────────────────────────────────────────

    /// Stored mnemonic IDs in insertion order; empty for an absent SD card.
    #[must_use]
    pub fn list(&self, location: StorageLocation) -> Vec<String> {
        self.location(location).map_or_else(Vec::new, JsonStore::keys)
    }

    #[must_use]
    pub fn contains(&self, mnemonic_id: &str, location: StorageLocation) -> bool {
        self.location(location)
            .is_some_and(|store| store.contains(mnemonic_id))
    }

    // ── Store / delete ─────────────────────────────────────────────

    /// Encrypt `mnemonic` under `key` and write it as `mnemonic_id`,
    /// replacing any record with that ID.
    ///
    /// # Errors
    ///
    /// - `StorageError::LocationUnavailable` if `location` is not mounted
    /// - `StorageError::Crypto` for invalid settings or an IV supplied to
    ///   an ECB configuration
    /// - `StorageError::Io` if the document cannot be written
    pub fn store(
        &self,
        key: &[u8],
        mnemonic_id: &str,
        mnemonic: &str,
        location: StorageLocation,
        iv: Option<&[u8; AES_BLOCK_SIZE]>,
    ) -> Result<(), StorageError> {
        let store = self
            .location(location)
            .ok_or(StorageError::LocationUnavailable(location))?;
        self.encryption.validate()?;

        let version = self.encryption.version;
        let iterations = self.encryption.pbkdf2_iterations;
        let cipher = AesCipher::new(key, mnemonic_id.as_bytes(), iterations)?;
        let encrypted = cipher.encrypt_versioned(mnemonic.as_bytes(), version, iv)?;

        store.put(
            mnemonic_id,
            &StoredRecord {
                data: STANDARD.encode(encrypted),
                version,
                key_iterations: iterations,
            },
        )?;
        info!(mnemonic_id, %location, %version, iterations, "stored encrypted mnemonic");
        Ok(())
    }

    /// Remove `mnemonic_id`. Absent IDs and absent locations are not errors.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the document cannot be rewritten.
    pub fn delete(&self, mnemonic_id: &str, location: StorageLocation) -> Result<(), StorageError> {
        let Some(store) = self.location(location) else {
            return Ok(());
        };
        if store.remove(mnemonic_id)? {
            info!(mnemonic_id, %location, "deleted encrypted mnemonic");
        }
        Ok(())
    }

    // ── Decrypt ────────────────────────────────────────────────────

    /// Decrypt `mnemonic_id` with `key`, using the record's own version and
    /// iteration count.
    ///
    /// Returns `None` when the record is missing or malformed, or when
    /// decryption does not yield text. A wrong key that happens to decode
    /// as UTF-8 returns that text; AES carries no integrity check.
    #[must_use]
    pub fn decrypt(
        &self,
        key: &[u8],
        mnemonic_id: &str,
        location: StorageLocation,
    ) -> Option<Zeroizing<String>> {
        let Some(record) = self
            .location(location)
            .and_then(|store| store.get::<StoredRecord>(mnemonic_id))
        else {
            debug!(mnemonic_id, %location, "no stored mnemonic");
            return None;
        };

        decrypt_record(key, mnemonic_id, &record)
            .map_err(|e| {
                if e.is_recoverable() {
                    debug!(mnemonic_id, %location, error = %e, "stored mnemonic did not decrypt");
                } else {
                    warn!(mnemonic_id, %location, error = %e, "stored mnemonic decryption failed");
                }
            })
            .ok()
    }
}

fn decrypt_record(
    key: &[u8],
    mnemonic_id: &str,
    record: &StoredRecord,
) -> Result<Zeroizing<String>, CryptoError> {
    if record.key_iterations == 0 {
        return Err(CryptoError::Format("record has zero key iterations".into()));
    }
    let data = Zeroizing::new(
        STANDARD
            .decode(&record.data)
            .map_err(|e| CryptoError::Format(format!("record data is not base64: {e}")))?,
    );
    let cipher = AesCipher::new(key, mnemonic_id.as_bytes(), record.key_iterations)?;
    cipher.decrypt_versioned(&data, record.version)
}

// ── Tests ──────────────────────────────────────────────────────────
