//! The active wallet context.
//!
//! A [`Session`] is the sole owner of the loaded [`Key`]. Clearing or
//! dropping it drops the key, which wipes the mnemonic, the passphrase and
//! the root private scalar.

use krux_crypto_core::{CryptoError, Key, KeyOptions};
use tracing::info;

use crate::error::StorageError;
use crate::location::StorageLocation;
use crate::mnemonic_storage::MnemonicStorage;

#[derive(Debug, Default)]
pub struct Session {
    key: Option<Key>,
}

impl Session {
    #[must_use]
    pub const fn new() -> Self {
        Self { key: None }
    }

    /// Replace the active key with one derived from `mnemonic`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Crypto` if the mnemonic or options are invalid;
    /// the previous key is cleared either way.
    pub fn load_key(&mut self, mnemonic: &str, options: KeyOptions) -> Result<&Key, StorageError> {
        self.clear();
        let key = Key::new(mnemonic, options)?;
        info!(fingerprint = %key.fingerprint_hex_str(false), "session key loaded");
        Ok(self.key.insert(key))
    }

    /// Decrypt `mnemonic_id` from `storage` and load it.
    ///
    /// Returns `Ok(None)` if the record is missing or does not decrypt to a
    /// valid mnemonic; the session is left empty in that case.
    ///
    /// # Errors
    ///
    /// Propagates key-derivation errors other than an invalid mnemonic.
    pub fn load_stored(
        &mut self,
        storage: &MnemonicStorage,
        key: &[u8],
        mnemonic_id: &str,
        location: StorageLocation,
        options: KeyOptions,
    ) -> Result<Option<&Key>, StorageError> {
        self.clear();
        let Some(words) = storage.decrypt(key, mnemonic_id, location) else {
            return Ok(None);
        };
        match Key::new(&words, options) {
            Ok(loaded) => Ok(Some(self.key.insert(loaded))),
            Err(CryptoError::Wordlist(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[must_use]
    pub const fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.key.is_some()
    }

    /// Drop the active key, wiping its secrets.
    pub fn clear(&mut self) {
        if self.key.take().is_some() {
            info!("session key cleared");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.clear();
    }
}
