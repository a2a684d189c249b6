//! Cipher parameters chosen by the user.
//!
//! Passed explicitly to every encrypting operation. Decryption never reads
//! them: stored records and QR headers carry their own version and
//! iteration count.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::kdf::check_qr_iterations;
use crate::version::EncryptionVersion;

/// Default PBKDF2 iteration count.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Version and key-stretching cost used for new encryptions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionSettings {
    /// Cipher scheme written into new records and QR codes.
    #[serde(default)]
    pub version: EncryptionVersion,
    /// PBKDF2-HMAC-SHA256 rounds.
    #[serde(default = "default_iterations")]
    pub pbkdf2_iterations: u32,
}

const fn default_iterations() -> u32 {
    DEFAULT_PBKDF2_ITERATIONS
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        Self {
            version: EncryptionVersion::default(),
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl EncryptionSettings {
    #[must_use]
    pub const fn new(version: EncryptionVersion, pbkdf2_iterations: u32) -> Self {
        Self {
            version,
            pbkdf2_iterations,
        }
    }

    /// # Errors
    ///
    /// Returns `CryptoError::Configuration` if the iteration count is zero.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.pbkdf2_iterations == 0 {
            return Err(CryptoError::Configuration(
                "PBKDF2 iteration count must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Validate for encrypted QR export and return the header iteration field.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Configuration` unless the iteration count is a
    /// non-zero multiple of 10 000.
    pub fn validate_for_qr(&self) -> Result<u32, CryptoError> {
        check_qr_iterations(self.pbkdf2_iterations)
    }
}
