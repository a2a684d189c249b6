//! Cryptographic error types for `krux-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic, codec and derivation operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Invalid cipher parameters (zero iterations, iterations not encodable
    /// in an encrypted QR header). The caller must fix its configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed stored record or QR payload (bad lengths, unknown version).
    #[error("format error: {0}")]
    Format(String),

    /// Decrypted payload failed its checksum: wrong key or corrupted data.
    #[error("integrity check failed: wrong key or corrupted data")]
    Integrity,

    /// Word count or word membership failure against the BIP39 wordlist.
    #[error("wordlist error: {0}")]
    Wordlist(String),

    /// BIP32 master or child key derivation failure.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// AES encryption/decryption failure (key or IV length, block alignment).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// ECDSA signing failure.
    #[error("signature error: {0}")]
    Signature(String),

    /// Secure memory allocation failure (CSPRNG fill).
    #[error("secure memory error: {0}")]
    SecureMemory(String),

    /// A long-running search was aborted by its liveness checkpoint.
    #[error("operation cancelled")]
    Cancelled,
}

impl CryptoError {
    /// Returns `true` for failures driven by user input (corrupt scan,
    /// wrong key) that the caller should present as "no result".
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Integrity)
    }
}
