//! Storage error types for `krux-storage`.

use thiserror::Error;
use krux_crypto_core::CryptoError;

use crate::location::StorageLocation;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Cryptographic operation failed (delegated from crypto-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The requested location has no backing directory (SD card absent).
    #[error("storage location unavailable: {0}")]
    LocationUnavailable(StorageLocation),

    /// Document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
