//! `krux-crypto-core`: Mnemonic encryption and key derivation for Krux.
//!
//! Pure primitives: PBKDF2 key stretching, AES-ECB/CBC mnemonic
//! encryption, the encrypted QR payload codec, BIP39 helpers and BIP32
//! key derivation. No file I/O lives here; see `krux-storage`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod kdf;
pub mod version;
pub mod cipher;
pub mod config;

pub mod checkpoint;
pub mod bip39;

pub mod qr;

pub mod key;

pub use bip39::{
    entropy_to_mnemonic, get_final_word_candidates, mnemonic_to_entropy, pick_final_word,
    suggest_words, validate_phrase, word_index, VALID_WORD_COUNTS, WORDLIST_SIZE,
};
pub use checkpoint::{Checkpoint, FnCheckpoint, NoopCheckpoint};
pub use cipher::AesCipher;
pub use config::{EncryptionSettings, DEFAULT_PBKDF2_ITERATIONS};
pub use error::CryptoError;
pub use kdf::{check_qr_iterations, stretch, ITERATIONS_MULTIPLE, STRETCHED_KEY_LEN};
pub use key::{Key, KeyOptions, Network, ScriptType};
pub use memory::{LockedRegion, SecretBytes};
pub use qr::{EncryptedQrCode, QrPublicData};
pub use version::{CipherMode, EncryptionVersion, AES_BLOCK_SIZE};
