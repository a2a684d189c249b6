//! AES-256 ECB/CBC with zero padding.
//!
//! This module provides:
//! - [`AesCipher`]: a PBKDF2-keyed cipher, recreated per operation
//! - [`zero_pad`]: pad to the next block boundary with literal `0x00`
//!
//! # Format quirks
//!
//! Padding is not PKCS#7: text decryption strips every trailing `0x00`,
//! so plaintext that ends in NUL bytes loses them. Structured payloads use
//! [`AesCipher::decrypt_bytes`], which returns the padded block verbatim.
//!
//! In CBC mode the IV block is encrypted ahead of the data, so the first
//! ciphertext block acts as the chaining value for the rest. Decryption
//! takes that block as its IV and the remainder as ciphertext.
//!
//! AES carries no integrity check: a wrong key yields garbage plaintext
//! without an error.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;
use crate::kdf::{stretch, STRETCHED_KEY_LEN};
use crate::memory::SecretBytes;
use crate::version::{CipherMode, EncryptionVersion, AES_BLOCK_SIZE};

type Aes256EcbEnc = ecb::Encryptor<aes::Aes256>;
type Aes256EcbDec = ecb::Decryptor<aes::Aes256>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Helper for AES encrypt/decrypt under a PBKDF2-stretched key.
#[derive(Debug)]
pub struct AesCipher {
    key: SecretBytes<STRETCHED_KEY_LEN>,
}

impl AesCipher {
    /// Stretch `key` with `salt` over `iterations` rounds of PBKDF2-HMAC-SHA256.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Configuration` if `iterations` is zero.
    pub fn new(key: &[u8], salt: &[u8], iterations: u32) -> Result<Self, CryptoError> {
        Ok(Self {
            key: stretch(key, salt, iterations)?,
        })
    }

    /// Wrap an already stretched key.
    #[must_use]
    pub const fn from_key(key: SecretBytes<STRETCHED_KEY_LEN>) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` after zero-padding it to a block boundary.
    ///
    /// In CBC mode `iv` is required and its block is encrypted in front of
    /// the data. In ECB mode `iv` must be `None`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` if the IV does not match the mode.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        mode: CipherMode,
        iv: Option<&[u8; AES_BLOCK_SIZE]>,
    ) -> Result<Vec<u8>, CryptoError> {
        match (mode, iv) {
            (CipherMode::Ecb, None) => {
                let buf = Zeroizing::new(zero_pad(plaintext));
                let enc = Aes256EcbEnc::new_from_slice(self.key.expose())
                    .map_err(|_| CryptoError::Encryption("invalid AES key length".into()))?;
                Ok(enc.encrypt_padded_vec_mut::<NoPadding>(&buf))
            }
            (CipherMode::Cbc, Some(iv)) => {
                let mut joined = Vec::with_capacity(AES_BLOCK_SIZE.saturating_add(plaintext.len()));
                joined.extend_from_slice(iv);
                joined.extend_from_slice(plaintext);
                let buf = Zeroizing::new(zero_pad(&joined));
                joined.zeroize();
                let enc = Aes256CbcEnc::new_from_slices(self.key.expose(), iv)
                    .map_err(|_| CryptoError::Encryption("invalid AES key or IV length".into()))?;
                Ok(enc.encrypt_padded_vec_mut::<NoPadding>(&buf))
            }
            (CipherMode::Ecb, Some(_)) => Err(CryptoError::Encryption(
                "ECB mode does not take an IV".into(),
            )),
            (CipherMode::Cbc, None) => {
                Err(CryptoError::Encryption("CBC mode requires an IV".into()))
            }
        }
    }

    /// Decrypt to text, stripping trailing `0x00` padding bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the ciphertext is not block aligned
    /// or the plaintext is not UTF-8, and `CryptoError::Encryption` on an
    /// IV/mode mismatch.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        mode: CipherMode,
        iv: Option<&[u8; AES_BLOCK_SIZE]>,
    ) -> Result<Zeroizing<String>, CryptoError> {
        into_text(self.decrypt_bytes(ciphertext, mode, iv)?)
    }

    /// Decrypt and return the raw padded plaintext.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the ciphertext is not block aligned,
    /// and `CryptoError::Encryption` on an IV/mode mismatch.
    pub fn decrypt_bytes(
        &self,
        ciphertext: &[u8],
        mode: CipherMode,
        iv: Option<&[u8; AES_BLOCK_SIZE]>,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        if ciphertext.len() % AES_BLOCK_SIZE != 0 {
            return Err(CryptoError::Format(format!(
                "ciphertext length {} is not a multiple of {AES_BLOCK_SIZE}",
                ciphertext.len()
            )));
        }
        let plain = match (mode, iv) {
            (CipherMode::Ecb, None) => Aes256EcbDec::new_from_slice(self.key.expose())
                .map_err(|_| CryptoError::Encryption("invalid AES key length".into()))?
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext),
            (CipherMode::Cbc, Some(iv)) => Aes256CbcDec::new_from_slices(self.key.expose(), iv)
                .map_err(|_| CryptoError::Encryption("invalid AES key or IV length".into()))?
                .decrypt_padded_vec_mut::<NoPadding>(ciphertext),
            (CipherMode::Ecb, Some(_)) => {
                return Err(CryptoError::Encryption(
                    "ECB mode does not take an IV".into(),
                ))
            }
            (CipherMode::Cbc, None) => {
                return Err(CryptoError::Encryption("CBC mode requires an IV".into()))
            }
        };
        plain
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::Format("ciphertext is not block aligned".into()))
    }

    // ── Versioned payloads ─────────────────────────────────────────

    /// Encrypt under the mode `version` selects. CBC payloads start with
    /// the encrypted IV block; a random IV is drawn from the OS when `iv`
    /// is `None`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Encryption` if an IV is given for ECB, and
    /// `CryptoError::SecureMemory` if the CSPRNG fails.
    pub fn encrypt_versioned(
        &self,
        plaintext: &[u8],
        version: EncryptionVersion,
        iv: Option<&[u8; AES_BLOCK_SIZE]>,
    ) -> Result<Vec<u8>, CryptoError> {
        if !version.uses_iv() {
            return self.encrypt(plaintext, version.mode(), iv);
        }
        let mut generated = [0u8; AES_BLOCK_SIZE];
        let iv = match iv {
            Some(iv) => iv,
            None => {
                OsRng
                    .try_fill_bytes(&mut generated)
                    .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
                &generated
            }
        };
        let encrypted = self.encrypt(plaintext, version.mode(), Some(iv));
        generated.zeroize();
        encrypted
    }

    /// Inverse of [`AesCipher::encrypt_versioned`], returning padded bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the payload is truncated or not
    /// block aligned.
    pub fn decrypt_versioned_bytes(
        &self,
        data: &[u8],
        version: EncryptionVersion,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        if version.uses_iv() {
            let (iv, body) = split_iv(data)?;
            self.decrypt_bytes(body, version.mode(), Some(&iv))
        } else {
            self.decrypt_bytes(data, version.mode(), None)
        }
    }

    /// Inverse of [`AesCipher::encrypt_versioned`] for text payloads.
    ///
    /// # Errors
    ///
    /// Same as [`AesCipher::decrypt_versioned_bytes`], plus
    /// `CryptoError::Format` for non-UTF-8 plaintext.
    pub fn decrypt_versioned(
        &self,
        data: &[u8],
        version: EncryptionVersion,
    ) -> Result<Zeroizing<String>, CryptoError> {
        into_text(self.decrypt_versioned_bytes(data, version)?)
    }
}

/// Strip trailing NUL padding and check UTF-8.
fn into_text(mut bytes: Zeroizing<Vec<u8>>) -> Result<Zeroizing<String>, CryptoError> {
    let text_len = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last.saturating_add(1));
    bytes.truncate(text_len);
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| CryptoError::Format("decrypted data is not valid UTF-8".into()))?;
    Ok(Zeroizing::new(text.to_owned()))
}

/// Append `0x00` bytes up to the next multiple of the AES block size.
/// Aligned input (including empty input) is returned unchanged.
#[must_use]
pub fn zero_pad(data: &[u8]) -> Vec<u8> {
    let rem = data.len() % AES_BLOCK_SIZE;
    let pad = if rem == 0 {
        0
    } else {
        AES_BLOCK_SIZE.saturating_sub(rem)
    };
    let mut out = Vec::with_capacity(data.len().saturating_add(pad));
    out.extend_from_slice(data);
    out.resize(data.len().saturating_add(pad), 0);
    out
}

/// Split a CBC payload into its leading IV block and the ciphertext after it.
///
/// # Errors
///
/// Returns `CryptoError::Format` if `data` is shorter than one block.
pub fn split_iv(data: &[u8]) -> Result<([u8; AES_BLOCK_SIZE], &[u8]), CryptoError> {
    if data.len() < AES_BLOCK_SIZE {
        return Err(CryptoError::Format(format!(
            "CBC payload too short: {} bytes",
            data.len()
        )));
    }
    let (head, rest) = data.split_at(AES_BLOCK_SIZE);
    let mut iv = [0u8; AES_BLOCK_SIZE];
    iv.copy_from_slice(head);
    Ok((iv, rest))
}
