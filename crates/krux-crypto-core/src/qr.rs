//! Encrypted mnemonic QR codes.
//!
//! Wire format (all integers big-endian):
//!
//! ```text
//! id_len (1) || id (id_len, UTF-8) || version (1) || iterations / 10_000 (3)
//!   || [IV block (16), CBC only] || AES(entropy || checksum)
//! ```
//!
//! `checksum` is the first 16 bytes of SHA-256 over the entropy. Entropy is
//! 16 bytes for 12-word mnemonics and 32 for 24-word ones; both are block
//! aligned, so the encrypted body carries no padding. The header is public:
//! [`EncryptedQrCode::public_data`] reads it without a key.

use std::fmt;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::bip39::{entropy_to_mnemonic, mnemonic_to_entropy};
use crate::cipher::AesCipher;
use crate::config::EncryptionSettings;
use crate::error::CryptoError;
use crate::kdf::ITERATIONS_MULTIPLE;
use crate::version::{EncryptionVersion, AES_BLOCK_SIZE};

/// Length of the truncated SHA-256 checksum appended to the entropy.
pub const QR_CHECKSUM_LEN: usize = 16;

/// Bytes of header after the ID: version (1) + iterations (3).
const VERSION_ITERATIONS_LEN: usize = 4;

/// Entropy lengths an encrypted QR code may carry.
const ENTROPY_LENS: [usize; 2] = [16, 32];

/// Constant-time equality for the integrity checksum.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn checksum(entropy: &[u8]) -> [u8; QR_CHECKSUM_LEN] {
    let digest = ring::digest::digest(&ring::digest::SHA256, entropy);
    let mut out = [0u8; QR_CHECKSUM_LEN];
    out.copy_from_slice(&digest.as_ref()[..QR_CHECKSUM_LEN]);
    out
}

/// Header fields readable without the decryption key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrPublicData {
    pub mnemonic_id: String,
    pub version: EncryptionVersion,
    pub iterations: u32,
}

impl fmt::Display for QrPublicData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encrypted QR Code:\nID: {}\nVersion: {}\nKey iter.: {}",
            self.mnemonic_id, self.version, self.iterations
        )
    }
}

/// A parsed encrypted QR payload awaiting its key.
#[derive(Clone, Debug)]
pub struct EncryptedQrCode {
    public: QrPublicData,
    encrypted_data: Vec<u8>,
}

impl EncryptedQrCode {
    /// Build the QR payload for `mnemonic` under `key`.
    ///
    /// `mnemonic_id` doubles as the PBKDF2 salt. In CBC mode a random IV is
    /// drawn when `iv` is `None`.
    ///
    /// # Errors
    ///
    /// - `CryptoError::Configuration` if the iteration count is not a
    ///   non-zero multiple of 10 000
    /// - `CryptoError::Format` if the ID is longer than 255 bytes
    /// - `CryptoError::Wordlist` if `mnemonic` is not a valid 12 or 24 word
    ///   mnemonic
    /// - `CryptoError::Encryption` if an IV is supplied in ECB mode
    pub fn create(
        settings: &EncryptionSettings,
        key: &[u8],
        mnemonic_id: &str,
        mnemonic: &str,
        iv: Option<&[u8; AES_BLOCK_SIZE]>,
    ) -> Result<Vec<u8>, CryptoError> {
        let scaled = settings.validate_for_qr()?;
        let id_len = u8::try_from(mnemonic_id.len()).map_err(|_| {
            CryptoError::Format(format!(
                "mnemonic ID is {} bytes, at most 255 fit a QR header",
                mnemonic_id.len()
            ))
        })?;

        let entropy = mnemonic_to_entropy(mnemonic)?;
        if !ENTROPY_LENS.contains(&entropy.len()) {
            return Err(CryptoError::Wordlist(
                "encrypted QR codes hold 12 or 24 word mnemonics only".to_string(),
            ));
        }

        let mut payload = Zeroizing::new(Vec::with_capacity(
            entropy.len().saturating_add(QR_CHECKSUM_LEN),
        ));
        payload.extend_from_slice(&entropy);
        payload.extend_from_slice(&checksum(&entropy));

        let version = settings.version;
        let cipher = AesCipher::new(key, mnemonic_id.as_bytes(), settings.pbkdf2_iterations)?;
        let encrypted = cipher.encrypt_versioned(&payload, version, iv)?;

        let [_, it_hi, it_mid, it_lo] = scaled.to_be_bytes();
        let mut out = Vec::with_capacity(
            1usize
                .saturating_add(mnemonic_id.len())
                .saturating_add(VERSION_ITERATIONS_LEN)
                .saturating_add(encrypted.len()),
        );
        out.push(id_len);
        out.extend_from_slice(mnemonic_id.as_bytes());
        out.push(version.tag());
        out.extend_from_slice(&[it_hi, it_mid, it_lo]);
        out.extend_from_slice(&encrypted);

        info!(
            mnemonic_id,
            version = %version,
            iterations = settings.pbkdf2_iterations,
            len = out.len(),
            "created encrypted QR payload"
        );
        Ok(out)
    }

    /// Parse the public header of a scanned payload.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the payload is truncated, the ID is
    /// not UTF-8, the version is unknown, the iteration count is zero or
    /// overflows, or the body does not hold 16 or 32 bytes of entropy.
    ///
    /// The 24-bit iteration field can encode up to 16 777 215; PBKDF2 takes a
    /// 32-bit round count, so fields above 429 496 are rejected as `Format`.
    pub fn parse(data: &[u8]) -> Result<Self, CryptoError> {
        let (&id_len, rest) = data
            .split_first()
            .ok_or_else(|| CryptoError::Format("empty QR payload".into()))?;
        let id_len = usize::from(id_len);
        if rest.len() < id_len.saturating_add(VERSION_ITERATIONS_LEN) {
            return Err(CryptoError::Format(format!(
                "QR payload too short for its header: {} bytes",
                data.len()
            )));
        }
        let (id_bytes, rest) = rest.split_at(id_len);
        let mnemonic_id = std::str::from_utf8(id_bytes)
            .map_err(|_| CryptoError::Format("mnemonic ID is not valid UTF-8".into()))?
            .to_owned();

        let (header, encrypted_data) = rest.split_at(VERSION_ITERATIONS_LEN);
        let version = EncryptionVersion::from_tag(header[0])?;
        let scaled = u32::from_be_bytes([0, header[1], header[2], header[3]]);
        let iterations = scaled
            .checked_mul(ITERATIONS_MULTIPLE)
            .filter(|&it| it != 0)
            .ok_or_else(|| {
                CryptoError::Format(format!(
                    "iteration field {scaled} in QR header is zero or exceeds {} rounds",
                    u32::MAX
                ))
            })?;

        let overhead = version.iv_len().saturating_add(QR_CHECKSUM_LEN);
        let entropy_len = encrypted_data.len().checked_sub(overhead);
        if !entropy_len.is_some_and(|len| ENTROPY_LENS.contains(&len)) {
            return Err(CryptoError::Format(format!(
                "QR body of {} bytes does not hold 16 or 32 bytes of entropy",
                encrypted_data.len()
            )));
        }

        debug!(mnemonic_id = %mnemonic_id, version = %version, iterations, "parsed encrypted QR header");
        Ok(Self {
            public: QrPublicData {
                mnemonic_id,
                version,
                iterations,
            },
            encrypted_data: encrypted_data.to_vec(),
        })
    }

    /// Parse a scanned payload, or `None` if it is not an encrypted QR code.
    #[must_use]
    pub fn public_data(data: &[u8]) -> Option<Self> {
        Self::parse(data)
            .map_err(|e| debug!(error = %e, "not an encrypted QR payload"))
            .ok()
    }

    /// Header fields of this payload.
    #[must_use]
    pub const fn public(&self) -> &QrPublicData {
        &self.public
    }

    /// Decrypt and verify, returning the mnemonic entropy.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Integrity` when the checksum does not match
    /// (wrong key or corrupted data), and `CryptoError::Format` for a
    /// malformed body.
    pub fn try_decrypt(&self, key: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let public = &self.public;
        let cipher = AesCipher::new(key, public.mnemonic_id.as_bytes(), public.iterations)?;
        let decrypted = cipher.decrypt_versioned_bytes(&self.encrypted_data, public.version)?;

        let split = decrypted
            .len()
            .checked_sub(QR_CHECKSUM_LEN)
            .ok_or_else(|| CryptoError::Format("decrypted QR body too short".into()))?;
        let (entropy, provided) = decrypted.split_at(split);
        if !constant_time_eq(&checksum(entropy), provided) {
            return Err(CryptoError::Integrity);
        }
        Ok(Zeroizing::new(entropy.to_vec()))
    }

    /// Decrypt and verify, or `None` for a wrong key or corrupted data.
    #[must_use]
    pub fn decrypt(&self, key: &[u8]) -> Option<Zeroizing<Vec<u8>>> {
        self.try_decrypt(key)
            .map_err(|e| {
                debug!(mnemonic_id = %self.public.mnemonic_id, error = %e, "QR decryption failed");
            })
            .ok()
    }

    /// Decrypt and re-encode the entropy as a mnemonic.
    #[must_use]
    pub fn decrypt_mnemonic(&self, key: &[u8]) -> Option<Zeroizing<String>> {
        let entropy = self.decrypt(key)?;
        entropy_to_mnemonic(&entropy).ok()
    }
}
