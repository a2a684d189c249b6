//! PBKDF2-HMAC-SHA256 key stretching.
//!
//! Every encrypted mnemonic is keyed by `stretch(key, mnemonic_id, iterations)`.
//! The salt is the mnemonic ID itself, so the same ID, key and iteration
//! count always reproduce the same AES key on any device.

use std::num::NonZeroU32;

use ring::pbkdf2;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::memory::SecretBytes;

/// Output length of the stretcher in bytes (an AES-256 key).
pub const STRETCHED_KEY_LEN: usize = 32;

/// Iteration counts stored in QR headers are multiples of this value.
pub const ITERATIONS_MULTIPLE: u32 = 10_000;

/// Derive a 256-bit key from `passphrase` and `salt`.
///
/// # Errors
///
/// Returns `CryptoError::Configuration` if `iterations` is zero.
pub fn stretch(
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<SecretBytes<STRETCHED_KEY_LEN>, CryptoError> {
    let rounds = NonZeroU32::new(iterations).ok_or_else(|| {
        CryptoError::Configuration("PBKDF2 iteration count must be non-zero".into())
    })?;

    let mut output = [0u8; STRETCHED_KEY_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        salt,
        passphrase,
        &mut output,
    );

    let key = SecretBytes::new(output);
    output.zeroize();
    Ok(key)
}

/// Check that `iterations` can be written to an encrypted QR header and
/// return the scaled value stored there. Any `u32` quotient fits the
/// three-byte field.
///
/// # Errors
///
/// Returns `CryptoError::Configuration` describing the violated constraint.
pub fn check_qr_iterations(iterations: u32) -> Result<u32, CryptoError> {
    if iterations == 0 || iterations % ITERATIONS_MULTIPLE != 0 {
        return Err(CryptoError::Configuration(format!(
            "iteration count {iterations} is not a non-zero multiple of {ITERATIONS_MULTIPLE}"
        )));
    }
    Ok(iterations / ITERATIONS_MULTIPLE)
}
