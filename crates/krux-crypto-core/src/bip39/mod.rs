//! BIP39 mnemonic ↔ entropy conversion and final-word solving.
//!
//! This module provides:
//! - [`validate_phrase`]: verify word count, wordlist membership and checksum
//! - [`mnemonic_to_entropy`]: recover the entropy bytes behind a mnemonic
//! - [`entropy_to_mnemonic`]: the inverse, appending the SHA-256 checksum
//! - [`get_final_word_candidates`]: every valid last word for 11 or 23 words
//! - [`pick_final_word`]: a random choice among those candidates
//!
//! Only the English wordlist is supported; it is the one Krux encodes into
//! encrypted QR codes.

pub mod wordlist;

pub use wordlist::{suggest_words, word_at, word_index, wordlist, WORDLIST_SIZE};

use rand::seq::SliceRandom;
use rand::Rng;
use zeroize::{Zeroize, Zeroizing};

use crate::checkpoint::Checkpoint;
use crate::error::CryptoError;

// ── Constants ──────────────────────────────────────────────────────

/// Valid BIP39 mnemonic word counts.
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Bits encoded by a single word.
const BITS_PER_WORD: usize = 11;

// ── Phrase Validation ──────────────────────────────────────────────

/// Validate a mnemonic: word count, wordlist membership and checksum.
///
/// # Errors
///
/// Returns `CryptoError::Wordlist` if the count is not 12/15/18/21/24, a
/// word is unknown, or the checksum does not match.
pub fn validate_phrase(words: &[&str]) -> Result<(), CryptoError> {
    decode_words(words).map(|_| ())
}

/// Recover the entropy behind a space-separated mnemonic.
///
/// The BIP39 checksum bits are verified and dropped: 12 words yield 16
/// bytes, 24 words yield 32.
///
/// # Errors
///
/// Returns `CryptoError::Wordlist` under the same conditions as
/// [`validate_phrase`].
pub fn mnemonic_to_entropy(mnemonic: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    decode_words(&words)
}

/// Encode entropy (16, 20, 24, 28 or 32 bytes) as a space-separated mnemonic.
///
/// # Errors
///
/// Returns `CryptoError::Wordlist` for any other entropy length.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Zeroizing<String>, CryptoError> {
    let entropy_bits = entropy.len().saturating_mul(8);
    if !matches!(entropy.len(), 16 | 20 | 24 | 28 | 32) {
        return Err(CryptoError::Wordlist(format!(
            "invalid entropy length: {} bytes",
            entropy.len()
        )));
    }
    let checksum_bits = entropy_bits / 32;
    let total_bits = entropy_bits.saturating_add(checksum_bits);

    let mut bitstream = Zeroizing::new(vec![0u8; total_bits.div_ceil(8)]);
    bitstream[..entropy.len()].copy_from_slice(entropy);
    let hash = ring::digest::digest(&ring::digest::SHA256, entropy);
    let checksum = extract_bits(hash.as_ref(), 0, checksum_bits);
    write_bits(&mut bitstream, entropy_bits, checksum, checksum_bits);

    let mut phrase = Zeroizing::new(String::new());
    for word_no in 0..total_bits / BITS_PER_WORD {
        let idx = extract_bits(&bitstream, word_no.saturating_mul(BITS_PER_WORD), BITS_PER_WORD);
        let word = word_at(idx)
            .ok_or_else(|| CryptoError::Wordlist(format!("word index {idx} out of range")))?;
        if !phrase.is_empty() {
            phrase.push(' ');
        }
        phrase.push_str(word);
    }
    Ok(phrase)
}

fn decode_words(words: &[&str]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let word_count = words.len();
    if !VALID_WORD_COUNTS.contains(&word_count) {
        return Err(CryptoError::Wordlist(format!(
            "invalid word count: {word_count}, expected 12/15/18/21/24"
        )));
    }

    let mut indices = Zeroizing::new(Vec::with_capacity(word_count));
    for (i, word) in words.iter().enumerate() {
        let idx = word_index(word).ok_or_else(|| {
            CryptoError::Wordlist(format!("word not found in wordlist at position {i}"))
        })?;
        indices.push(idx);
    }

    // word_count is one of VALID_WORD_COUNTS, so these cannot overflow.
    #[allow(clippy::arithmetic_side_effects)]
    let total_bits = word_count * BITS_PER_WORD;
    #[allow(clippy::arithmetic_side_effects)]
    let checksum_bits = total_bits / 33;
    #[allow(clippy::arithmetic_side_effects)]
    let entropy_bits = total_bits - checksum_bits;

    let bitstream = Zeroizing::new(indices_to_bitstream(&indices, total_bits));
    let entropy = Zeroizing::new(extract_bytes(&bitstream, 0, entropy_bits));
    let provided = extract_bits(&bitstream, entropy_bits, checksum_bits);

    let hash = ring::digest::digest(&ring::digest::SHA256, &entropy);
    let expected = extract_bits(hash.as_ref(), 0, checksum_bits);
    if provided != expected {
        return Err(CryptoError::Wordlist("checksum mismatch".to_string()));
    }

    Ok(entropy)
}

// ── Final Word Solver ──────────────────────────────────────────────

/// Returns every final word that completes `words` into a valid mnemonic.
///
/// The known words fix the high-order entropy bits; the last word carries
/// the remaining entropy bits (7 for 12 words, 3 for 24) followed by the
/// checksum (4 or 8 bits). Candidates are ordered by the value of those
/// remaining entropy bits, giving 128 or 8 of them.
///
/// `checkpoint` is fed once per candidate.
///
/// # Errors
///
/// Returns `CryptoError::Wordlist` if `words` is not 11 or 23 long or holds
/// an unknown word, and `CryptoError::Cancelled` if the checkpoint aborts.
pub fn get_final_word_candidates(
    words: &[&str],
    checkpoint: &mut dyn Checkpoint,
) -> Result<Vec<&'static str>, CryptoError> {
    let known = words.len();
    if known != 11 && known != 23 {
        return Err(CryptoError::Wordlist(
            "must provide 11 or 23 words".to_string(),
        ));
    }

    let mut indices = Zeroizing::new(Vec::with_capacity(known.saturating_add(1)));
    for (i, word) in words.iter().enumerate() {
        let idx = word_index(word).ok_or_else(|| {
            CryptoError::Wordlist(format!("word not found in wordlist at position {i}"))
        })?;
        indices.push(idx);
    }
    indices.push(0);

    // known is 11 or 23: entropy is 128 or 256 bits.
    #[allow(clippy::arithmetic_side_effects)]
    let entropy_bits = (known + 1) * BITS_PER_WORD / 33 * 32;
    #[allow(clippy::arithmetic_side_effects)]
    let needed_bits = entropy_bits - known * BITS_PER_WORD;
    #[allow(clippy::arithmetic_side_effects)]
    let checksum_bits = entropy_bits / 32;
    #[allow(clippy::arithmetic_side_effects)]
    let total_bits = entropy_bits + checksum_bits;

    let last = known;
    let mut candidates = Vec::with_capacity(1 << needed_bits);
    for remainder in 0u16..(1 << needed_bits) {
        checkpoint.feed()?;

        indices[last] = remainder << checksum_bits;
        let mut bitstream = indices_to_bitstream(&indices, total_bits);
        let mut entropy = extract_bytes(&bitstream, 0, entropy_bits);
        let hash = ring::digest::digest(&ring::digest::SHA256, &entropy);
        let checksum = extract_bits(hash.as_ref(), 0, checksum_bits);
        bitstream.zeroize();
        entropy.zeroize();

        let idx = indices[last] | checksum;
        let word = word_at(idx)
            .ok_or_else(|| CryptoError::Wordlist(format!("word index {idx} out of range")))?;
        candidates.push(word);
    }

    Ok(candidates)
}

/// Picks one valid final word for `words` at random.
///
/// # Errors
///
/// Same as [`get_final_word_candidates`].
pub fn pick_final_word<R: Rng + ?Sized>(
    words: &[&str],
    rng: &mut R,
    checkpoint: &mut dyn Checkpoint,
) -> Result<&'static str, CryptoError> {
    let candidates = get_final_word_candidates(words, checkpoint)?;
    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| CryptoError::Wordlist("no final word candidates".to_string()))
}

// ── Bitstream Helpers ──────────────────────────────────────────────

/// Convert a slice of 11-bit word indices into a byte-aligned bitstream.
fn indices_to_bitstream(indices: &[u16], total_bits: usize) -> Vec<u8> {
    let mut bitstream = vec![0u8; total_bits.div_ceil(8)];
    for (word_no, &idx) in indices.iter().enumerate() {
        write_bits(
            &mut bitstream,
            word_no.saturating_mul(BITS_PER_WORD),
            idx,
            BITS_PER_WORD,
        );
    }
    bitstream
}

/// Write the low `num_bits` of `value` MSB-first at `start_bit`.
fn write_bits(data: &mut [u8], start_bit: usize, value: u16, num_bits: usize) {
    debug_assert!(num_bits <= 16, "write_bits only supports up to 16 bits");
    for i in 0..num_bits {
        #[allow(clippy::arithmetic_side_effects)]
        let bit = (value >> (num_bits - 1 - i)) & 1;
        if bit == 1 {
            #[allow(clippy::arithmetic_side_effects)]
            let pos = start_bit + i;
            #[allow(clippy::arithmetic_side_effects)]
            {
                data[pos / 8] |= 1u8 << (7 - pos % 8);
            }
        }
    }
}

/// Extract `num_bits` starting at `start_bit` from a byte slice, returning
/// complete bytes (zero-padded if `num_bits` is not a multiple of 8).
fn extract_bytes(data: &[u8], start_bit: usize, num_bits: usize) -> Vec<u8> {
    let mut result = vec![0u8; num_bits.div_ceil(8)];
    for i in 0..num_bits {
        #[allow(clippy::arithmetic_side_effects)]
        let src = start_bit + i;
        #[allow(clippy::arithmetic_side_effects)]
        let bit = (data[src / 8] >> (7 - src % 8)) & 1;
        if bit == 1 {
            #[allow(clippy::arithmetic_side_effects)]
            {
                result[i / 8] |= 1u8 << (7 - i % 8);
            }
        }
    }
    result
}

/// Extract `num_bits` (at most 16) from `data` starting at `start_bit`,
/// returned right-aligned.
fn extract_bits(data: &[u8], start_bit: usize, num_bits: usize) -> u16 {
    debug_assert!(num_bits <= 16, "extract_bits only supports up to 16 bits");
    let mut result: u16 = 0;
    for i in 0..num_bits {
        #[allow(clippy::arithmetic_side_effects)]
        let src = start_bit + i;
        #[allow(clippy::arithmetic_side_effects)]
        let bit = u16::from((data[src / 8] >> (7 - src % 8)) & 1);
        #[allow(clippy::arithmetic_side_effects)]
        {
            result = (result << 1) | bit;
        }
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────
