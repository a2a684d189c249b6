//! Mnemonic encryption through `AesCipher` with PBKDF2-stretched keys.

use krux_crypto_core::cipher::split_iv;
use krux_crypto_core::{AesCipher, CipherMode, CryptoError, EncryptionVersion};

const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn ecb_mnemonic_roundtrip() {
    let cipher = AesCipher::new(b"key", b"test", 10_000).unwrap();
    let ct = cipher.encrypt(ABANDON_12.as_bytes(), CipherMode::Ecb, None).unwrap();
    assert_eq!(ct.len() % 16, 0);
    assert!(ct.len() >= ABANDON_12.len());

    let pt = cipher.decrypt(&ct, CipherMode::Ecb, None).unwrap();
    assert_eq!(pt.as_str(), ABANDON_12);
}

#[test]
fn cbc_payload_carries_its_iv_block() {
    let iv = [0xa5u8; 16];
    let cipher = AesCipher::new(b"key", b"test", 10_000).unwrap();
    let ct = cipher
        .encrypt(ABANDON_12.as_bytes(), CipherMode::Cbc, Some(&iv))
        .unwrap();

    // The IV block is encrypted along with the data; the leading ciphertext
    // block then serves as the IV for the remainder.
    let (lead, body) = split_iv(&ct).unwrap();
    let pt = cipher.decrypt(body, CipherMode::Cbc, Some(&lead)).unwrap();
    assert_eq!(pt.as_str(), ABANDON_12);
}

#[test]
fn salt_and_iterations_change_the_key() {
    let base = AesCipher::new(b"key", b"test", 10_000).unwrap();
    let other_salt = AesCipher::new(b"key", b"other", 10_000).unwrap();
    let other_iter = AesCipher::new(b"key", b"test", 20_000).unwrap();

    let ct = base.encrypt(b"payload", CipherMode::Ecb, None).unwrap();
    assert_ne!(ct, other_salt.encrypt(b"payload", CipherMode::Ecb, None).unwrap());
    assert_ne!(ct, other_iter.encrypt(b"payload", CipherMode::Ecb, None).unwrap());
}

#[test]
fn wrong_key_never_yields_plaintext() {
    let good = AesCipher::new(b"key", b"test", 10_000).unwrap();
    let bad = AesCipher::new(b"yek", b"test", 10_000).unwrap();
    let ct = good.encrypt(ABANDON_12.as_bytes(), CipherMode::Ecb, None).unwrap();
    match bad.decrypt(&ct, CipherMode::Ecb, None) {
        Ok(text) => assert_ne!(text.as_str(), ABANDON_12),
        Err(e) => assert!(matches!(e, CryptoError::Format(_))),
    }
}

#[test]
fn version_drives_mode() {
    for version in EncryptionVersion::all() {
        let cipher = AesCipher::new(b"key", b"id", 10_000).unwrap();
        let iv = [7u8; 16];
        let iv = version.uses_iv().then_some(&iv);
        let ct = cipher.encrypt(b"data", version.mode(), iv).unwrap();
        let pt = if version.uses_iv() {
            let (lead, body) = split_iv(&ct).unwrap();
            cipher.decrypt(body, version.mode(), Some(&lead)).unwrap()
        } else {
            cipher.decrypt(&ct, version.mode(), None).unwrap()
        };
        assert_eq!(pt.as_str(), "data", "{version}");
    }
}

#[test]
fn zero_iterations_rejected() {
    let err = AesCipher::new(b"key", b"test", 0).unwrap_err();
    assert!(matches!(err, CryptoError::Configuration(_)));
}
