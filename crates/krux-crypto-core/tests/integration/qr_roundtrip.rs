//! Encrypted QR payloads: creation, public header parsing and decryption.

use krux_crypto_core::{
    mnemonic_to_entropy, CryptoError, EncryptedQrCode, EncryptionSettings, EncryptionVersion,
};

const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const ABANDON_24: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

fn settings(version: EncryptionVersion) -> EncryptionSettings {
    EncryptionSettings::new(version, 10_000)
}

#[test]
fn both_versions_both_lengths_roundtrip() {
    for version in EncryptionVersion::all() {
        for mnemonic in [ABANDON_12, ABANDON_24] {
            let data =
                EncryptedQrCode::create(&settings(version), b"key", "my seed", mnemonic, None)
                    .unwrap();
            let qr = EncryptedQrCode::public_data(&data).unwrap();
            assert_eq!(qr.public().mnemonic_id, "my seed");
            assert_eq!(qr.public().version, version);
            assert_eq!(qr.public().iterations, 10_000);

            let entropy = qr.decrypt(b"key").unwrap();
            assert_eq!(
                entropy.as_slice(),
                mnemonic_to_entropy(mnemonic).unwrap().as_slice()
            );
            assert_eq!(qr.decrypt_mnemonic(b"key").unwrap().as_str(), mnemonic);
        }
    }
}

#[test]
fn payload_sizes() {
    // header: 1 + len(id) + 1 + 3, body: entropy + 16 checksum (+16 IV block)
    let ecb = EncryptedQrCode::create(&settings(EncryptionVersion::AesEcb), b"k", "id", ABANDON_12, None)
        .unwrap();
    assert_eq!(ecb.len(), 1 + 2 + 1 + 3 + 16 + 16);

    let iv = [3u8; 16];
    let cbc = EncryptedQrCode::create(
        &settings(EncryptionVersion::AesCbc),
        b"k",
        "id",
        ABANDON_24,
        Some(&iv),
    )
    .unwrap();
    assert_eq!(cbc.len(), 1 + 2 + 1 + 3 + 16 + 32 + 16);
}

#[test]
fn fixed_iv_is_deterministic() {
    let iv = [9u8; 16];
    let s = settings(EncryptionVersion::AesCbc);
    let a = EncryptedQrCode::create(&s, b"key", "id", ABANDON_12, Some(&iv)).unwrap();
    let b = EncryptedQrCode::create(&s, b"key", "id", ABANDON_12, Some(&iv)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cbc_payload_ignores_iv_choice() {
    // The IV block is encrypted under itself, so every IV yields the same
    // leading block and the same payload.
    let s = settings(EncryptionVersion::AesCbc);
    let a = EncryptedQrCode::create(&s, b"key", "id", ABANDON_12, Some(&[1u8; 16])).unwrap();
    let b = EncryptedQrCode::create(&s, b"key", "id", ABANDON_12, None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn wrong_key_yields_none() {
    let data =
        EncryptedQrCode::create(&settings(EncryptionVersion::AesEcb), b"key", "id", ABANDON_12, None)
            .unwrap();
    let qr = EncryptedQrCode::public_data(&data).unwrap();
    assert!(qr.decrypt(b"nope").is_none());
    assert!(matches!(
        qr.try_decrypt(b"nope").unwrap_err(),
        CryptoError::Integrity
    ));
}

#[test]
fn arbitrary_bytes_are_not_encrypted_qr() {
    assert!(EncryptedQrCode::public_data(b"").is_none());
    assert!(EncryptedQrCode::public_data(b"not a krux qr code at all").is_none());
}

#[test]
fn iterations_must_be_multiple_of_ten_thousand() {
    let s = EncryptionSettings::new(EncryptionVersion::AesEcb, 15_000);
    let err = EncryptedQrCode::create(&s, b"key", "id", ABANDON_12, None).unwrap_err();
    assert!(matches!(err, CryptoError::Configuration(_)));
}
