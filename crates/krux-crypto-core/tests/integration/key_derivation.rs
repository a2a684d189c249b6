//! Key derivation from mnemonics recovered out of encrypted QR payloads.

use bitcoin::hashes::Hash;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::sign_message::{signed_msg_hash, MessageSignature};
use krux_crypto_core::{
    EncryptedQrCode, EncryptionSettings, EncryptionVersion, Key, KeyOptions, Network, ScriptType,
};

const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn key_from_decrypted_qr_matches_direct_key() {
    let settings = EncryptionSettings::new(EncryptionVersion::AesCbc, 20_000);
    let data = EncryptedQrCode::create(&settings, b"pin", "wallet", ABANDON_12, None).unwrap();
    let mnemonic = EncryptedQrCode::public_data(&data)
        .unwrap()
        .decrypt_mnemonic(b"pin")
        .unwrap();

    let direct = Key::new(ABANDON_12, KeyOptions::default()).unwrap();
    let recovered = Key::new(&mnemonic, KeyOptions::default()).unwrap();
    assert_eq!(direct.fingerprint(), recovered.fingerprint());
    assert_eq!(direct.xpub(), recovered.xpub());
}

#[test]
fn account_index_changes_account_key_not_fingerprint() {
    let a = Key::new(ABANDON_12, KeyOptions::default()).unwrap();
    let b = Key::new(
        ABANDON_12,
        KeyOptions {
            account_index: 1,
            ..KeyOptions::default()
        },
    )
    .unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.xpub(), b.xpub());
    assert_eq!(b.derivation(), "m/84h/0h/1h");
}

#[test]
fn get_xpub_at_default_derivation_is_account_xpub() {
    let key = Key::new(
        ABANDON_12,
        KeyOptions {
            network: Network::Testnet,
            script_type: ScriptType::P2tr,
            ..KeyOptions::default()
        },
    )
    .unwrap();
    assert_eq!(key.derivation(), "m/86h/1h/0h");
    assert_eq!(&key.get_xpub(key.derivation()).unwrap(), key.account());
    // Apostrophe notation is accepted as well.
    assert_eq!(&key.get_xpub("m/86'/1'/0'").unwrap(), key.account());
}

#[test]
fn signed_message_recovers_to_derived_key() {
    let key = Key::new(ABANDON_12, KeyOptions::default()).unwrap();
    let path = "m/84h/0h/0h/0/3";
    let b64 = key.sign_message(path, "Krux").unwrap();

    let sig = MessageSignature::from_base64(&b64).unwrap();
    let secp = Secp256k1::verification_only();
    let recovered = sig
        .recover_pubkey(&secp, signed_msg_hash("Krux"))
        .unwrap();
    assert_eq!(recovered.inner, key.get_xpub(path).unwrap().public_key);

    let raw = key
        .sign_at(path, &signed_msg_hash("Krux").to_byte_array())
        .unwrap();
    assert_eq!(MessageSignature::from_slice(&raw).unwrap(), sig);
}

#[test]
fn malformed_path_is_format_error() {
    let key = Key::new(ABANDON_12, KeyOptions::default()).unwrap();
    assert!(matches!(
        key.get_xpub("m/not/a/path").unwrap_err(),
        krux_crypto_core::CryptoError::Format(_)
    ));
    assert!(key.sign_at("m/84h/x", &[0u8; 32]).is_err());
}
