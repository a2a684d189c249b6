//! Encrypted QR payloads produced by the Krux firmware.
//!
//! Key `pin`, ID `test`, 100 000 PBKDF2 rounds, entropy `7f` x 16
//! (`legal winner thank year wave sausage worth useful legal winner thank yellow`).

use super::hex;
use krux_crypto_core::{EncryptedQrCode, EncryptionSettings, EncryptionVersion};

const LEGAL_12: &str = "legal winner thank year wave sausage worth useful legal winner thank yellow";

const ECB_PAYLOAD: &str =
    "04746573740000000a77727ad8c5670714a0e1c4a136afad9fc275c897e2a576abcfaab8f96e4958f1";

// IV 07 x 16; the body starts with the encrypted IV block.
const CBC_PAYLOAD: &str = "04746573740100000aa98ddf553da8c40b519205fcbae112b0b72ed47895fb2f2bca379772a0b3a10cecf69c4aade688fd93e934bbfb59a64b";

const IV: [u8; 16] = [0x07; 16];

fn settings(version: EncryptionVersion) -> EncryptionSettings {
    EncryptionSettings::new(version, 100_000)
}

#[test]
fn ecb_create_matches_firmware() {
    let data =
        EncryptedQrCode::create(&settings(EncryptionVersion::AesEcb), b"pin", "test", LEGAL_12, None)
            .unwrap();
    assert_eq!(data, hex(ECB_PAYLOAD));
}

#[test]
fn cbc_create_matches_firmware() {
    let data = EncryptedQrCode::create(
        &settings(EncryptionVersion::AesCbc),
        b"pin",
        "test",
        LEGAL_12,
        Some(&IV),
    )
    .unwrap();
    assert_eq!(data, hex(CBC_PAYLOAD));
}

#[test]
fn ecb_firmware_payload_decrypts() {
    let qr = EncryptedQrCode::public_data(&hex(ECB_PAYLOAD)).unwrap();
    assert_eq!(qr.public().mnemonic_id, "test");
    assert_eq!(qr.public().version, EncryptionVersion::AesEcb);
    assert_eq!(qr.public().iterations, 100_000);
    let entropy = qr.decrypt(b"pin").unwrap();
    assert_eq!(entropy.as_slice(), &[0x7f; 16]);
    assert_eq!(qr.decrypt_mnemonic(b"pin").unwrap().as_str(), LEGAL_12);
}

#[test]
fn cbc_firmware_payload_decrypts() {
    let qr = EncryptedQrCode::public_data(&hex(CBC_PAYLOAD)).unwrap();
    assert_eq!(qr.public().version, EncryptionVersion::AesCbc);
    assert_eq!(qr.public().iterations, 100_000);
    let entropy = qr.decrypt(b"pin").unwrap();
    assert_eq!(entropy.as_slice(), &[0x7f; 16]);
    assert!(qr.decrypt(b"pim").is_none());
}
