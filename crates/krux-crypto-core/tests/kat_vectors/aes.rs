//! AES-256 block vectors.
//!
//! FIPS-197 Appendix C.3 and NIST SP 800-38A F.1.5 / F.2.6.

use super::hex;
use krux_crypto_core::{AesCipher, CipherMode, SecretBytes};

fn cipher(key_hex: &str) -> AesCipher {
    let mut key = [0u8; 32];
    key.copy_from_slice(&hex(key_hex));
    AesCipher::from_key(SecretBytes::new(key))
}

const SP800_KEY: &str = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";

#[test]
fn fips197_c3_single_block() {
    let c = cipher("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f");
    let ct = c
        .encrypt(&hex("00112233445566778899aabbccddeeff"), CipherMode::Ecb, None)
        .unwrap();
    assert_eq!(ct, hex("8ea2b7ca516745bfeafc49904b496089"));
}

#[test]
fn sp800_38a_ecb_aes256() {
    let c = cipher(SP800_KEY);
    let pt = hex(
        "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51",
    );
    let ct = c.encrypt(&pt, CipherMode::Ecb, None).unwrap();
    assert_eq!(
        ct,
        hex("f3eed1bdb5d2a03c064b5a7e3db181f8591ccb10d410ed26dc5ba74a31362870")
    );
    assert_eq!(c.decrypt_bytes(&ct, CipherMode::Ecb, None).unwrap().as_slice(), pt);
}

#[test]
fn sp800_38a_cbc_aes256_decrypt() {
    let c = cipher(SP800_KEY);
    let mut iv = [0u8; 16];
    iv.copy_from_slice(&hex("000102030405060708090a0b0c0d0e0f"));
    let ct = hex("f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d");
    let pt = c.decrypt_bytes(&ct, CipherMode::Cbc, Some(&iv)).unwrap();
    assert_eq!(
        pt.as_slice(),
        hex("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51")
    );
}
