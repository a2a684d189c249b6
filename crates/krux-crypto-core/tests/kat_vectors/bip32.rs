//! BIP32 / BIP44-family vectors for the `abandon ... about` mnemonic.
//!
//! Addresses from BIP44, BIP49, BIP84 and BIP86 test vectors.

use bitcoin::{Address, Network};
use krux_crypto_core::{Key, KeyOptions};

const ABANDON_12: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn key() -> Key {
    Key::new(ABANDON_12, KeyOptions::default()).unwrap()
}

#[test]
fn master_fingerprint() {
    assert_eq!(key().fingerprint_hex_str(false), "73c5da0a");
}

#[test]
fn bip84_first_receive_address() {
    let pk = key().get_xpub("m/84h/0h/0h/0/0").unwrap().to_pub();
    assert_eq!(
        Address::p2wpkh(&pk, Network::Bitcoin).to_string(),
        "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu"
    );
}

#[test]
fn bip44_first_receive_address() {
    let pk = key().get_xpub("m/44h/0h/0h/0/0").unwrap().to_pub();
    assert_eq!(
        Address::p2pkh(pk.pubkey_hash(), Network::Bitcoin).to_string(),
        "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"
    );
}

#[test]
fn bip49_first_receive_address() {
    let pk = key().get_xpub("m/49h/0h/0h/0/0").unwrap().to_pub();
    assert_eq!(
        Address::p2shwpkh(&pk, Network::Bitcoin).to_string(),
        "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf"
    );
}
