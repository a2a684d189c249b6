//! BIP39 vectors from the Trezor reference implementation:
//! <https://github.com/trezor/python-mnemonic/blob/master/vectors.json>

use super::hex;
use krux_crypto_core::{entropy_to_mnemonic, mnemonic_to_entropy, validate_phrase};

// (entropy_hex, mnemonic)
const VECTORS: &[(&str, &str)] = &[
    (
        "00000000000000000000000000000000",
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
    ),
    (
        "7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f7f",
        "legal winner thank year wave sausage worth useful legal winner thank yellow",
    ),
    (
        "80808080808080808080808080808080",
        "letter advice cage absurd amount doctor acoustic avoid letter advice cage above",
    ),
    (
        "ffffffffffffffffffffffffffffffff",
        "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong",
    ),
    (
        "000000000000000000000000000000000000000000000000",
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon agent",
    ),
    (
        "0000000000000000000000000000000000000000000000000000000000000000",
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art",
    ),
    (
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo vote",
    ),
];

#[test]
fn trezor_vectors_entropy_to_mnemonic() {
    for (entropy, mnemonic) in VECTORS {
        assert_eq!(entropy_to_mnemonic(&hex(entropy)).unwrap().as_str(), *mnemonic);
    }
}

#[test]
fn trezor_vectors_mnemonic_to_entropy() {
    for (entropy, mnemonic) in VECTORS {
        assert_eq!(mnemonic_to_entropy(mnemonic).unwrap().as_slice(), hex(entropy));
        let words: Vec<&str> = mnemonic.split_whitespace().collect();
        validate_phrase(&words).unwrap();
    }
}
