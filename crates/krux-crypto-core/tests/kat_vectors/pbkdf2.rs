//! PBKDF2-HMAC-SHA256 vectors.
//!
//! <https://stackoverflow.com/a/5136918> (password/salt series) and
//! RFC 7914 §11.

use super::hex;
use krux_crypto_core::stretch;

#[test]
fn password_salt_1_iteration() {
    let key = stretch(b"password", b"salt", 1).unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b")
    );
}

#[test]
fn password_salt_2_iterations() {
    let key = stretch(b"password", b"salt", 2).unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43")
    );
}

#[test]
fn password_salt_4096_iterations() {
    let key = stretch(b"password", b"salt", 4096).unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a")
    );
}

#[test]
fn rfc7914_passwd_salt() {
    let key = stretch(b"passwd", b"salt", 1).unwrap();
    assert_eq!(
        key.expose().as_slice(),
        hex("55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc")
    );
}
