mod cipher_roundtrip;
mod key_derivation;
mod qr_roundtrip;
