//! BIP39/BIP32 key derivation and signing.
//!
//! A [`Key`] is built once per loaded wallet from a mnemonic and passphrase
//! and is immutable afterwards. Dropping it erases the mnemonic, the
//! passphrase and the root private scalar.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bitcoin::bip32::{ChildNumber, DerivationPath, Fingerprint, Xpriv, Xpub};
use bitcoin::hashes::Hash;
use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::{All, Message, Secp256k1};
use bitcoin::NetworkKind;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoError;

/// Purpose level of every multisig derivation path.
pub const MULTISIG_SCRIPT_PURPOSE: u32 = 48;

/// Prefix shown before a pretty-printed fingerprint.
pub const FINGERPRINT_SYMBOL: &str = "⊚";

/// Prefix shown before a pretty-printed derivation path.
pub const DERIVATION_PATH_SYMBOL: &str = "↳";

const THIN_SPACE: char = '\u{2009}';

/// Length of a signature produced by [`Key::sign_at`].
pub const RECOVERABLE_SIGNATURE_LEN: usize = 65;

// ── Extended key versions ──────────────────────────────────────────

/// SLIP-132 version bytes for account extended public keys.
pub mod xpub_version {
    pub const XPUB: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];
    pub const YPUB: [u8; 4] = [0x04, 0x9d, 0x7c, 0xb2];
    pub const ZPUB: [u8; 4] = [0x04, 0xb2, 0x47, 0x46];
    pub const YPUB_MULTI: [u8; 4] = [0x02, 0x95, 0xb4, 0x3f];
    pub const ZPUB_MULTI: [u8; 4] = [0x02, 0xaa, 0x7e, 0xd3];
    pub const TPUB: [u8; 4] = [0x04, 0x35, 0x87, 0xcf];
    pub const UPUB: [u8; 4] = [0x04, 0x4a, 0x52, 0x62];
    pub const VPUB: [u8; 4] = [0x04, 0x5f, 0x1c, 0xf6];
    pub const UPUB_MULTI: [u8; 4] = [0x02, 0x42, 0x89, 0xef];
    pub const VPUB_MULTI: [u8; 4] = [0x02, 0x57, 0x54, 0x83];
}

// ── Types ──────────────────────────────────────────────────────────

/// Bitcoin network parameter set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// BIP44 coin type.
    #[must_use]
    pub const fn coin_type(self) -> u32 {
        match self {
            Self::Mainnet => 0,
            Self::Testnet => 1,
        }
    }

    #[must_use]
    pub const fn kind(self) -> NetworkKind {
        match self {
            Self::Mainnet => NetworkKind::Main,
            Self::Testnet => NetworkKind::Test,
        }
    }
}

/// Output script family, selecting the BIP44-style purpose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptType {
    /// Legacy single-sig, purpose 44.
    #[serde(rename = "p2pkh")]
    P2pkh,
    /// Legacy multisig.
    #[serde(rename = "p2sh")]
    P2sh,
    /// Nested segwit single-sig, purpose 49.
    #[serde(rename = "p2sh-p2wpkh")]
    P2shP2wpkh,
    /// Nested segwit multisig.
    #[serde(rename = "p2sh-p2wsh")]
    P2shP2wsh,
    /// Native segwit single-sig, purpose 84.
    #[default]
    #[serde(rename = "p2wpkh")]
    P2wpkh,
    /// Native segwit multisig.
    #[serde(rename = "p2wsh")]
    P2wsh,
    /// Taproot single-sig, purpose 86.
    #[serde(rename = "p2tr")]
    P2tr,
}

impl ScriptType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::P2pkh => "p2pkh",
            Self::P2sh => "p2sh",
            Self::P2shP2wpkh => "p2sh-p2wpkh",
            Self::P2shP2wsh => "p2sh-p2wsh",
            Self::P2wpkh => "p2wpkh",
            Self::P2wsh => "p2wsh",
            Self::P2tr => "p2tr",
        }
    }

    /// Single-sig derivation purpose, `None` for multisig-only scripts.
    #[must_use]
    pub const fn singlesig_purpose(self) -> Option<u32> {
        match self {
            Self::P2pkh => Some(44),
            Self::P2shP2wpkh => Some(49),
            Self::P2wpkh => Some(84),
            Self::P2tr => Some(86),
            Self::P2sh | Self::P2shP2wsh | Self::P2wsh => None,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything besides the mnemonic that shapes a [`Key`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyOptions {
    pub passphrase: String,
    pub network: Network,
    pub multisig: bool,
    pub account_index: u32,
    /// Ignored when `multisig` is set; multisig keys are always P2WSH.
    pub script_type: ScriptType,
}

impl fmt::Debug for KeyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyOptions")
            .field("passphrase", &"***")
            .field("network", &self.network)
            .field("multisig", &self.multisig)
            .field("account_index", &self.account_index)
            .field("script_type", &self.script_type)
            .finish()
    }
}

/// A BIP39 mnemonic-based private key.
pub struct Key {
    mnemonic: Zeroizing<String>,
    passphrase: Zeroizing<String>,
    network: Network,
    multisig: bool,
    account_index: u32,
    script_type: ScriptType,
    root: Xpriv,
    fingerprint: Fingerprint,
    derivation: String,
    account: Xpub,
    secp: Secp256k1<All>,
}

impl Key {
    /// Derive the root, fingerprint and default account key.
    ///
    /// # Errors
    ///
    /// - `CryptoError::Wordlist` if `mnemonic` is not a valid English mnemonic
    /// - `CryptoError::Configuration` if the account index does not fit a
    ///   hardened level or a single-sig path is requested for a
    ///   multisig-only script type
    /// - `CryptoError::KeyDerivation` if BIP32 derivation fails
    pub fn new(mnemonic: &str, mut options: KeyOptions) -> Result<Self, CryptoError> {
        let parsed = bip39::Mnemonic::parse_in_normalized(bip39::Language::English, mnemonic)
            .map_err(|e| CryptoError::Wordlist(format!("invalid mnemonic: {e}")))?;
        let mut seed = parsed.to_seed(&options.passphrase);
        let root = Xpriv::new_master(options.network.kind(), &seed);
        seed.zeroize();
        let root = root.map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        let script_type = if options.multisig {
            ScriptType::P2wsh
        } else {
            options.script_type
        };
        let derivation = Self::get_default_derivation(
            options.multisig,
            options.network,
            options.account_index,
            script_type,
        )?;

        let secp = Secp256k1::new();
        let fingerprint = root.fingerprint(&secp);
        let path = parse_path(&derivation)?;
        let mut account_prv = root
            .derive_priv(&secp, &path)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        let account = Xpub::from_priv(&secp, &account_prv);
        account_prv.private_key.non_secure_erase();

        let key = Self {
            mnemonic: Zeroizing::new(parsed.to_string()),
            passphrase: Zeroizing::new(std::mem::take(&mut options.passphrase)),
            network: options.network,
            multisig: options.multisig,
            account_index: options.account_index,
            script_type,
            root,
            fingerprint,
            derivation,
            account,
            secp,
        };
        tracing::debug!(
            fingerprint = %key.fingerprint_hex_str(false),
            derivation = %key.derivation,
            "loaded key"
        );
        Ok(key)
    }

    // ── Accessors ──────────────────────────────────────────────────

    #[must_use]
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    #[must_use]
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    #[must_use]
    pub const fn multisig(&self) -> bool {
        self.multisig
    }

    #[must_use]
    pub const fn account_index(&self) -> u32 {
        self.account_index
    }

    #[must_use]
    pub const fn script_type(&self) -> ScriptType {
        self.script_type
    }

    /// Master key fingerprint.
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Default derivation path, hardened levels marked with `h`.
    #[must_use]
    pub fn derivation(&self) -> &str {
        &self.derivation
    }

    /// Account extended public key.
    #[must_use]
    pub const fn account(&self) -> &Xpub {
        &self.account
    }

    // ── Public key export ──────────────────────────────────────────

    /// SLIP-132 version matching this key's network and script type.
    #[must_use]
    pub const fn default_xpub_version(&self) -> [u8; 4] {
        use xpub_version::{
            TPUB, UPUB, UPUB_MULTI, VPUB, VPUB_MULTI, XPUB, YPUB, YPUB_MULTI, ZPUB, ZPUB_MULTI,
        };
        match (self.network, self.script_type) {
            (Network::Mainnet, ScriptType::P2shP2wpkh) => YPUB,
            (Network::Mainnet, ScriptType::P2wpkh) => ZPUB,
            (Network::Mainnet, ScriptType::P2shP2wsh) => YPUB_MULTI,
            (Network::Mainnet, ScriptType::P2wsh) => ZPUB_MULTI,
            (Network::Mainnet, _) => XPUB,
            (Network::Testnet, ScriptType::P2shP2wpkh) => UPUB,
            (Network::Testnet, ScriptType::P2wpkh) => VPUB,
            (Network::Testnet, ScriptType::P2shP2wsh) => UPUB_MULTI,
            (Network::Testnet, ScriptType::P2wsh) => VPUB_MULTI,
            (Network::Testnet, _) => TPUB,
        }
    }

    /// Account xpub in its network's plain `xpub`/`tpub` form.
    #[must_use]
    pub fn xpub(&self) -> String {
        self.account.to_string()
    }

    /// Account xpub, re-encoded under `version` when given.
    #[must_use]
    pub fn account_pubkey_str(&self, version: Option<[u8; 4]>) -> String {
        let mut raw = self.account.encode();
        if let Some(version) = version {
            raw[..4].copy_from_slice(&version);
        }
        bitcoin::base58::encode_check(&raw)
    }

    /// Extended public key at an arbitrary path from the root.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` for an unparsable path and
    /// `CryptoError::KeyDerivation` if derivation fails.
    pub fn get_xpub(&self, path: &str) -> Result<Xpub, CryptoError> {
        let mut prv = self.derive_at(path)?;
        let xpub = Xpub::from_priv(&self.secp, &prv);
        prv.private_key.non_secure_erase();
        Ok(xpub)
    }

    /// BIP380 key expression: `[fingerprint/path]xpub`.
    #[must_use]
    pub fn key_expression(&self, version: Option<[u8; 4]>) -> String {
        format!(
            "[{}{}]{}",
            self.fingerprint_hex_str(false),
            self.derivation.strip_prefix('m').unwrap_or(&self.derivation),
            self.account_pubkey_str(version)
        )
    }

    #[must_use]
    pub fn fingerprint_hex_str(&self, pretty: bool) -> String {
        Self::format_fingerprint(self.fingerprint, pretty)
    }

    #[must_use]
    pub fn derivation_str(&self, pretty: bool) -> String {
        Self::format_derivation(&self.derivation, pretty)
    }

    // ── Signing ────────────────────────────────────────────────────

    /// ECDSA-sign a 32-byte hash with the account private key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyDerivation` if the account key cannot be
    /// derived.
    pub fn sign(&self, message_hash: &[u8; 32]) -> Result<Signature, CryptoError> {
        let mut prv = self.derive_at(&self.derivation)?;
        let msg = Message::from_digest(*message_hash);
        let sig = self.secp.sign_ecdsa(&msg, &prv.private_key);
        prv.private_key.non_secure_erase();
        Ok(sig)
    }

    /// Sign a 32-byte hash at `path`, returning `flag || r || s` where the
    /// flag is `31 + recovery_id` (compressed key), as used by Bitcoin
    /// signed messages.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` for an unparsable path,
    /// `CryptoError::KeyDerivation` if derivation fails and
    /// `CryptoError::Signature` for an out-of-range recovery id.
    pub fn sign_at(
        &self,
        path: &str,
        message_hash: &[u8; 32],
    ) -> Result<[u8; RECOVERABLE_SIGNATURE_LEN], CryptoError> {
        let mut prv = self.derive_at(path)?;
        let msg = Message::from_digest(*message_hash);
        let sig = self.secp.sign_ecdsa_recoverable(&msg, &prv.private_key);
        prv.private_key.non_secure_erase();

        let (recovery_id, compact) = sig.serialize_compact();
        let flag = u8::try_from(recovery_id.to_i32())
            .ok()
            .and_then(|id| id.checked_add(27 + 4))
            .ok_or_else(|| CryptoError::Signature("recovery id out of range".into()))?;

        let mut out = [0u8; RECOVERABLE_SIGNATURE_LEN];
        out[0] = flag;
        out[1..].copy_from_slice(&compact);
        Ok(out)
    }

    /// Sign `message` with the Bitcoin signed-message scheme at `path` and
    /// return the base64 signature.
    ///
    /// # Errors
    ///
    /// Same as [`Key::sign_at`].
    pub fn sign_message(&self, path: &str, message: &str) -> Result<String, CryptoError> {
        let hash = bitcoin::sign_message::signed_msg_hash(message).to_byte_array();
        let sig = self.sign_at(path, &hash)?;
        Ok(STANDARD.encode(sig))
    }

    fn derive_at(&self, path: &str) -> Result<Xpriv, CryptoError> {
        let path = parse_path(path)?;
        self.root
            .derive_priv(&self.secp, &path)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))
    }

    // ── Path helpers ───────────────────────────────────────────────

    /// Default derivation for single-sig (`m/purpose'/coin'/account'`) or
    /// multisig (`m/48'/coin'/account'/2'`) wallets.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Configuration` if `account` does not fit a
    /// hardened index, or a single-sig path is requested for a script type
    /// without a single-sig purpose.
    pub fn get_default_derivation(
        multisig: bool,
        network: Network,
        account: u32,
        script_type: ScriptType,
    ) -> Result<String, CryptoError> {
        ChildNumber::from_hardened_idx(account).map_err(|_| {
            CryptoError::Configuration(format!("account index {account} is out of range"))
        })?;
        let coin = network.coin_type();
        if multisig {
            return Ok(format!("m/{MULTISIG_SCRIPT_PURPOSE}h/{coin}h/{account}h/2h"));
        }
        let purpose = script_type.singlesig_purpose().ok_or_else(|| {
            CryptoError::Configuration(format!("{script_type} has no single-sig derivation"))
        })?;
        Ok(format!("m/{purpose}h/{coin}h/{account}h"))
    }

    /// Render a path with `'` hardened markers, optionally prefixed for display.
    #[must_use]
    pub fn format_derivation(derivation: &str, pretty: bool) -> String {
        let plain = derivation.replace('h', "'");
        if pretty {
            format!("{DERIVATION_PATH_SYMBOL}{THIN_SPACE}{plain}")
        } else {
            plain
        }
    }

    /// Lowercase hex fingerprint, optionally prefixed for display.
    #[must_use]
    pub fn format_fingerprint(fingerprint: Fingerprint, pretty: bool) -> String {
        let hex: String = fingerprint
            .to_bytes()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        if pretty {
            format!("{FINGERPRINT_SYMBOL}{THIN_SPACE}{hex}")
        } else {
            hex
        }
    }
}

fn parse_path(path: &str) -> Result<DerivationPath, CryptoError> {
    DerivationPath::from_str(path)
        .map_err(|e| CryptoError::Format(format!("invalid derivation path '{path}': {e}")))
}

impl Drop for Key {
    fn drop(&mut self) {
        self.root.private_key.non_secure_erase();
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("fingerprint", &self.fingerprint_hex_str(false))
            .field("derivation", &self.derivation)
            .field("network", &self.network)
            .field("script_type", &self.script_type)
            .field("mnemonic", &"***")
            .finish_non_exhaustive()
    }
}

// ── Tests ──────────────────────────────────────────────────────────
