//! `krux-storage`: Persistence and session state for Krux.
//!
//! Encrypted mnemonics in per-location `seeds.json` documents, the
//! `settings.json` configuration file and the session that owns the
//! loaded key.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod location;
pub mod settings;
pub mod store;

pub mod mnemonic_storage;

pub mod session;

pub use error::StorageError;
pub use location::StorageLocation;
pub use mnemonic_storage::MnemonicStorage;
pub use session::Session;
pub use settings::{Settings, StorageSettings};
pub use store::{JsonStore, StoredRecord, SEEDS_FILE};
