//! Where an encrypted mnemonic lives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage medium holding a `seeds.json` document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    /// Internal flash, always present.
    #[default]
    Flash,
    /// Removable SD card.
    SdCard,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flash => f.write_str("flash"),
            Self::SdCard => f.write_str("SD card"),
        }
    }
}
