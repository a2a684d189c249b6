//! English BIP39 wordlist lookup.
//!
//! The 2048 words are the static table shipped with the `bip39` crate; the
//! reverse map from word to index is built once on first access.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of words in the BIP39 wordlist.
pub const WORDLIST_SIZE: usize = 2048;

static REVERSE: OnceLock<HashMap<&'static str, u16>> = OnceLock::new();

/// Returns the English BIP39 wordlist.
#[must_use]
pub fn wordlist() -> &'static [&'static str; WORDLIST_SIZE] {
    bip39::Language::English.word_list()
}

fn reverse_map() -> &'static HashMap<&'static str, u16> {
    REVERSE.get_or_init(|| {
        wordlist()
            .iter()
            .zip(0u16..)
            .map(|(word, idx)| (*word, idx))
            .collect()
    })
}

/// Returns the 0-based index of `word`, or `None` if it is not a BIP39 word.
#[must_use]
pub fn word_index(word: &str) -> Option<u16> {
    reverse_map().get(word).copied()
}

/// Returns the word at `index`, or `None` past the end of the list.
#[must_use]
pub fn word_at(index: u16) -> Option<&'static str> {
    wordlist().get(usize::from(index)).copied()
}

/// Returns up to `max` words starting with `prefix`.
#[must_use]
pub fn suggest_words(prefix: &str, max: usize) -> Vec<&'static str> {
    let list = wordlist();
    let start = list.partition_point(|w| *w < prefix);
    list[start..]
        .iter()
        .take_while(|w| w.starts_with(prefix))
        .take(max)
        .copied()
        .collect()
}
