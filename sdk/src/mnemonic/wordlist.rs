//! Word lists for both mnemonic formats.
//!
//! Both lists are built once on first use and shared read-only for the life
//! of the process. Lookups in either direction are O(1).
//!
//! The BIP-39 English list comes from the `bip39` crate. The legacy list is
//! the ledger's published v1 list, bundled as `legacy_words.txt`, one word
//! per line, in index order. It is not alphabetical, so lookups go through
//! the hash map rather than a binary search.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::config::{BIP39_WORD_COUNT, LEGACY_WORD_COUNT};

static BIP39_ENGLISH: LazyLock<WordList> =
    LazyLock::new(|| WordList::new(bip39::Language::English.word_list()));

static LEGACY: LazyLock<WordList> = LazyLock::new(|| {
    let words: Vec<&'static str> = include_str!("legacy_words.txt").lines().collect();
    WordList::new(&words)
});

/// An immutable index <-> word bijection.
pub struct WordList {
    words: Vec<&'static str>,
    indices: HashMap<&'static str, u16>,
}

impl WordList {
    fn new(words: &[&'static str]) -> Self {
        let indices = words
            .iter()
            .enumerate()
            .map(|(i, w)| (*w, i as u16))
            .collect();
        Self {
            words: words.to_vec(),
            indices,
        }
    }

    /// The 2048-word BIP-39 English list.
    pub fn bip39() -> &'static WordList {
        let list = &*BIP39_ENGLISH;
        debug_assert_eq!(list.len(), BIP39_WORD_COUNT);
        list
    }

    /// The 4096-word legacy list.
    pub fn legacy() -> &'static WordList {
        let list = &*LEGACY;
        debug_assert_eq!(list.len(), LEGACY_WORD_COUNT);
        list
    }

    /// Position of `word` in the list, if present. Case-sensitive.
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.indices.get(word).copied()
    }

    /// Word at `index`, or `None` past the end of the list.
    pub fn word(&self, index: u16) -> Option<&'static str> {
        self.words.get(usize::from(index)).copied()
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for the bundled lists.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
