//! # Mnemonics
//!
//! Human-transcribable backups of key material, in two formats:
//!
//! | Format   | Words  | Word list | Checksum        | Seed      |
//! |----------|--------|-----------|-----------------|-----------|
//! | Standard | 12, 24 | BIP-39    | SHA-256 bits    | PBKDF2    |
//! | Legacy   | 22     | 4096 word | CRC-8, XOR mask | none      |
//!
//! A [`Mnemonic`] is validated when it is built and never changes afterwards.
//! The word count alone decides the format: 22 words are legacy, 12 or 24
//! are standard, anything else is rejected before any word is looked up.
//!
//! ## Keys from a mnemonic
//!
//! ```text
//! Standard ──seed──┬── SLIP-10 44'/3030'/0'/0'           ──► to_private_key
//!                  ├── SLIP-10 44'/3030'/0'/0'/index'    ──► to_standard_ed25519_private_key
//!                  └── BIP-32  44'/3030'/0'/0/index      ──► to_standard_ecdsa_private_key
//!
//! Legacy ──entropy (32 bytes)──► Ed25519 key             ──► to_private_key / to_legacy_private_key
//! Standard (24 words) ──entropy──► Ed25519 key           ──► to_legacy_private_key
//! ```
//!
//! Legacy phrases are accepted verbatim at parse time; their words and CRC
//! are checked only when entropy is extracted.

mod entropy;
mod wordlist;

pub use wordlist::WordList;

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{LEGACY_ENTROPY_LENGTH, LEGACY_MNEMONIC_WORDS, SEED_LENGTH, SEED_SALT_PREFIX};
use crate::crypto::hash::pbkdf2_sha512;
use crate::crypto::{ECDSA_ACCOUNT_PATH, ED25519_ACCOUNT_PATH, PrivateKey, harden};
use crate::error::{MnemonicEntropyError, MnemonicParseError, Result};

const STANDARD_SHORT_WORDS: usize = 12;
const STANDARD_LONG_WORDS: usize = 24;

/// Which format a mnemonic is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MnemonicKind {
    /// 22 words from the legacy 4096-word list.
    Legacy,
    /// 12 or 24 BIP-39 words.
    Standard,
}

impl fmt::Display for MnemonicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::Standard => "standard",
        })
    }
}

#[derive(Clone, PartialEq, Eq)]
enum Repr {
    Legacy(Vec<String>),
    Standard(Vec<String>),
}

/// A validated mnemonic phrase.
///
/// `Debug` prints only the format and word count. The words themselves are
/// available through [`words`](Self::words) and `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic(Repr);

impl Mnemonic {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Generates a fresh standard mnemonic of 12 or 24 words from the OS RNG.
    pub fn generate_standard(word_count: usize) -> Result<Self> {
        let entropy_len = match word_count {
            STANDARD_SHORT_WORDS => 16,
            STANDARD_LONG_WORDS => 32,
            other => return Err(MnemonicParseError::BadLength(other).into()),
        };
        let mut entropy = Zeroizing::new(vec![0u8; entropy_len]);
        OsRng.fill_bytes(&mut entropy);

        let mnemonic = Self::from_entropy(&entropy)?;
        debug!(words = word_count, "generated standard mnemonic");
        Ok(mnemonic)
    }

    /// Standard mnemonic for 16 or 32 bytes of entropy.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        if entropy.len() != 16 && entropy.len() != 32 {
            return Err(MnemonicEntropyError::BadLength {
                expected: 32,
                actual: entropy.len(),
            }
            .into());
        }
        Ok(Self::standard_from_indices(&entropy::pack_standard(entropy)))
    }

    /// Legacy mnemonic for 32 bytes of entropy.
    pub fn from_legacy_entropy(entropy: &[u8; LEGACY_ENTROPY_LENGTH]) -> Self {
        let list = WordList::legacy();
        let words = entropy::pack_legacy(entropy)
            .iter()
            .map(|&i| list.word(i).unwrap_or_default().to_owned())
            .collect();
        Self(Repr::Legacy(words))
    }

    fn standard_from_indices(indices: &[u16]) -> Self {
        let list = WordList::bip39();
        let words = indices
            .iter()
            .map(|&i| list.word(i).unwrap_or_default().to_owned())
            .collect();
        Self(Repr::Standard(words))
    }

    /// Builds a mnemonic from individual words.
    ///
    /// Words are lowercased. 22 words are taken as legacy without further
    /// checks; 12 or 24 must all be BIP-39 words and carry a valid checksum.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();

        match words.len() {
            LEGACY_MNEMONIC_WORDS => Ok(Self(Repr::Legacy(words))),
            STANDARD_SHORT_WORDS | STANDARD_LONG_WORDS => Self::validate_standard(words),
            other => Err(MnemonicParseError::BadLength(other).into()),
        }
    }

    fn validate_standard(words: Vec<String>) -> Result<Self> {
        let list = WordList::bip39();
        let mut indices = Vec::with_capacity(words.len());
        let mut unknown = Vec::new();
        for (position, word) in words.iter().enumerate() {
            match list.index_of(word) {
                Some(index) => indices.push(index),
                None => unknown.push(position),
            }
        }
        if !unknown.is_empty() {
            return Err(MnemonicParseError::UnknownWords(unknown).into());
        }

        entropy::unpack_standard(&indices).map_err(|e| MnemonicParseError::ChecksumMismatch {
            expected: e.expected,
            actual: e.actual,
        })?;
        Ok(Self(Repr::Standard(words)))
    }

    /// Parses whitespace-separated words. Same rules as [`from_words`](Self::from_words).
    pub fn parse(phrase: &str) -> Result<Self> {
        Self::from_words(phrase.split_whitespace())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn words(&self) -> &[String] {
        match &self.0 {
            Repr::Legacy(words) | Repr::Standard(words) => words,
        }
    }

    pub fn kind(&self) -> MnemonicKind {
        match self.0 {
            Repr::Legacy(_) => MnemonicKind::Legacy,
            Repr::Standard(_) => MnemonicKind::Standard,
        }
    }

    pub fn is_legacy(&self) -> bool {
        self.kind() == MnemonicKind::Legacy
    }

    // -----------------------------------------------------------------------
    // Seeds and keys
    // -----------------------------------------------------------------------

    /// The 64-byte BIP-39 seed. Standard mnemonics only.
    pub fn to_seed(&self, passphrase: &str) -> Result<Zeroizing<[u8; SEED_LENGTH]>> {
        let Repr::Standard(words) = &self.0 else {
            return Err(MnemonicEntropyError::LegacySeed.into());
        };
        let phrase = Zeroizing::new(words.join(" "));
        let salt = Zeroizing::new(format!("{SEED_SALT_PREFIX}{passphrase}"));

        let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
        pbkdf2_sha512(phrase.as_bytes(), salt.as_bytes(), &mut seed[..])?;
        Ok(seed)
    }

    /// The account key this mnemonic stands for.
    ///
    /// Legacy: the entropy itself as an Ed25519 key; passphrases are refused.
    /// Standard: the Ed25519 key at `44'/3030'/0'/0'` under the seed. The
    /// result keeps its chain code and can derive further.
    pub fn to_private_key(&self, passphrase: &str) -> Result<PrivateKey> {
        match &self.0 {
            Repr::Legacy(_) => {
                if !passphrase.is_empty() {
                    return Err(MnemonicEntropyError::LegacyWithPassphrase.into());
                }
                self.to_legacy_private_key()
            }
            Repr::Standard(_) => {
                let seed = self.to_seed(passphrase)?;
                PrivateKey::from_seed_ed25519(&seed[..])?.derive_path(&ED25519_ACCOUNT_PATH)
            }
        }
    }

    /// The key a legacy wallet would recover from these words.
    ///
    /// Works on legacy mnemonics and on 24-word standard ones, whose 32
    /// bytes of entropy are used the same way. 12-word phrases fail with
    /// `BadLength`.
    pub fn to_legacy_private_key(&self) -> Result<PrivateKey> {
        let entropy = self.legacy_entropy()?;
        PrivateKey::from_bytes_ed25519(&entropy[..])
    }

    fn legacy_entropy(&self) -> Result<Zeroizing<[u8; LEGACY_ENTROPY_LENGTH]>> {
        match &self.0 {
            Repr::Legacy(words) => {
                let list = WordList::legacy();
                let digits: Vec<i32> = words
                    .iter()
                    .map(|w| list.index_of(w).map_or(-1, i32::from))
                    .collect();
                Ok(entropy::unpack_legacy(&digits)?)
            }
            Repr::Standard(words) if words.len() == STANDARD_LONG_WORDS => {
                let list = WordList::bip39();
                // Every word was checked against the list at construction.
                let indices: Vec<u16> = words
                    .iter()
                    .map(|w| list.index_of(w).unwrap_or_default())
                    .collect();
                let entropy = entropy::unpack_standard(&indices).map_err(|e| {
                    MnemonicEntropyError::ChecksumMismatch {
                        expected: e.expected,
                        actual: e.actual,
                    }
                })?;
                let mut out = Zeroizing::new([0u8; LEGACY_ENTROPY_LENGTH]);
                out.copy_from_slice(&entropy);
                Ok(out)
            }
            Repr::Standard(words) => Err(MnemonicEntropyError::BadLength {
                expected: STANDARD_LONG_WORDS,
                actual: words.len(),
            }
            .into()),
        }
    }

    /// Ed25519 key at `44'/3030'/0'/0'/index'`.
    pub fn to_standard_ed25519_private_key(&self, passphrase: &str, index: u32) -> Result<PrivateKey> {
        let seed = self.to_seed(passphrase)?;
        let key = PrivateKey::from_seed_ed25519(&seed[..])?
            .derive_path(&ED25519_ACCOUNT_PATH)?
            .derive(harden(index))?;
        debug!(index, "derived standard ed25519 key");
        Ok(key)
    }

    /// secp256k1 key at `44'/3030'/0'/0/index`.
    ///
    /// `index` is used as given; pass it through [`harden`] for a hardened leaf.
    pub fn to_standard_ecdsa_private_key(&self, passphrase: &str, index: u32) -> Result<PrivateKey> {
        let seed = self.to_seed(passphrase)?;
        let key = PrivateKey::from_seed_ecdsa(&seed[..])?
            .derive_path(&ECDSA_ACCOUNT_PATH)?
            .derive(index)?;
        debug!(index, "derived standard ecdsa key");
        Ok(key)
    }
}

impl FromStr for Mnemonic {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words().join(" "))
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("kind", &self.kind())
            .field("words", &self.words().len())
            .finish_non_exhaustive()
    }
}
