// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Hiero Identity - Keys, Mnemonics and Entity Ids
//!
//! Everything a ledger client needs to answer two questions: *which key signs
//! for me?* and *who am I on the network?* Both answers have to match every
//! other SDK byte for byte. A one-bit slip in a radix conversion or a
//! derivation path still yields a perfectly valid key, just not yours.
//!
//! ## Architecture
//!
//! - **mnemonic**: BIP-39 and legacy 22-word phrases, their word lists and
//!   entropy codecs, and the paths from a phrase to a key.
//! - **crypto**: Ed25519 and ECDSA secp256k1 keys, HD derivation for both
//!   curves, DER/raw/protobuf encodings, EVM addresses.
//! - **entity**: `shard.realm.num` account and contract ids, key aliases,
//!   EVM-address ids and ledger-scoped checksums.
//! - **config**: Constants: ledger ids, derivation paths, DER prefixes.
//! - **error**: One error enum per concern, folded into [`Error`].
//!
//! ## Quick tour
//!
//! ```no_run
//! use hiero_identity::{AccountId, LedgerId, Mnemonic};
//!
//! let mnemonic = Mnemonic::generate_standard(24)?;
//! let key = mnemonic.to_private_key("")?;
//! let alias = AccountId::from_alias(0, 0, key.public_key());
//!
//! let treasury: AccountId = "0.0.1001-urkbk".parse()?;
//! treasury.validate_checksum(&LedgerId::MAINNET)?;
//! # let _ = alias;
//! # Ok::<(), hiero_identity::Error>(())
//! ```
//!
//! Everything here is synchronous and free of I/O. Values are immutable and
//! `Send + Sync`; share them freely.

pub mod config;
pub mod crypto;
pub mod entity;
pub mod error;
pub mod mnemonic;

pub(crate) mod util;

pub use crypto::{KeyAlgorithm, PrivateKey, PublicKey};
pub use entity::{AccountId, Checksum, ContractId, EvmAddress, LedgerId};
pub use error::{
    BadEntityIdError, EntityIdParseError, Error, MnemonicEntropyError, MnemonicParseError, Result,
};
pub use mnemonic::{Mnemonic, MnemonicKind, WordList};
