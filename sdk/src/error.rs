//! Error types for the identity layer.
//!
//! Every fallible operation returns one of these to its immediate caller.
//! Nothing here is logged or retried on the way up; the caller decides.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for the identity crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mnemonic phrase was rejected while parsing.
    #[error("failed to parse mnemonic: {0}")]
    MnemonicParse(#[from] MnemonicParseError),

    /// Entropy could not be recovered from an otherwise well-formed mnemonic.
    #[error("failed to extract mnemonic entropy: {0}")]
    MnemonicEntropy(#[from] MnemonicEntropyError),

    /// Bytes or text did not decode as a key in any supported format.
    #[error("failed to parse key: {0}")]
    KeyParse(String),

    /// Child-key derivation failed or is not defined for this key.
    #[error("failed to derive key: {0}")]
    KeyDerive(String),

    /// The signing backend refused to produce a signature.
    #[error("failed to sign: {0}")]
    Sign(String),

    /// A signature did not verify, or was malformed.
    #[error("signature verification failed: {0}")]
    SignatureVerify(String),

    /// An entity id string was malformed.
    #[error("failed to parse entity id: {0}")]
    EntityIdParse(#[from] EntityIdParseError),

    /// The operation needs a `shard.realm.num` id but got an alias or EVM-address id.
    #[error("`{0}` needs a numeric entity id, not an alias or EVM address")]
    AliasedEntityId(&'static str),

    /// A checksum did not match the one expected for the target ledger.
    #[error(transparent)]
    BadEntityId(#[from] BadEntityIdError),

    /// A ledger id was neither a known network name nor hex bytes.
    #[error("unknown ledger id `{0}`")]
    BadLedgerId(String),

    /// A binary (protobuf) payload could not be decoded.
    #[error("failed to decode protobuf: {0}")]
    FromProtobuf(String),
}

impl Error {
    pub(crate) fn key_parse(msg: impl Into<String>) -> Self {
        Self::KeyParse(msg.into())
    }

    pub(crate) fn key_derive(msg: impl Into<String>) -> Self {
        Self::KeyDerive(msg.into())
    }

    pub(crate) fn sign(msg: impl Into<String>) -> Self {
        Self::Sign(msg.into())
    }

    pub(crate) fn signature_verify(msg: impl Into<String>) -> Self {
        Self::SignatureVerify(msg.into())
    }

    pub(crate) fn from_protobuf(msg: impl Into<String>) -> Self {
        Self::FromProtobuf(msg.into())
    }
}

/// Reasons a mnemonic phrase fails to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MnemonicParseError {
    /// Word count is not one of 12, 22 or 24.
    #[error("bad length: expected 12, 22 or 24 words, got {0}")]
    BadLength(usize),

    /// Positions (zero-based) of words missing from the word list.
    #[error("unknown words at indices {0:?}")]
    UnknownWords(Vec<usize>),

    /// The checksum packed into the final word does not match the entropy.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum recomputed from the entropy.
        expected: u8,
        /// Checksum carried by the phrase.
        actual: u8,
    },
}

/// Reasons entropy cannot be extracted from a mnemonic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MnemonicEntropyError {
    /// Wrong number of words (or entropy bytes) for this operation.
    #[error("bad length: expected {expected}, got {actual}")]
    BadLength {
        /// Length the operation needs.
        expected: usize,
        /// Length it was given.
        actual: usize,
    },

    /// The recovered checksum does not match the recovered entropy.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum recomputed from the entropy.
        expected: u8,
        /// Checksum carried by the phrase.
        actual: u8,
    },

    /// Legacy mnemonics have no passphrase; a non-empty one was supplied.
    #[error("legacy mnemonics do not support passphrases")]
    LegacyWithPassphrase,

    /// BIP-39 seeds are only defined for standard mnemonics.
    #[error("legacy mnemonics have no BIP-39 seed")]
    LegacySeed,
}

/// Reasons an entity id string fails to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityIdParseError {
    /// Not of the shape `num` or `shard.realm.<num|alias|evm address>`.
    #[error("expected `<shard>.<realm>.<num>` or `<num>`, got `{0}`")]
    Malformed(String),

    /// A shard, realm or num component is not an unsigned 64-bit integer.
    #[error("invalid number `{0}`")]
    BadNumber(String),

    /// A checksum suffix was attached to an alias or EVM-address id.
    #[error("checksums are only valid on numeric entity ids")]
    ChecksumOnAlias,

    /// The checksum suffix is not five lowercase ASCII letters.
    #[error("invalid checksum `{0}`")]
    BadChecksum(String),

    /// The third component is neither a number, a public key nor a 20-byte address.
    #[error("invalid alias or EVM address `{0}`")]
    BadAlias(String),

    /// An EVM address was not exactly 20 bytes of hex.
    #[error("expected a 20-byte EVM address, got {0} bytes")]
    BadEvmAddress(usize),

    /// The shard does not fit the 4-byte prefix of a long-zero EVM address.
    #[error("shard {0} does not fit in an EVM address")]
    ShardOutOfRange(u64),
}

/// A checksum that does not match the ledger it was validated against.
///
/// Usually a typo in a pasted address. Callers must surface this rather than
/// fall back to the un-checksummed id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("entity `{shard}.{realm}.{num}` has checksum `{present_checksum}`, expected `{expected_checksum}`")]
pub struct BadEntityIdError {
    /// Shard of the offending id.
    pub shard: u64,
    /// Realm of the offending id.
    pub realm: u64,
    /// Num of the offending id.
    pub num: u64,
    /// Checksum carried by the id.
    pub present_checksum: String,
    /// Checksum computed for the target ledger.
    pub expected_checksum: String,
}
