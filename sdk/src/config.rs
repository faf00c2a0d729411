//! # Identity Constants
//!
//! Every magic number the identity layer depends on lives here. Most of them
//! are fixed by interoperability with the other network SDKs: change one and
//! you silently produce a different (but perfectly valid-looking) key, address
//! or checksum. Treat this file as frozen.

// ---------------------------------------------------------------------------
// Ledger Identifiers
// ---------------------------------------------------------------------------

/// Mainnet ledger id. One byte, zero.
pub const LEDGER_ID_MAINNET: &[u8] = &[0x00];

/// Testnet ledger id.
pub const LEDGER_ID_TESTNET: &[u8] = &[0x01];

/// Previewnet ledger id.
pub const LEDGER_ID_PREVIEWNET: &[u8] = &[0x02];

// ---------------------------------------------------------------------------
// Mnemonics
// ---------------------------------------------------------------------------

/// Number of words in the BIP-39 English word list.
pub const BIP39_WORD_COUNT: usize = 2048;

/// Number of words in the legacy (v1) word list.
pub const LEGACY_WORD_COUNT: usize = 4096;

/// Bits encoded by a single BIP-39 word.
pub const BIP39_BITS_PER_WORD: usize = 11;

/// Words in a legacy mnemonic. 22 digits in radix 4096 = 264 bits = 33 bytes.
pub const LEGACY_MNEMONIC_WORDS: usize = 22;

/// Entropy carried by a legacy mnemonic, in bytes.
pub const LEGACY_ENTROPY_LENGTH: usize = 32;

/// PBKDF2-HMAC-SHA512 iteration count for BIP-39 seeds and legacy derivation.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Salt prefix for BIP-39 seed derivation. The passphrase is appended.
pub const SEED_SALT_PREFIX: &str = "mnemonic";

/// Length of a BIP-39 seed in bytes.
pub const SEED_LENGTH: usize = 64;

/// CRC-8 feedback constant used by the legacy checksum (reflected form).
pub const LEGACY_CRC8_POLY: u8 = 0xB2;

// ---------------------------------------------------------------------------
// Key Derivation
// ---------------------------------------------------------------------------

/// Top bit of a 32-bit child index. Set means "hardened".
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// BIP-44 purpose component.
pub const BIP44_PURPOSE: u32 = 44;

/// Registered BIP-44 coin type for the ledger.
pub const LEDGER_COIN_TYPE: u32 = 3030;

/// HMAC key for the SLIP-0010 Ed25519 master key.
pub const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// HMAC key for the BIP-32 secp256k1 master key.
pub const SECP256K1_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Chain code length for both curves.
pub const CHAIN_CODE_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Key Encodings
// ---------------------------------------------------------------------------

/// Length of an Ed25519 private key (the seed) and public key.
pub const ED25519_KEY_LENGTH: usize = 32;

/// Length of a secp256k1 private scalar.
pub const ECDSA_PRIVATE_KEY_LENGTH: usize = 32;

/// Length of a compressed secp256k1 public point.
pub const ECDSA_PUBLIC_KEY_LENGTH: usize = 33;

/// PKCS#8 prefix for a raw Ed25519 private key (RFC 8410).
pub const ED25519_PRIVATE_DER_PREFIX: &[u8] = &[
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04,
    0x20,
];

/// SubjectPublicKeyInfo prefix for an Ed25519 public key.
pub const ED25519_PUBLIC_DER_PREFIX: &[u8] = &[
    0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00,
];

/// PKCS#8 prefix for a secp256k1 private key, as emitted by the other SDKs.
pub const ECDSA_PRIVATE_DER_PREFIX: &[u8] = &[
    0x30, 0x30, 0x02, 0x01, 0x00, 0x30, 0x07, 0x06, 0x05, 0x2b, 0x81, 0x04, 0x00, 0x0a, 0x04,
    0x22, 0x04, 0x20,
];

/// SubjectPublicKeyInfo prefix for a compressed secp256k1 public key.
pub const ECDSA_PUBLIC_DER_PREFIX: &[u8] = &[
    0x30, 0x36, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x0a, 0x03, 0x22, 0x00,
];

/// Field number of the Ed25519 variant inside the protobuf `Key` message.
pub const KEY_FIELD_ED25519: u64 = 2;

/// Field number of the ECDSA(secp256k1) variant inside the protobuf `Key` message.
pub const KEY_FIELD_ECDSA_SECP256K1: u64 = 7;

// ---------------------------------------------------------------------------
// Entity Identifiers
// ---------------------------------------------------------------------------

/// Length of an EVM address in bytes.
pub const EVM_ADDRESS_LENGTH: usize = 20;

/// Length of the checksum suffix in `shard.realm.num-xxxxx`.
pub const CHECKSUM_LENGTH: usize = 5;

/// Field numbers shared by the `AccountID` and `ContractID` messages.
pub const ENTITY_FIELD_SHARD: u64 = 1;
pub const ENTITY_FIELD_REALM: u64 = 2;
pub const ENTITY_FIELD_NUM: u64 = 3;
/// `alias` for accounts, `evm_address` for contracts.
pub const ENTITY_FIELD_ALIAS: u64 = 4;
