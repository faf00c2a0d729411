//! # Keys and the Primitives Behind Them
//!
//! Everything that touches key material lives here:
//!
//! - **Ed25519** keys, generated fresh, parsed, or derived from a mnemonic.
//! - **ECDSA secp256k1** keys, the same, plus their EVM address projection.
//! - HD derivation for both curves and the legacy one-shot scheme.
//! - The hash and MAC constructions those need.
//!
//! ## A note on the two algorithms
//!
//! [`PrivateKey`] and [`PublicKey`] are closed unions over the two curves.
//! Callers that care which one they hold ask [`PrivateKey::algorithm`];
//! everyone else just signs and verifies. Operations that only make sense
//! for one curve (EVM addresses, legacy derivation) say so in their return
//! type instead of silently producing garbage for the other.

pub mod derivation;
pub mod hash;
pub mod private_key;
pub mod public_key;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use derivation::{harden, is_hardened, ECDSA_ACCOUNT_PATH, ED25519_ACCOUNT_PATH};
pub use hash::{keccak256, sha256};
pub use private_key::PrivateKey;
pub use public_key::PublicKey;

/// Signature algorithm of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlgorithm {
    /// Ed25519 (RFC 8032).
    Ed25519,
    /// ECDSA over secp256k1, signing Keccak-256 digests.
    EcdsaSecp256k1,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ed25519 => "ed25519",
            Self::EcdsaSecp256k1 => "ecdsa_secp256k1",
        })
    }
}

impl FromStr for KeyAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "ecdsa" | "secp256k1" | "ecdsa_secp256k1" => Ok(Self::EcdsaSecp256k1),
            other => Err(Error::key_parse(format!("unknown key algorithm `{other}`"))),
        }
    }
}

/// Hex-decodes `s`, tolerating a `0x` prefix.
pub(crate) fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| Error::key_parse(format!("invalid hex: {e}")))
}
