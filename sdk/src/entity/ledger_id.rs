//! Ledger identifiers.
//!
//! A ledger id names the network an entity id belongs to. It is opaque bytes;
//! the three public networks use a single byte each. The only thing this
//! crate does with it is feed it to the entity-id checksum.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{LEDGER_ID_MAINNET, LEDGER_ID_PREVIEWNET, LEDGER_ID_TESTNET};
use crate::error::{Error, Result};

/// Identifies a ledger (network).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LedgerId(Cow<'static, [u8]>);

impl LedgerId {
    pub const MAINNET: Self = Self(Cow::Borrowed(LEDGER_ID_MAINNET));
    pub const TESTNET: Self = Self(Cow::Borrowed(LEDGER_ID_TESTNET));
    pub const PREVIEWNET: Self = Self(Cow::Borrowed(LEDGER_ID_PREVIEWNET));

    /// An arbitrary ledger id, for private networks.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Cow::Owned(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_mainnet(&self) -> bool {
        *self == Self::MAINNET
    }

    pub fn is_testnet(&self) -> bool {
        *self == Self::TESTNET
    }

    pub fn is_previewnet(&self) -> bool {
        *self == Self::PREVIEWNET
    }

    /// The well-known name, if this is one of the public networks.
    pub fn name(&self) -> Option<&'static str> {
        if self.is_mainnet() {
            Some("mainnet")
        } else if self.is_testnet() {
            Some("testnet")
        } else if self.is_previewnet() {
            Some("previewnet")
        } else {
            None
        }
    }
}

impl FromStr for LedgerId {
    type Err = Error;

    /// Accepts `mainnet`, `testnet`, `previewnet`, or hex bytes.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::MAINNET),
            "testnet" => Ok(Self::TESTNET),
            "previewnet" => Ok(Self::PREVIEWNET),
            other => {
                let digits = other.strip_prefix("0x").unwrap_or(other);
                match hex::decode(digits) {
                    Ok(bytes) if !bytes.is_empty() => Ok(Self::from_bytes(bytes)),
                    _ => Err(Error::BadLedgerId(s.to_owned())),
                }
            }
        }
    }
}

/// Network name for the public networks, hex otherwise.
impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&hex::encode(&self.0)),
        }
    }
}

impl fmt::Debug for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerId({self})")
    }
}

impl Serialize for LedgerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for LedgerId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            Ok(Self::from_bytes(<Vec<u8>>::deserialize(deserializer)?))
        }
    }
}
