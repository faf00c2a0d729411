//! 20-byte EVM addresses.
//!
//! Two kinds of address share this type. Real ones are derived from an ECDSA
//! public key and are opaque. "Long-zero" ones encode an entity id directly:
//! 4-byte shard, 8-byte realm, 8-byte num, all big-endian. Only the second
//! kind converts back to an entity number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::EVM_ADDRESS_LENGTH;
use crate::error::{EntityIdParseError, Error, Result};

/// A 20-byte EVM address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvmAddress([u8; EVM_ADDRESS_LENGTH]);

impl EvmAddress {
    /// Wraps 20 raw bytes.
    pub const fn new(bytes: [u8; EVM_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Copies an address out of a slice, which must be exactly 20 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; EVM_ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| EntityIdParseError::BadEvmAddress(bytes.len()))?;
        Ok(Self(bytes))
    }

    /// Long-zero address for `shard.realm.num`.
    ///
    /// Fails if `shard` does not fit in four bytes.
    pub fn from_entity_num(shard: u64, realm: u64, num: u64) -> Result<Self> {
        let shard = u32::try_from(shard).map_err(|_| EntityIdParseError::ShardOutOfRange(shard))?;

        let mut bytes = [0u8; EVM_ADDRESS_LENGTH];
        bytes[..4].copy_from_slice(&shard.to_be_bytes());
        bytes[4..12].copy_from_slice(&realm.to_be_bytes());
        bytes[12..].copy_from_slice(&num.to_be_bytes());
        Ok(Self(bytes))
    }

    /// Splits any address into `(shard, realm, num)` as if it were long-zero.
    ///
    /// Always succeeds, but the result only means something for addresses
    /// built by [`from_entity_num`](Self::from_entity_num).
    pub fn to_entity_num(&self) -> (u64, u64, u64) {
        let mut shard = [0u8; 4];
        let mut realm = [0u8; 8];
        let mut num = [0u8; 8];
        shard.copy_from_slice(&self.0[..4]);
        realm.copy_from_slice(&self.0[4..12]);
        num.copy_from_slice(&self.0[12..]);
        (
            u64::from(u32::from_be_bytes(shard)),
            u64::from_be_bytes(realm),
            u64::from_be_bytes(num),
        )
    }

    /// The entity number of a long-zero address for shard 0, realm 0.
    ///
    /// `None` for any address whose top twelve bytes are not all zero.
    pub fn long_zero_num(&self) -> Option<u64> {
        match self.to_entity_num() {
            (0, 0, num) => Some(num),
            _ => None,
        }
    }

    /// The raw bytes.
    pub fn to_bytes(&self) -> [u8; EVM_ADDRESS_LENGTH] {
        self.0
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; EVM_ADDRESS_LENGTH] {
        &self.0
    }
}

impl From<[u8; EVM_ADDRESS_LENGTH]> for EvmAddress {
    fn from(bytes: [u8; EVM_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for EvmAddress {
    type Err = Error;

    /// Parses 40 hex characters, with or without a leading `0x`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|_| EntityIdParseError::BadAlias(s.to_owned()))?;
        Self::from_bytes(&bytes)
    }
}

/// Lowercase hex, no prefix.
impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress(0x{})", hex::encode(self.0))
    }
}

impl Serialize for EvmAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{self}"))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for EvmAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_zero_layout() {
        let addr = EvmAddress::from_entity_num(1, 2, 0x0102_0304).unwrap();
        assert_eq!(
            addr.to_string(),
            "0000000100000000000000020000000001020304"
        );
        assert_eq!(addr.to_entity_num(), (1, 2, 0x0102_0304));
        assert_eq!(addr.long_zero_num(), None);

        let addr = EvmAddress::from_entity_num(0, 0, 1001).unwrap();
        assert_eq!(addr.long_zero_num(), Some(1001));
    }

    #[test]
    fn shard_must_fit_in_four_bytes() {
        assert_eq!(
            EvmAddress::from_entity_num(1 << 32, 0, 0).unwrap_err(),
            Error::EntityIdParse(EntityIdParseError::ShardOutOfRange(1 << 32))
        );
    }

    #[test]
    fn parse_with_and_without_prefix() {
        let bare: EvmAddress = "7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap();
        let prefixed: EvmAddress = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".parse().unwrap();
        assert_eq!(bare, prefixed);
    }

    #[test]
    fn wrong_length_rejected() {
        assert_eq!(
            "0x1234".parse::<EvmAddress>().unwrap_err(),
            Error::EntityIdParse(EntityIdParseError::BadEvmAddress(2))
        );
    }

    #[test]
    fn serde_forms() {
        let addr = EvmAddress::from_entity_num(0, 0, 5).unwrap();

        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000005\"");
        assert_eq!(serde_json::from_str::<EvmAddress>(&json).unwrap(), addr);

        let bin = bincode::serialize(&addr).unwrap();
        assert_eq!(bincode::deserialize::<EvmAddress>(&bin).unwrap(), addr);
    }
}
