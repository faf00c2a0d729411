//! Contract identifiers.
//!
//! Same shape as [`AccountId`](crate::entity::AccountId), minus key aliases:
//! a contract is either `shard.realm.num` or `shard.realm.<EVM address>`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ENTITY_FIELD_ALIAS, ENTITY_FIELD_NUM, ENTITY_FIELD_REALM, ENTITY_FIELD_SHARD};
use crate::entity::{self, Checksum, EvmAddress, LedgerId, Tail};
use crate::error::{Error, Result};
use crate::util::protobuf::{self, FieldValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ContractAddress {
    Num(u64),
    Evm(EvmAddress),
}

/// The id of a smart contract.
#[derive(Clone, Copy)]
pub struct ContractId {
    shard: u64,
    realm: u64,
    address: ContractAddress,
    checksum: Option<Checksum>,
}

impl ContractId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self::with_address(shard, realm, ContractAddress::Num(num))
    }

    /// A contract addressed by its EVM address, stored verbatim.
    pub const fn from_evm_address(shard: u64, realm: u64, address: EvmAddress) -> Self {
        Self::with_address(shard, realm, ContractAddress::Evm(address))
    }

    const fn with_address(shard: u64, realm: u64, address: ContractAddress) -> Self {
        Self {
            shard,
            realm,
            address,
            checksum: None,
        }
    }

    /// Decodes a long-zero EVM address (hex) into `shard.realm.num`.
    pub fn from_solidity_address(address: &str) -> Result<Self> {
        let (shard, realm, num) = address.parse::<EvmAddress>()?.to_entity_num();
        Ok(Self::new(shard, realm, num))
    }

    pub fn shard(&self) -> u64 {
        self.shard
    }

    pub fn realm(&self) -> u64 {
        self.realm
    }

    /// The contract number; 0 for EVM-address ids.
    pub fn num(&self) -> u64 {
        match self.address {
            ContractAddress::Num(num) => num,
            ContractAddress::Evm(_) => 0,
        }
    }

    pub fn evm_address(&self) -> Option<&EvmAddress> {
        match &self.address {
            ContractAddress::Evm(address) => Some(address),
            ContractAddress::Num(_) => None,
        }
    }

    pub fn checksum(&self) -> Option<Checksum> {
        self.checksum
    }

    /// Long-zero address for a numeric id, or the stored EVM address.
    pub fn to_solidity_address(&self) -> Result<EvmAddress> {
        match self.address {
            ContractAddress::Num(num) => EvmAddress::from_entity_num(self.shard, self.realm, num),
            ContractAddress::Evm(address) => Ok(address),
        }
    }

    /// `shard.realm.num-checksum` for `ledger`. Numeric ids only.
    pub fn to_string_with_checksum(&self, ledger: &LedgerId) -> Result<String> {
        let ContractAddress::Num(num) = self.address else {
            return Err(Error::AliasedEntityId("to_string_with_checksum"));
        };
        let checksum = Checksum::compute(ledger, self.shard, self.realm, num);
        Ok(format!("{}.{}.{num}-{checksum}", self.shard, self.realm))
    }

    /// Checks the parsed checksum, if any, against `ledger`.
    pub fn validate_checksum(&self, ledger: &LedgerId) -> Result<()> {
        entity::validate_checksum(ledger, self.shard, self.realm, self.num(), self.checksum)
    }

    /// Protobuf `ContractID` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        protobuf::uint64_tag_encode(ENTITY_FIELD_SHARD, self.shard, false, &mut out);
        protobuf::uint64_tag_encode(ENTITY_FIELD_REALM, self.realm, false, &mut out);
        match &self.address {
            ContractAddress::Num(num) => {
                protobuf::uint64_tag_encode(ENTITY_FIELD_NUM, *num, true, &mut out)
            }
            ContractAddress::Evm(address) => {
                protobuf::bytes_tag_encode(ENTITY_FIELD_ALIAS, address.as_bytes(), &mut out)
            }
        }
        out
    }

    /// Decodes protobuf `ContractID` bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut shard = 0;
        let mut realm = 0;
        let mut address = None;

        for (field, value) in protobuf::decode_fields(bytes)? {
            match (field, value) {
                (ENTITY_FIELD_SHARD, FieldValue::Varint(v)) => shard = v,
                (ENTITY_FIELD_REALM, FieldValue::Varint(v)) => realm = v,
                (ENTITY_FIELD_NUM, FieldValue::Varint(v)) => {
                    address = Some(ContractAddress::Num(v))
                }
                (ENTITY_FIELD_ALIAS, FieldValue::Bytes(raw)) => {
                    address = Some(ContractAddress::Evm(EvmAddress::from_bytes(raw)?))
                }
                (ENTITY_FIELD_SHARD..=ENTITY_FIELD_ALIAS, _) => {
                    return Err(Error::from_protobuf(format!(
                        "ContractID field {field} has the wrong wire type"
                    )))
                }
                _ => {}
            }
        }

        let address = address
            .ok_or_else(|| Error::from_protobuf("ContractID has no num or EVM address"))?;
        Ok(Self::with_address(shard, realm, address))
    }
}

impl PartialEq for ContractId {
    fn eq(&self, other: &Self) -> bool {
        (self.shard, self.realm, self.address) == (other.shard, other.realm, other.address)
    }
}

impl Eq for ContractId {}

impl Hash for ContractId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.shard, self.realm, self.address).hash(state);
    }
}

impl FromStr for ContractId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, tail) = entity::split_entity_id(s)?;
        match tail {
            Tail::Num(num, checksum) => Ok(Self {
                checksum,
                ..Self::new(shard, realm, num)
            }),
            Tail::Other(body) => body
                .parse::<EvmAddress>()
                .map(|address| Self::from_evm_address(shard, realm, address))
                .map_err(|e| entity::bad_tail(body, e)),
        }
    }
}

impl From<u64> for ContractId {
    fn from(num: u64) -> Self {
        Self::new(0, 0, num)
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            ContractAddress::Num(num) => write!(f, "{}.{}.{num}", self.shard, self.realm),
            ContractAddress::Evm(address) => write!(f, "{}.{}.{address}", self.shard, self.realm),
        }
    }
}

impl fmt::Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.checksum {
            Some(checksum) => write!(f, "ContractId({self}-{checksum})"),
            None => write!(f, "ContractId({self})"),
        }
    }
}

impl Serialize for ContractId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for ContractId {
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
    use crate::error::EntityIdParseError;

    #[test]
    fn parse_and_display() {
        let id: ContractId = "0.0.5005-txmoy".parse().unwrap();
        assert_eq!(id, ContractId::new(0, 0, 5005));
        assert_eq!(id.to_string(), "0.0.5005");
        assert!(id.validate_checksum(&LedgerId::MAINNET).is_ok());
        assert!(id.validate_checksum(&LedgerId::TESTNET).is_err());
    }

    #[test]
    fn evm_mode() {
        let id: ContractId = "1.2.0x00000000000000000000000000000000000003e9".parse().unwrap();
        assert_eq!(id.shard(), 1);
        assert_eq!(id.num(), 0);
        assert_eq!(id.evm_address().and_then(EvmAddress::long_zero_num), Some(1001));
        assert_ne!(id, ContractId::new(1, 2, 1001));
        assert_eq!(ContractId::from_bytes(&id.to_bytes()).unwrap(), id);
    }

    #[test]
    fn contracts_have_no_key_alias() {
        let alias = "0.0.302a300506032b6570032100".to_owned() + &"ab".repeat(32);
        assert!(alias.parse::<ContractId>().is_err());
        assert_eq!(
            "0.0.00000000000000000000000000000000000003e9-abcde"
                .parse::<ContractId>()
                .unwrap_err(),
            Error::EntityIdParse(EntityIdParseError::ChecksumOnAlias)
        );
    }

    #[test]
    fn checksum_string() {
        assert_eq!(
            ContractId::new(0, 0, 1001).to_string_with_checksum(&LedgerId::PREVIEWNET).unwrap(),
            "0.0.1001-nsgqc"
        );
    }

    #[test]
    fn solidity_round_trip() {
        let id = ContractId::new(0, 0, 5005);
        let address = id.to_solidity_address().unwrap();
        assert_eq!(ContractId::from_solidity_address(&format!("0x{address}")).unwrap(), id);
    }

    #[test]
    fn protobuf_and_serde() {
        let id = ContractId::new(3, 0, 7);
        assert_eq!(id.to_bytes(), vec![0x08, 0x03, 0x18, 0x07]);
        assert_eq!(ContractId::from_bytes(&id.to_bytes()).unwrap(), id);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"3.0.7\"");
        assert_eq!(serde_json::from_str::<ContractId>(&json).unwrap(), id);
    }
}
