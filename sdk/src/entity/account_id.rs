//! Account identifiers.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{
    ENTITY_FIELD_ALIAS, ENTITY_FIELD_NUM, ENTITY_FIELD_REALM, ENTITY_FIELD_SHARD,
    EVM_ADDRESS_LENGTH,
};
use crate::crypto::PublicKey;
use crate::entity::{self, Checksum, EvmAddress, LedgerId, Tail};
use crate::error::{Error, Result};
use crate::util::protobuf::{self, FieldValue};

/// How an account is addressed within its shard and realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AccountAddress {
    Num(u64),
    Alias(PublicKey),
    Evm(EvmAddress),
}

/// The id of an account: `shard.realm.num`, or `shard.realm.<alias>`.
///
/// An optional checksum parsed from text is carried for display only.
/// Equality and hashing ignore it.
#[derive(Clone, Copy)]
pub struct AccountId {
    shard: u64,
    realm: u64,
    address: AccountAddress,
    checksum: Option<Checksum>,
}

impl AccountId {
    /// `shard.realm.num`.
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self::with_address(shard, realm, AccountAddress::Num(num))
    }

    /// An account addressed by a public key alias.
    pub const fn from_alias(shard: u64, realm: u64, alias: PublicKey) -> Self {
        Self::with_address(shard, realm, AccountAddress::Alias(alias))
    }

    /// An account addressed by an EVM address.
    ///
    /// The address is stored verbatim, even if it happens to be a long-zero
    /// address. Use [`from_solidity_address`](Self::from_solidity_address) to
    /// decode one of those into `shard.realm.num`.
    pub const fn from_evm_address(shard: u64, realm: u64, address: EvmAddress) -> Self {
        Self::with_address(shard, realm, AccountAddress::Evm(address))
    }

    const fn with_address(shard: u64, realm: u64, address: AccountAddress) -> Self {
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

    /// The account number; 0 for alias and EVM-address ids.
    pub fn num(&self) -> u64 {
        match self.address {
            AccountAddress::Num(num) => num,
            _ => 0,
        }
    }

    pub fn alias(&self) -> Option<&PublicKey> {
        match &self.address {
            AccountAddress::Alias(key) => Some(key),
            _ => None,
        }
    }

    pub fn evm_address(&self) -> Option<&EvmAddress> {
        match &self.address {
            AccountAddress::Evm(address) => Some(address),
            _ => None,
        }
    }

    /// The checksum this id was parsed with, if any.
    pub fn checksum(&self) -> Option<Checksum> {
        self.checksum
    }

    fn numeric(&self, operation: &'static str) -> Result<u64> {
        match self.address {
            AccountAddress::Num(num) => Ok(num),
            _ => Err(Error::AliasedEntityId(operation)),
        }
    }

    /// Long-zero EVM address for a numeric id, or the stored address for an
    /// EVM-address id. Alias ids have none.
    pub fn to_solidity_address(&self) -> Result<EvmAddress> {
        match self.address {
            AccountAddress::Num(num) => EvmAddress::from_entity_num(self.shard, self.realm, num),
            AccountAddress::Evm(address) => Ok(address),
            AccountAddress::Alias(_) => Err(Error::AliasedEntityId("to_solidity_address")),
        }
    }

    /// `shard.realm.num-checksum` for `ledger`. Numeric ids only.
    pub fn to_string_with_checksum(&self, ledger: &LedgerId) -> Result<String> {
        let num = self.numeric("to_string_with_checksum")?;
        let checksum = Checksum::compute(ledger, self.shard, self.realm, num);
        Ok(format!("{}.{}.{num}-{checksum}", self.shard, self.realm))
    }

    /// Checks the parsed checksum, if there is one, against `ledger`.
    ///
    /// Ids without a checksum (including every alias and EVM-address id)
    /// pass. A mismatch is almost always a typo; do not build a transaction
    /// against an id that fails this.
    pub fn validate_checksum(&self, ledger: &LedgerId) -> Result<()> {
        entity::validate_checksum(ledger, self.shard, self.realm, self.num(), self.checksum)
    }

    /// Protobuf `AccountID` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        protobuf::uint64_tag_encode(ENTITY_FIELD_SHARD, self.shard, false, &mut out);
        protobuf::uint64_tag_encode(ENTITY_FIELD_REALM, self.realm, false, &mut out);
        match &self.address {
            AccountAddress::Num(num) => {
                protobuf::uint64_tag_encode(ENTITY_FIELD_NUM, *num, true, &mut out)
            }
            AccountAddress::Alias(key) => {
                protobuf::bytes_tag_encode(ENTITY_FIELD_ALIAS, &key.to_bytes_protobuf(), &mut out)
            }
            AccountAddress::Evm(address) => {
                protobuf::bytes_tag_encode(ENTITY_FIELD_ALIAS, address.as_bytes(), &mut out)
            }
        }
        out
    }

    /// Decodes protobuf `AccountID` bytes.
    ///
    /// A 20-byte alias is an EVM address; anything else in the alias field
    /// must be a protobuf `Key`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut shard = 0;
        let mut realm = 0;
        let mut address = None;

        for (field, value) in protobuf::decode_fields(bytes)? {
            match (field, value) {
                (ENTITY_FIELD_SHARD, FieldValue::Varint(v)) => shard = v,
                (ENTITY_FIELD_REALM, FieldValue::Varint(v)) => realm = v,
                (ENTITY_FIELD_NUM, FieldValue::Varint(v)) => address = Some(AccountAddress::Num(v)),
                (ENTITY_FIELD_ALIAS, FieldValue::Bytes(raw)) if raw.len() == EVM_ADDRESS_LENGTH => {
                    address = Some(AccountAddress::Evm(EvmAddress::from_bytes(raw)?))
                }
                (ENTITY_FIELD_ALIAS, FieldValue::Bytes(raw)) => {
                    address = Some(AccountAddress::Alias(PublicKey::from_bytes_protobuf(raw)?))
                }
                (ENTITY_FIELD_SHARD..=ENTITY_FIELD_ALIAS, _) => {
                    return Err(Error::from_protobuf(format!(
                        "AccountID field {field} has the wrong wire type"
                    )))
                }
                _ => {}
            }
        }

        let address =
            address.ok_or_else(|| Error::from_protobuf("AccountID has no num or alias"))?;
        Ok(Self::with_address(shard, realm, address))
    }
}

impl PartialEq for AccountId {
    fn eq(&self, other: &Self) -> bool {
        // The checksum is display metadata, not identity.
        (self.shard, self.realm, self.address) == (other.shard, other.realm, other.address)
    }
}

impl Eq for AccountId {}

impl Hash for AccountId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with PartialEq.
        (self.shard, self.realm, self.address).hash(state);
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (shard, realm, tail) = entity::split_entity_id(s)?;
        match tail {
            Tail::Num(num, checksum) => Ok(Self {
                checksum,
                ..Self::new(shard, realm, num)
            }),
            Tail::Other(body) => {
                if let Ok(key) = body.parse::<PublicKey>() {
                    return Ok(Self::from_alias(shard, realm, key));
                }
                body.parse::<EvmAddress>()
                    .map(|address| Self::from_evm_address(shard, realm, address))
                    .map_err(|e| entity::bad_tail(body, e))
            }
        }
    }
}

impl From<u64> for AccountId {
    fn from(num: u64) -> Self {
        Self::new(0, 0, num)
    }
}

impl From<PublicKey> for AccountId {
    fn from(alias: PublicKey) -> Self {
        Self::from_alias(0, 0, alias)
    }
}

impl From<EvmAddress> for AccountId {
    fn from(address: EvmAddress) -> Self {
        Self::from_evm_address(0, 0, address)
    }
}

/// `shard.realm.num`, `shard.realm.<DER hex>` or `shard.realm.<EVM hex>`. Never a checksum.
impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            AccountAddress::Num(num) => write!(f, "{}.{}.{num}", self.shard, self.realm),
            AccountAddress::Alias(key) => write!(f, "{}.{}.{key}", self.shard, self.realm),
            AccountAddress::Evm(address) => write!(f, "{}.{}.{address}", self.shard, self.realm),
        }
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.checksum {
            Some(checksum) => write!(f, "AccountId({self}-{checksum})"),
            None => write!(f, "AccountId({self})"),
        }
    }
}

impl Serialize for AccountId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for AccountId {
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
    use crate::crypto::PrivateKey;
    use crate::error::{BadEntityIdError, EntityIdParseError};
    use std::collections::HashSet;

    #[test]
    fn parse_numeric_forms() {
        assert_eq!("1001".parse::<AccountId>().unwrap(), AccountId::new(0, 0, 1001));
        assert_eq!("0.0.1001".parse::<AccountId>().unwrap(), AccountId::new(0, 0, 1001));
        assert_eq!("1.2.3".parse::<AccountId>().unwrap(), AccountId::new(1, 2, 3));
    }

    #[test]
    fn parse_with_checksum_keeps_it_for_display_only() {
        let id: AccountId = "0.0.123-vfmkw".parse().unwrap();
        assert_eq!(id, AccountId::new(0, 0, 123));
        assert_eq!(id.checksum().unwrap().as_str(), "vfmkw");
        assert_eq!(id.to_string(), "0.0.123");
        assert_eq!(format!("{id:?}"), "AccountId(0.0.123-vfmkw)");
    }

    #[test]
    fn parse_alias() {
        let key = PrivateKey::generate_ed25519().public_key();
        let id: AccountId = format!("0.0.{key}").parse().unwrap();
        assert_eq!(id.alias(), Some(&key));
        assert_eq!(id.num(), 0);
        assert_eq!(id.to_string(), format!("0.0.{}", key.to_string_der()));
        assert_eq!(id.to_string().parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn parse_evm_address() {
        let id: AccountId = "0.0.7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap();
        assert!(id.evm_address().is_some());
        assert!(id.alias().is_none());

        let prefixed: AccountId = "0.0.0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf".parse().unwrap();
        assert_eq!(prefixed, id);
        assert_eq!(prefixed.to_string(), "0.0.7e5f4552091a69125d5dfcb7b8c2659029395bdf");
    }

    #[test]
    fn checksum_rejected_on_alias_and_evm() {
        let key = PrivateKey::generate_ecdsa().public_key();
        for s in [
            format!("0.0.{key}-abcde"),
            "0.0.7e5f4552091a69125d5dfcb7b8c2659029395bdf-abcde".to_owned(),
        ] {
            assert_eq!(
                s.parse::<AccountId>().unwrap_err(),
                Error::EntityIdParse(EntityIdParseError::ChecksumOnAlias)
            );
        }
    }

    #[test]
    fn wrong_length_evm_address() {
        assert_eq!(
            "0.0.7e5f4552091a69125d5dfcb7b8c2659029395b".parse::<AccountId>().unwrap_err(),
            Error::EntityIdParse(EntityIdParseError::BadEvmAddress(19))
        );
        assert!(matches!(
            "0.0.nothex".parse::<AccountId>(),
            Err(Error::EntityIdParse(EntityIdParseError::BadAlias(_)))
        ));
        assert!(matches!(
            "0.0.99999999999999999999999".parse::<AccountId>(),
            Err(Error::EntityIdParse(EntityIdParseError::BadNumber(_)))
        ));
    }

    #[test]
    fn to_string_with_checksum_per_ledger() {
        let id = AccountId::new(0, 0, 123);
        assert_eq!(id.to_string_with_checksum(&LedgerId::MAINNET).unwrap(), "0.0.123-vfmkw");
        assert_eq!(id.to_string_with_checksum(&LedgerId::TESTNET).unwrap(), "0.0.123-esxsf");

        let evm = AccountId::from_evm_address(0, 0, EvmAddress::new([1; 20]));
        assert_eq!(
            evm.to_string_with_checksum(&LedgerId::MAINNET).unwrap_err(),
            Error::AliasedEntityId("to_string_with_checksum")
        );
    }

    #[test]
    fn validate_checksum_against_ledger() {
        let id: AccountId = "0.0.123-esxsf".parse().unwrap();
        assert!(id.validate_checksum(&LedgerId::TESTNET).is_ok());
        assert_eq!(
            id.validate_checksum(&LedgerId::MAINNET).unwrap_err(),
            Error::BadEntityId(BadEntityIdError {
                shard: 0,
                realm: 0,
                num: 123,
                present_checksum: "esxsf".into(),
                expected_checksum: "vfmkw".into(),
            })
        );
        assert!(AccountId::new(0, 0, 123).validate_checksum(&LedgerId::MAINNET).is_ok());
    }

    #[test]
    fn modes_never_collide() {
        let num = AccountId::new(0, 0, 0);
        let evm = AccountId::from_evm_address(0, 0, EvmAddress::new([0; 20]));
        assert_ne!(num, evm);

        let with_checksum: AccountId = "0.0.0-abcde".parse().unwrap();
        let set: HashSet<AccountId> = [num, evm, with_checksum].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn protobuf_numeric() {
        let id = AccountId::new(0, 0, 1001);
        // Zero shard and realm are omitted; num is always written.
        assert_eq!(id.to_bytes(), vec![0x18, 0xe9, 0x07]);
        assert_eq!(AccountId::from_bytes(&id.to_bytes()).unwrap(), id);

        let zero = AccountId::new(0, 0, 0);
        assert_eq!(zero.to_bytes(), vec![0x18, 0x00]);

        let full = AccountId::new(1, 2, 3);
        assert_eq!(full.to_bytes(), vec![0x08, 0x01, 0x10, 0x02, 0x18, 0x03]);
    }

    #[test]
    fn protobuf_zero_evm_address_stays_evm() {
        let id = AccountId::from_evm_address(0, 0, EvmAddress::new([0; 20]));
        let decoded = AccountId::from_bytes(&id.to_bytes()).unwrap();
        assert_eq!(decoded, id);
        assert_eq!(decoded.evm_address(), Some(&EvmAddress::new([0; 20])));
    }

    #[test]
    fn protobuf_alias() {
        for key in [
            PrivateKey::generate_ed25519().public_key(),
            PrivateKey::generate_ecdsa().public_key(),
        ] {
            let id = AccountId::from_alias(0, 0, key);
            let decoded = AccountId::from_bytes(&id.to_bytes()).unwrap();
            assert_eq!(decoded.alias(), Some(&key));
        }
    }

    #[test]
    fn protobuf_rejects_empty_and_mistyped() {
        assert!(AccountId::from_bytes(&[]).is_err());
        // Field 3 as length-delimited instead of varint.
        assert!(AccountId::from_bytes(&[0x1a, 0x00]).is_err());
    }

    #[test]
    fn solidity_address_round_trip() {
        let id = AccountId::new(0, 0, 1001);
        let address = id.to_solidity_address().unwrap();
        assert_eq!(address.to_string(), "00000000000000000000000000000000000003e9");
        assert_eq!(AccountId::from_solidity_address(&address.to_string()).unwrap(), id);

        let alias = AccountId::from(PrivateKey::generate_ed25519().public_key());
        assert!(alias.to_solidity_address().is_err());
    }

    #[test]
    fn serde_forms() {
        let id = AccountId::new(0, 0, 1001);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"0.0.1001\"");
        assert_eq!(serde_json::from_str::<AccountId>("\"0.0.1001\"").unwrap(), id);

        let bin = bincode::serialize(&id).unwrap();
        assert_eq!(bincode::deserialize::<AccountId>(&bin).unwrap(), id);
    }
}
