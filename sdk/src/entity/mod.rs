//! # Entity Identifiers
//!
//! Accounts and contracts are addressed as `shard.realm.num`. An account may
//! instead be addressed by a public key (an *alias*) or by a 20-byte EVM
//! address, and a contract by an EVM address. Exactly one of those modes is
//! active for any id, and ids in different modes never compare equal even
//! when their bytes happen to line up.
//!
//! ## Text forms
//!
//! ```text
//! 1001                      num only; shard and realm default to 0
//! 0.0.1001                  num
//! 0.0.1001-urkbk            num with checksum
//! 0.0.302a300506032b6570…   public key alias (DER hex)
//! 0.0.7e5f4552091a6912…     EVM address (40 hex, optional 0x)
//! ```
//!
//! A third component of at most 20 digits is always a num. A checksum is
//! rejected outright on alias and EVM-address ids.
//!
//! ## Checksums
//!
//! A parsed checksum rides along with the id for display but never takes part
//! in equality or hashing. It is checked only when the caller asks, against a
//! ledger the caller names: see [`AccountId::validate_checksum`].

mod account_id;
mod checksum;
mod contract_id;
mod evm_address;
mod ledger_id;

pub use account_id::AccountId;
pub use checksum::Checksum;
pub use contract_id::ContractId;
pub use evm_address::EvmAddress;
pub use ledger_id::LedgerId;

use crate::error::{BadEntityIdError, EntityIdParseError, Error, Result};

const MAX_NUM_DIGITS: usize = 20;

/// What remains of an id string once shard and realm are split off.
pub(crate) enum Tail<'a> {
    Num(u64, Option<Checksum>),
    Other(&'a str),
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_u64(s: &str) -> Result<u64> {
    if !is_digits(s) {
        return Err(EntityIdParseError::BadNumber(s.to_owned()).into());
    }
    s.parse()
        .map_err(|_| EntityIdParseError::BadNumber(s.to_owned()).into())
}

/// Splits `shard.realm.<tail>` or a bare `num`.
pub(crate) fn split_entity_id(s: &str) -> Result<(u64, u64, Tail<'_>)> {
    let parts: Vec<&str> = s.split('.').collect();
    let (shard, realm, last) = match parts.as_slice() {
        [last] => (0, 0, *last),
        [shard, realm, last] => (parse_u64(shard)?, parse_u64(realm)?, *last),
        _ => return Err(EntityIdParseError::Malformed(s.to_owned()).into()),
    };

    let (body, checksum) = match last.split_once('-') {
        Some((body, checksum)) => (body, Some(checksum)),
        None => (last, None),
    };

    // u64::MAX has 20 digits. Longer all-digit tails are hex, not numbers.
    let numeric = body.len() <= MAX_NUM_DIGITS;
    if let Some(num) = parse_u64(body).ok().filter(|_| numeric) {
        let checksum = checksum.map(str::parse::<Checksum>).transpose()?;
        return Ok((shard, realm, Tail::Num(num, checksum)));
    }
    if checksum.is_some() {
        return Err(bad_tail(body, EntityIdParseError::ChecksumOnAlias.into()));
    }
    if parts.len() == 1 {
        return Err(EntityIdParseError::Malformed(s.to_owned()).into());
    }
    Ok((shard, realm, Tail::Other(body)))
}

/// Error for a tail that is neither a key nor an EVM address.
///
/// All-digit tails only land here when they overflow `u64`, so they are
/// reported as bad numbers rather than bad aliases.
pub(crate) fn bad_tail(body: &str, evm_error: Error) -> Error {
    if is_digits(body) {
        EntityIdParseError::BadNumber(body.to_owned()).into()
    } else {
        evm_error
    }
}

/// Checks `present` against the checksum of `shard.realm.num` on `ledger`.
pub(crate) fn validate_checksum(
    ledger: &LedgerId,
    shard: u64,
    realm: u64,
    num: u64,
    present: Option<Checksum>,
) -> Result<()> {
    let Some(present) = present else {
        return Ok(());
    };
    let expected = Checksum::compute(ledger, shard, realm, num);
    if present != expected {
        return Err(BadEntityIdError {
            shard,
            realm,
            num,
            present_checksum: present.to_string(),
            expected_checksum: expected.to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num_tail(s: &str) -> (u64, u64, u64, Option<Checksum>) {
        match split_entity_id(s).unwrap() {
            (shard, realm, Tail::Num(num, checksum)) => (shard, realm, num, checksum),
            (_, _, Tail::Other(other)) => panic!("`{s}` split to non-numeric tail `{other}`"),
        }
    }

    #[test]
    fn bare_num_defaults_shard_and_realm() {
        assert_eq!(num_tail("1001"), (0, 0, 1001, None));
    }

    #[test]
    fn full_form_with_checksum() {
        let (shard, realm, num, checksum) = num_tail("1.2.3-abcde");
        assert_eq!((shard, realm, num), (1, 2, 3));
        assert_eq!(checksum.unwrap().as_str(), "abcde");
    }

    #[test]
    fn long_digit_tail_is_not_a_num() {
        let forty_zeros = "0".repeat(40);
        let id = format!("0.0.{forty_zeros}");
        let (_, _, tail) = split_entity_id(&id).unwrap();
        assert!(matches!(tail, Tail::Other(body) if body == forty_zeros));
    }

    #[test]
    fn malformed_shapes() {
        for bad in ["", "0.0", "0.0.0.0", "a.0.1", "0.-1.1", "0.0.1-ABCDE", "abc", "+1.0.1"] {
            assert!(split_entity_id(bad).is_err(), "`{bad}` should not parse");
        }
    }

    #[test]
    fn checksum_on_non_numeric_tail() {
        assert!(matches!(
            split_entity_id("0.0.deadbeef-abcde"),
            Err(Error::EntityIdParse(EntityIdParseError::ChecksumOnAlias))
        ));
    }

    #[test]
    fn overflowing_num_with_checksum_is_a_bad_number() {
        for id in ["0.0.99999999999999999999-abcde", "0.0.18446744073709551616-abcde"] {
            assert!(
                matches!(
                    split_entity_id(id),
                    Err(Error::EntityIdParse(EntityIdParseError::BadNumber(_)))
                ),
                "`{id}`"
            );
        }
    }

    #[test]
    fn validate_checksum_outcomes() {
        let good = Checksum::compute(&LedgerId::MAINNET, 0, 0, 123);
        assert!(validate_checksum(&LedgerId::MAINNET, 0, 0, 123, Some(good)).is_ok());
        assert!(validate_checksum(&LedgerId::MAINNET, 0, 0, 123, None).is_ok());

        let err = validate_checksum(&LedgerId::TESTNET, 0, 0, 123, Some(good)).unwrap_err();
        assert_eq!(
            err,
            Error::BadEntityId(BadEntityIdError {
                shard: 0,
                realm: 0,
                num: 123,
                present_checksum: "vfmkw".into(),
                expected_checksum: "esxsf".into(),
            })
        );
    }
}
