//! # Key Derivation
//!
//! Hierarchical derivation for both curves, plus the one-shot legacy scheme.
//!
//! - **Ed25519** follows SLIP-0010: master key from `HMAC-SHA512("ed25519
//!   seed", seed)`, hardened children only. Every index is hardened whether
//!   or not the caller set the top bit.
//! - **secp256k1** follows BIP-32: master key from `HMAC-SHA512("Bitcoin
//!   seed", seed)`, hardened and normal children. A child scalar that falls
//!   outside the curve order (odds around 2^-127) is an error, not a panic.
//! - **Legacy** derivation stretches a 32-byte Ed25519 key and a signed
//!   64-bit index through PBKDF2. There is no chain code and no tree: every
//!   index is derived straight from the root.
//!
//! Nothing in here logs. The key types one level up report successful
//! derivations; intermediate material never leaves this module unwrapped.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, Scalar, SecretKey};
use zeroize::Zeroizing;

use crate::config::{
    BIP44_PURPOSE, CHAIN_CODE_LENGTH, ED25519_KEY_LENGTH, ED25519_SEED_KEY, HARDENED_BIT,
    LEDGER_COIN_TYPE, SECP256K1_SEED_KEY,
};
use crate::crypto::hash::{hmac_sha512, pbkdf2_sha512};
use crate::error::{Error, Result};

/// Index reserved by the legacy scheme for its distinguished child.
const LEGACY_SPECIAL_INDEX: i64 = 0x00ff_ffff_ffff;

/// Sets the hardened bit on `index`.
pub const fn harden(index: u32) -> u32 {
    index | HARDENED_BIT
}

/// Whether `index` has the hardened bit set.
pub const fn is_hardened(index: u32) -> bool {
    index & HARDENED_BIT != 0
}

/// Path from the Ed25519 master key to the account-level key handed out by
/// `Mnemonic::to_private_key`: `m/44'/3030'/0'/0'`.
pub const ED25519_ACCOUNT_PATH: [u32; 4] = [
    harden(BIP44_PURPOSE),
    harden(LEDGER_COIN_TYPE),
    harden(0),
    harden(0),
];

/// Path from the secp256k1 master key to the parent of every ECDSA address
/// key: `m/44'/3030'/0'/0`. The address index is appended by the caller.
pub const ECDSA_ACCOUNT_PATH: [u32; 4] = [
    harden(BIP44_PURPOSE),
    harden(LEDGER_COIN_TYPE),
    harden(0),
    0,
];

/// Private key bytes paired with their chain code.
pub(crate) struct ExtendedKey {
    pub key: Zeroizing<[u8; 32]>,
    pub chain_code: Zeroizing<[u8; CHAIN_CODE_LENGTH]>,
}

impl ExtendedKey {
    fn from_hmac_output(output: &[u8; 64]) -> Self {
        let mut key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; CHAIN_CODE_LENGTH]);
        key.copy_from_slice(&output[..32]);
        chain_code.copy_from_slice(&output[32..]);
        Self { key, chain_code }
    }
}

// ---------------------------------------------------------------------------
// Ed25519 (SLIP-0010)
// ---------------------------------------------------------------------------

/// SLIP-0010 Ed25519 master key for `seed`.
pub(crate) fn ed25519_master(seed: &[u8]) -> Result<ExtendedKey> {
    let output = hmac_sha512(ED25519_SEED_KEY, &[seed])?;
    Ok(ExtendedKey::from_hmac_output(&output))
}

/// SLIP-0010 Ed25519 child. Always hardened.
pub(crate) fn ed25519_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    let index = harden(index).to_be_bytes();
    let output = hmac_sha512(&parent.chain_code[..], &[&[0u8], &parent.key[..], &index])?;
    Ok(ExtendedKey::from_hmac_output(&output))
}

// ---------------------------------------------------------------------------
// secp256k1 (BIP-32)
// ---------------------------------------------------------------------------

fn secret_key(bytes: &[u8; 32]) -> Result<SecretKey> {
    SecretKey::from_bytes(&FieldBytes::from(*bytes))
        .map_err(|_| Error::key_derive("not a valid secp256k1 scalar"))
}

/// BIP-32 secp256k1 master key for `seed`.
pub(crate) fn secp256k1_master(seed: &[u8]) -> Result<ExtendedKey> {
    let output = hmac_sha512(SECP256K1_SEED_KEY, &[seed])?;
    let master = ExtendedKey::from_hmac_output(&output);
    secret_key(&master.key)?;
    Ok(master)
}

/// BIP-32 secp256k1 child, hardened or normal depending on the top bit of `index`.
pub(crate) fn secp256k1_child(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    let parent_secret = secret_key(&parent.key)?;
    let index_bytes = index.to_be_bytes();

    let output = if is_hardened(index) {
        hmac_sha512(
            &parent.chain_code[..],
            &[&[0u8], &parent.key[..], &index_bytes],
        )?
    } else {
        let point = parent_secret.public_key().to_encoded_point(true);
        hmac_sha512(&parent.chain_code[..], &[point.as_bytes(), &index_bytes])?
    };

    let mut tweak_bytes = Zeroizing::new([0u8; 32]);
    tweak_bytes.copy_from_slice(&output[..32]);
    let tweak: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*tweak_bytes)).into();
    let tweak = tweak.ok_or_else(|| Error::key_derive("child tweak exceeds the curve order"))?;

    let child: Option<NonZeroScalar> =
        NonZeroScalar::new(tweak + *parent_secret.to_nonzero_scalar()).into();
    let child = child.ok_or_else(|| Error::key_derive("child key is zero"))?;

    let mut child_key = Zeroizing::new([0u8; 32]);
    child_key.copy_from_slice(&FieldBytes::from(child));

    let mut chain_code = Zeroizing::new([0u8; CHAIN_CODE_LENGTH]);
    chain_code.copy_from_slice(&output[32..]);

    Ok(ExtendedKey {
        key: child_key,
        chain_code,
    })
}

// ---------------------------------------------------------------------------
// Legacy
// ---------------------------------------------------------------------------

/// Legacy child of a 32-byte Ed25519 key.
///
/// The password is `key || i1 || [i2; 4]`, where `i1` is a big-endian `i32`
/// (`0xff` for the distinguished index, `-1` for negative indices, `0`
/// otherwise) and `i2` is the low byte of `index`. Salt is a single `0xFF`.
pub(crate) fn legacy_child(
    key: &[u8; ED25519_KEY_LENGTH],
    index: i64,
) -> Result<Zeroizing<[u8; ED25519_KEY_LENGTH]>> {
    let i1: i32 = if index == LEGACY_SPECIAL_INDEX {
        0xff
    } else if index < 0 {
        -1
    } else {
        0
    };
    let i2 = index as u8;

    let mut password = Zeroizing::new(Vec::with_capacity(ED25519_KEY_LENGTH + 8));
    password.extend_from_slice(key);
    password.extend_from_slice(&i1.to_be_bytes());
    password.extend_from_slice(&[i2; 4]);

    let mut out = Zeroizing::new([0u8; ED25519_KEY_LENGTH]);
    pbkdf2_sha512(&password, &[0xff], &mut out[..])?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> Vec<u8> {
        hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()
    }

    #[test]
    fn hardening() {
        assert_eq!(harden(0), 0x8000_0000);
        assert_eq!(harden(harden(5)), harden(5));
        assert!(is_hardened(harden(44)));
        assert!(!is_hardened(44));
        assert_eq!(ECDSA_ACCOUNT_PATH.iter().filter(|&&i| is_hardened(i)).count(), 3);
    }

    #[test]
    fn slip10_ed25519_vector_1() {
        let master = ed25519_master(&seed()).unwrap();
        assert_eq!(
            hex::encode(&master.key[..]),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );
        assert_eq!(
            hex::encode(&master.chain_code[..]),
            "90046a93de5380a72b5e45010748567d5ea02bbf6522f979e05c0d8d8ca9fffb"
        );

        let child = ed25519_child(&master, harden(0)).unwrap();
        assert_eq!(
            hex::encode(&child.key[..]),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }

    #[test]
    fn slip10_ed25519_always_hardens() {
        let master = ed25519_master(&seed()).unwrap();
        let a = ed25519_child(&master, 0).unwrap();
        let b = ed25519_child(&master, harden(0)).unwrap();
        assert_eq!(a.key, b.key);
    }

    #[test]
    fn bip32_vector_1() {
        let master = secp256k1_master(&seed()).unwrap();
        assert_eq!(
            hex::encode(&master.key[..]),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(&master.chain_code[..]),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );

        let hardened = secp256k1_child(&master, harden(0)).unwrap();
        assert_eq!(
            hex::encode(&hardened.key[..]),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(&hardened.chain_code[..]),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );

        let normal = secp256k1_child(&hardened, 1).unwrap();
        assert_eq!(
            hex::encode(&normal.key[..]),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(&normal.chain_code[..]),
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
        );
    }

    #[test]
    fn invalid_parent_scalar_is_an_error() {
        let parent = ExtendedKey {
            key: Zeroizing::new([0u8; 32]),
            chain_code: Zeroizing::new([1u8; 32]),
        };
        assert!(matches!(secp256k1_child(&parent, 0), Err(Error::KeyDerive(_))));
    }

    #[test]
    fn legacy_children_are_distinct() {
        let root = [0x42u8; 32];
        let zero = legacy_child(&root, 0).unwrap();
        let one = legacy_child(&root, 1).unwrap();
        let neg = legacy_child(&root, -1).unwrap();
        let special = legacy_child(&root, LEGACY_SPECIAL_INDEX).unwrap();

        assert_ne!(*zero, *one);
        assert_ne!(*one, *neg);
        assert_ne!(*zero, *special);
        assert_eq!(*zero, *legacy_child(&root, 0).unwrap());
    }
}
