//! # Hashing Utilities
//!
//! The handful of hash and MAC constructions the identity layer is built on:
//!
//! - **SHA-256** for the BIP-39 checksum byte.
//! - **Keccak-256** for EVM addresses and the ECDSA signing digest. This is
//!   the original Keccak padding, not FIPS-202 SHA3-256; the two disagree on
//!   every input.
//! - **HMAC-SHA512** for master keys and child derivation on both curves.
//! - **PBKDF2-HMAC-SHA512** for BIP-39 seeds and legacy child keys.
//!
//! Outputs that carry key material come back wrapped in [`Zeroizing`].

use hmac::{Hmac, Mac};
use pbkdf2::pbkdf2;
use sha2::{Digest, Sha256, Sha512};
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroizing;

use crate::config::PBKDF2_ROUNDS;
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 of `data`, as used by the EVM.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// HMAC-SHA512 keyed with `key` over the concatenation of `parts`.
pub(crate) fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<[u8; 64]>> {
    // HMAC accepts keys of any length; this only fails on a broken backend.
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::key_derive("HMAC-SHA512 rejected its key"))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = Zeroizing::new([0u8; 64]);
    output.copy_from_slice(&mac.finalize().into_bytes());
    Ok(output)
}

/// PBKDF2-HMAC-SHA512 with the shared round count, filling `out`.
pub(crate) fn pbkdf2_sha512(password: &[u8], salt: &[u8], out: &mut [u8]) -> Result<()> {
    pbkdf2::<HmacSha512>(password, salt, PBKDF2_ROUNDS, out)
        .map_err(|_| Error::key_derive("PBKDF2 output length rejected"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn keccak256_is_not_sha3() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn hmac_rfc4231_case_2() {
        let out = hmac_sha512(b"Jefe", &[b"what do ya want ", b"for nothing?"]).unwrap();
        assert_eq!(
            hex::encode(&out[..]),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn pbkdf2_is_deterministic() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        pbkdf2_sha512(b"password", b"salt", &mut a).unwrap();
        pbkdf2_sha512(b"password", b"salt", &mut b).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, [0u8; 32]);
    }
}
