//! # Public Keys
//!
//! The public half of either key algorithm. Safe to share, log, and put in
//! an account alias.
//!
//! ## Encodings
//!
//! | form     | Ed25519                         | ECDSA secp256k1                      |
//! |----------|---------------------------------|--------------------------------------|
//! | raw      | 32-byte point                   | 33-byte compressed point             |
//! | DER      | SubjectPublicKeyInfo, 44 bytes  | SubjectPublicKeyInfo, 56 bytes       |
//! | protobuf | `Key { ed25519: raw }`          | `Key { ECDSA_secp256k1: raw }`       |
//!
//! `Display` and serde's human-readable form use DER hex. The protobuf form is
//! what an account alias carries on the wire.
//!
//! ## Signatures
//!
//! Ed25519 signatures are the usual 64 bytes. ECDSA signatures are 64-byte
//! `r || s` over the Keccak-256 of the message, matching what EVM tooling
//! expects. High-S ECDSA signatures are rejected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use ed25519_dalek::Verifier;
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use serde::{Deserialize, Serialize};

use crate::config::{
    ECDSA_PUBLIC_DER_PREFIX, ECDSA_PUBLIC_KEY_LENGTH, ED25519_KEY_LENGTH,
    ED25519_PUBLIC_DER_PREFIX, KEY_FIELD_ECDSA_SECP256K1, KEY_FIELD_ED25519,
};
use crate::crypto::hash::keccak256;
use crate::crypto::{decode_hex, KeyAlgorithm};
use crate::entity::EvmAddress;
use crate::error::{Error, Result};
use crate::util::protobuf::{self, FieldValue};

/// Length of an uncompressed SEC1 secp256k1 point.
const ECDSA_UNCOMPRESSED_LENGTH: usize = 65;

/// A public key of either algorithm.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(PublicKeyData);

#[derive(Clone, Copy, PartialEq, Eq)]
enum PublicKeyData {
    Ed25519(ed25519_dalek::VerifyingKey),
    EcdsaSecp256k1(k256::ecdsa::VerifyingKey),
}

impl PublicKey {
    pub(crate) fn from_ed25519(key: ed25519_dalek::VerifyingKey) -> Self {
        Self(PublicKeyData::Ed25519(key))
    }

    pub(crate) fn from_ecdsa(key: k256::ecdsa::VerifyingKey) -> Self {
        Self(PublicKeyData::EcdsaSecp256k1(key))
    }

    /// Which algorithm this key belongs to.
    pub fn algorithm(&self) -> KeyAlgorithm {
        match self.0 {
            PublicKeyData::Ed25519(_) => KeyAlgorithm::Ed25519,
            PublicKeyData::EcdsaSecp256k1(_) => KeyAlgorithm::EcdsaSecp256k1,
        }
    }

    pub fn is_ed25519(&self) -> bool {
        matches!(self.0, PublicKeyData::Ed25519(_))
    }

    pub fn is_ecdsa(&self) -> bool {
        matches!(self.0, PublicKeyData::EcdsaSecp256k1(_))
    }

    // -----------------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------------

    /// Decodes any supported form, sniffing the algorithm.
    ///
    /// Tries, in order: raw Ed25519 (32 bytes), raw secp256k1 (33 or 65
    /// bytes), DER, then the protobuf `Key` message.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            ED25519_KEY_LENGTH => return Self::from_bytes_ed25519(bytes),
            ECDSA_PUBLIC_KEY_LENGTH | ECDSA_UNCOMPRESSED_LENGTH => {
                return Self::from_bytes_ecdsa(bytes)
            }
            _ => {}
        }

        Self::from_bytes_der(bytes)
            .or_else(|_| Self::from_bytes_protobuf(bytes))
            .map_err(|_| {
                Error::key_parse(format!(
                    "{} bytes are not a raw, DER or protobuf public key",
                    bytes.len()
                ))
            })
    }

    /// Decodes an Ed25519 key from raw or DER bytes.
    pub fn from_bytes_ed25519(bytes: &[u8]) -> Result<Self> {
        let raw = strip_der_prefix(bytes, ED25519_PUBLIC_DER_PREFIX, ED25519_KEY_LENGTH);
        let Ok(raw) = <&[u8; ED25519_KEY_LENGTH]>::try_from(raw) else {
            return decode_ed25519_spki(bytes);
        };
        ed25519_dalek::VerifyingKey::from_bytes(raw)
            .map(Self::from_ed25519)
            .map_err(|_| Error::key_parse("not a valid Ed25519 point"))
    }

    /// Decodes a secp256k1 key from raw (compressed or uncompressed) or DER bytes.
    pub fn from_bytes_ecdsa(bytes: &[u8]) -> Result<Self> {
        let raw = strip_der_prefix(bytes, ECDSA_PUBLIC_DER_PREFIX, ECDSA_PUBLIC_KEY_LENGTH);
        k256::ecdsa::VerifyingKey::from_sec1_bytes(raw)
            .map(Self::from_ecdsa)
            .or_else(|_| decode_ecdsa_spki(bytes))
    }

    /// Decodes a DER SubjectPublicKeyInfo of either algorithm.
    ///
    /// The ledger's own short encodings are matched by prefix; anything else
    /// goes through a full SPKI parse, which also covers uncompressed
    /// secp256k1 points under `id-ecPublicKey`.
    pub fn from_bytes_der(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(ED25519_PUBLIC_DER_PREFIX) {
            Self::from_bytes_ed25519(bytes)
        } else if bytes.starts_with(ECDSA_PUBLIC_DER_PREFIX) {
            Self::from_bytes_ecdsa(bytes)
        } else {
            decode_ed25519_spki(bytes)
                .or_else(|_| decode_ecdsa_spki(bytes))
                .map_err(|_| Error::key_parse("not a DER public key of a supported algorithm"))
        }
    }

    /// Decodes a protobuf `Key` message holding a single Ed25519 or ECDSA key.
    pub fn from_bytes_protobuf(bytes: &[u8]) -> Result<Self> {
        let fields = protobuf::decode_fields(bytes)?;
        let (field, value) = fields
            .last()
            .ok_or_else(|| Error::from_protobuf("empty Key message"))?;

        match (*field, *value) {
            (KEY_FIELD_ED25519, FieldValue::Bytes(raw)) => Self::from_bytes_ed25519(raw),
            (KEY_FIELD_ECDSA_SECP256K1, FieldValue::Bytes(raw)) => Self::from_bytes_ecdsa(raw),
            (field, _) => Err(Error::from_protobuf(format!(
                "Key field {field} is not a single Ed25519 or ECDSA key"
            ))),
        }
    }

    /// Parses DER hex of either algorithm.
    pub fn from_str_der(s: &str) -> Result<Self> {
        Self::from_bytes_der(&decode_hex(s)?)
    }

    /// Parses raw or DER hex as Ed25519.
    pub fn from_str_ed25519(s: &str) -> Result<Self> {
        Self::from_bytes_ed25519(&decode_hex(s)?)
    }

    /// Parses raw or DER hex as secp256k1.
    pub fn from_str_ecdsa(s: &str) -> Result<Self> {
        Self::from_bytes_ecdsa(&decode_hex(s)?)
    }

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    /// Raw point bytes: 32 for Ed25519, 33 (compressed) for secp256k1.
    pub fn to_bytes_raw(&self) -> Vec<u8> {
        match &self.0 {
            PublicKeyData::Ed25519(key) => key.to_bytes().to_vec(),
            PublicKeyData::EcdsaSecp256k1(key) => key.to_encoded_point(true).as_bytes().to_vec(),
        }
    }

    /// DER SubjectPublicKeyInfo bytes.
    pub fn to_bytes_der(&self) -> Vec<u8> {
        let prefix = match self.0 {
            PublicKeyData::Ed25519(_) => ED25519_PUBLIC_DER_PREFIX,
            PublicKeyData::EcdsaSecp256k1(_) => ECDSA_PUBLIC_DER_PREFIX,
        };
        let mut out = prefix.to_vec();
        out.extend_from_slice(&self.to_bytes_raw());
        out
    }

    /// Protobuf `Key` message bytes.
    pub fn to_bytes_protobuf(&self) -> Vec<u8> {
        let field = match self.0 {
            PublicKeyData::Ed25519(_) => KEY_FIELD_ED25519,
            PublicKeyData::EcdsaSecp256k1(_) => KEY_FIELD_ECDSA_SECP256K1,
        };
        let mut out = Vec::new();
        protobuf::bytes_tag_encode(field, &self.to_bytes_raw(), &mut out);
        out
    }

    pub fn to_string_raw(&self) -> String {
        hex::encode(self.to_bytes_raw())
    }

    pub fn to_string_der(&self) -> String {
        hex::encode(self.to_bytes_der())
    }

    // -----------------------------------------------------------------------
    // Use
    // -----------------------------------------------------------------------

    /// Verifies `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        match &self.0 {
            PublicKeyData::Ed25519(key) => {
                let signature = ed25519_dalek::Signature::from_slice(signature)
                    .map_err(|_| Error::signature_verify("malformed Ed25519 signature"))?;
                key.verify(message, &signature)
                    .map_err(|_| Error::signature_verify("Ed25519 signature mismatch"))
            }
            PublicKeyData::EcdsaSecp256k1(key) => {
                let signature = k256::ecdsa::Signature::from_slice(signature)
                    .map_err(|_| Error::signature_verify("malformed ECDSA signature"))?;
                key.verify_prehash(&keccak256(message), &signature)
                    .map_err(|_| Error::signature_verify("ECDSA signature mismatch"))
            }
        }
    }

    /// EVM address of a secp256k1 key: the last 20 bytes of Keccak-256 over
    /// the uncompressed point without its `0x04` tag.
    ///
    /// `None` for Ed25519 keys, which have no EVM address.
    pub fn to_evm_address(&self) -> Option<EvmAddress> {
        let PublicKeyData::EcdsaSecp256k1(key) = &self.0 else {
            return None;
        };
        let point = key.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Some(EvmAddress::new(address))
    }
}

fn decode_ed25519_spki(der: &[u8]) -> Result<PublicKey> {
    use ed25519_dalek::pkcs8::DecodePublicKey;

    ed25519_dalek::VerifyingKey::from_public_key_der(der)
        .map(PublicKey::from_ed25519)
        .map_err(|e| Error::key_parse(format!("not an Ed25519 public key: {e}")))
}

fn decode_ecdsa_spki(der: &[u8]) -> Result<PublicKey> {
    use k256::pkcs8::DecodePublicKey;

    k256::ecdsa::VerifyingKey::from_public_key_der(der)
        .map(PublicKey::from_ecdsa)
        .map_err(|e| Error::key_parse(format!("not a secp256k1 public key: {e}")))
}

/// Drops `prefix` only when exactly `len` key bytes follow it.
pub(crate) fn strip_der_prefix<'a>(bytes: &'a [u8], prefix: &[u8], len: usize) -> &'a [u8] {
    match bytes.strip_prefix(prefix) {
        Some(rest) if rest.len() == len => rest,
        _ => bytes,
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.algorithm().hash(state);
        self.to_bytes_raw().hash(state);
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    /// Parses hex of any form [`from_bytes`](Self::from_bytes) accepts.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(s)?)
    }
}

/// DER hex.
impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_der())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}, {})", self.algorithm(), self.to_string_raw())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string_der())
        } else {
            serializer.serialize_bytes(&self.to_bytes_der())
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_str_der(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_bytes_der(&bytes).map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;

    #[test]
    fn der_lengths() {
        let ed = PrivateKey::generate_ed25519().public_key();
        let ec = PrivateKey::generate_ecdsa().public_key();
        assert_eq!(ed.to_bytes_der().len(), 44);
        assert_eq!(ec.to_bytes_der().len(), 56);
        assert_eq!(ed.to_string_der().len(), 88);
    }

    #[test]
    fn every_form_decodes_to_the_same_key() {
        for key in [
            PrivateKey::generate_ed25519().public_key(),
            PrivateKey::generate_ecdsa().public_key(),
        ] {
            assert_eq!(PublicKey::from_bytes(&key.to_bytes_raw()).unwrap(), key);
            assert_eq!(PublicKey::from_bytes(&key.to_bytes_der()).unwrap(), key);
            assert_eq!(PublicKey::from_bytes(&key.to_bytes_protobuf()).unwrap(), key);
            assert_eq!(key.to_string().parse::<PublicKey>().unwrap(), key);
            assert_eq!(format!("0x{}", key.to_string_raw()).parse::<PublicKey>().unwrap(), key);
        }
    }

    #[test]
    fn uncompressed_secp256k1_spki() {
        let private = PrivateKey::generate_ecdsa();
        let signing = k256::ecdsa::SigningKey::from_slice(&private.to_bytes_raw()).unwrap();
        let point = signing.verifying_key().to_encoded_point(false);

        // SEQUENCE { SEQUENCE { id-ecPublicKey, secp256k1 }, BIT STRING 04 || x || y }
        let mut der = hex::decode("3056301006072a8648ce3d020106052b8104000a034200").unwrap();
        der.extend_from_slice(point.as_bytes());
        assert_eq!(der.len(), 88);

        let expected = private.public_key();
        assert_eq!(PublicKey::from_bytes_der(&der).unwrap(), expected);
        assert_eq!(PublicKey::from_bytes_ecdsa(&der).unwrap(), expected);
        assert_eq!(PublicKey::from_bytes(&der).unwrap(), expected);
        assert!(PublicKey::from_bytes_ed25519(&der).is_err());
    }

    #[test]
    fn protobuf_field_numbers() {
        let ed = PrivateKey::generate_ed25519().public_key().to_bytes_protobuf();
        assert_eq!(&ed[..2], &[0x12, 0x20]);

        let ec = PrivateKey::generate_ecdsa().public_key().to_bytes_protobuf();
        assert_eq!(&ec[..2], &[0x3a, 0x21]);
    }

    #[test]
    fn garbage_is_rejected_not_defaulted() {
        assert!(matches!(PublicKey::from_bytes(&[0u8; 7]), Err(Error::KeyParse(_))));
        assert!(PublicKey::from_bytes_protobuf(&[]).is_err());
        // Field 1 (`contractID` in the full schema) is not a single key.
        assert!(PublicKey::from_bytes_protobuf(&[0x0a, 0x00]).is_err());
    }

    #[test]
    fn evm_address_known_vectors() {
        let one = PrivateKey::from_str_ecdsa(
            "0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert_eq!(
            one.public_key().to_evm_address().unwrap().to_string(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );

        let hardhat = PrivateKey::from_str_ecdsa(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        assert_eq!(
            hardhat.public_key().to_evm_address().unwrap().to_string(),
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn ed25519_has_no_evm_address() {
        assert!(PrivateKey::generate_ed25519().public_key().to_evm_address().is_none());
    }

    #[test]
    fn verify_rejects_tampering() {
        for key in [PrivateKey::generate_ed25519(), PrivateKey::generate_ecdsa()] {
            let sig = key.sign(b"transfer 10 to 0.0.1001").unwrap();
            let public = key.public_key();
            assert!(public.verify(b"transfer 10 to 0.0.1001", &sig).is_ok());
            assert!(public.verify(b"transfer 99 to 0.0.1001", &sig).is_err());
            assert!(public.verify(b"transfer 10 to 0.0.1001", &sig[..63]).is_err());
        }
    }

    #[test]
    fn serde_forms() {
        let key = PrivateKey::generate_ecdsa().public_key();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{}\"", key.to_string_der()));
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), key);

        let bin = bincode::serialize(&key).unwrap();
        assert_eq!(bincode::deserialize::<PublicKey>(&bin).unwrap(), key);
    }
}
