//! # Private Keys
//!
//! A private key of either algorithm, optionally carrying a chain code.
//!
//! Keys produced from a seed (and their descendants) hold a chain code and
//! can [`derive`](PrivateKey::derive) children. Keys parsed from bytes or
//! generated fresh cannot; they have no place in a tree.
//!
//! ## Security considerations
//!
//! - `PrivateKey` deliberately does NOT implement `Serialize`, `Deserialize`
//!   or `Display`. Exporting a secret should be a call you can grep for:
//!   [`to_bytes_raw`](PrivateKey::to_bytes_raw) or
//!   [`to_string_der`](PrivateKey::to_string_der).
//! - `Debug` shows the algorithm and the public key, never the secret.
//! - Secret scalars are wiped on drop by the underlying key types; chain
//!   codes and intermediate buffers by [`Zeroizing`].

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::Signer;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use rand::rngs::OsRng;
use tracing::trace;
use zeroize::Zeroizing;

use crate::config::{
    CHAIN_CODE_LENGTH, ECDSA_PRIVATE_DER_PREFIX, ECDSA_PRIVATE_KEY_LENGTH,
    ED25519_KEY_LENGTH, ED25519_PRIVATE_DER_PREFIX,
};
use crate::crypto::derivation::{self, ExtendedKey};
use crate::crypto::hash::keccak256;
use crate::crypto::public_key::strip_der_prefix;
use crate::crypto::{decode_hex, KeyAlgorithm, PublicKey};
use crate::entity::EvmAddress;
use crate::error::{Error, Result};

/// Seed followed by public key, as some wallets export Ed25519 keys.
const ED25519_KEYPAIR_LENGTH: usize = 64;

/// A private key of either algorithm.
#[derive(Clone)]
pub struct PrivateKey {
    data: PrivateKeyData,
    chain_code: Option<Zeroizing<[u8; CHAIN_CODE_LENGTH]>>,
}

#[derive(Clone)]
enum PrivateKeyData {
    Ed25519(ed25519_dalek::SigningKey),
    EcdsaSecp256k1(k256::ecdsa::SigningKey),
}

impl PrivateKey {
    fn new(data: PrivateKeyData) -> Self {
        Self {
            data,
            chain_code: None,
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Generates a fresh Ed25519 key from the OS RNG.
    pub fn generate_ed25519() -> Self {
        Self::new(PrivateKeyData::Ed25519(ed25519_dalek::SigningKey::generate(
            &mut OsRng,
        )))
    }

    /// Generates a fresh secp256k1 key from the OS RNG.
    pub fn generate_ecdsa() -> Self {
        Self::new(PrivateKeyData::EcdsaSecp256k1(
            k256::ecdsa::SigningKey::random(&mut OsRng),
        ))
    }

    /// Generates a fresh key of the given algorithm.
    pub fn generate(algorithm: KeyAlgorithm) -> Self {
        match algorithm {
            KeyAlgorithm::Ed25519 => Self::generate_ed25519(),
            KeyAlgorithm::EcdsaSecp256k1 => Self::generate_ecdsa(),
        }
    }

    /// SLIP-0010 Ed25519 master key for a BIP-39 seed. Derivable.
    pub fn from_seed_ed25519(seed: &[u8]) -> Result<Self> {
        Self::from_extended_ed25519(derivation::ed25519_master(seed)?)
    }

    /// BIP-32 secp256k1 master key for a BIP-39 seed. Derivable.
    pub fn from_seed_ecdsa(seed: &[u8]) -> Result<Self> {
        Self::from_extended_ecdsa(derivation::secp256k1_master(seed)?)
    }

    fn from_extended_ed25519(extended: ExtendedKey) -> Result<Self> {
        let mut key = Self::from_raw_ed25519(&extended.key[..])?;
        key.chain_code = Some(extended.chain_code);
        Ok(key)
    }

    fn from_extended_ecdsa(extended: ExtendedKey) -> Result<Self> {
        let mut key = Self::from_raw_ecdsa(&extended.key[..])?;
        key.chain_code = Some(extended.chain_code);
        Ok(key)
    }

    fn from_raw_ed25519(raw: &[u8]) -> Result<Self> {
        let raw: &[u8; ED25519_KEY_LENGTH] = raw.try_into().map_err(|_| {
            Error::key_parse(format!(
                "expected a 32-byte Ed25519 private key, got {} bytes",
                raw.len()
            ))
        })?;
        Ok(Self::new(PrivateKeyData::Ed25519(
            ed25519_dalek::SigningKey::from_bytes(raw),
        )))
    }

    fn from_raw_ecdsa(raw: &[u8]) -> Result<Self> {
        if raw.len() != ECDSA_PRIVATE_KEY_LENGTH {
            return Err(Error::key_parse(format!(
                "expected a 32-byte secp256k1 private key, got {} bytes",
                raw.len()
            )));
        }
        k256::ecdsa::SigningKey::from_slice(raw)
            .map(|key| Self::new(PrivateKeyData::EcdsaSecp256k1(key)))
            .map_err(|_| Error::key_parse("not a valid secp256k1 scalar"))
    }

    /// Decodes DER, or treats 32 or 64 raw bytes as Ed25519.
    ///
    /// 64 bytes are tried as DER first: a minimal secp256k1 PKCS#8 document
    /// has that length too.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() == ED25519_KEY_LENGTH {
            return Self::from_raw_ed25519(bytes);
        }
        Self::from_bytes_der(bytes)
            .or_else(|err| match bytes.len() {
                ED25519_KEYPAIR_LENGTH => Self::from_bytes_ed25519(bytes),
                _ => Err(err),
            })
            .map_err(|_| {
                Error::key_parse(format!(
                    "{} bytes are neither a DER private key nor a raw Ed25519 key",
                    bytes.len()
                ))
            })
    }

    /// Decodes an Ed25519 key from 32 raw bytes, 64 bytes (seed followed by
    /// public key), or PKCS#8 DER.
    pub fn from_bytes_ed25519(bytes: &[u8]) -> Result<Self> {
        let raw = match bytes.len() {
            ED25519_KEYPAIR_LENGTH => &bytes[..ED25519_KEY_LENGTH],
            _ => strip_der_prefix(bytes, ED25519_PRIVATE_DER_PREFIX, ED25519_KEY_LENGTH),
        };
        if raw.len() == ED25519_KEY_LENGTH {
            return Self::from_raw_ed25519(raw);
        }
        decode_ed25519_pkcs8(bytes)
    }

    /// Decodes a secp256k1 key from 32 raw bytes, PKCS#8 DER, or a SEC1
    /// `ECPrivateKey`.
    pub fn from_bytes_ecdsa(bytes: &[u8]) -> Result<Self> {
        let raw = strip_der_prefix(bytes, ECDSA_PRIVATE_DER_PREFIX, ECDSA_PRIVATE_KEY_LENGTH);
        if raw.len() == ECDSA_PRIVATE_KEY_LENGTH {
            return Self::from_raw_ecdsa(raw);
        }
        decode_ecdsa_der(bytes)
    }

    /// Decodes a DER private key of either algorithm.
    ///
    /// The ledger's own encodings are matched by prefix. Anything else is
    /// tried as Ed25519 PKCS#8, then secp256k1 PKCS#8 or SEC1.
    pub fn from_bytes_der(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(ED25519_PRIVATE_DER_PREFIX) {
            Self::from_bytes_ed25519(bytes)
        } else if bytes.starts_with(ECDSA_PRIVATE_DER_PREFIX) {
            Self::from_bytes_ecdsa(bytes)
        } else {
            decode_ed25519_pkcs8(bytes)
                .or_else(|_| decode_ecdsa_der(bytes))
                .map_err(|_| Error::key_parse("not a DER private key of a supported algorithm"))
        }
    }

    pub fn from_str_der(s: &str) -> Result<Self> {
        Self::from_bytes_der(&Zeroizing::new(decode_hex(s)?))
    }

    pub fn from_str_ed25519(s: &str) -> Result<Self> {
        Self::from_bytes_ed25519(&Zeroizing::new(decode_hex(s)?))
    }

    pub fn from_str_ecdsa(s: &str) -> Result<Self> {
        Self::from_bytes_ecdsa(&Zeroizing::new(decode_hex(s)?))
    }

    // -----------------------------------------------------------------------
    // Accessors and encoding
    // -----------------------------------------------------------------------

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self.data {
            PrivateKeyData::Ed25519(_) => KeyAlgorithm::Ed25519,
            PrivateKeyData::EcdsaSecp256k1(_) => KeyAlgorithm::EcdsaSecp256k1,
        }
    }

    pub fn is_ed25519(&self) -> bool {
        self.algorithm() == KeyAlgorithm::Ed25519
    }

    pub fn is_ecdsa(&self) -> bool {
        self.algorithm() == KeyAlgorithm::EcdsaSecp256k1
    }

    /// Whether this key carries a chain code and can [`derive`](Self::derive).
    pub fn is_derivable(&self) -> bool {
        self.chain_code.is_some()
    }

    /// The chain code, for keys that have one.
    pub fn chain_code(&self) -> Option<&[u8; CHAIN_CODE_LENGTH]> {
        self.chain_code.as_deref()
    }

    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        match &self.data {
            PrivateKeyData::Ed25519(key) => PublicKey::from_ed25519(key.verifying_key()),
            PrivateKeyData::EcdsaSecp256k1(key) => PublicKey::from_ecdsa(*key.verifying_key()),
        }
    }

    /// EVM address of the public key. `None` for Ed25519.
    pub fn to_evm_address(&self) -> Option<EvmAddress> {
        self.public_key().to_evm_address()
    }

    fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        match &self.data {
            PrivateKeyData::Ed25519(key) => Zeroizing::new(key.to_bytes()),
            PrivateKeyData::EcdsaSecp256k1(key) => Zeroizing::new(key.to_bytes().into()),
        }
    }

    /// The raw 32-byte secret.
    ///
    /// **Handle with care.** Whoever holds these bytes controls every account
    /// keyed by this key.
    pub fn to_bytes_raw(&self) -> Vec<u8> {
        self.secret_bytes().to_vec()
    }

    /// DER (PKCS#8) encoding of the secret.
    pub fn to_bytes_der(&self) -> Vec<u8> {
        let prefix = match self.data {
            PrivateKeyData::Ed25519(_) => ED25519_PRIVATE_DER_PREFIX,
            PrivateKeyData::EcdsaSecp256k1(_) => ECDSA_PRIVATE_DER_PREFIX,
        };
        let mut out = prefix.to_vec();
        out.extend_from_slice(&self.secret_bytes()[..]);
        out
    }

    pub fn to_string_raw(&self) -> String {
        hex::encode(self.secret_bytes())
    }

    pub fn to_string_der(&self) -> String {
        hex::encode(self.to_bytes_der())
    }

    // -----------------------------------------------------------------------
    // Signing
    // -----------------------------------------------------------------------

    /// Signs `message`.
    ///
    /// Ed25519 signs the message itself. ECDSA signs its Keccak-256 digest
    /// and returns the 64-byte `r || s` form with a low `s`.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        match &self.data {
            PrivateKeyData::Ed25519(key) => Ok(key.sign(message).to_bytes().to_vec()),
            PrivateKeyData::EcdsaSecp256k1(key) => {
                let signature: k256::ecdsa::Signature = key
                    .sign_prehash(&keccak256(message))
                    .map_err(|e| Error::sign(e.to_string()))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Derivation
    // -----------------------------------------------------------------------

    /// Derives the child at `index`.
    ///
    /// Ed25519 children are always hardened. secp256k1 children are hardened
    /// only if `index` has its top bit set (see [`harden`](crate::crypto::harden)).
    /// Fails for keys without a chain code.
    pub fn derive(&self, index: u32) -> Result<Self> {
        let chain_code = self
            .chain_code
            .as_ref()
            .ok_or_else(|| Error::key_derive("key has no chain code"))?;
        let parent = ExtendedKey {
            key: self.secret_bytes(),
            chain_code: chain_code.clone(),
        };

        let child = match self.data {
            PrivateKeyData::Ed25519(_) => {
                Self::from_extended_ed25519(derivation::ed25519_child(&parent, index)?)
            }
            PrivateKeyData::EcdsaSecp256k1(_) => {
                Self::from_extended_ecdsa(derivation::secp256k1_child(&parent, index)?)
            }
        }?;

        trace!(
            algorithm = %self.algorithm(),
            hardened = derivation::is_hardened(index) || self.is_ed25519(),
            "derived child key"
        );
        Ok(child)
    }

    /// Derives each component of `path` in turn.
    pub fn derive_path(&self, path: &[u32]) -> Result<Self> {
        path.iter()
            .try_fold(self.clone(), |key, &index| key.derive(index))
    }

    /// Legacy child derivation, for keys recovered from legacy mnemonics.
    ///
    /// Ed25519 only. Works on any Ed25519 key, chain code or not; the child
    /// has none.
    pub fn legacy_derive(&self, index: i64) -> Result<Self> {
        let PrivateKeyData::Ed25519(key) = &self.data else {
            return Err(Error::key_derive(
                "legacy derivation is only defined for Ed25519 keys",
            ));
        };
        let child = derivation::legacy_child(&key.to_bytes(), index)?;
        trace!(index, "derived legacy child key");
        Self::from_raw_ed25519(&child[..])
    }
}

fn decode_ed25519_pkcs8(der: &[u8]) -> Result<PrivateKey> {
    use ed25519_dalek::pkcs8::DecodePrivateKey;

    ed25519_dalek::SigningKey::from_pkcs8_der(der)
        .map(|key| PrivateKey::new(PrivateKeyData::Ed25519(key)))
        .map_err(|e| Error::key_parse(format!("not an Ed25519 private key: {e}")))
}

fn decode_ecdsa_der(der: &[u8]) -> Result<PrivateKey> {
    use k256::pkcs8::DecodePrivateKey;

    let key = match k256::ecdsa::SigningKey::from_pkcs8_der(der) {
        Ok(key) => key,
        Err(_) => k256::SecretKey::from_sec1_der(der)
            .map(k256::ecdsa::SigningKey::from)
            .map_err(|_| Error::key_parse("not a secp256k1 PKCS#8 or SEC1 private key"))?,
    };
    Ok(PrivateKey::new(PrivateKeyData::EcdsaSecp256k1(key)))
}

impl FromStr for PrivateKey {
    type Err = Error;

    /// Parses hex of any form [`from_bytes`](Self::from_bytes) accepts.
    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&Zeroizing::new(decode_hex(s)?))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &self.algorithm())
            .field("public_key", &self.public_key().to_string_raw())
            .field("derivable", &self.is_derivable())
            .finish()
    }
}
