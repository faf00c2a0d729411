//! # Entity Id Checksums
//!
//! The five-letter suffix in `0.0.123-vfmkw`. It is a function of the
//! `shard.realm.num` text and the ledger id, so the same id gets a different
//! checksum on each network, and pasting a testnet address into a mainnet
//! wallet fails loudly instead of paying a stranger.
//!
//! The algorithm is the network-wide standard every SDK implements (HIP-15):
//!
//! 1. Map the id text to digits, `.` becoming 10.
//! 2. Fold the digits into a weighted sum mod 26^3, and separately sum the
//!    digits at even and odd positions mod 11.
//! 3. Fold the ledger id bytes, followed by six zero bytes, into a weighted
//!    sum mod 26^5.
//! 4. Combine the sums and the text length mod 5, scramble with a prime
//!    multiplier, and write the result as five base-26 letters.

use std::fmt;
use std::str::FromStr;

use crate::config::CHECKSUM_LENGTH;
use crate::entity::LedgerId;
use crate::error::{EntityIdParseError, Error, Result};

const WEIGHT: u64 = 31;
const P3: u64 = 26 * 26 * 26;
const P5: u64 = 26 * 26 * 26 * 26 * 26;
const MULTIPLIER: u64 = 1_000_003;
const LEDGER_PADDING: usize = 6;

/// A five-letter entity id checksum.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; CHECKSUM_LENGTH]);

impl Checksum {
    /// Computes the checksum of `shard.realm.num` on `ledger`.
    pub fn compute(ledger: &LedgerId, shard: u64, realm: u64, num: u64) -> Self {
        let checksum = compute_for_text(ledger, &format!("{shard}.{realm}.{num}"));
        tracing::trace!(%ledger, shard, realm, num, %checksum, "computed entity id checksum");
        checksum
    }

    pub fn as_str(&self) -> &str {
        // Only ever built from ASCII lowercase letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

fn compute_for_text(ledger: &LedgerId, address: &str) -> Checksum {
    let digits = address.bytes().map(|b| match b {
        b'.' => 10,
        b => u64::from(b - b'0'),
    });

    let (mut s, mut s0, mut s1) = (0u64, 0u64, 0u64);
    for (i, d) in digits.enumerate() {
        s = (WEIGHT * s + d) % P3;
        if i % 2 == 0 {
            s0 = (s0 + d) % 11;
        } else {
            s1 = (s1 + d) % 11;
        }
    }

    let padding = [0u8; LEDGER_PADDING];
    let sh = ledger
        .as_bytes()
        .iter()
        .chain(padding.iter())
        .fold(0u64, |sh, &b| (WEIGHT * sh + u64::from(b)) % P5);

    let len = address.len() as u64;
    let mut c = ((((len % 5) * 11 + s0) * 11 + s1) * P3 + s + sh) % P5;
    c = (c * MULTIPLIER) % P5;

    let mut letters = [0u8; CHECKSUM_LENGTH];
    for letter in letters.iter_mut().rev() {
        *letter = b'a' + (c % 26) as u8;
        c /= 26;
    }
    Checksum(letters)
}

impl FromStr for Checksum {
    type Err = Error;

    /// Five lowercase ASCII letters.
    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; CHECKSUM_LENGTH] = s
            .as_bytes()
            .try_into()
            .map_err(|_| EntityIdParseError::BadChecksum(s.to_owned()))?;
        if !bytes.iter().all(u8::is_ascii_lowercase) {
            return Err(EntityIdParseError::BadChecksum(s.to_owned()).into());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({self})")
    }
}
