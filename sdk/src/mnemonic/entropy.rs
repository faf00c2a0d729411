//! # Entropy Codec
//!
//! Converts between word indices and the entropy they carry, for both
//! mnemonic formats.
//!
//! ## Standard (BIP-39)
//!
//! Entropy plus one checksum byte is read as a single big-endian bitstream
//! and cut into 11-bit groups. The checksum is the first byte of
//! SHA-256(entropy), of which only `entropy_bits / 32` bits survive: the top
//! four for 16-byte entropy, all eight for 32-byte entropy.
//!
//! ## Legacy
//!
//! 32 bytes of entropy are followed by a CRC-8, and every entropy byte is
//! XORed with that CRC. The CRC covers the first 31 entropy bytes only.
//! The resulting 33 bytes are one 264-bit number, rewritten in radix 4096
//! as exactly 22 digits. Unpacking runs the same
//! steps backwards and re-checks the CRC.
//!
//! The radix conversion goes through a big integer. Unpacking keeps signed
//! semantics on purpose: a word missing from the list becomes digit `-1`,
//! which still produces 33 bytes (just wrong ones) and fails the CRC.

use ibig::{IBig, UBig};
use zeroize::Zeroizing;

use crate::config::{
    BIP39_BITS_PER_WORD, LEGACY_CRC8_POLY, LEGACY_ENTROPY_LENGTH, LEGACY_MNEMONIC_WORDS,
};
use crate::crypto::hash::sha256;
use crate::error::MnemonicEntropyError;

/// Radix of a legacy word digit.
const LEGACY_RADIX: u16 = 4096;

/// Number of leading entropy bytes the legacy CRC covers.
const LEGACY_CRC_SPAN: usize = LEGACY_ENTROPY_LENGTH - 1;

/// A checksum recomputed from entropy that disagrees with the one carried by the words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChecksumMismatch {
    pub expected: u8,
    pub actual: u8,
}

// ---------------------------------------------------------------------------
// Standard
// ---------------------------------------------------------------------------

/// BIP-39 checksum byte: the first byte of SHA-256 over the entropy.
pub(crate) fn bip39_checksum(entropy: &[u8]) -> u8 {
    sha256(entropy)[0]
}

/// Mask selecting the checksum bits that a phrase of this entropy length keeps.
fn checksum_mask(entropy_len: usize) -> u8 {
    let checksum_bits = entropy_len * 8 / 32;
    (0xff00u16 >> checksum_bits) as u8
}

/// Splits entropy (16 or 32 bytes) plus its checksum into 11-bit word indices.
pub(crate) fn pack_standard(entropy: &[u8]) -> Vec<u16> {
    let mut buf = Zeroizing::new(entropy.to_vec());
    buf.push(bip39_checksum(entropy) & checksum_mask(entropy.len()));

    let word_count = (entropy.len() * 8 + entropy.len() / 4) / BIP39_BITS_PER_WORD;
    (0..word_count)
        .map(|i| read_bits(&buf, i * BIP39_BITS_PER_WORD, BIP39_BITS_PER_WORD))
        .collect()
}

/// Joins 12 or 24 word indices back into entropy, verifying the checksum.
pub(crate) fn unpack_standard(indices: &[u16]) -> Result<Zeroizing<Vec<u8>>, ChecksumMismatch> {
    let total_bits = indices.len() * BIP39_BITS_PER_WORD;
    let mut buf = Zeroizing::new(vec![0u8; total_bits.div_ceil(8)]);
    for (i, &index) in indices.iter().enumerate() {
        write_bits(&mut buf, i * BIP39_BITS_PER_WORD, BIP39_BITS_PER_WORD, index);
    }

    let entropy_len = indices.len() * 4 / 3;
    let mask = checksum_mask(entropy_len);
    let actual = buf[entropy_len] & mask;
    let entropy = Zeroizing::new(buf[..entropy_len].to_vec());
    let expected = bip39_checksum(&entropy) & mask;

    if expected != actual {
        return Err(ChecksumMismatch { expected, actual });
    }
    Ok(entropy)
}

/// Reads `width` bits starting at bit `offset` (MSB first) as an integer.
fn read_bits(buf: &[u8], offset: usize, width: usize) -> u16 {
    (offset..offset + width).fold(0u16, |acc, bit| {
        let set = buf[bit / 8] >> (7 - bit % 8) & 1;
        (acc << 1) | u16::from(set)
    })
}

/// Writes the low `width` bits of `value` at bit `offset` (MSB first). `buf` must start zeroed.
fn write_bits(buf: &mut [u8], offset: usize, width: usize, value: u16) {
    for i in 0..width {
        if value >> (width - 1 - i) & 1 == 1 {
            let bit = offset + i;
            buf[bit / 8] |= 0x80 >> (bit % 8);
        }
    }
}

// ---------------------------------------------------------------------------
// Legacy
// ---------------------------------------------------------------------------

/// Reflected CRC-8 used by legacy mnemonics: init `0xFF`, final XOR `0xFF`.
pub(crate) fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xff;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = (crc >> 1) ^ if crc & 1 == 0 { 0 } else { LEGACY_CRC8_POLY };
        }
    }
    crc ^ 0xff
}

/// Encodes 32 bytes of entropy as 22 legacy word digits.
pub(crate) fn pack_legacy(entropy: &[u8; LEGACY_ENTROPY_LENGTH]) -> [u16; LEGACY_MNEMONIC_WORDS] {
    let crc = crc8(&entropy[..LEGACY_CRC_SPAN]);
    let mut buf = Zeroizing::new([0u8; LEGACY_ENTROPY_LENGTH + 1]);
    for (dst, src) in buf.iter_mut().zip(entropy) {
        *dst = src ^ crc;
    }
    buf[LEGACY_ENTROPY_LENGTH] = crc;

    let mut n = UBig::from_be_bytes(&buf[..]);
    let mut digits = [0u16; LEGACY_MNEMONIC_WORDS];
    for digit in digits.iter_mut().rev() {
        *digit = &n % LEGACY_RADIX;
        n /= LEGACY_RADIX;
    }
    digits
}

/// Decodes 22 legacy word digits (`-1` for unknown words) into 32 bytes of entropy.
pub(crate) fn unpack_legacy(
    digits: &[i32],
) -> Result<Zeroizing<[u8; LEGACY_ENTROPY_LENGTH]>, MnemonicEntropyError> {
    if digits.len() != LEGACY_MNEMONIC_WORDS {
        return Err(MnemonicEntropyError::BadLength {
            expected: LEGACY_MNEMONIC_WORDS,
            actual: digits.len(),
        });
    }

    let mut n = IBig::from(0u8);
    for &digit in digits {
        n = n * i32::from(LEGACY_RADIX) + digit;
    }

    let mut buf = Zeroizing::new([0u8; LEGACY_ENTROPY_LENGTH + 1]);
    for byte in buf.iter_mut().rev() {
        // Truncating remainder: negative input yields a negative remainder,
        // which wraps into a byte the same way a typed-array store would.
        *byte = (&n % 256i16) as u8;
        n /= 256i16;
    }

    let crc = buf[LEGACY_ENTROPY_LENGTH];
    let mut entropy = Zeroizing::new([0u8; LEGACY_ENTROPY_LENGTH]);
    for (dst, src) in entropy.iter_mut().zip(buf.iter()) {
        *dst = src ^ crc;
    }

    let expected = crc8(&entropy[..LEGACY_CRC_SPAN]);
    if expected != crc {
        return Err(MnemonicEntropyError::ChecksumMismatch {
            expected,
            actual: crc,
        });
    }
    Ok(entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn zero_entropy_packs_to_abandon_art() {
        let indices = pack_standard(&[0u8; 32]);
        assert_eq!(indices.len(), 24);
        assert!(indices[..23].iter().all(|&i| i == 0));
        // "art" is index 102 in the English list.
        assert_eq!(indices[23], 102);

        let indices = pack_standard(&[0u8; 16]);
        assert_eq!(indices.len(), 12);
        // "about" = 3: seven zero bits then the 4-bit checksum 0b0011.
        assert_eq!(indices[11], 3);
    }

    #[test]
    fn checksum_mask_widths() {
        assert_eq!(checksum_mask(16), 0xf0);
        assert_eq!(checksum_mask(32), 0xff);
    }

    #[test]
    fn standard_pack_unpack_recovers_entropy() {
        let mut rng = rand::thread_rng();
        for len in [16usize, 32] {
            for _ in 0..64 {
                let mut entropy = vec![0u8; len];
                rng.fill_bytes(&mut entropy);
                let indices = pack_standard(&entropy);
                assert_eq!(unpack_standard(&indices).unwrap().as_slice(), &entropy[..]);
            }
        }
    }

    #[test]
    fn standard_unpack_reports_both_checksums() {
        let mut indices = pack_standard(&[0u8; 32]);
        indices[23] = 103;
        let err = unpack_standard(&indices).unwrap_err();
        assert_eq!(err.expected, 0x66);
        assert_eq!(err.actual, 0x67);
    }

    #[test]
    fn crc8_known_values() {
        // Reflected CRC-8 with this polynomial and init/xorout 0xFF.
        assert_eq!(crc8(&[]), 0x00);
        assert_ne!(crc8(&[0u8; 32]), crc8(&[1u8; 32]));
    }

    #[test]
    fn legacy_pack_unpack_is_identity() {
        let mut rng = rand::thread_rng();
        for _ in 0..256 {
            let mut entropy = [0u8; LEGACY_ENTROPY_LENGTH];
            rng.fill_bytes(&mut entropy);

            let digits = pack_legacy(&entropy);
            assert!(digits.iter().all(|&d| u32::from(d) < u32::from(LEGACY_RADIX)));

            let signed: Vec<i32> = digits.iter().map(|&d| i32::from(d)).collect();
            assert_eq!(*unpack_legacy(&signed).unwrap(), entropy);
        }
    }

    #[test]
    fn legacy_unknown_word_fails_crc() {
        let digits = pack_legacy(&[7u8; LEGACY_ENTROPY_LENGTH]);
        let mut signed: Vec<i32> = digits.iter().map(|&d| i32::from(d)).collect();
        signed[5] = -1;
        assert!(matches!(
            unpack_legacy(&signed),
            Err(MnemonicEntropyError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn legacy_crc_ignores_last_entropy_byte() {
        let mut entropy = [0x33u8; LEGACY_ENTROPY_LENGTH];
        let before = pack_legacy(&entropy);
        entropy[LEGACY_ENTROPY_LENGTH - 1] ^= 0xff;
        let after = pack_legacy(&entropy);

        // Same CRC, so only the digits holding the last byte move.
        assert_eq!(before[..20], after[..20]);
        assert_ne!(before, after);
    }

    #[test]
    fn legacy_wrong_digit_count() {
        assert_eq!(
            unpack_legacy(&[0; 21]).unwrap_err(),
            MnemonicEntropyError::BadLength {
                expected: 22,
                actual: 21
            }
        );
    }
}
