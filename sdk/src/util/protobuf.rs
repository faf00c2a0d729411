//! Just enough protobuf for the `Key`, `AccountID` and `ContractID` messages.
//!
//! Encoding follows proto3 rules: plain scalar fields equal to zero are
//! omitted, members of a `oneof` are always written. Decoding skips fields it
//! does not know, the same way generated code would.

use crate::error::{Error, Result};

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_DELIMITED: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// Longest valid LEB128 encoding of a `u64`.
const MAX_VARINT_LEN: usize = 10;

/// One decoded field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldValue<'a> {
    Varint(u64),
    Bytes(&'a [u8]),
}

/// Appends `value` as LEB128.
pub(crate) fn varint_encode(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn tag_encode(field: u64, wire_ty: u8, out: &mut Vec<u8>) {
    varint_encode((field << 3) | u64::from(wire_ty), out);
}

/// Writes a `uint64`/`int64` field. Zero is omitted unless `always` is set (oneof members).
pub(crate) fn uint64_tag_encode(field: u64, value: u64, always: bool, out: &mut Vec<u8>) {
    if value == 0 && !always {
        return;
    }
    tag_encode(field, WIRE_VARINT, out);
    varint_encode(value, out);
}

/// Writes a `bytes` field (always, since every caller is a oneof member).
pub(crate) fn bytes_tag_encode(field: u64, data: &[u8], out: &mut Vec<u8>) {
    tag_encode(field, WIRE_DELIMITED, out);
    varint_encode(data.len() as u64, out);
    out.extend_from_slice(data);
}

/// Reads one LEB128 value from the front of `bytes`, advancing it.
pub(crate) fn varint_decode(bytes: &mut &[u8]) -> Result<u64> {
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate().take(MAX_VARINT_LEN) {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            *bytes = &bytes[i + 1..];
            return Ok(value);
        }
    }
    Err(Error::from_protobuf("truncated or overlong varint"))
}

fn take<'a>(bytes: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if bytes.len() < len {
        return Err(Error::from_protobuf(format!(
            "field needs {len} bytes, {} remain",
            bytes.len()
        )));
    }
    let (head, tail) = bytes.split_at(len);
    *bytes = tail;
    Ok(head)
}

/// Splits a message into `(field number, value)` pairs, in wire order.
///
/// Fixed-width fields are skipped; no message in this crate uses them.
pub(crate) fn decode_fields(mut bytes: &[u8]) -> Result<Vec<(u64, FieldValue<'_>)>> {
    let mut fields = Vec::new();

    while !bytes.is_empty() {
        let tag = varint_decode(&mut bytes)?;
        let field = tag >> 3;
        let wire_ty = (tag & 0b111) as u8;

        match wire_ty {
            WIRE_VARINT => fields.push((field, FieldValue::Varint(varint_decode(&mut bytes)?))),
            WIRE_DELIMITED => {
                let len = usize::try_from(varint_decode(&mut bytes)?)
                    .map_err(|_| Error::from_protobuf("length does not fit in usize"))?;
                fields.push((field, FieldValue::Bytes(take(&mut bytes, len)?)));
            }
            WIRE_FIXED64 => {
                take(&mut bytes, 8)?;
            }
            WIRE_FIXED32 => {
                take(&mut bytes, 4)?;
            }
            other => {
                return Err(Error::from_protobuf(format!(
                    "unsupported wire type {other} for field {field}"
                )))
            }
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_boundaries() {
        for (value, expected) in [
            (0u64, vec![0x00]),
            (1, vec![0x01]),
            (127, vec![0x7f]),
            (128, vec![0x80, 0x01]),
            (300, vec![0xac, 0x02]),
        ] {
            let mut out = Vec::new();
            varint_encode(value, &mut out);
            assert_eq!(out, expected, "encoding {value}");

            let mut slice = out.as_slice();
            assert_eq!(varint_decode(&mut slice).unwrap(), value);
            assert!(slice.is_empty());
        }
    }

    #[test]
    fn max_u64_varint() {
        let mut out = Vec::new();
        varint_encode(u64::MAX, &mut out);
        assert_eq!(out.len(), MAX_VARINT_LEN);
        assert_eq!(varint_decode(&mut out.as_slice()).unwrap(), u64::MAX);
    }

    #[test]
    fn truncated_varint_rejected() {
        assert!(varint_decode(&mut [0x80u8, 0x80].as_slice()).is_err());
    }

    #[test]
    fn zero_scalar_omitted_unless_forced() {
        let mut out = Vec::new();
        uint64_tag_encode(1, 0, false, &mut out);
        assert!(out.is_empty());
        uint64_tag_encode(3, 0, true, &mut out);
        assert_eq!(out, vec![0x18, 0x00]);
    }

    #[test]
    fn decode_mixed_fields() {
        let mut msg = Vec::new();
        uint64_tag_encode(1, 5, false, &mut msg);
        bytes_tag_encode(4, &[0xaa, 0xbb], &mut msg);

        let fields = decode_fields(&msg).unwrap();
        assert_eq!(
            fields,
            vec![(1, FieldValue::Varint(5)), (4, FieldValue::Bytes(&[0xaa, 0xbb]))]
        );
    }

    #[test]
    fn short_delimited_field_rejected() {
        // Field 4, length 5, only 2 bytes follow.
        let msg = [0x22, 0x05, 0x01, 0x02];
        assert!(decode_fields(&msg).is_err());
    }

    #[test]
    fn group_wire_type_rejected() {
        assert!(decode_fields(&[0x0b]).is_err());
    }
}
