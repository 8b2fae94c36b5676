// Protobuf variable-length integer encoding.
//
// Base-128, little-endian: least-significant group first, bit 7 set on
// every byte except the last. Signed values use either the plain two's
// complement 64-bit form (int32/int64 fields) or the zigzag mapping
// (sint64 fields), matching the proto2 scalar types of Osmformat.

use super::WireError;

/// Maximum encoded length of a 64-bit varint (ceil(64/7) = 10).
pub const MAX_VARINT_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Append a `u64` varint to `buf`.
#[inline]
pub fn write_u64(buf: &mut Vec<u8>, mut num: u64) {
    while num >= 0x80 {
        buf.push((num as u8 & 0x7F) | 0x80);
        num >>= 7;
    }
    buf.push(num as u8);
}

/// Append an `i64` varint in two's complement form (proto int32/int64:
/// negative values always take the full 10 bytes).
#[inline]
pub fn write_i64(buf: &mut Vec<u8>, num: i64) {
    write_u64(buf, num as u64);
}

// ---------------------------------------------------------------------------
// Decoding from byte slices
// ---------------------------------------------------------------------------

/// Decode a `u64` varint from the front of `data`.
/// Returns `(value, bytes_consumed)` or an error.
pub fn read_u64(data: &[u8]) -> Result<(u64, usize), WireError> {
    let mut val: u64 = 0;
    for (i, &byte) in data.iter().enumerate().take(MAX_VARINT_LEN) {
        // The tenth byte only has one usable bit left.
        if i == MAX_VARINT_LEN - 1 && byte & 0x7F > 0x01 {
            return Err(WireError::Overflow);
        }
        val |= u64::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((val, i + 1));
        }
    }
    if data.len() >= MAX_VARINT_LEN {
        Err(WireError::Overflow)
    } else {
        Err(WireError::Truncated)
    }
}

/// Decode an `i64` varint (two's complement form).
pub fn read_i64(data: &[u8]) -> Result<(i64, usize), WireError> {
    let (val, len) = read_u64(data)?;
    Ok((val as i64, len))
}

// ---------------------------------------------------------------------------
// ZigZag mapping (sint64 fields)
// ---------------------------------------------------------------------------

/// Map a signed value to the zigzag unsigned form: small magnitudes of
/// either sign encode short.
#[inline]
pub fn zigzag(num: i64) -> u64 {
    ((num << 1) ^ (num >> 63)) as u64
}

/// Inverse of [`zigzag`].
#[inline]
pub fn unzigzag(num: u64) -> i64 {
    ((num >> 1) as i64) ^ -((num & 1) as i64)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Encoded byte-length of a `u64` varint.
#[inline]
pub fn sizeof_u64(num: u64) -> usize {
    let bits = 64 - num.leading_zeros();
    bits.max(1).div_ceil(7) as usize
}
