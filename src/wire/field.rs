// Field-level wire primitives: tags, length-delimited payloads, packed
// repeated scalars, and the cursor used to walk a record.
//
// Wire types 3/4 (groups) predate the format and are rejected outright.

use super::WireError;
use super::varint;

pub const WIRE_VARINT: u32 = 0;
pub const WIRE_FIXED64: u32 = 1;
pub const WIRE_LEN: u32 = 2;
pub const WIRE_FIXED32: u32 = 5;

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

/// Append a field tag: `(field_number << 3) | wire_type`.
#[inline]
pub fn write_tag(buf: &mut Vec<u8>, field: u32, wire: u32) {
    varint::write_u64(buf, (u64::from(field) << 3) | u64::from(wire));
}

/// Append a varint field holding an int64 (two's complement; int32 fields
/// are sign-extended to this form per proto2).
pub fn write_int64(buf: &mut Vec<u8>, field: u32, value: i64) {
    write_tag(buf, field, WIRE_VARINT);
    varint::write_i64(buf, value);
}

/// Append a varint field holding a uint32.
pub fn write_uint32(buf: &mut Vec<u8>, field: u32, value: u32) {
    write_tag(buf, field, WIRE_VARINT);
    varint::write_u64(buf, u64::from(value));
}

/// Append a varint field holding a bool.
pub fn write_bool(buf: &mut Vec<u8>, field: u32, value: bool) {
    write_tag(buf, field, WIRE_VARINT);
    varint::write_u64(buf, u64::from(value));
}

/// Append a length-delimited field from raw payload bytes (submessages).
pub fn write_bytes(buf: &mut Vec<u8>, field: u32, payload: &[u8]) {
    write_tag(buf, field, WIRE_LEN);
    varint::write_u64(buf, payload.len() as u64);
    buf.extend_from_slice(payload);
}

/// Append a packed repeated uint32 field. Empty slices emit nothing.
pub fn write_packed_u32(buf: &mut Vec<u8>, field: u32, values: &[u32]) {
    if values.is_empty() {
        return;
    }
    write_tag(buf, field, WIRE_LEN);
    let payload: usize = values
        .iter()
        .map(|&v| varint::sizeof_u64(u64::from(v)))
        .sum();
    varint::write_u64(buf, payload as u64);
    for &v in values {
        varint::write_u64(buf, u64::from(v));
    }
}

/// Append a packed repeated sint64 (zigzag) field. Empty slices emit nothing.
pub fn write_packed_sint64(buf: &mut Vec<u8>, field: u32, values: &[i64]) {
    if values.is_empty() {
        return;
    }
    write_tag(buf, field, WIRE_LEN);
    let payload: usize = values
        .iter()
        .map(|&v| varint::sizeof_u64(varint::zigzag(v)))
        .sum();
    varint::write_u64(buf, payload as u64);
    for &v in values {
        varint::write_u64(buf, varint::zigzag(v));
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Cursor over one wire-format record.
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn read_varint(&mut self) -> Result<u64, WireError> {
        let (val, consumed) = varint::read_u64(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(val)
    }

    fn advance(&mut self, n: usize) -> Result<(), WireError> {
        if self.data.len() - self.pos < n {
            return Err(WireError::Truncated);
        }
        self.pos += n;
        Ok(())
    }

    /// Read the next field tag, split into `(field_number, wire_type)`.
    pub fn read_tag(&mut self) -> Result<(u32, u32), WireError> {
        let tag = self.read_varint()?;
        let field = u32::try_from(tag >> 3).map_err(|_| WireError::Overflow)?;
        if field == 0 {
            return Err(WireError::Field);
        }
        Ok((field, (tag & 0x7) as u32))
    }

    /// Read a varint value as u64.
    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        self.read_varint()
    }

    /// Read a varint value as i64 (two's complement form).
    pub fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(self.read_varint()? as i64)
    }

    /// Read a varint value as u32, rejecting values that do not fit.
    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        u32::try_from(self.read_varint()?).map_err(|_| WireError::Overflow)
    }

    /// Read a zigzag-encoded sint64 value.
    pub fn read_sint64(&mut self) -> Result<i64, WireError> {
        Ok(varint::unzigzag(self.read_varint()?))
    }

    /// Read a length-delimited payload and return it as a subslice.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], WireError> {
        let len = usize::try_from(self.read_varint()?).map_err(|_| WireError::Overflow)?;
        if self.data.len() - self.pos < len {
            return Err(WireError::Truncated);
        }
        let payload = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(payload)
    }

    /// Read a repeated uint32 field, accepting both the packed form
    /// (wire type 2) and single unpacked values (wire type 0).
    pub fn read_repeated_u32(&mut self, wire: u32, out: &mut Vec<u32>) -> Result<(), WireError> {
        match wire {
            WIRE_LEN => {
                let mut payload = WireReader::new(self.read_bytes()?);
                while !payload.is_empty() {
                    out.push(payload.read_u32()?);
                }
                Ok(())
            }
            WIRE_VARINT => {
                out.push(self.read_u32()?);
                Ok(())
            }
            other => Err(WireError::WireType(other)),
        }
    }

    /// Read a repeated sint64 field, packed or unpacked.
    pub fn read_repeated_sint64(&mut self, wire: u32, out: &mut Vec<i64>) -> Result<(), WireError> {
        match wire {
            WIRE_LEN => {
                let mut payload = WireReader::new(self.read_bytes()?);
                while !payload.is_empty() {
                    out.push(payload.read_sint64()?);
                }
                Ok(())
            }
            WIRE_VARINT => {
                out.push(self.read_sint64()?);
                Ok(())
            }
            other => Err(WireError::WireType(other)),
        }
    }

    /// Skip one field value of the given wire type.
    pub fn skip(&mut self, wire: u32) -> Result<(), WireError> {
        match wire {
            WIRE_VARINT => self.read_varint().map(|_| ()),
            WIRE_FIXED64 => self.advance(8),
            WIRE_LEN => self.read_bytes().map(|_| ()),
            WIRE_FIXED32 => self.advance(4),
            other => Err(WireError::WireType(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        let mut buf = Vec::new();
        write_tag(&mut buf, 8, WIRE_LEN);
        assert_eq!(buf, vec![0x42]);
        let mut r = WireReader::new(&buf);
        assert_eq!(r.read_tag().unwrap(), (8, WIRE_LEN));
        assert!(r.is_empty());
    }

    #[test]
    fn field_number_zero_is_rejected() {
        let mut r = WireReader::new(&[0x00]);
        assert_eq!(r.read_tag(), Err(WireError::Field));
    }

    #[test]
    fn packed_u32_roundtrip() {
        let mut buf = Vec::new();
        write_packed_u32(&mut buf, 2, &[1, 300, 0]);
        let mut r = WireReader::new(&buf);
        let (field, wire) = r.read_tag().unwrap();
        assert_eq!(field, 2);
        let mut out = Vec::new();
        r.read_repeated_u32(wire, &mut out).unwrap();
        assert_eq!(out, vec![1, 300, 0]);
    }

    #[test]
    fn packed_sint64_roundtrip() {
        let mut buf = Vec::new();
        write_packed_sint64(&mut buf, 8, &[100, 5, -5, 0]);
        let mut r = WireReader::new(&buf);
        let (_, wire) = r.read_tag().unwrap();
        let mut out = Vec::new();
        r.read_repeated_sint64(wire, &mut out).unwrap();
        assert_eq!(out, vec![100, 5, -5, 0]);
    }

    #[test]
    fn empty_packed_fields_emit_nothing() {
        let mut buf = Vec::new();
        write_packed_u32(&mut buf, 2, &[]);
        write_packed_sint64(&mut buf, 8, &[]);
        assert!(buf.is_empty());
    }

    #[test]
    fn unpacked_scalars_are_accepted() {
        // Two unpacked occurrences of field 2 accumulate.
        let mut buf = Vec::new();
        write_uint32(&mut buf, 2, 7);
        write_uint32(&mut buf, 2, 9);
        let mut r = WireReader::new(&buf);
        let mut out = Vec::new();
        while !r.is_empty() {
            let (field, wire) = r.read_tag().unwrap();
            assert_eq!(field, 2);
            r.read_repeated_u32(wire, &mut out).unwrap();
        }
        assert_eq!(out, vec![7, 9]);
    }

    #[test]
    fn skip_unknown_fields() {
        let mut buf = Vec::new();
        write_int64(&mut buf, 15, -3);
        write_bytes(&mut buf, 16, b"opaque");
        write_uint32(&mut buf, 1, 99);
        let mut r = WireReader::new(&buf);
        let mut seen = None;
        while !r.is_empty() {
            let (field, wire) = r.read_tag().unwrap();
            if field == 1 {
                seen = Some(r.read_u32().unwrap());
            } else {
                r.skip(wire).unwrap();
            }
        }
        assert_eq!(seen, Some(99));
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let mut buf = Vec::new();
        write_bytes(&mut buf, 4, b"hello");
        buf.truncate(buf.len() - 2);
        let mut r = WireReader::new(&buf);
        let (_, wire) = r.read_tag().unwrap();
        assert_eq!(wire, WIRE_LEN);
        assert_eq!(r.read_bytes().unwrap_err(), WireError::Truncated);
    }

    #[test]
    fn groups_are_rejected() {
        let mut r = WireReader::new(&[]);
        assert_eq!(r.skip(3), Err(WireError::WireType(3)));
        assert_eq!(r.skip(4), Err(WireError::WireType(4)));
    }
}
