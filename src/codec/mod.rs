//! Canonical wire codec
//!
//! The wire format is XDR: big-endian fixed-width integers, 4-byte union
//! discriminants and presence flags, and variable-length data carried as a
//! 4-byte length followed by the bytes padded with zeros to a 4-byte
//! boundary. [`XdrWriter`] and [`XdrReader`] implement the primitives; the
//! submodules build transaction and result messages on top of them.

pub mod decode;
pub mod encode;
pub mod result;

use crate::errors::CodecError;

/// Append-only writer producing canonical XDR bytes
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Booleans travel as a 4-byte 0 or 1
    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(value as u32);
    }

    /// Presence flag for an optional field
    pub fn write_presence(&mut self, present: bool) {
        self.write_u32(present as u32);
    }

    /// Fixed-width data, written verbatim with no length prefix
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Variable-length opaque data: length prefix, bytes, zero padding
    pub fn write_var_opaque(&mut self, bytes: &[u8]) {
        self.write_u32(bytes.len() as u32);
        self.buf.extend_from_slice(bytes);
        let rem = bytes.len() % 4;
        if rem != 0 {
            self.buf.extend_from_slice(&[0u8; 4][..4 - rem]);
        }
    }

    /// Strings are opaque bytes on the wire
    pub fn write_string(&mut self, text: &str) {
        self.write_var_opaque(text.as_bytes());
    }
}

/// Cursor-based reader over canonical XDR bytes
#[derive(Debug)]
pub struct XdrReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset == self.data.len()
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < count {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: count,
            });
        }
        let slice = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(slice)
    }

    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32, CodecError> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        let bytes = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(raw))
    }

    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        Ok(self.read_u64()? as i64)
    }

    /// A 4-byte flag that must be exactly 0 or 1
    pub fn read_presence(&mut self) -> Result<bool, CodecError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidPresenceFlag(other)),
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        self.read_presence()
    }

    /// An element count, bounded by what the remaining input could hold.
    ///
    /// `min_element_size` is the smallest possible encoding of one element;
    /// a count the buffer cannot satisfy is rejected before any allocation.
    pub fn read_count(
        &mut self,
        field: &'static str,
        min_element_size: usize,
    ) -> Result<usize, CodecError> {
        let count = self.read_u32()? as usize;
        let max = self.remaining() / min_element_size;
        if count > max {
            return Err(CodecError::LengthOutOfRange {
                field,
                actual: count,
                max,
            });
        }
        Ok(count)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Variable-length opaque data, rejecting over-long fields and non-zero
    /// padding bytes
    pub fn read_var_opaque(
        &mut self,
        field: &'static str,
        max: usize,
    ) -> Result<Vec<u8>, CodecError> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(CodecError::LengthOutOfRange {
                field,
                actual: len,
                max,
            });
        }
        let bytes = self.take(len)?.to_vec();
        let rem = len % 4;
        if rem != 0 {
            let padding = self.take(4 - rem)?;
            if padding.iter().any(|&b| b != 0) {
                return Err(CodecError::NonZeroPadding(field));
            }
        }
        Ok(bytes)
    }

    pub fn read_string(&mut self, field: &'static str, max: usize) -> Result<String, CodecError> {
        let bytes = self.read_var_opaque(field, max)?;
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_round_trip() {
        let mut writer = XdrWriter::new();
        writer.write_u32(0x01020304);
        writer.write_i32(-5);
        writer.write_u64(0x0102030405060708);
        writer.write_i64(i64::MIN);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..4], &[1, 2, 3, 4]);

        let mut reader = XdrReader::new(&bytes);
        assert_eq!(reader.read_u32().unwrap(), 0x01020304);
        assert_eq!(reader.read_i32().unwrap(), -5);
        assert_eq!(reader.read_u64().unwrap(), 0x0102030405060708);
        assert_eq!(reader.read_i64().unwrap(), i64::MIN);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_var_opaque_padding() {
        let mut writer = XdrWriter::new();
        writer.write_var_opaque(b"hello");
        let bytes = writer.into_bytes();
        // 4-byte length + 5 data bytes + 3 padding bytes
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[9..], &[0, 0, 0]);

        let mut reader = XdrReader::new(&bytes);
        assert_eq!(reader.read_var_opaque("field", 64).unwrap(), b"hello");
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_aligned_opaque_has_no_padding() {
        let mut writer = XdrWriter::new();
        writer.write_var_opaque(b"fourfour");
        assert_eq!(writer.len(), 12);
    }

    #[test]
    fn test_truncated_read() {
        let mut reader = XdrReader::new(&[0, 0]);
        assert!(matches!(
            reader.read_u32(),
            Err(CodecError::Truncated { offset: 0, needed: 4 })
        ));
    }

    #[test]
    fn test_length_out_of_range() {
        let mut writer = XdrWriter::new();
        writer.write_var_opaque(&[0u8; 40]);
        let bytes = writer.into_bytes();
        let mut reader = XdrReader::new(&bytes);
        assert!(matches!(
            reader.read_var_opaque("memo", 28),
            Err(CodecError::LengthOutOfRange { field: "memo", actual: 40, max: 28 })
        ));
    }

    #[test]
    fn test_count_bounded_by_remaining_input() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        let mut reader = XdrReader::new(&bytes);
        assert!(matches!(
            reader.read_count("elements", 8),
            Err(CodecError::LengthOutOfRange { field: "elements", max: 2, .. })
        ));

        let mut reader = XdrReader::new(&bytes);
        assert_eq!(reader.read_count("elements", 4).unwrap_err(),
            CodecError::LengthOutOfRange { field: "elements", actual: u32::MAX as usize, max: 4 });

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 16]);
        let mut reader = XdrReader::new(&bytes);
        assert_eq!(reader.read_count("elements", 8).unwrap(), 2);
    }

    #[test]
    fn test_non_zero_padding_rejected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5u32.to_be_bytes());
        bytes.extend_from_slice(b"hello");
        bytes.extend_from_slice(&[0, 0, 7]);
        let mut reader = XdrReader::new(&bytes);
        assert!(matches!(
            reader.read_var_opaque("field", 64),
            Err(CodecError::NonZeroPadding("field"))
        ));
    }

    #[test]
    fn test_presence_flag_validation() {
        let bytes = 2u32.to_be_bytes();
        let mut reader = XdrReader::new(&bytes);
        assert!(matches!(
            reader.read_presence(),
            Err(CodecError::InvalidPresenceFlag(2))
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4u32.to_be_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe, 0xfd, 0xfc]);
        let mut reader = XdrReader::new(&bytes);
        assert!(matches!(
            reader.read_string("name", 64),
            Err(CodecError::InvalidUtf8("name"))
        ));
    }
}
