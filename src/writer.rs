// mediatag-core/src/writer.rs
//! Append-only, endian-aware byte writer used by the encoders

use crate::header::Endian;

/// Growable output buffer
///
/// Byte order is passed per call, mirroring [`ByteReader`](crate::reader::ByteReader),
/// because maker notes may use a different order than their parent structure.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Current write position (equal to the number of bytes written)
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Append a single byte
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Append a u16
    pub fn write_u16(&mut self, value: u16, endian: Endian) {
        self.buf.extend_from_slice(&endian.write_u16(value));
    }

    /// Append a u32
    pub fn write_u32(&mut self, value: u32, endian: Endian) {
        self.buf.extend_from_slice(&endian.write_u32(value));
    }

    /// Append raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pad with a zero byte if an odd number of bytes was written since
    /// `start` (TIFF word alignment of a payload)
    pub fn pad_from(&mut self, start: usize) {
        if (self.buf.len() - start) % 2 == 1 {
            self.buf.push(0);
        }
    }

    /// Borrow the bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer and return its bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_position() {
        let mut writer = ByteWriter::new();
        writer.write_u8(1);
        writer.write_u16(0x1234, Endian::Big);
        writer.write_u32(0x12345678, Endian::Little);
        assert_eq!(writer.position(), 7);
        assert_eq!(
            writer.as_slice(),
            &[0x01, 0x12, 0x34, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn test_pad_from() {
        let mut writer = ByteWriter::new();
        writer.write_bytes(b"abc");
        writer.pad_from(0);
        assert_eq!(writer.position(), 4);
        writer.pad_from(0);
        assert_eq!(writer.as_slice(), b"abc\0");

        // Parity is relative to the payload start, not the buffer
        writer.write_bytes(b"de");
        writer.pad_from(3);
        assert_eq!(writer.into_inner(), b"abc\0de\0".to_vec());
    }
}
