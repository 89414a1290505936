// mediatag-core/src/reader.rs
//! Bounds-checked reading over a borrowed tag segment
//!
//! The decoder never touches a file: the container layer hands it the raw
//! segment bytes and every offset found inside is checked against them here.
//! Reads return `OutOfBounds` instead of panicking so corrupt offsets can be
//! turned into warnings by the caller.

use crate::{
    error::{Result, TagError},
    header::Endian,
};

/// Stateless, offset-based reader over a byte slice
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    /// Wrap a byte slice
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Total size of the underlying buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the underlying buffer
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Check that `count` bytes starting at `offset` lie inside the buffer
    pub fn contains(&self, offset: usize, count: usize) -> bool {
        offset
            .checked_add(count)
            .is_some_and(|end| end <= self.data.len())
    }

    /// Borrow `count` bytes at `offset`
    ///
    /// # Errors
    /// Returns `OutOfBounds` if offset + count exceeds the buffer
    pub fn read_bytes_at(&self, offset: usize, count: usize) -> Result<&'a [u8]> {
        if !self.contains(offset, count) {
            return Err(TagError::OutOfBounds {
                index: offset.saturating_add(count),
                max: self.data.len(),
            });
        }
        Ok(&self.data[offset..offset + count])
    }

    /// Read a single byte at a specific offset
    pub fn read_u8_at(&self, offset: usize) -> Result<u8> {
        Ok(self.read_bytes_at(offset, 1)?[0])
    }

    /// Read a u16 at a specific offset with given endianness
    pub fn read_u16_at(&self, offset: usize, endian: Endian) -> Result<u16> {
        let bytes = self.read_bytes_at(offset, 2)?;
        Ok(endian.read_u16([bytes[0], bytes[1]]))
    }

    /// Read a u32 at a specific offset with given endianness
    pub fn read_u32_at(&self, offset: usize, endian: Endian) -> Result<u32> {
        let bytes = self.read_bytes_at(offset, 4)?;
        Ok(endian.read_u32([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read the 4-byte value slot of an IFD entry without interpreting it
    pub fn read_slot_at(&self, offset: usize) -> Result<[u8; 4]> {
        let bytes = self.read_bytes_at(offset, 4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_data() -> Vec<u8> {
        vec![
            0x49, 0x49, // "II" - little endian
            0x2A, 0x00, // Magic number 42
            0x08, 0x00, 0x00, 0x00, // IFD offset 8
            0x12, 0x34, 0x56, 0x78,
        ]
    }

    #[test]
    fn test_bounds_checking() {
        let data = vec![0x01, 0x02];
        let reader = ByteReader::new(&data);

        assert!(reader.read_bytes_at(0, 10).is_err());
        assert!(reader.read_u16_at(1, Endian::Little).is_err());
        assert!(reader.read_u32_at(0, Endian::Little).is_err());
        assert!(reader.read_bytes_at(usize::MAX, 2).is_err());
        assert!(!reader.contains(usize::MAX, 1));
    }

    #[test]
    fn test_reading() {
        let data = create_test_data();
        let reader = ByteReader::new(&data);

        assert_eq!(reader.read_bytes_at(0, 4).unwrap(), &data[0..4]);
        assert_eq!(reader.read_u8_at(0).unwrap(), 0x49);
        assert_eq!(reader.read_u16_at(0, Endian::Little).unwrap(), 0x4949);
        assert_eq!(reader.read_u32_at(4, Endian::Little).unwrap(), 8);
        assert_eq!(reader.read_slot_at(8).unwrap(), [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn test_endian_conversion() {
        let data = vec![0x12, 0x34, 0x56, 0x78];
        let reader = ByteReader::new(&data);

        assert_eq!(reader.read_u16_at(0, Endian::Little).unwrap(), 0x3412);
        assert_eq!(reader.read_u16_at(0, Endian::Big).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_at(0, Endian::Little).unwrap(), 0x78563412);
        assert_eq!(reader.read_u32_at(0, Endian::Big).unwrap(), 0x12345678);
    }

    #[test]
    fn test_out_of_bounds_reports_extent() {
        let data = create_test_data();
        let reader = ByteReader::new(&data);

        assert_eq!(
            reader.read_bytes_at(10, 4),
            Err(TagError::OutOfBounds { index: 14, max: 12 })
        );
    }
}
