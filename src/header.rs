// mediatag-core/src/header.rs
//! TIFF header structures and byte-order handling

use crate::writer::ByteWriter;
use crate::{Result, TagError};

/// Byte order applied uniformly to every multi-byte field of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Little-endian byte order (Intel format) - "II"
    Little,
    /// Big-endian byte order (Motorola format) - "MM"
    Big,
}

/// TIFF header (first 8 bytes of every Exif/TIFF tag segment)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order indicator
    pub endian: Endian,
    /// Magic number (should always be 42)
    pub magic: u16,
    /// Offset to the first Image File Directory
    pub ifd_offset: u32,
}

impl TiffHeader {
    /// The size of a TIFF header in bytes
    pub const SIZE: usize = 8;

    /// The expected magic number in TIFF headers
    pub const MAGIC_NUMBER: u16 = 42;

    /// Build a header for the given byte order whose first IFD sits at `ifd_offset`
    pub fn new(endian: Endian, ifd_offset: u32) -> Self {
        Self {
            endian,
            magic: Self::MAGIC_NUMBER,
            ifd_offset,
        }
    }

    /// Parse a TIFF header from the first 8 bytes of data
    ///
    /// # Returns
    /// * `Ok(TiffHeader)` if parsing succeeds
    /// * `Err(TagError)` if data is invalid or insufficient
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(TagError::InsufficientData {
                operation: "reading TIFF header",
                needed: Self::SIZE,
                available: data.len(),
            });
        }

        let endian = Endian::from_marker(&data[0..2])?;

        let magic = endian.read_u16([data[2], data[3]]);
        if magic != Self::MAGIC_NUMBER {
            return Err(TagError::InvalidMagic { found: magic });
        }

        let ifd_offset = endian.read_u32([data[4], data[5], data[6], data[7]]);

        Ok(TiffHeader {
            endian,
            magic,
            ifd_offset,
        })
    }

    /// Append the 8 header bytes to `writer`
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.endian.marker());
        writer.write_u16(self.magic, self.endian);
        writer.write_u32(self.ifd_offset, self.endian);
    }

    /// Get the byte order of this header
    pub fn endianness(&self) -> Endian {
        self.endian
    }
}

impl Endian {
    /// Parse byte order from an "II" / "MM" marker
    pub fn from_marker(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(TagError::InsufficientData {
                operation: "reading byte order",
                needed: 2,
                available: bytes.len(),
            });
        }

        match &bytes[0..2] {
            b"II" => Ok(Endian::Little),
            b"MM" => Ok(Endian::Big),
            _ => Err(TagError::InvalidByteOrder {
                found: [bytes[0], bytes[1]],
            }),
        }
    }

    /// The two-byte marker that announces this byte order
    pub fn marker(self) -> [u8; 2] {
        match self {
            Endian::Little => *b"II",
            Endian::Big => *b"MM",
        }
    }

    /// Convert a 2-byte array to u16 using this endianness
    pub fn read_u16(self, bytes: [u8; 2]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes(bytes),
            Endian::Big => u16::from_be_bytes(bytes),
        }
    }

    /// Convert a 4-byte array to u32 using this endianness
    pub fn read_u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(bytes),
            Endian::Big => u32::from_be_bytes(bytes),
        }
    }

    /// Convert an 8-byte array to u64 using this endianness
    pub fn read_u64(self, bytes: [u8; 8]) -> u64 {
        match self {
            Endian::Little => u64::from_le_bytes(bytes),
            Endian::Big => u64::from_be_bytes(bytes),
        }
    }

    /// Convert a u16 to bytes in this endianness
    pub fn write_u16(self, value: u16) -> [u8; 2] {
        match self {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        }
    }

    /// Convert a u32 to bytes in this endianness
    pub fn write_u32(self, value: u32) -> [u8; 4] {
        match self {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        }
    }

    /// Convert a u64 to bytes in this endianness
    pub fn write_u64(self, value: u64) -> [u8; 8] {
        match self {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        }
    }
}
