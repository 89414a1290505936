// mediatag-core/src/error.rs
//! Error types for tag decoding and encoding
//!
//! Decode paths treat most of these as recoverable: they are collected as
//! warnings next to a partial result instead of being returned as `Err`.
//! Encode paths return them directly.

use thiserror::Error;

/// Error type shared by the IFD codec and the XMP parser/renderer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TagError {
    /// Buffer is too small to contain a required structure
    #[error("Insufficient data for {operation}: needed {needed} bytes, but only {available} available")]
    InsufficientData {
        /// What we were trying to read
        operation: &'static str,
        /// How many bytes we needed
        needed: usize,
        /// How many bytes were available
        available: usize,
    },

    /// Invalid TIFF magic number in header
    #[error("Invalid TIFF magic number: expected 42, found {found}")]
    InvalidMagic {
        /// The magic number we found
        found: u16,
    },

    /// Invalid byte order indicator in header
    #[error("Invalid byte order indicator: expected 'II' or 'MM', found {found:?}")]
    InvalidByteOrder {
        /// The byte order bytes we found
        found: [u8; 2],
    },

    /// Attempted to read past the end of the buffer
    #[error("Index {index} out of bounds (maximum: {max})")]
    OutOfBounds {
        /// The index we tried to access
        index: usize,
        /// The maximum valid index
        max: usize,
    },

    /// Unknown wire type code in an IFD entry
    #[error("Invalid field type {found} in tag {tag:#06x} (count {count}), kept the 4 slot bytes")]
    InvalidFieldType {
        /// Tag carrying the bad type code
        tag: u16,
        /// The field type value we found
        found: u16,
        /// Element count declared by the entry
        count: u32,
    },

    /// Structure is malformed in a way not covered by a more specific variant
    #[error("Malformed data: {reason}")]
    MalformedFile {
        /// Description of what's wrong
        reason: String,
    },

    /// A directory offset was reached twice while following pointers
    #[error("Directory at offset {offset} was already visited")]
    CyclicDirectory {
        /// Absolute buffer offset of the repeated directory
        offset: usize,
    },

    /// Nested sub-directories went deeper than the configured ceiling
    #[error("Nesting depth {depth} exceeds the configured limit")]
    RecursionLimit {
        /// Depth at which decoding stopped
        depth: usize,
    },

    /// Entry content cannot be represented on the wire
    #[error("Invalid entry {tag:#06x}: {reason}")]
    InvalidEntry {
        /// The tag number
        tag: u16,
        /// What's wrong with it
        reason: String,
    },

    /// Encoded output does not fit the target container segment
    #[error("Encoded segment is {size} bytes, exceeding the limit of {limit}")]
    SegmentTooLarge {
        /// Size of the encoded output
        size: usize,
        /// Configured limit
        limit: usize,
    },

    /// An offset in the encoded output would not fit in 32 bits
    #[error("Encoded layout of {size} bytes cannot be addressed with 32-bit offsets")]
    OffsetOverflow {
        /// Position that overflowed
        size: usize,
    },

    /// XMP packet is not well-formed XML or not interpretable as RDF
    #[error("Malformed XMP: {reason}")]
    MalformedXmp {
        /// Description of what's wrong
        reason: String,
    },
}

/// Result type for tag operations
pub type Result<T> = std::result::Result<T, TagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = TagError::InvalidMagic { found: 31 };
        assert_eq!(
            error.to_string(),
            "Invalid TIFF magic number: expected 42, found 31"
        );
    }

    #[test]
    fn test_insufficient_data_error() {
        let error = TagError::InsufficientData {
            operation: "reading header",
            needed: 8,
            available: 4,
        };
        assert_eq!(
            error.to_string(),
            "Insufficient data for reading header: needed 8 bytes, but only 4 available"
        );
    }

    #[test]
    fn test_segment_too_large_error() {
        let error = TagError::SegmentTooLarge {
            size: 70000,
            limit: 65535,
        };
        assert_eq!(
            error.to_string(),
            "Encoded segment is 70000 bytes, exceeding the limit of 65535"
        );
    }

    #[test]
    fn test_field_type_error_shows_hex_tag() {
        let error = TagError::InvalidFieldType {
            tag: 0x927c,
            found: 99,
            count: 12,
        };
        assert_eq!(
            error.to_string(),
            "Invalid field type 99 in tag 0x927c (count 12), kept the 4 slot bytes"
        );
    }
}
