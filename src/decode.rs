// mediatag-core/src/decode.rs
//! IFD decoding
//!
//! Decoding never fails on corrupt directories. Every problem is recorded as
//! a warning and the affected part of the tree is truncated or dropped:
//! a short directory keeps the entries read so far, an unreachable value
//! becomes an empty placeholder, and a sub-IFD pointer that leads out of the
//! buffer, back into an already visited directory, or past the depth ceiling
//! is left out of the result.

use std::collections::HashSet;

use log::{debug, warn};

use crate::config::DecodeConfig;
use crate::entry::{FieldType, TagValue, UserComment};
use crate::header::{Endian, TiffHeader};
use crate::ifd::{Directory, IfdEntry, Structure};
use crate::makernote::{self, MakerNote};
use crate::reader::ByteReader;
use crate::tags::{self, IfdKind};
use crate::{Result, TagError};

/// Size of one directory entry on the wire
pub(crate) const ENTRY_SIZE: usize = 12;

/// A decoded structure together with everything that went wrong on the way
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    /// The (possibly partial) structure
    pub structure: Structure,
    /// Recoverable problems, in the order they were found
    pub warnings: Vec<TagError>,
}

/// Decoder for chains of Image File Directories
#[derive(Debug, Clone, Default)]
pub struct IfdDecoder {
    config: DecodeConfig,
}

impl IfdDecoder {
    /// Create a decoder with the given limits
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Decode the directory chain starting at `start`
    ///
    /// `data` is the whole tag segment; offsets inside it are relative to
    /// its first byte (the TIFF header when there is one).
    pub fn decode(&self, data: &[u8], start: usize, endian: Endian) -> Decoded {
        let mut walk = Walk::new(data, self.config);
        let structure = match walk.read_chain(0, start, endian, IfdKind::Primary, 0) {
            Ok(structure) => structure,
            Err(error) => {
                walk.warn(error);
                Structure::new()
            }
        };
        debug!(
            "decoded {} directories with {} warnings",
            structure.len(),
            walk.warnings.len()
        );
        Decoded {
            structure,
            warnings: walk.warnings,
        }
    }

    /// Parse the TIFF header at the start of `data`, then decode from the
    /// offset it announces
    ///
    /// Only a bad header is an error; everything after it is recovered.
    pub fn decode_tiff(&self, data: &[u8]) -> Result<(TiffHeader, Decoded)> {
        let header = TiffHeader::parse(data)?;
        let decoded = self.decode(data, header.ifd_offset as usize, header.endian);
        Ok((header, decoded))
    }
}

/// Decode a directory chain with default limits, discarding warnings
///
/// Warnings are still emitted through the `log` facade.
pub fn decode_ifd(data: &[u8], start: usize, endian: Endian) -> Structure {
    IfdDecoder::default().decode(data, start, endian).structure
}

/// Decode a complete TIFF/Exif segment with default limits
pub fn decode_tiff(data: &[u8]) -> Result<Decoded> {
    IfdDecoder::default()
        .decode_tiff(data)
        .map(|(_, decoded)| decoded)
}

/// One 12-byte entry header as found on the wire
#[derive(Debug, Clone, Copy)]
struct RawEntry {
    tag: u16,
    type_code: u16,
    count: u32,
    slot: [u8; 4],
    /// Absolute position of the 4-byte value slot
    slot_pos: usize,
}

/// State shared by every directory of one decode call
struct Walk<'a> {
    reader: ByteReader<'a>,
    config: DecodeConfig,
    /// Absolute positions of every directory read so far
    visited: HashSet<usize>,
    warnings: Vec<TagError>,
    /// Make of the primary image, consulted by maker-note dispatch
    make: Option<String>,
}

impl<'a> Walk<'a> {
    fn new(data: &'a [u8], config: DecodeConfig) -> Self {
        Self {
            reader: ByteReader::new(data),
            config,
            visited: HashSet::new(),
            warnings: Vec::new(),
            make: None,
        }
    }

    fn warn(&mut self, error: TagError) {
        warn!("{error}");
        self.warnings.push(error);
    }

    /// Read the directory at absolute position `start` and everything
    /// chained after it
    ///
    /// Failing to read the first directory is an error; failures further
    /// down the chain only truncate it.
    fn read_chain(
        &mut self,
        base: usize,
        start: usize,
        endian: Endian,
        kind: IfdKind,
        depth: usize,
    ) -> Result<Structure> {
        if depth > self.config.max_depth {
            return Err(TagError::RecursionLimit { depth });
        }

        let mut structure = Structure::new();
        let (directory, mut next) = self.read_directory(base, start, endian, kind, depth)?;
        structure.push(directory);

        // Maker notes are a single directory; their next field is often garbage
        if kind == IfdKind::MakerNote {
            return Ok(structure);
        }

        while next != 0 {
            if structure.len() >= self.config.max_chain {
                self.warn(TagError::MalformedFile {
                    reason: format!(
                        "directory chain longer than {} entries",
                        self.config.max_chain
                    ),
                });
                break;
            }
            let Some(pos) = base.checked_add(next as usize) else {
                break;
            };
            match self.read_directory(base, pos, endian, kind, depth) {
                Ok((directory, following)) => {
                    structure.push(directory);
                    next = following;
                }
                Err(error) => {
                    self.warn(error);
                    break;
                }
            }
        }
        Ok(structure)
    }

    /// Read one directory at absolute position `pos`, returning it with its
    /// next-IFD offset (0 when there is none or it cannot be read)
    fn read_directory(
        &mut self,
        base: usize,
        pos: usize,
        endian: Endian,
        kind: IfdKind,
        depth: usize,
    ) -> Result<(Directory, u32)> {
        if !self.visited.insert(pos) {
            return Err(TagError::CyclicDirectory { offset: pos });
        }
        let count = self.reader.read_u16_at(pos, endian)? as usize;

        let mut raw_entries = Vec::with_capacity(count);
        for index in 0..count {
            let at = pos + 2 + index * ENTRY_SIZE;
            if !self.reader.contains(at, ENTRY_SIZE) {
                self.warn(TagError::MalformedFile {
                    reason: format!(
                        "directory at {pos} truncated after {index} of {count} entries"
                    ),
                });
                break;
            }
            raw_entries.push(RawEntry {
                tag: self.reader.read_u16_at(at, endian)?,
                type_code: self.reader.read_u16_at(at + 2, endian)?,
                count: self.reader.read_u32_at(at + 4, endian)?,
                slot: self.reader.read_slot_at(at + 8)?,
                slot_pos: at + 8,
            });
        }
        let next = if raw_entries.len() == count {
            self.reader
                .read_u32_at(pos + 2 + count * ENTRY_SIZE, endian)
                .unwrap_or(0)
        } else {
            0
        };

        // Plain values first so Make is known before pointers are followed
        let mut directory = Directory::new();
        let mut pointers = Vec::new();
        for raw in raw_entries {
            if self.is_pointer(kind, &raw, endian) {
                pointers.push(raw);
                continue;
            }
            let value = self.read_value(base, &raw, endian, kind);
            if kind == IfdKind::Primary && depth == 0 && raw.tag == tags::MAKE {
                self.make = value.as_str().map(str::to_owned);
            }
            directory.insert(IfdEntry::new(raw.tag, value));
        }

        for raw in pointers {
            let target = endian.read_u32(raw.slot);
            if raw.tag == tags::MAKER_NOTE {
                let value = self.read_maker_note(base, &raw, endian, depth);
                directory.insert(IfdEntry::new(raw.tag, value));
                continue;
            }
            let Some(sub_kind) = kind.sub_ifd(raw.tag) else {
                continue;
            };
            let Some(start) = base.checked_add(target as usize) else {
                continue;
            };
            match self.read_chain(base, start, endian, sub_kind, depth + 1) {
                Ok(sub) => {
                    directory.insert(IfdEntry::new(raw.tag, sub));
                }
                Err(error) => {
                    debug!("dropping {sub_kind:?} pointer {:#06x}", raw.tag);
                    self.warn(error);
                }
            }
        }

        if kind == IfdKind::Primary {
            self.attach_thumbnail(base, &mut directory);
        }

        debug!("read {kind:?} directory at {pos} with {} entries", directory.len());
        Ok((directory, next))
    }

    /// Entries resolved in the second pass: sub-IFD pointers and the maker note
    fn is_pointer(&self, kind: IfdKind, raw: &RawEntry, endian: Endian) -> bool {
        let field_type = FieldType::from_u16(raw.type_code);
        if kind == IfdKind::Exif && raw.tag == tags::MAKER_NOTE {
            return field_type == Some(FieldType::Undefined)
                && raw.count as usize > 4
                && self.config.parse_maker_notes;
        }
        kind.sub_ifd(raw.tag).is_some()
            && field_type == Some(FieldType::Long)
            && raw.count == 1
            && endian.read_u32(raw.slot) != 0
    }

    /// Locate the bytes of a value, inline or out of line
    ///
    /// Returns the absolute position and the bytes, or `None` (with a
    /// warning) when they are not inside the buffer.
    fn value_data(
        &mut self,
        base: usize,
        raw: &RawEntry,
        endian: Endian,
        element_size: usize,
    ) -> Option<(usize, &'a [u8])> {
        let Some(size) = (raw.count as usize).checked_mul(element_size) else {
            self.warn(TagError::InvalidEntry {
                tag: raw.tag,
                reason: format!("count {} overflows", raw.count),
            });
            return None;
        };
        let pos = if size <= 4 {
            raw.slot_pos
        } else {
            base.saturating_add(endian.read_u32(raw.slot) as usize)
        };
        match self.reader.read_bytes_at(pos, size) {
            Ok(bytes) => Some((pos, bytes)),
            Err(error) => {
                self.warn(error);
                None
            }
        }
    }

    /// Typed value of a plain entry
    ///
    /// An unknown type code has no element size, so where its data lives
    /// cannot be told. Such an entry keeps only the 4 bytes of its value slot
    /// as Undefined, and re-encoding writes it back as Undefined with count 4.
    fn read_value(
        &mut self,
        base: usize,
        raw: &RawEntry,
        endian: Endian,
        kind: IfdKind,
    ) -> TagValue {
        let Some(field_type) = FieldType::from_u16(raw.type_code) else {
            self.warn(TagError::InvalidFieldType {
                tag: raw.tag,
                found: raw.type_code,
                count: raw.count,
            });
            return TagValue::Undefined(raw.slot.to_vec());
        };

        let Some((_, bytes)) = self.value_data(base, raw, endian, field_type.byte_size()) else {
            return TagValue::empty(field_type);
        };

        if kind == IfdKind::Exif
            && raw.tag == tags::USER_COMMENT
            && field_type == FieldType::Undefined
        {
            if let Some(comment) = UserComment::decode(bytes, endian) {
                return TagValue::UserComment(comment);
            }
        }
        TagValue::decode(field_type, bytes, endian)
    }

    fn read_maker_note(
        &mut self,
        base: usize,
        raw: &RawEntry,
        endian: Endian,
        depth: usize,
    ) -> TagValue {
        let Some((pos, bytes)) = self.value_data(base, raw, endian, 1) else {
            return TagValue::empty(FieldType::Undefined);
        };
        let opaque = || TagValue::Undefined(bytes.to_vec());

        let Some(placement) = makernote::locate(
            self.reader.as_slice(),
            pos,
            bytes.len(),
            base,
            endian,
            self.make.as_deref(),
        ) else {
            return opaque();
        };

        let start = placement.base + placement.ifd_offset as usize;
        match self.read_chain(placement.base, start, placement.endian, IfdKind::MakerNote, depth + 1) {
            Ok(structure) => TagValue::MakerNote(MakerNote::decoded(placement, structure, bytes)),
            Err(error) => {
                self.warn(error);
                opaque()
            }
        }
    }

    /// Replace a JPEGInterchangeFormat offset by the thumbnail bytes it points at
    fn attach_thumbnail(&mut self, base: usize, directory: &mut Directory) {
        let offset = directory
            .get(tags::JPEG_INTERCHANGE_FORMAT)
            .and_then(|e| e.value.as_u32());
        let length = directory
            .get(tags::JPEG_INTERCHANGE_FORMAT_LENGTH)
            .and_then(|e| e.value.as_u32());
        let (Some(offset), Some(length)) = (offset, length) else {
            return;
        };

        match self
            .reader
            .read_bytes_at(base.saturating_add(offset as usize), length as usize)
        {
            Ok(bytes) => {
                directory.insert(IfdEntry::new(
                    tags::JPEG_INTERCHANGE_FORMAT,
                    TagValue::Thumbnail(bytes.to_vec()),
                ));
            }
            Err(error) => self.warn(error),
        }
    }
}
