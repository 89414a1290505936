// mediatag-core/src/encode.rs
//! IFD encoding
//!
//! Output is always rebuilt from scratch. Each directory is written as one
//! block: entry count, entries, next-IFD offset, then the out-of-line
//! payloads of its entries in entry order. Nested sub-IFDs, thumbnails and
//! maker notes are payloads too, so a child's block sits inside its parent's
//! and the next directory of a chain follows the whole block. Sizes are
//! computed first ([`structure_size`]) so every offset is known before the
//! entry that holds it is written.

use std::borrow::Cow;

use log::debug;

use crate::config::EncodeConfig;
use crate::decode::ENTRY_SIZE;
use crate::entry::TagValue;
use crate::header::{Endian, TiffHeader};
use crate::ifd::{Directory, IfdEntry, Structure};
use crate::makernote::{Layout, MakerNote};
use crate::tags;
use crate::writer::ByteWriter;
use crate::{Result, TagError};

/// Encoder for [`Structure`]s
#[derive(Debug, Clone, Default)]
pub struct IfdEncoder {
    config: EncodeConfig,
}

impl IfdEncoder {
    /// Create an encoder with the given limits
    pub fn new(config: EncodeConfig) -> Self {
        Self { config }
    }

    /// Encode `structure` as a self-contained TIFF segment: header, then the
    /// first directory at offset 8
    pub fn encode(&self, structure: &Structure, endian: Endian) -> Result<Vec<u8>> {
        let size = TiffHeader::SIZE + structure_size(structure);
        if let Some(limit) = self.config.segment_limit {
            if size > limit {
                return Err(TagError::SegmentTooLarge { size, limit });
            }
        }
        if u32::try_from(size).is_err() {
            return Err(TagError::OffsetOverflow { size });
        }

        let mut writer = ByteWriter::new();
        TiffHeader::new(endian, TiffHeader::SIZE as u32).write(&mut writer);
        write_structure(&mut writer, structure, 0, endian)?;
        debug_assert_eq!(writer.position(), size);

        debug!("encoded {} directories into {size} bytes", structure.len());
        Ok(writer.into_inner())
    }
}

/// Encode with the default 65535-byte segment limit
pub fn encode_ifd(structure: &Structure, endian: Endian) -> Result<Vec<u8>> {
    IfdEncoder::default().encode(structure, endian)
}

/// Bytes `structure` occupies on the wire, TIFF header excluded
///
/// An empty structure is written as one empty directory.
pub fn structure_size(structure: &Structure) -> usize {
    chain(structure)
        .iter()
        .map(|directory| block_size(&planned(directory)))
        .sum()
}

fn chain(structure: &Structure) -> Cow<'_, [Directory]> {
    if structure.is_empty() {
        Cow::Owned(vec![Directory::new()])
    } else {
        Cow::Borrowed(structure.directories())
    }
}

fn padded(len: usize) -> usize {
    len + (len & 1)
}

/// Entries in wire order, with the thumbnail length rewritten to match the
/// thumbnail bytes
fn planned(directory: &Directory) -> Vec<(u16, Cow<'_, TagValue>)> {
    let thumbnail_len = match directory.get(tags::JPEG_INTERCHANGE_FORMAT) {
        Some(IfdEntry {
            value: TagValue::Thumbnail(bytes),
            ..
        }) => Some(bytes.len()),
        _ => None,
    };

    let mut entries: Vec<_> = directory
        .entries()
        .map(|entry| match thumbnail_len {
            Some(len) if entry.tag == tags::JPEG_INTERCHANGE_FORMAT_LENGTH => {
                (entry.tag, Cow::Owned(length_value(&entry.value, len)))
            }
            _ => (entry.tag, Cow::Borrowed(&entry.value)),
        })
        .collect();

    if let Some(len) = thumbnail_len {
        if directory.get(tags::JPEG_INTERCHANGE_FORMAT_LENGTH).is_none() {
            entries.push((
                tags::JPEG_INTERCHANGE_FORMAT_LENGTH,
                Cow::Owned(length_value(&TagValue::Long(0), len)),
            ));
            entries.sort_by_key(|(tag, _)| *tag);
        }
    }
    entries
}

/// Keep a Short length as Short when it fits
fn length_value(previous: &TagValue, len: usize) -> TagValue {
    match (previous, u16::try_from(len)) {
        (TagValue::Short(_), Ok(short)) => TagValue::Short(short),
        _ => TagValue::Long(len as u32),
    }
}

/// Out-of-line bytes an entry needs after its directory
fn payload_size(value: &TagValue) -> usize {
    match value {
        TagValue::SubIfd(structure) => structure_size(structure),
        TagValue::Thumbnail(bytes) => padded(bytes.len()),
        TagValue::MakerNote(note) => padded(note.encoded_len()),
        plain => match plain.count() * plain.field_type().byte_size() {
            len if len <= 4 => 0,
            len => padded(len),
        },
    }
}

fn block_size(entries: &[(u16, Cow<'_, TagValue>)]) -> usize {
    2 + entries.len() * ENTRY_SIZE
        + 4
        + entries
            .iter()
            .map(|(_, value)| payload_size(value))
            .sum::<usize>()
}

fn offset_from(pos: usize, base: usize) -> Result<u32> {
    u32::try_from(pos - base).map_err(|_| TagError::OffsetOverflow { size: pos })
}

/// Write every directory of `structure` at the writer's position, with
/// offsets relative to `base`
fn write_structure(
    writer: &mut ByteWriter,
    structure: &Structure,
    base: usize,
    endian: Endian,
) -> Result<()> {
    let directories = chain(structure);
    for (index, directory) in directories.iter().enumerate() {
        let entries = planned(directory);
        let block_start = writer.position();
        let block_end = block_start + block_size(&entries);
        let next = if index + 1 < directories.len() {
            offset_from(block_end, base)?
        } else {
            0
        };

        let count = u16::try_from(entries.len()).map_err(|_| TagError::InvalidEntry {
            tag: 0,
            reason: format!("{} entries do not fit one directory", entries.len()),
        })?;
        writer.write_u16(count, endian);

        let mut cursor = block_start + 2 + entries.len() * ENTRY_SIZE + 4;
        for (tag, value) in &entries {
            let wire_count = u32::try_from(value.count()).map_err(|_| TagError::InvalidEntry {
                tag: *tag,
                reason: format!("count {} does not fit 32 bits", value.count()),
            })?;
            writer.write_u16(*tag, endian);
            writer.write_u16(value.field_type() as u16, endian);
            writer.write_u32(wire_count, endian);

            let out_of_line = payload_size(value);
            match value.encode_payload(endian) {
                Some(mut inline) if out_of_line == 0 => {
                    inline.resize(4, 0);
                    writer.write_bytes(&inline);
                }
                _ => {
                    writer.write_u32(offset_from(cursor, base)?, endian);
                    cursor += out_of_line;
                }
            }
        }
        writer.write_u32(next, endian);

        for (tag, value) in &entries {
            write_payload(writer, *tag, value, base, endian)?;
        }
        debug_assert_eq!(writer.position(), block_end);
    }
    Ok(())
}

fn write_payload(
    writer: &mut ByteWriter,
    tag: u16,
    value: &TagValue,
    base: usize,
    endian: Endian,
) -> Result<()> {
    let start = writer.position();
    match value {
        TagValue::SubIfd(structure) => write_structure(writer, structure, base, endian)?,
        TagValue::Thumbnail(bytes) => {
            writer.write_bytes(bytes);
            writer.pad_from(start);
        }
        TagValue::MakerNote(note) => {
            write_maker_note(writer, note, base, endian)?;
            writer.pad_from(start);
        }
        plain => {
            if payload_size(plain) > 0 {
                let bytes = plain.encode_payload(endian).ok_or_else(|| TagError::InvalidEntry {
                    tag,
                    reason: "value has no wire form".to_string(),
                })?;
                writer.write_bytes(&bytes);
                writer.pad_from(start);
            }
        }
    }
    Ok(())
}

/// The source blob if it can be reused, else the header verbatim, whatever
/// the dialect regenerates, then the directory
fn write_maker_note(
    writer: &mut ByteWriter,
    note: &MakerNote,
    parent_base: usize,
    parent_endian: Endian,
) -> Result<()> {
    if let Some(bytes) = note.verbatim() {
        writer.write_bytes(bytes);
        return Ok(());
    }

    let start = writer.position();
    let endian = note.effective_endian(parent_endian);
    writer.write_bytes(&note.header);

    match note.dialect().layout {
        Layout::FileRelative => write_structure(writer, &note.structure, parent_base, endian),
        Layout::NoteRelative => write_structure(writer, &note.structure, start, endian),
        Layout::EmbeddedTiff => {
            let tiff_start = writer.position();
            TiffHeader::new(endian, TiffHeader::SIZE as u32).write(writer);
            write_structure(writer, &note.structure, tiff_start, endian)
        }
        Layout::OffsetPointer => {
            let directory = offset_from(writer.position() + 4, start)?;
            writer.write_u32(directory, Endian::Little);
            write_structure(writer, &note.structure, start, endian)
        }
    }
}
