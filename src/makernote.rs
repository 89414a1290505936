// mediatag-core/src/makernote.rs
//! Vendor maker-note dispatch
//!
//! Maker notes are IFD-shaped blobs whose header and offset base vary by
//! camera vendor. Dispatch is a table lookup: a signature prefix in the blob
//! picks a [`MakerNoteVendor`], falling back to the Make string for vendors
//! that write no signature. The vendor's [`Dialect`] then says how many
//! header bytes to skip, what offsets inside the note are relative to, and
//! which byte order applies. Everything after that is the generic directory
//! codec. Blobs that match nothing stay opaque Undefined bytes.

use log::debug;

use crate::encode::structure_size;
use crate::header::{Endian, TiffHeader};
use crate::ifd::Structure;
use crate::reader::ByteReader;

/// Largest entry count accepted for a maker-note directory
const MAX_ENTRIES: u16 = 512;

/// Wire type codes that can carry an offset
const LONG_TYPE: u16 = 4;
const IFD_TYPE: u16 = 13;

/// Camera vendor dialects that can be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MakerNoteVendor {
    /// No header, file-relative offsets (matched by Make)
    Canon,
    /// `Nikon\0\x01`: 8-byte header, file-relative offsets
    Nikon1,
    /// No header, file-relative offsets (matched by Make)
    Nikon2,
    /// `Nikon\0\x02`: 10-byte header and an embedded TIFF header
    Nikon3,
    /// `OLYMP\0`: 8-byte header, file-relative offsets
    Olympus1,
    /// `OLYMPUS\0II`: 12-byte header, offsets relative to the note
    Olympus2,
    /// `SONY DSC ` / `SONY CAM `: 12-byte header, file-relative offsets
    Sony,
    /// `Panasonic\0\0\0`: 12-byte header, file-relative offsets
    Panasonic,
    /// `AOC\0` plus byte-order marker: 6-byte header, file-relative offsets
    Pentax,
    /// `FUJIFILM` plus directory pointer, little-endian, offsets relative to the note
    Fujifilm,
}

/// What offsets inside a maker note are measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Directory follows the header; offsets use the parent structure's base
    FileRelative,
    /// Directory follows the header; offsets are relative to the note start
    NoteRelative,
    /// Header, then a TIFF header; offsets are relative to that TIFF header
    EmbeddedTiff,
    /// Header, then a little-endian u32 directory offset; offsets relative to the note
    OffsetPointer,
}

/// Where the byte order of a maker note comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderRule {
    /// Same as the parent structure
    Inherit,
    /// An "II"/"MM" marker at this offset in the header, else inherit
    Marker(usize),
    /// The embedded TIFF header
    Embedded,
    /// Always this order
    Fixed(Endian),
}

/// Decoding parameters of one vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Bytes at the start of the note that are kept verbatim
    pub header_len: usize,
    /// Offset base
    pub layout: Layout,
    /// Byte order source
    pub byte_order: ByteOrderRule,
}

impl Dialect {
    /// Bytes between the verbatim header and the directory that the encoder regenerates
    pub fn regenerated_len(&self) -> usize {
        match self.layout {
            Layout::EmbeddedTiff => TiffHeader::SIZE,
            Layout::OffsetPointer => 4,
            Layout::FileRelative | Layout::NoteRelative => 0,
        }
    }
}

impl MakerNoteVendor {
    /// Decoding parameters for this vendor
    pub fn dialect(self) -> Dialect {
        let (header_len, layout, byte_order) = match self {
            MakerNoteVendor::Canon | MakerNoteVendor::Nikon2 => {
                (0, Layout::FileRelative, ByteOrderRule::Inherit)
            }
            MakerNoteVendor::Nikon1 | MakerNoteVendor::Olympus1 => {
                (8, Layout::FileRelative, ByteOrderRule::Inherit)
            }
            MakerNoteVendor::Nikon3 => (10, Layout::EmbeddedTiff, ByteOrderRule::Embedded),
            MakerNoteVendor::Olympus2 => (12, Layout::NoteRelative, ByteOrderRule::Marker(8)),
            MakerNoteVendor::Sony | MakerNoteVendor::Panasonic => {
                (12, Layout::FileRelative, ByteOrderRule::Inherit)
            }
            MakerNoteVendor::Pentax => (6, Layout::FileRelative, ByteOrderRule::Marker(4)),
            MakerNoteVendor::Fujifilm => (
                8,
                Layout::OffsetPointer,
                ByteOrderRule::Fixed(Endian::Little),
            ),
        };
        Dialect {
            header_len,
            layout,
            byte_order,
        }
    }
}

/// Signature prefixes, checked in order (longer prefixes of a vendor first)
const SIGNATURES: &[(&[u8], MakerNoteVendor)] = &[
    (b"Nikon\0\x02", MakerNoteVendor::Nikon3),
    (b"Nikon\0\x01", MakerNoteVendor::Nikon1),
    (b"OLYMPUS\0", MakerNoteVendor::Olympus2),
    (b"OLYMP\0", MakerNoteVendor::Olympus1),
    (b"SONY DSC \0\0\0", MakerNoteVendor::Sony),
    (b"SONY CAM \0\0\0", MakerNoteVendor::Sony),
    (b"Panasonic\0\0\0", MakerNoteVendor::Panasonic),
    (b"AOC\0", MakerNoteVendor::Pentax),
    (b"FUJIFILM", MakerNoteVendor::Fujifilm),
];

/// Make prefixes (lowercase) for vendors that write no signature
const MAKES: &[(&str, MakerNoteVendor)] = &[
    ("canon", MakerNoteVendor::Canon),
    ("nikon", MakerNoteVendor::Nikon2),
];

/// Pick the vendor for a maker-note blob
///
/// Signatures win over the Make string. Returns `None` for unknown vendors.
pub fn detect(blob: &[u8], make: Option<&str>) -> Option<MakerNoteVendor> {
    if let Some(&(_, vendor)) = SIGNATURES.iter().find(|(sig, _)| blob.starts_with(sig)) {
        return Some(vendor);
    }
    let make = make?.trim().to_ascii_lowercase();
    MAKES
        .iter()
        .find(|(prefix, _)| make.starts_with(prefix))
        .map(|&(_, vendor)| vendor)
}

/// A maker note decoded through its vendor dialect
///
/// A decoded note also keeps the blob it was read from. As long as the
/// directory is left alone and the layout does not depend on where the note
/// lands in the file, the encoder writes that blob back byte for byte, so
/// data the directory does not reference survives.
#[derive(Debug, Clone)]
pub struct MakerNote {
    /// Vendor the note was classified as
    pub vendor: MakerNoteVendor,
    /// Verbatim header bytes preceding the directory
    pub header: Vec<u8>,
    /// Byte order of the note's directory
    pub endian: Endian,
    /// The note's directory
    pub structure: Structure,
    source: Option<Source>,
}

#[derive(Debug, Clone)]
struct Source {
    bytes: Vec<u8>,
    vendor: MakerNoteVendor,
    endian: Endian,
    structure: Structure,
}

/// Notes are equal when their decoded content is; the source blob is not compared
impl PartialEq for MakerNote {
    fn eq(&self, other: &Self) -> bool {
        self.vendor == other.vendor
            && self.header == other.header
            && self.endian == other.endian
            && self.structure == other.structure
    }
}

impl MakerNote {
    /// Note built in memory, always laid out from `structure`
    pub fn new(vendor: MakerNoteVendor, header: Vec<u8>, endian: Endian, structure: Structure) -> Self {
        Self {
            vendor,
            header,
            endian,
            structure,
            source: None,
        }
    }

    pub(crate) fn decoded(placement: Placement, structure: Structure, bytes: &[u8]) -> Self {
        Self {
            source: Some(Source {
                bytes: bytes.to_vec(),
                vendor: placement.vendor,
                endian: placement.endian,
                structure: structure.clone(),
            }),
            ..Self::new(placement.vendor, placement.header, placement.endian, structure)
        }
    }

    /// Decoding parameters of this note's vendor
    pub fn dialect(&self) -> Dialect {
        self.vendor.dialect()
    }

    /// The blob this note was decoded from, if any
    pub fn raw(&self) -> Option<&[u8]> {
        self.source.as_ref().map(|source| source.bytes.as_slice())
    }

    /// Source blob, when it can be written back unchanged
    pub(crate) fn verbatim(&self) -> Option<&[u8]> {
        let source = self.source.as_ref()?;
        let relocatable = self.dialect().layout != Layout::FileRelative;
        let unchanged = source.structure == self.structure
            && source.vendor == self.vendor
            && source.endian == self.endian
            && source.bytes.starts_with(&self.header)
            && self.header.len() == self.dialect().header_len;
        (relocatable && unchanged).then_some(source.bytes.as_slice())
    }

    /// Byte order to encode with when the parent uses `parent`
    pub fn effective_endian(&self, parent: Endian) -> Endian {
        match self.dialect().byte_order {
            ByteOrderRule::Inherit => parent,
            _ => self.endian,
        }
    }

    /// Total size of the note on the wire
    pub fn encoded_len(&self) -> usize {
        match self.verbatim() {
            Some(bytes) => bytes.len(),
            None => {
                self.header.len() + self.dialect().regenerated_len() + structure_size(&self.structure)
            }
        }
    }
}

/// Where a maker note's directory lives, as computed by [`locate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub vendor: MakerNoteVendor,
    pub header: Vec<u8>,
    pub endian: Endian,
    /// Absolute buffer position offsets inside the note are added to
    pub base: usize,
    /// Directory offset relative to `base`
    pub ifd_offset: u32,
}

/// Classify a maker-note blob and compute where its directory is
///
/// `blob_pos` is the absolute position of the blob inside `data`. Returns
/// `None` when the vendor is unknown, when the blob does not look like the
/// dialect it claims to be, or when an entry holds an offset into the note
/// that re-encoding the directory would leave stale.
pub(crate) fn locate(
    data: &[u8],
    blob_pos: usize,
    blob_len: usize,
    parent_base: usize,
    parent_endian: Endian,
    make: Option<&str>,
) -> Option<Placement> {
    let reader = ByteReader::new(data);
    let blob = reader.read_bytes_at(blob_pos, blob_len).ok()?;
    let vendor = detect(blob, make)?;
    let dialect = vendor.dialect();
    if blob.len() < dialect.header_len + dialect.regenerated_len() {
        debug!("{vendor:?} maker note too short ({} bytes)", blob.len());
        return None;
    }
    let header = blob[..dialect.header_len].to_vec();

    let (endian, base, ifd_offset) = match dialect.layout {
        Layout::FileRelative => {
            let endian = header_endian(blob, dialect.byte_order, parent_endian);
            let directory = blob_pos + dialect.header_len;
            (endian, parent_base, u32::try_from(directory - parent_base).ok()?)
        }
        Layout::NoteRelative => {
            let endian = header_endian(blob, dialect.byte_order, parent_endian);
            (endian, blob_pos, dialect.header_len as u32)
        }
        Layout::EmbeddedTiff => {
            let tiff = TiffHeader::parse(&blob[dialect.header_len..]).ok()?;
            (tiff.endian, blob_pos + dialect.header_len, tiff.ifd_offset)
        }
        Layout::OffsetPointer => {
            let endian = header_endian(blob, dialect.byte_order, parent_endian);
            let at = dialect.header_len;
            let pointer = Endian::Little.read_u32([blob[at], blob[at + 1], blob[at + 2], blob[at + 3]]);
            (endian, blob_pos, pointer)
        }
    };

    let directory = base + ifd_offset as usize;
    if !plausible_directory(&reader, directory, endian) {
        debug!("{vendor:?} maker note directory is not plausible, keeping it opaque");
        return None;
    }
    let note = blob_pos..blob_pos + blob_len;
    if let Some(tag) = internal_pointer(&reader, directory, base, note, endian) {
        debug!("{vendor:?} maker note tag {tag:#06x} points into the note, keeping it opaque");
        return None;
    }

    debug!("maker note dispatched as {vendor:?} ({endian:?}, base {base})");
    Some(Placement {
        vendor,
        header,
        endian,
        base,
        ifd_offset,
    })
}

fn header_endian(blob: &[u8], rule: ByteOrderRule, parent: Endian) -> Endian {
    match rule {
        ByteOrderRule::Fixed(endian) => endian,
        ByteOrderRule::Marker(at) => blob
            .get(at..at + 2)
            .and_then(|marker| Endian::from_marker(marker).ok())
            .unwrap_or(parent),
        ByteOrderRule::Inherit | ByteOrderRule::Embedded => parent,
    }
}

/// Non-empty entry count within bounds, and the whole entry table inside the buffer
fn plausible_directory(reader: &ByteReader<'_>, pos: usize, endian: Endian) -> bool {
    match reader.read_u16_at(pos, endian) {
        Ok(count) if (1..=MAX_ENTRIES).contains(&count) => {
            reader.contains(pos + 2, count as usize * 12)
        }
        _ => false,
    }
}

/// First entry that points into the note: an IFD-typed entry, or a single
/// LONG whose target inside the note reads as a directory
fn internal_pointer(
    reader: &ByteReader<'_>,
    directory: usize,
    base: usize,
    note: std::ops::Range<usize>,
    endian: Endian,
) -> Option<u16> {
    let count = reader.read_u16_at(directory, endian).ok()?;
    (0..count as usize).find_map(|index| {
        let pos = directory + 2 + index * 12;
        let tag = reader.read_u16_at(pos, endian).ok()?;
        let type_code = reader.read_u16_at(pos + 2, endian).ok()?;
        let value_count = reader.read_u32_at(pos + 4, endian).ok()?;
        let value = reader.read_u32_at(pos + 8, endian).ok()?;
        let target = base.checked_add(value as usize)?;
        let pointer = match type_code {
            IFD_TYPE => true,
            LONG_TYPE => {
                value_count == 1
                    && value != 0
                    && target != directory
                    && note.contains(&target)
                    && plausible_directory(reader, target, endian)
            }
            _ => false,
        };
        pointer.then_some(tag)
    })
}
