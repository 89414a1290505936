// mediatag-core/src/ifd.rs
//! Image File Directory structures
//!
//! A [`Structure`] is the ordered chain of directories found by following
//! next-IFD links (index 0 is the primary image, index 1 usually the
//! thumbnail). Each [`Directory`] maps tag ids to entries; nested
//! directories (Exif, GPS, Interop, maker notes) are owned by the entry that
//! points at them, so the whole thing is a tree.

use std::collections::BTreeMap;

use crate::entry::TagValue;
use crate::tags::{self, Orientation, ResolutionUnit};

/// One tag of a directory
#[derive(Debug, Clone, PartialEq)]
pub struct IfdEntry {
    /// The tag identifier
    pub tag: u16,
    /// The decoded value
    pub value: TagValue,
}

impl IfdEntry {
    /// Create an entry
    pub fn new(tag: u16, value: impl Into<TagValue>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

/// A single directory: tag id to entry, iterated in ascending tag order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Directory {
    entries: BTreeMap<u16, IfdEntry>,
}

impl Directory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an entry by tag number
    pub fn get(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.get(&tag)
    }

    /// Find an entry by tag number for modification
    pub fn get_mut(&mut self, tag: u16) -> Option<&mut IfdEntry> {
        self.entries.get_mut(&tag)
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, entry: IfdEntry) -> Option<IfdEntry> {
        self.entries.insert(entry.tag, entry)
    }

    /// Remove an entry by tag number
    pub fn remove(&mut self, tag: u16) -> Option<IfdEntry> {
        self.entries.remove(&tag)
    }

    /// Entries in ascending tag order
    pub fn entries(&self) -> impl Iterator<Item = &IfdEntry> {
        self.entries.values()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the directory is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A chain of directories decoded from (or destined for) one tag segment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Structure {
    directories: Vec<Directory>,
}

impl Structure {
    /// Create a structure without directories
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory to the chain
    pub fn push(&mut self, directory: Directory) {
        self.directories.push(directory);
    }

    /// Get a directory by chain index
    pub fn directory(&self, index: usize) -> Option<&Directory> {
        self.directories.get(index)
    }

    /// Get a directory by chain index for modification
    pub fn directory_mut(&mut self, index: usize) -> Option<&mut Directory> {
        self.directories.get_mut(index)
    }

    /// All directories in chain order
    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    /// Get the number of directories
    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Check if there are no directories
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Look up the entry for `tag` in directory `index`
    pub fn get_entry(&self, index: usize, tag: u16) -> Option<&IfdEntry> {
        self.directory(index)?.get(tag)
    }

    /// Look up the entry for `tag` in directory `index` for modification
    pub fn get_entry_mut(&mut self, index: usize, tag: u16) -> Option<&mut IfdEntry> {
        self.directory_mut(index)?.get_mut(tag)
    }

    /// Insert or replace the entry for `tag` in directory `index`
    ///
    /// The wire type follows from the value's Rust type. Missing directories
    /// up to `index` are created empty. Returns the replaced entry.
    pub fn set_entry(
        &mut self,
        index: usize,
        tag: u16,
        value: impl Into<TagValue>,
    ) -> Option<IfdEntry> {
        if self.directories.len() <= index {
            self.directories.resize_with(index + 1, Directory::new);
        }
        self.directories[index].insert(IfdEntry::new(tag, value))
    }

    /// Remove the entry for `tag` in directory `index`
    pub fn remove_entry(&mut self, index: usize, tag: u16) -> Option<IfdEntry> {
        self.directory_mut(index)?.remove(tag)
    }

    /// Every `(directory index, entry)` pair, directories in chain order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &IfdEntry)> {
        self.directories
            .iter()
            .enumerate()
            .flat_map(|(index, dir)| dir.entries().map(move |entry| (index, entry)))
    }

    /// Nested structure owned by the entry for `tag` in directory `index`
    pub fn sub_structure(&self, index: usize, tag: u16) -> Option<&Structure> {
        self.get_entry(index, tag)?.value.as_structure()
    }

    // =============================================================================
    // Typed helpers for common tags of the primary directory
    // =============================================================================

    /// Exif sub-IFD of the primary image
    pub fn exif(&self) -> Option<&Structure> {
        self.sub_structure(0, tags::EXIF_IFD)
    }

    /// GPS sub-IFD of the primary image
    pub fn gps(&self) -> Option<&Structure> {
        self.sub_structure(0, tags::GPS_IFD)
    }

    /// Interoperability sub-IFD, found inside the Exif sub-IFD
    pub fn interop(&self) -> Option<&Structure> {
        self.exif()?.sub_structure(0, tags::INTEROP_IFD)
    }

    /// Camera manufacturer
    pub fn make(&self) -> Option<&str> {
        self.get_entry(0, tags::MAKE)?.value.as_str()
    }

    /// Camera model
    pub fn model(&self) -> Option<&str> {
        self.get_entry(0, tags::MODEL)?.value.as_str()
    }

    /// Image orientation
    pub fn orientation(&self) -> Option<Orientation> {
        self.get_entry(0, tags::ORIENTATION)?
            .value
            .as_u32()
            .and_then(Orientation::from_u32)
    }

    /// Unit of the resolution tags
    pub fn resolution_unit(&self) -> Option<ResolutionUnit> {
        self.get_entry(0, tags::RESOLUTION_UNIT)?
            .value
            .as_u32()
            .and_then(ResolutionUnit::from_u32)
    }

    /// Embedded JPEG thumbnail from the first directory that carries one
    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.directories.iter().find_map(|dir| match dir.get(tags::JPEG_INTERCHANGE_FORMAT) {
            Some(IfdEntry {
                value: TagValue::Thumbnail(bytes),
                ..
            }) => Some(bytes.as_slice()),
            _ => None,
        })
    }
}
