// mediatag-core/src/lib.rs
//! Embedded image metadata: EXIF/TIFF tag directories and XMP packets
//!
//! This crate decodes and re-encodes the tag structures that image containers
//! embed: TIFF-style Image File Directories (the EXIF block of a JPEG APP1
//! segment, a whole TIFF header, vendor maker notes) and XMP RDF/XML packets.
//! Container handling (finding the segment or chunk) is left to the caller;
//! everything here works on in-memory byte slices.
//!
//! # Architecture
//!
//! - `header`, `reader`, `writer`: byte order and bounds-checked byte access
//! - `rational`, `entry`: wire types and the typed [`TagValue`] union
//! - `ifd`: [`Structure`] / [`Directory`] / [`IfdEntry`], the decoded tree
//! - `decode`, `encode`: the IFD codec, with sub-IFDs decoded recursively
//! - `makernote`: vendor maker-note detection and layout rules
//! - `xmp`: the XMP node tree with its parser and renderer
//! - `tags`: tag numbers and names per directory kind
//! - `config`, `error`: limits and the shared error type
//!
//! Decoding is lenient. Corrupt offsets, cycles and unknown types are
//! reported as warnings next to a partial result; only a bad TIFF header
//! or an output that cannot be laid out fails outright.
//!
//! # Basic Usage
//!
//! ```rust
//! use mediatag_core::{decode_tiff, encode_ifd, Endian, IfdEntry, Structure, Directory, tags};
//!
//! # fn main() -> mediatag_core::Result<()> {
//! let mut directory = Directory::new();
//! directory.insert(IfdEntry::new(tags::MAKE, "Canon"));
//! let mut structure = Structure::new();
//! structure.push(directory);
//!
//! let bytes = encode_ifd(&structure, Endian::Little)?;
//! let decoded = decode_tiff(&bytes)?;
//! assert!(decoded.warnings.is_empty());
//! assert_eq!(decoded.structure.make(), Some("Canon"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod decode;
pub mod encode;
pub mod entry;
pub mod error;
pub mod header;
pub mod ifd;
pub mod makernote;
pub mod rational;
pub mod reader;
pub mod tags;
pub mod writer;
pub mod xmp;

// Re-export commonly used types for convenience
pub use config::{DecodeConfig, EncodeConfig, XmpConfig};
pub use decode::{Decoded, IfdDecoder, decode_ifd, decode_tiff};
pub use encode::{IfdEncoder, encode_ifd};
pub use entry::{AsciiValue, CommentEncoding, FieldType, TagValue, UserComment};
pub use error::{Result, TagError};
pub use header::{Endian, TiffHeader};
pub use ifd::{Directory, IfdEntry, Structure};
pub use makernote::{MakerNote, MakerNoteVendor};
pub use rational::{Rational, SRational};
pub use tags::{IfdKind, Orientation, ResolutionUnit, tag_name};
pub use xmp::{NodeType, XmpNode, XmpTree, parse_xmp, render_xmp};
