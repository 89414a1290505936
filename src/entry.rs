// mediatag-core/src/entry.rs
//! IFD entry values
//!
//! Every entry in a directory owns one [`TagValue`]. The enum is closed over
//! the TIFF wire types plus the structural variants (sub-IFDs, thumbnails,
//! maker notes) so encode and decode are exhaustive matches. The wire count
//! is always derived from the current value, never stored.

use log::debug;

use crate::header::Endian;
use crate::ifd::Structure;
use crate::makernote::MakerNote;
use crate::rational::{Rational, SRational};

/// Data types used in TIFF tags
///
/// These correspond to the field_type values in IFD entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// 8-bit unsigned integer
    Byte = 1,
    /// ASCII string (null-terminated)
    Ascii = 2,
    /// 16-bit unsigned integer
    Short = 3,
    /// 32-bit unsigned integer
    Long = 4,
    /// Rational (two longs: numerator, denominator)
    Rational = 5,
    /// 8-bit signed integer
    SByte = 6,
    /// Undefined (8-bit byte that can contain anything)
    Undefined = 7,
    /// 16-bit signed integer
    SShort = 8,
    /// 32-bit signed integer
    SLong = 9,
    /// Signed rational (two slongs)
    SRational = 10,
    /// 32-bit IEEE floating point
    Float = 11,
    /// 64-bit IEEE floating point
    Double = 12,
}

impl FieldType {
    /// Convert a wire type code; 13 (IFD) is read as Long
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 | 13 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Get the size in bytes of one element of this type
    pub fn byte_size(self) -> usize {
        match self {
            FieldType::Byte | FieldType::SByte | FieldType::Ascii | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }
}

/// NUL-terminated ASCII value that remembers how it was read
///
/// Some writers reserve fixed-width fields padded with NULs, others pack
/// several strings into one entry or store Latin-1 text. Decoded values keep
/// their wire bytes and write them back unchanged until the text is replaced;
/// a replaced text keeps the padding width and simply grows past it.
/// Equality compares wire bytes.
#[derive(Debug, Clone, Default)]
pub struct AsciiValue {
    text: String,
    width: usize,
    raw: Option<Vec<u8>>,
}

impl AsciiValue {
    /// New value encoded as its bytes plus one NUL
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: 0,
            raw: None,
        }
    }

    /// New value padded with NULs to at least `width` bytes
    pub fn with_width(text: impl Into<String>, width: usize) -> Self {
        let text = text.into();
        let width = if width > text.len() + 1 { width } else { 0 };
        Self {
            text,
            width,
            raw: None,
        }
    }

    /// Decode `count` raw bytes; the text stops at the first NUL
    pub fn decode(data: &[u8]) -> Self {
        let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        let text = String::from_utf8_lossy(&data[..end]).into_owned();
        Self {
            raw: Some(data.to_vec()),
            ..Self::with_width(text, data.len())
        }
    }

    /// The first string, without terminator or padding
    ///
    /// Bytes that are not UTF-8 show up as U+FFFD here; [`encode`](Self::encode)
    /// still returns them as read.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Every NUL-separated string in the value, empty padding skipped
    pub fn strings(&self) -> Vec<String> {
        self.encode()
            .split(|&b| b == 0)
            .filter(|part| !part.is_empty())
            .map(|part| String::from_utf8_lossy(part).into_owned())
            .collect()
    }

    /// Wire bytes as decoded, if the text has not been replaced since
    pub fn raw(&self) -> Option<&[u8]> {
        self.raw.as_deref()
    }

    /// Replace the text, keeping any padding width
    pub fn set_text(&mut self, text: impl Into<String>) {
        *self = Self::with_width(text, self.width);
    }

    /// Number of bytes on the wire, terminator and padding included
    pub fn encoded_len(&self) -> usize {
        match &self.raw {
            Some(raw) => raw.len(),
            None => self.width.max(self.text.len() + 1),
        }
    }

    /// Wire bytes: the decoded bytes, or text, NUL and padding up to the width
    pub fn encode(&self) -> Vec<u8> {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(self.text.as_bytes());
        bytes.resize(self.encoded_len(), 0);
        bytes
    }
}

impl PartialEq for AsciiValue {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for AsciiValue {}

/// Character set announced by the 8-byte UserComment prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentEncoding {
    /// `ASCII\0\0\0`
    Ascii,
    /// `UNICODE\0`, UTF-16 in the structure's byte order
    Unicode,
    /// `JIS\0\0\0\0\0`
    Jis,
    /// Eight NUL bytes
    Undefined,
}

impl CommentEncoding {
    /// The 8-byte prefix written before the comment text
    pub fn prefix(self) -> [u8; 8] {
        match self {
            CommentEncoding::Ascii => *b"ASCII\0\0\0",
            CommentEncoding::Unicode => *b"UNICODE\0",
            CommentEncoding::Jis => *b"JIS\0\0\0\0\0",
            CommentEncoding::Undefined => [0; 8],
        }
    }

    /// Recognize a prefix; unknown prefixes return `None`
    pub fn from_prefix(prefix: &[u8]) -> Option<Self> {
        [
            CommentEncoding::Ascii,
            CommentEncoding::Unicode,
            CommentEncoding::Jis,
            CommentEncoding::Undefined,
        ]
        .into_iter()
        .find(|encoding| prefix == encoding.prefix())
    }
}

/// Decoded Exif UserComment (tag 0x9286)
///
/// JIS and undefined payloads are read as lossy UTF-8 and written back as
/// UTF-8; no JIS transcoding is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserComment {
    /// Character set of the payload
    pub encoding: CommentEncoding,
    /// Comment text without trailing NULs
    pub text: String,
}

impl UserComment {
    /// Comment with an explicit character set
    pub fn new(encoding: CommentEncoding, text: impl Into<String>) -> Self {
        Self {
            encoding,
            text: text.into(),
        }
    }

    /// ASCII comment
    pub fn ascii(text: impl Into<String>) -> Self {
        Self::new(CommentEncoding::Ascii, text)
    }

    /// UTF-16 comment
    pub fn unicode(text: impl Into<String>) -> Self {
        Self::new(CommentEncoding::Unicode, text)
    }

    /// Decode raw UserComment bytes; `None` when the prefix is missing or unknown
    pub fn decode(data: &[u8], endian: Endian) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }
        let encoding = CommentEncoding::from_prefix(&data[..8])?;
        let payload = &data[8..];
        let text = match encoding {
            CommentEncoding::Unicode => decode_utf16(payload, endian),
            _ => String::from_utf8_lossy(payload).into_owned(),
        };
        Some(Self::new(encoding, text.trim_end_matches('\0')))
    }

    /// Wire bytes: prefix then payload
    pub fn encode(&self, endian: Endian) -> Vec<u8> {
        let mut bytes = self.encoding.prefix().to_vec();
        match self.encoding {
            CommentEncoding::Unicode => {
                for unit in self.text.encode_utf16() {
                    bytes.extend_from_slice(&endian.write_u16(unit));
                }
            }
            _ => bytes.extend_from_slice(self.text.as_bytes()),
        }
        bytes
    }
}

fn decode_utf16(payload: &[u8], endian: Endian) -> String {
    // A BOM overrides the structure's byte order
    let (endian, payload) = match payload {
        [0xFE, 0xFF, rest @ ..] => (Endian::Big, rest),
        [0xFF, 0xFE, rest @ ..] => (Endian::Little, rest),
        _ => (endian, payload),
    };
    let units = payload
        .chunks_exact(2)
        .map(|pair| endian.read_u16([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// The value stored in an IFD entry
///
/// Single values decode to the scalar variants and anything with a count
/// other than one to the array variants, so a one-element array read back
/// from the wire becomes a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Unsigned 8-bit integer
    Byte(u8),
    /// ASCII string
    Ascii(AsciiValue),
    /// Unsigned 16-bit integer
    Short(u16),
    /// Unsigned 32-bit integer
    Long(u32),
    /// Unsigned fraction
    Rational(Rational),
    /// Signed 8-bit integer
    SByte(i8),
    /// Raw bytes of wire type 7 (also used for unknown type codes)
    Undefined(Vec<u8>),
    /// Signed 16-bit integer
    SShort(i16),
    /// Signed 32-bit integer
    SLong(i32),
    /// Signed fraction
    SRational(SRational),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// Unsigned 8-bit integers
    ByteVector(Vec<u8>),
    /// Unsigned 16-bit integers
    ShortArray(Vec<u16>),
    /// Unsigned 32-bit integers
    LongArray(Vec<u32>),
    /// Unsigned fractions
    RationalArray(Vec<Rational>),
    /// Signed 8-bit integers
    SByteArray(Vec<i8>),
    /// Signed 16-bit integers
    SShortArray(Vec<i16>),
    /// Signed 32-bit integers
    SLongArray(Vec<i32>),
    /// Signed fractions
    SRationalArray(Vec<SRational>),
    /// 32-bit floats
    FloatArray(Vec<f32>),
    /// 64-bit floats
    DoubleArray(Vec<f64>),
    /// Exif UserComment with character set
    UserComment(UserComment),
    /// Nested directory chain reached through a pointer tag
    SubIfd(Structure),
    /// JPEG thumbnail bytes (tag 0x0201 with its 0x0202 length)
    Thumbnail(Vec<u8>),
    /// Vendor maker note decoded through its dialect
    MakerNote(MakerNote),
}

fn read_u16s(data: &[u8], endian: Endian) -> impl Iterator<Item = u16> + '_ {
    data.chunks_exact(2).map(move |b| endian.read_u16([b[0], b[1]]))
}

fn read_u32s(data: &[u8], endian: Endian) -> impl Iterator<Item = u32> + '_ {
    data.chunks_exact(4)
        .map(move |b| endian.read_u32([b[0], b[1], b[2], b[3]]))
}

fn read_u64s(data: &[u8], endian: Endian) -> impl Iterator<Item = u64> + '_ {
    data.chunks_exact(8).map(move |b| {
        endian.read_u64([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
    })
}

fn read_pairs(data: &[u8], endian: Endian) -> impl Iterator<Item = (u32, u32)> + '_ {
    data.chunks_exact(8).map(move |b| {
        (
            endian.read_u32([b[0], b[1], b[2], b[3]]),
            endian.read_u32([b[4], b[5], b[6], b[7]]),
        )
    })
}

fn scalar_or_array<T: Copy>(
    values: Vec<T>,
    scalar: fn(T) -> TagValue,
    array: fn(Vec<T>) -> TagValue,
) -> TagValue {
    if values.len() == 1 {
        scalar(values[0])
    } else {
        array(values)
    }
}

impl TagValue {
    /// Decode a plain value of `field_type` from its wire bytes
    ///
    /// `data` holds `count * field_type.byte_size()` bytes; a trailing
    /// partial element is ignored.
    pub fn decode(field_type: FieldType, data: &[u8], endian: Endian) -> TagValue {
        match field_type {
            FieldType::Byte => scalar_or_array(data.to_vec(), TagValue::Byte, TagValue::ByteVector),
            FieldType::Ascii => TagValue::Ascii(AsciiValue::decode(data)),
            FieldType::Short => scalar_or_array(
                read_u16s(data, endian).collect(),
                TagValue::Short,
                TagValue::ShortArray,
            ),
            FieldType::Long => scalar_or_array(
                read_u32s(data, endian).collect(),
                TagValue::Long,
                TagValue::LongArray,
            ),
            FieldType::Rational => scalar_or_array(
                read_pairs(data, endian).map(Rational::from).collect(),
                TagValue::Rational,
                TagValue::RationalArray,
            ),
            FieldType::SByte => scalar_or_array(
                data.iter().map(|&b| b as i8).collect(),
                TagValue::SByte,
                TagValue::SByteArray,
            ),
            FieldType::Undefined => TagValue::Undefined(data.to_vec()),
            FieldType::SShort => scalar_or_array(
                read_u16s(data, endian).map(|v| v as i16).collect(),
                TagValue::SShort,
                TagValue::SShortArray,
            ),
            FieldType::SLong => scalar_or_array(
                read_u32s(data, endian).map(|v| v as i32).collect(),
                TagValue::SLong,
                TagValue::SLongArray,
            ),
            FieldType::SRational => scalar_or_array(
                read_pairs(data, endian)
                    .map(|(n, d)| SRational::new(n as i32, d as i32))
                    .collect(),
                TagValue::SRational,
                TagValue::SRationalArray,
            ),
            FieldType::Float => scalar_or_array(
                read_u32s(data, endian).map(f32::from_bits).collect(),
                TagValue::Float,
                TagValue::FloatArray,
            ),
            FieldType::Double => scalar_or_array(
                read_u64s(data, endian).map(f64::from_bits).collect(),
                TagValue::Double,
                TagValue::DoubleArray,
            ),
        }
    }

    /// Zero-length placeholder of `field_type`, used when the data is unreachable
    pub fn empty(field_type: FieldType) -> TagValue {
        debug!("placeholder value for unreachable {field_type:?} data");
        match field_type {
            FieldType::Byte => TagValue::ByteVector(Vec::new()),
            FieldType::Ascii => TagValue::Ascii(AsciiValue::default()),
            FieldType::Short => TagValue::ShortArray(Vec::new()),
            FieldType::Long => TagValue::LongArray(Vec::new()),
            FieldType::Rational => TagValue::RationalArray(Vec::new()),
            FieldType::SByte => TagValue::SByteArray(Vec::new()),
            FieldType::Undefined => TagValue::Undefined(Vec::new()),
            FieldType::SShort => TagValue::SShortArray(Vec::new()),
            FieldType::SLong => TagValue::SLongArray(Vec::new()),
            FieldType::SRational => TagValue::SRationalArray(Vec::new()),
            FieldType::Float => TagValue::FloatArray(Vec::new()),
            FieldType::Double => TagValue::DoubleArray(Vec::new()),
        }
    }

    /// Wire type this value is written with
    pub fn field_type(&self) -> FieldType {
        match self {
            TagValue::Byte(_) | TagValue::ByteVector(_) => FieldType::Byte,
            TagValue::Ascii(_) => FieldType::Ascii,
            TagValue::Short(_) | TagValue::ShortArray(_) => FieldType::Short,
            TagValue::Long(_)
            | TagValue::LongArray(_)
            | TagValue::SubIfd(_)
            | TagValue::Thumbnail(_) => FieldType::Long,
            TagValue::Rational(_) | TagValue::RationalArray(_) => FieldType::Rational,
            TagValue::SByte(_) | TagValue::SByteArray(_) => FieldType::SByte,
            TagValue::Undefined(_) | TagValue::UserComment(_) | TagValue::MakerNote(_) => {
                FieldType::Undefined
            }
            TagValue::SShort(_) | TagValue::SShortArray(_) => FieldType::SShort,
            TagValue::SLong(_) | TagValue::SLongArray(_) => FieldType::SLong,
            TagValue::SRational(_) | TagValue::SRationalArray(_) => FieldType::SRational,
            TagValue::Float(_) | TagValue::FloatArray(_) => FieldType::Float,
            TagValue::Double(_) | TagValue::DoubleArray(_) => FieldType::Double,
        }
    }

    /// Wire count, recomputed from the current value
    pub fn count(&self) -> usize {
        match self {
            TagValue::Byte(_)
            | TagValue::Short(_)
            | TagValue::Long(_)
            | TagValue::Rational(_)
            | TagValue::SByte(_)
            | TagValue::SShort(_)
            | TagValue::SLong(_)
            | TagValue::SRational(_)
            | TagValue::Float(_)
            | TagValue::Double(_)
            | TagValue::SubIfd(_)
            | TagValue::Thumbnail(_) => 1,
            TagValue::Ascii(a) => a.encoded_len(),
            TagValue::Undefined(v) | TagValue::ByteVector(v) => v.len(),
            TagValue::ShortArray(v) => v.len(),
            TagValue::LongArray(v) => v.len(),
            TagValue::RationalArray(v) => v.len(),
            TagValue::SByteArray(v) => v.len(),
            TagValue::SShortArray(v) => v.len(),
            TagValue::SLongArray(v) => v.len(),
            TagValue::SRationalArray(v) => v.len(),
            TagValue::FloatArray(v) => v.len(),
            TagValue::DoubleArray(v) => v.len(),
            // Prefix plus payload; UTF-16 length does not depend on byte order
            TagValue::UserComment(c) => c.encode(Endian::Little).len(),
            TagValue::MakerNote(m) => m.encoded_len(),
        }
    }

    /// Wire bytes of a plain value
    ///
    /// Returns `None` for the structural variants (sub-IFDs, thumbnails and
    /// maker notes), whose bytes depend on where the encoder places them.
    pub fn encode_payload(&self, endian: Endian) -> Option<Vec<u8>> {
        fn each<T: Copy, const N: usize>(values: &[T], f: impl Fn(T) -> [u8; N]) -> Vec<u8> {
            values.iter().flat_map(|&v| f(v)).collect()
        }
        let rational = |r: Rational| {
            let mut out = [0u8; 8];
            out[..4].copy_from_slice(&endian.write_u32(r.numerator));
            out[4..].copy_from_slice(&endian.write_u32(r.denominator));
            out
        };
        let srational = |r: SRational| {
            rational(Rational::new(r.numerator as u32, r.denominator as u32))
        };

        let bytes = match self {
            TagValue::Byte(v) => vec![*v],
            TagValue::Ascii(a) => a.encode(),
            TagValue::Short(v) => endian.write_u16(*v).to_vec(),
            TagValue::Long(v) => endian.write_u32(*v).to_vec(),
            TagValue::Rational(r) => rational(*r).to_vec(),
            TagValue::SByte(v) => vec![*v as u8],
            TagValue::Undefined(v) | TagValue::ByteVector(v) => v.clone(),
            TagValue::SShort(v) => endian.write_u16(*v as u16).to_vec(),
            TagValue::SLong(v) => endian.write_u32(*v as u32).to_vec(),
            TagValue::SRational(r) => srational(*r).to_vec(),
            TagValue::Float(v) => endian.write_u32(v.to_bits()).to_vec(),
            TagValue::Double(v) => endian.write_u64(v.to_bits()).to_vec(),
            TagValue::ShortArray(v) => each(v, |x| endian.write_u16(x)),
            TagValue::LongArray(v) => each(v, |x| endian.write_u32(x)),
            TagValue::RationalArray(v) => each(v, rational),
            TagValue::SByteArray(v) => v.iter().map(|&x| x as u8).collect(),
            TagValue::SShortArray(v) => each(v, |x| endian.write_u16(x as u16)),
            TagValue::SLongArray(v) => each(v, |x| endian.write_u32(x as u32)),
            TagValue::SRationalArray(v) => each(v, srational),
            TagValue::FloatArray(v) => each(v, |x| endian.write_u32(x.to_bits())),
            TagValue::DoubleArray(v) => each(v, |x| endian.write_u64(x.to_bits())),
            TagValue::UserComment(c) => c.encode(endian),
            TagValue::SubIfd(_) | TagValue::Thumbnail(_) | TagValue::MakerNote(_) => return None,
        };
        Some(bytes)
    }

    // =============================================================================
    // Typed accessors
    // =============================================================================

    /// Try to get the first value as a u32
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Byte(v) => Some(*v as u32),
            TagValue::Short(v) => Some(*v as u32),
            TagValue::Long(v) => Some(*v),
            TagValue::ByteVector(v) => v.first().map(|&x| x as u32),
            TagValue::ShortArray(v) => v.first().map(|&x| x as u32),
            TagValue::LongArray(v) => v.first().copied(),
            _ => None,
        }
    }

    /// Try to get the first value as a u16
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            TagValue::Byte(v) => Some(*v as u16),
            TagValue::Short(v) => Some(*v),
            TagValue::ShortArray(v) => v.first().copied(),
            _ => None,
        }
    }

    /// Try to get the first value as an i32 (signed types only)
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            TagValue::SByte(v) => Some(*v as i32),
            TagValue::SShort(v) => Some(*v as i32),
            TagValue::SLong(v) => Some(*v),
            TagValue::SShortArray(v) => v.first().map(|&x| x as i32),
            TagValue::SLongArray(v) => v.first().copied(),
            _ => None,
        }
    }

    /// Try to get every value as u32s
    pub fn as_u32_vec(&self) -> Option<Vec<u32>> {
        match self {
            TagValue::Short(v) => Some(vec![*v as u32]),
            TagValue::Long(v) => Some(vec![*v]),
            TagValue::ShortArray(v) => Some(v.iter().map(|&x| x as u32).collect()),
            TagValue::LongArray(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(a) => Some(a.as_str()),
            TagValue::UserComment(c) => Some(&c.text),
            _ => None,
        }
    }

    /// Try to get the first unsigned fraction
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            TagValue::Rational(r) => Some(*r),
            TagValue::RationalArray(v) => v.first().copied(),
            _ => None,
        }
    }

    /// Try to get the first value as f64
    ///
    /// Fractions with a zero denominator yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Float(v) => Some(*v as f64),
            TagValue::Double(v) => Some(*v),
            TagValue::FloatArray(v) => v.first().map(|&x| x as f64),
            TagValue::DoubleArray(v) => v.first().copied(),
            TagValue::Rational(r) if r.is_valid() => Some(r.to_f64()),
            TagValue::SRational(r) if r.is_valid() => Some(r.to_f64()),
            TagValue::RationalArray(v) => v.first().filter(|r| r.is_valid()).map(|r| r.to_f64()),
            TagValue::SRationalArray(v) => {
                v.first().filter(|r| r.is_valid()).map(|r| r.to_f64())
            }
            _ => None,
        }
    }

    /// Raw bytes of Undefined/Byte values and thumbnails
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Undefined(v) | TagValue::ByteVector(v) | TagValue::Thumbnail(v) => Some(v),
            _ => None,
        }
    }

    /// Nested structure of a sub-IFD or parsed maker note
    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            TagValue::SubIfd(s) => Some(s),
            TagValue::MakerNote(m) => Some(&m.structure),
            _ => None,
        }
    }

    /// Mutable nested structure of a sub-IFD or parsed maker note
    pub fn as_structure_mut(&mut self) -> Option<&mut Structure> {
        match self {
            TagValue::SubIfd(s) => Some(s),
            TagValue::MakerNote(m) => Some(&mut m.structure),
            _ => None,
        }
    }

    /// Parsed maker note
    pub fn as_maker_note(&self) -> Option<&MakerNote> {
        match self {
            TagValue::MakerNote(m) => Some(m),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for TagValue {
                fn from(value: $source) -> Self {
                    TagValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    u8 => Byte,
    u16 => Short,
    u32 => Long,
    i8 => SByte,
    i16 => SShort,
    i32 => SLong,
    f32 => Float,
    f64 => Double,
    Rational => Rational,
    SRational => SRational,
    AsciiValue => Ascii,
    Vec<u8> => Undefined,
    Vec<u16> => ShortArray,
    Vec<u32> => LongArray,
    Vec<i8> => SByteArray,
    Vec<i16> => SShortArray,
    Vec<i32> => SLongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<Rational> => RationalArray,
    Vec<SRational> => SRationalArray,
    UserComment => UserComment,
    Structure => SubIfd,
    MakerNote => MakerNote,
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Ascii(AsciiValue::new(value))
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Ascii(AsciiValue::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_conversion() {
        assert_eq!(FieldType::from_u16(1), Some(FieldType::Byte));
        assert_eq!(FieldType::from_u16(3), Some(FieldType::Short));
        assert_eq!(FieldType::from_u16(13), Some(FieldType::Long));
        assert_eq!(FieldType::from_u16(99), None);
    }

    #[test]
    fn test_field_type_byte_sizes() {
        assert_eq!(FieldType::Byte.byte_size(), 1);
        assert_eq!(FieldType::Short.byte_size(), 2);
        assert_eq!(FieldType::Long.byte_size(), 4);
        assert_eq!(FieldType::Rational.byte_size(), 8);
        assert_eq!(FieldType::Double.byte_size(), 8);
    }

    #[test]
    fn test_decode_scalar_versus_array() {
        let one = TagValue::decode(FieldType::Short, &[0x00, 0x06], Endian::Big);
        assert_eq!(one, TagValue::Short(6));

        let three = TagValue::decode(FieldType::Short, &[8, 0, 8, 0, 8, 0], Endian::Little);
        assert_eq!(three, TagValue::ShortArray(vec![8, 8, 8]));
        assert_eq!(three.count(), 3);
    }

    #[test]
    fn test_decode_rational_exact_fields() {
        let data = [0, 0, 0, 1, 0, 0, 0, 125];
        let value = TagValue::decode(FieldType::Rational, &data, Endian::Big);
        assert_eq!(value, TagValue::Rational(Rational::new(1, 125)));
        assert_eq!(value.encode_payload(Endian::Big).unwrap(), data.to_vec());
    }

    #[test]
    fn test_decode_signed_rational() {
        let data = (-1i32 as u32)
            .to_le_bytes()
            .into_iter()
            .chain(3u32.to_le_bytes())
            .collect::<Vec<_>>();
        let value = TagValue::decode(FieldType::SRational, &data, Endian::Little);
        assert_eq!(value, TagValue::SRational(SRational::new(-1, 3)));
        assert!((value.as_f64().unwrap() + 0.3333).abs() < 0.001);
    }

    #[test]
    fn test_ascii_strips_nul_and_keeps_width() {
        let value = TagValue::decode(FieldType::Ascii, b"Canon\0\0\0\0\0", Endian::Little);
        assert_eq!(value.as_str(), Some("Canon"));
        assert_eq!(value.count(), 10);
        assert_eq!(value.encode_payload(Endian::Little).unwrap(), b"Canon\0\0\0\0\0".to_vec());
    }

    #[test]
    fn test_ascii_width_grows_with_longer_text() {
        let mut ascii = AsciiValue::decode(b"ab\0\0\0\0");
        assert_eq!(ascii.encoded_len(), 6);
        ascii.set_text("abcdefgh");
        assert_eq!(ascii.encoded_len(), 9);
        assert_eq!(ascii.encode(), b"abcdefgh\0".to_vec());
    }

    #[test]
    fn test_ascii_equality_follows_wire_bytes() {
        assert_eq!(AsciiValue::decode(b"abc\0"), AsciiValue::new("abc"));
        assert_eq!(AsciiValue::decode(b"abc\0\0\0"), AsciiValue::with_width("abc", 6));

        let unterminated = AsciiValue::decode(b"abc");
        assert_eq!(unterminated.as_str(), "abc");
        assert_eq!(unterminated.encode(), b"abc".to_vec());
        assert_ne!(unterminated, AsciiValue::new("abc"));
    }

    #[test]
    fn test_ascii_latin1_bytes_survive() {
        let value = TagValue::decode(FieldType::Ascii, b"Caf\xE9\0", Endian::Little);
        assert_eq!(value.as_str(), Some("Caf\u{FFFD}"));
        assert_eq!(value.count(), 5);
        assert_eq!(value.encode_payload(Endian::Little).unwrap(), b"Caf\xE9\0".to_vec());
    }

    #[test]
    fn test_ascii_multiple_strings_survive() {
        let ascii = AsciiValue::decode(b"Ann\0Bob\0");
        assert_eq!(ascii.as_str(), "Ann");
        assert_eq!(ascii.strings(), vec!["Ann".to_string(), "Bob".to_string()]);
        assert_eq!(ascii.encoded_len(), 8);
        assert_eq!(ascii.encode(), b"Ann\0Bob\0".to_vec());

        let mut edited = ascii.clone();
        edited.set_text("Cy");
        assert!(edited.raw().is_none());
        assert_eq!(edited.encode(), b"Cy\0\0\0\0\0\0".to_vec());
    }

    #[test]
    fn test_user_comment_ascii() {
        let comment = UserComment::decode(b"ASCII\0\0\0Hello\0\0", Endian::Little).unwrap();
        assert_eq!(comment.encoding, CommentEncoding::Ascii);
        assert_eq!(comment.text, "Hello");
        assert_eq!(comment.encode(Endian::Little), b"ASCII\0\0\0Hello".to_vec());
    }

    #[test]
    fn test_user_comment_unicode_follows_byte_order() {
        let comment = UserComment::unicode("Hé");
        let big = comment.encode(Endian::Big);
        assert_eq!(&big[8..], &[0x00, b'H', 0x00, 0xE9]);
        assert_eq!(UserComment::decode(&big, Endian::Big).unwrap(), comment);

        let little = comment.encode(Endian::Little);
        assert_eq!(UserComment::decode(&little, Endian::Little).unwrap(), comment);
    }

    #[test]
    fn test_user_comment_bom_overrides_order() {
        let mut data = b"UNICODE\0".to_vec();
        data.extend_from_slice(&[0xFF, 0xFE, b'O', 0, b'K', 0]);
        let comment = UserComment::decode(&data, Endian::Big).unwrap();
        assert_eq!(comment.text, "OK");
    }

    #[test]
    fn test_user_comment_unknown_prefix() {
        assert!(UserComment::decode(b"FOOBAR\0\0text", Endian::Little).is_none());
        assert!(UserComment::decode(b"short", Endian::Little).is_none());
    }

    #[test]
    fn test_count_is_recomputed() {
        let mut value = TagValue::LongArray(vec![1, 2, 3]);
        assert_eq!(value.count(), 3);
        if let TagValue::LongArray(v) = &mut value {
            v.push(4);
        }
        assert_eq!(value.count(), 4);
        assert_eq!(value.encode_payload(Endian::Little).unwrap().len(), 16);
    }

    #[test]
    fn test_structural_variants_have_no_plain_payload() {
        assert!(TagValue::Thumbnail(vec![0xFF, 0xD8]).encode_payload(Endian::Big).is_none());
        assert!(TagValue::SubIfd(Structure::new()).encode_payload(Endian::Big).is_none());
        assert_eq!(TagValue::Thumbnail(vec![1, 2, 3]).field_type(), FieldType::Long);
    }

    #[test]
    fn test_empty_placeholder() {
        let value = TagValue::empty(FieldType::Rational);
        assert_eq!(value, TagValue::RationalArray(Vec::new()));
        assert_eq!(value.count(), 0);
    }

    #[test]
    fn test_tag_value_conversions() {
        assert_eq!(TagValue::Short(123).as_u32(), Some(123));
        assert_eq!(TagValue::ShortArray(vec![123, 456]).as_u16(), Some(123));
        assert_eq!(TagValue::from("Hello").as_str(), Some("Hello"));
        assert_eq!(TagValue::SShort(-123).as_i32(), Some(-123));
        assert_eq!(TagValue::from(vec![1u16, 2]).as_u32_vec(), Some(vec![1, 2]));
        assert_eq!(TagValue::Rational(Rational::new(5, 0)).as_f64(), None);

        let rationals = TagValue::RationalArray(vec![Rational::new(22, 7), Rational::new(355, 113)]);
        assert!((rationals.as_f64().unwrap() - 3.142857).abs() < 0.001);
    }

    #[test]
    fn test_float_round_trip() {
        let value = TagValue::DoubleArray(vec![3.5, -0.25]);
        let bytes = value.encode_payload(Endian::Big).unwrap();
        assert_eq!(TagValue::decode(FieldType::Double, &bytes, Endian::Big), value);
    }
}
