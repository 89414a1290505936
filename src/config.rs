// mediatag-core/src/config.rs
//! Tunable limits for the decoders and encoders
//!
//! Everything here is a plain value type. Defaults are chosen for the
//! metadata found in JPEG APP1 segments and ordinary TIFF files.

/// Largest payload a single JPEG marker segment can carry
pub const MAX_SEGMENT_SIZE: usize = 65535;

/// Default ceiling for nested sub-IFDs (Exif, GPS, Interop, maker notes)
pub const DEFAULT_IFD_DEPTH: usize = 16;

/// Default ceiling for nested XMP structs and arrays
pub const DEFAULT_XMP_DEPTH: usize = 32;

/// Settings for [`IfdDecoder`](crate::decode::IfdDecoder)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum nesting of sub-directories before a branch is dropped
    pub max_depth: usize,
    /// Maximum number of directories followed through next-IFD links
    pub max_chain: usize,
    /// Whether maker notes are dispatched to vendor dialects at all
    pub parse_maker_notes: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_IFD_DEPTH,
            max_chain: 64,
            parse_maker_notes: true,
        }
    }
}

impl DecodeConfig {
    /// Set the sub-directory nesting ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the next-IFD chain length ceiling
    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    /// Keep maker notes as opaque bytes instead of dispatching them
    pub fn with_maker_notes(mut self, parse: bool) -> Self {
        self.parse_maker_notes = parse;
        self
    }
}

/// Settings for [`IfdEncoder`](crate::encode::IfdEncoder)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Reject output larger than this many bytes; `None` disables the check
    pub segment_limit: Option<usize>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            segment_limit: Some(MAX_SEGMENT_SIZE),
        }
    }
}

impl EncodeConfig {
    /// Set or clear the output size limit
    pub fn with_segment_limit(mut self, limit: Option<usize>) -> Self {
        self.segment_limit = limit;
        self
    }
}

/// Settings for the XMP parser and renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmpConfig {
    /// Maximum nesting of structs/arrays before a branch is dropped
    pub max_depth: usize,
    /// Reject rendered packets larger than this many bytes
    pub segment_limit: Option<usize>,
    /// Wrap rendered output in `<?xpacket?>` processing instructions
    pub packet_wrapper: bool,
}

impl Default for XmpConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_XMP_DEPTH,
            segment_limit: Some(MAX_SEGMENT_SIZE),
            packet_wrapper: true,
        }
    }
}

impl XmpConfig {
    /// Set the nesting ceiling
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set or clear the rendered size limit
    pub fn with_segment_limit(mut self, limit: Option<usize>) -> Self {
        self.segment_limit = limit;
        self
    }

    /// Enable or disable the `<?xpacket?>` wrapper
    pub fn with_packet_wrapper(mut self, wrap: bool) -> Self {
        self.packet_wrapper = wrap;
        self
    }
}
