// mediatag-core/src/tags.rs
//! Tag definitions for the directories found in Exif/TIFF segments
//!
//! Tag ids are only unique within a directory kind: GPS tag 2 and Interop
//! tag 2 mean different things, so lookups take an [`IfdKind`].

/// Which kind of directory a set of entries belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfdKind {
    /// IFD0, IFD1 (thumbnail) and any further directories in the main chain
    Primary,
    /// Exif sub-IFD (pointer tag 0x8769)
    Exif,
    /// GPS sub-IFD (pointer tag 0x8825)
    Gps,
    /// Interoperability sub-IFD (pointer tag 0xA005 inside Exif)
    Interop,
    /// Vendor maker-note directory
    MakerNote,
}

impl IfdKind {
    /// The kind of directory a pointer entry in this directory leads to
    ///
    /// Returns `None` when `tag` is not a sub-IFD pointer here. Maker notes
    /// are not included: they go through vendor dispatch instead.
    pub fn sub_ifd(self, tag: u16) -> Option<IfdKind> {
        match (self, tag) {
            (IfdKind::Primary, EXIF_IFD) => Some(IfdKind::Exif),
            (IfdKind::Primary, GPS_IFD) => Some(IfdKind::Gps),
            (IfdKind::Exif, INTEROP_IFD) => Some(IfdKind::Interop),
            _ => None,
        }
    }
}

// =============================================================================
// Primary image directory (IFD0 / IFD1)
// =============================================================================

/// Compression scheme; 6 marks a JPEG thumbnail in IFD1
pub const COMPRESSION: u16 = 0x0103;
/// Image title
pub const IMAGE_DESCRIPTION: u16 = 0x010E;
/// Camera manufacturer
pub const MAKE: u16 = 0x010F;
/// Camera model
pub const MODEL: u16 = 0x0110;
/// Image orientation, see [`Orientation`]
pub const ORIENTATION: u16 = 0x0112;
/// Horizontal resolution
pub const X_RESOLUTION: u16 = 0x011A;
/// Vertical resolution
pub const Y_RESOLUTION: u16 = 0x011B;
/// Unit for X/Y resolution, see [`ResolutionUnit`]
pub const RESOLUTION_UNIT: u16 = 0x0128;
/// Software used to create the image
pub const SOFTWARE: u16 = 0x0131;
/// Date and time of last modification
pub const DATE_TIME: u16 = 0x0132;
/// Photographer
pub const ARTIST: u16 = 0x013B;
/// Offset of an embedded JPEG thumbnail
pub const JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;
/// Length of an embedded JPEG thumbnail
pub const JPEG_INTERCHANGE_FORMAT_LENGTH: u16 = 0x0202;
/// Chroma sample positioning
pub const YCBCR_POSITIONING: u16 = 0x0213;
/// Copyright notice
pub const COPYRIGHT: u16 = 0x8298;
/// Pointer to the Exif sub-IFD
pub const EXIF_IFD: u16 = 0x8769;
/// Pointer to the GPS sub-IFD
pub const GPS_IFD: u16 = 0x8825;

// =============================================================================
// Exif sub-IFD
// =============================================================================

/// Exposure time in seconds
pub const EXPOSURE_TIME: u16 = 0x829A;
/// F number
pub const F_NUMBER: u16 = 0x829D;
/// Exposure program
pub const EXPOSURE_PROGRAM: u16 = 0x8822;
/// ISO speed
pub const ISO_SPEED: u16 = 0x8827;
/// Exif version ("0230" etc.)
pub const EXIF_VERSION: u16 = 0x9000;
/// Capture date
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
/// Digitization date
pub const DATE_TIME_DIGITIZED: u16 = 0x9004;
/// Component configuration
pub const COMPONENTS_CONFIGURATION: u16 = 0x9101;
/// APEX shutter speed
pub const SHUTTER_SPEED_VALUE: u16 = 0x9201;
/// APEX aperture
pub const APERTURE_VALUE: u16 = 0x9202;
/// Exposure bias
pub const EXPOSURE_BIAS_VALUE: u16 = 0x9204;
/// Flash status
pub const FLASH: u16 = 0x9209;
/// Lens focal length
pub const FOCAL_LENGTH: u16 = 0x920A;
/// Vendor maker note
pub const MAKER_NOTE: u16 = 0x927C;
/// User comment with character-set prefix
pub const USER_COMMENT: u16 = 0x9286;
/// FlashPix version
pub const FLASHPIX_VERSION: u16 = 0xA000;
/// Color space
pub const COLOR_SPACE: u16 = 0xA001;
/// Valid image width
pub const PIXEL_X_DIMENSION: u16 = 0xA002;
/// Valid image height
pub const PIXEL_Y_DIMENSION: u16 = 0xA003;
/// Pointer to the Interoperability sub-IFD
pub const INTEROP_IFD: u16 = 0xA005;
/// Lens model
pub const LENS_MODEL: u16 = 0xA434;

// =============================================================================
// GPS sub-IFD
// =============================================================================

/// GPS tag version
pub const GPS_VERSION_ID: u16 = 0x0000;
/// 'N' or 'S'
pub const GPS_LATITUDE_REF: u16 = 0x0001;
/// Degrees, minutes, seconds
pub const GPS_LATITUDE: u16 = 0x0002;
/// 'E' or 'W'
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
/// Degrees, minutes, seconds
pub const GPS_LONGITUDE: u16 = 0x0004;
/// 0 = above sea level, 1 = below
pub const GPS_ALTITUDE_REF: u16 = 0x0005;
/// Altitude in meters
pub const GPS_ALTITUDE: u16 = 0x0006;
/// UTC time of day
pub const GPS_TIME_STAMP: u16 = 0x0007;
/// UTC date
pub const GPS_DATE_STAMP: u16 = 0x001D;

// =============================================================================
// Interoperability sub-IFD
// =============================================================================

/// Interoperability rule ("R98")
pub const INTEROP_INDEX: u16 = 0x0001;
/// Interoperability version
pub const INTEROP_VERSION: u16 = 0x0002;

/// Image orientation values (tag 0x0112)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Row 0 top, column 0 left
    TopLeft = 1,
    /// Mirrored horizontally
    TopRight = 2,
    /// Rotated 180 degrees
    BottomRight = 3,
    /// Mirrored vertically
    BottomLeft = 4,
    /// Mirrored and rotated 270 degrees clockwise
    LeftTop = 5,
    /// Rotated 90 degrees clockwise
    RightTop = 6,
    /// Mirrored and rotated 90 degrees clockwise
    RightBottom = 7,
    /// Rotated 270 degrees clockwise
    LeftBottom = 8,
}

impl Orientation {
    /// Convert from u32 to Orientation
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Orientation::TopLeft),
            2 => Some(Orientation::TopRight),
            3 => Some(Orientation::BottomRight),
            4 => Some(Orientation::BottomLeft),
            5 => Some(Orientation::LeftTop),
            6 => Some(Orientation::RightTop),
            7 => Some(Orientation::RightBottom),
            8 => Some(Orientation::LeftBottom),
            _ => None,
        }
    }
}

/// Resolution units
///
/// These values appear in the ResolutionUnit tag (296) and specify
/// the units for X/Y resolution values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    /// No absolute unit (just relative)
    None = 1,
    /// Inch
    Inch = 2,
    /// Centimeter
    Centimeter = 3,
}

impl ResolutionUnit {
    /// Convert from u32 to ResolutionUnit
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(ResolutionUnit::None),
            2 => Some(ResolutionUnit::Inch),
            3 => Some(ResolutionUnit::Centimeter),
            _ => None,
        }
    }
}

/// Get a human-readable name for a tag in a directory of the given kind
///
/// Maker-note tags are vendor specific and always report "Unknown".
pub fn tag_name(kind: IfdKind, tag: u16) -> &'static str {
    match kind {
        IfdKind::Primary => match tag {
            COMPRESSION => "Compression",
            IMAGE_DESCRIPTION => "ImageDescription",
            MAKE => "Make",
            MODEL => "Model",
            ORIENTATION => "Orientation",
            X_RESOLUTION => "XResolution",
            Y_RESOLUTION => "YResolution",
            RESOLUTION_UNIT => "ResolutionUnit",
            SOFTWARE => "Software",
            DATE_TIME => "DateTime",
            ARTIST => "Artist",
            JPEG_INTERCHANGE_FORMAT => "JPEGInterchangeFormat",
            JPEG_INTERCHANGE_FORMAT_LENGTH => "JPEGInterchangeFormatLength",
            YCBCR_POSITIONING => "YCbCrPositioning",
            COPYRIGHT => "Copyright",
            EXIF_IFD => "ExifIFDPointer",
            GPS_IFD => "GPSInfoIFDPointer",
            _ => "Unknown",
        },
        IfdKind::Exif => match tag {
            EXPOSURE_TIME => "ExposureTime",
            F_NUMBER => "FNumber",
            EXPOSURE_PROGRAM => "ExposureProgram",
            ISO_SPEED => "ISOSpeedRatings",
            EXIF_VERSION => "ExifVersion",
            DATE_TIME_ORIGINAL => "DateTimeOriginal",
            DATE_TIME_DIGITIZED => "DateTimeDigitized",
            COMPONENTS_CONFIGURATION => "ComponentsConfiguration",
            SHUTTER_SPEED_VALUE => "ShutterSpeedValue",
            APERTURE_VALUE => "ApertureValue",
            EXPOSURE_BIAS_VALUE => "ExposureBiasValue",
            FLASH => "Flash",
            FOCAL_LENGTH => "FocalLength",
            MAKER_NOTE => "MakerNote",
            USER_COMMENT => "UserComment",
            FLASHPIX_VERSION => "FlashpixVersion",
            COLOR_SPACE => "ColorSpace",
            PIXEL_X_DIMENSION => "PixelXDimension",
            PIXEL_Y_DIMENSION => "PixelYDimension",
            INTEROP_IFD => "InteroperabilityIFDPointer",
            LENS_MODEL => "LensModel",
            _ => "Unknown",
        },
        IfdKind::Gps => match tag {
            GPS_VERSION_ID => "GPSVersionID",
            GPS_LATITUDE_REF => "GPSLatitudeRef",
            GPS_LATITUDE => "GPSLatitude",
            GPS_LONGITUDE_REF => "GPSLongitudeRef",
            GPS_LONGITUDE => "GPSLongitude",
            GPS_ALTITUDE_REF => "GPSAltitudeRef",
            GPS_ALTITUDE => "GPSAltitude",
            GPS_TIME_STAMP => "GPSTimeStamp",
            GPS_DATE_STAMP => "GPSDateStamp",
            _ => "Unknown",
        },
        IfdKind::Interop => match tag {
            INTEROP_INDEX => "InteroperabilityIndex",
            INTEROP_VERSION => "InteroperabilityVersion",
            _ => "Unknown",
        },
        IfdKind::MakerNote => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_depend_on_kind() {
        assert_eq!(tag_name(IfdKind::Primary, MAKE), "Make");
        assert_eq!(tag_name(IfdKind::Exif, EXPOSURE_TIME), "ExposureTime");
        assert_eq!(tag_name(IfdKind::Gps, 2), "GPSLatitude");
        assert_eq!(tag_name(IfdKind::Interop, 2), "InteroperabilityVersion");
        assert_eq!(tag_name(IfdKind::MakerNote, 1), "Unknown");
    }

    #[test]
    fn test_sub_ifd_pointers() {
        assert_eq!(IfdKind::Primary.sub_ifd(EXIF_IFD), Some(IfdKind::Exif));
        assert_eq!(IfdKind::Primary.sub_ifd(GPS_IFD), Some(IfdKind::Gps));
        assert_eq!(IfdKind::Exif.sub_ifd(INTEROP_IFD), Some(IfdKind::Interop));
        assert_eq!(IfdKind::Exif.sub_ifd(EXIF_IFD), None);
        assert_eq!(IfdKind::Gps.sub_ifd(INTEROP_IFD), None);
        assert_eq!(IfdKind::Exif.sub_ifd(MAKER_NOTE), None);
    }

    #[test]
    fn test_orientation() {
        assert_eq!(Orientation::from_u32(1), Some(Orientation::TopLeft));
        assert_eq!(Orientation::from_u32(6), Some(Orientation::RightTop));
        assert_eq!(Orientation::from_u32(9), None);
    }

    #[test]
    fn test_resolution_units() {
        assert_eq!(ResolutionUnit::from_u32(2), Some(ResolutionUnit::Inch));
        assert_eq!(ResolutionUnit::from_u32(3), Some(ResolutionUnit::Centimeter));
        assert_eq!(ResolutionUnit::from_u32(0), None);
    }
}
