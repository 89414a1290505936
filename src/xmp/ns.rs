// mediatag-core/src/xmp/ns.rs
//! Well-known XMP namespace URIs and their customary prefixes

/// RDF syntax namespace
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// Built-in `xml:` namespace (xml:lang)
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
/// `x:xmpmeta` envelope
pub const X: &str = "adobe:ns:meta/";
/// Dublin Core
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
/// XMP basic
pub const XMP: &str = "http://ns.adobe.com/xap/1.0/";
/// XMP rights management
pub const XMP_RIGHTS: &str = "http://ns.adobe.com/xap/1.0/rights/";
/// XMP media management
pub const XMP_MM: &str = "http://ns.adobe.com/xap/1.0/mm/";
/// Exif properties
pub const EXIF: &str = "http://ns.adobe.com/exif/1.0/";
/// Exif 2.3 additions
pub const EXIF_EX: &str = "http://cipa.jp/exif/1.0/";
/// TIFF properties
pub const TIFF: &str = "http://ns.adobe.com/tiff/1.0/";
/// Photoshop
pub const PHOTOSHOP: &str = "http://ns.adobe.com/photoshop/1.0/";
/// Camera Raw settings
pub const CRS: &str = "http://ns.adobe.com/camera-raw-settings/1.0/";
/// IPTC Core
pub const IPTC_CORE: &str = "http://iptc.org/std/Iptc4xmpCore/1.0/xmlns/";
/// Exif auxiliary
pub const AUX: &str = "http://ns.adobe.com/exif/1.0/aux/";
/// Resource event struct fields
pub const ST_EVT: &str = "http://ns.adobe.com/xap/1.0/sType/ResourceEvent#";
/// Resource reference struct fields
pub const ST_REF: &str = "http://ns.adobe.com/xap/1.0/sType/ResourceRef#";
/// Identifier qualifiers
pub const XMP_IDQ: &str = "http://ns.adobe.com/xmp/Identifier/qual/1.0/";
/// Adobe PDF
pub const PDF: &str = "http://ns.adobe.com/pdf/1.3/";

const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    (RDF, "rdf"),
    (XML, "xml"),
    (X, "x"),
    (DC, "dc"),
    (XMP, "xmp"),
    (XMP_RIGHTS, "xmpRights"),
    (XMP_MM, "xmpMM"),
    (EXIF, "exif"),
    (EXIF_EX, "exifEX"),
    (TIFF, "tiff"),
    (PHOTOSHOP, "photoshop"),
    (CRS, "crs"),
    (IPTC_CORE, "Iptc4xmpCore"),
    (AUX, "aux"),
    (ST_EVT, "stEvt"),
    (ST_REF, "stRef"),
    (XMP_IDQ, "xmpidq"),
    (PDF, "pdf"),
];

/// Customary prefix of a well-known namespace
pub fn default_prefix(uri: &str) -> Option<&'static str> {
    DEFAULT_PREFIXES
        .iter()
        .find(|(known, _)| *known == uri)
        .map(|&(_, prefix)| prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        assert_eq!(default_prefix(DC), Some("dc"));
        assert_eq!(default_prefix(XMP), Some("xmp"));
        assert_eq!(default_prefix("http://example.com/ns/"), None);
    }
}
