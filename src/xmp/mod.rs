// mediatag-core/src/xmp/mod.rs
//! XMP packets as a generic node tree
//!
//! [`parse_xmp`] turns an RDF/XML packet into an [`XmpTree`]; [`render_xmp`]
//! writes one back. The tree is semantic: RDF shorthand and verbose forms
//! read to the same nodes, and rendering is only required to read back to
//! an equal tree, not to reproduce the source bytes.
//!
//! ```
//! use mediatag_core::xmp::{ns, parse_xmp, render_xmp};
//!
//! let packet = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
//!   <rdf:Description xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="4"/>
//! </rdf:RDF>"#;
//! let mut tree = parse_xmp(packet.as_bytes());
//! assert_eq!(tree.get_property(ns::XMP, "Rating").unwrap().value, "4");
//!
//! tree.set_simple(ns::XMP, "Label", "Red");
//! let xml = render_xmp(&tree).unwrap();
//! assert_eq!(parse_xmp(xml.as_bytes()), tree);
//! ```

use std::collections::BTreeMap;

pub mod node;
pub mod ns;
pub mod parser;
pub mod render;

pub use node::{NodeType, XmpNode};
pub use parser::{ParsedXmp, XmpParser};
pub use render::XmpRenderer;

use crate::Result;

/// Language tag of the default alternative
pub const X_DEFAULT: &str = "x-default";

/// A parsed XMP packet
#[derive(Debug, Clone)]
pub struct XmpTree {
    /// Synthetic root; its children are the top-level properties
    pub root: XmpNode,
    /// `rdf:about` of the described resource, usually empty
    pub about: String,
    /// Prefixes seen in the source packet, by namespace URI
    pub prefixes: BTreeMap<String, String>,
}

impl Default for XmpTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Trees are equal when their content is; prefixes are presentation only
impl PartialEq for XmpTree {
    fn eq(&self, other: &Self) -> bool {
        self.about == other.about && self.root == other.root
    }
}

impl XmpTree {
    /// Empty tree
    pub fn new() -> Self {
        Self {
            root: XmpNode::new("", "", NodeType::Struct),
            about: String::new(),
            prefixes: BTreeMap::new(),
        }
    }

    /// Parse leniently; problems are logged and whatever was read is kept
    pub fn parse(bytes: &[u8]) -> Self {
        XmpParser::default().parse(bytes).tree
    }

    /// Parse, failing on the first problem
    pub fn parse_strict(bytes: &[u8]) -> Result<Self> {
        XmpParser::default().parse_strict(bytes)
    }

    /// Render with default settings
    pub fn render(&self) -> Result<String> {
        XmpRenderer::default().render(self)
    }

    /// Top-level property
    pub fn get_property(&self, namespace: &str, name: &str) -> Option<&XmpNode> {
        self.root.get_child(namespace, name)
    }

    /// Top-level property for modification
    pub fn get_property_mut(&mut self, namespace: &str, name: &str) -> Option<&mut XmpNode> {
        self.root.get_child_mut(namespace, name)
    }

    /// Insert or replace a top-level property, returning the replaced one
    pub fn set_property(&mut self, node: XmpNode) -> Option<XmpNode> {
        self.root.set_child(node)
    }

    /// Remove a top-level property
    pub fn remove_property(&mut self, namespace: &str, name: &str) -> Option<XmpNode> {
        self.root.remove_child(namespace, name)
    }

    /// Set a Simple top-level property
    pub fn set_simple(&mut self, namespace: &str, name: &str, value: impl Into<String>) {
        self.root.set_child(XmpNode::simple(namespace, name, value));
    }

    /// Prefer `prefix` for `uri` when rendering
    pub fn register_prefix(&mut self, uri: impl Into<String>, prefix: impl Into<String>) {
        self.prefixes.insert(uri.into(), prefix.into());
    }

    /// Text of a language alternative
    ///
    /// Picks the item whose `xml:lang` matches `lang` (ignoring case), then
    /// the `x-default` item, then the first item.
    pub fn localized_text(&self, namespace: &str, name: &str, lang: &str) -> Option<&str> {
        let property = self.get_property(namespace, name)?;
        if property.node_type != NodeType::Alt {
            return None;
        }
        let by_lang = |wanted: &str| {
            property
                .children
                .iter()
                .find(|item| item.lang().is_some_and(|l| l.eq_ignore_ascii_case(wanted)))
        };
        by_lang(lang)
            .or_else(|| by_lang(X_DEFAULT))
            .or_else(|| property.children.first())
            .map(|item| item.value.as_str())
    }

    /// Set one language of a language alternative
    ///
    /// A property that is missing or not an Alt is replaced by a new Alt.
    /// The first language set also becomes the `x-default` item.
    pub fn set_localized_text(
        &mut self,
        namespace: &str,
        name: &str,
        lang: &str,
        value: impl Into<String>,
    ) {
        let value = value.into();
        let property = self.root.get_or_create_child(namespace, name, NodeType::Alt);
        if property.node_type != NodeType::Alt {
            *property = XmpNode::new(namespace, name, NodeType::Alt);
        }

        let has = |property: &XmpNode, wanted: &str| {
            property
                .children
                .iter()
                .position(|item| item.lang().is_some_and(|l| l.eq_ignore_ascii_case(wanted)))
        };
        match has(property, lang) {
            Some(index) => property.children[index].value = value.clone(),
            None => property.push_item(XmpNode::item(value.clone()).with_lang(lang)),
        }
        if has(property, X_DEFAULT).is_none() {
            property
                .children
                .insert(0, XmpNode::item(value).with_lang(X_DEFAULT));
        }
    }
}

/// Parse an XMP packet leniently
pub fn parse_xmp(bytes: &[u8]) -> XmpTree {
    XmpTree::parse(bytes)
}

/// Render an XMP tree with default settings
pub fn render_xmp(tree: &XmpTree) -> Result<String> {
    tree.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled() -> XmpTree {
        parse_xmp(
            br#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
            <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
            <dc:title><rdf:Alt>
                <rdf:li xml:lang="x-default">Harbor</rdf:li>
                <rdf:li xml:lang="fr-FR">Port</rdf:li>
            </rdf:Alt></dc:title>
            </rdf:Description></rdf:RDF></x:xmpmeta>"#,
        )
    }

    #[test]
    fn test_localized_text_fallbacks() {
        let tree = titled();
        assert_eq!(tree.localized_text(ns::DC, "title", "fr-fr"), Some("Port"));
        assert_eq!(tree.localized_text(ns::DC, "title", "de"), Some("Harbor"));
        assert_eq!(tree.localized_text(ns::DC, "rights", "de"), None);

        let mut first_only = XmpTree::new();
        let mut alt = XmpNode::new(ns::DC, "rights", NodeType::Alt);
        alt.push_item(XmpNode::item("CC0").with_lang("en"));
        first_only.set_property(alt);
        assert_eq!(first_only.localized_text(ns::DC, "rights", "de"), Some("CC0"));
    }

    #[test]
    fn test_set_localized_text() {
        let mut tree = XmpTree::new();
        tree.set_localized_text(ns::DC, "description", "en", "A harbor");
        let property = tree.get_property(ns::DC, "description").unwrap();
        assert_eq!(property.node_type, NodeType::Alt);
        assert_eq!(property.children.len(), 2);
        assert_eq!(property.children[0].lang(), Some(X_DEFAULT));

        tree.set_localized_text(ns::DC, "description", "EN", "The harbor");
        tree.set_localized_text(ns::DC, "description", "fr", "Le port");
        assert_eq!(tree.localized_text(ns::DC, "description", "en"), Some("The harbor"));
        assert_eq!(tree.localized_text(ns::DC, "description", "fr"), Some("Le port"));
        assert_eq!(tree.localized_text(ns::DC, "description", "x-default"), Some("A harbor"));
        assert_eq!(tree.get_property(ns::DC, "description").unwrap().children.len(), 3);

        tree.set_simple(ns::DC, "description", "plain");
        tree.set_localized_text(ns::DC, "description", "en", "again");
        assert_eq!(tree.get_property(ns::DC, "description").unwrap().children.len(), 2);
    }

    #[test]
    fn test_property_accessors() {
        let mut tree = titled();
        tree.set_simple(ns::XMP, "Rating", "2");
        tree.get_property_mut(ns::XMP, "Rating").unwrap().value = "5".to_string();
        assert_eq!(tree.get_property(ns::XMP, "Rating").unwrap().value, "5");
        assert!(tree.remove_property(ns::XMP, "Rating").is_some());
        assert!(tree.get_property(ns::XMP, "Rating").is_none());
    }

    #[test]
    fn test_entry_points_round_trip() {
        let tree = titled();
        let xml = render_xmp(&tree).unwrap();
        assert_eq!(parse_xmp(xml.as_bytes()), tree);
        assert_eq!(XmpTree::parse_strict(xml.as_bytes()).unwrap(), tree);
    }

    #[test]
    fn test_equality_ignores_prefixes() {
        let mut a = titled();
        let b = titled();
        a.register_prefix(ns::DC, "dublin");
        assert_eq!(a, b);
    }
}
