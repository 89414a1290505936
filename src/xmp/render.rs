// mediatag-core/src/xmp/render.rs
//! Node tree to RDF/XML
//!
//! Output always uses the verbose element form: Simple nodes as elements
//! with text, structs as nested `rdf:Description`, arrays as `rdf:Bag`,
//! `rdf:Seq` or `rdf:Alt` holding `rdf:li` items. Qualifiers go on the
//! property element as attributes when they are plain text; otherwise the
//! node is written in the `rdf:value` form with each qualifier as a field
//! next to the value.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use quick_xml::escape::escape;

use super::node::{NodeType, XmpNode};
use super::{XmpTree, ns};
use crate::config::XmpConfig;
use crate::{Result, TagError};

const PACKET_ID: &str = "W5M0MpCehiHzreSzNTczkc9d";

/// Renderer for XMP packets
#[derive(Debug, Clone, Default)]
pub struct XmpRenderer {
    config: XmpConfig,
}

impl XmpRenderer {
    /// Create a renderer with the given limits and wrapper setting
    pub fn new(config: XmpConfig) -> Self {
        Self { config }
    }

    /// Serialize `tree`
    ///
    /// Fails with [`TagError::SegmentTooLarge`] when the packet exceeds the
    /// configured segment limit, and with [`TagError::RecursionLimit`] when
    /// structs and arrays nest deeper than the configured depth.
    pub fn render(&self, tree: &XmpTree) -> Result<String> {
        let prefixes = assign_prefixes(tree);
        let mut out = Output {
            prefixes: &prefixes,
            max_depth: self.config.max_depth,
            text: String::new(),
        };

        if self.config.packet_wrapper {
            out.text
                .push_str(&format!("<?xpacket begin=\"\u{feff}\" id=\"{PACKET_ID}\"?>\n"));
        }
        out.text
            .push_str(&format!("<x:xmpmeta xmlns:x=\"{}\">\n", ns::X));
        out.text
            .push_str(&format!(" <rdf:RDF xmlns:rdf=\"{}\">\n", ns::RDF));
        out.text.push_str(&format!(
            "  <rdf:Description rdf:about=\"{}\"",
            escape(tree.about.as_str())
        ));
        for (uri, prefix) in &prefixes {
            out.text
                .push_str(&format!("\n    xmlns:{prefix}=\"{}\"", escape(*uri)));
        }
        out.text.push_str(">\n");

        for property in &tree.root.children {
            let name = out.qname(&property.namespace, &property.name);
            out.property(property, &name, 3, 1)?;
        }

        out.text.push_str("  </rdf:Description>\n </rdf:RDF>\n</x:xmpmeta>\n");
        if self.config.packet_wrapper {
            out.text.push_str("<?xpacket end=\"w\"?>");
        }

        let text = out.text;
        debug!(
            "rendered XMP packet of {} bytes with {} properties",
            text.len(),
            tree.root.children.len()
        );
        match self.config.segment_limit {
            Some(limit) if text.len() > limit => Err(TagError::SegmentTooLarge {
                size: text.len(),
                limit,
            }),
            _ => Ok(text),
        }
    }
}

fn is_prefix(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !candidate.to_ascii_lowercase().starts_with("xml")
}

/// Namespaces in document order, walked with an explicit stack
fn collect_namespaces<'t>(nodes: &'t [XmpNode], found: &mut Vec<&'t str>) {
    let mut pending: Vec<&'t XmpNode> = nodes.iter().rev().collect();
    while let Some(node) = pending.pop() {
        let namespace = node.namespace.as_str();
        if !matches!(namespace, "" | ns::RDF | ns::XML) && !found.contains(&namespace) {
            found.push(namespace);
        }
        pending.extend(node.children.iter().rev());
        pending.extend(node.qualifiers.iter().rev());
    }
}

/// Prefix for every namespace the tree uses
///
/// The prefix seen in the source packet wins, then the customary prefix,
/// then a generated `nsN`.
fn assign_prefixes(tree: &XmpTree) -> BTreeMap<&str, String> {
    let mut namespaces = Vec::new();
    collect_namespaces(&tree.root.children, &mut namespaces);

    let mut taken: BTreeSet<String> = ["x", "rdf"].iter().map(|p| p.to_string()).collect();
    let mut assigned = BTreeMap::new();
    let mut generated = 1;
    for uri in namespaces {
        let candidates = [
            tree.prefixes.get(uri).map(String::as_str),
            ns::default_prefix(uri),
        ];
        let prefix = match candidates
            .into_iter()
            .flatten()
            .find(|p| is_prefix(p) && !taken.contains(*p))
        {
            Some(prefix) => prefix.to_string(),
            None => loop {
                let candidate = format!("ns{generated}");
                generated += 1;
                if !taken.contains(&candidate) {
                    break candidate;
                }
            },
        };
        taken.insert(prefix.clone());
        assigned.insert(uri, prefix);
    }
    assigned
}

/// Qualifier that can be written as an XML attribute
fn is_plain(qualifier: &XmpNode) -> bool {
    qualifier.node_type == NodeType::Simple
        && qualifier.qualifiers.is_empty()
        && qualifier.children.is_empty()
        && !qualifier.namespace.is_empty()
        && qualifier.namespace != ns::RDF
}

/// Whether the qualifiers of `node` fit as attributes of its element
///
/// An empty Simple with non-language attributes would read back as a
/// struct, so that case needs the `rdf:value` form too.
fn attribute_form(node: &XmpNode) -> bool {
    node.qualifiers.iter().all(is_plain)
        && !(node.node_type == NodeType::Simple
            && node.value.trim().is_empty()
            && node.qualifiers.iter().any(|q| !q.is(ns::XML, "lang")))
}

struct Output<'p> {
    prefixes: &'p BTreeMap<&'p str, String>,
    max_depth: usize,
    text: String,
}

impl Output<'_> {
    fn qname(&self, namespace: &str, name: &str) -> String {
        let prefix = match namespace {
            ns::RDF => Some("rdf"),
            ns::XML => Some("xml"),
            _ => self.prefixes.get(namespace).map(String::as_str),
        };
        match prefix {
            Some(prefix) => format!("{prefix}:{name}"),
            None => name.to_string(),
        }
    }

    fn indent(&mut self, depth: usize) {
        self.text.extend(std::iter::repeat_n(' ', depth));
    }

    /// Write one node; `depth` is the indentation, `level` the nesting of
    /// the node in the tree with top-level properties at 1
    fn property(&mut self, node: &XmpNode, name: &str, depth: usize, level: usize) -> Result<()> {
        if level > self.max_depth {
            return Err(TagError::RecursionLimit { depth: level });
        }
        if attribute_form(node) {
            let mut attributes = String::new();
            for qualifier in &node.qualifiers {
                let qname = self.qname(&qualifier.namespace, &qualifier.name);
                attributes.push_str(&format!(" {qname}=\"{}\"", escape(qualifier.value.as_str())));
            }
            return self.content(node, name, &attributes, depth, level);
        }

        let (lang, fields): (Vec<&XmpNode>, Vec<&XmpNode>) = node
            .qualifiers
            .iter()
            .partition(|q| q.is(ns::XML, "lang") && is_plain(q));
        let value = XmpNode {
            namespace: ns::RDF.to_string(),
            name: "value".to_string(),
            node_type: node.node_type,
            value: node.value.clone(),
            children: node.children.clone(),
            qualifiers: lang.into_iter().cloned().collect(),
        };

        self.indent(depth);
        self.text.push_str(&format!("<{name}>\n"));
        self.indent(depth + 1);
        self.text.push_str("<rdf:Description>\n");
        self.property(&value, "rdf:value", depth + 2, level + 1)?;
        for field in fields {
            let qname = self.qname(&field.namespace, &field.name);
            self.property(field, &qname, depth + 2, level + 1)?;
        }
        self.indent(depth + 1);
        self.text.push_str("</rdf:Description>\n");
        self.indent(depth);
        self.text.push_str(&format!("</{name}>\n"));
        Ok(())
    }

    fn content(
        &mut self,
        node: &XmpNode,
        name: &str,
        attributes: &str,
        depth: usize,
        level: usize,
    ) -> Result<()> {
        self.indent(depth);
        if let Some(container) = node.node_type.container_name() {
            self.text.push_str(&format!("<{name}{attributes}>\n"));
            self.indent(depth + 1);
            self.text.push_str(&format!("<rdf:{container}>\n"));
            for item in &node.children {
                self.property(item, "rdf:li", depth + 2, level + 1)?;
            }
            self.indent(depth + 1);
            self.text.push_str(&format!("</rdf:{container}>\n"));
        } else if node.node_type == NodeType::Struct {
            self.text.push_str(&format!("<{name}{attributes}>\n"));
            self.indent(depth + 1);
            self.text.push_str("<rdf:Description>\n");
            for field in &node.children {
                let qname = self.qname(&field.namespace, &field.name);
                self.property(field, &qname, depth + 2, level + 1)?;
            }
            self.indent(depth + 1);
            self.text.push_str("</rdf:Description>\n");
        } else {
            self.text.push_str(&format!(
                "<{name}{attributes}>{}</{name}>\n",
                escape(node.value.as_str())
            ));
            return Ok(());
        }
        self.indent(depth);
        self.text.push_str(&format!("</{name}>\n"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xmp::parser::XmpParser;

    fn reparse(tree: &XmpTree) -> XmpTree {
        let xml = XmpRenderer::default().render(tree).unwrap();
        let parsed = XmpParser::default().parse(xml.as_bytes());
        assert!(parsed.warnings.is_empty(), "{:?}\n{xml}", parsed.warnings);
        parsed.tree
    }

    fn sample() -> XmpTree {
        let mut tree = XmpTree::new();
        tree.about = "uuid:faf5bdd5".to_string();
        tree.root
            .set_child(XmpNode::simple(ns::XMP, "CreateDate", "2002-08-15T17:10:04Z"));
        tree.root.set_child(XmpNode::simple(ns::DC, "format", "image/jpeg"));

        let mut subject = XmpNode::new(ns::DC, "subject", NodeType::Bag);
        subject.push_item(XmpNode::item("sky"));
        subject.push_item(XmpNode::item("sea"));
        tree.root.set_child(subject);

        let mut title = XmpNode::new(ns::DC, "title", NodeType::Alt);
        title.push_item(XmpNode::item("Harbor").with_lang("x-default"));
        title.push_item(XmpNode::item("Port").with_lang("fr"));
        tree.root.set_child(title);

        let mut history = XmpNode::new(ns::XMP_MM, "History", NodeType::Seq);
        let mut event = XmpNode::new(ns::RDF, "li", NodeType::Struct);
        event.set_child(XmpNode::simple(ns::ST_EVT, "action", "saved"));
        event.set_child(XmpNode::simple(ns::ST_EVT, "when", "2020-01-01"));
        history.push_item(event);
        tree.root.set_child(history);

        tree.root
            .set_child(XmpNode::simple("http://acme.example/ns/1.0/", "Widget", "a < b & c"));
        tree
    }

    #[test]
    fn test_round_trip() {
        let tree = sample();
        assert_eq!(reparse(&tree), tree);
    }

    #[test]
    fn test_render_is_stable_after_reparse() {
        let renderer = XmpRenderer::default();
        let first = renderer.render(&sample()).unwrap();
        let again = renderer.render(&reparse(&sample())).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_parsed_packet_round_trips() {
        let source = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
            <rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmlns:exif="http://ns.adobe.com/exif/1.0/" xmp:Rating="3">
                <exif:Flash rdf:parseType="Resource"><exif:Fired>False</exif:Fired></exif:Flash>
                <xmp:Identifier><rdf:Bag><rdf:li>a</rdf:li><rdf:li>b</rdf:li></rdf:Bag></xmp:Identifier>
            </rdf:Description></rdf:RDF></x:xmpmeta>"#;
        let parsed = XmpParser::default().parse(source.as_bytes()).tree;
        assert_eq!(reparse(&parsed), parsed);
    }

    #[test]
    fn test_verbose_form_and_escaping() {
        let xml = XmpRenderer::default().render(&sample()).unwrap();
        assert!(xml.starts_with("<?xpacket begin="));
        assert!(xml.ends_with("<?xpacket end=\"w\"?>"));
        assert!(xml.contains("<xmp:CreateDate>2002-08-15T17:10:04Z</xmp:CreateDate>"));
        assert!(xml.contains("<rdf:li xml:lang=\"fr\">Port</rdf:li>"));
        assert!(xml.contains("a &lt; b &amp; c"));
        assert!(xml.contains("xmlns:ns1=\"http://acme.example/ns/1.0/\""));
    }

    #[test]
    fn test_source_prefixes_are_reused() {
        let mut tree = sample();
        tree.register_prefix("http://acme.example/ns/1.0/", "acme");
        tree.register_prefix(ns::DC, "rdf");
        let xml = XmpRenderer::default().render(&tree).unwrap();
        assert!(xml.contains("<acme:Widget>"));
        assert!(xml.contains("<dc:format>"));
    }

    #[test]
    fn test_qualifiers_in_both_forms() {
        let mut tree = XmpTree::new();
        let mut identifier = XmpNode::new(ns::DC, "identifier", NodeType::Bag);
        identifier.push_item(
            XmpNode::item("978-3-16").with_qualifier(XmpNode::simple(ns::XMP_IDQ, "Scheme", "ISBN")),
        );
        tree.root.set_child(identifier);

        let mut nested = XmpNode::simple(ns::DC, "source", "scan");
        nested.set_qualifier(
            XmpNode::new(ns::XMP_IDQ, "Origin", NodeType::Struct)
                .with_qualifier(XmpNode::simple(ns::XMP_IDQ, "Scheme", "x")),
        );
        nested.set_qualifier(XmpNode::simple(ns::XML, "lang", "en"));
        tree.root.set_child(nested);

        tree.root.set_child(
            XmpNode::simple(ns::DC, "rights", "")
                .with_qualifier(XmpNode::simple(ns::XMP_IDQ, "Scheme", "none")),
        );

        let xml = XmpRenderer::default().render(&tree).unwrap();
        assert!(xml.contains("<rdf:li xmpidq:Scheme=\"ISBN\">978-3-16</rdf:li>"));
        assert!(xml.contains("<rdf:value xml:lang=\"en\">scan</rdf:value>"));
        assert_eq!(reparse(&tree), tree);
    }

    #[test]
    fn test_without_wrapper() {
        let renderer = XmpRenderer::new(XmpConfig::default().with_packet_wrapper(false));
        let xml = renderer.render(&sample()).unwrap();
        assert!(xml.starts_with("<x:xmpmeta"));
        assert!(!xml.contains("xpacket"));
    }

    /// Chain of structs `levels` deep, the innermost a Simple leaf
    fn nested(levels: usize) -> XmpTree {
        let mut node = XmpNode::simple("http://a/", "leaf", "x");
        for _ in 1..levels {
            let mut parent = XmpNode::new("http://a/", "s", NodeType::Struct);
            parent.set_child(node);
            node = parent;
        }
        let mut tree = XmpTree::new();
        tree.set_property(node);
        tree
    }

    #[test]
    fn test_nesting_ceiling() {
        let deepest = nested(32);
        assert_eq!(reparse(&deepest), deepest);

        let renderer = XmpRenderer::default();
        assert_eq!(renderer.render(&nested(33)), Err(TagError::RecursionLimit { depth: 33 }));
        assert_eq!(renderer.render(&nested(1000)), Err(TagError::RecursionLimit { depth: 33 }));

        let shallow = XmpRenderer::new(XmpConfig::default().with_max_depth(2));
        assert!(shallow.render(&nested(2)).is_ok());
        assert_eq!(shallow.render(&nested(3)), Err(TagError::RecursionLimit { depth: 3 }));
    }

    #[test]
    fn test_segment_limit() {
        let mut tree = XmpTree::new();
        tree.root
            .set_child(XmpNode::simple(ns::DC, "description", "x".repeat(70_000)));
        let result = XmpRenderer::default().render(&tree);
        assert!(matches!(result, Err(TagError::SegmentTooLarge { limit: 65535, .. })));

        let unlimited = XmpRenderer::new(XmpConfig::default().with_segment_limit(None));
        assert!(unlimited.render(&tree).is_ok());
    }

    #[test]
    fn test_empty_containers() {
        let mut tree = XmpTree::new();
        tree.root.set_child(XmpNode::new(ns::DC, "subject", NodeType::Bag));
        tree.root.set_child(XmpNode::new(ns::XMP_MM, "DerivedFrom", NodeType::Struct));
        tree.root.set_child(XmpNode::simple(ns::DC, "format", ""));
        assert_eq!(reparse(&tree), tree);
    }
}
