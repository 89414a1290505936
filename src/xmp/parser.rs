// mediatag-core/src/xmp/parser.rs
//! RDF/XML to node tree
//!
//! Parsing runs in two stages. The first reads the packet into a generic
//! element tree with every name resolved to `(namespace URI, local name)`;
//! XML errors stop it early but everything opened so far is kept. The second
//! stage interprets that tree as RDF, which is where shorthand attributes,
//! containers, nested descriptions and `rdf:value` qualifiers are all
//! brought to the same node shape.

use std::borrow::Cow;
use std::collections::BTreeMap;

use log::{debug, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::node::{NodeType, XmpNode};
use super::{XmpTree, ns};
use crate::config::XmpConfig;
use crate::{Result, TagError};

/// A parsed tree together with everything that went wrong on the way
#[derive(Debug, Clone, Default)]
pub struct ParsedXmp {
    /// The (possibly partial) tree
    pub tree: XmpTree,
    /// Recoverable problems, in the order they were found
    pub warnings: Vec<TagError>,
}

/// Parser for XMP packets
#[derive(Debug, Clone, Default)]
pub struct XmpParser {
    config: XmpConfig,
}

impl XmpParser {
    /// Create a parser with the given limits
    pub fn new(config: XmpConfig) -> Self {
        Self { config }
    }

    /// Parse a packet; never fails, problems are reported as warnings
    pub fn parse(&self, bytes: &[u8]) -> ParsedXmp {
        let text = decode_text(bytes);
        let mut warnings = Vec::new();
        let mut tree = XmpTree::new();

        let limit = element_ceiling(self.config.max_depth);
        let elements = read_elements(&text, limit, &mut tree.prefixes, &mut warnings);
        let mut interpreter = Interpreter {
            max_depth: self.config.max_depth,
            warnings,
        };
        interpreter.describe(&elements, &mut tree);

        for warning in &interpreter.warnings {
            warn!("{warning}");
        }
        debug!(
            "parsed XMP with {} properties and {} warnings",
            tree.root.children.len(),
            interpreter.warnings.len()
        );
        ParsedXmp {
            tree,
            warnings: interpreter.warnings,
        }
    }

    /// Parse a packet, failing on the first problem
    pub fn parse_strict(&self, bytes: &[u8]) -> Result<XmpTree> {
        let parsed = self.parse(bytes);
        match parsed.warnings.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(parsed.tree),
        }
    }
}

/// Packet bytes to text
///
/// UTF-16 is recognized by its byte order mark or by the `<` of the first
/// element next to a zero byte. A UTF-8 byte order mark is dropped.
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => Cow::Owned(utf16(rest, true)),
        [0xFF, 0xFE, rest @ ..] => Cow::Owned(utf16(rest, false)),
        [0x00, 0x3C, ..] => Cow::Owned(utf16(bytes, true)),
        [0x3C, 0x00, ..] => Cow::Owned(utf16(bytes, false)),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest),
        _ => String::from_utf8_lossy(bytes),
    }
}

fn utf16(bytes: &[u8], big_endian: bool) -> String {
    let units = bytes.chunks_exact(2).map(|pair| {
        if big_endian {
            u16::from_be_bytes([pair[0], pair[1]])
        } else {
            u16::from_le_bytes([pair[0], pair[1]])
        }
    });
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

// =============================================================================
// Stage 1: XML elements with resolved names
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Element {
    namespace: String,
    local: String,
    attributes: Vec<Attribute>,
    children: Vec<Element>,
    text: String,
}

#[derive(Debug, Clone)]
struct Attribute {
    namespace: String,
    local: String,
    value: String,
}

impl Element {
    fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace == namespace && self.local == local
    }

    fn attribute(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace == namespace && a.local == local)
            .map(|a| a.value.as_str())
    }
}

fn malformed(reason: impl ToString) -> TagError {
    TagError::MalformedXmp {
        reason: reason.to_string(),
    }
}

/// Prefix declarations of every open element, innermost last
#[derive(Default)]
struct Scopes(Vec<Vec<(String, String)>>);

impl Scopes {
    fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(ns::XML);
        }
        self.0
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|(declared, _)| declared == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Split a qualified name and resolve its prefix
    ///
    /// Unprefixed attributes have no namespace; unprefixed elements take the
    /// default namespace if one is declared.
    fn qualify(&self, qname: &str, element: bool) -> Result<(String, String)> {
        match qname.split_once(':') {
            Some((prefix, local)) => match self.resolve(prefix) {
                Some(uri) => Ok((uri.to_string(), local.to_string())),
                None => Err(malformed(format!("undeclared namespace prefix '{prefix}'"))),
            },
            None if element => Ok((
                self.resolve("").unwrap_or_default().to_string(),
                qname.to_string(),
            )),
            None => Ok((String::new(), qname.to_string())),
        }
    }
}

/// Open an element: record its declarations, then resolve its names
fn open(
    start: &BytesStart<'_>,
    scopes: &mut Scopes,
    prefixes: &mut BTreeMap<String, String>,
) -> Result<Element> {
    let mut declared = Vec::new();
    let mut raw = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(malformed)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(malformed)?.into_owned();
        if key == "xmlns" {
            declared.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            prefixes
                .entry(value.clone())
                .or_insert_with(|| prefix.to_string());
            declared.push((prefix.to_string(), value));
        } else {
            raw.push((key, value));
        }
    }
    scopes.0.push(declared);

    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let (namespace, local) = scopes.qualify(&name, true)?;
    let mut attributes = Vec::with_capacity(raw.len());
    for (key, value) in raw {
        let (namespace, local) = scopes.qualify(&key, false)?;
        attributes.push(Attribute {
            namespace,
            local,
            value,
        });
    }
    Ok(Element {
        namespace,
        local,
        attributes,
        ..Element::default()
    })
}

fn attach(element: Element, stack: &mut [Element], roots: &mut Vec<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => roots.push(element),
    }
}

/// Deepest XML element kept for a given property nesting ceiling
///
/// The packet envelope takes a few levels, and one property level can take
/// up to three elements (property, container, item description).
fn element_ceiling(max_depth: usize) -> usize {
    max_depth.saturating_mul(3).saturating_add(8)
}

/// Read the packet into top-level elements
///
/// On an XML error the elements still open are closed where they stand, so
/// the result holds everything read before the error. Elements nested deeper
/// than `limit` are skipped with a warning and reading resumes after them.
fn read_elements(
    text: &str,
    limit: usize,
    prefixes: &mut BTreeMap<String, String>,
    warnings: &mut Vec<TagError>,
) -> Vec<Element> {
    let mut reader = Reader::from_str(text);
    let mut scopes = Scopes::default();
    let mut stack: Vec<Element> = Vec::new();
    let mut roots = Vec::new();
    // Open elements inside a subtree being skipped
    let mut skipping = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(error) => {
                warnings.push(malformed(format!(
                    "{error} at byte {}",
                    reader.buffer_position()
                )));
                break;
            }
        };
        if skipping > 0 && !matches!(event, Event::Eof) {
            match event {
                Event::Start(_) => skipping += 1,
                Event::End(_) => skipping -= 1,
                _ => {}
            }
            continue;
        }
        match event {
            Event::Start(_) | Event::Empty(_) if stack.len() >= limit => {
                warnings.push(TagError::RecursionLimit {
                    depth: stack.len() + 1,
                });
                if matches!(event, Event::Start(_)) {
                    skipping = 1;
                }
            }
            Event::Start(start) => match open(&start, &mut scopes, prefixes) {
                Ok(element) => stack.push(element),
                Err(error) => {
                    warnings.push(error);
                    break;
                }
            },
            Event::Empty(start) => {
                let opened = open(&start, &mut scopes, prefixes);
                scopes.0.pop();
                match opened {
                    Ok(element) => attach(element, &mut stack, &mut roots),
                    Err(error) => {
                        warnings.push(error);
                        break;
                    }
                }
            }
            Event::End(_) => {
                scopes.0.pop();
                if let Some(element) = stack.pop() {
                    attach(element, &mut stack, &mut roots);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    match text.unescape() {
                        Ok(unescaped) => current.text.push_str(&unescaped),
                        Err(error) => {
                            warnings.push(malformed(error));
                            break;
                        }
                    }
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => {
                if !stack.is_empty() {
                    warnings.push(malformed(format!(
                        "{} elements left open at end of packet",
                        stack.len()
                    )));
                }
                break;
            }
            _ => {}
        }
    }

    while let Some(element) = stack.pop() {
        attach(element, &mut stack, &mut roots);
    }
    roots
}

// =============================================================================
// Stage 2: RDF interpretation
// =============================================================================

struct Interpreter {
    max_depth: usize,
    warnings: Vec<TagError>,
}

fn is_rdf(element: &Element, local: &str) -> bool {
    element.is(ns::RDF, local)
}

/// Attributes that describe RDF syntax or XML rather than properties
fn is_syntax(namespace: &str) -> bool {
    namespace.is_empty() || namespace == ns::RDF || namespace == ns::XML
}

fn find_rdf<'e>(elements: &'e [Element]) -> Option<&'e Element> {
    elements.iter().find_map(|element| {
        if is_rdf(element, "RDF") {
            Some(element)
        } else {
            find_rdf(&element.children)
        }
    })
}

fn collect_descriptions<'e>(elements: &'e [Element], found: &mut Vec<&'e Element>) {
    for element in elements {
        if is_rdf(element, "Description") {
            found.push(element);
        } else {
            collect_descriptions(&element.children, found);
        }
    }
}

impl Interpreter {
    fn describe(&mut self, elements: &[Element], tree: &mut XmpTree) {
        let mut descriptions = Vec::new();
        match find_rdf(elements) {
            Some(rdf) => descriptions.extend(
                rdf.children
                    .iter()
                    .filter(|child| is_rdf(child, "Description")),
            ),
            None => collect_descriptions(elements, &mut descriptions),
        }

        for description in descriptions {
            if let Some(about) = description.attribute(ns::RDF, "about") {
                if tree.about.is_empty() {
                    tree.about = about.to_string();
                }
            }
            for property in self.description_fields(description, 1) {
                tree.root.set_child(property);
            }
        }
    }

    /// Properties of an `rdf:Description`: shorthand attributes, then elements
    fn description_fields(&mut self, description: &Element, depth: usize) -> Vec<XmpNode> {
        let mut fields: Vec<XmpNode> = description
            .attributes
            .iter()
            .filter(|a| !is_syntax(&a.namespace))
            .map(|a| XmpNode::simple(&a.namespace, &a.local, &a.value))
            .collect();
        fields.extend(
            description
                .children
                .iter()
                .filter_map(|child| self.property(child, depth)),
        );
        fields
    }

    /// Interpret one property element (or `rdf:li` item)
    fn property(&mut self, element: &Element, depth: usize) -> Option<XmpNode> {
        if depth > self.max_depth {
            self.warnings.push(TagError::RecursionLimit { depth });
            return None;
        }

        let mut node = XmpNode::new(&element.namespace, &element.local, NodeType::Simple);
        let mut attributes = Vec::new();
        let mut resource_form = false;
        let mut resource = None;
        for attribute in &element.attributes {
            match (attribute.namespace.as_str(), attribute.local.as_str()) {
                (ns::RDF, "parseType") => resource_form = attribute.value == "Resource",
                (ns::RDF, "resource") => resource = Some(attribute.value.clone()),
                (ns::XML, "lang") => {
                    node.set_qualifier(XmpNode::simple(ns::XML, "lang", &attribute.value));
                }
                (namespace, _) if is_syntax(namespace) => {}
                _ => attributes.push(XmpNode::simple(
                    &attribute.namespace,
                    &attribute.local,
                    &attribute.value,
                )),
            }
        }

        let children = &element.children;
        let container = match children.as_slice() {
            [only] if only.namespace == ns::RDF => NodeType::from_container_name(&only.local)
                .map(|node_type| (node_type, only)),
            _ => None,
        };

        if resource_form {
            node.node_type = NodeType::Struct;
            node.children = attributes;
            for child in children {
                if let Some(field) = self.property(child, depth + 1) {
                    node.set_child(field);
                }
            }
        } else if let Some((node_type, container)) = container {
            node.node_type = node_type;
            node.qualifiers.extend(attributes);
            for item in container.children.iter().filter(|c| is_rdf(c, "li")) {
                if let Some(item) = self.property(item, depth + 1) {
                    node.push_item(item);
                }
            }
        } else if let [description] = children.as_slice() {
            if is_rdf(description, "Description") {
                node.node_type = NodeType::Struct;
                node.qualifiers.extend(attributes);
                for field in self.description_fields(description, depth + 1) {
                    node.set_child(field);
                }
            } else {
                node.node_type = NodeType::Struct;
                node.qualifiers.extend(attributes);
                if let Some(field) = self.property(description, depth + 1) {
                    node.set_child(field);
                }
            }
        } else if !children.is_empty() {
            node.node_type = NodeType::Struct;
            node.qualifiers.extend(attributes);
            for child in children {
                if let Some(field) = self.property(child, depth + 1) {
                    node.set_child(field);
                }
            }
        } else if let Some(resource) = resource {
            node.value = resource;
            node.qualifiers.extend(attributes);
        } else if element.text.trim().is_empty() && !attributes.is_empty() {
            node.node_type = NodeType::Struct;
            node.children = attributes;
        } else {
            node.value = element.text.clone();
            node.qualifiers.extend(attributes);
        }

        Some(lift_value(node))
    }
}

/// `rdf:value` form: a struct holding an `rdf:value` field is that value
/// with the remaining fields as qualifiers
fn lift_value(mut node: XmpNode) -> XmpNode {
    if node.node_type != NodeType::Struct {
        return node;
    }
    let Some(value) = node.remove_child(ns::RDF, "value") else {
        return node;
    };
    let mut qualifiers = value.qualifiers;
    qualifiers.append(&mut node.qualifiers);
    qualifiers.append(&mut node.children);
    XmpNode {
        namespace: node.namespace,
        name: node.name,
        node_type: value.node_type,
        value: value.value,
        children: value.children,
        qualifiers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> ParsedXmp {
        XmpParser::default().parse(xml.as_bytes())
    }

    const HEAD: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">"#;
    const TAIL: &str = "</rdf:RDF></x:xmpmeta>";

    fn packet(description: &str) -> String {
        format!("{HEAD}{description}{TAIL}")
    }

    #[test]
    fn test_shorthand_and_verbose_forms_are_equal() {
        let shorthand = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:CreateDate="2002-08-15T17:10:04Z"/>"#,
        ));
        let verbose = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:xmp="http://ns.adobe.com/xap/1.0/"><xmp:CreateDate>2002-08-15T17:10:04Z</xmp:CreateDate></rdf:Description>"#,
        ));
        assert!(shorthand.warnings.is_empty());
        assert!(verbose.warnings.is_empty());
        assert_eq!(shorthand.tree.root, verbose.tree.root);

        let node = shorthand.tree.get_property(ns::XMP, "CreateDate").unwrap();
        assert_eq!(node.node_type, NodeType::Simple);
        assert_eq!(node.value, "2002-08-15T17:10:04Z");
    }

    #[test]
    fn test_arrays_and_language_alternatives() {
        let parsed = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
                <dc:subject><rdf:Bag><rdf:li>sky</rdf:li><rdf:li>sea</rdf:li></rdf:Bag></dc:subject>
                <dc:creator><rdf:Seq><rdf:li>Ann</rdf:li></rdf:Seq></dc:creator>
                <dc:title><rdf:Alt>
                    <rdf:li xml:lang="x-default">Harbor</rdf:li>
                    <rdf:li xml:lang="fr">Port</rdf:li>
                </rdf:Alt></dc:title>
            </rdf:Description>"#,
        ));
        assert!(parsed.warnings.is_empty());
        let tree = parsed.tree;

        let subject = tree.get_property(ns::DC, "subject").unwrap();
        assert_eq!(subject.node_type, NodeType::Bag);
        assert_eq!(subject.children.len(), 2);
        assert!(subject.children[0].is(ns::RDF, "li"));

        assert_eq!(tree.get_property(ns::DC, "creator").unwrap().node_type, NodeType::Seq);

        let title = tree.get_property(ns::DC, "title").unwrap();
        assert_eq!(title.node_type, NodeType::Alt);
        assert_eq!(title.children[1].lang(), Some("fr"));
        assert_eq!(title.children[1].value, "Port");
    }

    #[test]
    fn test_struct_forms() {
        let parsed = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:xmpMM="http://ns.adobe.com/xap/1.0/mm/" xmlns:stRef="http://ns.adobe.com/xap/1.0/sType/ResourceRef#" xmlns:exif="http://ns.adobe.com/exif/1.0/">
                <xmpMM:DerivedFrom rdf:parseType="Resource"><stRef:instanceID>i1</stRef:instanceID></xmpMM:DerivedFrom>
                <xmpMM:ManagedFrom><rdf:Description stRef:documentID="d1"><stRef:instanceID>i2</stRef:instanceID></rdf:Description></xmpMM:ManagedFrom>
                <exif:Flash exif:Fired="False" exif:Mode="2"/>
            </rdf:Description>"#,
        ));
        assert!(parsed.warnings.is_empty());
        let tree = parsed.tree;

        let derived = tree.get_property(ns::XMP_MM, "DerivedFrom").unwrap();
        assert_eq!(derived.node_type, NodeType::Struct);
        assert_eq!(derived.get_child(ns::ST_REF, "instanceID").unwrap().value, "i1");

        let managed = tree.get_property(ns::XMP_MM, "ManagedFrom").unwrap();
        assert_eq!(managed.get_child(ns::ST_REF, "documentID").unwrap().value, "d1");
        assert_eq!(managed.get_child(ns::ST_REF, "instanceID").unwrap().value, "i2");

        let flash = tree.get_property(ns::EXIF, "Flash").unwrap();
        assert_eq!(flash.node_type, NodeType::Struct);
        assert_eq!(flash.get_child(ns::EXIF, "Mode").unwrap().value, "2");
    }

    #[test]
    fn test_rdf_value_qualifiers() {
        let parsed = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:xmpidq="http://ns.adobe.com/xmp/Identifier/qual/1.0/">
                <dc:identifier><rdf:Bag><rdf:li><rdf:Description>
                    <rdf:value>978-3-16</rdf:value>
                    <xmpidq:Scheme>ISBN</xmpidq:Scheme>
                </rdf:Description></rdf:li></rdf:Bag></dc:identifier>
            </rdf:Description>"#,
        ));
        assert!(parsed.warnings.is_empty());
        let identifier = parsed.tree.get_property(ns::DC, "identifier").unwrap();
        let item = &identifier.children[0];
        assert_eq!(item.node_type, NodeType::Simple);
        assert_eq!(item.value, "978-3-16");
        assert_eq!(item.get_qualifier(ns::XMP_IDQ, "Scheme").unwrap().value, "ISBN");
    }

    #[test]
    fn test_unknown_namespace_is_preserved() {
        let parsed = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:acme="http://acme.example/ns/1.0/"><acme:Widget>7</acme:Widget></rdf:Description>"#,
        ));
        let node = parsed.tree.get_property("http://acme.example/ns/1.0/", "Widget").unwrap();
        assert_eq!(node.value, "7");
        assert_eq!(
            parsed.tree.prefixes.get("http://acme.example/ns/1.0/").map(String::as_str),
            Some("acme")
        );
    }

    #[test]
    fn test_malformed_xml_yields_partial_tree() {
        let parsed = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:xmp="http://ns.adobe.com/xap/1.0/">
                <dc:format>image/jpeg</dc:format>
                <xmp:Rating>3</xmp:Label>"#,
        ));
        assert!(!parsed.warnings.is_empty());
        assert_eq!(parsed.tree.get_property(ns::DC, "format").unwrap().value, "image/jpeg");
        assert!(XmpParser::default().parse_strict(packet("<rdf:Bag>").as_bytes()).is_err());
    }

    #[test]
    fn test_undeclared_prefix_stops_but_keeps_earlier_properties() {
        let parsed = parse(&packet(
            r#"<rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:format>image/png</dc:format><foo:bar>1</foo:bar></rdf:Description>"#,
        ));
        assert!(matches!(parsed.warnings[0], TagError::MalformedXmp { .. }));
        assert_eq!(parsed.tree.get_property(ns::DC, "format").unwrap().value, "image/png");
        assert_eq!(parsed.tree.root.children.len(), 1);
    }

    #[test]
    fn test_garbage_is_an_empty_tree() {
        let parsed = parse("this is not xml at all");
        assert!(parsed.tree.root.children.is_empty());
    }

    #[test]
    fn test_depth_ceiling() {
        let config = XmpConfig::default().with_max_depth(2);
        let parsed = XmpParser::new(config).parse(
            packet(
                r#"<rdf:Description xmlns:a="http://a/"><a:p rdf:parseType="Resource"><a:q rdf:parseType="Resource"><a:r>deep</a:r></a:q></a:p></rdf:Description>"#,
            )
            .as_bytes(),
        );
        assert_eq!(parsed.warnings, vec![TagError::RecursionLimit { depth: 3 }]);
        let p = parsed.tree.get_property("http://a/", "p").unwrap();
        assert!(p.get_child("http://a/", "q").unwrap().children.is_empty());
    }

    #[test]
    fn test_deeply_nested_xml_is_cut_off() {
        let depth = 100_000;
        let balanced = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let parsed = parse(&balanced);
        assert!(parsed.tree.root.children.is_empty());
        assert_eq!(parsed.warnings, vec![TagError::RecursionLimit { depth: 105 }]);

        let unclosed = parse(&"<a>".repeat(depth));
        assert!(unclosed.tree.root.children.is_empty());
        assert_eq!(unclosed.warnings[0], TagError::RecursionLimit { depth: 105 });
        assert!(matches!(unclosed.warnings[1], TagError::MalformedXmp { .. }));
    }

    #[test]
    fn test_reading_resumes_after_skipped_subtree() {
        let nested = format!("{}{}", "<a:x>".repeat(20), "</a:x>".repeat(20));
        let config = XmpConfig::default().with_max_depth(1);
        let parsed = XmpParser::new(config).parse(
            packet(&format!(
                r#"<rdf:Description xmlns:a="http://a/"><a:p>{nested}</a:p><a:after>ok</a:after></rdf:Description>"#
            ))
            .as_bytes(),
        );
        assert!(parsed.warnings.contains(&TagError::RecursionLimit { depth: 12 }));
        assert_eq!(parsed.tree.get_property("http://a/", "after").unwrap().value, "ok");
    }

    #[test]
    fn test_utf16_and_bom_detection() {
        let xml = packet(
            r#"<rdf:Description xmlns:dc="http://purl.org/dc/elements/1.1/" dc:format="image/tiff"/>"#,
        );
        let mut utf16: Vec<u8> = vec![0xFF, 0xFE];
        utf16.extend(xml.encode_utf16().flat_map(u16::to_le_bytes));
        let parsed = XmpParser::default().parse(&utf16);
        assert_eq!(parsed.tree.get_property(ns::DC, "format").unwrap().value, "image/tiff");

        let no_bom: Vec<u8> = xml.encode_utf16().flat_map(u16::to_be_bytes).collect();
        let parsed = XmpParser::default().parse(&no_bom);
        assert_eq!(parsed.tree.get_property(ns::DC, "format").unwrap().value, "image/tiff");

        let mut utf8 = vec![0xEF, 0xBB, 0xBF];
        utf8.extend_from_slice(xml.as_bytes());
        assert!(XmpParser::default().parse(&utf8).warnings.is_empty());
    }

    #[test]
    fn test_packet_wrapper_and_bare_description() {
        let wrapped = format!(
            "<?xpacket begin=\"\u{feff}\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>{}<?xpacket end=\"w\"?>",
            packet(r#"<rdf:Description rdf:about="uuid:1" xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="4"/>"#)
        );
        let parsed = parse(&wrapped);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.tree.about, "uuid:1");

        let bare = parse(
            r#"<rdf:Description xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="4"/>"#,
        );
        assert_eq!(bare.tree.root, parsed.tree.root);
    }

    #[test]
    fn test_later_description_replaces_property() {
        let parsed = parse(&packet(
            r#"<rdf:Description xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="1"/><rdf:Description xmlns:xmp="http://ns.adobe.com/xap/1.0/" xmp:Rating="5" xmp:Label="Red"/>"#,
        ));
        assert_eq!(parsed.tree.root.children.len(), 2);
        assert_eq!(parsed.tree.get_property(ns::XMP, "Rating").unwrap().value, "5");
    }
}
