// mediatag-core/src/xmp/node.rs
//! XMP property nodes
//!
//! A node is addressed by `(namespace URI, local name)`. Array items are
//! anonymous and carry the name `rdf:li`. Equality is structural and
//! follows XMP semantics rather than document order: struct fields and
//! qualifiers compare as maps, Bag items as a multiset, Seq and Alt items
//! in order.

use super::ns;

/// Shape of an XMP node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Text value
    Simple,
    /// Named fields
    Struct,
    /// Unordered array
    Bag,
    /// Ordered array
    Seq,
    /// Alternatives, usually language variants
    Alt,
}

impl NodeType {
    /// Bag, Seq or Alt
    pub fn is_array(self) -> bool {
        matches!(self, NodeType::Bag | NodeType::Seq | NodeType::Alt)
    }

    /// Local name of the RDF container element for array types
    pub fn container_name(self) -> Option<&'static str> {
        match self {
            NodeType::Bag => Some("Bag"),
            NodeType::Seq => Some("Seq"),
            NodeType::Alt => Some("Alt"),
            NodeType::Simple | NodeType::Struct => None,
        }
    }

    /// Array type for an RDF container element name
    pub fn from_container_name(name: &str) -> Option<Self> {
        match name {
            "Bag" => Some(NodeType::Bag),
            "Seq" => Some(NodeType::Seq),
            "Alt" => Some(NodeType::Alt),
            _ => None,
        }
    }
}

/// One property, struct field, array item or qualifier
#[derive(Debug, Clone)]
pub struct XmpNode {
    /// Namespace URI; empty for unqualified names
    pub namespace: String,
    /// Local name
    pub name: String,
    /// Shape of the node
    pub node_type: NodeType,
    /// Text of Simple nodes; empty otherwise
    pub value: String,
    /// Struct fields or array items
    pub children: Vec<XmpNode>,
    /// Qualifiers such as `xml:lang`
    pub qualifiers: Vec<XmpNode>,
}

impl XmpNode {
    /// Node of any shape without content
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            node_type,
            value: String::new(),
            children: Vec::new(),
            qualifiers: Vec::new(),
        }
    }

    /// Simple text node
    pub fn simple(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut node = Self::new(namespace, name, NodeType::Simple);
        node.value = value.into();
        node
    }

    /// Simple array item
    pub fn item(value: impl Into<String>) -> Self {
        Self::simple(ns::RDF, "li", value)
    }

    /// Add a qualifier, builder style
    pub fn with_qualifier(mut self, qualifier: XmpNode) -> Self {
        self.set_qualifier(qualifier);
        self
    }

    /// Add an `xml:lang` qualifier, builder style
    pub fn with_lang(self, lang: impl Into<String>) -> Self {
        self.with_qualifier(XmpNode::simple(ns::XML, "lang", lang))
    }

    /// Whether this node is addressed by `(namespace, name)`
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name
    }

    /// Value of the `xml:lang` qualifier
    pub fn lang(&self) -> Option<&str> {
        self.get_qualifier(ns::XML, "lang").map(|q| q.value.as_str())
    }

    /// Find a struct field (or root property)
    pub fn get_child(&self, namespace: &str, name: &str) -> Option<&XmpNode> {
        self.children.iter().find(|c| c.is(namespace, name))
    }

    /// Find a struct field for modification
    pub fn get_child_mut(&mut self, namespace: &str, name: &str) -> Option<&mut XmpNode> {
        self.children.iter_mut().find(|c| c.is(namespace, name))
    }

    /// Insert a field, replacing the one with the same name in place
    ///
    /// Returns the replaced node.
    pub fn set_child(&mut self, child: XmpNode) -> Option<XmpNode> {
        match self.get_child_mut(&child.namespace, &child.name) {
            Some(existing) => Some(std::mem::replace(existing, child)),
            None => {
                self.children.push(child);
                None
            }
        }
    }

    /// Find a field, creating an empty one of `node_type` when missing
    pub fn get_or_create_child(
        &mut self,
        namespace: &str,
        name: &str,
        node_type: NodeType,
    ) -> &mut XmpNode {
        let index = match self.children.iter().position(|c| c.is(namespace, name)) {
            Some(index) => index,
            None => {
                self.children.push(XmpNode::new(namespace, name, node_type));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Remove a field
    pub fn remove_child(&mut self, namespace: &str, name: &str) -> Option<XmpNode> {
        let index = self.children.iter().position(|c| c.is(namespace, name))?;
        Some(self.children.remove(index))
    }

    /// Append an array item
    pub fn push_item(&mut self, item: XmpNode) {
        self.children.push(item);
    }

    /// Find a qualifier
    pub fn get_qualifier(&self, namespace: &str, name: &str) -> Option<&XmpNode> {
        self.qualifiers.iter().find(|q| q.is(namespace, name))
    }

    /// Insert a qualifier, replacing the one with the same name
    pub fn set_qualifier(&mut self, qualifier: XmpNode) -> Option<XmpNode> {
        match self
            .qualifiers
            .iter_mut()
            .find(|q| q.is(&qualifier.namespace, &qualifier.name))
        {
            Some(existing) => Some(std::mem::replace(existing, qualifier)),
            None => {
                self.qualifiers.push(qualifier);
                None
            }
        }
    }
}

/// Every node of `a` has an equal, same-named node in `b` and the sizes match
fn same_named(a: &[XmpNode], b: &[XmpNode]) -> bool {
    a.len() == b.len()
        && a.iter().all(|x| {
            b.iter()
                .find(|y| y.is(&x.namespace, &x.name))
                .is_some_and(|y| x == y)
        })
}

/// Multiset equality
fn same_items(a: &[XmpNode], b: &[XmpNode]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        match b
            .iter()
            .enumerate()
            .position(|(i, y)| !used[i] && x == y)
        {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

impl PartialEq for XmpNode {
    fn eq(&self, other: &Self) -> bool {
        if !self.is(&other.namespace, &other.name)
            || self.node_type != other.node_type
            || self.value != other.value
            || !same_named(&self.qualifiers, &other.qualifiers)
        {
            return false;
        }
        match self.node_type {
            NodeType::Struct => same_named(&self.children, &other.children),
            NodeType::Bag => same_items(&self.children, &other.children),
            NodeType::Simple | NodeType::Seq | NodeType::Alt => self.children == other.children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(items: &[&str]) -> XmpNode {
        let mut node = XmpNode::new(ns::DC, "subject", NodeType::Bag);
        for item in items {
            node.push_item(XmpNode::item(*item));
        }
        node
    }

    #[test]
    fn test_bag_equality_ignores_order() {
        assert_eq!(bag(&["a", "b", "b"]), bag(&["b", "a", "b"]));
        assert_ne!(bag(&["a", "b", "b"]), bag(&["a", "a", "b"]));
        assert_ne!(bag(&["a"]), bag(&["a", "a"]));
    }

    #[test]
    fn test_seq_equality_respects_order() {
        let mut first = XmpNode::new(ns::DC, "creator", NodeType::Seq);
        first.push_item(XmpNode::item("Ann"));
        first.push_item(XmpNode::item("Bob"));

        let mut second = first.clone();
        second.children.reverse();
        assert_ne!(first, second);

        second.children.reverse();
        assert_eq!(first, second);
    }

    #[test]
    fn test_struct_and_qualifier_equality_ignore_order() {
        let mut a = XmpNode::new(ns::XMP_MM, "DerivedFrom", NodeType::Struct);
        a.set_child(XmpNode::simple(ns::ST_REF, "instanceID", "1"));
        a.set_child(XmpNode::simple(ns::ST_REF, "documentID", "2"));

        let mut b = XmpNode::new(ns::XMP_MM, "DerivedFrom", NodeType::Struct);
        b.set_child(XmpNode::simple(ns::ST_REF, "documentID", "2"));
        b.set_child(XmpNode::simple(ns::ST_REF, "instanceID", "1"));
        assert_eq!(a, b);

        let q1 = XmpNode::item("x")
            .with_lang("en")
            .with_qualifier(XmpNode::simple(ns::XMP_IDQ, "Scheme", "s"));
        let q2 = XmpNode::item("x")
            .with_qualifier(XmpNode::simple(ns::XMP_IDQ, "Scheme", "s"))
            .with_lang("en");
        assert_eq!(q1, q2);
        assert_ne!(q1, XmpNode::item("x").with_lang("en"));
    }

    #[test]
    fn test_child_accessors() {
        let mut root = XmpNode::new("", "", NodeType::Struct);
        assert!(root.set_child(XmpNode::simple(ns::XMP, "Rating", "3")).is_none());
        let old = root.set_child(XmpNode::simple(ns::XMP, "Rating", "5")).unwrap();
        assert_eq!(old.value, "3");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.get_child(ns::XMP, "Rating").unwrap().value, "5");

        root.get_or_create_child(ns::DC, "subject", NodeType::Bag)
            .push_item(XmpNode::item("sky"));
        root.get_or_create_child(ns::DC, "subject", NodeType::Bag)
            .push_item(XmpNode::item("sea"));
        assert_eq!(root.get_child(ns::DC, "subject").unwrap().children.len(), 2);

        assert!(root.remove_child(ns::XMP, "Rating").is_some());
        assert!(root.get_child(ns::XMP, "Rating").is_none());
    }

    #[test]
    fn test_qualifiers() {
        let mut item = XmpNode::item("Bonjour").with_lang("fr");
        assert_eq!(item.lang(), Some("fr"));
        item.set_qualifier(XmpNode::simple(ns::XML, "lang", "fr-CA"));
        assert_eq!(item.qualifiers.len(), 1);
        assert_eq!(item.get_qualifier(ns::XML, "lang").unwrap().value, "fr-CA");
    }
}
