//! Arena-based XML document tree.
//!
//! All nodes live in a contiguous `Vec<NodeData>` owned by the `Document`
//! and are referenced by `NodeId`, a newtype over `NonZeroU32`. A parent
//! owns its children through the arena; children point back with a plain
//! index, so there are no reference cycles and dropping the `Document`
//! frees everything at once.
//!
//! # Node kinds and ownership
//!
//! Document and element nodes are parents. Text, comment, processing
//! instruction and element nodes are children, linked into a sibling
//! chain. Attribute and namespace nodes are neither: they sit in their
//! element's `attributes` / `namespaces` lists and their `parent` link
//! names the owning element (see [`Document::owner`]).

mod namespace;
mod node;

pub use namespace::XML_NAMESPACE;
pub use node::{Attribute, Name, Namespace, NodeKind};

use crate::error::DomError;
use std::num::NonZeroU32;

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node, or the owning element for attribute and namespace nodes.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An XML document.
///
/// The `Document` owns all nodes in an arena. Navigation goes through
/// `&Document`, construction through `&mut Document`; every structural
/// rule is checked when a node is attached, so a `Document` is always
/// well-formed apart from possibly lacking a root element.
///
/// # Examples
///
/// ```
/// use xmldom::Document;
///
/// let doc = Document::parse_str(r#"<e xmlns="urn:x" a="v"/>"#).unwrap();
/// let root = doc.root_element().unwrap();
/// assert_eq!(doc.element_name(root).unwrap().uri, "urn:x");
/// assert_eq!(doc.attribute(root, "", "a"), Some("v"));
/// ```
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document node id (not the root element).
    root: NodeId,
}

impl Document {
    /// Creates a new empty document.
    ///
    /// The document contains a single Document node and no root element.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        // Index 1: the document node
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
        }
    }

    /// Parses an XML string into a `Document`.
    ///
    /// # Errors
    ///
    /// Returns `DomError` if the markup is rejected by the tokenizer or the
    /// resulting event stream violates a structural, namespace or attribute
    /// rule.
    pub fn parse_str(input: &str) -> Result<Self, DomError> {
        crate::parser::parse_str(input)
    }

    /// Parses XML from raw bytes, detecting the encoding first.
    ///
    /// # Errors
    ///
    /// Returns `DomError` if the bytes cannot be decoded or the document
    /// cannot be built.
    pub fn parse_bytes(input: &[u8]) -> Result<Self, DomError> {
        crate::parser::parse_bytes(input)
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root element of the document (the single top-level element).
    ///
    /// Returns `None` if no element has been appended yet.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.node(id).kind, NodeKind::Element { .. }))
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a node of this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the kind (and payload) of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the resolved name of an element node.
    #[must_use]
    pub fn element_name(&self, id: NodeId) -> Option<&Name> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the local name of an element or attribute, or the target of
    /// a processing instruction.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } | NodeKind::Attribute(Attribute { name, .. }) => {
                Some(&name.local)
            }
            NodeKind::ProcessingInstruction { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Returns the namespace URI of an element or attribute node.
    ///
    /// Names without a namespace report `Some("")`; other node kinds `None`.
    #[must_use]
    pub fn node_namespace(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } | NodeKind::Attribute(Attribute { name, .. }) => {
                Some(&name.uri)
            }
            _ => None,
        }
    }

    /// Returns the text of a text or comment node, the data of a processing
    /// instruction, or the value of an attribute.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text { content } | NodeKind::Comment { content } => Some(content),
            NodeKind::ProcessingInstruction { data, .. } => Some(data),
            NodeKind::Attribute(attr) => Some(&attr.value),
            _ => None,
        }
    }

    /// Returns the concatenated text content of a node and all its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text { content } => buf.push_str(content),
            NodeKind::Attribute(attr) => buf.push_str(&attr.value),
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, buf);
                }
            }
        }
    }

    /// Returns the attribute node ids of an element, in document order.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attribute_nodes(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the attributes of an element, in document order.
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = &Attribute> + '_ {
        self.attribute_nodes(id)
            .iter()
            .filter_map(|&attr| match &self.node(attr).kind {
                NodeKind::Attribute(attr) => Some(attr),
                _ => None,
            })
    }

    /// Returns the value of the attribute with the given namespace URI and
    /// local name. Unprefixed attributes have the URI `""`.
    #[must_use]
    pub fn attribute(&self, id: NodeId, uri: &str, local: &str) -> Option<&str> {
        self.attributes(id)
            .find(|a| a.name.uri == uri && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Returns the namespace node ids declared on an element, in
    /// declaration order.
    #[must_use]
    pub fn namespace_nodes(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Element { namespaces, .. } => namespaces,
            _ => &[],
        }
    }

    /// Returns the namespace declarations local to an element.
    pub fn namespaces(&self, id: NodeId) -> impl Iterator<Item = &Namespace> + '_ {
        self.namespace_nodes(id)
            .iter()
            .filter_map(|&ns| match &self.node(ns).kind {
                NodeKind::Namespace(decl) => Some(decl),
                _ => None,
            })
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    ///
    /// Attribute and namespace nodes have an owner instead of a parent and
    /// return `None` here.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).kind {
            NodeKind::Attribute(_) | NodeKind::Namespace(_) => None,
            _ => self.node(id).parent,
        }
    }

    /// Returns the element owning an attribute or namespace node.
    #[must_use]
    pub fn owner(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).kind {
            NodeKind::Attribute(_) | NodeKind::Namespace(_) => self.node(id).parent,
            _ => None,
        }
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Returns an iterator over all descendants of a node (depth-first).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    // --- Construction ---

    /// Allocates a new, detached node in the arena and returns its `NodeId`.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Appends `child` to the end of `parent`'s child list.
    ///
    /// The document accepts elements, comments and processing instructions,
    /// and at most one element. Elements accept elements, text, comments and
    /// processing instructions. Nothing else is a parent.
    ///
    /// # Errors
    ///
    /// Returns a structural error if the child type is not allowed in the
    /// parent, if a second root element is appended, or if `child` is
    /// already attached or is `parent` or one of its ancestors.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let allowed = match (&self.node(parent).kind, &self.node(child).kind) {
            (NodeKind::Document, NodeKind::Element { .. }) => {
                if self.root_element().is_some() {
                    return Err(DomError::structure(
                        "document cannot have more than one element",
                    ));
                }
                true
            }
            (
                NodeKind::Document | NodeKind::Element { .. },
                NodeKind::Comment { .. } | NodeKind::ProcessingInstruction { .. },
            )
            | (NodeKind::Element { .. }, NodeKind::Element { .. } | NodeKind::Text { .. }) => true,
            _ => false,
        };
        if !allowed {
            return Err(DomError::structure(format!(
                "child of type {} is not allowed in {}",
                self.node(child).kind.type_name(),
                self.node(parent).kind.type_name()
            )));
        }
        if self.node(child).parent.is_some() {
            return Err(DomError::structure("node already has a parent"));
        }
        if self.ancestors(parent).any(|id| id == child) {
            return Err(DomError::structure(
                "node cannot be appended to itself or its descendant",
            ));
        }

        self.node_mut(child).parent = Some(parent);
        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
        } else {
            self.node_mut(parent).first_child = Some(child);
        }
        self.node_mut(parent).last_child = Some(child);
        Ok(())
    }

    /// Appends character data to `parent`, extending its trailing text node
    /// if there is one. Adjacent text siblings are never created.
    ///
    /// # Errors
    ///
    /// Returns a structural error if `parent` does not accept text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<(), DomError> {
        if text.is_empty() {
            return Ok(());
        }
        if let Some(last) = self.last_child(parent) {
            if let NodeKind::Text { content } = &mut self.node_mut(last).kind {
                content.push_str(text);
                return Ok(());
            }
        }
        let node = self.create_node(NodeKind::Text {
            content: text.to_string(),
        });
        self.append(parent, node)
    }

    /// Declares `prefix` (or the default namespace for `None`) on `element`.
    ///
    /// Declarations keep their insertion order. Declaring a prefix the
    /// element already declares replaces the URI in place.
    ///
    /// # Errors
    ///
    /// Returns a structural error if `element` is not an element.
    pub fn declare_namespace(
        &mut self,
        element: NodeId,
        prefix: Option<&str>,
        uri: &str,
    ) -> Result<NodeId, DomError> {
        let NodeKind::Element { namespaces, .. } = &self.node(element).kind else {
            return Err(DomError::structure(format!(
                "{} cannot declare namespaces",
                self.node(element).kind.type_name()
            )));
        };
        let existing = namespaces.iter().copied().find(|&ns| {
            matches!(&self.node(ns).kind, NodeKind::Namespace(decl) if decl.prefix.as_deref() == prefix)
        });
        if let Some(ns) = existing {
            if let NodeKind::Namespace(decl) = &mut self.node_mut(ns).kind {
                decl.uri = uri.to_string();
            }
            return Ok(ns);
        }

        let ns = self.create_node(NodeKind::Namespace(Namespace {
            prefix: prefix.map(str::to_string),
            uri: uri.to_string(),
        }));
        self.node_mut(ns).parent = Some(element);
        if let NodeKind::Element { namespaces, .. } = &mut self.node_mut(element).kind {
            namespaces.push(ns);
        }
        Ok(ns)
    }

    /// Adds an attribute with an already resolved name to `element`.
    ///
    /// # Errors
    ///
    /// Returns an attribute error if the element already has an attribute
    /// with the same namespace URI and local name (whatever the prefixes),
    /// or a structural error if `element` is not an element.
    pub fn add_attribute(
        &mut self,
        element: NodeId,
        name: Name,
        value: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        if !matches!(self.node(element).kind, NodeKind::Element { .. }) {
            return Err(DomError::structure(format!(
                "{} cannot have attributes",
                self.node(element).kind.type_name()
            )));
        }
        if self.attributes(element).any(|a| a.name == name) {
            return Err(DomError::attribute(format!("duplicate attribute: {name}")));
        }

        let attr = self.create_node(NodeKind::Attribute(Attribute {
            name,
            value: value.into(),
        }));
        self.node_mut(attr).parent = Some(element);
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(element).kind {
            attributes.push(attr);
        }
        Ok(attr)
    }

    /// Returns the total number of nodes in the arena (including the
    /// document node and any detached nodes).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
///
/// Starting from an attribute or namespace node, the walk continues
/// through the owning element.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}

/// Depth-first iterator over all descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        if let Some(sibling) = self.doc.next_sibling(current) {
            self.next = Some(sibling);
            return Some(current);
        }

        // Walk up to find an ancestor with a next sibling
        let mut ancestor = self.doc.parent(current);
        while let Some(anc) = ancestor {
            if anc == self.root {
                break;
            }
            if let Some(sibling) = self.doc.next_sibling(anc) {
                self.next = Some(sibling);
                return Some(current);
            }
            ancestor = self.doc.parent(anc);
        }

        self.next = None;
        Some(current)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn elem(local: &str) -> NodeKind {
        NodeKind::element(Name::new("", None, local))
    }

    fn text(content: &str) -> NodeKind {
        NodeKind::Text {
            content: content.to_string(),
        }
    }

    fn comment(content: &str) -> NodeKind {
        NodeKind::Comment {
            content: content.to_string(),
        }
    }

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new();
        assert!(matches!(doc.kind(doc.root()), NodeKind::Document));
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.root_element(), None);
    }

    #[test]
    fn test_create_and_append_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let e = doc.create_node(elem("div"));
        doc.append(root, e).unwrap();

        assert_eq!(doc.first_child(root), Some(e));
        assert_eq!(doc.last_child(root), Some(e));
        assert_eq!(doc.parent(e), Some(root));
        assert_eq!(doc.node_name(e), Some("div"));
        assert_eq!(doc.root_element(), Some(e));
    }

    #[test]
    fn test_append_multiple_children() {
        let mut doc = Document::new();
        let root = doc.root();
        let e = doc.create_node(elem("e"));
        doc.append(root, e).unwrap();

        let a = doc.create_node(comment("A"));
        let b = doc.create_node(elem("b"));
        let c = doc.create_node(comment("C"));
        doc.append(e, a).unwrap();
        doc.append(e, b).unwrap();
        doc.append(e, c).unwrap();

        assert_eq!(doc.first_child(e), Some(a));
        assert_eq!(doc.last_child(e), Some(c));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(b), Some(c));
        assert_eq!(doc.next_sibling(c), None);
        assert_eq!(doc.prev_sibling(c), Some(b));
        assert_eq!(doc.prev_sibling(a), None);
        assert_eq!(doc.children(e).collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn test_document_rejects_second_element() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.create_node(elem("a"));
        let second = doc.create_node(elem("b"));
        doc.append(root, first).unwrap();
        let err = doc.append(root, second).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Structure);
        assert_eq!(err.message, "document cannot have more than one element");
        assert_eq!(doc.parent(second), None);
    }

    #[test]
    fn test_document_rejects_text() {
        let mut doc = Document::new();
        let root = doc.root();
        let t = doc.create_node(text("hai"));
        let err = doc.append(root, t).unwrap_err();
        assert_eq!(err.message, "child of type text is not allowed in document");
    }

    #[test]
    fn test_document_accepts_comment_and_pi() {
        let mut doc = Document::new();
        let root = doc.root();
        let c = doc.create_node(comment("c"));
        let pi = doc.create_node(NodeKind::ProcessingInstruction {
            target: "t".to_string(),
            data: String::new(),
        });
        doc.append(root, c).unwrap();
        doc.append(root, pi).unwrap();
        assert_eq!(doc.children(root).count(), 2);
    }

    #[test]
    fn test_leaf_nodes_are_not_parents() {
        let mut doc = Document::new();
        let t = doc.create_node(text("x"));
        let c = doc.create_node(comment("c"));
        let err = doc.append(t, c).unwrap_err();
        assert_eq!(err.message, "child of type comment is not allowed in text");
    }

    #[test]
    fn test_attribute_cannot_be_a_child() {
        let mut doc = Document::new();
        let root = doc.root();
        let e = doc.create_node(elem("e"));
        doc.append(root, e).unwrap();
        let attr = doc.create_node(NodeKind::Attribute(Attribute {
            name: Name::new("", None, "a"),
            value: "v".to_string(),
        }));
        let err = doc.append(e, attr).unwrap_err();
        assert_eq!(err.message, "child of type attribute is not allowed in element");
    }

    #[test]
    fn test_append_rejects_attached_node() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node(elem("a"));
        let b = doc.create_node(elem("b"));
        let c = doc.create_node(elem("c"));
        doc.append(root, a).unwrap();
        doc.append(a, c).unwrap();
        doc.append(a, b).unwrap();
        let err = doc.append(b, c).unwrap_err();
        assert_eq!(err.message, "node already has a parent");
    }

    #[test]
    fn test_append_rejects_cycle() {
        let mut doc = Document::new();
        let a = doc.create_node(elem("a"));
        let b = doc.create_node(elem("b"));
        doc.append(a, b).unwrap();
        let err = doc.append(b, a).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Structure);
        assert!(doc.append(a, a).is_err());
    }

    #[test]
    fn test_append_text_coalesces() {
        let mut doc = Document::new();
        let root = doc.root();
        let e = doc.create_node(elem("e"));
        doc.append(root, e).unwrap();
        doc.append_text(e, "one").unwrap();
        doc.append_text(e, "two").unwrap();
        doc.append_text(e, "").unwrap();
        assert_eq!(doc.children(e).count(), 1);
        assert_eq!(doc.text_content(e), "onetwo");

        let c = doc.create_node(comment("c"));
        doc.append(e, c).unwrap();
        doc.append_text(e, "three").unwrap();
        assert_eq!(doc.children(e).count(), 3);
    }

    #[test]
    fn test_append_text_to_document_fails() {
        let mut doc = Document::new();
        let root = doc.root();
        assert!(doc.append_text(root, "x").is_err());
    }

    #[test]
    fn test_declare_namespace_keeps_order() {
        let mut doc = Document::new();
        let e = doc.create_node(elem("e"));
        doc.declare_namespace(e, Some("z"), "urn:z").unwrap();
        doc.declare_namespace(e, None, "urn:d").unwrap();
        doc.declare_namespace(e, Some("a"), "urn:a").unwrap();
        let prefixes: Vec<_> = doc.namespaces(e).map(|ns| ns.prefix.clone()).collect();
        assert_eq!(
            prefixes,
            vec![Some("z".to_string()), None, Some("a".to_string())]
        );
    }

    #[test]
    fn test_redeclare_namespace_replaces_in_place() {
        let mut doc = Document::new();
        let e = doc.create_node(elem("e"));
        let first = doc.declare_namespace(e, Some("p"), "urn:1").unwrap();
        doc.declare_namespace(e, Some("q"), "urn:q").unwrap();
        let again = doc.declare_namespace(e, Some("p"), "urn:2").unwrap();
        assert_eq!(first, again);
        let uris: Vec<_> = doc.namespaces(e).map(|ns| ns.uri.as_str()).collect();
        assert_eq!(uris, vec!["urn:2", "urn:q"]);
    }

    #[test]
    fn test_namespace_node_owner() {
        let mut doc = Document::new();
        let e = doc.create_node(elem("e"));
        let ns = doc.declare_namespace(e, Some("p"), "urn:p").unwrap();
        assert_eq!(doc.owner(ns), Some(e));
        assert_eq!(doc.parent(ns), None);
        assert_eq!(doc.namespace_nodes(e), &[ns]);
    }

    #[test]
    fn test_add_attribute() {
        let mut doc = Document::new();
        let e = doc.create_node(elem("e"));
        let a = doc
            .add_attribute(e, Name::new("", None, "a1"), "v1")
            .unwrap();
        doc.add_attribute(e, Name::new("urn:x", Some("x"), "a1"), "v2")
            .unwrap();

        assert_eq!(doc.owner(a), Some(e));
        assert_eq!(doc.node_name(a), Some("a1"));
        assert_eq!(doc.node_text(a), Some("v1"));
        assert_eq!(doc.attribute(e, "", "a1"), Some("v1"));
        assert_eq!(doc.attribute(e, "urn:x", "a1"), Some("v2"));
        assert_eq!(doc.attribute(e, "urn:y", "a1"), None);
        assert_eq!(doc.attributes(e).count(), 2);
    }

    #[test]
    fn test_add_attribute_rejects_same_expanded_name() {
        let mut doc = Document::new();
        let e = doc.create_node(elem("e"));
        doc.add_attribute(e, Name::new("urn:x", Some("x"), "a"), "v")
            .unwrap();
        let err = doc
            .add_attribute(e, Name::new("urn:x", Some("y"), "a"), "v")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Attribute);
        assert_eq!(err.message, "duplicate attribute: y:a");
    }

    #[test]
    fn test_add_attribute_to_text_fails() {
        let mut doc = Document::new();
        let t = doc.create_node(text("x"));
        let err = doc
            .add_attribute(t, Name::new("", None, "a"), "v")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Structure);
    }

    #[test]
    fn test_ancestors_iterator() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node(elem("a"));
        let b = doc.create_node(elem("b"));
        doc.append(root, a).unwrap();
        doc.append(a, b).unwrap();
        assert_eq!(doc.ancestors(b).collect::<Vec<_>>(), vec![b, a, root]);
    }

    #[test]
    fn test_descendants_iterator() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node(elem("a"));
        let b = doc.create_node(elem("b"));
        let c = doc.create_node(elem("c"));
        let d = doc.create_node(elem("d"));
        doc.append(root, a).unwrap();
        doc.append(a, b).unwrap();
        doc.append(b, c).unwrap();
        doc.append(a, d).unwrap();
        assert_eq!(doc.descendants(root).collect::<Vec<_>>(), vec![a, b, c, d]);
        assert_eq!(doc.descendants(b).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_text_content() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_node(elem("a"));
        let b = doc.create_node(elem("b"));
        doc.append(root, a).unwrap();
        doc.append_text(a, "Hello ").unwrap();
        doc.append(a, b).unwrap();
        doc.append_text(b, "World").unwrap();
        let c = doc.create_node(comment("ignored"));
        doc.append(a, c).unwrap();
        assert_eq!(doc.text_content(root), "Hello World");
    }

    #[test]
    fn test_node_text() {
        let mut doc = Document::new();
        let t = doc.create_node(text("hello"));
        let c = doc.create_node(comment("note"));
        let e = doc.create_node(elem("e"));
        assert_eq!(doc.node_text(t), Some("hello"));
        assert_eq!(doc.node_text(c), Some("note"));
        assert_eq!(doc.node_text(e), None);
    }

    #[test]
    fn test_node_namespace() {
        let mut doc = Document::new();
        let e = doc.create_node(NodeKind::element(Name::new("urn:x", Some("x"), "e")));
        let t = doc.create_node(text("x"));
        assert_eq!(doc.node_namespace(e), Some("urn:x"));
        assert_eq!(doc.node_namespace(t), None);
        assert_eq!(doc.element_name(e).map(Name::to_string), Some("x:e".to_string()));
    }
}
