//! Prefix-to-URI resolution over the element ancestor chain.
//!
//! Declarations are scoped lexically: a prefix declared on an element is
//! visible to that element, its attributes, and every descendant element
//! until a nearer declaration rebinds it.

use super::{Document, NodeId, NodeKind};

/// The namespace bound to the `xml` prefix. It needs no declaration.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

impl Document {
    /// Resolves `prefix` to a namespace URI as seen from `element`.
    ///
    /// `None` asks for the default namespace. The walk starts at `element`
    /// and moves through ancestor elements, stopping at the document node.
    /// The `xml` prefix always resolves to [`XML_NAMESPACE`]. An undeclared
    /// default namespace resolves to `""`; any other undeclared prefix
    /// returns `None`.
    ///
    /// Unprefixed attributes never take the default namespace, so callers
    /// resolving attribute names must not pass `None` here.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmldom::Document;
    ///
    /// let doc = Document::parse_str(r#"<a xmlns:p="urn:p"><b/></a>"#).unwrap();
    /// let a = doc.root_element().unwrap();
    /// let b = doc.first_child(a).unwrap();
    /// assert_eq!(doc.resolve_prefix(b, Some("p")), Some("urn:p"));
    /// assert_eq!(doc.resolve_prefix(b, None), Some(""));
    /// assert_eq!(doc.resolve_prefix(b, Some("q")), None);
    /// ```
    #[must_use]
    pub fn resolve_prefix(&self, element: NodeId, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE);
        }
        let mut cursor = Some(element);
        while let Some(id) = cursor {
            let NodeKind::Element { namespaces, .. } = &self.node(id).kind else {
                break;
            };
            if let Some(uri) = self.local_binding(namespaces, prefix) {
                return Some(uri);
            }
            cursor = self.parent(id);
        }
        prefix.is_none().then_some("")
    }

    fn local_binding(&self, namespaces: &[NodeId], prefix: Option<&str>) -> Option<&str> {
        namespaces.iter().find_map(|&ns| match &self.node(ns).kind {
            NodeKind::Namespace(decl) if decl.prefix.as_deref() == prefix => Some(decl.uri.as_str()),
            _ => None,
        })
    }
}
