//! Node type definitions.
//!
//! The `NodeKind` enum is the closed set of node types in a document tree.
//! Each variant carries the node-type-specific payload; navigation links
//! live in `NodeData`.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::NodeId;

/// A resolved qualified name.
///
/// Two names are equal when their namespace URI and local part match. The
/// prefix is kept only so the name can be written back the way it was read.
#[derive(Debug, Clone)]
pub struct Name {
    /// Namespace URI; empty means "no namespace".
    pub uri: String,
    /// Lexical prefix, if any.
    pub prefix: Option<String>,
    /// Local part.
    pub local: String,
}

impl Name {
    /// Creates a name from its parts.
    pub fn new(uri: impl Into<String>, prefix: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            prefix: prefix.map(str::to_string),
            local: local.into(),
        }
    }

    /// Returns the prefix as a `&str`, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the name in `{uri}local` notation, or just `local` when the
    /// name has no namespace.
    #[must_use]
    pub fn expanded(&self) -> String {
        if self.uri.is_empty() {
            self.local.clone()
        } else {
            format!("{{{}}}{}", self.uri, self.local)
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri && self.local == other.local
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An attribute owned by an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The resolved attribute name. Unprefixed attributes have an empty URI.
    pub name: Name,
    /// The attribute value (entity references already decoded).
    pub value: String,
}

/// A namespace declaration local to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// The declared prefix; `None` for the default namespace.
    pub prefix: Option<String>,
    /// The bound URI. Empty only for `xmlns=""`.
    pub uri: String,
}

/// The kind of an XML node and its associated data.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node; there is exactly one per `Document`.
    Document,

    /// An element node.
    Element {
        /// The resolved element name.
        name: Name,
        /// Namespace nodes declared on this element, in declaration order.
        namespaces: Vec<NodeId>,
        /// Attribute nodes, in document order.
        attributes: Vec<NodeId>,
    },

    /// Character data.
    Text {
        /// The text content (already decoded).
        content: String,
    },

    /// A comment, without the `<!--` and `-->` delimiters.
    Comment {
        /// The comment text.
        content: String,
    },

    /// A processing instruction, e.g., `<?target data?>`.
    ProcessingInstruction {
        /// The PI target.
        target: String,
        /// The PI data; empty when the instruction has none.
        data: String,
    },

    /// An attribute. Its `parent` link is the owning element.
    Attribute(Attribute),

    /// A namespace declaration. Its `parent` link is the owning element.
    Namespace(Namespace),
}

impl NodeKind {
    /// Creates an element payload with no attributes or declarations.
    #[must_use]
    pub fn element(name: Name) -> Self {
        Self::Element {
            name,
            namespaces: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// A short lowercase label for messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Element { .. } => "element",
            Self::Text { .. } => "text",
            Self::Comment { .. } => "comment",
            Self::ProcessingInstruction { .. } => "processing instruction",
            Self::Attribute(_) => "attribute",
            Self::Namespace(_) => "namespace",
        }
    }
}
