//! Lexical XML events, the input of the tree builder.
//!
//! Each event is a single, individually well-formed piece of markup as a
//! tokenizer reports it: names are split into prefix and local part but not
//! resolved, character data is already entity-decoded, and CDATA sections
//! arrive as ordinary character data. The bundled
//! [`Tokenizer`](crate::parser::Tokenizer) produces these from text, but any
//! source can feed [`build`](crate::parser::build).
//!
//! # Examples
//!
//! ```
//! use xmldom::event::{RawAttribute, XmlEvent};
//! use xmldom::parser::build;
//!
//! let events = vec![
//!     XmlEvent::start("e", vec![RawAttribute::new("a", "v")]),
//!     XmlEvent::CharacterData("hi".to_string()),
//!     XmlEvent::end("e"),
//! ];
//! let doc = build(events.into_iter().map(Ok)).unwrap();
//! assert_eq!(doc.text_content(doc.root()), "hi");
//! ```

use crate::util::qname::QName;

/// An attribute as written in a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// The unresolved attribute name.
    pub name: QName,
    /// The decoded attribute value.
    pub value: String,
}

impl RawAttribute {
    /// Creates an attribute from `prefix:local` markup text and a value.
    pub fn new(qname: &str, value: impl Into<String>) -> Self {
        Self {
            name: QName::parse(qname),
            value: value.into(),
        }
    }

    /// Returns `true` for `xmlns` and `xmlns:*` attributes.
    #[must_use]
    pub fn is_namespace_decl(&self) -> bool {
        match self.name.prefix() {
            Some(prefix) => prefix == "xmlns",
            None => self.name.local == "xmlns",
        }
    }
}

/// One lexical event from a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// A start tag (self-closing tags are a start followed by an end).
    StartElement {
        /// The unresolved element name.
        name: QName,
        /// Attributes in document order, namespace declarations included.
        attributes: Vec<RawAttribute>,
    },
    /// An end tag.
    EndElement {
        /// The name as written in the end tag.
        name: QName,
    },
    /// A run of character data.
    CharacterData(String),
    /// A comment, without the `<!--` and `-->` markers.
    Comment(String),
    /// A processing instruction; the XML declaration arrives as one with
    /// target `xml`.
    ProcessingInstruction {
        /// The PI target.
        target: String,
        /// Everything after the target and the whitespace following it.
        data: String,
    },
}

impl XmlEvent {
    /// Shorthand for a start tag named by `prefix:local` markup text.
    #[must_use]
    pub fn start(qname: &str, attributes: Vec<RawAttribute>) -> Self {
        Self::StartElement {
            name: QName::parse(qname),
            attributes,
        }
    }

    /// Shorthand for an end tag named by `prefix:local` markup text.
    #[must_use]
    pub fn end(qname: &str) -> Self {
        Self::EndElement {
            name: QName::parse(qname),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_namespace_decl_detection() {
        assert!(RawAttribute::new("xmlns", "urn:d").is_namespace_decl());
        assert!(RawAttribute::new("xmlns:p", "urn:p").is_namespace_decl());
        assert!(!RawAttribute::new("p:xmlns", "v").is_namespace_decl());
        assert!(!RawAttribute::new("xmlnsx", "v").is_namespace_decl());
        assert!(!RawAttribute::new("a", "v").is_namespace_decl());
    }

    #[test]
    fn test_shorthands_split_names() {
        assert_eq!(
            XmlEvent::end("x:e"),
            XmlEvent::EndElement {
                name: QName::new(Some("x"), "e")
            }
        );
        let XmlEvent::StartElement { name, attributes } =
            XmlEvent::start("e", vec![RawAttribute::new("x:a", "v")])
        else {
            panic!("expected a start tag");
        };
        assert_eq!(name, QName::new(None, "e"));
        assert_eq!(attributes[0].name, QName::new(Some("x"), "a"));
    }
}
