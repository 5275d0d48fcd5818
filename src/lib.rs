//! # xmldom
//!
//! An in-memory, namespace-aware XML document object model.
//!
//! A [`Document`] is built from a stream of lexical
//! [`XmlEvent`](event::XmlEvent)s: the builder resolves every element and
//! attribute name to its namespace URI, keeps namespace declarations as
//! their own nodes, and rejects structurally or namespace-invalid input
//! with a [`DomError`]. The [`serial`] module writes a tree back out with
//! context-sensitive escaping, so parse then serialize reproduces the
//! input up to quoting and escaping normalization.
//!
//! ## Quick Start
//!
//! ```
//! use xmldom::Document;
//! use xmldom::serial::serialize;
//!
//! let doc = Document::parse_str(r#"<x:one xmlns:x="ns1" a='v'><x:two/></x:one>"#).unwrap();
//! let one = doc.root_element().unwrap();
//! assert_eq!(doc.element_name(one).unwrap().uri, "ns1");
//! assert_eq!(serialize(&doc), r#"<x:one xmlns:x="ns1" a="v"><x:two/></x:one>"#);
//! ```

pub mod encoding;
pub mod error;
pub mod event;
pub mod parser;
pub mod serial;
pub mod tree;
pub mod util;

// Re-export primary types at the crate root for convenience.
pub use error::{DomError, ErrorKind};
pub use tree::{Attribute, Document, Name, Namespace, NodeId, NodeKind};
