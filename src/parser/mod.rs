//! Building a [`Document`] from lexical events or from text.
//!
//! The core entry point is [`build`], which consumes any stream of
//! [`XmlEvent`]s. [`parse_str`] and [`parse_bytes`] pair it with the
//! bundled [`Tokenizer`] for end-to-end parsing of XML text.

mod builder;
mod tokenizer;

pub use tokenizer::Tokenizer;

use log::debug;

use crate::encoding::decode_to_utf8;
use crate::error::DomError;
use crate::event::XmlEvent;
use crate::tree::Document;

use builder::TreeBuilder;

/// Default maximum element nesting depth.
const DEFAULT_MAX_DEPTH: u32 = 256;

/// Default maximum number of attributes on one start tag.
const DEFAULT_MAX_ATTRIBUTES: u32 = 256;

/// Limits applied while building a tree.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use xmldom::parser::BuildOptions;
///
/// let opts = BuildOptions::default().max_depth(64).max_attributes(16);
/// assert_eq!(opts.max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
    /// Maximum number of attributes, namespace declarations included, on a
    /// single start tag (default: 256).
    pub max_attributes: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_attributes: DEFAULT_MAX_ATTRIBUTES,
        }
    }
}

impl BuildOptions {
    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the maximum number of attributes per start tag.
    #[must_use]
    pub fn max_attributes(mut self, count: u32) -> Self {
        self.max_attributes = count;
        self
    }
}

/// Builds a document from a stream of lexical events with default options.
///
/// An `Err` item in the stream aborts the build and is returned unchanged.
///
/// # Errors
///
/// Returns a [`DomError`] when the events do not form a single well-formed,
/// namespace-valid document.
pub fn build<I>(events: I) -> Result<Document, DomError>
where
    I: IntoIterator<Item = Result<XmlEvent, DomError>>,
{
    build_with_options(events, &BuildOptions::default())
}

/// Builds a document from a stream of lexical events.
///
/// # Errors
///
/// See [`build`]; exceeding a configured limit is an
/// [`ErrorKind::Limit`](crate::error::ErrorKind::Limit) error.
pub fn build_with_options<I>(events: I, options: &BuildOptions) -> Result<Document, DomError>
where
    I: IntoIterator<Item = Result<XmlEvent, DomError>>,
{
    let mut builder = TreeBuilder::new(options);
    for event in events {
        builder.feed(event?)?;
    }
    builder.finish()
}

/// Parses an XML string into a document with default options.
///
/// # Errors
///
/// Returns a [`DomError`] carrying the source location of the failure.
///
/// # Examples
///
/// ```
/// use xmldom::parser::parse_str;
///
/// let doc = parse_str(r#"<x:one xmlns:x="ns1"><x:two/></x:one>"#).unwrap();
/// let one = doc.root_element().unwrap();
/// assert_eq!(doc.element_name(one).unwrap().uri, "ns1");
/// ```
pub fn parse_str(input: &str) -> Result<Document, DomError> {
    parse_str_with_options(input, &BuildOptions::default())
}

/// Parses an XML string into a document.
///
/// # Errors
///
/// Returns a [`DomError`] carrying the source location of the failure.
pub fn parse_str_with_options(input: &str, options: &BuildOptions) -> Result<Document, DomError> {
    let mut tokenizer = Tokenizer::new(input);
    let mut builder = TreeBuilder::new(options);
    let result = tokenizer
        .by_ref()
        .try_for_each(|event| builder.feed(event?))
        .and_then(|()| builder.finish());
    result.map_err(|err| {
        let err = err.or_location(tokenizer.location());
        debug!("parse failed: {err}");
        err
    })
}

/// Parses XML bytes, detecting the character encoding first.
///
/// # Errors
///
/// Returns an [`ErrorKind::Encoding`](crate::error::ErrorKind::Encoding)
/// error when the bytes cannot be decoded, otherwise as [`parse_str`].
pub fn parse_bytes(input: &[u8]) -> Result<Document, DomError> {
    let text = decode_to_utf8(input)?;
    parse_str(&text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::event::RawAttribute;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let opts = BuildOptions::default();
        assert_eq!(opts.max_depth, 256);
        assert_eq!(opts.max_attributes, 256);
    }

    #[test]
    fn test_build_from_events() {
        let events = vec![
            XmlEvent::start("e", vec![RawAttribute::new("a", "v")]),
            XmlEvent::end("e"),
        ];
        let doc = build(events.into_iter().map(Ok)).unwrap();
        let e = doc.root_element().unwrap();
        assert_eq!(doc.node_name(e), Some("e"));
    }

    #[test]
    fn test_upstream_error_returned_unchanged() {
        let upstream = DomError::syntax("bad token");
        let events = vec![Ok(XmlEvent::start("e", vec![])), Err(upstream.clone())];
        let err = build(events).unwrap_err();
        assert_eq!(err.kind, upstream.kind);
        assert_eq!(err.message, upstream.message);
    }

    #[test]
    fn test_build_errors_have_no_location() {
        let err = build(vec![Ok(XmlEvent::start("e", vec![]))]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Structure);
        assert!(err.location.is_none());
    }

    #[test]
    fn test_parse_str_error_has_location() {
        let err = parse_str("<a>\n  <b:c/>\n</a>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Namespace);
        assert_eq!(err.location.unwrap().line, 2);
    }

    #[test]
    fn test_parse_str_with_limits() {
        let opts = BuildOptions::default().max_depth(1);
        let err = parse_str_with_options("<a><b/></a>", &opts).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Limit);
        assert!(parse_str_with_options("<a/>", &opts).is_ok());
    }

    #[test]
    fn test_parse_bytes_latin1() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>".to_vec();
        bytes.extend_from_slice(b"<e>caf\xE9</e>");
        let doc = parse_bytes(&bytes).unwrap();
        assert_eq!(doc.text_content(doc.root()), "caf\u{e9}");
    }

    #[test]
    fn test_parse_bytes_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "<e>hi</e>".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let doc = parse_bytes(&bytes).unwrap();
        assert_eq!(doc.text_content(doc.root()), "hi");
    }

    #[test]
    fn test_parse_bytes_invalid_utf8() {
        let err = parse_bytes(b"<e>\xFF\xFE\xFD</e>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Encoding);
    }
}
