//! Error types for building documents.
//!
//! Every failure while building a tree is fatal: the build stops and no
//! partial `Document` is returned. Errors carry a [`ErrorKind`] so callers
//! can tell structural problems from namespace or attribute violations, and
//! a [`SourceLocation`] when the input was parsed from text.
//!
//! Serialization reports plain `std::io::Error`s from the sink.

use std::fmt;

/// The category of a build failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A node was placed where the tree does not allow it: a second root
    /// element, unbalanced tags, text directly under the document, or an
    /// empty document.
    Structure,
    /// An unresolved prefix, or a prefix bound to the empty namespace.
    Namespace,
    /// Two attributes on one element share a namespace URI and local name.
    Attribute,
    /// The tokenizer rejected the raw markup.
    Syntax,
    /// Byte input could not be decoded to UTF-8.
    Encoding,
    /// A configured nesting or attribute limit was exceeded.
    Limit,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "structure"),
            Self::Namespace => write!(f, "namespace"),
            Self::Attribute => write!(f, "attribute"),
            Self::Syntax => write!(f, "syntax"),
            Self::Encoding => write!(f, "encoding"),
            Self::Limit => write!(f, "limit"),
        }
    }
}

/// Source location within an XML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl SourceLocation {
    /// Computes the location of `byte_offset` within `input`.
    ///
    /// Offsets past the end of the input, or inside a multi-byte character,
    /// are clamped back to the nearest preceding character boundary.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_offset(input: &str, byte_offset: usize) -> Self {
        let mut end = byte_offset.min(input.len());
        while !input.is_char_boundary(end) {
            end -= 1;
        }
        let before = &input[..end];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |pos| pos + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            line: line as u32,
            column: column as u32,
            byte_offset: end,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The error type returned when a document cannot be built.
#[derive(Debug, Clone)]
pub struct DomError {
    /// What went wrong, broadly.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Where in the source the error occurred, if the input was text.
    pub location: Option<SourceLocation>,
}

impl DomError {
    /// Creates an error of the given kind without a location.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub(crate) fn structure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structure, message)
    }

    pub(crate) fn namespace(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Namespace, message)
    }

    pub(crate) fn attribute(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Attribute, message)
    }

    pub(crate) fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encoding, message)
    }

    pub(crate) fn limit(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Limit, message)
    }

    /// Attaches a location unless one is already set.
    #[must_use]
    pub fn or_location(mut self, location: SourceLocation) -> Self {
        self.location.get_or_insert(location);
        self
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(f, "{} error at {}: {}", self.kind, loc, self.message),
            None => write!(f, "{} error: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for DomError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation {
            line: 10,
            column: 5,
            byte_offset: 42,
        };
        assert_eq!(loc.to_string(), "10:5");
    }

    #[test]
    fn test_location_from_offset() {
        let loc = SourceLocation::from_offset("<a>\n  <b/>", 6);
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 3);
        assert_eq!(loc.byte_offset, 6);
    }

    #[test]
    fn test_location_clamps_past_end() {
        let loc = SourceLocation::from_offset("<a/>", 100);
        assert_eq!(loc.byte_offset, 4);
        assert_eq!(loc.column, 5);
    }

    #[test]
    fn test_location_counts_chars_not_bytes() {
        // 'é' is two bytes
        let loc = SourceLocation::from_offset("<é/>", 3);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn test_error_display_without_location() {
        let err = DomError::structure("document is empty");
        assert_eq!(err.to_string(), "structure error: document is empty");
    }

    #[test]
    fn test_error_display_with_location() {
        let err = DomError::namespace("unresolved prefix: x").or_location(SourceLocation {
            line: 1,
            column: 9,
            byte_offset: 8,
        });
        assert_eq!(
            err.to_string(),
            "namespace error at 1:9: unresolved prefix: x"
        );
    }

    #[test]
    fn test_or_location_keeps_first() {
        let first = SourceLocation {
            line: 2,
            column: 1,
            byte_offset: 10,
        };
        let err = DomError::syntax("bad").or_location(first).or_location(SourceLocation::default());
        assert_eq!(err.location, Some(first));
    }

    #[test]
    fn test_error_is_error_trait() {
        let err = DomError::attribute("duplicate attribute: a");
        let _: &dyn std::error::Error = &err;
        assert_eq!(err.kind, ErrorKind::Attribute);
    }
}
