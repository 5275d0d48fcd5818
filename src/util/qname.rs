//! `QName` (qualified name) handling.
//!
//! A `QName` is a name of the form `prefix:localname` or just `localname` (with
//! no prefix), exactly as written in the markup. It carries no namespace URI;
//! resolving the prefix is the tree builder's job.
//!
//! See <https://www.w3.org/TR/xml-names/#NT-QName>

use std::fmt;

/// Splits a `QName` into its prefix and local name parts.
///
/// Returns `(Some(prefix), localname)` if the name contains a colon,
/// or `(None, localname)` if it does not.
///
/// # Examples
///
/// ```
/// use xmldom::util::qname::split_qname;
///
/// assert_eq!(split_qname("svg:rect"), (Some("svg"), "rect"));
/// assert_eq!(split_qname("div"), (None, "div"));
/// ```
#[must_use]
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.find(':') {
        Some(pos) => (Some(&qname[..pos]), &qname[pos + 1..]),
        None => (None, qname),
    }
}

/// A lexical qualified name: optional prefix plus local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// The prefix before the colon, if any.
    pub prefix: Option<String>,
    /// The local part after the colon (or the whole name).
    pub local: String,
}

impl QName {
    /// Creates a name from its parts.
    pub fn new(prefix: Option<&str>, local: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.into(),
        }
    }

    /// Parses `prefix:local` (or `local`) markup text.
    #[must_use]
    pub fn parse(qname: &str) -> Self {
        let (prefix, local) = split_qname(qname);
        Self::new(prefix, local)
    }

    /// Returns the prefix as a `&str`, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}
