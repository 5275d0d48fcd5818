//! XML serializer.
//!
//! Writes a depth-first, document-order rendering of a [`Document`]. No XML
//! declaration is produced and no whitespace is added, so parsing the
//! output gives back an equivalent tree.

use std::borrow::Cow;
use std::io::{self, BufWriter, Write};

use crate::tree::{Document, Name, NodeId, NodeKind};

/// The context a piece of character data is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeContext {
    /// A double-quoted attribute value or namespace URI.
    Attribute,
    /// Character data between tags.
    Text,
}

/// Writes the XML form of `doc` to `sink`.
///
/// Output is buffered and flushed before returning.
///
/// # Errors
///
/// Returns any I/O error reported by `sink`.
///
/// # Examples
///
/// ```
/// use xmldom::Document;
/// use xmldom::serial::write;
///
/// let doc = Document::parse_str("<a x='1'>hi</a>").unwrap();
/// let mut out = Vec::new();
/// write(&doc, &mut out).unwrap();
/// assert_eq!(out, br#"<a x="1">hi</a>"#);
/// ```
pub fn write<W: Write>(doc: &Document, sink: W) -> io::Result<()> {
    let mut printer = Printer {
        doc,
        out: BufWriter::new(sink),
    };
    printer.node(doc.root())?;
    printer.out.flush()
}

/// Serializes a document to a string.
///
/// # Examples
///
/// ```
/// use xmldom::Document;
/// use xmldom::serial::serialize;
///
/// let doc = Document::parse_str(r#"<e a='v"'/>"#).unwrap();
/// assert_eq!(serialize(&doc), r#"<e a="v&quot;"/>"#);
/// ```
#[must_use]
pub fn serialize(doc: &Document) -> String {
    let mut buf = Vec::new();
    // A Vec sink never reports an I/O error, so the result carries nothing.
    let _ = write(doc, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Escapes `text` for the given context.
///
/// Both contexts escape `&`, `<`, `>`, carriage return and tab. Attribute
/// values additionally escape both quote characters and line feeds.
/// Characters that XML cannot represent, and U+FFFD itself, are written
/// as U+FFFD.
///
/// # Examples
///
/// ```
/// use xmldom::serial::{escape, EscapeContext};
///
/// assert_eq!(escape("a<b\n", EscapeContext::Text), "a&lt;b\n");
/// assert_eq!(escape("a<b\n", EscapeContext::Attribute), "a&lt;b&#xA;");
/// assert_eq!(escape("plain", EscapeContext::Text), "plain");
/// ```
#[must_use]
pub fn escape(text: &str, context: EscapeContext) -> Cow<'_, str> {
    let Some(first) = text.find(|c| needs_escape(c, context)) else {
        return Cow::Borrowed(text);
    };
    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..first]);
    for ch in text[first..].chars() {
        match escape_char(ch, context) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    Cow::Owned(out)
}

fn needs_escape(ch: char, context: EscapeContext) -> bool {
    escape_char(ch, context).is_some()
}

fn escape_char(ch: char, context: EscapeContext) -> Option<&'static str> {
    let attribute = context == EscapeContext::Attribute;
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\r' => Some("&#xD;"),
        '\t' => Some("&#x9;"),
        '"' if attribute => Some("&quot;"),
        '\'' if attribute => Some("&apos;"),
        '\n' if attribute => Some("&#xA;"),
        // The replacement is the single character U+FFFD.
        '\u{FFFD}' => Some("\u{FFFD}"),
        c if !is_xml_char(c) => Some("\u{FFFD}"),
        _ => None,
    }
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

struct Printer<'d, W: Write> {
    doc: &'d Document,
    out: BufWriter<W>,
}

impl<W: Write> Printer<'_, W> {
    fn node(&mut self, id: NodeId) -> io::Result<()> {
        let doc = self.doc;
        match doc.kind(id) {
            NodeKind::Document => {
                for child in doc.children(id) {
                    self.node(child)?;
                }
                Ok(())
            }
            NodeKind::Element { name, .. } => self.element(id, name),
            NodeKind::Text { content } => self.escaped(content, EscapeContext::Text),
            NodeKind::Comment { content } => {
                self.out.write_all(b"<!--")?;
                self.out.write_all(content.as_bytes())?;
                self.out.write_all(b"-->")
            }
            NodeKind::ProcessingInstruction { target, data } => {
                self.out.write_all(b"<?")?;
                self.out.write_all(target.as_bytes())?;
                if !data.is_empty() {
                    self.out.write_all(b" ")?;
                    self.out.write_all(data.as_bytes())?;
                }
                self.out.write_all(b"?>")
            }
            // Never linked as children.
            NodeKind::Attribute(_) | NodeKind::Namespace(_) => Ok(()),
        }
    }

    fn element(&mut self, id: NodeId, name: &Name) -> io::Result<()> {
        let doc = self.doc;
        self.out.write_all(b"<")?;
        self.name(name)?;
        for ns in doc.namespaces(id) {
            self.out.write_all(b" xmlns")?;
            if let Some(prefix) = &ns.prefix {
                self.out.write_all(b":")?;
                self.out.write_all(prefix.as_bytes())?;
            }
            self.value(&ns.uri)?;
        }
        for attr in doc.attributes(id) {
            self.out.write_all(b" ")?;
            self.name(&attr.name)?;
            self.value(&attr.value)?;
        }
        if doc.first_child(id).is_none() {
            return self.out.write_all(b"/>");
        }
        self.out.write_all(b">")?;
        for child in doc.children(id) {
            self.node(child)?;
        }
        self.out.write_all(b"</")?;
        self.name(name)?;
        self.out.write_all(b">")
    }

    fn name(&mut self, name: &Name) -> io::Result<()> {
        if let Some(prefix) = name.prefix() {
            self.out.write_all(prefix.as_bytes())?;
            self.out.write_all(b":")?;
        }
        self.out.write_all(name.local.as_bytes())
    }

    fn value(&mut self, value: &str) -> io::Result<()> {
        self.out.write_all(b"=\"")?;
        self.escaped(value, EscapeContext::Attribute)?;
        self.out.write_all(b"\"")
    }

    fn escaped(&mut self, text: &str, context: EscapeContext) -> io::Result<()> {
        self.out.write_all(escape(text, context).as_bytes())
    }
}
