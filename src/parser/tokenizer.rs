//! Text to [`XmlEvent`] conversion on top of `quick-xml`.
//!
//! The tokenizer owns raw well-formedness: tag syntax, attribute quoting,
//! entity decoding, comment syntax and CDATA sections. What it emits is
//! the lexical event stream the tree builder expects; cross-event checks
//! (tag balance, namespaces, root count) are left to the builder, so end
//! tag name checking is switched off here.

use std::borrow::Cow;

use log::debug;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{DomError, SourceLocation};
use crate::event::{RawAttribute, XmlEvent};
use crate::util::qname::QName;

/// A pull tokenizer over an XML string.
///
/// Iterating yields events until the end of input; the first error ends
/// the iteration.
///
/// # Examples
///
/// ```
/// use xmldom::event::XmlEvent;
/// use xmldom::parser::Tokenizer;
///
/// let events: Vec<_> = Tokenizer::new("<a>x</a>").collect::<Result<_, _>>().unwrap();
/// assert_eq!(events.len(), 3);
/// assert_eq!(events[1], XmlEvent::CharacterData("x".to_string()));
/// ```
pub struct Tokenizer<'a> {
    input: &'a str,
    reader: Reader<&'a [u8]>,
    /// End tag owed for a self-closing element.
    pending: Option<XmlEvent>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut reader = Reader::from_str(input);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.check_comments = true;
        Self {
            input,
            reader,
            pending: None,
            finished: false,
        }
    }

    /// Returns the position just past the last markup consumed.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        let offset = usize::try_from(self.reader.buffer_position()).unwrap_or(usize::MAX);
        SourceLocation::from_offset(self.input, offset)
    }

    fn syntax_error(&self, message: impl Into<String>) -> DomError {
        DomError::syntax(message).or_location(self.location())
    }

    fn next_event(&mut self) -> Result<Option<XmlEvent>, DomError> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(err) => return Err(self.syntax_error(err.to_string())),
            };
            let converted = match event {
                Event::Start(e) => start_element(&e),
                Event::Empty(e) => start_element(&e).map(|start| {
                    if let XmlEvent::StartElement { name, .. } = &start {
                        self.pending = Some(XmlEvent::EndElement { name: name.clone() });
                    }
                    start
                }),
                Event::End(e) => utf8(e.name().as_ref()).map(|name| XmlEvent::EndElement {
                    name: QName::parse(name),
                }),
                Event::Text(e) => utf8(&e).and_then(decode_text).map(XmlEvent::CharacterData),
                Event::CData(e) => utf8(&e)
                    .map(|raw| XmlEvent::CharacterData(normalize_line_endings(raw).into_owned())),
                Event::Comment(e) => {
                    utf8(&e).map(|raw| XmlEvent::Comment(normalize_line_endings(raw).into_owned()))
                }
                Event::PI(e) => utf8(&e).map(processing_instruction),
                Event::Decl(e) => utf8(&e).map(processing_instruction),
                Event::DocType(_) => {
                    debug!("skipping DOCTYPE at {}", self.location());
                    continue;
                }
                Event::Eof => return Ok(None),
            };
            return converted
                .map(Some)
                .map_err(|err| err.or_location(self.location()));
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<XmlEvent, DomError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_event().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, DomError> {
    std::str::from_utf8(bytes).map_err(|err| DomError::syntax(err.to_string()))
}

fn start_element(e: &BytesStart<'_>) -> Result<XmlEvent, DomError> {
    let name = QName::parse(utf8(e.name().as_ref())?);
    let attributes = e
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(|err| DomError::syntax(err.to_string()))?;
            Ok(RawAttribute {
                name: QName::parse(utf8(attr.key.as_ref())?),
                value: decode_attribute(utf8(&attr.value)?)?,
            })
        })
        .collect::<Result<Vec<_>, DomError>>()?;
    Ok(XmlEvent::StartElement { name, attributes })
}

/// Splits `target data` as found between `<?` and `?>`.
fn processing_instruction(raw: &str) -> XmlEvent {
    let raw = normalize_line_endings(raw);
    let (target, data) = match raw.find(|c: char| c.is_ascii_whitespace()) {
        Some(pos) => (&raw[..pos], raw[pos..].trim_start()),
        None => (raw.as_ref(), ""),
    };
    XmlEvent::ProcessingInstruction {
        target: target.to_string(),
        data: data.to_string(),
    }
}

fn decode_text(raw: &str) -> Result<String, DomError> {
    let normalized = normalize_line_endings(raw);
    let text = unescape(&normalized).map_err(|err| DomError::syntax(err.to_string()))?;
    Ok(text.into_owned())
}

/// Line endings are normalized and literal tabs and newlines become
/// spaces before references are decoded, so `&#xA;` still yields a newline.
fn decode_attribute(raw: &str) -> Result<String, DomError> {
    let normalized: String = normalize_line_endings(raw)
        .chars()
        .map(|c| if matches!(c, '\t' | '\n') { ' ' } else { c })
        .collect();
    let value = unescape(&normalized).map_err(|err| DomError::syntax(err.to_string()))?;
    Ok(value.into_owned())
}

/// `\r\n` and lone `\r` become `\n`.
fn normalize_line_endings(s: &str) -> Cow<'_, str> {
    if !s.contains('\r') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}
