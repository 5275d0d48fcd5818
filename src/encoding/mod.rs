//! Turning XML bytes into UTF-8 text.
//!
//! A byte order mark decides the initial encoding; without one the input
//! is taken as UTF-8. An `encoding=` pseudo-attribute in the XML
//! declaration overrides that guess when it names something else.
//! Conversion goes through `encoding_rs`.

use encoding_rs::Encoding;

use crate::error::DomError;

/// How far into the input the XML declaration is looked for.
const DECL_SCAN_LIMIT: usize = 256;

/// Detects the encoding from a byte order mark.
///
/// Returns the encoding label and the number of BOM bytes to skip.
///
/// # Examples
///
/// ```
/// use xmldom::encoding::detect_encoding;
///
/// assert_eq!(detect_encoding(b"\xEF\xBB\xBF<e/>"), ("UTF-8", 3));
/// assert_eq!(detect_encoding(b"\xFF\xFE<\x00"), ("UTF-16LE", 2));
/// assert_eq!(detect_encoding(b"<e/>"), ("UTF-8", 0));
/// ```
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> (&'static str, usize) {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => ("UTF-8", 3),
        [0xFE, 0xFF, ..] => ("UTF-16BE", 2),
        [0xFF, 0xFE, ..] => ("UTF-16LE", 2),
        _ => ("UTF-8", 0),
    }
}

/// Decodes `bytes` from the encoding named by `label`.
///
/// # Errors
///
/// Returns an encoding error for an unknown label or malformed input.
///
/// # Examples
///
/// ```
/// use xmldom::encoding::transcode;
///
/// assert_eq!(transcode(b"caf\xE9", "ISO-8859-1").unwrap(), "caf\u{e9}");
/// ```
pub fn transcode(bytes: &[u8], label: &str) -> Result<String, DomError> {
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DomError::encoding(format!("unsupported encoding: {label}")))?;
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(DomError::encoding(format!(
            "malformed byte sequence for encoding {label}"
        )));
    }
    Ok(text.into_owned())
}

/// Decodes XML bytes to a UTF-8 string.
///
/// The BOM, if any, is stripped. When the XML declaration names an
/// encoding different from the detected one, the input is decoded with
/// the declared encoding instead.
///
/// # Errors
///
/// Returns an encoding error for malformed input or an unsupported
/// declared encoding.
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String, DomError> {
    let (detected, skip) = detect_encoding(bytes);
    let content = &bytes[skip..];

    if detected == "UTF-8" {
        // The declaration is ASCII, so it can be read before knowing the
        // real encoding.
        return match declared_encoding(content) {
            Some(declared) if !is_utf8_label(&declared) && skip == 0 => {
                transcode(content, &declared)
            }
            _ => std::str::from_utf8(content)
                .map(str::to_string)
                .map_err(|_| DomError::encoding("input is not valid UTF-8")),
        };
    }

    let text = transcode(content, detected)?;
    match declared_encoding(text.as_bytes()) {
        Some(declared) if !same_encoding(&declared, detected) => transcode(content, &declared),
        _ => Ok(text),
    }
}

/// Reads the `encoding` pseudo-attribute of a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let scan = &bytes[..bytes.len().min(DECL_SCAN_LIMIT)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }
    let end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..end];

    let needle = b"encoding";
    let at = decl.windows(needle.len()).position(|w| w == needle)?;
    let rest = trim_ascii_start(&decl[at + needle.len()..]);
    let rest = trim_ascii_start(rest.strip_prefix(b"=")?);
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|&b| b == quote)?;
    let value = &rest[..len];
    value
        .iter()
        .all(u8::is_ascii)
        .then(|| String::from_utf8_lossy(value).into_owned())
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
        .count();
    &bytes[skip..]
}

fn is_utf8_label(label: &str) -> bool {
    label.eq_ignore_ascii_case("UTF-8") || label.eq_ignore_ascii_case("UTF8")
}

/// `UTF-16` in a declaration agrees with either BOM byte order.
fn same_encoding(declared: &str, detected: &str) -> bool {
    declared.eq_ignore_ascii_case(detected)
        || (declared.eq_ignore_ascii_case("UTF-16") && detected.starts_with("UTF-16"))
}
