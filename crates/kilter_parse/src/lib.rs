//! Kilter Parse - XML reader
//!
//! Reads markup into [`kilter_tree::Document`]s. It checks well-formedness
//! (matching tags, unique attributes, known entities) but does not validate
//! against a DTD.
//!
//! Supported: XML declaration, DOCTYPE (including an internal subset),
//! comments, processing instructions, CDATA sections (kept as their own nodes),
//! elements, attributes in either quote style, the five predefined entities
//! and numeric character references.
//!
//! Whitespace between prolog and epilog items is dropped; everything inside
//! the root element is kept exactly. Line endings are normalized to `\n`
//! before reading, so error offsets refer to the normalized text.

mod cursor;
mod entities;
mod error;
mod reader;

pub use error::ParseError;

use kilter_tree::{Document, Element};

/// Parse a complete document.
pub fn parse_document(source: &str) -> Result<Document, ParseError> {
    let source = normalize_line_endings(source);
    reader::Reader::new(&source).document()
}

/// Parse a document and return only its root element.
pub fn parse_element(source: &str) -> Result<Element, ParseError> {
    parse_document(source).map(|doc| doc.root)
}

/// Translate `\r\n` and lone `\r` to `\n`.
fn normalize_line_endings(source: &str) -> std::borrow::Cow<'_, str> {
    if memchr::memchr(b'\r', source.as_bytes()).is_none() {
        return std::borrow::Cow::Borrowed(source);
    }
    std::borrow::Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
}
