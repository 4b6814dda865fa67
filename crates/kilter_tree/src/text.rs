//! Character-level helpers shared by the tree view and the formatter.

/// XML whitespace: space, tab, line feed and carriage return.
///
/// Non-breaking spaces and other Unicode spaces are content, not layout.
#[inline]
pub fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// True when `text` is empty or made only of XML whitespace.
pub fn is_xml_whitespace_str(text: &str) -> bool {
    text.chars().all(is_xml_whitespace)
}

/// True when `text` exists and holds at least one non-whitespace character.
pub fn is_significant_text(text: Option<&str>) -> bool {
    text.is_some_and(|t| !is_xml_whitespace_str(t))
}
