//! Character escaping and strict-mode validation.

use std::borrow::Cow;

use crate::config::EscapeMode;
use crate::error::FormatError;


/// Escape character data: `&`, `<` and `>`.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Quote and escape an attribute value, including the quotes.
///
/// Double quotes unless the value holds `"` but no `'`.
pub(crate) fn quote_attribute(value: &str, mode: EscapeMode) -> String {
    let has_double = value.contains('"');
    let quote = if has_double && !value.contains('\'') {
        '\''
    } else {
        '"'
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote == '"' => out.push_str("&quot;"),
            '\n' if mode == EscapeMode::Strict => out.push_str("&#10;"),
            '\r' if mode == EscapeMode::Strict => out.push_str("&#13;"),
            '\t' if mode == EscapeMode::Strict => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// The XML 1.0 `Char` production.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// The XML 1.0 `Name` production.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

/// Validation applied before anything is written in strict mode.
///
/// Every check is a no-op in permissive mode.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Validator {
    strict: bool,
}

impl Validator {
    pub(crate) fn new(mode: EscapeMode) -> Self {
        Validator {
            strict: mode == EscapeMode::Strict,
        }
    }

    pub(crate) fn chars(self, node: &str, content: &str) -> Result<(), FormatError> {
        if !self.strict {
            return Ok(());
        }
        match content.chars().find(|&c| !is_xml_char(c)) {
            Some(c) => Err(FormatError::malformed(
                node,
                format!("character U+{:04X} is not allowed in XML", u32::from(c)),
            )),
            None => Ok(()),
        }
    }

    pub(crate) fn name(self, node: &str, what: &str, name: &str) -> Result<(), FormatError> {
        if self.strict && !is_xml_name(name) {
            return Err(FormatError::malformed(
                node,
                format!("`{name}` is not a valid {what}"),
            ));
        }
        Ok(())
    }

    pub(crate) fn comment(self, content: &str) -> Result<(), FormatError> {
        self.chars("comment", content)?;
        if self.strict && content.contains("--") {
            return Err(FormatError::malformed("comment", "contains `--`"));
        }
        Ok(())
    }

    pub(crate) fn cdata(self, content: &str) -> Result<(), FormatError> {
        self.chars("CDATA section", content)?;
        if self.strict && content.contains("]]>") {
            return Err(FormatError::malformed("CDATA section", "contains `]]>`"));
        }
        Ok(())
    }

    pub(crate) fn processing_instruction(
        self,
        target: &str,
        content: &str,
    ) -> Result<(), FormatError> {
        let node = format!("processing instruction `{target}`");
        self.name(&node, "target", target)?;
        if self.strict && target.eq_ignore_ascii_case("xml") {
            return Err(FormatError::malformed(node, "target `xml` is reserved"));
        }
        self.chars(&node, content)?;
        if self.strict && content.contains("?>") {
            return Err(FormatError::malformed(node, "contains `?>`"));
        }
        Ok(())
    }
}
