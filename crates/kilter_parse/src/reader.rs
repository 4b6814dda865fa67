//! Recursive-descent reader.

use kilter_stack::ensure_sufficient_stack;
use kilter_tree::{
    Attributes, CData, Comment, Document, Element, Misc, Node, ProcessingInstruction,
};

use crate::cursor::Cursor;
use crate::entities::decode;
use crate::ParseError;

pub(crate) struct Reader<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut cursor = Cursor::new(source);
        cursor.eat("\u{feff}");
        Self { cursor }
    }

    pub(crate) fn document(mut self) -> Result<Document, ParseError> {
        let xml_declaration = self.xml_declaration()?;

        let mut prolog = Vec::new();
        let root = loop {
            self.cursor.eat_whitespace();
            if self.cursor.is_eof() {
                return Err(ParseError::MissingRoot);
            }
            if self.cursor.starts_with_ignore_case("<!DOCTYPE") {
                prolog.push(Misc::Doctype(self.doctype()?.to_string()));
            } else if let Some(item) = self.misc()? {
                prolog.push(item);
            } else if self.cursor.current() == Some(b'<') {
                break self.element()?;
            } else {
                return Err(self.unexpected("`<`"));
            }
        };

        let mut epilog = Vec::new();
        loop {
            self.cursor.eat_whitespace();
            if self.cursor.is_eof() {
                break;
            }
            match self.misc()? {
                Some(item) => epilog.push(item),
                None => {
                    return Err(ParseError::TrailingContent {
                        offset: self.cursor.pos(),
                    })
                }
            }
        }

        Ok(Document {
            xml_declaration,
            prolog,
            root,
            epilog,
        })
    }

    /// `<?xml ...?>` at the very start, kept verbatim.
    fn xml_declaration(&mut self) -> Result<Option<String>, ParseError> {
        let rest = self.cursor.rest();
        let is_declaration = rest.starts_with("<?xml")
            && rest
                .as_bytes()
                .get(5)
                .is_some_and(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'?'));
        if !is_declaration {
            return Ok(None);
        }
        let start = self.cursor.pos();
        let end = self.cursor.find("?>").ok_or(ParseError::Unterminated {
            offset: start,
            construct: "XML declaration",
        })?;
        self.cursor.seek(end + 2);
        Ok(Some(self.cursor.slice_from(start).to_string()))
    }

    /// A comment or processing instruction outside the root.
    fn misc(&mut self) -> Result<Option<Misc>, ParseError> {
        if self.cursor.starts_with("<!--") {
            return self.comment().map(|c| Some(Misc::Comment(c)));
        }
        if self.cursor.starts_with("<?") {
            return self
                .processing_instruction()
                .map(|p| Some(Misc::ProcessingInstruction(p)));
        }
        Ok(None)
    }

    /// `<!DOCTYPE ...>`, with an optional `[...]` internal subset.
    fn doctype(&mut self) -> Result<&'a str, ParseError> {
        let start = self.cursor.pos();
        self.cursor.advance("<!DOCTYPE".len());
        let mut depth = 0usize;
        loop {
            match self.cursor.current() {
                None => {
                    return Err(ParseError::Unterminated {
                        offset: start,
                        construct: "DOCTYPE",
                    })
                }
                Some(quote @ (b'"' | b'\'')) => {
                    self.cursor.advance(1);
                    let end = self
                        .cursor
                        .find(if quote == b'"' { "\"" } else { "'" })
                        .ok_or(ParseError::Unterminated {
                            offset: start,
                            construct: "DOCTYPE",
                        })?;
                    self.cursor.seek(end + 1);
                }
                Some(b'[') => {
                    depth += 1;
                    self.cursor.advance(1);
                }
                Some(b']') => {
                    depth = depth.saturating_sub(1);
                    self.cursor.advance(1);
                }
                Some(b'>') if depth == 0 => {
                    self.cursor.advance(1);
                    return Ok(self.cursor.slice_from(start));
                }
                Some(_) => self.cursor.advance_char(),
            }
        }
    }

    fn comment(&mut self) -> Result<Comment, ParseError> {
        let start = self.cursor.pos();
        self.cursor.advance("<!--".len());
        let end = self.cursor.find("-->").ok_or(ParseError::Unterminated {
            offset: start,
            construct: "comment",
        })?;
        let content = self.cursor.slice(self.cursor.pos(), end);
        self.cursor.seek(end + 3);
        Ok(Comment::new(content))
    }

    fn processing_instruction(&mut self) -> Result<ProcessingInstruction, ParseError> {
        let start = self.cursor.pos();
        self.cursor.advance("<?".len());
        let target = self.name("processing instruction target")?;
        let end = self.cursor.find("?>").ok_or(ParseError::Unterminated {
            offset: start,
            construct: "processing instruction",
        })?;
        if !self.cursor.eat_whitespace() && self.cursor.pos() != end {
            return Err(self.unexpected("whitespace or `?>`"));
        }
        let content = self.cursor.slice(self.cursor.pos().min(end), end);
        self.cursor.seek(end + 2);
        Ok(ProcessingInstruction::new(target, content))
    }

    fn cdata(&mut self) -> Result<CData, ParseError> {
        let start = self.cursor.pos();
        self.cursor.advance("<![CDATA[".len());
        let end = self.cursor.find("]]>").ok_or(ParseError::Unterminated {
            offset: start,
            construct: "CDATA section",
        })?;
        let content = self.cursor.slice(self.cursor.pos(), end);
        self.cursor.seek(end + 3);
        Ok(CData::new(content))
    }

    fn element(&mut self) -> Result<Element, ParseError> {
        let start = self.cursor.pos();
        self.cursor.advance(1);
        let mut element = Element::new(self.name("element name")?);
        element.attributes = self.attributes()?;

        if self.cursor.eat("/>") {
            return Ok(element);
        }
        if !self.cursor.eat(">") {
            return Err(self.unexpected("`>` or `/>`"));
        }

        let mut text = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(ParseError::Unterminated {
                    offset: start,
                    construct: "element",
                });
            }
            if self.cursor.starts_with("</") {
                flush_text(&mut element.children, &mut text);
                self.close_tag(&element.name)?;
                return Ok(element);
            }
            let child = if self.cursor.starts_with("<![CDATA[") {
                Node::CData(self.cdata()?)
            } else if self.cursor.starts_with("<!--") {
                Node::Comment(self.comment()?)
            } else if self.cursor.starts_with("<?") {
                Node::ProcessingInstruction(self.processing_instruction()?)
            } else if self.cursor.starts_with("<!") {
                return Err(self.unexpected("comment or CDATA section"));
            } else if self.cursor.current() == Some(b'<') {
                Node::Element(ensure_sufficient_stack(|| self.element())?)
            } else {
                self.char_data(&mut text)?;
                continue;
            };
            flush_text(&mut element.children, &mut text);
            element.children.push(child);
        }
    }

    fn close_tag(&mut self, expected: &str) -> Result<(), ParseError> {
        let offset = self.cursor.pos();
        self.cursor.advance("</".len());
        let found = self.name("closing tag name")?;
        if found != expected {
            return Err(ParseError::MismatchedTag {
                offset,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        self.cursor.eat_whitespace();
        if !self.cursor.eat(">") {
            return Err(self.unexpected("`>`"));
        }
        Ok(())
    }

    fn attributes(&mut self) -> Result<Attributes, ParseError> {
        let mut attributes = Attributes::new();
        loop {
            let separated = self.cursor.eat_whitespace();
            match self.cursor.current() {
                Some(b'>' | b'/') | None => return Ok(attributes),
                Some(_) if !separated => return Err(self.unexpected("whitespace before attribute")),
                Some(_) => {}
            }

            let offset = self.cursor.pos();
            let name = self.name("attribute name")?;
            self.cursor.eat_whitespace();
            if !self.cursor.eat("=") {
                return Err(self.unexpected("`=`"));
            }
            self.cursor.eat_whitespace();
            let value = self.attribute_value()?;
            if attributes.contains(name) {
                return Err(ParseError::DuplicateAttribute {
                    offset,
                    name: name.to_string(),
                });
            }
            attributes.insert(name, value);
        }
    }

    fn attribute_value(&mut self) -> Result<String, ParseError> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.unexpected("quoted attribute value")),
        };
        let start = self.cursor.pos();
        self.cursor.advance(1);
        let end = self
            .cursor
            .find(if quote == b'"' { "\"" } else { "'" })
            .ok_or(ParseError::Unterminated {
                offset: start,
                construct: "attribute value",
            })?;
        let raw = self.cursor.slice(start + 1, end);
        if let Some(lt) = memchr::memchr(b'<', raw.as_bytes()) {
            return Err(ParseError::Unexpected {
                offset: start + 1 + lt,
                found: '<',
                expected: "attribute value without `<`",
            });
        }
        let value = decode(raw, start + 1)?.into_owned();
        self.cursor.seek(end + 1);
        Ok(value)
    }

    /// Character data up to the next `<`, with references decoded.
    fn char_data(&mut self, text: &mut String) -> Result<(), ParseError> {
        let start = self.cursor.pos();
        let end = memchr::memchr(b'<', self.cursor.rest().as_bytes())
            .map_or(start + self.cursor.rest().len(), |offset| start + offset);
        let raw = self.cursor.slice(start, end);
        text.push_str(&decode(raw, start)?);
        self.cursor.seek(end);
        Ok(())
    }

    fn name(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        let start = self.cursor.pos();
        match self.cursor.current() {
            Some(b) if is_name_start(b) => {}
            _ => return Err(self.unexpected(expected)),
        }
        self.cursor.eat_while(is_name_byte);
        Ok(self.cursor.slice_from(start))
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let offset = self.cursor.pos();
        match self.cursor.current_char() {
            Some(found) => ParseError::Unexpected {
                offset,
                found,
                expected,
            },
            None => ParseError::UnexpectedEof { offset, expected },
        }
    }
}

/// Pending character data goes to the tail of the last structural child, or
/// becomes a leading text child.
fn flush_text(children: &mut Vec<Node>, text: &mut String) {
    if text.is_empty() {
        return;
    }
    let text = std::mem::take(text);
    let tail = match children.last_mut() {
        Some(Node::Element(e)) => &mut e.tail,
        Some(Node::Comment(c)) => &mut c.tail,
        Some(Node::ProcessingInstruction(p)) => &mut p.tail,
        Some(Node::CData(c)) => &mut c.tail,
        Some(Node::Text(_)) | None => {
            children.push(Node::text(text));
            return;
        }
    };
    match tail {
        Some(existing) => existing.push_str(&text),
        None => *tail = Some(text),
    }
}

// Non-ASCII bytes are accepted as name characters; the formatter's strict
// escape mode does the full XML name check.
fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':' || b >= 0x80
}

fn is_name_byte(b: u8) -> bool {
    is_name_start(b) || b.is_ascii_digit() || b == b'-' || b == b'.'
}
