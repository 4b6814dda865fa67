//! Byte cursor over the source text.
//!
//! All stops happen on ASCII delimiters, so slices taken between two cursor
//! positions always fall on character boundaries.

use memchr::memmem;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Byte at the cursor, `None` at EOF.
    #[inline]
    pub(crate) fn current(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    /// Character at the cursor, for error reporting.
    pub(crate) fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    pub(crate) fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or("")
    }

    #[inline]
    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// ASCII case-insensitive prefix test.
    pub(crate) fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        self.rest()
            .as_bytes()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    /// Consume `prefix` if the input starts with it.
    pub(crate) fn eat(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.advance(prefix.len());
            true
        } else {
            false
        }
    }

    /// Advance past the whole character at the cursor.
    pub(crate) fn advance_char(&mut self) {
        let width = self.current_char().map_or(1, char::len_utf8);
        self.advance(width);
    }

    /// Advance while `pred` holds for the current byte.
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    /// Skip XML whitespace; returns whether anything was skipped.
    pub(crate) fn eat_whitespace(&mut self) -> bool {
        let start = self.pos;
        self.eat_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
        self.pos > start
    }

    /// Position of the next `needle` at or after the cursor.
    pub(crate) fn find(&self, needle: &str) -> Option<usize> {
        memmem::find(self.rest().as_bytes(), needle.as_bytes()).map(|offset| self.pos + offset)
    }

    /// Move the cursor to an absolute position found by one of the `find`
    /// methods.
    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
    }

    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        self.src.get(start..end).unwrap_or("")
    }

    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        self.slice(start, self.pos)
    }
}
