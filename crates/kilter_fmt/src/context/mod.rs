//! Render context.
//!
//! Wraps an [`Emitter`] and tracks the column of the output cursor so the
//! line-width wrap policy can measure start tags where they will land.

use crate::emitter::{Emitter, StringEmitter};

/// Rendering state for one format call.
///
/// The column counts characters since the last newline, so text carrying its
/// own newlines (preserved content, multi-line attribute values) keeps it
/// accurate.
pub struct RenderContext<'c, E: Emitter = StringEmitter> {
    emitter: E,
    column: usize,
    indent_unit: &'c str,
}

impl<'c> RenderContext<'c, StringEmitter> {
    pub fn new(indent_unit: &'c str) -> Self {
        Self::with_emitter(StringEmitter::new(), indent_unit)
    }

    pub fn with_capacity(indent_unit: &'c str, capacity: usize) -> Self {
        Self::with_emitter(StringEmitter::with_capacity(capacity), indent_unit)
    }
}

impl<'c, E: Emitter> RenderContext<'c, E> {
    pub fn with_emitter(emitter: E, indent_unit: &'c str) -> Self {
        Self {
            emitter,
            column: 0,
            indent_unit,
        }
    }

    /// Current column (0-indexed, in characters).
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn indent_unit(&self) -> &'c str {
        self.indent_unit
    }

    /// Emit a fragment that may contain newlines.
    pub fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.emitter.emit(text);
        match text.rfind('\n') {
            Some(at) => self.column = text[at + 1..].chars().count(),
            None => self.column += text.chars().count(),
        }
    }

    pub fn emit_space(&mut self) {
        self.emitter.emit_space();
        self.column += 1;
    }

    pub fn emit_newline(&mut self) {
        self.emitter.emit_newline();
        self.column = 0;
    }

    pub fn emit_indent(&mut self, level: usize) {
        self.emitter.emit_indent(self.indent_unit, level);
        self.column += self.indent_unit.chars().count() * level;
    }

    /// Emit a newline followed by indentation at `level`.
    pub fn emit_newline_indent(&mut self, level: usize) {
        self.emit_newline();
        self.emit_indent(level);
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }
}
