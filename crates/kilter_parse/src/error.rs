//! Reader errors.

use thiserror::Error;

/// A well-formedness error, located by byte offset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input at byte {offset}, expected {expected}")]
    UnexpectedEof { offset: usize, expected: &'static str },

    #[error("unexpected {found:?} at byte {offset}, expected {expected}")]
    Unexpected {
        offset: usize,
        found: char,
        expected: &'static str,
    },

    #[error("mismatched closing tag at byte {offset}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        offset: usize,
        expected: String,
        found: String,
    },

    #[error("duplicate attribute `{name}` at byte {offset}")]
    DuplicateAttribute { offset: usize, name: String },

    #[error("unknown entity `&{name};` at byte {offset}")]
    UnknownEntity { offset: usize, name: String },

    #[error("invalid character reference `&{reference};` at byte {offset}")]
    InvalidCharacterReference { offset: usize, reference: String },

    #[error("unterminated {construct} starting at byte {offset}")]
    Unterminated {
        offset: usize,
        construct: &'static str,
    },

    #[error("content after the root element at byte {offset}")]
    TrailingContent { offset: usize },

    #[error("document has no root element")]
    MissingRoot,
}

impl ParseError {
    /// Byte offset of the error, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedEof { offset, .. }
            | ParseError::Unexpected { offset, .. }
            | ParseError::MismatchedTag { offset, .. }
            | ParseError::DuplicateAttribute { offset, .. }
            | ParseError::UnknownEntity { offset, .. }
            | ParseError::InvalidCharacterReference { offset, .. }
            | ParseError::Unterminated { offset, .. }
            | ParseError::TrailingContent { offset } => Some(*offset),
            ParseError::MissingRoot => None,
        }
    }
}
