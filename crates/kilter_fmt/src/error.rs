//! Error types.

use std::fmt;

use kilter_parse::ParseError;
use thiserror::Error;

/// Invalid builder or predicate arguments. Raised before any document is read.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{what} must not be empty")]
    EmptyName { what: &'static str },

    #[error("{what} `{name}` must not contain whitespace")]
    WhitespaceInName { what: &'static str, name: String },

    #[error("{what} needs at least one value")]
    EmptySet { what: &'static str },

    #[error("attribute count range is inverted: min {min} > max {max}")]
    InvertedRange { min: usize, max: usize },

    #[error("indent unit {unit:?} must contain only spaces and tabs")]
    InvalidIndent { unit: String },

    #[error("line width limit must be positive")]
    ZeroLineWidth,
}

/// Failure reported by a predicate factory while preparing against a root.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        PredicateError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The classification a predicate was prepared for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Block,
    Inline,
    PreserveWhitespace,
    NormalizeWhitespace,
    StripWhitespace,
    WrapAttributes,
    Void,
    TextFormatter,
    AttributeFormatter,
    AttributeReorder,
    AttributeMinimize,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Block => "block",
            Category::Inline => "inline",
            Category::PreserveWhitespace => "preserve-whitespace",
            Category::NormalizeWhitespace => "normalize-whitespace",
            Category::StripWhitespace => "strip-whitespace",
            Category::WrapAttributes => "wrap-attributes",
            Category::Void => "void-element",
            Category::TextFormatter => "text-formatter",
            Category::AttributeFormatter => "attribute-formatter",
            Category::AttributeReorder => "attribute-reorder",
            Category::AttributeMinimize => "attribute-minimize",
        })
    }
}

/// Everything a format call can fail with. No partial output is returned.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("{category} predicate failed to prepare: {source}")]
    Classification {
        category: Category,
        #[source]
        source: PredicateError,
    },

    #[error("cannot serialize {node}: {reason}")]
    MalformedContent { node: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl FormatError {
    pub(crate) fn classification(category: Category) -> impl FnOnce(PredicateError) -> Self {
        move |source| FormatError::Classification { category, source }
    }

    pub(crate) fn malformed(node: impl Into<String>, reason: impl Into<String>) -> Self {
        FormatError::MalformedContent {
            node: node.into(),
            reason: reason.into(),
        }
    }
}
