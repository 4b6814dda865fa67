//! Kilter Formatter
//!
//! Configurable pretty-printer for HTML and XML trees.
//!
//! # Architecture
//!
//! Formatting one tree runs in three steps:
//!
//! 1. **Index**: a read-only [`Tree`](kilter_tree::Tree) view assigns node ids
//!    in document order.
//! 2. **Classify**: every configured predicate is prepared against the root
//!    once, then each node gets a layout type (block or inline), a whitespace
//!    mode and an indentation level.
//! 3. **Render**: one depth-first pass writes tags and the whitespace-adjusted
//!    text into a [`RenderContext`].
//!
//! # Modules
//!
//! - [`predicate`]: two-phase element and attribute predicates
//! - [`config`]: immutable configuration and its builder
//! - [`formatters`]: ready-made value formatters and attribute reorderers
//! - [`emitter`]: output abstraction
//! - [`context`]: render context with column tracking
//!
//! ```
//! use kilter_fmt::{format_str, predicate::tag_name, FormatConfig};
//!
//! let config = FormatConfig::builder()
//!     .inline_when(tag_name("em").unwrap())
//!     .build()
//!     .unwrap();
//! let out = format_str("<doc><p>Some <em>text</em></p><p/></doc>", &config).unwrap();
//! assert_eq!(out, "<doc>\n  <p>Some <em>text</em></p>\n  <p />\n</doc>");
//! ```

mod classify;
pub mod config;
pub mod context;
mod document;
pub mod emitter;
mod error;
mod escape;
mod formatter;
pub mod formatters;
mod layout;
pub mod predicate;
mod whitespace;

#[cfg(test)]
mod tests;

use std::sync::Once;

use kilter_tree::{Document, Element};

pub use config::{
    AttributeReorderer, ElementType, EmptyElementStyle, EscapeMode, FormatConfig,
    FormatConfigBuilder, ValueFormatter, WrapPolicy, DEFAULT_INDENT_SIZE,
};
pub use context::RenderContext;
pub use emitter::{Emitter, StringEmitter};
pub use error::{Category, ConfigError, FormatError, PredicateError};
pub use formatter::Formatter;
pub use kilter_parse::ParseError;

/// Format a single element tree. The root's tail is not emitted.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.name))]
pub fn format_element(root: &Element, config: &FormatConfig) -> Result<String, FormatError> {
    layout::render_element(root, config)
}

/// Format a whole document, including declaration, prolog and epilog.
#[tracing::instrument(level = "debug", skip_all, fields(root = %document.root.name))]
pub fn format_document(document: &Document, config: &FormatConfig) -> Result<String, FormatError> {
    document::render_document(document, config)
}

/// Parse `source` as XML and format the resulting document.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn format_str(source: &str, config: &FormatConfig) -> Result<String, FormatError> {
    let document = kilter_parse::parse_document(source)?;
    document::render_document(&document, config)
}

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset; safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
