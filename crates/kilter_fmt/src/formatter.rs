//! Reusable formatter handle.

use kilter_tree::{Document, Element};

use crate::config::{FormatConfig, FormatConfigBuilder};
use crate::error::{ConfigError, FormatError};

/// A [`FormatConfig`] with the format entry points attached.
///
/// ```
/// use kilter_fmt::{predicate::tag_in, FormatConfig, Formatter};
///
/// let html = Formatter::new(
///     FormatConfig::builder()
///         .inline_when(tag_in(["b", "i"]).unwrap())
///         .build()
///         .unwrap(),
/// );
/// let tabs = html.derive(|b| b.indent_unit("\t")).unwrap();
///
/// assert_eq!(
///     tabs.format_str("<ul><li>a</li></ul>").unwrap(),
///     "<ul>\n\t<li>a</li>\n</ul>"
/// );
/// assert_eq!(html.config().indent_unit(), "  ");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Formatter {
    config: FormatConfig,
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Formatter { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// A new formatter whose configuration is this one modified by `change`.
    /// `self` is left untouched.
    pub fn derive<F>(&self, change: F) -> Result<Formatter, ConfigError>
    where
        F: FnOnce(FormatConfigBuilder) -> FormatConfigBuilder,
    {
        change(self.config.to_builder()).build().map(Formatter::new)
    }

    pub fn format_element(&self, root: &Element) -> Result<String, FormatError> {
        crate::format_element(root, &self.config)
    }

    pub fn format_document(&self, document: &Document) -> Result<String, FormatError> {
        crate::format_document(document, &self.config)
    }

    pub fn format_str(&self, source: &str) -> Result<String, FormatError> {
        crate::format_str(source, &self.config)
    }
}
