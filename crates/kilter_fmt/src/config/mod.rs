//! Formatter configuration.
//!
//! [`FormatConfig`] is immutable once built and cheap to clone; predicates and
//! hooks are shared behind `Arc`s, so one config can serve many threads.
//!
//! ```
//! use kilter_fmt::{predicate::tag_in, FormatConfig, WrapPolicy};
//!
//! let config = FormatConfig::builder()
//!     .block_when(tag_in(["div", "p"]).unwrap())
//!     .inline_when(tag_in(["b", "i"]).unwrap())
//!     .wrap_policy(WrapPolicy::MoreThan(3))
//!     .indent_size(4)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.indent(2), "        ");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::predicate::{
    attribute_named, never, tag_name, AttributePredicate, ElementPredicate,
};


/// Spaces per indentation level by default.
pub const DEFAULT_INDENT_SIZE: usize = 2;

/// Hook rewriting text content or an attribute value.
///
/// Receives the raw string, the active configuration and the indentation level.
pub type ValueFormatter = Arc<dyn Fn(&str, &FormatConfig, usize) -> String + Send + Sync>;

/// Hook choosing attribute order from the attribute names.
///
/// Names it omits keep their relative order after the ones it returns.
pub type AttributeReorderer = Arc<dyn Fn(&[&str]) -> Vec<String> + Send + Sync>;

/// Layout role of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Own line, indented.
    Block,
    /// Flows with the surrounding text.
    Inline,
}

/// When a wrap-eligible element puts one attribute per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum WrapPolicy {
    /// Whenever the element has attributes.
    #[default]
    Always,
    /// When the element has more than `n` attributes.
    MoreThan(usize),
    /// When the single-line start tag would end past column `n`.
    LineWidth(usize),
}

/// How elements with no content are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EmptyElementStyle {
    /// `<a />`
    #[default]
    SelfClosing,
    /// `<a></a>`
    ExplicitTags,
}

/// Character escaping and validation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum EscapeMode {
    /// HTML-friendly: escape `& < >`, keep literal newlines in attributes.
    #[default]
    Permissive,
    /// XML: also encode attribute whitespace and reject content that
    /// cannot be serialized as well-formed XML.
    Strict,
}

/// Immutable formatter configuration.
#[derive(Clone)]
pub struct FormatConfig {
    pub(crate) block: ElementPredicate,
    pub(crate) inline: ElementPredicate,
    pub(crate) preserve_whitespace: ElementPredicate,
    pub(crate) normalize_whitespace: ElementPredicate,
    pub(crate) strip_whitespace: ElementPredicate,
    pub(crate) wrap_attributes: ElementPredicate,
    pub(crate) void: ElementPredicate,
    pub(crate) wrap_policy: WrapPolicy,
    pub(crate) text_formatters: Vec<(ElementPredicate, ValueFormatter)>,
    pub(crate) attribute_formatters: Vec<(AttributePredicate, ValueFormatter)>,
    pub(crate) reorderers: Vec<(ElementPredicate, AttributeReorderer)>,
    pub(crate) minimize_attributes: AttributePredicate,
    pub(crate) empty_elements: EmptyElementStyle,
    pub(crate) escape_mode: EscapeMode,
    pub(crate) indent_unit: String,
    pub(crate) default_type: Option<ElementType>,
    pub(crate) doctype_override: Option<String>,
    pub(crate) xml_declaration: Option<String>,
    pub(crate) trailing_newline: bool,
    pub(crate) preserve_cdata: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            block: never(),
            inline: never(),
            preserve_whitespace: never(),
            normalize_whitespace: never(),
            strip_whitespace: never(),
            wrap_attributes: never(),
            void: never(),
            wrap_policy: WrapPolicy::default(),
            text_formatters: Vec::new(),
            attribute_formatters: Vec::new(),
            reorderers: Vec::new(),
            minimize_attributes: AttributePredicate::never(),
            empty_elements: EmptyElementStyle::default(),
            escape_mode: EscapeMode::default(),
            indent_unit: " ".repeat(DEFAULT_INDENT_SIZE),
            default_type: Some(ElementType::Block),
            doctype_override: None,
            xml_declaration: None,
            trailing_newline: false,
            preserve_cdata: true,
        }
    }
}

impl FormatConfig {
    pub fn builder() -> FormatConfigBuilder {
        FormatConfigBuilder::new(FormatConfig::default())
    }

    /// A builder starting from this configuration.
    pub fn to_builder(&self) -> FormatConfigBuilder {
        FormatConfigBuilder::new(self.clone())
    }

    /// One level of indentation.
    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Indentation for `level`.
    pub fn indent(&self, level: usize) -> String {
        self.indent_unit.repeat(level)
    }

    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap_policy
    }

    pub fn default_type(&self) -> Option<ElementType> {
        self.default_type
    }

    pub fn empty_elements(&self) -> EmptyElementStyle {
        self.empty_elements
    }

    pub fn escape_mode(&self) -> EscapeMode {
        self.escape_mode
    }

    pub fn doctype_override(&self) -> Option<&str> {
        self.doctype_override.as_deref()
    }

    pub fn xml_declaration(&self) -> Option<&str> {
        self.xml_declaration.as_deref()
    }

    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn preserve_cdata(&self) -> bool {
        self.preserve_cdata
    }
}

impl fmt::Debug for FormatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatConfig")
            .field("wrap_policy", &self.wrap_policy)
            .field("text_formatters", &self.text_formatters.len())
            .field("attribute_formatters", &self.attribute_formatters.len())
            .field("reorderers", &self.reorderers.len())
            .field("empty_elements", &self.empty_elements)
            .field("escape_mode", &self.escape_mode)
            .field("indent_unit", &self.indent_unit)
            .field("default_type", &self.default_type)
            .field("doctype_override", &self.doctype_override)
            .field("xml_declaration", &self.xml_declaration)
            .field("trailing_newline", &self.trailing_newline)
            .field("preserve_cdata", &self.preserve_cdata)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FormatConfig`].
///
/// Predicate setters replace the previous predicate for their category; combine
/// rules with [`ElementPredicate::or`]. Formatter and reorderer setters append,
/// and the first matching entry wins. Argument errors are reported by
/// [`build`](Self::build).
#[derive(Clone)]
#[must_use]
pub struct FormatConfigBuilder {
    config: FormatConfig,
    error: Option<ConfigError>,
}

impl FormatConfigBuilder {
    fn new(config: FormatConfig) -> Self {
        Self {
            config,
            error: None,
        }
    }

    fn fail(mut self, error: ConfigError) -> Self {
        self.error.get_or_insert(error);
        self
    }

    pub fn block_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.block = predicate;
        self
    }

    pub fn inline_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.inline = predicate;
        self
    }

    pub fn preserve_whitespace_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.preserve_whitespace = predicate;
        self
    }

    pub fn normalize_whitespace_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.normalize_whitespace = predicate;
        self
    }

    pub fn strip_whitespace_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.strip_whitespace = predicate;
        self
    }

    pub fn wrap_attributes_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.wrap_attributes = predicate;
        self
    }

    pub fn wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.config.wrap_policy = policy;
        self
    }

    /// Rewrite the text of matching elements after whitespace handling.
    pub fn reformat_text_when<F>(mut self, predicate: ElementPredicate, formatter: F) -> Self
    where
        F: Fn(&str, &FormatConfig, usize) -> String + Send + Sync + 'static,
    {
        self.config
            .text_formatters
            .push((predicate, Arc::new(formatter)));
        self
    }

    /// [`reformat_text_when`](Self::reformat_text_when) for one tag name.
    pub fn text_formatter<F>(self, tag: &str, formatter: F) -> Self
    where
        F: Fn(&str, &FormatConfig, usize) -> String + Send + Sync + 'static,
    {
        match tag_name(tag) {
            Ok(predicate) => self.reformat_text_when(predicate, formatter),
            Err(e) => self.fail(e),
        }
    }

    /// Rewrite matching attribute values.
    pub fn reformat_attribute_when<F>(mut self, predicate: AttributePredicate, formatter: F) -> Self
    where
        F: Fn(&str, &FormatConfig, usize) -> String + Send + Sync + 'static,
    {
        self.config
            .attribute_formatters
            .push((predicate, Arc::new(formatter)));
        self
    }

    /// [`reformat_attribute_when`](Self::reformat_attribute_when) for every
    /// attribute called `name`.
    pub fn attribute_formatter<F>(self, name: &str, formatter: F) -> Self
    where
        F: Fn(&str, &FormatConfig, usize) -> String + Send + Sync + 'static,
    {
        if let Err(e) = crate::predicate::validate_name("attribute name", name) {
            return self.fail(e);
        }
        self.reformat_attribute_when(attribute_named(name), formatter)
    }

    pub fn reorder_attributes_when<R>(mut self, predicate: ElementPredicate, reorderer: R) -> Self
    where
        R: Fn(&[&str]) -> Vec<String> + Send + Sync + 'static,
    {
        self.config.reorderers.push((predicate, Arc::new(reorderer)));
        self
    }

    /// Write matching attributes as a bare name (`<input disabled>`).
    pub fn minimize_attribute_when(mut self, predicate: AttributePredicate) -> Self {
        self.config.minimize_attributes = predicate;
        self
    }

    /// Empty matching elements are written as a start tag only (`<br>`).
    pub fn void_when(mut self, predicate: ElementPredicate) -> Self {
        self.config.void = predicate;
        self
    }

    pub fn empty_elements(mut self, style: EmptyElementStyle) -> Self {
        self.config.empty_elements = style;
        self
    }

    pub fn escape_mode(mut self, mode: EscapeMode) -> Self {
        self.config.escape_mode = mode;
        self
    }

    pub fn indent_unit(mut self, unit: impl Into<String>) -> Self {
        self.config.indent_unit = unit.into();
        self
    }

    pub fn indent_size(self, spaces: usize) -> Self {
        self.indent_unit(" ".repeat(spaces))
    }

    /// Type of nodes no rule classifies. `None` leaves their whitespace as is.
    pub fn default_type(mut self, default_type: Option<ElementType>) -> Self {
        self.config.default_type = default_type;
        self
    }

    /// Replace (or insert) the document's DOCTYPE, e.g. `<!DOCTYPE html>`.
    pub fn doctype_override(mut self, doctype: impl Into<String>) -> Self {
        self.config.doctype_override = Some(doctype.into());
        self
    }

    /// Replace (or insert) the XML declaration.
    pub fn xml_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.config.xml_declaration = Some(declaration.into());
        self
    }

    pub fn trailing_newline(mut self, enabled: bool) -> Self {
        self.config.trailing_newline = enabled;
        self
    }

    /// Write CDATA sections back as sections (the default) or as escaped
    /// character data.
    pub fn preserve_cdata(mut self, enabled: bool) -> Self {
        self.config.preserve_cdata = enabled;
        self
    }

    pub fn build(self) -> Result<FormatConfig, ConfigError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let unit = &self.config.indent_unit;
        if !unit.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::InvalidIndent { unit: unit.clone() });
        }
        if self.config.wrap_policy == WrapPolicy::LineWidth(0) {
            return Err(ConfigError::ZeroLineWidth);
        }
        Ok(self.config)
    }
}
