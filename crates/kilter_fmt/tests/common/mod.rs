//! Shared configurations for the integration tests.

#![allow(dead_code)]

use kilter_fmt::formatters::wrap_css_properties;
use kilter_fmt::predicate::{any_element, tag_in};
use kilter_fmt::{FormatConfig, WrapPolicy};

pub const BLOCK_TAGS: &[&str] = &[
    "html", "head", "body", "title", "meta", "link", "script", "div", "section", "p", "h1",
    "h2", "ul", "ol", "li", "table", "tr", "td", "pre", "form",
];

pub const INLINE_TAGS: &[&str] = &[
    "a", "b", "i", "em", "strong", "span", "code", "br", "img", "input", "label",
];

/// HTML-flavoured rules whose output is still well-formed XML, so it can be
/// parsed and formatted again.
pub fn html_config() -> FormatConfig {
    FormatConfig::builder()
        .block_when(tag_in(BLOCK_TAGS).unwrap())
        .inline_when(tag_in(INLINE_TAGS).unwrap())
        .preserve_whitespace_when(tag_in(["pre", "textarea"]).unwrap())
        .normalize_whitespace_when(tag_in(["p", "li", "h1", "h2", "td", "title"]).unwrap())
        .wrap_attributes_when(any_element())
        .wrap_policy(WrapPolicy::MoreThan(2))
        .attribute_formatter("style", wrap_css_properties(1))
        .doctype_override("<!DOCTYPE html>")
        .trailing_newline(true)
        .build()
        .unwrap()
}
