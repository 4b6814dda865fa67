use kilter_tree::Element;
use pretty_assertions::assert_eq;

use super::*;
use crate::predicate::{tag_in, tag_name};

#[test]
fn format_str_parses_and_formats() {
    let config = FormatConfig::builder()
        .inline_when(tag_in(["b", "i"]).unwrap())
        .build()
        .unwrap();
    let out = format_str(
        "<?xml version=\"1.0\"?>\n<doc>\n<p>Hello <b>bold</b>   world</p>\n</doc>\n",
        &config,
    )
    .unwrap();
    assert_eq!(
        out,
        "<?xml version=\"1.0\"?>\n<doc>\n  <p>Hello <b>bold</b> world</p>\n</doc>"
    );
}

#[test]
fn default_whitespace_tidies_block_text() {
    let out = format_str(
        "<doc><p>\n   hello   world\n</p></doc>",
        &FormatConfig::default(),
    )
    .unwrap();
    assert_eq!(out, "<doc>\n  <p>hello world</p>\n</doc>");
}

#[test]
fn format_str_reports_parse_errors() {
    let err = format_str("<a><b></a>", &FormatConfig::default()).unwrap_err();
    assert!(matches!(err, FormatError::Parse(_)));
}

#[test]
fn format_element_and_document_agree() {
    let root = Element::new("root").with_child(Element::new("child").with_text("x"));
    let config = FormatConfig::default();
    let document = kilter_tree::Document::new(root.clone());
    assert_eq!(
        format_element(&root, &config).unwrap(),
        format_document(&document, &config).unwrap()
    );
}

#[test]
fn derive_leaves_original_untouched() {
    let base = Formatter::new(
        FormatConfig::builder()
            .block_when(tag_name("div").unwrap())
            .build()
            .unwrap(),
    );
    let derived = base
        .derive(|b| b.indent_size(4).trailing_newline(true))
        .unwrap();
    assert_eq!(derived.format_str("<div><div/></div>").unwrap(), "<div>\n    <div />\n</div>\n");
    assert_eq!(base.format_str("<div><div/></div>").unwrap(), "<div>\n  <div />\n</div>");
}

#[test]
fn derive_reports_config_errors() {
    let err = Formatter::default()
        .derive(|b| b.indent_unit("--"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidIndent { .. }));
}

#[test]
fn one_config_many_threads() {
    let formatter = Formatter::new(
        FormatConfig::builder()
            .inline_when(tag_name("em").unwrap())
            .build()
            .unwrap(),
    );
    let formatter = &formatter;
    let inputs: Vec<String> = (0..8)
        .map(|i| format!("<r><p>item {i} <em>x</em></p><p/></r>"))
        .collect();
    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || formatter.format_str(input).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (i, out) in outputs.iter().enumerate() {
        assert_eq!(out, &format!("<r>\n  <p>item {i} <em>x</em></p>\n  <p />\n</r>"));
    }
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
