#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Idempotence over a fixed corpus.
//!
//! For every document and configuration below,
//! `format(format(source)) == format(source)`.

mod common;

use kilter_fmt::predicate::{has_class, tag_in, tag_name};
use kilter_fmt::{format_str, ElementType, EmptyElementStyle, EscapeMode, FormatConfig, WrapPolicy};

const CORPUS: &[&str] = &[
    "<root/>",
    "<root>   </root>",
    "<root>\n\n</root>",
    "<a><b><c/></b></a>",
    "<ul>\n  <li>a</li>\n\n\n  <li>b</li>\n</ul>",
    "<p>Some <b>bold</b>, <i>italic</i>\n   and <code>code</code>.</p>",
    "<div>text before<div>block</div>text after<span>inline</span> tail</div>",
    "<div><span>a</span><div>b</div><span>c</span></div>",
    "<td>  padded   cell  <b> x </b>  </td>",
    "<body>\n<pre>\n  keep   this\n    <b>as is</b>\n</pre>\n<p>  squash   this </p>\n</body>",
    "<doc xml:space=\"preserve\">  a  <x>  b  </x><y xml:space=\"default\"> c </y></doc>",
    "<form a=\"1\" b=\"2\" c=\"3\" style=\"color: red; margin: 0\"><input type=\"text\" name=\"q\"/></form>",
    "<r><!-- one --><!-- two -->text<?pi data?></r>",
    "<?xml version=\"1.0\"?>\n<!DOCTYPE r>\n<!-- c -->\n<r>x</r>\n<!-- end -->\n",
    "<r title='a \"quoted\" value' alt=\"it's\">&lt;&amp;&gt;</r>",
    "<r><e class=\"wrap\" one=\"1\" two=\"2\" three=\"a long attribute value\"/></r>",
    "<r>\u{a0}<b>nbsp</b>\u{a0}</r>",
    "<svg:svg xmlns:svg=\"http://www.w3.org/2000/svg\"><svg:g><svg:rect/></svg:g></svg:svg>",
];

fn configs() -> Vec<(&'static str, FormatConfig)> {
    vec![
        ("default", FormatConfig::default()),
        ("html", common::html_config()),
        (
            "inline default",
            FormatConfig::builder()
                .default_type(Some(ElementType::Inline))
                .block_when(tag_in(["ul", "li", "div", "body"]).unwrap())
                .build()
                .unwrap(),
        ),
        (
            "unclassified",
            FormatConfig::builder()
                .default_type(None)
                .block_when(tag_name("div").unwrap())
                .build()
                .unwrap(),
        ),
        (
            "strip",
            FormatConfig::builder()
                .strip_whitespace_when(tag_in(["td", "p", "div", "r"]).unwrap())
                .inline_when(tag_in(["b", "i", "span", "code"]).unwrap())
                .build()
                .unwrap(),
        ),
        (
            "line width",
            FormatConfig::builder()
                .wrap_attributes_when(has_class("wrap").unwrap().or(tag_name("form").unwrap()))
                .wrap_policy(WrapPolicy::LineWidth(30))
                .indent_unit("\t")
                .empty_elements(EmptyElementStyle::ExplicitTags)
                .build()
                .unwrap(),
        ),
        (
            "strict",
            FormatConfig::builder()
                .escape_mode(EscapeMode::Strict)
                .normalize_whitespace_when(kilter_fmt::predicate::any_element())
                .build()
                .unwrap(),
        ),
    ]
}

#[test]
fn corpus_is_idempotent() {
    let mut failures = Vec::new();
    for (name, config) in configs() {
        for source in CORPUS {
            let once = format_str(source, &config)
                .unwrap_or_else(|e| panic!("[{name}] {source:?}: {e}"));
            let twice = format_str(&once, &config).unwrap();
            if once != twice {
                failures.push(format!(
                    "[{name}] {source:?}\n--- once ---\n{once}\n--- twice ---\n{twice}"
                ));
            }
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n\n"));
}

#[test]
fn formatting_is_deterministic() {
    let config = common::html_config();
    for source in CORPUS {
        assert_eq!(
            format_str(source, &config).unwrap(),
            format_str(source, &config).unwrap()
        );
    }
}
