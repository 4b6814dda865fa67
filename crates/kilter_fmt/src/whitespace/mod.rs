//! Whitespace strategy: the effective text and tail strings of each node.
//!
//! Text sits between a start tag and the first child (or the end tag); tail
//! sits between a node and its next sibling (or the parent's end tag). Both
//! are rewritten here before layout emits them, so layout never has to
//! decide where newlines go.
//!
//! Blocks collapse whitespace runs and trim where their content meets their
//! own tags, unless a preserve or `xml:space` rule makes them verbatim.
//! Inline content is collapsed only under an explicit normalize rule and
//! trimmed only under a strip rule.
//!
//! Boundary rules, applied unless the governing mode is verbatim:
//!
//! ```text
//! text before a block first child     rstrip + "\n" + indent(child)
//! tail of a block before a block      lstrip, "\n" + indent(parent) + ...
//! tail of a block before an inline    "\n" prepended if the leading run has none
//! tail of a block at the end          lstrip, "\n" + indent(parent) + ...
//! tail of any node before a block     rstrip + "\n" + indent(sibling)
//! ```

use kilter_tree::is_xml_whitespace;

use crate::classify::{NodeClass, WhitespaceMode};

#[cfg(test)]
mod tests;

/// Collapse every run of whitespace to a single space.
///
/// Leading and trailing runs become a single space as well.
pub(crate) fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_xml_whitespace(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

fn trim_start(text: &str) -> &str {
    text.trim_start_matches(is_xml_whitespace)
}

fn trim_end(text: &str) -> &str {
    text.trim_end_matches(is_xml_whitespace)
}

fn push_indent(out: &mut String, indent: &str, level: usize) {
    for _ in 0..level {
        out.push_str(indent);
    }
}

fn preceding_block(text: &str, level: usize, indent: &str) -> String {
    let mut out = trim_end(text).to_string();
    out.push('\n');
    push_indent(&mut out, indent, level);
    out
}

fn following_block(text: &str, level: usize, indent: &str) -> String {
    let mut out = String::from("\n");
    push_indent(&mut out, indent, level);
    out.push_str(trim_start(text));
    out
}

fn following_block_preceding_inline(text: &str) -> String {
    let leading = &text[..text.len() - trim_start(text).len()];
    if !leading.is_empty() && !leading.contains('\n') {
        format!("\n{text}")
    } else {
        text.to_string()
    }
}

/// How content governed by one element is reshaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Reshape {
    Verbatim,
    Keep,
    Collapse,
    /// Collapse, then trim where the content meets the element's own tags.
    Trim,
}

/// Blocks without an explicit mode behave like normalized blocks; inline
/// content without one is kept.
fn reshape(class: &NodeClass) -> Reshape {
    match class.whitespace {
        Some(WhitespaceMode::Preserve | WhitespaceMode::Strict) => Reshape::Verbatim,
        Some(WhitespaceMode::Strip) => Reshape::Trim,
        Some(WhitespaceMode::Normalize) | None if class.is_block() => Reshape::Trim,
        Some(WhitespaceMode::Normalize) => Reshape::Collapse,
        None => Reshape::Keep,
    }
}

/// Element text after whitespace handling.
///
/// `class` is the element's own class; `first_child` is the class of its
/// first structural child.
pub(crate) fn element_text(
    text: &str,
    class: &NodeClass,
    first_child: Option<&NodeClass>,
    indent: &str,
) -> String {
    let reshape = reshape(class);
    let text = match reshape {
        Reshape::Verbatim => return text.to_string(),
        Reshape::Keep => text.to_string(),
        Reshape::Collapse => normalize(text),
        Reshape::Trim => trim_start(&normalize(text)).to_string(),
    };

    match first_child {
        Some(child) if child.is_block() => preceding_block(&text, child.level, indent),
        None if reshape == Reshape::Trim => trim_end(&text).to_string(),
        _ => text,
    }
}

/// Tail of a non-root node after whitespace handling.
///
/// Tails belong to the parent's content, so the parent's class governs them.
pub(crate) fn tail_text(
    tail: &str,
    node: &NodeClass,
    parent: &NodeClass,
    next: Option<&NodeClass>,
    indent: &str,
) -> String {
    let reshape = reshape(parent);
    let mut text = match reshape {
        Reshape::Verbatim => return tail.to_string(),
        Reshape::Keep => tail.to_string(),
        Reshape::Collapse | Reshape::Trim => normalize(tail),
    };
    if next.is_none() && reshape == Reshape::Trim {
        text = trim_end(&text).to_string();
    }

    if node.is_block() {
        text = match next {
            Some(sibling) if sibling.is_inline() => following_block_preceding_inline(&text),
            _ => following_block(&text, parent.level, indent),
        };
    }

    match next {
        Some(sibling) if sibling.is_block() => preceding_block(&text, sibling.level, indent),
        _ => text,
    }
}
