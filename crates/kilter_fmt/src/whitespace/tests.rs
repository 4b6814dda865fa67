use pretty_assertions::assert_eq;

use super::*;
use crate::config::ElementType;

fn class(element_type: Option<ElementType>, level: usize) -> NodeClass {
    NodeClass {
        element_type,
        level,
        ..NodeClass::default()
    }
}

fn block(level: usize) -> NodeClass {
    class(Some(ElementType::Block), level)
}

fn inline(level: usize) -> NodeClass {
    class(Some(ElementType::Inline), level)
}

fn with_mode(mut class: NodeClass, mode: WhitespaceMode) -> NodeClass {
    class.whitespace = Some(mode);
    class
}

#[test]
fn normalize_collapses_runs() {
    assert_eq!(normalize("  a \n\t b  "), " a b ");
    assert_eq!(normalize("\n"), " ");
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
}

#[test]
fn text_before_block_child_moves_child_to_its_line() {
    assert_eq!(element_text("", &block(0), Some(&block(1)), "  "), "\n  ");
    assert_eq!(element_text("Title  \n", &block(1), Some(&block(2)), "  "), "Title\n    ");
}

#[test]
fn inline_text_is_untouched() {
    assert_eq!(element_text(" lead ", &inline(1), Some(&inline(1)), "  "), " lead ");
    assert_eq!(element_text("a   b\n c", &inline(1), None, "  "), "a   b\n c");
}

#[test]
fn block_text_sits_on_the_tag_line() {
    assert_eq!(element_text("\n   hello   world\n", &block(1), None, "  "), "hello world");
    assert_eq!(element_text(" \n ", &block(1), None, "  "), "");
    // Before an inline child only the leading edge is trimmed.
    assert_eq!(element_text("  lead  ", &block(1), Some(&inline(1)), "  "), "lead ");
}

#[test]
fn untyped_text_is_untouched() {
    assert_eq!(element_text("a   b\n c", &class(None, 0), None, "  "), "a   b\n c");
}

#[test]
fn normalize_mode() {
    let normalized = with_mode(inline(0), WhitespaceMode::Normalize);
    assert_eq!(element_text("  a \n  b  ", &normalized, None, "  "), " a b ");
    let normalized = with_mode(block(0), WhitespaceMode::Normalize);
    assert_eq!(element_text("  a \n  b  ", &normalized, None, "  "), "a b");
}

#[test]
fn strip_mode_trims_content_edges() {
    let stripped = with_mode(inline(0), WhitespaceMode::Strip);
    assert_eq!(element_text("  a \n  b  ", &stripped, None, "  "), "a b");
    // With children only the leading edge of the text is trimmed.
    assert_eq!(element_text("  a  ", &stripped, Some(&inline(1)), "  "), "a ");
}

#[test]
fn verbatim_modes_skip_block_boundaries() {
    for mode in [WhitespaceMode::Preserve, WhitespaceMode::Strict] {
        let verbatim = with_mode(block(0), mode);
        assert_eq!(element_text("  x \n", &verbatim, Some(&block(1)), "  "), "  x \n");
    }
}

#[test]
fn tail_between_blocks() {
    let parent = block(0);
    let tail = tail_text("\n\n   ", &block(1), &parent, Some(&block(1)), "  ");
    assert_eq!(tail, "\n  ");
}

#[test]
fn tail_with_text_between_blocks() {
    let parent = block(0);
    let tail = tail_text("  stray  ", &block(1), &parent, Some(&block(1)), "  ");
    assert_eq!(tail, "\nstray\n  ");
}

#[test]
fn tail_of_last_block_closes_parent() {
    let parent = block(1);
    assert_eq!(tail_text("", &block(2), &parent, None, "  "), "\n  ");
    assert_eq!(tail_text("\n      ", &block(2), &parent, None, "  "), "\n  ");
}

#[test]
fn tail_of_block_before_inline() {
    let parent = block(0);
    assert_eq!(tail_text(" x", &block(1), &parent, Some(&inline(1)), "  "), "\n x");
    assert_eq!(tail_text("\n x", &block(1), &parent, Some(&inline(1)), "  "), "\n x");
    assert_eq!(tail_text("x", &block(1), &parent, Some(&inline(1)), "  "), "x");
}

#[test]
fn tail_of_inline_before_block() {
    let parent = block(0);
    assert_eq!(tail_text(" and  ", &inline(1), &parent, Some(&block(1)), "  "), " and\n  ");
}

#[test]
fn tail_of_inline_flows() {
    let parent = block(0);
    assert_eq!(tail_text(" more", &inline(1), &parent, Some(&inline(1)), "  "), " more");
    assert_eq!(tail_text(" a \n b ", &inline(1), &parent, Some(&inline(1)), "  "), " a b ");
}

#[test]
fn last_tail_of_block_is_trimmed() {
    let parent = block(0);
    assert_eq!(tail_text("  tail \n", &inline(1), &parent, None, "  "), " tail");
}

#[test]
fn tail_inside_inline_parent_is_untouched() {
    let parent = inline(0);
    assert_eq!(tail_text("  tail \n", &inline(0), &parent, None, "  "), "  tail \n");
}

#[test]
fn tail_uses_parent_mode() {
    let preserving = with_mode(block(0), WhitespaceMode::Preserve);
    assert_eq!(tail_text("\n   ", &block(1), &preserving, Some(&block(1)), "  "), "\n   ");

    let stripping = with_mode(block(0), WhitespaceMode::Strip);
    assert_eq!(tail_text(" a  b ", &inline(1), &stripping, None, "  "), " a b");
    assert_eq!(tail_text(" a  b ", &inline(1), &stripping, Some(&inline(1)), "  "), " a b ");

    let normalizing = with_mode(inline(0), WhitespaceMode::Normalize);
    assert_eq!(tail_text(" a \n b ", &inline(0), &normalizing, None, "  "), " a b ");
}

#[test]
fn untyped_nodes_keep_their_tail() {
    let parent = class(None, 0);
    assert_eq!(tail_text("\n   x ", &class(None, 0), &parent, Some(&class(None, 0)), "  "), "\n   x ");
}

#[test]
fn transforms_are_idempotent() {
    let parent = block(1);
    let once = tail_text(" x ", &block(2), &parent, Some(&block(2)), "\t");
    let twice = tail_text(&once, &block(2), &parent, Some(&block(2)), "\t");
    assert_eq!(once, "\n\tx\n\t\t");
    assert_eq!(once, twice);

    let normalized = with_mode(block(0), WhitespaceMode::Normalize);
    let once = element_text(" y ", &normalized, Some(&block(1)), "  ");
    let twice = element_text(&once, &normalized, Some(&block(1)), "  ");
    assert_eq!(once, "y\n  ");
    assert_eq!(once, twice);
}
