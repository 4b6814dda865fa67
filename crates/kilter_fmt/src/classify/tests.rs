use kilter_tree::{Element, Node, Tree};
use pretty_assertions::assert_eq;

use super::*;
use crate::config::FormatConfig;
use crate::error::PredicateError;
use crate::predicate::{attribute_named, custom, has_class, tag_in, tag_name};

fn classes(root: &Element, config: &FormatConfig) -> Vec<NodeClass> {
    let tree = Tree::new(root);
    let classification = classify(&tree, config).unwrap();
    tree.nodes().map(|n| classification.class(n.id())).collect()
}

fn types(root: &Element, config: &FormatConfig) -> Vec<Option<ElementType>> {
    classes(root, config).iter().map(|c| c.element_type).collect()
}

fn modes(root: &Element, config: &FormatConfig) -> Vec<Option<WhitespaceMode>> {
    classes(root, config).iter().map(|c| c.whitespace).collect()
}

const BLOCK: Option<ElementType> = Some(ElementType::Block);
const INLINE: Option<ElementType> = Some(ElementType::Inline);

#[test]
fn structural_children_default_to_block() {
    let root = Element::new("root")
        .with_child(Element::new("a").with_child(Element::new("b")))
        .with_child(Node::comment("c"));
    assert_eq!(
        types(&root, &FormatConfig::default()),
        [BLOCK, BLOCK, BLOCK, BLOCK]
    );
}

#[test]
fn mixed_content_children_are_inline() {
    let root = Element::new("p")
        .with_text("Some ")
        .with_child(Element::new("span").with_child(Element::new("b")))
        .with_child(Node::comment("c"));
    assert_eq!(
        types(&root, &FormatConfig::default()),
        [BLOCK, INLINE, INLINE, INLINE]
    );
}

#[test]
fn inline_sibling_keeps_untyped_nodes_inline() {
    let config = FormatConfig::builder()
        .inline_when(tag_name("em").unwrap())
        .default_type(None)
        .build()
        .unwrap();
    let root = Element::new("root")
        .with_child(Element::new("em"))
        .with_child(Element::new("x"));
    // The root falls to the default, so nothing below it is block.
    assert_eq!(types(&root, &config), [None, INLINE, None]);

    let config = config.to_builder().block_when(tag_name("root").unwrap()).build().unwrap();
    assert_eq!(types(&root, &config), [BLOCK, INLINE, None]);
}

#[test]
fn block_wins_over_inline() {
    let config = FormatConfig::builder()
        .block_when(tag_name("x").unwrap())
        .inline_when(tag_in(["x", "y"]).unwrap())
        .build()
        .unwrap();
    let root = Element::new("root")
        .with_child(Element::new("x"))
        .with_child(Element::new("y"));
    assert_eq!(types(&root, &config), [BLOCK, BLOCK, INLINE]);
}

#[test]
fn default_type_inline() {
    let config = FormatConfig::builder()
        .default_type(Some(ElementType::Inline))
        .build()
        .unwrap();
    let root = Element::new("root").with_child(Element::new("a"));
    assert_eq!(types(&root, &config), [INLINE, INLINE]);
}

#[test]
fn physical_levels_follow_blocks() {
    let config = FormatConfig::builder()
        .inline_when(tag_name("i").unwrap())
        .build()
        .unwrap();
    let root = Element::new("root").with_child(
        Element::new("div").with_child(
            Element::new("i").with_child(Element::new("b")),
        ),
    );
    let levels: Vec<usize> = classes(&root, &config).iter().map(|c| c.level).collect();
    assert_eq!(levels, [0, 1, 2, 2]);
}

#[test]
fn preserve_is_inherited() {
    let config = FormatConfig::builder()
        .preserve_whitespace_when(tag_name("pre").unwrap())
        .build()
        .unwrap();
    let root = Element::new("root").with_child(
        Element::new("pre").with_child(Element::new("code").with_child(Node::comment("x"))),
    );
    let p = Some(WhitespaceMode::Preserve);
    assert_eq!(modes(&root, &config), [None, p, p, p]);
}

#[test]
fn preserve_beats_normalize_and_strip() {
    let config = FormatConfig::builder()
        .preserve_whitespace_when(tag_name("pre").unwrap())
        .normalize_whitespace_when(tag_in(["pre", "p"]).unwrap())
        .strip_whitespace_when(tag_in(["pre", "td"]).unwrap())
        .build()
        .unwrap();
    let root = Element::new("root")
        .with_child(Element::new("pre"))
        .with_child(Element::new("p"))
        .with_child(Element::new("td"));
    assert_eq!(
        modes(&root, &config),
        [
            None,
            Some(WhitespaceMode::Preserve),
            Some(WhitespaceMode::Normalize),
            Some(WhitespaceMode::Strip),
        ]
    );
}

#[test]
fn explicit_normalize_overrides_inherited_preserve() {
    let config = FormatConfig::builder()
        .preserve_whitespace_when(tag_name("pre").unwrap())
        .normalize_whitespace_when(tag_name("span").unwrap())
        .build()
        .unwrap();
    let root = Element::new("pre").with_child(Element::new("span"));
    assert_eq!(
        modes(&root, &config),
        [Some(WhitespaceMode::Preserve), Some(WhitespaceMode::Normalize)]
    );
}

#[test]
fn strip_beats_normalize() {
    let config = FormatConfig::builder()
        .normalize_whitespace_when(tag_name("td").unwrap())
        .strip_whitespace_when(tag_name("td").unwrap())
        .build()
        .unwrap();
    let root = Element::new("td");
    assert_eq!(modes(&root, &config), [Some(WhitespaceMode::Strip)]);
}

#[test]
fn xml_space() {
    let root = Element::new("root").with_child(
        Element::new("a")
            .with_attribute("xml:space", "preserve")
            .with_child(Element::new("b"))
            .with_child(Element::new("c").with_attribute("xml:space", "default")),
    );
    let config = FormatConfig::builder()
        .normalize_whitespace_when(tag_name("b").unwrap())
        .build()
        .unwrap();
    let s = Some(WhitespaceMode::Strict);
    assert_eq!(modes(&root, &config), [None, s, s, None]);
}

#[test]
fn element_flags_and_hook_indices() {
    let config = FormatConfig::builder()
        .wrap_attributes_when(has_class("w").unwrap())
        .void_when(tag_name("br").unwrap())
        .text_formatter("pre", |t, _, _| t.to_string())
        .text_formatter("code", |t, _, _| t.to_string())
        .reformat_text_when(crate::predicate::any_element(), |t, _, _| t.to_string())
        .build()
        .unwrap();
    let root = Element::new("root")
        .with_attribute("class", "w")
        .with_child(Element::new("br"))
        .with_child(Element::new("code"));
    let classes = classes(&root, &config);
    assert!(classes[0].wrap_attributes);
    assert!(!classes[1].wrap_attributes);
    assert!(classes[1].void);
    assert_eq!(classes[0].text_formatter, Some(2));
    assert_eq!(classes[2].text_formatter, Some(1));
    assert_eq!(classes[0].reorderer, None);
}

#[test]
fn attribute_hooks() {
    let config = FormatConfig::builder()
        .attribute_formatter("style", |v, _, _| v.to_string())
        .reformat_attribute_when(attribute_named("id"), |v, _, _| v.to_string())
        .minimize_attribute_when(attribute_named("hidden"))
        .build()
        .unwrap();
    let root = Element::new("root");
    let tree = Tree::new(&root);
    let classification = classify(&tree, &config).unwrap();
    let element = tree.root();
    assert_eq!(classification.attribute_formatter(element, "style", "a: b"), Some(0));
    assert_eq!(classification.attribute_formatter(element, "id", "x"), Some(1));
    assert_eq!(classification.attribute_formatter(element, "class", "x"), None);
    assert!(classification.minimize(element, "hidden", ""));
    assert!(!classification.minimize(element, "id", "x"));
}

#[test]
fn failing_prepare_names_the_category() {
    let failing = custom(|_root: ElementRef<'_>| {
        Err::<fn(ElementRef<'_>) -> bool, _>(PredicateError::new("boom"))
    });
    let config = FormatConfig::builder().void_when(failing).build().unwrap();
    let root = Element::new("root");
    let tree = Tree::new(&root);
    let Err(error) = classify(&tree, &config) else {
        panic!("expected classification to fail");
    };
    assert_eq!(error.to_string(), "void-element predicate failed to prepare: boom");
}

#[test]
fn prepares_each_factory_once() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let counting = custom(move |_root: ElementRef<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(|e: ElementRef<'_>| e.name() == "b")
    });
    let config = FormatConfig::builder().block_when(counting).build().unwrap();
    let root = Element::new("a")
        .with_child(Element::new("b"))
        .with_child(Element::new("b"));
    let tree = Tree::new(&root);
    classify(&tree, &config).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn wide_elements_classify_children_together() {
    let config = FormatConfig::builder()
        .block_when(tag_name("root").unwrap())
        .inline_when(tag_name("i").unwrap())
        .default_type(None)
        .build()
        .unwrap();

    let mut root = Element::new("root");
    for _ in 0..10_000 {
        root = root.with_child(Element::new("c"));
    }
    let blocks = types(&root, &config);
    assert_eq!(blocks.len(), 10_001);
    assert!(blocks.iter().all(|t| *t == Some(ElementType::Block)));

    let root = root.with_child(Element::new("i"));
    let mixed = types(&root, &config);
    assert_eq!(mixed[0], Some(ElementType::Block));
    assert!(mixed[1..10_001].iter().all(Option::is_none));
    assert_eq!(mixed[10_001], Some(ElementType::Inline));
}
