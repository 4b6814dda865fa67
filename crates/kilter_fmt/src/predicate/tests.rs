use kilter_tree::{Element, Tree};
use pretty_assertions::assert_eq;

use super::*;
use crate::error::ConfigError;

/// ```text
/// <div class="a b" id="top">
///   <p lang="en">text<b>bold</b> tail</p>
///   <ul><li id="x">1</li><li>2</li></ul>
///   <pre> </pre>
/// </div>
/// ```
fn sample() -> Element {
    Element::new("div")
        .with_attribute("class", "a b")
        .with_attribute("id", "top")
        .with_child(
            Element::new("p")
                .with_attribute("lang", "en")
                .with_text("text")
                .with_child(Element::new("b").with_text("bold").with_tail(" tail")),
        )
        .with_child(
            Element::new("ul")
                .with_child(Element::new("li").with_attribute("id", "x").with_text("1"))
                .with_child(Element::new("li").with_text("2")),
        )
        .with_child(Element::new("pre").with_text(" "))
}

fn matching(predicate: &ElementPredicate, root: &Element) -> Vec<String> {
    let tree = Tree::new(root);
    let compiled = predicate.prepare(tree.root()).unwrap();
    tree.elements()
        .filter(|e| compiled.test(*e))
        .map(|e| e.name().to_string())
        .collect()
}

fn matching_attributes(predicate: &AttributePredicate, root: &Element) -> Vec<String> {
    let tree = Tree::new(root);
    let compiled = predicate.prepare(tree.root()).unwrap();
    let mut out = Vec::new();
    for element in tree.elements() {
        for attribute in element.attributes() {
            if compiled.test(element, &attribute.name, &attribute.value) {
                out.push(format!("{}@{}", element.name(), attribute.name));
            }
        }
    }
    out
}

#[test]
fn tag_predicates() {
    let root = sample();
    assert_eq!(matching(&tag_name("li").unwrap(), &root), ["li", "li"]);
    assert_eq!(matching(&tag_in(["ul", "pre"]).unwrap(), &root), ["ul", "pre"]);
}

#[test]
fn name_arguments_are_validated() {
    assert_eq!(
        tag_name("").unwrap_err(),
        ConfigError::EmptyName { what: "tag name" }
    );
    assert!(matches!(
        tag_in(["ok", "not ok"]),
        Err(ConfigError::WhitespaceInName { .. })
    ));
    assert_eq!(
        tag_in(Vec::<&str>::new()).unwrap_err(),
        ConfigError::EmptySet { what: "tag_in" }
    );
    assert!(has_class("a b").is_err());
    assert!(has_attribute("").is_err());
    assert!(attribute_equals("x y", "1").is_err());
    assert!(attribute_value_in("lang", Vec::<String>::new()).is_err());
    assert_eq!(
        attribute_count_between(3, 1).unwrap_err(),
        ConfigError::InvertedRange { min: 3, max: 1 }
    );
}

#[test]
fn attribute_predicates() {
    let root = sample();
    assert_eq!(matching(&has_class("b").unwrap(), &root), ["div"]);
    assert!(matching(&has_class("ab").unwrap(), &root).is_empty());
    assert_eq!(matching(&has_attribute("id").unwrap(), &root), ["div", "li"]);
    assert_eq!(matching(&attribute_equals("id", "x").unwrap(), &root), ["li"]);
    assert_eq!(
        matching(&attribute_value_in("lang", ["fr", "en"]).unwrap(), &root),
        ["p"]
    );
}

#[test]
fn attribute_counts() {
    let root = sample();
    assert_eq!(matching(&attribute_count_min(2), &root), ["div"]);
    assert_eq!(matching(&attribute_count_max(0), &root), ["b", "ul", "li", "pre"]);
    assert_eq!(
        matching(&attribute_count_between(1, 1).unwrap(), &root),
        ["p", "li"]
    );
}

#[test]
fn content_predicates() {
    let root = sample();
    assert_eq!(
        matching(&has_significant_content(), &root),
        ["p", "b", "li", "li"]
    );
    assert_eq!(
        matching(&has_no_significant_content(), &root),
        ["div", "ul", "pre"]
    );
    assert_eq!(matching(&in_mixed_content(), &root), ["b"]);
    assert_eq!(matching(&has_child_elements(), &root), ["div", "p", "ul"]);
}

#[test]
fn constant_predicates() {
    let root = sample();
    assert_eq!(matching(&any_element(), &root).len(), 7);
    assert!(matching(&never(), &root).is_empty());
}

#[test]
fn within_matches_proper_descendants() {
    let root = sample();
    let inside_ul = within(tag_name("ul").unwrap());
    assert_eq!(matching(&inside_ul, &root), ["li", "li"]);
    let inside_div = within(tag_name("div").unwrap());
    assert_eq!(matching(&inside_div, &root).len(), 6);
}

#[test]
fn combinators() {
    let root = sample();
    let li = tag_name("li").unwrap();
    let with_id = has_attribute("id").unwrap();

    assert_eq!(matching(&li.clone().and(with_id.clone()), &root), ["li"]);
    assert_eq!(
        matching(&li.clone().or(tag_name("b").unwrap()), &root),
        ["b", "li", "li"]
    );
    assert_eq!(matching(&!with_id, &root), ["p", "b", "ul", "li", "pre"]);
    assert_eq!(matching(&any_of([]), &root), Vec::<String>::new());
    assert_eq!(matching(&all_of([]), &root).len(), 7);
}

#[test]
fn from_fn_predicate() {
    let root = sample();
    let short = from_fn(|e: ElementRef<'_>| e.name().len() == 1);
    assert_eq!(matching(&short, &root), ["p", "b"]);
}

#[test]
fn custom_prepares_once_per_document() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    let prepared = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&prepared);
    // Elements whose tag is shared by another element in the same document.
    let repeated = custom(move |root: ElementRef<'_>| {
        counter.fetch_add(1, Ordering::SeqCst);
        let mut seen = rustc_hash::FxHashMap::<String, usize>::default();
        for element in std::iter::once(root).chain(root.descendants()) {
            *seen.entry(element.name().to_string()).or_default() += 1;
        }
        Ok(move |e: ElementRef<'_>| seen.get(e.name()).is_some_and(|n| *n > 1))
    });

    let root = sample();
    assert_eq!(matching(&repeated, &root), ["li", "li"]);
    assert_eq!(prepared.load(Ordering::SeqCst), 1);
}

#[test]
fn prepare_errors_propagate() {
    let failing = custom(|_root: ElementRef<'_>| {
        Err::<fn(ElementRef<'_>) -> bool, _>(PredicateError::new("no index"))
    });
    let root = sample();
    let tree = Tree::new(&root);
    let Err(error) = failing.clone().or(any_element()).prepare(tree.root()) else {
        panic!("expected prepare to fail");
    };
    assert_eq!(error.message(), "no index");
}

#[test]
fn attribute_matching() {
    let root = sample();
    assert_eq!(
        matching_attributes(&attribute_named("id"), &root),
        ["div@id", "li@id"]
    );
    assert_eq!(
        matching_attributes(&attribute_matches("id", "x"), &root),
        ["li@id"]
    );
    assert_eq!(
        matching_attributes(&attribute_named(Matcher::prefix("la")), &root),
        ["p@lang"]
    );
    let spaced = attribute_matches(Matcher::Any, Matcher::custom(|v| v.contains(' ')));
    assert_eq!(matching_attributes(&spaced, &root), ["div@class"]);
}

#[test]
fn attribute_predicate_scoped_to_elements() {
    let root = sample();
    let li_ids = tag_name("li").unwrap().with_attribute("id", Matcher::Any);
    assert_eq!(matching_attributes(&li_ids, &root), ["li@id"]);

    let either = li_ids.or(attribute_named("lang"));
    assert_eq!(matching_attributes(&either, &root), ["p@lang", "li@id"]);
    assert!(matching_attributes(&AttributePredicate::never(), &root).is_empty());
}
