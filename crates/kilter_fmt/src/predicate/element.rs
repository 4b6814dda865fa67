//! Element predicate factories.

use std::marker::PhantomData;
use std::sync::Arc;

use kilter_tree::{is_xml_whitespace, ElementRef, NodeId};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{prepare_all, CompiledPredicate, ElementPredicate, PredicateFactory};
use crate::error::{ConfigError, PredicateError};

/// Reject empty names and names with whitespace.
pub(crate) fn validate_name(what: &'static str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::EmptyName { what });
    }
    if name.chars().any(is_xml_whitespace) {
        return Err(ConfigError::WhitespaceInName {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Per-element tests that need no document context.
#[derive(Clone, Debug)]
enum Simple {
    TagName(String),
    TagIn(FxHashSet<String>),
    HasClass(String),
    HasAttribute(String),
    AttributeEquals { name: String, value: String },
    AttributeCount { min: usize, max: usize },
    SignificantContent,
    NoSignificantContent,
    MixedContent,
    ChildElements,
    Any,
    Never,
}

impl CompiledPredicate for Simple {
    fn test(&self, element: ElementRef<'_>) -> bool {
        match self {
            Simple::TagName(name) => element.name() == name,
            Simple::TagIn(names) => names.contains(element.name()),
            Simple::HasClass(class) => element
                .attribute("class")
                .is_some_and(|classes| classes.split(is_xml_whitespace).any(|c| c == class)),
            Simple::HasAttribute(name) => element.attributes().contains(name),
            Simple::AttributeEquals { name, value } => {
                element.attribute(name) == Some(value.as_str())
            }
            Simple::AttributeCount { min, max } => {
                (*min..=*max).contains(&element.attributes().len())
            }
            Simple::SignificantContent => element.has_direct_significant_text(),
            Simple::NoSignificantContent => !element.has_direct_significant_text(),
            Simple::MixedContent => element.is_in_mixed_content(),
            Simple::ChildElements => element.has_child_elements(),
            Simple::Any => true,
            Simple::Never => false,
        }
    }
}

impl PredicateFactory for Simple {
    fn prepare<'t>(
        &self,
        _root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        Ok(Box::new(self.clone()))
    }
}

/// Precomputed set of matching elements.
struct IdSet(FxHashSet<NodeId>);

impl CompiledPredicate for IdSet {
    fn test(&self, element: ElementRef<'_>) -> bool {
        self.0.contains(&element.id())
    }
}

/// Elements with the given tag name.
pub fn tag_name(name: &str) -> Result<ElementPredicate, ConfigError> {
    validate_name("tag name", name)?;
    Ok(ElementPredicate::new(Simple::TagName(name.to_string())))
}

/// Elements whose tag name is one of `names`.
pub fn tag_in<I, S>(names: I) -> Result<ElementPredicate, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = FxHashSet::default();
    for name in names {
        let name = name.as_ref();
        validate_name("tag name", name)?;
        set.insert(name.to_string());
    }
    if set.is_empty() {
        return Err(ConfigError::EmptySet { what: "tag_in" });
    }
    Ok(ElementPredicate::new(Simple::TagIn(set)))
}

/// Elements whose whitespace-separated `class` attribute contains `class`.
pub fn has_class(class: &str) -> Result<ElementPredicate, ConfigError> {
    validate_name("class name", class)?;
    Ok(ElementPredicate::new(Simple::HasClass(class.to_string())))
}

pub fn has_attribute(name: &str) -> Result<ElementPredicate, ConfigError> {
    validate_name("attribute name", name)?;
    Ok(ElementPredicate::new(Simple::HasAttribute(name.to_string())))
}

pub fn attribute_equals(name: &str, value: &str) -> Result<ElementPredicate, ConfigError> {
    validate_name("attribute name", name)?;
    Ok(ElementPredicate::new(Simple::AttributeEquals {
        name: name.to_string(),
        value: value.to_string(),
    }))
}

/// Elements whose `name` attribute has one of `values`.
///
/// The matching set is computed once per document in `prepare`.
pub fn attribute_value_in<I, S>(name: &str, values: I) -> Result<ElementPredicate, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    validate_name("attribute name", name)?;
    let values: FxHashSet<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(ConfigError::EmptySet {
            what: "attribute_value_in",
        });
    }
    Ok(ElementPredicate::new(AttributeValueIn {
        name: name.to_string(),
        values,
    }))
}

struct AttributeValueIn {
    name: String,
    values: FxHashSet<String>,
}

impl PredicateFactory for AttributeValueIn {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        let matching = std::iter::once(root)
            .chain(root.descendants())
            .filter(|e| {
                e.attribute(&self.name)
                    .is_some_and(|v| self.values.contains(v))
            })
            .map(ElementRef::id)
            .collect();
        Ok(Box::new(IdSet(matching)))
    }
}

/// Elements with at least `min` attributes.
pub fn attribute_count_min(min: usize) -> ElementPredicate {
    ElementPredicate::new(Simple::AttributeCount {
        min,
        max: usize::MAX,
    })
}

/// Elements with at most `max` attributes.
pub fn attribute_count_max(max: usize) -> ElementPredicate {
    ElementPredicate::new(Simple::AttributeCount { min: 0, max })
}

/// Elements with `min..=max` attributes.
pub fn attribute_count_between(min: usize, max: usize) -> Result<ElementPredicate, ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange { min, max });
    }
    Ok(ElementPredicate::new(Simple::AttributeCount { min, max }))
}

/// Elements whose own text or child tails hold non-whitespace.
pub fn has_significant_content() -> ElementPredicate {
    ElementPredicate::new(Simple::SignificantContent)
}

pub fn has_no_significant_content() -> ElementPredicate {
    ElementPredicate::new(Simple::NoSignificantContent)
}

/// Elements whose parent has significant text of its own.
pub fn in_mixed_content() -> ElementPredicate {
    ElementPredicate::new(Simple::MixedContent)
}

pub fn has_child_elements() -> ElementPredicate {
    ElementPredicate::new(Simple::ChildElements)
}

pub fn any_element() -> ElementPredicate {
    ElementPredicate::new(Simple::Any)
}

pub fn never() -> ElementPredicate {
    ElementPredicate::new(Simple::Never)
}

/// Elements with a proper ancestor matching `ancestor`.
pub fn within(ancestor: ElementPredicate) -> ElementPredicate {
    ElementPredicate::new(Within(ancestor))
}

struct Within(ElementPredicate);

impl PredicateFactory for Within {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        let ancestor = self.0.prepare(root)?;
        let mut inside: FxHashMap<NodeId, bool> = FxHashMap::default();
        inside.insert(root.id(), false);
        let mut matching = FxHashSet::default();
        // Document order visits every parent before its children.
        for element in root.descendants() {
            let Some(parent) = element.parent() else {
                continue;
            };
            let parent_inside = inside.get(&parent.id()).copied().unwrap_or(false);
            let is_inside = parent_inside || ancestor.test(parent);
            inside.insert(element.id(), is_inside);
            if is_inside {
                matching.insert(element.id());
            }
        }
        Ok(Box::new(IdSet(matching)))
    }
}

/// Predicate from a plain per-element function.
pub fn from_fn<F>(test: F) -> ElementPredicate
where
    F: Fn(ElementRef<'_>) -> bool + Send + Sync + 'static,
{
    ElementPredicate::new(FromFn(Arc::new(test)))
}

#[derive(Clone)]
struct FromFn(Arc<dyn Fn(ElementRef<'_>) -> bool + Send + Sync>);

impl CompiledPredicate for FromFn {
    fn test(&self, element: ElementRef<'_>) -> bool {
        (*self.0)(element)
    }
}

impl PredicateFactory for FromFn {
    fn prepare<'t>(
        &self,
        _root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        Ok(Box::new(self.clone()))
    }
}

/// Two-phase predicate from a closure.
///
/// `prepare` receives the root once per document and returns the
/// per-element test.
///
/// ```
/// use kilter_fmt::predicate::custom;
/// use kilter_tree::ElementRef;
///
/// // Elements sharing the root's `lang`.
/// let same_lang = custom(|root: ElementRef<'_>| {
///     let lang = root.attribute("lang").map(str::to_string);
///     Ok(move |e: ElementRef<'_>| e.attribute("lang").map(str::to_string) == lang)
/// });
/// # let _ = same_lang;
/// ```
pub fn custom<F, T>(prepare: F) -> ElementPredicate
where
    F: Fn(ElementRef<'_>) -> Result<T, PredicateError> + Send + Sync + 'static,
    T: Fn(ElementRef<'_>) -> bool + 'static,
{
    ElementPredicate::new(Custom {
        prepare,
        _test: PhantomData,
    })
}

struct Custom<F, T> {
    prepare: F,
    _test: PhantomData<fn() -> T>,
}

struct CustomCompiled<T>(T);

impl<T: Fn(ElementRef<'_>) -> bool> CompiledPredicate for CustomCompiled<T> {
    fn test(&self, element: ElementRef<'_>) -> bool {
        (self.0)(element)
    }
}

impl<F, T> PredicateFactory for Custom<F, T>
where
    F: Fn(ElementRef<'_>) -> Result<T, PredicateError> + Send + Sync,
    T: Fn(ElementRef<'_>) -> bool + 'static,
{
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        let test = (self.prepare)(root)?;
        Ok(Box::new(CustomCompiled(test)))
    }
}

/// Matches when any part matches. Testing stops at the first match.
pub fn any_of(parts: impl IntoIterator<Item = ElementPredicate>) -> ElementPredicate {
    ElementPredicate::new(AnyOf(parts.into_iter().collect()))
}

/// Matches when every part matches. Testing stops at the first miss.
pub fn all_of(parts: impl IntoIterator<Item = ElementPredicate>) -> ElementPredicate {
    ElementPredicate::new(AllOf(parts.into_iter().collect()))
}

pub fn not_matching(predicate: ElementPredicate) -> ElementPredicate {
    ElementPredicate::new(NotMatching(predicate))
}

struct AnyOf(Vec<ElementPredicate>);
struct AllOf(Vec<ElementPredicate>);
struct NotMatching(ElementPredicate);

struct AnyOfCompiled<'t>(Vec<Box<dyn CompiledPredicate + 't>>);
struct AllOfCompiled<'t>(Vec<Box<dyn CompiledPredicate + 't>>);
struct NotCompiled<'t>(Box<dyn CompiledPredicate + 't>);

impl PredicateFactory for AnyOf {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        Ok(Box::new(AnyOfCompiled(prepare_all(&self.0, root)?)))
    }
}

impl PredicateFactory for AllOf {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        Ok(Box::new(AllOfCompiled(prepare_all(&self.0, root)?)))
    }
}

impl PredicateFactory for NotMatching {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        Ok(Box::new(NotCompiled(self.0.prepare(root)?)))
    }
}

impl CompiledPredicate for AnyOfCompiled<'_> {
    fn test(&self, element: ElementRef<'_>) -> bool {
        self.0.iter().any(|p| p.test(element))
    }
}

impl CompiledPredicate for AllOfCompiled<'_> {
    fn test(&self, element: ElementRef<'_>) -> bool {
        self.0.iter().all(|p| p.test(element))
    }
}

impl CompiledPredicate for NotCompiled<'_> {
    fn test(&self, element: ElementRef<'_>) -> bool {
        !self.0.test(element)
    }
}
