//! Attribute predicates: tests over `(element, name, value)`.

use std::fmt;
use std::sync::Arc;

use kilter_tree::ElementRef;

use super::{CompiledPredicate, ElementPredicate};
use crate::error::PredicateError;

/// Per-attribute test produced by [`AttributePredicateFactory::prepare`].
pub trait CompiledAttributePredicate {
    fn test(&self, element: ElementRef<'_>, name: &str, value: &str) -> bool;
}

/// Builds a [`CompiledAttributePredicate`] for one document.
pub trait AttributePredicateFactory: Send + Sync {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledAttributePredicate + 't>, PredicateError>;
}

/// Shareable attribute predicate factory.
#[derive(Clone)]
pub struct AttributePredicate(Arc<dyn AttributePredicateFactory>);

impl AttributePredicate {
    pub fn new(factory: impl AttributePredicateFactory + 'static) -> Self {
        AttributePredicate(Arc::new(factory))
    }

    /// Matches nothing.
    pub fn never() -> Self {
        AttributePredicate::new(Never)
    }

    #[must_use]
    pub fn or(self, other: AttributePredicate) -> Self {
        AttributePredicate::new(AnyOf(vec![self, other]))
    }

    pub fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledAttributePredicate + 't>, PredicateError> {
        self.0.prepare(root)
    }
}

impl fmt::Debug for AttributePredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AttributePredicate")
    }
}

/// String matcher for attribute names and values.
#[derive(Clone)]
pub enum Matcher {
    Any,
    Exact(String),
    Prefix(String),
    Custom(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn exact(s: impl Into<String>) -> Self {
        Matcher::Exact(s.into())
    }

    pub fn prefix(s: impl Into<String>) -> Self {
        Matcher::Prefix(s.into())
    }

    pub fn custom(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Custom(Arc::new(f))
    }

    pub fn matches(&self, s: &str) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Exact(expected) => s == expected,
            Matcher::Prefix(prefix) => s.starts_with(prefix.as_str()),
            Matcher::Custom(f) => (**f)(s),
        }
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Matcher::Exact(s.to_string())
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Matcher::Exact(s)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Any => f.write_str("Any"),
            Matcher::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            Matcher::Prefix(s) => f.debug_tuple("Prefix").field(s).finish(),
            Matcher::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Attributes on any element whose name and value match.
pub fn attribute_matches(name: impl Into<Matcher>, value: impl Into<Matcher>) -> AttributePredicate {
    AttributePredicate::new(AttributeMatch {
        element: None,
        name: name.into(),
        value: value.into(),
    })
}

/// Attributes called `name`, any value.
pub fn attribute_named(name: impl Into<Matcher>) -> AttributePredicate {
    attribute_matches(name, Matcher::Any)
}

pub(super) fn on_elements(element: ElementPredicate, name: Matcher, value: Matcher) -> AttributePredicate {
    AttributePredicate::new(AttributeMatch {
        element: Some(element),
        name,
        value,
    })
}

struct AttributeMatch {
    element: Option<ElementPredicate>,
    name: Matcher,
    value: Matcher,
}

struct AttributeMatchCompiled<'t> {
    element: Option<Box<dyn CompiledPredicate + 't>>,
    name: Matcher,
    value: Matcher,
}

impl AttributePredicateFactory for AttributeMatch {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledAttributePredicate + 't>, PredicateError> {
        let element = self
            .element
            .as_ref()
            .map(|p| p.prepare(root))
            .transpose()?;
        Ok(Box::new(AttributeMatchCompiled {
            element,
            name: self.name.clone(),
            value: self.value.clone(),
        }))
    }
}

impl CompiledAttributePredicate for AttributeMatchCompiled<'_> {
    fn test(&self, element: ElementRef<'_>, name: &str, value: &str) -> bool {
        self.name.matches(name)
            && self.value.matches(value)
            && self.element.as_ref().map_or(true, |p| p.test(element))
    }
}

struct Never;

impl AttributePredicateFactory for Never {
    fn prepare<'t>(
        &self,
        _root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledAttributePredicate + 't>, PredicateError> {
        Ok(Box::new(Never))
    }
}

impl CompiledAttributePredicate for Never {
    fn test(&self, _element: ElementRef<'_>, _name: &str, _value: &str) -> bool {
        false
    }
}

struct AnyOf(Vec<AttributePredicate>);

struct AnyOfCompiled<'t>(Vec<Box<dyn CompiledAttributePredicate + 't>>);

impl AttributePredicateFactory for AnyOf {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledAttributePredicate + 't>, PredicateError> {
        let parts = self
            .0
            .iter()
            .map(|p| p.prepare(root))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(AnyOfCompiled(parts)))
    }
}

impl CompiledAttributePredicate for AnyOfCompiled<'_> {
    fn test(&self, element: ElementRef<'_>, name: &str, value: &str) -> bool {
        self.0.iter().any(|p| p.test(element, name, value))
    }
}
