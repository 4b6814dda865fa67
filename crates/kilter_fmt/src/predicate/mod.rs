//! Two-phase predicates.
//!
//! Classification rules are *factories*: [`PredicateFactory::prepare`] runs
//! once per document against the root and may do whole-tree analysis; the
//! [`CompiledPredicate`] it returns answers per-element questions cheaply.
//!
//! ```text
//! factory ──prepare(root)──▶ compiled ──test(element)──▶ bool
//! ```
//!
//! [`ElementPredicate`] is the shareable handle stored in a
//! [`FormatConfig`](crate::FormatConfig). Attribute rules use the parallel
//! [`AttributePredicate`] family, which also sees the attribute name and value.

mod attribute;
mod element;

#[cfg(test)]
mod tests;

use std::fmt;
use std::ops::Not;
use std::sync::Arc;

use kilter_tree::ElementRef;

use crate::error::PredicateError;

pub use attribute::{
    attribute_matches, attribute_named, AttributePredicate, AttributePredicateFactory,
    CompiledAttributePredicate, Matcher,
};
pub(crate) use element::validate_name;
pub use element::{
    all_of, any_element, any_of, attribute_count_between, attribute_count_max,
    attribute_count_min, attribute_equals, attribute_value_in, custom, from_fn,
    has_attribute, has_child_elements, has_class, has_no_significant_content,
    has_significant_content, in_mixed_content, never, not_matching, tag_in, tag_name, within,
};

/// Per-element test produced by [`PredicateFactory::prepare`].
pub trait CompiledPredicate {
    fn test(&self, element: ElementRef<'_>) -> bool;
}

/// Builds a [`CompiledPredicate`] for one document.
pub trait PredicateFactory: Send + Sync {
    fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError>;
}

/// Shareable element predicate factory.
#[derive(Clone)]
pub struct ElementPredicate(Arc<dyn PredicateFactory>);

impl ElementPredicate {
    pub fn new(factory: impl PredicateFactory + 'static) -> Self {
        ElementPredicate(Arc::new(factory))
    }

    /// Matches when either side matches.
    #[must_use]
    pub fn or(self, other: ElementPredicate) -> Self {
        any_of([self, other])
    }

    /// Matches when both sides match.
    #[must_use]
    pub fn and(self, other: ElementPredicate) -> Self {
        all_of([self, other])
    }

    /// Attribute predicate matching attributes of elements this predicate
    /// matches.
    pub fn with_attribute(
        self,
        name: impl Into<Matcher>,
        value: impl Into<Matcher>,
    ) -> AttributePredicate {
        attribute::on_elements(self, name.into(), value.into())
    }

    pub fn prepare<'t>(
        &self,
        root: ElementRef<'t>,
    ) -> Result<Box<dyn CompiledPredicate + 't>, PredicateError> {
        self.0.prepare(root)
    }
}

impl Not for ElementPredicate {
    type Output = ElementPredicate;

    fn not(self) -> Self::Output {
        not_matching(self)
    }
}

impl fmt::Debug for ElementPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ElementPredicate")
    }
}

/// Prepare every predicate in `parts` against `root`.
fn prepare_all<'t>(
    parts: &[ElementPredicate],
    root: ElementRef<'t>,
) -> Result<Vec<Box<dyn CompiledPredicate + 't>>, PredicateError> {
    parts.iter().map(|p| p.prepare(root)).collect()
}
