//! Per-document classification.
//!
//! Prepares every configured predicate against the root once, then assigns
//! each structural node a [`NodeClass`]: layout type, whitespace mode,
//! physical indentation level and the element-level flags the layout engine
//! needs. All passes walk the tree in document order.
//!
//! # Layout type passes
//!
//! | pass | rule |
//! |------|------|
//! | 1 | explicit block |
//! | 2 | explicit inline (block wins on conflict) |
//! | 3 | untyped node whose parent has significant text → inline |
//! | 4 | untyped child of an inline node → inline |
//! | 5 | untyped child of a block node, not in mixed content, no inline sibling → block |
//! | 6 | still untyped → configured default |
//!
//! # Whitespace passes
//!
//! | pass | rule |
//! |------|------|
//! | 1 | explicit preserve |
//! | 2 | unset descendants of a preserved node → preserve |
//! | 3 | explicit normalize, unless explicitly preserved |
//! | 4 | explicit strip, unless explicitly preserved |
//! | 5 | `xml:space="preserve"`, or strict parent without `xml:space="default"` → strict |

use kilter_tree::{ElementRef, NodeId, Tree};

use crate::config::{ElementType, FormatConfig};
use crate::error::{Category, FormatError};
use crate::predicate::{CompiledAttributePredicate, ElementPredicate};

#[cfg(test)]
mod tests;

/// How whitespace inside a node is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum WhitespaceMode {
    /// Verbatim, from a preserve rule.
    Preserve,
    /// Verbatim, from `xml:space="preserve"`.
    Strict,
    /// Normalize, then trim at the content edges.
    Strip,
    /// Collapse whitespace runs to one space.
    Normalize,
}

impl WhitespaceMode {
    pub(crate) fn is_verbatim(self) -> bool {
        matches!(self, WhitespaceMode::Preserve | WhitespaceMode::Strict)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct NodeClass {
    pub element_type: Option<ElementType>,
    pub whitespace: Option<WhitespaceMode>,
    /// Physical indentation level.
    pub level: usize,
    pub wrap_attributes: bool,
    pub void: bool,
    /// Index into the configured text formatters.
    pub text_formatter: Option<usize>,
    /// Index into the configured attribute reorderers.
    pub reorderer: Option<usize>,
}

impl NodeClass {
    pub(crate) fn is_block(&self) -> bool {
        self.element_type == Some(ElementType::Block)
    }

    pub(crate) fn is_inline(&self) -> bool {
        self.element_type == Some(ElementType::Inline)
    }
}

/// Classification of one document.
pub(crate) struct Classification<'t> {
    classes: Vec<NodeClass>,
    attribute_formatters: Vec<Box<dyn CompiledAttributePredicate + 't>>,
    minimize: Box<dyn CompiledAttributePredicate + 't>,
}

impl<'t> Classification<'t> {
    pub(crate) fn class(&self, id: NodeId) -> NodeClass {
        self.classes[id.index()]
    }

    /// Index of the first attribute formatter matching the attribute.
    pub(crate) fn attribute_formatter(
        &self,
        element: ElementRef<'_>,
        name: &str,
        value: &str,
    ) -> Option<usize> {
        self.attribute_formatters
            .iter()
            .position(|p| p.test(element, name, value))
    }

    pub(crate) fn minimize(&self, element: ElementRef<'_>, name: &str, value: &str) -> bool {
        self.minimize.test(element, name, value)
    }
}

/// Evaluate `predicate` for every node. Comments and PIs never match.
fn evaluate(
    tree: &Tree<'_>,
    predicate: &ElementPredicate,
    category: Category,
) -> Result<Vec<bool>, FormatError> {
    let compiled = predicate
        .prepare(tree.root())
        .map_err(FormatError::classification(category))?;
    Ok(tree
        .nodes()
        .map(|node| node.as_element().is_some_and(|e| compiled.test(e)))
        .collect())
}

/// Index of the first matching predicate per node.
fn first_match<T>(
    tree: &Tree<'_>,
    rules: &[(ElementPredicate, T)],
    category: Category,
) -> Result<Vec<Option<usize>>, FormatError> {
    let mut result = vec![None; tree.len()];
    for (index, (predicate, _)) in rules.iter().enumerate() {
        let matches = evaluate(tree, predicate, category)?;
        for (slot, matched) in result.iter_mut().zip(matches) {
            if matched && slot.is_none() {
                *slot = Some(index);
            }
        }
    }
    Ok(result)
}

#[tracing::instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub(crate) fn classify<'t>(
    tree: &'t Tree<'_>,
    config: &FormatConfig,
) -> Result<Classification<'t>, FormatError> {
    let types = layout_types(tree, config)?;
    let whitespace = whitespace_modes(tree, config)?;
    let levels = physical_levels(tree, &types);

    let wrap = evaluate(tree, &config.wrap_attributes, Category::WrapAttributes)?;
    let void = evaluate(tree, &config.void, Category::Void)?;
    let text_formatters = first_match(tree, &config.text_formatters, Category::TextFormatter)?;
    let reorderers = first_match(tree, &config.reorderers, Category::AttributeReorder)?;

    let classes: Vec<NodeClass> = (0..tree.len())
        .map(|i| NodeClass {
            element_type: types[i],
            whitespace: whitespace[i],
            level: levels[i],
            wrap_attributes: wrap[i],
            void: void[i],
            text_formatter: text_formatters[i],
            reorderer: reorderers[i],
        })
        .collect();

    let root = tree.root();
    let attribute_formatters = config
        .attribute_formatters
        .iter()
        .map(|(p, _)| p.prepare(root))
        .collect::<Result<Vec<_>, _>>()
        .map_err(FormatError::classification(Category::AttributeFormatter))?;
    let minimize = config
        .minimize_attributes
        .prepare(root)
        .map_err(FormatError::classification(Category::AttributeMinimize))?;

    tracing::debug!(
        block = classes.iter().filter(|c| c.is_block()).count(),
        inline = classes.iter().filter(|c| c.is_inline()).count(),
        verbatim = classes
            .iter()
            .filter(|c| c.whitespace.is_some_and(WhitespaceMode::is_verbatim))
            .count(),
        "classified"
    );

    Ok(Classification {
        classes,
        attribute_formatters,
        minimize,
    })
}

fn layout_types(
    tree: &Tree<'_>,
    config: &FormatConfig,
) -> Result<Vec<Option<ElementType>>, FormatError> {
    let block = evaluate(tree, &config.block, Category::Block)?;
    let inline = evaluate(tree, &config.inline, Category::Inline)?;
    let mut types: Vec<Option<ElementType>> = vec![None; tree.len()];

    for node in tree.nodes() {
        let i = node.id().index();
        if block[i] {
            if inline[i] {
                tracing::trace!(node = ?node, "matched block and inline rules; block wins");
            }
            types[i] = Some(ElementType::Block);
        } else if inline[i] {
            types[i] = Some(ElementType::Inline);
        }
    }

    for node in tree.nodes() {
        let i = node.id().index();
        if types[i].is_none() && node.is_in_mixed_content() {
            types[i] = Some(ElementType::Inline);
        }
    }

    for node in tree.nodes() {
        let i = node.id().index();
        if types[i].is_none()
            && node
                .parent()
                .is_some_and(|p| types[p.id().index()] == Some(ElementType::Inline))
        {
            types[i] = Some(ElementType::Inline);
        }
    }

    // Parents with at least one inline child.
    let mut has_inline_child = vec![false; tree.len()];
    for node in tree.nodes() {
        if types[node.id().index()] == Some(ElementType::Inline) {
            if let Some(parent) = node.parent() {
                has_inline_child[parent.id().index()] = true;
            }
        }
    }

    for node in tree.nodes() {
        let i = node.id().index();
        if types[i].is_some() {
            continue;
        }
        let Some(parent) = node.parent() else {
            continue;
        };
        let p = parent.id().index();
        if types[p] == Some(ElementType::Block)
            && !node.is_in_mixed_content()
            && !has_inline_child[p]
        {
            types[i] = Some(ElementType::Block);
        }
    }

    for slot in types.iter_mut().filter(|t| t.is_none()) {
        *slot = config.default_type;
    }

    Ok(types)
}

fn whitespace_modes(
    tree: &Tree<'_>,
    config: &FormatConfig,
) -> Result<Vec<Option<WhitespaceMode>>, FormatError> {
    let preserve = evaluate(tree, &config.preserve_whitespace, Category::PreserveWhitespace)?;
    let normalize = evaluate(tree, &config.normalize_whitespace, Category::NormalizeWhitespace)?;
    let strip = evaluate(tree, &config.strip_whitespace, Category::StripWhitespace)?;
    let mut modes: Vec<Option<WhitespaceMode>> = vec![None; tree.len()];

    for (mode, &explicit) in modes.iter_mut().zip(&preserve) {
        if explicit {
            *mode = Some(WhitespaceMode::Preserve);
        }
    }

    for node in tree.nodes() {
        let i = node.id().index();
        if modes[i].is_none()
            && node
                .parent()
                .is_some_and(|p| modes[p.id().index()] == Some(WhitespaceMode::Preserve))
        {
            modes[i] = Some(WhitespaceMode::Preserve);
        }
    }

    for i in 0..tree.len() {
        if preserve[i] {
            continue;
        }
        if strip[i] {
            modes[i] = Some(WhitespaceMode::Strip);
        } else if normalize[i] {
            modes[i] = Some(WhitespaceMode::Normalize);
        }
    }

    for node in tree.nodes() {
        let i = node.id().index();
        let xml_space = node.as_element().and_then(|e| e.attribute("xml:space"));
        let parent_strict = node
            .parent()
            .is_some_and(|p| modes[p.id().index()] == Some(WhitespaceMode::Strict));
        if xml_space == Some("preserve") || (parent_strict && xml_space != Some("default")) {
            modes[i] = Some(WhitespaceMode::Strict);
        }
    }

    Ok(modes)
}

/// Root at 0; children of block nodes one deeper, others at the parent's level.
fn physical_levels(tree: &Tree<'_>, types: &[Option<ElementType>]) -> Vec<usize> {
    let mut levels = vec![0; tree.len()];
    for node in tree.nodes() {
        if let Some(parent) = node.parent() {
            let p = parent.id().index();
            levels[node.id().index()] = match types[p] {
                Some(ElementType::Block) => levels[p] + 1,
                Some(ElementType::Inline) | None => levels[p],
            };
        }
    }
    levels
}
