//! Read-only indexed view over an element tree.
//!
//! [`Tree::new`] walks the owned tree once and assigns every element, comment,
//! processing instruction and CDATA section a [`NodeId`] in document order.
//! Text nodes are folded into the text/tail slots of their neighbours, so the
//! view only holds structural nodes.
//!
//! Whether an element holds significant character data is settled while
//! indexing, so mixed-content checks are constant time.
//!
//! Subtrees are contiguous id ranges: the descendants of `n` are exactly the
//! ids in `n + 1 .. subtree_end(n)`. Whole-tree analyses can therefore use flat
//! `Vec`s indexed by [`NodeId::index`] instead of maps.

use std::borrow::Cow;
use std::fmt;

use kilter_stack::ensure_sufficient_stack;

use crate::text::is_significant_text;
use crate::{Attributes, CData, Comment, Element, Node, NodeId, ProcessingInstruction};


/// What a structural node is, borrowed from the owned tree.
#[derive(Copy, Clone, Debug)]
pub enum NodeKind<'a> {
    Element(&'a Element),
    Comment(&'a Comment),
    ProcessingInstruction(&'a ProcessingInstruction),
    CData(&'a CData),
}

struct Entry<'a> {
    kind: NodeKind<'a>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position inside `parent.children`.
    position: u32,
    /// Exclusive end of this node's id range.
    subtree_end: u32,
    /// Text before the first structural child (elements only).
    text: Option<Cow<'a, str>>,
    /// Own tail plus any text nodes that follow it.
    tail: Option<Cow<'a, str>>,
    /// Text, a child's tail or a CDATA child holds non-whitespace.
    significant_text: bool,
}

/// Indexed view over a borrowed element tree.
pub struct Tree<'a> {
    root: &'a Element,
    entries: Vec<Entry<'a>>,
}

impl<'a> Tree<'a> {
    /// Index `root` and everything below it.
    pub fn new(root: &'a Element) -> Self {
        let mut tree = Tree {
            root,
            entries: Vec::new(),
        };
        tree.index_element(root, None, 0);
        tree
    }

    fn index_element(&mut self, element: &'a Element, parent: Option<NodeId>, position: u32) -> NodeId {
        let id = self.push_entry(
            NodeKind::Element(element),
            parent,
            position,
            element.tail.as_deref(),
        );

        let mut last: Option<NodeId> = None;
        for child in &element.children {
            let position = to_u32(self.entries[id.index()].children.len());
            let child_id = match child {
                Node::Text(text) => {
                    let slot = match last {
                        Some(prev) => &mut self.entries[prev.index()].tail,
                        None => &mut self.entries[id.index()].text,
                    };
                    append(slot, &text.content);
                    continue;
                }
                Node::Element(child) => {
                    ensure_sufficient_stack(|| self.index_element(child, Some(id), position))
                }
                Node::Comment(comment) => self.push_entry(
                    NodeKind::Comment(comment),
                    Some(id),
                    position,
                    comment.tail.as_deref(),
                ),
                Node::ProcessingInstruction(pi) => self.push_entry(
                    NodeKind::ProcessingInstruction(pi),
                    Some(id),
                    position,
                    pi.tail.as_deref(),
                ),
                Node::CData(cdata) => self.push_entry(
                    NodeKind::CData(cdata),
                    Some(id),
                    position,
                    cdata.tail.as_deref(),
                ),
            };
            self.entries[id.index()].children.push(child_id);
            last = Some(child_id);
        }

        let significant = self.holds_significant_text(id);
        let subtree_end = to_u32(self.entries.len());
        let entry = &mut self.entries[id.index()];
        entry.significant_text = significant;
        entry.subtree_end = subtree_end;
        id
    }

    fn holds_significant_text(&self, id: NodeId) -> bool {
        let entry = &self.entries[id.index()];
        is_significant_text(entry.text.as_deref())
            || entry.children.iter().any(|&c| {
                let child = &self.entries[c.index()];
                let cdata = match child.kind {
                    NodeKind::CData(cdata) => Some(cdata.content.as_str()),
                    _ => None,
                };
                is_significant_text(child.tail.as_deref()) || is_significant_text(cdata)
            })
    }

    fn push_entry(
        &mut self,
        kind: NodeKind<'a>,
        parent: Option<NodeId>,
        position: u32,
        tail: Option<&'a str>,
    ) -> NodeId {
        let id = NodeId::new(to_u32(self.entries.len()));
        self.entries.push(Entry {
            kind,
            parent,
            children: Vec::new(),
            position,
            subtree_end: id.raw() + 1,
            text: None,
            tail: tail.map(Cow::Borrowed),
            significant_text: false,
        });
        id
    }

    /// The root element.
    pub fn root<'s>(&'s self) -> ElementRef<'s> {
        let tree: &'s Tree<'s> = self;
        ElementRef {
            node: NodeRef {
                tree,
                id: NodeId::ROOT,
            },
            element: self.root,
        }
    }

    /// Number of structural nodes (elements, comments, PIs, CDATA sections).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get<'s>(&'s self, id: NodeId) -> Option<NodeRef<'s>> {
        let tree: &'s Tree<'s> = self;
        (id.index() < self.entries.len()).then_some(NodeRef { tree, id })
    }

    pub fn element<'s>(&'s self, id: NodeId) -> Option<ElementRef<'s>> {
        self.get(id).and_then(NodeRef::as_element)
    }

    /// All structural nodes in document order.
    pub fn nodes<'s>(&'s self) -> impl Iterator<Item = NodeRef<'s>> + 's {
        let tree: &'s Tree<'s> = self;
        (0..to_u32(tree.entries.len())).map(move |i| NodeRef {
            tree,
            id: NodeId::new(i),
        })
    }

    /// All elements in document order.
    pub fn elements<'s>(&'s self) -> impl Iterator<Item = ElementRef<'s>> + 's {
        self.nodes().filter_map(NodeRef::as_element)
    }
}

impl fmt::Debug for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root.name)
            .field("nodes", &self.entries.len())
            .finish()
    }
}

// Trees with more than u32::MAX nodes are unsupported.
#[allow(clippy::cast_possible_truncation)]
fn to_u32(n: usize) -> u32 {
    n as u32
}

fn append<'a>(slot: &mut Option<Cow<'a, str>>, text: &'a str) {
    match slot {
        None => *slot = Some(Cow::Borrowed(text)),
        Some(existing) => existing.to_mut().push_str(text),
    }
}

/// Handle to any structural node in a [`Tree`].
#[derive(Copy, Clone)]
pub struct NodeRef<'t> {
    tree: &'t Tree<'t>,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    fn entry(self) -> &'t Entry<'t> {
        &self.tree.entries[self.id.index()]
    }

    fn at(self, id: NodeId) -> NodeRef<'t> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }

    #[inline]
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> NodeKind<'t> {
        self.entry().kind
    }

    pub fn is_element(self) -> bool {
        matches!(self.kind(), NodeKind::Element(_))
    }

    pub fn as_element(self) -> Option<ElementRef<'t>> {
        match self.kind() {
            NodeKind::Element(element) => Some(ElementRef {
                node: self,
                element,
            }),
            NodeKind::Comment(_) | NodeKind::ProcessingInstruction(_) | NodeKind::CData(_) => None,
        }
    }

    pub fn parent(self) -> Option<ElementRef<'t>> {
        self.entry()
            .parent
            .and_then(|p| self.at(p).as_element())
    }

    /// Structural children in order. Only elements have any.
    pub fn children(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.entry().children.iter().map(move |&c| self.at(c))
    }

    pub fn first_child(self) -> Option<NodeRef<'t>> {
        self.entry().children.first().map(|&c| self.at(c))
    }

    pub fn has_children(self) -> bool {
        !self.entry().children.is_empty()
    }

    /// Position among the parent's structural children (0 for the root).
    pub fn position(self) -> usize {
        self.entry().position as usize
    }

    pub fn next_sibling(self) -> Option<NodeRef<'t>> {
        let parent = self.entry().parent?;
        let siblings = &self.tree.entries[parent.index()].children;
        siblings.get(self.position() + 1).map(|&s| self.at(s))
    }

    pub fn previous_sibling(self) -> Option<NodeRef<'t>> {
        let parent = self.entry().parent?;
        let index = self.position().checked_sub(1)?;
        let siblings = &self.tree.entries[parent.index()].children;
        siblings.get(index).map(|&s| self.at(s))
    }

    /// Every structural child of the parent, including `self`.
    pub fn siblings(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let ids: &'t [NodeId] = match self.entry().parent {
            Some(p) => &self.tree.entries[p.index()].children,
            None => &[],
        };
        let lone_root = self.entry().parent.is_none().then_some(self);
        ids.iter().map(move |&s| self.at(s)).chain(lone_root)
    }

    /// Descendants in document order, excluding `self`.
    pub fn descendants(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let end = self.entry().subtree_end;
        (self.id.raw() + 1..end).map(move |i| self.at(NodeId::new(i)))
    }

    /// Proper ancestors, nearest first.
    pub fn ancestors(self) -> impl Iterator<Item = ElementRef<'t>> + 't {
        std::iter::successors(self.parent(), |p| p.parent())
    }

    /// Leading text of an element. Always `None` for other nodes.
    pub fn text(self) -> Option<&'t str> {
        self.entry().text.as_deref()
    }

    pub fn tail(self) -> Option<&'t str> {
        self.entry().tail.as_deref()
    }

    /// True when the element's own text, any child's tail or any CDATA child
    /// holds non-whitespace characters.
    pub fn has_direct_significant_text(self) -> bool {
        self.entry().significant_text
    }

    /// True when the parent has direct significant text.
    pub fn is_in_mixed_content(self) -> bool {
        self.parent()
            .is_some_and(|p| p.as_node().has_direct_significant_text())
    }

    /// Number of ancestors.
    pub fn depth(self) -> usize {
        self.ancestors().count()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Element(e) => write!(f, "<{}>@{}", e.name, self.id.raw()),
            NodeKind::Comment(_) => write!(f, "<!--…-->@{}", self.id.raw()),
            NodeKind::ProcessingInstruction(p) => write!(f, "<?{}?>@{}", p.target, self.id.raw()),
            NodeKind::CData(_) => write!(f, "<![CDATA[…]]>@{}", self.id.raw()),
        }
    }
}

/// Handle to an element in a [`Tree`].
///
/// This is what predicates and formatters see.
#[derive(Copy, Clone)]
pub struct ElementRef<'t> {
    node: NodeRef<'t>,
    element: &'t Element,
}

impl<'t> ElementRef<'t> {
    #[inline]
    pub fn id(self) -> NodeId {
        self.node.id
    }

    pub fn as_node(self) -> NodeRef<'t> {
        self.node
    }

    /// The owned element this handle points at.
    pub fn element(self) -> &'t Element {
        self.element
    }

    pub fn name(self) -> &'t str {
        &self.element.name
    }

    pub fn attributes(self) -> &'t Attributes {
        &self.element.attributes
    }

    pub fn attribute(self, name: &str) -> Option<&'t str> {
        self.element.attributes.get(name)
    }

    pub fn parent(self) -> Option<ElementRef<'t>> {
        self.node.parent()
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.node.children()
    }

    pub fn child_elements(self) -> impl Iterator<Item = ElementRef<'t>> + 't {
        self.node.children().filter_map(NodeRef::as_element)
    }

    pub fn has_child_elements(self) -> bool {
        self.child_elements().next().is_some()
    }

    pub fn next_sibling(self) -> Option<NodeRef<'t>> {
        self.node.next_sibling()
    }

    pub fn previous_sibling(self) -> Option<NodeRef<'t>> {
        self.node.previous_sibling()
    }

    /// Element descendants in document order, excluding `self`.
    pub fn descendants(self) -> impl Iterator<Item = ElementRef<'t>> + 't {
        self.node.descendants().filter_map(NodeRef::as_element)
    }

    pub fn ancestors(self) -> impl Iterator<Item = ElementRef<'t>> + 't {
        self.node.ancestors()
    }

    pub fn text(self) -> Option<&'t str> {
        self.node.text()
    }

    pub fn tail(self) -> Option<&'t str> {
        self.node.tail()
    }

    pub fn has_direct_significant_text(self) -> bool {
        self.node.has_direct_significant_text()
    }

    pub fn is_in_mixed_content(self) -> bool {
        self.node.is_in_mixed_content()
    }

    pub fn depth(self) -> usize {
        self.node.depth()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}
