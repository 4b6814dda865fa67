//! Owned markup nodes.
//!
//! The input to every format call. Trees are built by a parser (see
//! `kilter_parse`) or by hand with the `with_*` helpers, and are never
//! mutated by the formatter.

use crate::Attributes;

/// A node in a markup tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Text),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
    CData(CData),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(Text::new(content))
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment(Comment::new(content))
    }

    pub fn processing_instruction(target: impl Into<String>, content: impl Into<String>) -> Self {
        Node::ProcessingInstruction(ProcessingInstruction::new(target, content))
    }

    pub fn cdata(content: impl Into<String>) -> Self {
        Node::CData(CData::new(content))
    }

    /// Tail text following this node. Text nodes have none.
    pub fn tail(&self) -> Option<&str> {
        match self {
            Node::Element(e) => e.tail.as_deref(),
            Node::Comment(c) => c.tail.as_deref(),
            Node::ProcessingInstruction(p) => p.tail.as_deref(),
            Node::CData(c) => c.tail.as_deref(),
            Node::Text(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl From<ProcessingInstruction> for Node {
    fn from(pi: ProcessingInstruction) -> Self {
        Node::ProcessingInstruction(pi)
    }
}

impl From<CData> for Node {
    fn from(cdata: CData) -> Self {
        Node::CData(cdata)
    }
}

/// An element with its attributes, children and tail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written, e.g. `svg:rect`.
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
    /// Text after the closing tag, inside the parent.
    pub tail: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            tail: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::text(text));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// Element children, skipping text, comments and PIs.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }
}

// Dropping is iterative so very deep trees do not exhaust the stack.
impl Drop for Element {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Element(mut element) = node {
                pending.append(&mut element.children);
            }
        }
    }
}

/// Character data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    pub content: String,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Text {
            content: content.into(),
        }
    }
}

/// `<!--content-->`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comment {
    pub content: String,
    pub tail: Option<String>,
}

impl Comment {
    pub fn new(content: impl Into<String>) -> Self {
        Comment {
            content: content.into(),
            tail: None,
        }
    }

    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }
}

/// `<?target content?>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub target: String,
    pub content: String,
    pub tail: Option<String>,
}

impl ProcessingInstruction {
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        ProcessingInstruction {
            target: target.into(),
            content: content.into(),
            tail: None,
        }
    }

    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }
}

/// `<![CDATA[content]]>`. Counts as character data of its parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CData {
    pub content: String,
    pub tail: Option<String>,
}

impl CData {
    pub fn new(content: impl Into<String>) -> Self {
        CData {
            content: content.into(),
            tail: None,
        }
    }

    #[must_use]
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }
}
