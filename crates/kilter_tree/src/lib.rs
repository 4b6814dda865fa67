//! Kilter Tree - markup node model
//!
//! This crate holds the data the formatter consumes:
//! - [`Node`]: closed sum of element, text, comment, processing-instruction
//!   and CDATA nodes
//! - [`Attributes`]: ordered, name-unique attribute list
//! - [`Document`]: a root element plus declaration, DOCTYPE, prolog and epilog
//! - [`Tree`]: read-only indexed view over an element, used for classification
//!   and layout
//!
//! # Text and tail
//!
//! Text children are kept as explicit [`Node::Text`] nodes in the owned tree.
//! The [`Tree`] view folds them into the lxml-style text/tail model: text
//! before an element's first non-text child becomes the element's *text*,
//! text after a non-text child is appended to that child's *tail*.
//!
//! ```text
//! <p>lead <b>bold</b> tail</p>
//!    ^^^^ p.text      ^^^^^ b.tail
//! ```
//!
//! CDATA sections stay structural nodes so they can be written back as
//! sections, but their content counts as character data of the parent when
//! deciding whether an element holds mixed content.

mod attributes;
mod document;
mod node;
mod node_id;
mod text;
mod view;

pub use attributes::{Attribute, Attributes};
pub use document::{Document, Misc};
pub use node::{CData, Comment, Element, Node, ProcessingInstruction, Text};
pub use node_id::NodeId;
pub use text::{is_significant_text, is_xml_whitespace, is_xml_whitespace_str};
pub use view::{ElementRef, NodeKind, NodeRef, Tree};
