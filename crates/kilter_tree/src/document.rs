//! Whole documents: the root element and what surrounds it.

use crate::{Comment, Element, ProcessingInstruction};

/// Items allowed outside the root element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Misc {
    /// Full DOCTYPE declaration as written, e.g. `<!DOCTYPE html>`.
    Doctype(String),
    Comment(Comment),
    ProcessingInstruction(ProcessingInstruction),
}

/// A parsed document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Full XML declaration as written, e.g. `<?xml version="1.0"?>`.
    pub xml_declaration: Option<String>,
    /// Items between the declaration and the root, in source order.
    pub prolog: Vec<Misc>,
    pub root: Element,
    /// Items after the root, in source order.
    pub epilog: Vec<Misc>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Document {
            xml_declaration: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_xml_declaration(mut self, declaration: impl Into<String>) -> Self {
        self.xml_declaration = Some(declaration.into());
        self
    }

    #[must_use]
    pub fn with_doctype(mut self, doctype: impl Into<String>) -> Self {
        self.prolog.push(Misc::Doctype(doctype.into()));
        self
    }

    /// The first DOCTYPE in the prolog.
    pub fn doctype(&self) -> Option<&str> {
        self.prolog.iter().find_map(|item| match item {
            Misc::Doctype(d) => Some(d.as_str()),
            _ => None,
        })
    }
}
