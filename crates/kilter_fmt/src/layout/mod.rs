//! Layout engine: one depth-first pass over the classified tree.
//!
//! Newlines and indentation come from the whitespace transforms of the
//! surrounding text and tails; this pass writes tags, attributes and the
//! transformed strings in order.

mod attributes;


use kilter_stack::ensure_sufficient_stack;
use kilter_tree::{
    CData, Comment, Element, ElementRef, NodeKind, NodeRef, ProcessingInstruction, Tree,
};

use crate::classify::{classify, Classification};
use crate::config::{EmptyElementStyle, FormatConfig};
use crate::context::RenderContext;
use crate::error::FormatError;
use crate::escape::{escape_text, Validator};
use crate::whitespace::{element_text, tail_text};

/// Classify and render one element tree.
pub(crate) fn render_element(root: &Element, config: &FormatConfig) -> Result<String, FormatError> {
    let tree = ensure_sufficient_stack(|| Tree::new(root));
    let classes = classify(&tree, config)?;
    Renderer::new(&classes, config).render(tree.root())
}

pub(crate) struct Renderer<'r, 't> {
    classes: &'r Classification<'t>,
    config: &'r FormatConfig,
    validator: Validator,
    ctx: RenderContext<'r>,
}

impl<'r, 't> Renderer<'r, 't> {
    pub(crate) fn new(classes: &'r Classification<'t>, config: &'r FormatConfig) -> Self {
        Renderer {
            classes,
            config,
            validator: Validator::new(config.escape_mode),
            ctx: RenderContext::new(&config.indent_unit),
        }
    }

    /// Render `root` and return the output. The root's tail is not part of
    /// the element.
    pub(crate) fn render(mut self, root: ElementRef<'_>) -> Result<String, FormatError> {
        self.element(root)?;
        Ok(self.ctx.into_emitter().output())
    }

    fn node(&mut self, node: NodeRef<'_>) -> Result<(), FormatError> {
        match node.kind() {
            NodeKind::Element(_) => {
                if let Some(element) = node.as_element() {
                    self.element(element)?;
                }
            }
            NodeKind::Comment(comment) => self.comment(comment)?,
            NodeKind::ProcessingInstruction(pi) => self.processing_instruction(pi)?,
            NodeKind::CData(cdata) => self.cdata(cdata)?,
        }
        self.tail(node)
    }

    fn element(&mut self, element: ElementRef<'_>) -> Result<(), FormatError> {
        let class = self.classes.class(element.id());
        let name = element.name();
        let label = format!("element `{name}`");
        self.validator.name(&label, "element name", name)?;

        let node = element.as_node();
        let first_child = node.first_child().map(|c| self.classes.class(c.id()));
        let mut text = element_text(
            element.text().unwrap_or(""),
            &class,
            first_child.as_ref(),
            &self.config.indent_unit,
        );
        if let Some(index) = class.text_formatter {
            let formatter = &self.config.text_formatters[index].1;
            text = (**formatter)(&text, self.config, class.level);
        }
        self.validator.chars(&label, &text)?;

        let empty = text.is_empty() && !node.has_children();
        let self_closing =
            empty && !class.void && self.config.empty_elements == EmptyElementStyle::SelfClosing;

        self.ctx.emit("<");
        self.ctx.emit(name);
        let wrapped = self.attributes(element, &class, self_closing)?;

        if empty {
            if class.void {
                self.ctx.emit(">");
                return Ok(());
            }
            match self.config.empty_elements {
                EmptyElementStyle::SelfClosing => {
                    if !wrapped {
                        self.ctx.emit_space();
                    }
                    self.ctx.emit("/>");
                }
                EmptyElementStyle::ExplicitTags => {
                    self.ctx.emit("></");
                    self.ctx.emit(name);
                    self.ctx.emit(">");
                }
            }
            return Ok(());
        }

        self.ctx.emit(">");
        self.ctx.emit(&escape_text(&text));
        for child in node.children() {
            ensure_sufficient_stack(|| self.node(child))?;
        }
        self.ctx.emit("</");
        self.ctx.emit(name);
        self.ctx.emit(">");
        Ok(())
    }

    fn comment(&mut self, comment: &Comment) -> Result<(), FormatError> {
        self.validator.comment(&comment.content)?;
        self.ctx.emit(&comment_markup(&comment.content));
        Ok(())
    }

    fn cdata(&mut self, cdata: &CData) -> Result<(), FormatError> {
        self.validator.cdata(&cdata.content)?;
        if self.config.preserve_cdata {
            self.ctx.emit(&cdata_markup(&cdata.content));
        } else {
            self.ctx.emit(&escape_text(&cdata.content));
        }
        Ok(())
    }

    fn processing_instruction(&mut self, pi: &ProcessingInstruction) -> Result<(), FormatError> {
        self.validator.processing_instruction(&pi.target, &pi.content)?;
        self.ctx.emit(&processing_instruction_markup(pi));
        Ok(())
    }

    fn tail(&mut self, node: NodeRef<'_>) -> Result<(), FormatError> {
        let Some(parent) = node.parent() else {
            return Ok(());
        };
        let next = node.next_sibling().map(|n| self.classes.class(n.id()));
        let tail = tail_text(
            node.tail().unwrap_or(""),
            &self.classes.class(node.id()),
            &self.classes.class(parent.id()),
            next.as_ref(),
            &self.config.indent_unit,
        );
        if tail.is_empty() {
            return Ok(());
        }
        self.validator.chars("text", &tail)?;
        self.ctx.emit(&escape_text(&tail));
        Ok(())
    }
}

/// `<!--content-->`, padded so a leading or trailing `-` cannot fuse with
/// the delimiters.
pub(crate) fn comment_markup(content: &str) -> String {
    let lead = if content.starts_with('-') { " " } else { "" };
    let trail = if content.ends_with('-') { " " } else { "" };
    format!("<!--{lead}{content}{trail}-->")
}

/// `<![CDATA[content]]>`. Each `]]>` in the content ends the section after
/// its `]]` and continues with an escaped `>`.
pub(crate) fn cdata_markup(content: &str) -> String {
    if content.is_empty() {
        return "<![CDATA[]]>".to_string();
    }
    let parts: Vec<&str> = content.split("]]>").collect();
    let mut out = String::with_capacity(content.len() + 16 * parts.len());
    if let Some((last, init)) = parts.split_last() {
        for part in init {
            if part.is_empty() {
                out.push_str("]]&gt;");
            } else {
                out.push_str("<![CDATA[");
                out.push_str(part);
                out.push_str("]]]]>&gt;");
            }
        }
        if !last.is_empty() {
            out.push_str("<![CDATA[");
            out.push_str(last);
            out.push_str("]]>");
        }
    }
    out
}

pub(crate) fn processing_instruction_markup(pi: &ProcessingInstruction) -> String {
    if pi.content.is_empty() {
        format!("<?{}?>", pi.target)
    } else {
        format!("<?{} {}?>", pi.target, pi.content)
    }
}
