//! Whole-document output: declaration, prolog, root and epilog.

use kilter_tree::{Document, Misc};

use crate::config::FormatConfig;
use crate::emitter::{Emitter, StringEmitter};
use crate::error::FormatError;
use crate::escape::Validator;
use crate::layout::{comment_markup, processing_instruction_markup, render_element};


/// Render `document`.
///
/// The declaration and every prolog item end with a newline; epilog items
/// start on a new line. A DOCTYPE override replaces the document's DOCTYPE
/// in place, or comes right after the declaration when there is none.
pub(crate) fn render_document(
    document: &Document,
    config: &FormatConfig,
) -> Result<String, FormatError> {
    let validator = Validator::new(config.escape_mode);
    let mut out = StringEmitter::new();

    let declaration = config
        .xml_declaration
        .as_deref()
        .or(document.xml_declaration.as_deref());
    if let Some(declaration) = declaration {
        out.emit(declaration);
        out.emit_newline();
    }

    let doctype_override = config.doctype_override.as_deref();
    if let (Some(doctype), None) = (doctype_override, document.doctype()) {
        out.emit(doctype);
        out.emit_newline();
    }

    for item in &document.prolog {
        out.emit(&misc_markup(item, doctype_override, validator)?);
        out.emit_newline();
    }

    out.emit(&render_element(&document.root, config)?);

    for item in &document.epilog {
        out.emit_newline();
        out.emit(&misc_markup(item, doctype_override, validator)?);
    }

    if config.trailing_newline {
        out.ensure_trailing_newline();
    }
    Ok(out.output())
}

fn misc_markup(
    item: &Misc,
    doctype_override: Option<&str>,
    validator: Validator,
) -> Result<String, FormatError> {
    Ok(match item {
        Misc::Doctype(doctype) => doctype_override.unwrap_or(doctype).to_string(),
        Misc::Comment(comment) => {
            validator.comment(&comment.content)?;
            comment_markup(&comment.content)
        }
        Misc::ProcessingInstruction(pi) => {
            validator.processing_instruction(&pi.target, &pi.content)?;
            processing_instruction_markup(pi)
        }
    })
}
