//! Start-tag attributes: ordering, value hooks, minimization and wrapping.

use kilter_tree::ElementRef;

use super::Renderer;
use crate::classify::NodeClass;
use crate::config::WrapPolicy;
use crate::error::FormatError;
use crate::escape::quote_attribute;
use crate::formatters::reorder;

impl Renderer<'_, '_> {
    /// Write the attributes after `<name`. Returns whether they were wrapped
    /// one per line, in which case the cursor sits on a fresh line at the
    /// element's level. `self_closing` elements end in ` />` rather than `>`.
    pub(super) fn attributes(
        &mut self,
        element: ElementRef<'_>,
        class: &NodeClass,
        self_closing: bool,
    ) -> Result<bool, FormatError> {
        let attributes = element.attributes();
        if attributes.is_empty() {
            return Ok(false);
        }

        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        let order = match class.reorderer {
            Some(index) => {
                let reorderer = &self.config.reorderers[index].1;
                reorder(&names, &(**reorderer)(&names))
            }
            None => (0..names.len()).collect(),
        };

        let level = class.level;
        let wrapped = class.wrap_attributes
            && match self.config.wrap_policy {
                WrapPolicy::Always => true,
                WrapPolicy::MoreThan(n) => order.len() > n,
                WrapPolicy::LineWidth(limit) => {
                    let fragments = self.fragments(element, &order, level)?;
                    let close = if self_closing { " />" } else { ">" };
                    single_line_end(self.ctx.column(), &fragments, close) > limit
                }
            };

        if wrapped {
            for fragment in self.fragments(element, &order, level + 1)? {
                self.ctx.emit_newline_indent(level + 1);
                self.ctx.emit(&fragment);
            }
            self.ctx.emit_newline_indent(level);
        } else {
            for fragment in self.fragments(element, &order, level)? {
                self.ctx.emit_space();
                self.ctx.emit(&fragment);
            }
        }
        Ok(wrapped)
    }

    /// `name="value"` strings in output order. `level` is the level of the
    /// line the attribute lands on.
    fn fragments(
        &self,
        element: ElementRef<'_>,
        order: &[usize],
        level: usize,
    ) -> Result<Vec<String>, FormatError> {
        let attributes = element.attributes().as_slice();
        order
            .iter()
            .map(|&i| {
                let attribute = &attributes[i];
                let name = attribute.name.as_str();
                let label = format!("attribute `{name}` of `{}`", element.name());
                self.validator.name(&label, "attribute name", name)?;
                if self.classes.minimize(element, name, &attribute.value) {
                    return Ok(name.to_string());
                }
                let formatter = self
                    .classes
                    .attribute_formatter(element, name, &attribute.value)
                    .map(|index| &self.config.attribute_formatters[index].1);
                let value = match formatter {
                    Some(formatter) => (**formatter)(&attribute.value, self.config, level),
                    None => attribute.value.clone(),
                };
                self.validator.chars(&label, &value)?;
                Ok(format!("{name}={}", quote_attribute(&value, self.config.escape_mode)))
            })
            .collect()
    }
}

/// Column just past `close` if every fragment followed `<name` on one line.
/// A multi-line fragment ends the measurement at its first newline.
fn single_line_end(column: usize, fragments: &[String], close: &str) -> usize {
    let mut end = column;
    for fragment in fragments {
        end += 1;
        if let Some((first, _)) = fragment.split_once('\n') {
            return end + first.chars().count();
        }
        end += fragment.chars().count();
    }
    end + close.len()
}
