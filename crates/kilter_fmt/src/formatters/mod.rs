//! Ready-made value formatters and attribute reorderers.
//!
//! ```
//! use kilter_fmt::{formatters, FormatConfig};
//!
//! let config = FormatConfig::builder()
//!     .attribute_formatter("style", formatters::wrap_css_properties(1))
//!     .reorder_attributes_when(
//!         kilter_fmt::predicate::any_element(),
//!         formatters::priority_order(["id", "class"]),
//!     )
//!     .build()
//!     .unwrap();
//! # let _ = config;
//! ```

use crate::config::FormatConfig;


/// Put each CSS declaration of a `style` value on its own line once there
/// are more than `when_more_than` of them.
///
/// Declarations are indented one level below the attribute line and the
/// closing quote lines up with the attribute. Empty declarations are
/// dropped; values at or under the threshold are returned unchanged.
pub fn wrap_css_properties(
    when_more_than: usize,
) -> impl Fn(&str, &FormatConfig, usize) -> String + Send + Sync + Clone + 'static {
    move |value, config, level| {
        let properties: Vec<&str> = value
            .split(';')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if properties.len() <= when_more_than {
            return value.to_string();
        }
        let inner = format!("\n{}", config.indent(level + 1));
        let mut out = inner.clone();
        out.push_str(&properties.join(&format!(";{inner}")));
        out.push('\n');
        out.push_str(&config.indent(level));
        out
    }
}

/// Attribute names in ascending byte order.
pub fn sort_alphabetically() -> impl Fn(&[&str]) -> Vec<String> + Send + Sync + Clone + 'static {
    |names| {
        let mut sorted: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
        sorted.sort();
        sorted
    }
}

/// The listed names first, in the listed order; the rest keep their order.
pub fn priority_order<I, S>(
    priority: I,
) -> impl Fn(&[&str]) -> Vec<String> + Send + Sync + Clone + 'static
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let priority: Vec<String> = priority.into_iter().map(Into::into).collect();
    move |names| {
        priority
            .iter()
            .filter(|p| names.contains(&p.as_str()))
            .cloned()
            .collect()
    }
}

/// Apply a reorderer's answer: returned names first (existing ones, first
/// occurrence), then every remaining index in original order.
pub(crate) fn reorder(names: &[&str], chosen: &[String]) -> Vec<usize> {
    let mut order = Vec::with_capacity(names.len());
    let mut taken = vec![false; names.len()];
    for name in chosen {
        if let Some(i) = names.iter().position(|n| n == name) {
            if !taken[i] {
                taken[i] = true;
                order.push(i);
            }
        }
    }
    order.extend((0..names.len()).filter(|&i| !taken[i]));
    order
}
