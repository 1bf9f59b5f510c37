//! Description text processing: markup stripping and `{key}` / `{key:format}`
//! placeholder substitution against a numeric blackboard.

mod markup;
mod placeholder;

use std::collections::BTreeMap;

pub use markup::strip_markup;
pub use placeholder::{format_value, render, tokenize, Segment};

/// Flat key -> numeric value table used to fill description placeholders.
pub type Blackboard = BTreeMap<String, f64>;

/// Strip markup, then substitute placeholders. The full pipeline every
/// description field goes through.
pub fn fill_description(text: &str, blackboard: &Blackboard) -> String {
    render(&strip_markup(text), blackboard)
}

/// Same as [fill_description] for optional source text.
pub fn fill_optional(text: Option<&str>, blackboard: &Blackboard) -> Option<String> {
    text.map(|raw| fill_description(raw, blackboard))
}
