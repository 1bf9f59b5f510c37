use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile markup tag regex"));

/// Remove angle-bracket tags such as `<@ba.kw>` and `</>`; text between tags is kept.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    MARKUP_TAG.replace_all(text, "")
}
