//! Extract `【label】value` lines from the handbook basic file.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::character::HandbookProfile;

static GENDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"【性别】(.*?)\n").expect("Failed to compile gender regex"));
static BIRTH_PLACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"【出身地】(.*?)\n").expect("Failed to compile birth place regex"));
static RACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"【种族】(.*?)\n").expect("Failed to compile race regex"));

/// Value of the first `pattern` match, trimmed. A label on the last line with
/// no trailing line break does not match.
fn labelled(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}

pub fn parse_profile(story_text: &str) -> HandbookProfile {
    HandbookProfile {
        gender: labelled(&GENDER, story_text),
        birth_place: labelled(&BIRTH_PLACE, story_text),
        race: labelled(&RACE, story_text),
    }
}
