//! Tokenizer, lookup and formatter for description placeholders.
//!
//! A placeholder is `{key}` or `{key:format}` where `key` is made of ASCII
//! alphanumerics and `_ . @ [ ]`, and `format` is any non-empty run without
//! braces. Anything else, including a `{` that does not open a well-formed
//! placeholder, is literal text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::template::Blackboard;

/// `[0][width][.precision][f|F|d]`
static NUMERIC_SPEC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<zero>0)?(?P<width>[1-9]\d*)?(?:\.(?P<precision>\d+))?(?P<kind>[fFd])?$")
        .expect("Failed to compile numeric format spec regex")
});

static PERCENT_PRECISION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(\d+)").expect("Failed to compile percent precision regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Placeholder {
        /// The placeholder exactly as written, braces included.
        raw: &'a str,
        key: &'a str,
        format: Option<&'a str>,
    },
}

fn is_key_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'@' | b'[' | b']')
}

/// Try to read one placeholder at the start of `input` (which begins with `{`).
/// Returns the consumed byte length, the key and the optional format spec.
fn scan_placeholder(input: &str) -> Option<(usize, &str, Option<&str>)> {
    let bytes = input.as_bytes();
    let mut cursor = 1;
    while cursor < bytes.len() && is_key_byte(bytes[cursor]) {
        cursor += 1;
    }
    if cursor == 1 {
        return None;
    }
    let key = &input[1..cursor];
    match bytes.get(cursor) {
        Some(b'}') => Some((cursor + 1, key, None)),
        Some(b':') => {
            let spec_start = cursor + 1;
            for (offset, byte) in bytes[spec_start..].iter().enumerate() {
                match byte {
                    b'{' => return None,
                    b'}' if offset == 0 => return None,
                    b'}' => {
                        let spec_end = spec_start + offset;
                        return Some((spec_end + 1, key, Some(&input[spec_start..spec_end])));
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

/// Split a template into literal text and placeholders.
pub fn tokenize(template: &str) -> Vec<Segment<'_>> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] != b'{' {
            index += 1;
            continue;
        }
        match scan_placeholder(&template[index..]) {
            Some((len, key, format)) => {
                if text_start < index {
                    segments.push(Segment::Text(&template[text_start..index]));
                }
                segments.push(Segment::Placeholder {
                    raw: &template[index..index + len],
                    key,
                    format,
                });
                index += len;
                text_start = index;
            }
            None => index += 1,
        }
    }
    if text_start < bytes.len() {
        segments.push(Segment::Text(&template[text_start..]));
    }
    segments
}

/// Substitute every placeholder whose key is on the blackboard. Unknown keys and
/// format specs that cannot be applied leave the placeholder verbatim.
pub fn render(template: &str, blackboard: &Blackboard) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in tokenize(template) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder { raw, key, format } => {
                let rendered = blackboard
                    .get(key)
                    .and_then(|value| format_value(*value, format));
                out.push_str(rendered.as_deref().unwrap_or(raw));
            }
        }
    }
    out
}

/// Format one blackboard value. `None` means the spec could not be applied.
pub fn format_value(value: f64, spec: Option<&str>) -> Option<String> {
    match spec {
        None => Some(format_plain(value)),
        Some(spec) if spec.contains('%') => {
            let precision = PERCENT_PRECISION
                .captures(spec)
                .and_then(|caps| caps[1].parse::<usize>().ok())
                .unwrap_or(0);
            Some(format!("{:.*}%", precision, value * 100.0))
        }
        Some(spec) => format_numeric(value, spec),
    }
}

/// Integral values render without a decimal point, everything else as-is.
fn format_plain(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// `[0][width][.precision][f|F|d]`. A precision without a type is fixed
/// decimals (`{x:.1}` of 12.5 is `12.5`), not significant digits.
fn format_numeric(value: f64, spec: &str) -> Option<String> {
    let caps = NUMERIC_SPEC.captures(spec)?;
    let zero_pad = caps.name("zero").is_some();
    let width = match caps.name("width") {
        Some(m) => m.as_str().parse::<usize>().ok()?,
        None => 0,
    };
    let precision = match caps.name("precision") {
        Some(m) => Some(m.as_str().parse::<usize>().ok()?),
        None => None,
    };

    let body = match caps.name("kind").map(|m| m.as_str()) {
        Some("d") => {
            if precision.is_some() || value.fract() != 0.0 {
                return None;
            }
            format!("{}", value as i64)
        }
        Some(_) => format!("{:.*}", precision.unwrap_or(6), value),
        None => match precision {
            Some(p) => format!("{:.*}", p, value),
            None => format_plain(value),
        },
    };
    Some(pad(body, width, zero_pad))
}

fn pad(body: String, width: usize, zero_pad: bool) -> String {
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = width - len;
    if zero_pad {
        let (sign, digits) = match body.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", body.as_str()),
        };
        format!("{sign}{}{digits}", "0".repeat(fill))
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}
