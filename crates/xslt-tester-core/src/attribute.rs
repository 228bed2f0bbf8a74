/*
 * attribute.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Detecting a cursor placed on an attribute name or value.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// `name = "value"` or `name = 'value'`, whitespace optional around `=`.
/// The name must follow whitespace or the start of the line. Group 1 is the
/// name; group 2 or 3 the value contents.
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)([\p{L}_][\w.:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Name of the attribute whose name or value contains `column`.
///
/// Only `line_text` (the raw text of the cursor line) is scanned. `column`
/// counts characters from the start of the line; the character at
/// `column` is the one the cursor sits before. Namespace declarations are
/// never reported.
pub fn match_attribute(line_text: &str, column: usize) -> Option<String> {
    for caps in ATTRIBUTE.captures_iter(line_text) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3))) else {
            continue;
        };
        if is_namespace_declaration(name.as_str()) {
            continue;
        }

        let in_name = char_span(line_text, name.start(), name.end()).contains(&column);
        let in_value = char_span(line_text, value.start(), value.end()).contains(&column);
        if in_name || in_value {
            return Some(name.as_str().to_string());
        }
    }
    None
}

fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// Converts a byte range of `line` to a character range.
fn char_span(line: &str, start: usize, end: usize) -> std::ops::Range<usize> {
    let start_char = line[..start].chars().count();
    let end_char = start_char + line[start..end].chars().count();
    start_char..end_char
}
