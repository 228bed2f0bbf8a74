/*
 * placeholder.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Protection of literal newline character references across a parse.
 */

//! Placeholder encoding for `&#10;`.
//!
//! A parser would turn `&#10;` into a real newline, and serializing the tree
//! would then write the newline, losing what the author typed. Before
//! parsing, each literal `&#10;` is swapped for a private-use marker that
//! the parser treats as ordinary character data; after serializing (or
//! building a path) the marker is swapped back.
//!
//! Text that already contains the marker or the escape character has those
//! characters prefixed with the escape, so `decode(&encode(s)) == s` holds
//! for every string.

use std::borrow::Cow;

/// The character reference being protected.
pub const LINE_FEED_REFERENCE: &str = "&#10;";

/// Stands in for one `&#10;`.
pub const LINE_FEED_MARKER: char = '\u{E00A}';

/// Marks the following character as literal.
pub const MARKER_ESCAPE: char = '\u{E01B}';

/// Replace every `&#10;` with [`LINE_FEED_MARKER`].
pub fn encode(text: &str) -> Cow<'_, str> {
    if !text.contains(LINE_FEED_REFERENCE)
        && !text.contains([LINE_FEED_MARKER, MARKER_ESCAPE])
    {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with(LINE_FEED_REFERENCE) {
            out.push(LINE_FEED_MARKER);
            rest = &rest[LINE_FEED_REFERENCE.len()..];
            continue;
        }
        if c == LINE_FEED_MARKER || c == MARKER_ESCAPE {
            out.push(MARKER_ESCAPE);
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

/// Exact inverse of [`encode`].
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains([LINE_FEED_MARKER, MARKER_ESCAPE]) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            MARKER_ESCAPE => {
                // A trailing escape has nothing to protect; keep it
                out.push(chars.next().unwrap_or(MARKER_ESCAPE));
            }
            LINE_FEED_MARKER => out.push_str(LINE_FEED_REFERENCE),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(encode("<a>text</a>"), Cow::Borrowed(_)));
        assert!(matches!(decode("<a>text</a>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_reference_is_replaced() {
        let encoded = encode("<a title=\"one&#10;two\"/>");
        assert_eq!(encoded, "<a title=\"one\u{E00A}two\"/>");
        assert_eq!(decode(&encoded), "<a title=\"one&#10;two\"/>");
    }

    #[test]
    fn test_adjacent_references() {
        assert_eq!(encode("&#10;&#10;"), "\u{E00A}\u{E00A}");
        assert_eq!(decode("\u{E00A}\u{E00A}"), "&#10;&#10;");
    }

    #[test]
    fn test_existing_marker_survives() {
        let input = "\u{E00A} and \u{E01B} and &#10;";
        let encoded = encode(input);
        assert_eq!(encoded, "\u{E01B}\u{E00A} and \u{E01B}\u{E01B} and \u{E00A}");
        assert_eq!(decode(&encoded), input);
    }

    #[test]
    fn test_partial_reference_is_untouched() {
        assert_eq!(encode("&#10"), "&#10");
        assert_eq!(encode("&#100;"), "&#100;");
    }
}
