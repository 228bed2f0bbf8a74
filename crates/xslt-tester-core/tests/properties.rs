/*
 * properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property-based tests for the placeholder codec, the line locator and
 * the formatter.
 */

use proptest::prelude::*;
use xslt_tester_core::placeholder::{LINE_FEED_MARKER, MARKER_ESCAPE, decode, encode};
use xslt_tester_core::{FormatConfig, format_document, locate};
use xslt_tester_xml::parse;

/// Strings biased towards the characters the codec cares about.
fn codec_input() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        Just("&#10;".to_string()),
        Just("&#10".to_string()),
        Just("&".to_string()),
        Just(LINE_FEED_MARKER.to_string()),
        Just(MARKER_ESCAPE.to_string()),
        "[a-z<>\"' ]{0,4}",
        any::<char>().prop_map(|c| c.to_string()),
    ];
    prop::collection::vec(piece, 0..16).prop_map(|pieces| pieces.concat())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_decode_inverts_encode(input in codec_input()) {
        let encoded = encode(&input);
        prop_assert_eq!(decode(&encoded), input.as_str());
    }

    #[test]
    fn test_encoded_text_has_no_reference(input in codec_input()) {
        prop_assert!(!encode(&input).contains("&#10;"));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Children placed on strictly increasing lines: the located element is
    /// the last one starting on or before the cursor line.
    #[test]
    fn test_locator_picks_last_started(gaps in prop::collection::vec(1usize..4, 1..12)) {
        let mut text = String::from("<root>");
        let mut starts = vec![1usize];
        let mut line = 1;
        for (i, gap) in gaps.iter().enumerate() {
            for _ in 0..*gap {
                text.push('\n');
            }
            line += gap;
            text.push_str(&format!("<c{}/>", i));
            starts.push(line);
        }
        text.push_str("\n</root>");

        let doc = parse(&text).unwrap();
        for cursor_line in 0..=line + 2 {
            let expected = starts.iter().rposition(|start| *start <= cursor_line);
            let found = locate(&doc, cursor_line).map(|id| {
                let name = &doc.element(id).unwrap().name.local;
                if name == "root" {
                    0
                } else {
                    name[1..].parse::<usize>().unwrap() + 1
                }
            });
            prop_assert_eq!(found, expected, "cursor line {}", cursor_line);
        }
    }

    /// Formatting a formatted document changes nothing.
    #[test]
    fn test_formatting_is_idempotent(
        names in prop::collection::vec("[a-c]", 1..8),
        texts in prop::collection::vec(prop::option::of("[a-z&<]{1,5}"), 8),
    ) {
        let mut text = String::from("<root>");
        for (i, name) in names.iter().enumerate() {
            text.push_str(&format!("<{} n=\"{}&#10;\">", name, i));
            if let Some(content) = &texts[i] {
                text.push_str(&content.replace('&', "&amp;").replace('<', "&lt;"));
            }
            text.push_str(&format!("</{}>", name));
        }
        text.push_str("</root>");

        let config = FormatConfig::default();
        let once = format_document(&text, &config).unwrap();
        let twice = format_document(&once.text, &config).unwrap();
        prop_assert!(!twice.changed);
        prop_assert_eq!(&twice.text, &once.text);
        prop_assert!(once.text.contains("&#10;"));
    }
}
