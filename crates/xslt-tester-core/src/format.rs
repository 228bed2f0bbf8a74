/*
 * format.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Pretty-printing of editor documents.
 */

//! Document formatting.
//!
//! Formatting reparses the text with blank text dropped and writes it back
//! with indentation. Literal `&#10;` references are protected across the
//! round trip the same way they are for resolution.

use tracing::{debug, info};
use xslt_tester_xml::{ParseOptions, SerializeOptions, parse_with_options, serialize};

use crate::config::FormatConfig;
use crate::error::FormatError;
use crate::placeholder;

/// Result of formatting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutcome {
    /// The formatted text (the input itself when unchanged).
    pub text: String,

    /// Whether the text differs from the input, ignoring surrounding
    /// whitespace. Callers keep their buffer untouched when it doesn't.
    pub changed: bool,
}

impl FormatOutcome {
    /// Keep a cursor (character offset into the old text) inside the new
    /// text.
    pub fn clamp_offset(&self, offset: usize) -> usize {
        offset.min(self.text.chars().count())
    }
}

/// Pretty-print `text`.
///
/// ```rust
/// use xslt_tester_core::{FormatConfig, format_document};
///
/// let outcome = format_document("<a><b/></a>", &FormatConfig::default()).unwrap();
/// assert!(outcome.changed);
/// assert_eq!(outcome.text, "<a>\n  <b/>\n</a>\n");
/// ```
///
/// # Errors
///
/// [`FormatError::InvalidXml`] when no tree can be recovered from `text`.
pub fn format_document(text: &str, config: &FormatConfig) -> Result<FormatOutcome, FormatError> {
    if text.trim().is_empty() {
        return Ok(unchanged(text));
    }

    let encoded = placeholder::encode(text);
    let options = ParseOptions::default().recover(true).no_blanks(true);
    let document = parse_with_options(&encoded, &options)?;
    if !document.diagnostics().is_empty() {
        debug!(
            count = document.diagnostics().len(),
            "formatting a document that needed recovery"
        );
    }

    let serialize_options = SerializeOptions {
        pretty: true,
        indent: config.indent,
    };
    let formatted = placeholder::decode(&serialize(&document, &serialize_options)).into_owned();

    if formatted.trim() == text.trim() {
        return Ok(unchanged(text));
    }

    info!(
        before = text.len(),
        after = formatted.len(),
        "document formatted"
    );
    Ok(FormatOutcome {
        text: formatted,
        changed: true,
    })
}

fn unchanged(text: &str) -> FormatOutcome {
    FormatOutcome {
        text: text.to_string(),
        changed: false,
    }
}
