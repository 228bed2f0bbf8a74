/*
 * resolve.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Cursor-to-XPath resolution over raw editor text.
 */

//! Cursor-to-XPath resolution.
//!
//! [`Resolver::resolve`] never fails: every outcome, including unusable
//! input, maps to a [`ResolvedPath`] whose `Display` is the text shown to
//! the user.

use std::fmt;

use tracing::{debug, warn};
use xslt_tester_xml::{ParseOptions, parse_with_options};

use crate::attribute::match_attribute;
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::locate::locate;
use crate::namespace::NamespaceResolver;
use crate::placeholder;
use crate::synthesize::synthesize;

/// Cursor location in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    /// 1-based line.
    pub line: usize,
    /// 0-based column, counted in characters.
    pub column: usize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Outcome of resolving a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    /// A path to the element (and possibly attribute) under the cursor.
    Path(String),

    /// Nothing to show: blank document, or no element at the cursor.
    Empty,

    /// The document is too large to resolve.
    Disabled { limit: usize },

    /// The text could not be parsed into any tree.
    Invalid,
}

impl ResolvedPath {
    pub fn as_path(&self) -> Option<&str> {
        match self {
            ResolvedPath::Path(path) => Some(path.as_str()),
            _ => None,
        }
    }

    /// Status bar text.
    pub fn label(&self) -> String {
        format!("XPath: {}", self)
    }

    /// Feedback for an explicit copy request.
    pub fn copy_status(&self) -> String {
        match self {
            ResolvedPath::Path(_) => "XPath copied to clipboard.".to_string(),
            ResolvedPath::Empty => "No element found at this line.".to_string(),
            ResolvedPath::Disabled { .. } => format!("Could not copy XPath: {}", self),
            ResolvedPath::Invalid => "Could not copy XPath: Invalid XML".to_string(),
        }
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedPath::Path(path) => write!(f, "{}", path),
            ResolvedPath::Empty => Ok(()),
            ResolvedPath::Disabled { limit } => {
                write!(f, "XPath disabled: document exceeds {} characters", limit)
            }
            ResolvedPath::Invalid => write!(f, "Invalid XML"),
        }
    }
}

impl From<ResolveError> for ResolvedPath {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Syntax(_) => ResolvedPath::Invalid,
            ResolveError::SizeLimitExceeded { limit, .. } => ResolvedPath::Disabled { limit },
            ResolveError::NoMatch => ResolvedPath::Empty,
            ResolveError::Unexpected(message) => {
                warn!(%message, "XPath resolution failed");
                ResolvedPath::Empty
            }
        }
    }
}

/// Resolves cursor positions against document text.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `cursor` in `text` to a user-facing result.
    pub fn resolve(&self, text: &str, cursor: CursorPosition) -> ResolvedPath {
        match self.try_resolve(text, cursor) {
            Ok(path) => ResolvedPath::Path(path),
            Err(err) => {
                debug!(error = %err, line = cursor.line, "no XPath for cursor");
                err.into()
            }
        }
    }

    /// Resolve `cursor` in `text`, reporting why no path could be built.
    ///
    /// Blank text yields [`ResolveError::NoMatch`].
    pub fn try_resolve(&self, text: &str, cursor: CursorPosition) -> Result<String, ResolveError> {
        if text.trim().is_empty() {
            return Err(ResolveError::NoMatch);
        }

        let chars = text.chars().count();
        if chars > self.config.max_document_chars {
            return Err(ResolveError::SizeLimitExceeded {
                chars,
                limit: self.config.max_document_chars,
            });
        }

        let encoded = placeholder::encode(text);
        let options = ParseOptions::default().recover(true);
        let document = parse_with_options(&encoded, &options).map_err(|err| {
            debug!(error_line = ?err.line(), "document could not be parsed");
            ResolveError::Syntax(err.to_string())
        })?;

        let node = locate(&document, cursor.line).ok_or(ResolveError::NoMatch)?;
        let resolver = NamespaceResolver::from_document(&document);
        let mut path = synthesize(&document, &resolver, node)?;

        if let Some(attribute) = current_line(text, cursor.line)
            .and_then(|line| match_attribute(line, cursor.column))
        {
            path = path.with_attribute(attribute);
        }

        Ok(placeholder::decode(&path.to_string()).into_owned())
    }
}

/// Resolve with the default configuration.
///
/// ```rust
/// use xslt_tester_core::{CursorPosition, resolve};
///
/// let text = "<a>\n  <b id=\"x\"/>\n  <b/>\n</a>";
/// assert_eq!(resolve(text, CursorPosition::new(2, 0)).to_string(), "/a/b[@id='x']");
/// assert_eq!(resolve(text, CursorPosition::new(3, 4)).to_string(), "/a/b[2]");
/// assert_eq!(resolve(text, CursorPosition::new(2, 6)).to_string(), "/a/b[@id='x']/@id");
/// ```
pub fn resolve(text: &str, cursor: CursorPosition) -> ResolvedPath {
    Resolver::default().resolve(text, cursor)
}

/// Raw text of the 1-based `line`, without its line terminator.
fn current_line(text: &str, line: usize) -> Option<&str> {
    let index = line.checked_sub(1)?;
    text.split('\n')
        .nth(index)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(resolve("", CursorPosition::new(1, 0)), ResolvedPath::Empty);
        assert_eq!(
            resolve("  \n\t\n", CursorPosition::new(2, 0)),
            ResolvedPath::Empty
        );
    }

    #[test]
    fn test_size_guard() {
        let resolver = Resolver::new(ResolverConfig {
            max_document_chars: 10,
            ..ResolverConfig::default()
        });
        let result = resolver.resolve("<root>too long</root>", CursorPosition::new(1, 0));
        assert_eq!(result, ResolvedPath::Disabled { limit: 10 });
        assert_eq!(
            result.to_string(),
            "XPath disabled: document exceeds 10 characters"
        );
    }

    #[test]
    fn test_size_guard_counts_characters() {
        let resolver = Resolver::new(ResolverConfig {
            max_document_chars: 8,
            ..ResolverConfig::default()
        });
        // 8 characters, 9 bytes
        assert_eq!(
            resolver.resolve("<a>é</a>", CursorPosition::new(1, 0)),
            ResolvedPath::Path("/a".to_string())
        );
    }

    #[test]
    fn test_unparseable_text_is_invalid() {
        let result = resolve("this is not xml", CursorPosition::new(1, 0));
        assert_eq!(result, ResolvedPath::Invalid);
        assert_eq!(result.to_string(), "Invalid XML");
    }

    #[test]
    fn test_cursor_before_root() {
        let text = "<?xml version=\"1.0\"?>\n<root/>";
        assert_eq!(resolve(text, CursorPosition::new(1, 3)), ResolvedPath::Empty);
        assert_eq!(
            resolve(text, CursorPosition::new(2, 0)).as_path(),
            Some("/root")
        );
    }

    #[test]
    fn test_placeholder_survives_in_predicate() {
        let text = "<a>\n  <b name=\"x&#10;y\"/>\n</a>";
        assert_eq!(
            resolve(text, CursorPosition::new(2, 0)).to_string(),
            "/a/b[@name='x&#10;y']"
        );
    }

    #[test]
    fn test_crlf_lines() {
        let text = "<a>\r\n  <b id=\"x\"/>\r\n</a>";
        assert_eq!(
            resolve(text, CursorPosition::new(2, 9)).to_string(),
            "/a/b[@id='x']/@id"
        );
    }

    #[test]
    fn test_labels() {
        let path = ResolvedPath::Path("/a".to_string());
        assert_eq!(path.label(), "XPath: /a");
        assert_eq!(ResolvedPath::Empty.label(), "XPath: ");
        assert_eq!(path.copy_status(), "XPath copied to clipboard.");
        assert_eq!(
            ResolvedPath::Empty.copy_status(),
            "No element found at this line."
        );
        assert_eq!(
            ResolvedPath::Invalid.copy_status(),
            "Could not copy XPath: Invalid XML"
        );
        assert_eq!(
            ResolvedPath::Disabled { limit: 10 }.copy_status(),
            "Could not copy XPath: XPath disabled: document exceeds 10 characters"
        );
    }

    #[test]
    fn test_unexpected_failure_downgrades_to_empty() {
        let result: ResolvedPath = ResolveError::Unexpected("dangling parent".to_string()).into();
        assert_eq!(result, ResolvedPath::Empty);
    }

    #[test]
    fn test_current_line() {
        assert_eq!(current_line("a\nb\r\nc", 2), Some("b"));
        assert_eq!(current_line("a", 0), None);
        assert_eq!(current_line("a", 5), None);
    }
}
