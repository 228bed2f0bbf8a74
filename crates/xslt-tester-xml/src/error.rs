//! Error types for tolerant XML parsing.

use std::fmt;

/// Result type alias for xslt-tester-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during XML parsing.
///
/// In recover mode only [`Error::EmptyDocument`] and [`Error::XmlSyntax`]
/// escape the parser, and only when no root element could be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// XML syntax error from quick-xml.
    XmlSyntax {
        message: String,
        /// 1-based line where the error occurred.
        line: Option<usize>,
    },

    /// Unexpected end of input.
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
        line: Option<usize>,
    },

    /// Mismatched end tag.
    MismatchedEndTag {
        /// The expected tag name.
        expected: String,
        /// The actual tag name found.
        found: String,
        line: Option<usize>,
    },

    /// Invalid XML structure.
    InvalidStructure { message: String, line: Option<usize> },

    /// Empty document (no root element).
    EmptyDocument,

    /// Multiple root elements.
    MultipleRoots { line: Option<usize> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::XmlSyntax { message, line } => {
                write!(f, "XML syntax error: {}", message)?;
                write_line(f, *line)
            }
            Error::UnexpectedEof { expected, line } => {
                write!(f, "Unexpected end of input, expected {}", expected)?;
                write_line(f, *line)
            }
            Error::MismatchedEndTag {
                expected,
                found,
                line,
            } => {
                write!(
                    f,
                    "Mismatched end tag: expected </{}>, found </{}>",
                    expected, found
                )?;
                write_line(f, *line)
            }
            Error::InvalidStructure { message, line } => {
                write!(f, "Invalid XML structure: {}", message)?;
                write_line(f, *line)
            }
            Error::EmptyDocument => {
                write!(f, "Empty XML document: no root element found")
            }
            Error::MultipleRoots { line } => {
                write!(f, "Invalid XML: multiple root elements")?;
                write_line(f, *line)
            }
        }
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, line: Option<usize>) -> fmt::Result {
    match line {
        Some(line) => write!(f, " (line {})", line),
        None => Ok(()),
    }
}

impl std::error::Error for Error {}

impl Error {
    /// The 1-based line the error points at, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::XmlSyntax { line, .. }
            | Error::UnexpectedEof { line, .. }
            | Error::MismatchedEndTag { line, .. }
            | Error::InvalidStructure { line, .. }
            | Error::MultipleRoots { line } => *line,
            Error::EmptyDocument => None,
        }
    }
}

/// A defect the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub message: String,
    /// 1-based line of the defect.
    pub line: Option<usize>,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
