/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for XPath resolution, formatting and configuration.
 */

//! Error types for xslt-tester-core

use std::path::PathBuf;

use thiserror::Error;

/// Why a cursor position could not be turned into a path.
///
/// Every variant has a user-facing rendering in
/// [`ResolvedPath`](crate::ResolvedPath); none of them escape `resolve`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The parser could not build any tree.
    #[error("Invalid XML: {0}")]
    Syntax(String),

    #[error("document has {chars} characters, more than the limit of {limit}")]
    SizeLimitExceeded { chars: usize, limit: usize },

    /// No element starts at or before the cursor line.
    #[error("no element at the cursor")]
    NoMatch,

    /// A tree invariant did not hold (e.g., a dangling parent handle).
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Errors from [`format_document`](crate::format_document).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid XML: {0}")]
    InvalidXml(#[from] xslt_tester_xml::Error),
}

/// Errors from loading an [`XsltTesterConfig`](crate::XsltTesterConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
