/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tester configuration loaded from TOML.
 */

//! Configuration for resolution and formatting.
//!
//! Every section and field is optional; missing values take their defaults.
//!
//! ```toml
//! [resolver]
//! max_document_chars = 2000000
//! debounce_ms = 500
//!
//! [format]
//! indent = 2
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Documents longer than this many characters are not resolved.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 2_000_000;

/// Delay between the last cursor movement and resolution (in milliseconds).
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Spaces per level when pretty-printing.
pub const DEFAULT_INDENT: usize = 2;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XsltTesterConfig {
    pub resolver: ResolverConfig,
    pub format: FormatConfig,
}

impl XsltTesterConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Settings for cursor-to-XPath resolution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Size guard, counted in characters.
    pub max_document_chars: usize,

    /// Debounce duration in milliseconds
    pub debounce_ms: u64,
}

impl ResolverConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Settings for the document formatter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}
