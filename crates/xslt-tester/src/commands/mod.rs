//! Command implementations for the XSLT tester CLI
//!
//! Each command module handles the CLI interface and delegates to
//! xslt-tester-core for actual implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use xslt_tester_core::XsltTesterConfig;

pub mod format;
pub mod trace;
pub mod xpath;

/// Load the configuration file, or the defaults when none was given.
pub fn load_config(path: Option<&Path>) -> Result<XsltTesterConfig> {
    match path {
        Some(path) => {
            let config = XsltTesterConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            debug!(path = %path.display(), ?config, "loaded config");
            Ok(config)
        }
        None => Ok(XsltTesterConfig::default()),
    }
}

/// Read an input document.
pub fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
