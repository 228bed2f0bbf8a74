//! Format command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use xslt_tester_core::{XsltTesterConfig, format_document};

/// Arguments for the format command
#[derive(Debug)]
pub struct FormatArgs {
    pub file: PathBuf,
    /// Rewrite the file instead of printing
    pub in_place: bool,
}

/// Execute the format command
pub fn execute(args: FormatArgs, config: &XsltTesterConfig) -> Result<()> {
    let text = super::read_document(&args.file)?;
    let outcome = format_document(&text, &config.format)
        .with_context(|| format!("Formatting Error: {}", args.file.display()))?;

    if !args.in_place {
        print!("{}", outcome.text);
        return Ok(());
    }

    if outcome.changed {
        std::fs::write(&args.file, &outcome.text)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
        info!(file = %args.file.display(), "formatted");
    } else {
        info!(file = %args.file.display(), "already formatted");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_place_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.xml");
        std::fs::write(&file, "<a><b/></a>").unwrap();

        let args = FormatArgs {
            file: file.clone(),
            in_place: true,
        };
        execute(args, &XsltTesterConfig::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "<a>\n  <b/>\n</a>\n"
        );
    }

    #[test]
    fn test_in_place_leaves_formatted_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.xml");
        std::fs::write(&file, "<a>\n  <b/>\n</a>").unwrap();

        let args = FormatArgs {
            file: file.clone(),
            in_place: true,
        };
        execute(args, &XsltTesterConfig::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "<a>\n  <b/>\n</a>");
    }

    #[test]
    fn test_invalid_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.xml");
        std::fs::write(&file, "no markup here").unwrap();

        let args = FormatArgs {
            file,
            in_place: true,
        };
        let err = execute(args, &XsltTesterConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("Formatting Error"));
    }
}
