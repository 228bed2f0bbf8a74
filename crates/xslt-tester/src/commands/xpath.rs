//! XPath command implementation

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::info;
use xslt_tester_core::{CursorPosition, ResolvedPath, Resolver, XsltTesterConfig};

/// Arguments for the xpath command
#[derive(Debug)]
pub struct XpathArgs {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub json: bool,
}

/// JSON report for `--json`.
#[derive(Debug, Serialize)]
struct XpathReport<'a> {
    file: String,
    line: usize,
    column: usize,
    status: &'static str,
    output: String,
    label: String,
    /// What a copy request would report.
    copy_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    xpath: Option<&'a str>,
}

/// Execute the xpath command
pub fn execute(args: XpathArgs, config: &XsltTesterConfig) -> Result<()> {
    let text = super::read_document(&args.file)?;
    let cursor = CursorPosition::new(args.line, args.column);
    let result = Resolver::new(config.resolver.clone()).resolve(&text, cursor);
    info!(
        file = %args.file.display(),
        line = args.line,
        column = args.column,
        %result,
        "resolved"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report(&args, &result))?);
    } else {
        println!("{}", result);
    }
    Ok(())
}

fn report<'a>(args: &XpathArgs, result: &'a ResolvedPath) -> XpathReport<'a> {
    XpathReport {
        file: args.file.display().to_string(),
        line: args.line,
        column: args.column,
        status: status(result),
        output: result.to_string(),
        label: result.label(),
        copy_status: result.copy_status(),
        xpath: result.as_path(),
    }
}

fn status(result: &ResolvedPath) -> &'static str {
    match result {
        ResolvedPath::Path(_) => "path",
        ResolvedPath::Empty => "empty",
        ResolvedPath::Disabled { .. } => "disabled",
        ResolvedPath::Invalid => "invalid",
    }
}
