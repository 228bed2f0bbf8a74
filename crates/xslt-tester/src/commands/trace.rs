//! Trace command implementation
//!
//! Replays a recorded sequence of cursor movements through a
//! [`CursorSession`], printing a line for every resolution the debounce
//! lets through. Each input line is `millis line column`, with `millis`
//! measured from the start of the recording; blank lines and lines
//! starting with `#` are skipped.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tracing::info;
use xslt_tester_core::{CursorPosition, CursorSession, ResolvedPath, XsltTesterConfig};

/// Arguments for the trace command
#[derive(Debug)]
pub struct TraceArgs {
    pub file: PathBuf,
}

/// One recorded cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEvent {
    pub millis: u64,
    pub cursor: CursorPosition,
}

/// Execute the trace command
pub fn execute(args: TraceArgs, config: &XsltTesterConfig) -> Result<()> {
    let text = super::read_document(&args.file)?;

    let mut events = Vec::new();
    for (index, line) in std::io::stdin().lock().lines().enumerate() {
        let line = line.context("Failed to read cursor events from stdin")?;
        let event = parse_event(&line).with_context(|| format!("stdin line {}", index + 1))?;
        events.extend(event);
    }
    info!(events = events.len(), "replaying cursor events");

    let mut stdout = std::io::stdout().lock();
    for (millis, result) in replay(&text, &events, config) {
        writeln!(stdout, "{}\t{}", millis, result.label())?;
    }
    Ok(())
}

/// Parse one `millis line column` record.
pub fn parse_event(line: &str) -> Result<Option<TraceEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [millis, cursor_line, column] = fields.as_slice() else {
        bail!("expected `millis line column`, got {:?}", line);
    };
    Ok(Some(TraceEvent {
        millis: millis.parse().context("invalid millis")?,
        cursor: CursorPosition::new(
            cursor_line.parse().context("invalid line")?,
            column.parse().context("invalid column")?,
        ),
    }))
}

/// Feed `events` through a session, returning each debounced resolution
/// with the time (millis) it became due.
pub fn replay(
    text: &str,
    events: &[TraceEvent],
    config: &XsltTesterConfig,
) -> Vec<(u64, ResolvedPath)> {
    let start = Instant::now();
    let at = |millis: u64| start + Duration::from_millis(millis);
    let since_start = |instant: Instant| instant.duration_since(start).as_millis() as u64;

    let mut session = CursorSession::new(config.resolver.clone());
    let mut results = Vec::new();

    for event in events {
        let now = at(event.millis);
        if let Some(deadline) = session.next_deadline().filter(|deadline| *deadline <= now) {
            if let Some(result) = session.poll(text, deadline) {
                results.push((since_start(deadline), result));
            }
        }
        session.cursor_moved(event.cursor, now);
    }

    if let Some(deadline) = session.next_deadline() {
        if let Some(result) = session.poll(text, deadline) {
            results.push((since_start(deadline), result));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "<a>\n  <b id=\"x\"/>\n  <b/>\n</a>";

    fn event(millis: u64, line: usize, column: usize) -> TraceEvent {
        TraceEvent {
            millis,
            cursor: CursorPosition::new(line, column),
        }
    }

    #[test]
    fn test_parse_event() {
        assert_eq!(parse_event("120 3 4").unwrap(), Some(event(120, 3, 4)));
        assert_eq!(parse_event("  # comment").unwrap(), None);
        assert_eq!(parse_event("").unwrap(), None);
        assert!(parse_event("1 2").is_err());
        assert!(parse_event("a b c").is_err());
    }

    #[test]
    fn test_burst_resolves_once() {
        let events = [event(0, 1, 0), event(100, 2, 0), event(200, 3, 2)];
        let results = replay(TEXT, &events, &XsltTesterConfig::default());
        assert_eq!(
            results,
            vec![(700, ResolvedPath::Path("/a/b[2]".to_string()))]
        );
    }

    #[test]
    fn test_pauses_split_resolutions() {
        let events = [event(0, 2, 5), event(1000, 3, 2)];
        let results = replay(TEXT, &events, &XsltTesterConfig::default());
        assert_eq!(
            results,
            vec![
                (500, ResolvedPath::Path("/a/b[@id='x']/@id".to_string())),
                (1500, ResolvedPath::Path("/a/b[2]".to_string())),
            ]
        );
    }

    #[test]
    fn test_no_events_no_output() {
        assert!(replay(TEXT, &[], &XsltTesterConfig::default()).is_empty());
    }
}
