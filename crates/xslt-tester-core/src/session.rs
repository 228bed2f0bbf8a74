/*
 * session.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Debounced resolution of cursor movements.
 */

//! Debounced cursor tracking.
//!
//! Cursor movements arrive in bursts while the user types or scrolls.
//! Rather than resolving on every movement, a [`CursorSession`] waits until
//! the cursor has been still for the configured delay. The caller passes
//! the current time into every call, so the session owns no timer and no
//! thread.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ResolverConfig;
use crate::resolve::{CursorPosition, ResolvedPath, Resolver};

/// A single re-arming deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Start (or restart) the countdown from `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once per arming, when `now` has reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Tracks the cursor of one editor and resolves it after it settles.
#[derive(Debug, Clone)]
pub struct CursorSession {
    resolver: Resolver,
    debouncer: Debouncer,
    cursor: Option<CursorPosition>,
    last: Option<ResolvedPath>,
}

impl CursorSession {
    pub fn new(config: ResolverConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            resolver: Resolver::new(config),
            debouncer,
            cursor: None,
            last: None,
        }
    }

    /// Record a cursor movement and restart the debounce countdown.
    pub fn cursor_moved(&mut self, cursor: CursorPosition, now: Instant) {
        self.cursor = Some(cursor);
        self.debouncer.arm(now);
    }

    /// Resolve if the cursor has been still long enough.
    ///
    /// Returns `None` while the countdown is running or when nothing moved.
    pub fn poll(&mut self, text: &str, now: Instant) -> Option<ResolvedPath> {
        if !self.debouncer.fire(now) {
            return None;
        }
        let cursor = self.cursor?;
        let result = self.resolver.resolve(text, cursor);
        debug!(line = cursor.line, column = cursor.column, %result, "debounced resolution");
        self.last = Some(result.clone());
        Some(result)
    }

    /// Resolve the current cursor immediately, leaving any pending
    /// countdown alone. Used for explicit copy requests.
    pub fn resolve_now(&self, text: &str) -> ResolvedPath {
        match self.cursor {
            Some(cursor) => self.resolver.resolve(text, cursor),
            None => ResolvedPath::Empty,
        }
    }

    pub fn cursor(&self) -> Option<CursorPosition> {
        self.cursor
    }

    /// When the pending resolution becomes due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// The most recent debounced result.
    pub fn last(&self) -> Option<&ResolvedPath> {
        self.last.as_ref()
    }
}
