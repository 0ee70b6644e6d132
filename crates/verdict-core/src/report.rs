//! Reporting seam for structural and verdict events.
//!
//! The engine never prints directly; it hands every [`Event`] to a
//! [`Reporter`] and mirrors it as a `tracing` event.

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Something the engine observed while declaring and running a suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A group started declaring. Depth 1 is a top-level group.
    Group {
        /// Group name.
        name: String,
        /// Nesting depth.
        depth: usize,
    },
    /// A case was declared and is about to run.
    Case {
        /// Case name.
        name: String,
        /// Depth of the enclosing group.
        depth: usize,
    },
    /// A case body completed successfully.
    Pass {
        /// Case name.
        name: String,
        /// Depth of the enclosing group.
        depth: usize,
    },
    /// A case body failed.
    Fail {
        /// Case name.
        name: String,
        /// Depth of the enclosing group.
        depth: usize,
        /// Failure message.
        message: String,
    },
}

impl Event {
    /// Returns the group or case name carried by the event.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. }
            | Self::Case { name, .. }
            | Self::Pass { name, .. }
            | Self::Fail { name, .. } => name,
        }
    }

    /// Returns true for [`Event::Fail`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }
}

/// Receives engine events.
pub trait Reporter {
    /// Handles one event.
    fn report(&mut self, event: &Event);
}

/// Human-readable labelled lines.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleReporter<io::Stdout> {
    /// Reports to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleReporter<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Reports to an arbitrary writer.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the reporter and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(event: &Event) -> String {
        let indent = |depth: usize| "  ".repeat(depth.saturating_sub(1));
        match event {
            Event::Group { name, depth } => format!("\n{}📂 [GROUP] {name}", indent(*depth)),
            Event::Case { name, depth } => format!("{}  └─ 📝 [CASE] {name}", indent(*depth)),
            Event::Pass { depth, .. } => format!("{}     ✅ PASS", indent(*depth)),
            Event::Fail { message, depth, .. } => {
                format!("{}     ❌ FAIL: {message}", indent(*depth))
            }
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: &Event) {
        if let Err(e) = writeln!(self.out, "{}", Self::render(event)) {
            tracing::warn!(error = %e, "failed to write report line");
        }
    }
}

/// Captures events in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryReporter {
    events: Arc<Mutex<Vec<Event>>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event reported so far.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Names of the cases that passed, in order.
    #[must_use]
    pub fn passed(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Pass { .. }))
            .map(|e| e.name().to_string())
            .collect()
    }

    /// `(case, message)` pairs for the cases that failed, in order.
    #[must_use]
    pub fn failed(&self) -> Vec<(String, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Event::Fail { name, message, .. } => Some((name.clone(), message.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, event: &Event) {
        self.events.lock().push(event.clone());
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _event: &Event) {}
}
