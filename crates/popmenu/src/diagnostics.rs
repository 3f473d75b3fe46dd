#![forbid(unsafe_code)]

//! Development-time diagnostics for menu misuse.
//!
//! Misuse never aborts a session. The offending node is left out and a
//! [`Diagnostic`] is recorded here and emitted as a `tracing` warning under
//! the `popmenu::diagnostics` target, so it shows up in development logs
//! and can be asserted in tests.

use std::collections::VecDeque;
use std::fmt;

/// Default number of diagnostics retained by a [`DiagnosticLog`].
pub const DEFAULT_CAPACITY: usize = 32;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A node that cannot take focus was presented as a menu item.
    NotFocusable {
        /// Position of the node in document order (items and groups alike).
        position: usize,
        /// The node's text, for locating it.
        label: String,
    },
    /// A registered handle was dropped while its session was still open.
    StaleHandle {
        /// Registry index of the dropped handle.
        index: usize,
    },
}

/// A single recorded misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Classification of the problem.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Diagnostic for a non-focusable node at `position`.
    #[must_use]
    pub fn not_focusable(position: usize, label: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::NotFocusable {
                position,
                label: label.into(),
            },
        }
    }

    /// Diagnostic for a handle that no longer exists.
    #[must_use]
    pub const fn stale_handle(index: usize) -> Self {
        Self {
            kind: DiagnosticKind::StaleHandle { index },
        }
    }

    /// Emit this diagnostic through `tracing`.
    pub fn emit(&self) {
        tracing::warn!(target: "popmenu::diagnostics", "{self}");
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::NotFocusable { position, label } => write!(
                f,
                "menu child at position {position} ({label:?}) is not focusable and was not registered"
            ),
            DiagnosticKind::StaleHandle { index } => {
                write!(f, "menu item {index} was dropped while the menu was open")
            }
        }
    }
}

/// Bounded, oldest-first log of diagnostics.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl DiagnosticLog {
    /// Create a log that keeps at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Emit and record a diagnostic, evicting the oldest when full.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(diagnostic);
    }

    /// Record every diagnostic in `batch`.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in batch {
            self.push(diagnostic);
        }
    }

    /// Iterate recorded diagnostics, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all recorded diagnostics.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
