#![forbid(unsafe_code)]

//! Latest-wins deferral for search input.
//!
//! Re-filtering on every keystroke is wasteful under fast typing.
//! [`SearchThrottle`] holds the most recent query and releases it once the
//! delay window that the first pending keystroke opened has elapsed.
//!
//! # Semantics
//!
//! - The first [`schedule`](SearchThrottle::schedule) in a quiet period
//!   opens a window ending at `now + delay`. A window that would end past
//!   the clock's range never closes; only `flush` releases its query.
//! - Later calls inside the window replace the pending query (superseded,
//!   not queued) without extending the window.
//! - [`poll`](SearchThrottle::poll) releases the pending query once the
//!   window has closed.
//! - [`cancel`](SearchThrottle::cancel) discards anything pending. The menu
//!   calls it on close so a stale query never lands on a reset session.
//!
//! Time is always passed in, so behavior is deterministic under test.

use std::time::Duration;

use web_time::Instant;

/// Default delay between a keystroke and the filter recomputation.
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Pending {
    query: String,
    due: Option<Instant>,
}

/// Throttle for the search query.
#[derive(Debug, Clone)]
pub struct SearchThrottle {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for SearchThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY)
    }
}

impl SearchThrottle {
    /// Create a throttle with the given delay. A zero delay releases on the
    /// next poll.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Configured delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `query`, superseding any pending one.
    pub fn schedule(&mut self, query: impl Into<String>, now: Instant) {
        let query = query.into();
        match &mut self.pending {
            Some(pending) => pending.query = query,
            None => {
                self.pending = Some(Pending {
                    query,
                    due: now.checked_add(self.delay),
                });
            }
        }
    }

    /// Release the pending query if its window has closed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(Pending { due: Some(due), .. }) if now >= *due => {
                self.pending.take().map(|p| p.query)
            }
            _ => None,
        }
    }

    /// Release the pending query immediately, regardless of the window.
    pub fn flush(&mut self) -> Option<String> {
        self.pending.take().map(|p| p.query)
    }

    /// Discard any pending query. Returns whether one was discarded.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether a query is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending query becomes due, if any.
    #[must_use]
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().and_then(|p| p.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn releases_after_delay() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::new(250 * MS);
        th.schedule("a", t0);
        assert_eq!(th.poll(t0 + 100 * MS), None);
        assert_eq!(th.poll(t0 + 250 * MS).as_deref(), Some("a"));
        assert!(!th.is_pending());
        assert_eq!(th.poll(t0 + 500 * MS), None);
    }

    #[test]
    fn later_keystrokes_supersede_without_extending() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::new(250 * MS);
        th.schedule("a", t0);
        th.schedule("ap", t0 + 100 * MS);
        th.schedule("app", t0 + 200 * MS);
        assert_eq!(th.due_at(), Some(t0 + 250 * MS));
        assert_eq!(th.poll(t0 + 250 * MS).as_deref(), Some("app"));
    }

    #[test]
    fn cancel_discards_pending() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::default();
        assert_eq!(th.delay(), DEFAULT_SEARCH_DELAY);
        th.schedule("x", t0);
        assert!(th.cancel());
        assert!(!th.cancel());
        assert_eq!(th.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn flush_ignores_window() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::new(Duration::from_secs(10));
        th.schedule("q", t0);
        assert_eq!(th.flush().as_deref(), Some("q"));
        assert_eq!(th.flush(), None);
    }

    #[test]
    fn new_window_after_release() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::new(250 * MS);
        th.schedule("a", t0);
        assert!(th.poll(t0 + 300 * MS).is_some());
        th.schedule("b", t0 + 400 * MS);
        assert_eq!(th.due_at(), Some(t0 + 650 * MS));
    }

    #[test]
    fn zero_delay_releases_on_next_poll() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::new(Duration::ZERO);
        th.schedule("now", t0);
        assert_eq!(th.poll(t0).as_deref(), Some("now"));
    }

    #[test]
    fn unbounded_delay_waits_for_flush() {
        let t0 = Instant::now();
        let mut th = SearchThrottle::new(Duration::MAX);
        th.schedule("slow", t0);
        assert!(th.is_pending());
        assert_eq!(th.due_at(), None);
        assert_eq!(th.poll(t0 + Duration::from_secs(3600)), None);
        assert_eq!(th.flush().as_deref(), Some("slow"));
    }
}
