#![forbid(unsafe_code)]

//! Reference-counted page scroll locking.
//!
//! Several popups may want the page frozen at once (a menu opened from a
//! dialog that already locked scrolling, for instance). [`ScrollLock`] is a
//! shared service that counts holders and touches the page only on the
//! first acquire and the last release. Holders get a [`ScrollLockGuard`];
//! dropping the guard releases the hold.
//!
//! # Invariants
//!
//! 1. `freeze` is called on the 0 → 1 holder transition and `restore` on
//!    the 1 → 0 transition, never otherwise.
//! 2. Each guard releases exactly once, on drop.
//! 3. Scrollbar compensation is read when the page is frozen: if the page
//!    had a scrollbar, its width is reserved so content does not shift.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// The scrollable page a lock applies to.
pub trait ScrollSurface {
    /// Width of the page's vertical scrollbar, or `0` when it has none.
    fn scrollbar_width(&self) -> u16;

    /// Stop page scrolling, reserving `compensation` cells where the
    /// scrollbar was.
    fn freeze(&mut self, compensation: u16);

    /// Undo [`freeze`](Self::freeze).
    fn restore(&mut self);
}

/// Shared scroll lock service.
pub struct ScrollLock {
    surface: RefCell<Box<dyn ScrollSurface>>,
    holders: Cell<usize>,
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("holders", &self.holders.get())
            .finish_non_exhaustive()
    }
}

impl ScrollLock {
    /// Create a lock service over `surface`.
    #[must_use]
    pub fn new(surface: impl ScrollSurface + 'static) -> Rc<Self> {
        Rc::new(Self {
            surface: RefCell::new(Box::new(surface)),
            holders: Cell::new(0),
        })
    }

    /// Take a hold on the lock, freezing the page if this is the first.
    #[must_use = "dropping the guard releases the lock immediately"]
    pub fn acquire(self: &Rc<Self>) -> ScrollLockGuard {
        let holders = self.holders.get();
        if holders == 0 {
            let mut surface = self.surface.borrow_mut();
            let compensation = surface.scrollbar_width();
            surface.freeze(compensation);
            tracing::debug!(message = "scroll_lock.freeze", compensation);
        }
        self.holders.set(holders + 1);
        ScrollLockGuard {
            lock: Rc::clone(self),
        }
    }

    /// Number of live guards.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.holders.get()
    }

    /// Whether the page is currently frozen.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.holders.get() > 0
    }

    fn release(&self) {
        let holders = self.holders.get().saturating_sub(1);
        self.holders.set(holders);
        if holders == 0 {
            self.surface.borrow_mut().restore();
            tracing::debug!(message = "scroll_lock.restore");
        }
    }
}

/// A hold on a [`ScrollLock`]. Releases on drop.
pub struct ScrollLockGuard {
    lock: Rc<ScrollLock>,
}

impl fmt::Debug for ScrollLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockGuard")
            .field("holders", &self.lock.holders())
            .finish()
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}
