#![forbid(unsafe_code)]

//! Open-scoped global listener attachment.
//!
//! While a menu is open it listens to pointer presses and key presses
//! anywhere in the host, so it can detect outside clicks and Escape. Those
//! listeners must exist only while the menu is open. The engine attaches
//! them through a [`ListenerHost`] on open and holds a [`ListenerGuard`];
//! dropping the guard (on close, or when the engine itself is dropped
//! while open) detaches every listener it attached.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Kind of global listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer presses anywhere in the host.
    PointerDown,
    /// Key presses anywhere in the host.
    KeyDown,
}

/// Opaque id for one attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The host's global event source.
pub trait ListenerHost {
    /// Start delivering events of `kind` to the menu.
    fn attach(&mut self, kind: ListenerKind) -> ListenerId;

    /// Stop delivering events for `id`.
    fn detach(&mut self, id: ListenerId);
}

/// Shared handle to a listener host.
pub type SharedListenerHost = Rc<RefCell<dyn ListenerHost>>;

/// Listeners attached for one open session. Detaches on drop.
pub struct ListenerGuard {
    host: SharedListenerHost,
    attached: Vec<(ListenerKind, ListenerId)>,
}

impl ListenerGuard {
    /// Attach one listener per kind in `kinds`.
    #[must_use = "dropping the guard detaches the listeners immediately"]
    pub fn attach(host: &SharedListenerHost, kinds: &[ListenerKind]) -> Self {
        let attached = {
            let mut host = host.borrow_mut();
            kinds.iter().map(|&kind| (kind, host.attach(kind))).collect()
        };
        Self {
            host: Rc::clone(host),
            attached,
        }
    }

    /// Whether a listener of `kind` is attached.
    #[must_use]
    pub fn covers(&self, kind: ListenerKind) -> bool {
        self.attached.iter().any(|(k, _)| *k == kind)
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let mut host = self.host.borrow_mut();
        for (_, id) in self.attached.drain(..) {
            host.detach(id);
        }
    }
}

/// In-process listener bookkeeping.
///
/// Used by the engine when the host does not supply its own
/// [`ListenerHost`]; it tracks which listeners are live and how many have
/// ever been attached and detached, which is what leak tests assert on.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    live: HashMap<ListenerId, ListenerKind>,
    attached_total: usize,
    detached_total: usize,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared registry, keeping a typed handle for inspection.
    #[must_use]
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Number of live listeners of `kind`.
    #[must_use]
    pub fn live(&self, kind: ListenerKind) -> usize {
        self.live.values().filter(|k| **k == kind).count()
    }

    /// Number of live listeners of any kind.
    #[must_use]
    pub fn live_total(&self) -> usize {
        self.live.len()
    }

    /// Listeners attached since creation.
    #[must_use]
    pub fn attached_total(&self) -> usize {
        self.attached_total
    }

    /// Listeners detached since creation.
    #[must_use]
    pub fn detached_total(&self) -> usize {
        self.detached_total
    }
}

impl ListenerHost for ListenerRegistry {
    fn attach(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, kind);
        self.attached_total += 1;
        id
    }

    fn detach(&mut self, id: ListenerId) {
        if self.live.remove(&id).is_some() {
            self.detached_total += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_detaches_on_drop() {
        let registry = ListenerRegistry::shared();
        let host: SharedListenerHost = registry.clone();
        let guard =
            ListenerGuard::attach(&host, &[ListenerKind::PointerDown, ListenerKind::KeyDown]);
        assert!(guard.covers(ListenerKind::KeyDown));
        assert_eq!(registry.borrow().live_total(), 2);
        drop(guard);
        let reg = registry.borrow();
        assert_eq!(reg.live_total(), 0);
        assert_eq!(reg.attached_total(), 2);
        assert_eq!(reg.detached_total(), 2);
    }

    #[test]
    fn guard_covers_only_requested_kinds() {
        let registry = ListenerRegistry::shared();
        let host: SharedListenerHost = registry.clone();
        let guard = ListenerGuard::attach(&host, &[ListenerKind::KeyDown]);
        assert!(!guard.covers(ListenerKind::PointerDown));
        assert_eq!(registry.borrow().live(ListenerKind::KeyDown), 1);
        assert_eq!(registry.borrow().live(ListenerKind::PointerDown), 0);
    }

    #[test]
    fn unknown_detach_is_ignored() {
        let mut registry = ListenerRegistry::new();
        registry.detach(ListenerId(99));
        assert_eq!(registry.detached_total(), 0);
    }
}
