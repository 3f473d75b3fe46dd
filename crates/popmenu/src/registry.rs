#![forbid(unsafe_code)]

//! Per-session item registry.
//!
//! [`ItemRegistry`] maps a stable item index to a non-owning reference to
//! that item's [`MenuItemHandle`]. Indices are assigned in document order
//! starting at 0, one per leaf item; group headings and dividers take no
//! index, and a group's children continue the surrounding count.
//!
//! # Invariants
//!
//! 1. **Full rebuild**: [`ItemRegistry::rebuild`] clears the map before
//!    walking the tree, so indices from an earlier tree shape never linger.
//! 2. **Contiguous**: after a rebuild the indices are exactly `0..size()`.
//! 3. **Non-owning**: the registry stores `Weak` references and never
//!    mutates a handle. Dropping an item makes its entry resolve to `None`.
//! 4. **Idempotent registration**: registering the same index twice in one
//!    pass overwrites the earlier entry.

use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::diagnostics::Diagnostic;
use crate::item_tree::{MenuItemHandle, MenuNode};

/// Ordered `index -> handle` map for one open session.
#[derive(Default)]
pub struct ItemRegistry {
    entries: BTreeMap<usize, Weak<dyn MenuItemHandle>>,
}

impl std::fmt::Debug for ItemRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemRegistry")
            .field("size", &self.entries.len())
            .field("live", &self.iter().count())
            .finish()
    }
}

impl ItemRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `index`, replacing any earlier entry.
    pub fn register(&mut self, index: usize, handle: &Rc<dyn MenuItemHandle>) {
        self.entries.insert(index, Rc::downgrade(handle));
    }

    /// Resolve the handle at `index`, if registered and still alive.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rc<dyn MenuItemHandle>> {
        self.entries.get(&index).and_then(Weak::upgrade)
    }

    /// Number of registered indices.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate live `(index, handle)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Rc<dyn MenuItemHandle>)> + '_ {
        self.entries
            .iter()
            .filter_map(|(&index, weak)| weak.upgrade().map(|handle| (index, handle)))
    }

    /// Indices whose handle has been dropped.
    #[must_use]
    pub fn stale_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .filter(|(_, weak)| weak.strong_count() == 0)
            .map(|(&index, _)| index)
            .collect()
    }

    /// Clear and re-register every leaf of `nodes` in document order.
    ///
    /// Nodes whose handle reports it cannot take focus are left out without
    /// consuming an index; one [`Diagnostic`] is returned for each.
    pub fn rebuild(&mut self, nodes: &[MenuNode]) -> Vec<Diagnostic> {
        self.clear();
        let mut diagnostics = Vec::new();
        let mut next_index = 0;

        for (position, item) in nodes.iter().flat_map(MenuNode::leaves).enumerate() {
            let handle = item.handle();
            if !handle.is_focusable() {
                diagnostics.push(Diagnostic::not_focusable(position, handle.text_content()));
                continue;
            }
            self.register(next_index, handle);
            next_index += 1;
        }

        tracing::trace!(
            message = "menu.registry.rebuild",
            size = self.size(),
            rejected = diagnostics.len()
        );
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_tree::{BasicItem, MenuItem};

    fn handles(texts: &[&str]) -> Vec<Rc<dyn MenuItemHandle>> {
        texts
            .iter()
            .map(|t| Rc::new(BasicItem::new(*t)) as Rc<dyn MenuItemHandle>)
            .collect()
    }

    #[test]
    fn register_and_get() {
        let items = handles(&["a", "b"]);
        let mut reg = ItemRegistry::new();
        reg.register(0, &items[0]);
        reg.register(1, &items[1]);
        assert_eq!(reg.size(), 2);
        assert_eq!(reg.get(1).map(|h| h.text_content()).as_deref(), Some("b"));
        assert!(reg.get(2).is_none());
    }

    #[test]
    fn register_same_index_overwrites() {
        let items = handles(&["a", "b"]);
        let mut reg = ItemRegistry::new();
        reg.register(0, &items[0]);
        reg.register(0, &items[1]);
        assert_eq!(reg.size(), 1);
        assert_eq!(reg.get(0).map(|h| h.text_content()).as_deref(), Some("b"));
    }

    #[test]
    fn groups_continue_index_sequence() {
        let items = handles(&["a", "b", "c", "d"]);
        let tree = vec![
            MenuNode::item(items[0].clone()),
            MenuNode::group("Group", [items[1].clone(), items[2].clone()]),
            MenuNode::Divider,
            MenuNode::item(items[3].clone()),
        ];
        let mut reg = ItemRegistry::new();
        assert!(reg.rebuild(&tree).is_empty());
        let texts: Vec<_> = reg.iter().map(|(i, h)| (i, h.text_content())).collect();
        assert_eq!(
            texts,
            vec![
                (0, "a".to_string()),
                (1, "b".to_string()),
                (2, "c".to_string()),
                (3, "d".to_string())
            ]
        );
    }

    #[test]
    fn rebuild_drops_removed_items() {
        let items = handles(&["a", "b", "c"]);
        let mut reg = ItemRegistry::new();
        reg.rebuild(&items.iter().cloned().map(MenuNode::item).collect::<Vec<_>>());
        assert_eq!(reg.size(), 3);

        reg.rebuild(&[MenuNode::item(items[2].clone())]);
        assert_eq!(reg.size(), 1);
        assert_eq!(reg.get(0).map(|h| h.text_content()).as_deref(), Some("c"));
        assert!(reg.get(1).is_none());
    }

    #[test]
    fn hidden_items_still_register() {
        let items = handles(&["a", "b"]);
        let tree = vec![
            MenuNode::Item(MenuItem::new(items[0].clone()).hidden(true)),
            MenuNode::item(items[1].clone()),
        ];
        let mut reg = ItemRegistry::new();
        reg.rebuild(&tree);
        assert_eq!(reg.size(), 2);
    }

    #[test]
    fn unfocusable_node_is_reported_and_skipped() {
        let a: Rc<dyn MenuItemHandle> = Rc::new(BasicItem::new("a"));
        let bad: Rc<dyn MenuItemHandle> = Rc::new(BasicItem::unfocusable("heading"));
        let b: Rc<dyn MenuItemHandle> = Rc::new(BasicItem::new("b"));
        let tree = vec![MenuNode::item(a), MenuNode::item(bad), MenuNode::item(b)];

        let mut reg = ItemRegistry::new();
        let diagnostics = reg.rebuild(&tree);
        assert_eq!(diagnostics, vec![Diagnostic::not_focusable(1, "heading")]);
        assert_eq!(reg.size(), 2);
        assert_eq!(reg.get(1).map(|h| h.text_content()).as_deref(), Some("b"));
    }

    #[test]
    fn registry_does_not_own_handles() {
        let mut reg = ItemRegistry::new();
        {
            let item: Rc<dyn MenuItemHandle> = Rc::new(BasicItem::new("gone"));
            reg.register(0, &item);
            assert!(reg.get(0).is_some());
        }
        assert_eq!(reg.size(), 1);
        assert!(reg.get(0).is_none());
        assert_eq!(reg.stale_indices(), vec![0]);
        assert_eq!(reg.iter().count(), 0);
    }

    #[test]
    fn rebuild_is_pure() {
        let items = handles(&["x", "y", "z"]);
        let tree: Vec<_> = items.iter().cloned().map(MenuNode::item).collect();
        let mut reg = ItemRegistry::new();
        reg.rebuild(&tree);
        let before: Vec<_> = reg.iter().map(|(i, h)| (i, Rc::as_ptr(&h) as *const ())).collect();

        reg.clear();
        assert_eq!(reg.size(), 0);
        reg.rebuild(&tree);
        let after: Vec<_> = reg.iter().map(|(i, h)| (i, Rc::as_ptr(&h) as *const ())).collect();
        assert_eq!(before, after);
    }
}
