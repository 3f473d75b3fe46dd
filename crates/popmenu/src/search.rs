#![forbid(unsafe_code)]

//! Text search over the registered items.
//!
//! [`filter`] narrows the registry to the indices whose text contains the
//! query, case-insensitively. The result distinguishes "no filter" from
//! "filter matched nothing":
//!
//! - `None`: the query is empty; the active set is the whole registry.
//! - `Some(vec![])`: a filter is active and nothing matched.
//!
//! The function is pure over `(registry, query)` and is recomputed from
//! scratch whenever either changes. Throttling fast typing is the caller's
//! job; see [`SearchThrottle`](crate::throttle::SearchThrottle).

use crate::registry::ItemRegistry;

/// Ordered matching indices, or `None` when no filter is active.
pub type SearchResult = Option<Vec<usize>>;

/// Filter the registry by `query`.
///
/// Indices are returned in ascending (document) order. Every returned index
/// is registered in `registry` at the time of the call.
#[must_use]
pub fn filter(registry: &ItemRegistry, query: &str) -> SearchResult {
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    Some(
        registry
            .iter()
            .filter(|(_, handle)| handle.text_content().to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect(),
    )
}

/// The index universe eligible for focus traversal.
///
/// Positions within an active set are what the focus cursor counts; they
/// map to registry indices through [`ActiveSet::index_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSet<'a> {
    /// No filter: positions are registry indices `0..len`.
    All(usize),
    /// Filter active: positions index into the matching registry indices.
    Filtered(&'a [usize]),
}

impl<'a> ActiveSet<'a> {
    /// Build the active set for a registry and its current search result.
    #[must_use]
    pub fn new(registry: &ItemRegistry, result: &'a SearchResult) -> Self {
        match result {
            Some(indices) => Self::Filtered(indices),
            None => Self::All(registry.size()),
        }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::All(len) => *len,
            Self::Filtered(indices) => indices.len(),
        }
    }

    /// Whether there is nothing to traverse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registry index at `position`, if in range.
    #[must_use]
    pub fn index_at(&self, position: usize) -> Option<usize> {
        match self {
            Self::All(len) => (position < *len).then_some(position),
            Self::Filtered(indices) => indices.get(position).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_tree::{BasicItem, MenuItemHandle, MenuNode};
    use std::rc::Rc;

    fn fruit() -> (Vec<Rc<dyn MenuItemHandle>>, ItemRegistry) {
        let items: Vec<Rc<dyn MenuItemHandle>> = ["Banana", "Apple", "Cherry", "Grape", "Kiwi"]
            .into_iter()
            .map(|t| Rc::new(BasicItem::new(t)) as Rc<dyn MenuItemHandle>)
            .collect();
        let mut reg = ItemRegistry::new();
        reg.rebuild(&items.iter().cloned().map(MenuNode::item).collect::<Vec<_>>());
        (items, reg)
    }

    #[test]
    fn empty_query_is_no_filter() {
        let (_items, reg) = fruit();
        assert_eq!(filter(&reg, ""), None);
    }

    #[test]
    fn substring_case_insensitive() {
        let (_items, reg) = fruit();
        assert_eq!(filter(&reg, "ap"), Some(vec![1, 3]));
        assert_eq!(filter(&reg, "AP"), Some(vec![1, 3]));
        assert_eq!(filter(&reg, "an"), Some(vec![0]));
    }

    #[test]
    fn no_match_is_empty_not_none() {
        let (_items, reg) = fruit();
        assert_eq!(filter(&reg, "zzz"), Some(vec![]));
    }

    #[test]
    fn filter_is_idempotent() {
        let (_items, reg) = fruit();
        assert_eq!(filter(&reg, "r"), filter(&reg, "r"));
    }

    #[test]
    fn results_exist_in_registry() {
        let (_items, reg) = fruit();
        for index in filter(&reg, "a").unwrap_or_default() {
            assert!(reg.get(index).is_some());
        }
    }

    #[test]
    fn dropped_items_never_match() {
        let (mut items, reg) = fruit();
        items.remove(1);
        assert_eq!(filter(&reg, "ap"), Some(vec![3]));
    }

    #[test]
    fn active_set_maps_positions() {
        let (_items, reg) = fruit();
        let none: SearchResult = None;
        let all = ActiveSet::new(&reg, &none);
        assert_eq!(all.len(), 5);
        assert_eq!(all.index_at(4), Some(4));
        assert_eq!(all.index_at(5), None);

        let some: SearchResult = Some(vec![1, 3]);
        let filtered = ActiveSet::new(&reg, &some);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.index_at(1), Some(3));
        assert!(!filtered.is_empty());

        let empty: SearchResult = Some(vec![]);
        assert!(ActiveSet::new(&reg, &empty).is_empty());
    }
}
