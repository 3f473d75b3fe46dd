#![forbid(unsafe_code)]

//! Keyboard focus traversal over the active set.
//!
//! [`advance`] moves the focus cursor one step forward or backward through
//! the active set (the whole registry, or the current search matches),
//! skipping disabled entries. It never wraps around.
//!
//! # Invariants
//!
//! 1. A disabled handle is never focused.
//! 2. Over an all-enabled set, repeated [`Direction::Next`] from an unset
//!    cursor visits positions `0, 1, 2, …` with no skips and stops at the
//!    last position.
//! 3. The search for an enabled entry is a bounded loop: every iteration
//!    moves strictly toward the boundary, so it runs at most `len` times.
//!
//! # Boundary behavior
//!
//! If the search reaches the trailing boundary (last position for `Next`,
//! first for `Prev`) and that entry is disabled, nothing is focused and the
//! cursor is stepped one position back from the boundary. The returned
//! cursor may then point at a disabled entry; a further `Next` will land on
//! the same boundary again. This keeps focus where the user left it instead
//! of jumping.

use crate::registry::ItemRegistry;
use crate::search::ActiveSet;

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the end of the list.
    Next,
    /// Toward the start of the list.
    Prev,
}

/// Result of one traversal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Advance {
    /// New cursor position within the active set (`None` = unset).
    pub cursor: Option<usize>,
    /// Registry index of the item that received focus, if any.
    pub focused: Option<usize>,
}

impl Advance {
    const fn unfocused(cursor: Option<usize>) -> Self {
        Self {
            cursor,
            focused: None,
        }
    }
}

/// Step the cursor in `direction`, focusing the first enabled entry found.
///
/// Returns the unchanged cursor when the active set is empty. Entries whose
/// handle has been dropped are treated like disabled ones.
pub fn advance(
    direction: Direction,
    cursor: Option<usize>,
    active: ActiveSet<'_>,
    registry: &ItemRegistry,
) -> Advance {
    let len = active.len();
    if len == 0 {
        return Advance::unfocused(cursor);
    }
    let last = len - 1;
    let mut from = cursor;

    for _ in 0..len {
        let tentative = match direction {
            Direction::Next => from.map_or(0, |c| c.saturating_add(1).min(last)),
            Direction::Prev => from.map_or(0, |c| c.saturating_sub(1).min(last)),
        };

        let index = active.index_at(tentative);
        let target = index
            .and_then(|i| registry.get(i))
            .filter(|handle| !handle.is_disabled());
        if let Some(handle) = target {
            handle.focus();
            return Advance {
                cursor: Some(tentative),
                focused: index,
            };
        }

        match direction {
            Direction::Next if tentative < last => from = Some(tentative),
            Direction::Next => return Advance::unfocused(tentative.checked_sub(1)),
            Direction::Prev if tentative > 0 => from = Some(tentative),
            Direction::Prev => return Advance::unfocused(Some((tentative + 1).min(last))),
        }
    }

    Advance::unfocused(cursor)
}

/// Focus the first enabled entry.
pub fn first(active: ActiveSet<'_>, registry: &ItemRegistry) -> Advance {
    advance(Direction::Next, None, active, registry)
}

/// Focus the last enabled entry.
pub fn last(active: ActiveSet<'_>, registry: &ItemRegistry) -> Advance {
    let len = active.len();
    if len == 0 {
        return Advance::default();
    }
    advance(Direction::Prev, Some(len), active, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_tree::{BasicItem, MenuItemHandle, MenuNode};
    use std::rc::Rc;

    struct Fixture {
        items: Vec<Rc<BasicItem>>,
        registry: ItemRegistry,
    }

    /// `true` = enabled, `false` = disabled.
    fn fixture(enabled: &[bool]) -> Fixture {
        let items: Vec<Rc<BasicItem>> = enabled
            .iter()
            .enumerate()
            .map(|(i, &on)| {
                let item = BasicItem::new(format!("item {i}"));
                item.set_disabled(!on);
                Rc::new(item)
            })
            .collect();
        let nodes: Vec<_> = items
            .iter()
            .map(|i| MenuNode::item(i.clone() as Rc<dyn MenuItemHandle>))
            .collect();
        let mut registry = ItemRegistry::new();
        registry.rebuild(&nodes);
        Fixture { items, registry }
    }

    fn all(f: &Fixture) -> ActiveSet<'static> {
        ActiveSet::All(f.registry.size())
    }

    #[test]
    fn empty_set_is_noop() {
        let f = fixture(&[]);
        let out = advance(Direction::Next, Some(3), all(&f), &f.registry);
        assert_eq!(out, Advance::unfocused(Some(3)));
        assert_eq!(last(all(&f), &f.registry), Advance::default());
    }

    #[test]
    fn next_visits_each_enabled_in_order() {
        let f = fixture(&[true; 4]);
        let mut cursor = None;
        for expected in 0..4 {
            let out = advance(Direction::Next, cursor, all(&f), &f.registry);
            assert_eq!(out.cursor, Some(expected));
            assert_eq!(out.focused, Some(expected));
            cursor = out.cursor;
        }
        let out = advance(Direction::Next, cursor, all(&f), &f.registry);
        assert_eq!(out.cursor, Some(3), "no wraparound");
    }

    #[test]
    fn next_skips_disabled() {
        let f = fixture(&[true, false, true]);
        let a = advance(Direction::Next, None, all(&f), &f.registry);
        assert_eq!(a.cursor, Some(0));
        let b = advance(Direction::Next, a.cursor, all(&f), &f.registry);
        assert_eq!(b.cursor, Some(2));
        assert_eq!(f.items[1].focus_count(), 0);
        assert_eq!(f.items[2].focus_count(), 1);
    }

    #[test]
    fn prev_skips_disabled() {
        let f = fixture(&[true, false, true]);
        let out = advance(Direction::Prev, Some(2), all(&f), &f.registry);
        assert_eq!(out.cursor, Some(0));
        assert_eq!(out.focused, Some(0));
    }

    #[test]
    fn prev_from_unset_starts_at_zero() {
        let f = fixture(&[true, true]);
        let out = advance(Direction::Prev, None, all(&f), &f.registry);
        assert_eq!(out.cursor, Some(0));
    }

    #[test]
    fn trailing_disabled_steps_back_without_focus() {
        let f = fixture(&[true, true, false]);
        let out = advance(Direction::Next, Some(1), all(&f), &f.registry);
        assert_eq!(out, Advance::unfocused(Some(1)));
        assert_eq!(f.items[2].focus_count(), 0);
    }

    #[test]
    fn trailing_run_of_disabled_gets_stuck_short_of_boundary() {
        let f = fixture(&[true, false, false]);
        let out = advance(Direction::Next, Some(0), all(&f), &f.registry);
        assert_eq!(out, Advance::unfocused(Some(1)));
        let again = advance(Direction::Next, out.cursor, all(&f), &f.registry);
        assert_eq!(again, Advance::unfocused(Some(1)));
    }

    #[test]
    fn leading_disabled_steps_forward_without_focus() {
        let f = fixture(&[false, true, true]);
        let out = advance(Direction::Prev, Some(1), all(&f), &f.registry);
        assert_eq!(out, Advance::unfocused(Some(1)));
        assert_eq!(f.items[0].focus_count(), 0);
    }

    #[test]
    fn single_disabled_item() {
        let f = fixture(&[false]);
        assert_eq!(
            advance(Direction::Next, None, all(&f), &f.registry),
            Advance::unfocused(None)
        );
        assert_eq!(
            advance(Direction::Prev, None, all(&f), &f.registry),
            Advance::unfocused(Some(0))
        );
        assert_eq!(f.items[0].focus_count(), 0);
    }

    #[test]
    fn filtered_set_maps_to_registry_indices() {
        let f = fixture(&[true, true, true, true, true]);
        let matches = [1, 3];
        let active = ActiveSet::Filtered(&matches);
        let out = advance(Direction::Next, None, active, &f.registry);
        assert_eq!(out.cursor, Some(0));
        assert_eq!(out.focused, Some(1));
        assert_eq!(f.items[1].focus_count(), 1);
        let out = advance(Direction::Next, out.cursor, active, &f.registry);
        assert_eq!(out.cursor, Some(1));
        assert_eq!(out.focused, Some(3));
    }

    #[test]
    fn cursor_beyond_shrunken_set_is_clamped() {
        let f = fixture(&[true, true, true]);
        let out = advance(Direction::Next, Some(10), all(&f), &f.registry);
        assert_eq!(out.cursor, Some(2));
        let out = advance(Direction::Prev, Some(10), all(&f), &f.registry);
        assert_eq!(out.cursor, Some(2));
    }

    #[test]
    fn dropped_handle_is_skipped() {
        let mut f = fixture(&[true, true, true]);
        f.items.remove(1);
        let out = advance(Direction::Next, Some(0), all(&f), &f.registry);
        assert_eq!(out.cursor, Some(2));
    }

    #[test]
    fn first_and_last_find_enabled_edges() {
        let f = fixture(&[false, true, true, false]);
        assert_eq!(first(all(&f), &f.registry).cursor, Some(1));
        // Last is disabled: the search walks back to position 2.
        assert_eq!(last(all(&f), &f.registry).cursor, Some(2));
    }
}
