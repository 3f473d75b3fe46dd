#![forbid(unsafe_code)]

//! Outside-click and Escape dismissal.
//!
//! A pointer press dismisses the menu when it lands outside both the popup
//! and the anchor. Consumers whose control extends beyond those two areas
//! (a multi-select showing its chosen values as chips beside the input)
//! install a [`DismissOverride`] that decides instead.
//!
//! Escape always dismisses, override or not.

use popmenu_core::event::{KeyCode, KeyEvent, MouseEvent};
use popmenu_core::geometry::Region;

/// The areas a pointer press is tested against.
#[derive(Clone, Copy)]
pub struct DismissTargets<'a> {
    /// The popup's own area.
    pub popup: &'a dyn Region,
    /// The anchor element.
    pub anchor: &'a dyn Region,
}

impl DismissTargets<'_> {
    /// Whether the press landed in the popup or the anchor.
    #[must_use]
    pub fn contains(&self, event: &MouseEvent) -> bool {
        self.popup.contains_point(event.x, event.y) || self.anchor.contains_point(event.x, event.y)
    }
}

impl std::fmt::Debug for DismissTargets<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissTargets").finish_non_exhaustive()
    }
}

/// Custom hit test. Returns `true` when the press should dismiss the menu.
pub type DismissOverride = Box<dyn Fn(&MouseEvent, &DismissTargets<'_>) -> bool>;

/// Decide whether a pointer press dismisses the menu.
///
/// With an override, its answer is final. Without one, the press dismisses
/// when it is outside both targets.
#[must_use]
pub fn should_dismiss(
    event: &MouseEvent,
    targets: &DismissTargets<'_>,
    override_hit: Option<&DismissOverride>,
) -> bool {
    match override_hit {
        Some(hit) => hit(event, targets),
        None => !targets.contains(event),
    }
}

/// Whether `key` is an Escape press.
#[must_use]
pub fn is_escape(key: &KeyEvent) -> bool {
    key.code == KeyCode::Escape && key.is_press()
}
