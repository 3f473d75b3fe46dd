#![forbid(unsafe_code)]

//! Menu items and the tagged item tree.
//!
//! A consumer describes its menu content explicitly as a slice of
//! [`MenuNode`]s: leaf items, titled groups of items, and dividers. The
//! registry walks this tree in document order to assign indices, so no
//! runtime inspection of child types is ever needed.
//!
//! Every leaf carries a [`MenuItemHandle`]: the capability the engine uses
//! to read an item's text and disabled flag and to focus or click it. The
//! item owns its handle (`Rc`); the engine only ever keeps `Weak`
//! references for the duration of an open session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Capability exposed by every focusable menu item.
///
/// All methods take `&self`; implementations use interior mutability for
/// whatever state `focus`/`click` touch. The engine is single-threaded.
pub trait MenuItemHandle {
    /// Whether the item refuses focus and activation.
    fn is_disabled(&self) -> bool;

    /// The item's visible text, used by search.
    fn text_content(&self) -> String;

    /// Move input focus to this item.
    fn focus(&self);

    /// Activate this item.
    fn click(&self);

    /// Whether this node can take focus at all.
    ///
    /// Returning `false` marks the node as something that should never have
    /// been presented as a menu item; the registry reports it and leaves it
    /// out instead of registering it.
    fn is_focusable(&self) -> bool {
        true
    }
}

/// A leaf entry in the item tree.
#[derive(Clone)]
pub struct MenuItem {
    handle: Rc<dyn MenuItemHandle>,
    hidden: bool,
}

impl MenuItem {
    /// Wrap a handle as a visible item.
    #[must_use]
    pub fn new(handle: Rc<dyn MenuItemHandle>) -> Self {
        Self {
            handle,
            hidden: false,
        }
    }

    /// Mark the item hidden.
    ///
    /// Hidden items are not drawn but still occupy their index in the
    /// registry; only items removed from the tree lose their index.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// The item's handle.
    #[must_use]
    pub fn handle(&self) -> &Rc<dyn MenuItemHandle> {
        &self.handle
    }

    /// Whether the item is hidden.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("text", &self.handle.text_content())
            .field("disabled", &self.handle.is_disabled())
            .field("hidden", &self.hidden)
            .finish()
    }
}

/// One node of the menu content tree.
#[derive(Debug, Clone)]
pub enum MenuNode {
    /// An indexable leaf item.
    Item(MenuItem),
    /// A titled group. The title is not indexable; the children continue
    /// the surrounding index sequence.
    Group {
        /// Group heading text.
        label: String,
        /// Items in this group.
        items: Vec<MenuItem>,
    },
    /// A visual separator. Never indexed.
    Divider,
}

impl MenuNode {
    /// Leaf node from a handle.
    #[must_use]
    pub fn item(handle: Rc<dyn MenuItemHandle>) -> Self {
        Self::Item(MenuItem::new(handle))
    }

    /// Group node from a label and handles.
    #[must_use]
    pub fn group(
        label: impl Into<String>,
        handles: impl IntoIterator<Item = Rc<dyn MenuItemHandle>>,
    ) -> Self {
        Self::Group {
            label: label.into(),
            items: handles.into_iter().map(MenuItem::new).collect(),
        }
    }

    /// Iterate the leaf items under this node in document order.
    pub fn leaves(&self) -> impl Iterator<Item = &MenuItem> {
        let slice: &[MenuItem] = match self {
            Self::Item(item) => std::slice::from_ref(item),
            Self::Group { items, .. } => items,
            Self::Divider => &[],
        };
        slice.iter()
    }
}

/// A plain text item that records how often it was focused and clicked.
///
/// Hosts without their own item widgets can use this directly; it is also
/// what the engine's tests drive.
#[derive(Debug)]
pub struct BasicItem {
    text: RefCell<String>,
    disabled: Cell<bool>,
    focusable: Cell<bool>,
    focus_count: Cell<u32>,
    click_count: Cell<u32>,
}

impl BasicItem {
    /// Create an enabled, focusable item.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: RefCell::new(text.into()),
            disabled: Cell::new(false),
            focusable: Cell::new(true),
            focus_count: Cell::new(0),
            click_count: Cell::new(0),
        }
    }

    /// Create a disabled item.
    #[must_use]
    pub fn disabled(text: impl Into<String>) -> Self {
        let item = Self::new(text);
        item.disabled.set(true);
        item
    }

    /// Create a node that cannot take focus (a misuse when used as an item).
    #[must_use]
    pub fn unfocusable(text: impl Into<String>) -> Self {
        let item = Self::new(text);
        item.focusable.set(false);
        item
    }

    /// Wrap in an `Rc` ready to hand to [`MenuNode::item`].
    #[must_use]
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Change the disabled flag.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    /// Replace the item's text.
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    /// How many times `focus` has been called.
    #[must_use]
    pub fn focus_count(&self) -> u32 {
        self.focus_count.get()
    }

    /// How many times `click` has been called.
    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.click_count.get()
    }
}

impl MenuItemHandle for BasicItem {
    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    fn text_content(&self) -> String {
        self.text.borrow().clone()
    }

    fn focus(&self) {
        self.focus_count.set(self.focus_count.get() + 1);
    }

    fn click(&self) {
        self.click_count.set(self.click_count.get() + 1);
    }

    fn is_focusable(&self) -> bool {
        self.focusable.get()
    }
}
