#![forbid(unsafe_code)]

//! Value selection on top of [`MenuEngine`].
//!
//! A [`Select`] owns a flat list of options and the chosen subset. Single
//! selection replaces the value and closes the menu; multiple selection
//! toggles membership and keeps the menu open. In multiple mode the chosen
//! values render as chips beside the anchor, so presses on the chip row
//! must not dismiss the menu. The select installs a dismiss override that
//! treats the areas reported through [`Select::set_chip_areas`] as inside.

use std::cell::RefCell;
use std::rc::Rc;

use popmenu_core::event::{Event, KeyCode, MouseEvent};
use popmenu_core::geometry::{Rect, Region};

use crate::config::MenuConfig;
use crate::dismiss::DismissTargets;
use crate::item_tree::{BasicItem, MenuItemHandle, MenuNode};
use crate::menu::{Anchor, MenuEngine, MenuHandlers};

/// One selectable option.
#[derive(Debug)]
pub struct SelectOption<V> {
    value: V,
    handle: Rc<BasicItem>,
}

impl<V> SelectOption<V> {
    /// The option's value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The option's label.
    #[must_use]
    pub fn label(&self) -> String {
        self.handle.text_content()
    }

    /// Whether the option can be chosen.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.handle.is_disabled()
    }

    /// The item handle registered with the menu.
    #[must_use]
    pub fn handle(&self) -> &Rc<BasicItem> {
        &self.handle
    }
}

/// A select box backed by a popup menu.
#[derive(Debug)]
pub struct Select<V> {
    engine: MenuEngine,
    options: Vec<SelectOption<V>>,
    selected: Vec<usize>,
    chips: Rc<RefCell<Vec<Rect>>>,
}

impl<V: PartialEq> Select<V> {
    /// Create an empty select.
    #[must_use]
    pub fn new(config: MenuConfig) -> Self {
        let chips: Rc<RefCell<Vec<Rect>>> = Rc::default();
        let multiple = config.multiple;
        let mut engine = MenuEngine::new(config);
        if multiple {
            let chip_row = Rc::clone(&chips);
            engine = engine.with_dismiss_override(Box::new(
                move |ev: &MouseEvent, targets: &DismissTargets<'_>| {
                    !targets.contains(ev) && !chip_row.borrow().contains_point(ev.x, ev.y)
                },
            ));
        }
        Self {
            engine,
            options: Vec::new(),
            selected: Vec::new(),
            chips,
        }
    }

    /// Attach the anchor element.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Rc<dyn Anchor>) -> Self {
        self.engine = self.engine.with_anchor(anchor);
        self
    }

    /// Set the viewport width.
    #[must_use]
    pub fn with_viewport_width(mut self, width: u16) -> Self {
        self.engine = self.engine.with_viewport_width(width);
        self
    }

    /// Install consumer notifications on the underlying menu.
    #[must_use]
    pub fn with_handlers(mut self, handlers: MenuHandlers) -> Self {
        self.engine = self.engine.with_handlers(handlers);
        self
    }

    /// Append an option.
    #[must_use]
    pub fn option(mut self, value: V, label: impl Into<String>) -> Self {
        self.push_option(value, BasicItem::new(label));
        self
    }

    /// Append an option that cannot be chosen.
    #[must_use]
    pub fn disabled_option(mut self, value: V, label: impl Into<String>) -> Self {
        self.push_option(value, BasicItem::disabled(label));
        self
    }

    fn push_option(&mut self, value: V, item: BasicItem) {
        self.options.push(SelectOption {
            value,
            handle: item.shared(),
        });
        self.sync_items();
    }

    /// The underlying menu.
    #[must_use]
    pub fn engine(&self) -> &MenuEngine {
        &self.engine
    }

    /// Mutable access to the underlying menu.
    pub fn engine_mut(&mut self) -> &mut MenuEngine {
        &mut self.engine
    }

    /// All options, in order.
    #[must_use]
    pub fn options(&self) -> &[SelectOption<V>] {
        &self.options
    }

    /// Whether more than one value may be chosen.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.engine.config().multiple
    }

    /// Open the menu and register the options.
    pub fn open(&mut self) {
        self.engine.request_open();
        self.sync_items();
    }

    /// Consumer-driven open flag (controlled selects).
    pub fn set_open(&mut self, open: bool) {
        self.engine.set_open(open);
        self.sync_items();
    }

    /// Close the menu.
    pub fn close(&mut self) {
        self.engine.set_open(false);
    }

    fn sync_items(&mut self) {
        if !self.engine.is_open() {
            return;
        }
        let nodes: Vec<MenuNode> = self
            .options
            .iter()
            .map(|o| MenuNode::item(Rc::clone(&o.handle) as Rc<dyn MenuItemHandle>))
            .collect();
        self.engine.set_items(&nodes);
    }

    /// Choose the option at `index` through the menu.
    ///
    /// Returns `false` when the menu is closed or the option is disabled.
    pub fn choose(&mut self, index: usize) -> bool {
        if !self.engine.click_item(index) {
            return false;
        }
        if self.is_multiple() {
            match self.selected.iter().position(|&i| i == index) {
                Some(pos) => {
                    self.selected.remove(pos);
                }
                None => self.selected.push(index),
            }
        } else {
            self.selected.clear();
            self.selected.push(index);
        }
        tracing::debug!(
            message = "select.choose",
            index,
            selected = self.selected.len()
        );
        true
    }

    /// Route a host event. Enter chooses the focused option.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if let Event::Key(key) = event
            && key.is_press()
            && key.code == KeyCode::Enter
            && self.engine.is_open()
        {
            return match self.engine.focused_item() {
                Some((index, _)) => self.choose(index),
                None => false,
            };
        }
        self.engine.handle_event(event)
    }

    /// Report where the chips of chosen values are drawn.
    pub fn set_chip_areas(&self, areas: Vec<Rect>) {
        *self.chips.borrow_mut() = areas;
    }

    /// Select `value` programmatically. Unknown values are ignored.
    pub fn select_value(&mut self, value: &V) -> bool {
        let Some(index) = self.options.iter().position(|o| &o.value == value) else {
            return false;
        };
        if self.is_multiple() {
            if !self.selected.contains(&index) {
                self.selected.push(index);
            }
        } else {
            self.selected = vec![index];
        }
        true
    }

    /// Remove `value` from the selection (a chip's remove button).
    pub fn deselect_value(&mut self, value: &V) -> bool {
        let before = self.selected.len();
        let options = &self.options;
        self.selected.retain(|&i| &options[i].value != value);
        before != self.selected.len()
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Chosen option indices, in choice order.
    #[must_use]
    pub fn selected_indices(&self) -> &[usize] {
        &self.selected
    }

    /// Chosen values, in choice order.
    #[must_use]
    pub fn selected_values(&self) -> Vec<&V> {
        self.selected.iter().map(|&i| &self.options[i].value).collect()
    }

    /// Chosen labels, in choice order.
    #[must_use]
    pub fn selected_labels(&self) -> Vec<String> {
        self.selected.iter().map(|&i| self.options[i].label()).collect()
    }

    /// The single chosen value.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.selected.first().map(|&i| &self.options[i].value)
    }
}
