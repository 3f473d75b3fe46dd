#![forbid(unsafe_code)]

//! Headless anchored popup menu engine.
//!
//! # Role in popmenu
//! This crate owns everything between "the anchor was activated" and "the
//! menu closed": where the popup goes, which items it holds, what the search
//! filter matches, which item has focus, and when outside input dismisses
//! it. Rendering stays with the host; the engine hands back geometry and
//! [`MenuFlags`] and consumes [`popmenu_core::event::Event`] values.
//!
//! # Usage
//!
//! ```rust,ignore
//! use popmenu::{MenuConfig, MenuEngine, MenuNode, BasicItem};
//! use popmenu_core::geometry::Rect;
//! use std::rc::Rc;
//!
//! let anchor = Rc::new(Rect::new(4, 1, 12, 1));
//! let mut menu = MenuEngine::new(MenuConfig::new().searchable(true))
//!     .with_anchor(anchor)
//!     .with_viewport_width(80);
//! menu.set_open(true);
//! let copy = BasicItem::new("Copy").shared();
//! menu.set_items(&[MenuNode::item(copy)]);
//! ```

pub mod config;
pub mod diagnostics;
pub mod dismiss;
pub mod error;
pub mod item_tree;
pub mod listeners;
pub mod menu;
pub mod navigator;
pub mod placement;
pub mod registry;
pub mod scroll_lock;
pub mod search;
pub mod select;
pub mod throttle;

pub use config::{MenuConfig, OpenMode};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog};
pub use dismiss::{DismissOverride, DismissTargets};
pub use error::{ConfigError, MenuError};
pub use item_tree::{BasicItem, MenuItem, MenuItemHandle, MenuNode};
pub use listeners::{ListenerHost, ListenerKind, ListenerRegistry, SharedListenerHost};
pub use menu::{
    Anchor, AnchorCell, CloseReason, MenuEngine, MenuFlags, MenuHandlers, MenuSession, MenuState,
};
pub use navigator::{Advance, Direction};
pub use placement::{Placement, PopupGeometry, TextDirection};
pub use registry::ItemRegistry;
pub use scroll_lock::{ScrollLock, ScrollLockGuard, ScrollSurface};
pub use search::{ActiveSet, SearchResult};
pub use select::{Select, SelectOption};
pub use throttle::SearchThrottle;
