#![forbid(unsafe_code)]

//! The anchored popup menu engine.
//!
//! [`MenuEngine`] owns one menu's open/close lifecycle and the per-session
//! state that hangs off it: the item registry, the search query and its
//! result, and the focus cursor. It wires the pure pieces of this crate
//! ([`placement`](crate::placement), [`search`](crate::search),
//! [`navigator`](crate::navigator), [`dismiss`](crate::dismiss)) to the
//! host through a handful of capabilities: an [`Anchor`], an optional
//! [`ScrollLock`] service, and a [`ListenerHost`].
//!
//! # State machine
//!
//! ```text
//!            set_open(true) / request_open()
//!   Closed ─────────────────────────────────▶ Open ──┐ search, navigation
//!     ▲                                         │ ◀──┘ (geometry fixed)
//!     └─────────────────────────────────────────┘
//!      set_open(false), outside click, Escape, single-select item click
//! ```
//!
//! # Invariants
//!
//! 1. **Fresh sessions**: entering `Open` starts with an empty query, no
//!    search result, and an unset cursor; leaving `Open` clears the
//!    registry, query, result, and cursor.
//! 2. **Fixed geometry**: geometry is resolved once per open transition and
//!    never changes while open. A session that opened without an anchor
//!    resolves once an anchor is attached.
//! 3. **Scoped resources**: the scroll lock hold and the global listeners
//!    exist exactly while `Open`. Both are guards, so dropping an open
//!    engine releases them too.
//! 4. **Stale search discarded**: a throttled query still pending at close
//!    never applies to a later session.
//! 5. **One notification per transition**: `on_open` and `on_close` fire
//!    once per session, whether the transition was requested internally or
//!    applied by the consumer.
//!
//! # Controlled vs. uncontrolled
//!
//! Both modes share the transition routine. They differ only in what an
//! internal request does: an uncontrolled engine applies it, a controlled
//! engine notifies the consumer and waits for `set_open`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use popmenu_core::event::{Event, KeyCode, KeyEvent, MouseEvent};
use popmenu_core::geometry::{Rect, Region};
use web_time::Instant;

use crate::config::{MenuConfig, OpenMode};
use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::dismiss::{self, DismissOverride, DismissTargets};
use crate::item_tree::{MenuItemHandle, MenuNode};
use crate::listeners::{ListenerGuard, ListenerKind, ListenerRegistry, SharedListenerHost};
use crate::navigator::{self, Advance, Direction};
use crate::placement::{self, PopupGeometry};
use crate::registry::ItemRegistry;
use crate::scroll_lock::{ScrollLock, ScrollLockGuard};
use crate::search::{self, ActiveSet, SearchResult};
use crate::throttle::SearchThrottle;

/// Listener kinds attached while open.
const GLOBAL_LISTENERS: [ListenerKind; 2] = [ListenerKind::PointerDown, ListenerKind::KeyDown];

/// The element a menu is positioned against.
pub trait Anchor {
    /// Current bounds, or `None` if the element is not laid out yet.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Whether the cell at `(x, y)` belongs to the anchor.
    fn contains(&self, x: u16, y: u16) -> bool {
        self.bounding_rect().is_some_and(|r| r.contains(x, y))
    }

    /// Return input focus to the anchor (after Escape).
    fn focus(&self) {}
}

impl Anchor for Rect {
    fn bounding_rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

struct AnchorRegion<'a>(Option<&'a dyn Anchor>);

impl Region for AnchorRegion<'_> {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.0.is_some_and(|anchor| anchor.contains(x, y))
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    /// Not shown.
    #[default]
    Closed,
    /// Shown and listening.
    Open,
}

/// Why a close was requested or applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The consumer set the open flag to false.
    Consumer,
    /// A pointer press landed outside the menu.
    OutsideClick,
    /// Escape was pressed.
    EscapeKey,
    /// A single-select item was activated.
    ItemClick,
    /// Tab moved focus out of the menu.
    TabKey,
}

impl CloseReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::OutsideClick => "outside_click",
            Self::EscapeKey => "escape_key",
            Self::ItemClick => "item_click",
            Self::TabKey => "tab_key",
        }
    }
}

/// Flags handed to the styling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuFlags {
    /// Whether the popup is shown.
    pub open: bool,
    /// Whether a search input is shown.
    pub searchable: bool,
    /// Compact rendering.
    pub dense: bool,
}

type Notify = Box<dyn FnMut()>;
type NotifyMouse = Box<dyn FnMut(&MouseEvent)>;
type NotifyKey = Box<dyn FnMut(&KeyEvent)>;

/// Notifications the engine emits to its consumer.
#[derive(Default)]
pub struct MenuHandlers {
    on_open: Option<Notify>,
    on_close: Option<Notify>,
    on_outside_click: Option<NotifyMouse>,
    on_escape_key_down: Option<NotifyKey>,
}

impl MenuHandlers {
    /// Create an empty handler set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the menu opens (or, controlled, asks to open).
    #[must_use]
    pub fn on_open(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Called when the menu closes (or, controlled, asks to close).
    #[must_use]
    pub fn on_close(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Called for a pointer press that dismisses the menu.
    #[must_use]
    pub fn on_outside_click(mut self, f: impl FnMut(&MouseEvent) + 'static) -> Self {
        self.on_outside_click = Some(Box::new(f));
        self
    }

    /// Called for an Escape press while open.
    #[must_use]
    pub fn on_escape_key_down(mut self, f: impl FnMut(&KeyEvent) + 'static) -> Self {
        self.on_escape_key_down = Some(Box::new(f));
        self
    }

    fn open(&mut self) {
        if let Some(f) = self.on_open.as_mut() {
            f();
        }
    }

    fn close(&mut self) {
        if let Some(f) = self.on_close.as_mut() {
            f();
        }
    }
}

impl fmt::Debug for MenuHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuHandlers")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_outside_click", &self.on_outside_click.is_some())
            .field("on_escape_key_down", &self.on_escape_key_down.is_some())
            .finish()
    }
}

/// Per-open-session state. Reset on every close.
#[derive(Debug, Default)]
pub struct MenuSession {
    registry: ItemRegistry,
    search_query: String,
    applied_query: String,
    search_result: SearchResult,
    cursor: Option<usize>,
    excluded: usize,
}

impl MenuSession {
    /// The item registry.
    #[must_use]
    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    /// The search text as typed.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The current search result (`None` = no filter).
    #[must_use]
    pub fn search_result(&self) -> &SearchResult {
        &self.search_result
    }

    /// The focus cursor within the active set.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The active set for traversal.
    #[must_use]
    pub fn active_set(&self) -> ActiveSet<'_> {
        ActiveSet::new(&self.registry, &self.search_result)
    }

    fn reset(&mut self) {
        self.registry.clear();
        self.search_query.clear();
        self.applied_query.clear();
        self.search_result = None;
        self.cursor = None;
        self.excluded = 0;
    }

    fn refilter(&mut self) {
        self.search_result = search::filter(&self.registry, &self.applied_query);
    }
}

/// Anchored popup menu engine.
pub struct MenuEngine {
    config: MenuConfig,
    state: MenuState,
    session: MenuSession,
    geometry: Option<PopupGeometry>,
    geometry_pending: bool,
    anchor: Option<Rc<dyn Anchor>>,
    viewport_width: u16,
    popup_height: Option<u16>,
    throttle: SearchThrottle,
    scroll_lock: Option<Rc<ScrollLock>>,
    lock_guard: Option<ScrollLockGuard>,
    listener_host: SharedListenerHost,
    listener_guard: Option<ListenerGuard>,
    dismiss_override: Option<DismissOverride>,
    handlers: MenuHandlers,
    notified: Option<MenuState>,
    diagnostics: DiagnosticLog,
    mounted: bool,
}

impl fmt::Debug for MenuEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEngine")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("geometry", &self.geometry)
            .field("scroll_locked", &self.lock_guard.is_some())
            .field("listening", &self.listener_guard.is_some())
            .finish_non_exhaustive()
    }
}

impl MenuEngine {
    /// Create a closed engine with an internal listener registry.
    #[must_use]
    pub fn new(config: MenuConfig) -> Self {
        let throttle = SearchThrottle::new(config.search_delay);
        let listener_host: SharedListenerHost = ListenerRegistry::shared();
        Self {
            config,
            state: MenuState::Closed,
            session: MenuSession::default(),
            geometry: None,
            geometry_pending: false,
            anchor: None,
            viewport_width: u16::MAX,
            popup_height: None,
            throttle,
            scroll_lock: None,
            lock_guard: None,
            listener_host,
            listener_guard: None,
            dismiss_override: None,
            handlers: MenuHandlers::default(),
            notified: None,
            diagnostics: DiagnosticLog::default(),
            mounted: false,
        }
    }

    /// Attach the anchor element.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Rc<dyn Anchor>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Set the viewport width used to clamp the popup.
    #[must_use]
    pub fn with_viewport_width(mut self, width: u16) -> Self {
        self.viewport_width = width;
        self
    }

    /// Use a shared scroll lock service when `lock_scroll` is configured.
    #[must_use]
    pub fn with_scroll_lock(mut self, lock: Rc<ScrollLock>) -> Self {
        self.scroll_lock = Some(lock);
        self
    }

    /// Attach global listeners through the host instead of the internal
    /// registry.
    #[must_use]
    pub fn with_listener_host(mut self, host: SharedListenerHost) -> Self {
        self.listener_host = host;
        self
    }

    /// Install a custom outside-click hit test.
    #[must_use]
    pub fn with_dismiss_override(mut self, hit: DismissOverride) -> Self {
        self.dismiss_override = Some(hit);
        self
    }

    /// Install consumer notifications.
    #[must_use]
    pub fn with_handlers(mut self, handlers: MenuHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// Apply the initial open flag. Call once after wiring.
    ///
    /// For an uncontrolled engine with `default_open`, this opens the menu.
    /// Later calls do nothing.
    pub fn mount(&mut self) {
        if std::mem::replace(&mut self.mounted, true) {
            return;
        }
        if let OpenMode::Uncontrolled { default_open: true } = self.config.open_mode {
            self.transition(MenuState::Open, None);
        }
    }

    // --- Accessors ---

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    /// Per-session state.
    #[must_use]
    pub fn session(&self) -> &MenuSession {
        &self.session
    }

    /// The last resolved geometry.
    #[must_use]
    pub fn geometry(&self) -> Option<PopupGeometry> {
        self.geometry
    }

    /// Flags for the styling layer.
    #[must_use]
    pub fn flags(&self) -> MenuFlags {
        MenuFlags {
            open: self.is_open(),
            searchable: self.config.searchable,
            dense: self.config.dense,
        }
    }

    /// The popup's area as used for hit testing.
    ///
    /// Height is what the render layer reported through
    /// [`set_popup_height`](Self::set_popup_height), or one row per
    /// registered item plus the search input row when searchable.
    #[must_use]
    pub fn popup_area(&self) -> Option<Rect> {
        let height = self.popup_height.unwrap_or_else(|| {
            let rows = self.session.registry.size() + usize::from(self.config.searchable);
            u16::try_from(rows).unwrap_or(u16::MAX)
        });
        self.geometry.map(|g| g.area(height))
    }

    /// Whether global listeners are attached.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener_guard.is_some()
    }

    /// Whether this engine currently holds the scroll lock.
    #[must_use]
    pub fn holds_scroll_lock(&self) -> bool {
        self.lock_guard.is_some()
    }

    /// Recorded misuse diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Handle of the item under the cursor.
    #[must_use]
    pub fn focused_item(&self) -> Option<(usize, Rc<dyn MenuItemHandle>)> {
        let index = self.session.active_set().index_at(self.session.cursor?)?;
        self.session.registry.get(index).map(|h| (index, h))
    }

    // --- Host inputs ---

    /// Replace the anchor. Resolves geometry if the open session is still
    /// waiting for one.
    pub fn set_anchor(&mut self, anchor: Option<Rc<dyn Anchor>>) {
        self.anchor = anchor;
        if self.is_open() && self.geometry_pending {
            self.resolve_geometry();
        }
    }

    /// Update the viewport width. Takes effect at the next open.
    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
    }

    /// Report the rendered popup height.
    pub fn set_popup_height(&mut self, height: u16) {
        self.popup_height = Some(height);
    }

    // --- Lifecycle ---

    /// Consumer-driven open flag. Applies in both modes.
    pub fn set_open(&mut self, open: bool) {
        let target = if open {
            MenuState::Open
        } else {
            MenuState::Closed
        };
        self.transition(target, Some(CloseReason::Consumer));
    }

    /// Ask for the menu to open.
    ///
    /// Uncontrolled: opens. Controlled: fires `on_open` on every request
    /// and waits for the consumer to call `set_open(true)`.
    pub fn request_open(&mut self) {
        if self.is_open() {
            return;
        }
        if self.config.open_mode.is_controlled() {
            self.notified = Some(MenuState::Open);
            self.handlers.open();
        } else {
            self.transition(MenuState::Open, None);
        }
    }

    /// Ask for the menu to close.
    ///
    /// Uncontrolled: closes. Controlled: fires `on_close` on every request
    /// and waits for the consumer to call `set_open(false)`. A declined
    /// request leaves the menu open and the next one notifies again.
    pub fn request_close(&mut self, reason: CloseReason) {
        if !self.is_open() {
            return;
        }
        if self.config.open_mode.is_controlled() {
            self.notified = Some(MenuState::Closed);
            tracing::debug!(message = "menu.close_requested", reason = reason.as_str());
            self.handlers.close();
        } else {
            self.transition(MenuState::Closed, Some(reason));
        }
    }

    /// Open if closed, close if open (uncontrolled toggling of the anchor).
    pub fn toggle(&mut self) {
        if self.is_open() {
            self.request_close(CloseReason::Consumer);
        } else {
            self.request_open();
        }
    }

    fn transition(&mut self, target: MenuState, reason: Option<CloseReason>) {
        if self.state == target {
            return;
        }
        self.mounted = true;
        match target {
            MenuState::Open => self.enter_open(reason),
            MenuState::Closed => self.enter_closed(reason.unwrap_or(CloseReason::Consumer)),
        }
    }

    fn enter_open(&mut self, reason: Option<CloseReason>) {
        let span = tracing::debug_span!(
            "menu.open",
            reason = reason.map_or("request", CloseReason::as_str),
            items = tracing::field::Empty,
            scroll_locked = tracing::field::Empty
        );
        let _guard = span.enter();

        self.state = MenuState::Open;
        self.throttle.cancel();
        self.session.reset();
        self.resolve_geometry();

        if self.config.lock_scroll {
            match &self.scroll_lock {
                Some(lock) => self.lock_guard = Some(lock.acquire()),
                None => tracing::debug!(message = "menu.scroll_lock.unavailable"),
            }
        }
        self.listener_guard = Some(ListenerGuard::attach(&self.listener_host, &GLOBAL_LISTENERS));

        span.record("items", self.session.registry.size());
        span.record("scroll_locked", self.lock_guard.is_some());
        tracing::debug!(
            message = "menu.opened",
            geometry_pending = self.geometry_pending
        );

        if self.notified.take() != Some(MenuState::Open) {
            self.handlers.open();
        }
    }

    fn enter_closed(&mut self, reason: CloseReason) {
        let span = tracing::debug_span!(
            "menu.close",
            reason = reason.as_str(),
            items = self.session.registry.size(),
            scroll_locked = self.lock_guard.is_some()
        );
        let _guard = span.enter();

        let discarded_search = self.throttle.cancel();
        self.state = MenuState::Closed;
        self.lock_guard = None;
        self.listener_guard = None;
        self.session.reset();
        self.geometry_pending = false;

        tracing::debug!(message = "menu.closed", discarded_search);

        if self.notified.take() != Some(MenuState::Closed) {
            self.handlers.close();
        }
    }

    fn resolve_geometry(&mut self) {
        let Some(rect) = self.anchor.as_ref().and_then(|a| a.bounding_rect()) else {
            self.geometry_pending = true;
            tracing::trace!(message = "menu.geometry.deferred");
            return;
        };
        let geometry = placement::resolve(
            rect,
            self.config.resolved_placement(),
            self.config.min_width,
            self.viewport_width,
        );
        self.geometry = Some(geometry);
        self.geometry_pending = false;
        tracing::trace!(
            message = "menu.geometry",
            left = geometry.left,
            top = geometry.top,
            width = geometry.width
        );
    }

    // --- Items ---

    /// Rebuild the registry from the item tree (one render pass).
    ///
    /// Ignored while closed: items only mount into an open session.
    pub fn set_items(&mut self, nodes: &[MenuNode]) {
        if !self.is_open() {
            return;
        }
        let diagnostics = self.session.registry.rebuild(nodes);
        self.diagnostics.extend(diagnostics);
        self.session.refilter();
    }

    /// Start a render pass that registers items one by one.
    pub fn begin_registration(&mut self) {
        self.session.registry.clear();
        self.session.excluded = 0;
    }

    /// Register the item at document position `index` for the current
    /// render pass. Positions are expected in ascending order.
    ///
    /// A node that cannot take focus is reported and left out, and the
    /// positions after it shift down so registry indices stay contiguous.
    pub fn register_node(&mut self, index: usize, handle: &Rc<dyn MenuItemHandle>) {
        if !self.is_open() {
            return;
        }
        if !handle.is_focusable() {
            self.diagnostics
                .push(Diagnostic::not_focusable(index, handle.text_content()));
            self.session.excluded += 1;
            return;
        }
        let slot = index.saturating_sub(self.session.excluded);
        self.session.registry.register(slot, handle);
    }

    /// Finish a registration pass, re-deriving the search result.
    pub fn end_registration(&mut self) {
        for index in self.session.registry.stale_indices() {
            self.diagnostics.push(Diagnostic::stale_handle(index));
        }
        self.session.refilter();
    }

    // --- Search ---

    /// Record typed search text and schedule the filter.
    ///
    /// Ignored while closed or when the menu is not searchable.
    pub fn set_search_query(&mut self, query: impl Into<String>, now: Instant) {
        if !self.is_open() || !self.config.searchable {
            return;
        }
        let query = query.into();
        self.session.search_query.clone_from(&query);
        self.throttle.schedule(query, now);
    }

    /// Apply a due throttled query. Returns whether the filter changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.is_open() {
            self.throttle.cancel();
            return false;
        }
        match self.throttle.poll(now) {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    /// [`tick`](Self::tick) with the current time.
    pub fn tick_now(&mut self) -> bool {
        self.tick(Instant::now())
    }

    /// Apply any pending query immediately.
    pub fn flush_search(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.throttle.flush() {
            Some(query) => {
                self.apply_search(query);
                true
            }
            None => false,
        }
    }

    fn apply_search(&mut self, query: String) {
        self.session.applied_query = query;
        self.session.refilter();
        self.session.cursor = None;
        tracing::debug!(
            message = "menu.search",
            query_len = self.session.applied_query.chars().count(),
            matches = self.session.search_result.as_ref().map(Vec::len)
        );
    }

    // --- Navigation ---

    /// Move focus one step. No-op while closed.
    pub fn navigate(&mut self, direction: Direction) -> Advance {
        if !self.is_open() {
            return Advance {
                cursor: self.session.cursor,
                focused: None,
            };
        }
        let out = navigator::advance(
            direction,
            self.session.cursor,
            self.session.active_set(),
            &self.session.registry,
        );
        self.record_advance("navigate", out)
    }

    /// Focus the first enabled entry.
    pub fn focus_first(&mut self) -> Advance {
        if !self.is_open() {
            return Advance::default();
        }
        let out = navigator::first(self.session.active_set(), &self.session.registry);
        self.record_advance("first", out)
    }

    /// Focus the last enabled entry.
    pub fn focus_last(&mut self) -> Advance {
        if !self.is_open() {
            return Advance::default();
        }
        let out = navigator::last(self.session.active_set(), &self.session.registry);
        self.record_advance("last", out)
    }

    fn record_advance(&mut self, op: &'static str, out: Advance) -> Advance {
        tracing::trace!(
            message = "menu.navigate",
            op,
            from = self.session.cursor,
            to = out.cursor,
            focused = out.focused
        );
        self.session.cursor = out.cursor;
        out
    }

    // --- Activation ---

    /// Activate the item at registry `index`.
    ///
    /// Disabled or missing items are ignored. A single-select menu closes
    /// afterwards; a multi-select menu stays open.
    pub fn click_item(&mut self, index: usize) -> bool {
        if !self.is_open() {
            return false;
        }
        let Some(handle) = self.session.registry.get(index) else {
            return false;
        };
        if handle.is_disabled() {
            return false;
        }
        handle.click();
        if !self.config.multiple {
            self.request_close(CloseReason::ItemClick);
        }
        true
    }

    /// Activate the item under the cursor.
    pub fn activate_focused(&mut self) -> bool {
        match self.focused_item() {
            Some((index, _)) => self.click_item(index),
            None => false,
        }
    }

    // --- Dismissal ---

    /// Handle a global pointer press. Returns whether it dismissed.
    pub fn pointer_down(&mut self, event: &MouseEvent) -> bool {
        if !self.listening_for(ListenerKind::PointerDown) {
            return false;
        }
        let popup = self.popup_area();
        let anchor = AnchorRegion(self.anchor.as_deref());
        let targets = DismissTargets {
            popup: &popup,
            anchor: &anchor,
        };
        if !dismiss::should_dismiss(event, &targets, self.dismiss_override.as_ref()) {
            return false;
        }
        if let Some(f) = self.handlers.on_outside_click.as_mut() {
            f(event);
        }
        self.request_close(CloseReason::OutsideClick);
        true
    }

    /// Handle a global Escape press. Returns whether it dismissed.
    pub fn escape(&mut self, key: &KeyEvent) -> bool {
        if !self.listening_for(ListenerKind::KeyDown) || !dismiss::is_escape(key) {
            return false;
        }
        if let Some(f) = self.handlers.on_escape_key_down.as_mut() {
            f(key);
        }
        self.request_close(CloseReason::EscapeKey);
        if let Some(anchor) = &self.anchor {
            anchor.focus();
        }
        true
    }

    fn listening_for(&self, kind: ListenerKind) -> bool {
        self.listener_guard.as_ref().is_some_and(|g| g.covers(kind))
    }

    // --- Event routing ---

    /// [`handle_event_at`](Self::handle_event_at) with the current time.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        self.handle_event_at(event, Instant::now())
    }

    /// Route a host event. Returns whether the engine consumed it.
    ///
    /// Nothing is consumed while closed. Resizes are recorded but never
    /// consumed; they take effect at the next open. Typed characters and
    /// Backspace edit the search query of a searchable menu, scheduled
    /// against `now`. Tab closes the menu without consuming the key, so the
    /// host still moves focus.
    pub fn handle_event_at(&mut self, event: &Event, now: Instant) -> bool {
        if let Event::Resize { width, .. } = *event {
            self.set_viewport_width(width);
            return false;
        }
        if !self.is_open() {
            return false;
        }
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key, now),
            Event::Key(_) => false,
            Event::Mouse(mouse) => self.pointer_down(mouse),
            Event::Resize { .. } => false,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> bool {
        if let Some(c) = key.typed_char() {
            return self.edit_search(now, |query| query.push(c));
        }
        match key.code {
            KeyCode::Escape => self.escape(key),
            KeyCode::Backspace => self.edit_search(now, |query| {
                query.pop();
            }),
            KeyCode::Tab => {
                self.request_close(CloseReason::TabKey);
                false
            }
            KeyCode::Down => {
                self.navigate(Direction::Next);
                true
            }
            KeyCode::Up => {
                self.navigate(Direction::Prev);
                true
            }
            KeyCode::Home => {
                self.focus_first();
                true
            }
            KeyCode::End => {
                self.focus_last();
                true
            }
            KeyCode::Enter => self.activate_focused(),
            KeyCode::Char(_) => false,
        }
    }

    fn edit_search(&mut self, now: Instant, edit: impl FnOnce(&mut String)) -> bool {
        if !self.config.searchable {
            return false;
        }
        let mut query = self.session.search_query.clone();
        edit(&mut query);
        self.set_search_query(query, now);
        true
    }
}

/// Shared anchor backed by a mutable rectangle.
///
/// Hosts that lay the anchor out themselves keep one of these, update its
/// rectangle after layout, and hand a clone to the engine.
#[derive(Debug, Default)]
pub struct AnchorCell {
    rect: RefCell<Option<Rect>>,
    focus_count: std::cell::Cell<u32>,
}

impl AnchorCell {
    /// Create an anchor, optionally already laid out.
    #[must_use]
    pub fn new(rect: Option<Rect>) -> Rc<Self> {
        Rc::new(Self {
            rect: RefCell::new(rect),
            focus_count: std::cell::Cell::new(0),
        })
    }

    /// Update the laid-out bounds.
    pub fn set_rect(&self, rect: Option<Rect>) {
        *self.rect.borrow_mut() = rect;
    }

    /// How many times focus returned to the anchor.
    #[must_use]
    pub fn focus_count(&self) -> u32 {
        self.focus_count.get()
    }
}

impl Anchor for AnchorCell {
    fn bounding_rect(&self) -> Option<Rect> {
        *self.rect.borrow()
    }

    fn focus(&self) {
        self.focus_count.set(self.focus_count.get() + 1);
    }
}
