#![forbid(unsafe_code)]

//! Canonical input events fed to the menu engine.
//!
//! Hosts translate whatever their toolkit delivers (terminal input, a
//! browser-like DOM, a test script) into these types. The engine only
//! reacts to presses: key releases pass through untouched, and pointer
//! input arrives as presses only.
//!
//! # Design Notes
//!
//! - Mouse coordinates are 0-indexed cells in viewport space.
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - `Modifiers` are bitflags so hosts can combine them freely. A character
//!   typed with a command modifier held is a shortcut, not search text.

use bitflags::bitflags;

/// Input the engine understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input.
    Key(KeyEvent),

    /// Pointer press.
    Mouse(MouseEvent),

    /// The viewport changed size. Applies to the next open.
    Resize {
        /// Viewport width in cells.
        width: u16,
        /// Viewport height in cells.
        height: u16,
    },
}

/// Keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key.
    pub code: KeyCode,

    /// Held modifiers.
    pub modifiers: Modifiers,

    /// Press, repeat, or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A press of `code` with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Replace the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Press or auto-repeat; releases are ignored by navigation.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// The character this event types into a text input, if any.
    ///
    /// Shift is allowed; Ctrl, Alt, and Super turn the key into a shortcut.
    #[must_use]
    pub const fn typed_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.modifiers.intersects(Modifiers::COMMAND) => Some(c),
            _ => None,
        }
    }
}

/// Keys the menu reacts to, plus printable characters for search input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Activates the focused item.
    Enter,
    /// Dismisses the menu.
    Escape,
    /// Deletes the last character of the search input.
    Backspace,
    /// Moves focus out of the menu, closing it.
    Tab,
    /// Jump to the first enabled item.
    Home,
    /// Jump to the last enabled item.
    End,
    /// Previous item.
    Up,
    /// Next item.
    Down,
}

/// Whether a key went down, repeated, or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Initial press. Used when the host cannot tell.
    #[default]
    Press,
    /// Auto-repeat while held.
    Repeat,
    /// Key came up.
    Release,
}

bitflags! {
    /// Modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// None held.
        const NONE  = 0b0000;
        /// Shift.
        const SHIFT = 0b0001;
        /// Alt or Option.
        const ALT   = 0b0010;
        /// Control.
        const CTRL  = 0b0100;
        /// Super, Meta, or Command.
        const SUPER = 0b1000;
        /// Any modifier that turns a character key into a shortcut.
        const COMMAND = Self::ALT.bits() | Self::CTRL.bits() | Self::SUPER.bits();
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer press.
///
/// Only presses matter to a menu: they are what outside-click dismissal
/// tests. Hosts drop releases and motion before they reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Which button went down.
    pub button: MouseButton,
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl MouseEvent {
    /// A press of `button` at `(x, y)`.
    #[must_use]
    pub const fn new(button: MouseButton, x: u16, y: u16) -> Self {
        Self { button, x, y }
    }

    /// Left-button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: u16, y: u16) -> Self {
        Self::new(MouseButton::Left, x, y)
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary.
    Left,
    /// Secondary.
    Right,
    /// Wheel click.
    Middle,
}
