#![forbid(unsafe_code)]

//! Menu configuration.
//!
//! [`MenuConfig`] gathers every tunable of a menu: placement preference,
//! text direction, minimum width, the `searchable`/`dense`/`multiple`
//! flags, scroll locking, the search throttle delay, and who owns the open
//! flag. It is built with chained setters, or loaded from TOML with the
//! `config` feature:
//!
//! ```toml
//! placement = "end"       # "start" | "end"; anything else falls back to the direction default
//! direction = "rtl"       # "ltr" | "rtl"
//! min_width = 12
//! searchable = true
//! dense = false
//! multiple = false
//! lock_scroll = true
//! search_delay_ms = 250
//! controlled = false
//! default_open = false
//! ```
//!
//! ```rust,ignore
//! let config = MenuConfig::from_toml_file("menu.toml")?;
//! ```

use std::time::Duration;

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::Deserialize;

#[cfg(feature = "config")]
use crate::error::ConfigError;
use crate::placement::{Placement, TextDirection};
use crate::throttle::DEFAULT_SEARCH_DELAY;

/// Longest accepted search delay. Files over it fail validation; the
/// builder clamps to it.
pub const MAX_SEARCH_DELAY: Duration = Duration::from_secs(5);

/// Who owns the open flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// The consumer owns the flag. Internal close requests only notify;
    /// the menu closes when the consumer calls `set_open(false)`.
    Controlled,
    /// The engine owns the flag, starting from `default_open`.
    Uncontrolled {
        /// Whether the menu opens on mount.
        default_open: bool,
    },
}

impl Default for OpenMode {
    fn default() -> Self {
        Self::Uncontrolled {
            default_open: false,
        }
    }
}

impl OpenMode {
    /// Whether the consumer owns the flag.
    #[must_use]
    pub const fn is_controlled(self) -> bool {
        matches!(self, Self::Controlled)
    }
}

/// Configuration for a [`MenuEngine`](crate::menu::MenuEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Explicit placement; `None` derives it from `direction`.
    pub placement: Option<Placement>,
    /// Text direction of the surrounding content.
    pub direction: TextDirection,
    /// Minimum popup width in cells.
    pub min_width: u16,
    /// Whether the menu shows a search input.
    pub searchable: bool,
    /// Compact rendering hint for the styling layer.
    pub dense: bool,
    /// Whether clicking an item keeps the menu open (multi-select).
    pub multiple: bool,
    /// Whether to freeze page scrolling while open.
    pub lock_scroll: bool,
    /// Delay between typing and re-filtering.
    pub search_delay: Duration,
    /// Who owns the open flag.
    pub open_mode: OpenMode,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            placement: None,
            direction: TextDirection::Ltr,
            min_width: 0,
            searchable: false,
            dense: false,
            multiple: false,
            lock_scroll: false,
            search_delay: DEFAULT_SEARCH_DELAY,
            open_mode: OpenMode::default(),
        }
    }
}

impl MenuConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit placement.
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Set the text direction.
    #[must_use]
    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the minimum popup width.
    #[must_use]
    pub fn min_width(mut self, min_width: u16) -> Self {
        self.min_width = min_width;
        self
    }

    /// Enable or disable the search input.
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Enable or disable dense rendering.
    #[must_use]
    pub fn dense(mut self, dense: bool) -> Self {
        self.dense = dense;
        self
    }

    /// Enable or disable multi-select behavior.
    #[must_use]
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Enable or disable page scroll locking.
    #[must_use]
    pub fn lock_scroll(mut self, lock_scroll: bool) -> Self {
        self.lock_scroll = lock_scroll;
        self
    }

    /// Set the search throttle delay, clamped to [`MAX_SEARCH_DELAY`].
    #[must_use]
    pub fn search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay.min(MAX_SEARCH_DELAY);
        self
    }

    /// Set who owns the open flag.
    #[must_use]
    pub fn open_mode(mut self, mode: OpenMode) -> Self {
        self.open_mode = mode;
        self
    }

    /// Placement after applying the direction default.
    #[must_use]
    pub fn resolved_placement(&self) -> Placement {
        Placement::resolve(self.placement, self.direction)
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: MenuConfigFile = toml::from_str(s).map_err(ConfigError::Toml)?;
        file.into_config()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

/// On-disk shape of [`MenuConfig`].
#[cfg(feature = "config")]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MenuConfigFile {
    placement: Option<String>,
    direction: Option<String>,
    min_width: u16,
    searchable: bool,
    dense: bool,
    multiple: bool,
    lock_scroll: bool,
    search_delay_ms: Option<u64>,
    controlled: bool,
    default_open: bool,
}

#[cfg(feature = "config")]
impl MenuConfigFile {
    fn into_config(self) -> Result<MenuConfig, ConfigError> {
        let mut errors = Vec::new();

        let direction = match self.direction.as_deref() {
            None => TextDirection::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                errors.push(format!("direction: {err}"));
                TextDirection::default()
            }),
        };

        let placement = self
            .placement
            .as_deref()
            .map(|raw| Placement::parse_or_default(raw, direction));

        let search_delay = self
            .search_delay_ms
            .map_or(DEFAULT_SEARCH_DELAY, Duration::from_millis);
        if search_delay > MAX_SEARCH_DELAY {
            errors.push(format!(
                "search_delay_ms: {} exceeds the {} ms limit",
                search_delay.as_millis(),
                MAX_SEARCH_DELAY.as_millis()
            ));
        }

        if self.controlled && self.default_open {
            errors.push("default_open has no effect when controlled = true".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        let open_mode = if self.controlled {
            OpenMode::Controlled
        } else {
            OpenMode::Uncontrolled {
                default_open: self.default_open,
            }
        };

        Ok(MenuConfig {
            placement,
            direction,
            min_width: self.min_width,
            searchable: self.searchable,
            dense: self.dense,
            multiple: self.multiple,
            lock_scroll: self.lock_scroll,
            search_delay,
            open_mode,
        })
    }
}
