#![forbid(unsafe_code)]

//! Anchor-relative popup geometry.
//!
//! [`resolve`] computes where the popup goes given a snapshot of the anchor
//! rectangle, the horizontal [`Placement`], a minimum width, and the
//! viewport width. The popup always opens below the anchor; there is no
//! vertical flip and no recomputation while the menu stays open.
//!
//! # Width
//!
//! The popup is as wide as the anchor, but at least `min_width`, and never
//! wider than the space available on the aligned side:
//!
//! - `Start`: from the anchor's left edge to the viewport's right edge.
//! - `End`: from the viewport's left edge to the anchor's right edge.
//!
//! When `min_width` alone exceeds the available space, the available space
//! wins so the popup never spills past the viewport.
//!
//! # Direction
//!
//! [`resolve`] is direction-agnostic. Callers turn an explicit preference or
//! the text direction into a [`Placement`] first with
//! [`Placement::resolve`].

use std::fmt;
use std::str::FromStr;

use popmenu_core::geometry::Rect;

use crate::error::MenuError;

/// Which horizontal edge of the anchor the popup aligns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Align the popup's left edge with the anchor's left edge.
    Start,
    /// Align the popup's right edge with the anchor's right edge.
    End,
}

/// Text direction of the surrounding content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl TextDirection {
    /// Placement used when no explicit preference is given.
    #[must_use]
    pub const fn default_placement(self) -> Placement {
        match self {
            Self::Ltr => Placement::Start,
            Self::Rtl => Placement::End,
        }
    }
}

impl FromStr for TextDirection {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(MenuError::InvalidDirection(s.to_string())),
        }
    }
}

impl Placement {
    /// Explicit preference if given, otherwise derived from `direction`.
    #[must_use]
    pub const fn resolve(preference: Option<Placement>, direction: TextDirection) -> Self {
        match preference {
            Some(placement) => placement,
            None => direction.default_placement(),
        }
    }

    /// Parse a placement string, falling back to the direction default.
    ///
    /// Invalid input is logged and never fails.
    #[must_use]
    pub fn parse_or_default(value: &str, direction: TextDirection) -> Self {
        match value.parse() {
            Ok(placement) => placement,
            Err(err) => {
                let fallback = direction.default_placement();
                tracing::warn!(%err, ?fallback, "menu.placement.fallback");
                fallback
            }
        }
    }

    /// Mirror the placement.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

impl FromStr for Placement {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(MenuError::InvalidPlacement(s.to_string())),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::End => "end",
        })
    }
}

/// Resolved popup position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PopupGeometry {
    /// Left edge of the popup.
    pub left: u16,
    /// Top edge of the popup (the anchor's bottom edge).
    pub top: u16,
    /// Popup width.
    pub width: u16,
}

impl PopupGeometry {
    /// The popup's rectangle for a given rendered height.
    #[must_use]
    pub const fn area(&self, height: u16) -> Rect {
        Rect::new(self.left, self.top, self.width, height)
    }
}

/// Width available on the side `placement` aligns to.
#[must_use]
pub const fn available_width(anchor: Rect, placement: Placement, viewport_width: u16) -> u16 {
    match placement {
        Placement::Start => viewport_width.saturating_sub(anchor.left()),
        Placement::End => {
            let right = anchor.right();
            if right < viewport_width {
                right
            } else {
                viewport_width
            }
        }
    }
}

/// Compute popup geometry for `anchor`.
#[must_use]
pub fn resolve(
    anchor: Rect,
    placement: Placement,
    min_width: u16,
    viewport_width: u16,
) -> PopupGeometry {
    let available = available_width(anchor, placement, viewport_width);
    let width = anchor.width.max(min_width).min(available);
    let left = match placement {
        Placement::Start => anchor.left(),
        Placement::End => anchor.right().min(viewport_width).saturating_sub(width),
    };
    PopupGeometry {
        left,
        top: anchor.bottom(),
        width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_aligns_left_edges() {
        let anchor = Rect::new(10, 5, 20, 1);
        let geo = resolve(anchor, Placement::Start, 0, 80);
        assert_eq!(
            geo,
            PopupGeometry {
                left: 10,
                top: 6,
                width: 20
            }
        );
    }

    #[test]
    fn end_aligns_right_edges() {
        let anchor = Rect::new(10, 5, 20, 1);
        let geo = resolve(anchor, Placement::End, 30, 80);
        assert_eq!(geo.width, 30);
        assert_eq!(geo.left + geo.width, anchor.right());
        assert_eq!(geo.top, 6);
    }

    #[test]
    fn min_width_widens_narrow_anchor() {
        let anchor = Rect::new(0, 0, 4, 1);
        assert_eq!(resolve(anchor, Placement::Start, 12, 80).width, 12);
    }

    #[test]
    fn width_clamped_to_available_space() {
        let anchor = Rect::new(70, 0, 20, 1);
        let geo = resolve(anchor, Placement::Start, 0, 80);
        assert_eq!(geo.width, 10);
    }

    #[test]
    fn available_space_beats_min_width() {
        let anchor = Rect::new(75, 0, 2, 1);
        assert_eq!(resolve(anchor, Placement::Start, 20, 80).width, 5);
    }

    #[test]
    fn end_placement_mirrors_available_space() {
        let anchor = Rect::new(2, 0, 3, 1);
        let geo = resolve(anchor, Placement::End, 20, 80);
        assert_eq!(geo.width, 5);
        assert_eq!(geo.left, 0);
    }

    #[test]
    fn anchor_past_viewport_yields_zero_width() {
        let anchor = Rect::new(90, 0, 5, 1);
        assert_eq!(resolve(anchor, Placement::Start, 10, 80).width, 0);
    }

    #[test]
    fn direction_decides_default_placement() {
        assert_eq!(Placement::resolve(None, TextDirection::Ltr), Placement::Start);
        assert_eq!(Placement::resolve(None, TextDirection::Rtl), Placement::End);
        assert_eq!(
            Placement::resolve(Some(Placement::Start), TextDirection::Rtl),
            Placement::Start
        );
    }

    #[test]
    fn parse_accepts_known_values() {
        assert_eq!(" End ".parse::<Placement>(), Ok(Placement::End));
        assert_eq!("start".parse::<Placement>(), Ok(Placement::Start));
        assert_eq!("RTL".parse::<TextDirection>(), Ok(TextDirection::Rtl));
        assert!("sideways".parse::<TextDirection>().is_err());
    }

    #[test]
    fn invalid_placement_falls_back_to_direction() {
        assert_eq!(
            Placement::parse_or_default("middle", TextDirection::Rtl),
            Placement::End
        );
        assert_eq!(
            Placement::parse_or_default("bogus", TextDirection::Ltr),
            Placement::Start
        );
        assert_eq!(
            Placement::parse_or_default("end", TextDirection::Ltr),
            Placement::End
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for placement in [Placement::Start, Placement::End] {
            assert_eq!(placement.to_string().parse::<Placement>(), Ok(placement));
            assert_eq!(placement.mirrored().mirrored(), placement);
        }
    }

    #[test]
    fn area_uses_geometry() {
        let geo = PopupGeometry {
            left: 3,
            top: 4,
            width: 10,
        };
        assert_eq!(geo.area(6), Rect::new(3, 4, 10, 6));
    }
}
