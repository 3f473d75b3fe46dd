#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are cell based (0-indexed, origin at top-left). A [`Rect`]
//! doubles as the anchor snapshot handed to placement: `left`/`top` are
//! inclusive, `right`/`bottom` are exclusive.

/// A rectangle used for anchor snapshots, popup bounds, and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> u16 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> u16 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Anything that can answer "is this point inside me?".
///
/// Popup roots, anchors, and consumer-defined areas (a multi-select chip
/// row, for instance) all implement this so dismissal can test
/// containment without knowing what the node is.
pub trait Region {
    /// Whether the cell at `(x, y)` belongs to this region.
    fn contains_point(&self, x: u16, y: u16) -> bool;
}

impl Region for Rect {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.contains(x, y)
    }
}

impl<R: Region + ?Sized> Region for &R {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        (**self).contains_point(x, y)
    }
}

impl<R: Region> Region for Option<R> {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.as_ref().is_some_and(|r| r.contains_point(x, y))
    }
}

impl Region for [Rect] {
    fn contains_point(&self, x: u16, y: u16) -> bool {
        self.iter().any(|r| r.contains(x, y))
    }
}
