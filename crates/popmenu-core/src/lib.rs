#![forbid(unsafe_code)]

//! Core: geometry and input events for the popmenu engine.
//!
//! # Role in popmenu
//! `popmenu-core` is the input layer. It owns the cell-based [`Rect`]
//! used for anchor snapshots and hit testing, the [`Region`] containment
//! trait, and the normalized event types the engine consumes.
//!
//! # How it fits in the system
//! The engine (`popmenu`) consumes `popmenu_core::event::Event` values and
//! anchor rectangles. Hosts translate their toolkit's input into these
//! types, which keeps the engine free of any rendering or platform
//! dependency.
//!
//! [`Rect`]: geometry::Rect
//! [`Region`]: geometry::Region

pub mod event;
pub mod geometry;
