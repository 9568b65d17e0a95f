#![forbid(unsafe_code)]

//! Core: geometry, input events, gesture recognition, and length units.
//!
//! # Role in sprout
//! `sprout-core` is the leaf layer. It knows nothing about plots, beds or
//! plantings; it only provides the primitives the layout and canvas crates
//! build on.
//!
//! # Primary responsibilities
//! - **Geometry**: plot-space [`Point`](geometry::Point) and
//!   [`Rect`](geometry::Rect) with snapping and bounds clamping.
//! - **Event**: canonical pointer, touch and keyboard input.
//! - **Gesture**: the per-touch tap / long-press / drag state machine.
//! - **Units**: length units and `"WxH"` dimension parsing into inches.

pub mod event;
pub mod geometry;
pub mod gesture;
pub mod units;

pub use geometry::{Point, Rect};
pub use gesture::{GestureConfig, TouchGesture, TouchGestureRecognizer, TouchPhase};
pub use units::{DimensionParseError, LengthUnit, parse_dimensions};
