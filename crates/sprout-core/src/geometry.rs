#![forbid(unsafe_code)]

//! Geometric primitives in plot space.
//!
//! All coordinates are inches with the origin at the plot's top-left corner
//! and `y` growing downward. Screen pixels are converted to plot space by
//! the canvas viewport before reaching these types.

use std::ops::{Add, Sub};

/// A point in plot space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Divide both axes by `factor`.
    ///
    /// Used to map screen pixels into plot space at a given zoom.
    #[inline]
    #[must_use]
    pub fn scaled_down(self, factor: f64) -> Self {
        Self::new(self.x / factor, self.y / factor)
    }

    /// Midpoint between two points.
    #[inline]
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle for object footprints, plot bounds and hit
/// testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Create a rectangle of the given size centered on `center`.
    #[must_use]
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether the interiors of two rectangles overlap. Shared edges do not
    /// count as overlap.
    #[inline]
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether this rectangle lies entirely inside `bounds`.
    #[must_use]
    pub fn fits_within(&self, bounds: &Rect) -> bool {
        self.x >= bounds.x
            && self.y >= bounds.y
            && self.right() <= bounds.right()
            && self.bottom() <= bounds.bottom()
    }

    /// Whether a rectangle of this size could be placed inside `bounds` at
    /// some position.
    #[must_use]
    pub fn size_fits(&self, bounds: &Rect) -> bool {
        self.width <= bounds.width && self.height <= bounds.height
    }

    /// Move the rectangle so it lies inside `bounds`, keeping its size.
    ///
    /// Returns `None` when the rectangle is larger than `bounds` on either
    /// axis.
    #[must_use]
    pub fn clamped_within(&self, bounds: &Rect) -> Option<Rect> {
        if !self.size_fits(bounds) {
            return None;
        }
        let x = self.x.clamp(bounds.x, bounds.right() - self.width);
        let y = self.y.clamp(bounds.y, bounds.bottom() - self.height);
        Some(Rect::new(x, y, self.width, self.height))
    }

    /// Same rectangle at a new top-left corner.
    #[inline]
    #[must_use]
    pub const fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Same position with width and height exchanged.
    #[inline]
    #[must_use]
    pub const fn transposed(&self) -> Rect {
        Rect::new(self.x, self.y, self.height, self.width)
    }
}

/// Round `value` to the nearest multiple of `unit`.
///
/// A non-positive unit leaves the value untouched.
#[inline]
#[must_use]
pub fn snap(value: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        return value;
    }
    (value / unit).round() * unit
}

/// Snap both axes of a point to the nearest multiple of `unit`.
#[inline]
#[must_use]
pub fn snap_point(point: Point, unit: f64) -> Point {
    Point::new(snap(point.x, unit), snap(point.y, unit))
}
