#![forbid(unsafe_code)]

//! Initial positions for a batch of equally sized objects.

use sprout_core::geometry::{Point, Rect};

/// Top-left corners for `count` objects of `width × height`, laid out in
/// `ceil(sqrt(count))` columns from `margin`, `spacing` apart.
#[must_use]
pub fn arrange_batch(count: usize, width: f64, height: f64, margin: f64, spacing: f64) -> Vec<Point> {
    if count == 0 {
        return Vec::new();
    }
    let columns = batch_columns(count);
    (0..count)
        .map(|i| {
            let col = (i % columns) as f64;
            let row = (i / columns) as f64;
            Point::new(
                margin + col * (width + spacing),
                margin + row * (height + spacing),
            )
        })
        .collect()
}

/// Column count of a near-square batch.
#[must_use]
pub fn batch_columns(count: usize) -> usize {
    let mut columns = (count as f64).sqrt().ceil() as usize;
    // Guard against sqrt rounding just under a perfect square.
    while columns * columns < count {
        columns += 1;
    }
    columns.max(1)
}

/// Pull every member of a batch back inside `bounds`. `None` when the
/// objects are larger than `bounds` itself.
///
/// Members pushed against an edge may overlap their neighbours.
#[must_use]
pub fn clamp_batch(
    origins: &[Point],
    width: f64,
    height: f64,
    bounds: &Rect,
) -> Option<Vec<Point>> {
    origins
        .iter()
        .map(|origin| {
            Rect::new(origin.x, origin.y, width, height)
                .clamped_within(bounds)
                .map(|rect| rect.origin())
        })
        .collect()
}
