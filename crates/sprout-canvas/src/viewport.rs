#![forbid(unsafe_code)]

//! Zoom, pinch baseline and snap settings.
//!
//! Step buttons and pinch gestures write the same zoom value; every write
//! goes through one clamp.

use sprout_core::geometry::{Point, snap_point};

use crate::config::CanvasConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchBaseline {
    start_distance: f64,
    start_zoom: f64,
}

/// View transform and snapping state of a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    zoom_min: f64,
    zoom_max: f64,
    zoom_step: f64,
    snap_enabled: bool,
    fine_snap: bool,
    fine_unit: f64,
    pinch: Option<PinchBaseline>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl Viewport {
    /// Zoom bounds or units that could not be applied fall back to the
    /// defaults.
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        let defaults = CanvasConfig::default();
        let (zoom_min, zoom_max) = if config.zoom_min > 0.0 && config.zoom_max >= config.zoom_min
        {
            (config.zoom_min, config.zoom_max)
        } else {
            (defaults.zoom_min, defaults.zoom_max)
        };
        let positive = |value: f64, fallback: f64| {
            if value > 0.0 && value.is_finite() { value } else { fallback }
        };
        Self {
            zoom: 1.0_f64.clamp(zoom_min, zoom_max),
            zoom_min,
            zoom_max,
            zoom_step: positive(config.zoom_step, defaults.zoom_step),
            snap_enabled: true,
            fine_snap: false,
            fine_unit: positive(config.fine_snap_unit, defaults.fine_snap_unit),
            pinch: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set zoom, clamped to the configured range. Returns the value kept.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.zoom_min, self.zoom_max);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - self.zoom_step)
    }

    /// Screen pixels to plot inches.
    #[must_use]
    pub fn to_plot(&self, px: Point) -> Point {
        px.scaled_down(self.zoom)
    }

    /// Plot inches to screen pixels.
    #[must_use]
    pub fn to_screen(&self, plot: Point) -> Point {
        Point::new(plot.x * self.zoom, plot.y * self.zoom)
    }

    // --- Snapping -------------------------------------------------------

    #[must_use]
    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    #[must_use]
    pub fn fine_snap(&self) -> bool {
        self.fine_snap
    }

    pub fn set_fine_snap(&mut self, fine: bool) {
        self.fine_snap = fine;
    }

    /// Unit positions snap to: the fine unit in fine mode, otherwise the
    /// plot's grid unit.
    #[must_use]
    pub fn active_unit(&self, grid_unit: f64) -> f64 {
        if self.fine_snap {
            self.fine_unit
        } else {
            grid_unit
        }
    }

    /// Snap a plot-space point if snapping is on.
    #[must_use]
    pub fn snap(&self, point: Point, grid_unit: f64) -> Point {
        if self.snap_enabled {
            snap_point(point, self.active_unit(grid_unit))
        } else {
            point
        }
    }

    /// Distance a keyboard arrow press moves an object.
    #[must_use]
    pub fn keyboard_step(&self, grid_unit: f64) -> f64 {
        let unit = self.active_unit(grid_unit);
        if self.snap_enabled { unit } else { unit / 2.0 }
    }

    // --- Pinch ----------------------------------------------------------

    /// Record the baseline for a two-finger pinch. A zero distance cannot
    /// scale and is ignored.
    pub fn begin_pinch(&mut self, distance: f64) -> bool {
        if !(distance > f64::EPSILON) {
            return false;
        }
        self.pinch = Some(PinchBaseline {
            start_distance: distance,
            start_zoom: self.zoom,
        });
        true
    }

    /// Zoom for the current finger distance. `None` when no pinch is active.
    pub fn update_pinch(&mut self, distance: f64) -> Option<f64> {
        let baseline = self.pinch?;
        Some(self.set_zoom(distance / baseline.start_distance * baseline.start_zoom))
    }

    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_buttons_clamp() {
        let mut vp = Viewport::default();
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom(), 3.0);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom(), 0.3);
    }

    #[test]
    fn unusable_bounds_fall_back_to_defaults() {
        let inverted = CanvasConfig {
            zoom_min: 2.0,
            zoom_max: 1.0,
            ..CanvasConfig::default()
        };
        let mut vp = Viewport::new(&inverted);
        assert_eq!(vp.zoom(), 1.0);
        assert_eq!(vp.set_zoom(10.0), 3.0);

        let nan = CanvasConfig {
            zoom_min: f64::NAN,
            fine_snap_unit: f64::NAN,
            ..CanvasConfig::default()
        };
        let mut vp = Viewport::new(&nan);
        assert_eq!(vp.set_zoom(0.0), 0.3);
        vp.set_fine_snap(true);
        assert_eq!(vp.active_unit(12.0), 1.0);
    }

    #[test]
    fn set_zoom_ignores_nan() {
        let mut vp = Viewport::default();
        vp.set_zoom(2.0);
        assert_eq!(vp.set_zoom(f64::NAN), 2.0);
        assert_eq!(vp.set_zoom(f64::INFINITY), 2.0);
    }

    #[test]
    fn pinch_scales_from_baseline() {
        let mut vp = Viewport::default();
        vp.set_zoom(1.5);
        assert!(vp.begin_pinch(100.0));
        assert_eq!(vp.update_pinch(200.0), Some(3.0));
        assert_eq!(vp.update_pinch(50.0), Some(0.75));
        // Far beyond the range still clamps.
        assert_eq!(vp.update_pinch(1000.0), Some(3.0));
        assert_eq!(vp.update_pinch(1.0), Some(0.3));
        vp.end_pinch();
        assert_eq!(vp.update_pinch(100.0), None);
    }

    #[test]
    fn zero_distance_pinch_is_refused() {
        let mut vp = Viewport::default();
        assert!(!vp.begin_pinch(0.0));
        assert!(!vp.is_pinching());
    }

    #[test]
    fn pixels_map_through_zoom() {
        let mut vp = Viewport::default();
        vp.set_zoom(2.0);
        assert_eq!(vp.to_plot(Point::new(100.0, 50.0)), Point::new(50.0, 25.0));
        assert_eq!(vp.to_screen(Point::new(50.0, 25.0)), Point::new(100.0, 50.0));
    }

    #[test]
    fn active_unit_and_keyboard_step() {
        let mut vp = Viewport::default();
        assert_eq!(vp.active_unit(12.0), 12.0);
        assert_eq!(vp.keyboard_step(12.0), 12.0);
        vp.set_fine_snap(true);
        assert_eq!(vp.active_unit(12.0), 1.0);
        vp.set_fine_snap(false);
        vp.set_snap_enabled(false);
        assert_eq!(vp.keyboard_step(12.0), 6.0);
        assert_eq!(vp.snap(Point::new(5.0, 7.0), 12.0), Point::new(5.0, 7.0));
    }
}
