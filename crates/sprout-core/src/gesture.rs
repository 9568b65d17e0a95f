#![forbid(unsafe_code)]

//! Touch gesture recognition: resolves one touch stream into exactly one of
//! tap, long-press or drag.
//!
//! [`TouchGestureRecognizer`] is a per-touch state machine. The host feeds it
//! start/move/end/cancel updates and calls [`poll`](TouchGestureRecognizer::poll)
//! on its frame or timer tick so a stationary press can turn into a
//! long-press without any further input.
//!
//! # State Machine
//!
//! ```text
//!            start            deadline reached
//!   Idle ──────────▶ Pressed ─────────────────▶ LongPressed ──end──▶ Idle
//!                      │  │
//!                      │  └─ moved > slop ──▶ Dragging ──end──▶ Idle
//!                      │
//!                      └─ end ──▶ (Tapped) ──▶ Idle
//! ```
//!
//! `Tapped` is transient: it exists only for the duration of the `touch_end`
//! call that emits [`TouchGesture::Tap`].
//!
//! # Invariants
//!
//! 1. A touch emits at most one of `Tap`, `LongPress` or `DragStart`.
//! 2. `DragStart` is emitted at most once per touch.
//! 3. After `LongPress`, movement is ignored until the touch ends.
//! 4. `touch_cancel` and `reset` emit nothing and return to `Idle`.
//!
//! # Failure Modes
//!
//! - If the host never calls `poll`, an elapsed deadline is still honoured
//!   lazily on the next move or end of the same touch.

use web_time::{Duration, Instant};

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds shared by every touch.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Hold duration before a stationary press becomes a long press
    /// (default: 500ms).
    pub long_press_threshold: Duration,
    /// Displacement in pixels a touch must exceed before it becomes a drag
    /// (default: 10).
    pub touch_slop: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_threshold: Duration::from_millis(500),
            touch_slop: 10.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// The resolved meaning of a touch, emitted by the recognizer.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchGesture {
    /// Press and release without crossing the slop or the deadline.
    Tap { pos: Point },
    /// Press held past the long-press threshold.
    LongPress { pos: Point, duration: Duration },
    /// Movement crossed the slop. `origin` is where the touch began, which
    /// is where the drag pipeline must anchor its pointer offset.
    DragStart { origin: Point, current: Point },
    /// Subsequent movement of an active drag.
    DragMove { origin: Point, current: Point },
    /// The dragging touch was lifted.
    DragEnd { origin: Point, end: Point },
}

/// Current state of the per-touch machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TouchPhase {
    #[default]
    Idle,
    Pressed,
    LongPressed,
    Dragging,
}

// ---------------------------------------------------------------------------
// TouchGestureRecognizer
// ---------------------------------------------------------------------------

/// Stateful recognizer for a single touch point.
pub struct TouchGestureRecognizer {
    config: GestureConfig,
    phase: TouchPhase,
    origin: Point,
    pressed_at: Option<Instant>,
    long_press_deadline: Option<Instant>,
    drag_started: bool,
}

impl std::fmt::Debug for TouchGestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchGestureRecognizer")
            .field("phase", &self.phase)
            .field("origin", &self.origin)
            .finish()
    }
}

impl Default for TouchGestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl TouchGestureRecognizer {
    /// Create a recognizer with the given thresholds.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: TouchPhase::Idle,
            origin: Point::default(),
            pressed_at: None,
            long_press_deadline: None,
            drag_started: false,
        }
    }

    /// Begin tracking a touch. A start while another touch is still being
    /// tracked discards the old one silently.
    pub fn touch_start(&mut self, pos: Point, now: Instant) {
        self.reset();
        self.phase = TouchPhase::Pressed;
        self.origin = pos;
        self.pressed_at = Some(now);
        self.long_press_deadline = Some(now + self.config.long_press_threshold);
        trace_transition("pressed", pos);
    }

    /// Feed a movement of the tracked touch.
    pub fn touch_move(&mut self, pos: Point, now: Instant) -> Option<TouchGesture> {
        match self.phase {
            TouchPhase::Idle | TouchPhase::LongPressed => None,
            TouchPhase::Pressed => {
                if let Some(long_press) = self.fire_long_press_if_due(now) {
                    return Some(long_press);
                }
                if self.origin.distance(pos) <= self.config.touch_slop {
                    return None;
                }
                self.long_press_deadline = None;
                self.phase = TouchPhase::Dragging;
                if self.drag_started {
                    return None;
                }
                self.drag_started = true;
                trace_transition("dragging", pos);
                Some(TouchGesture::DragStart {
                    origin: self.origin,
                    current: pos,
                })
            }
            TouchPhase::Dragging => Some(TouchGesture::DragMove {
                origin: self.origin,
                current: pos,
            }),
        }
    }

    /// The tracked touch was lifted.
    pub fn touch_end(&mut self, pos: Point, now: Instant) -> Option<TouchGesture> {
        let out = match self.phase {
            TouchPhase::Idle | TouchPhase::LongPressed => None,
            TouchPhase::Pressed => match self.fire_long_press_if_due(now) {
                Some(long_press) => Some(long_press),
                None => {
                    trace_transition("tapped", self.origin);
                    Some(TouchGesture::Tap { pos: self.origin })
                }
            },
            TouchPhase::Dragging => Some(TouchGesture::DragEnd {
                origin: self.origin,
                end: pos,
            }),
        };
        self.reset();
        out
    }

    /// The platform cancelled the touch. Emits nothing.
    pub fn touch_cancel(&mut self) {
        if self.phase != TouchPhase::Idle {
            trace_transition("cancelled", self.origin);
        }
        self.reset();
    }

    /// Check the long-press deadline. Call on every host tick.
    pub fn poll(&mut self, now: Instant) -> Option<TouchGesture> {
        self.fire_long_press_if_due(now)
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    /// Whether the tracked touch has become a drag.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.phase == TouchPhase::Dragging
    }

    /// Where the tracked touch began.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Return to idle, clearing the timer and the drag guard.
    pub fn reset(&mut self) {
        self.phase = TouchPhase::Idle;
        self.pressed_at = None;
        self.long_press_deadline = None;
        self.drag_started = false;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Update the thresholds. Takes effect on the next touch start.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    fn fire_long_press_if_due(&mut self, now: Instant) -> Option<TouchGesture> {
        if self.phase != TouchPhase::Pressed {
            return None;
        }
        let deadline = self.long_press_deadline?;
        if now < deadline {
            return None;
        }
        self.long_press_deadline = None;
        self.phase = TouchPhase::LongPressed;
        trace_transition("long_pressed", self.origin);
        let duration = self
            .pressed_at
            .map(|at| now.duration_since(at))
            .unwrap_or(self.config.long_press_threshold);
        Some(TouchGesture::LongPress {
            pos: self.origin,
            duration,
        })
    }
}

#[cfg(feature = "tracing")]
fn trace_transition(state: &'static str, pos: Point) {
    tracing::trace!(target: "sprout.touch", state, x = pos.x, y = pos.y, "touch transition");
}

#[cfg(not(feature = "tracing"))]
#[inline]
fn trace_transition(_state: &'static str, _pos: Point) {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
