//! Property-based invariant tests for the touch gesture recognizer.
//!
//! 1. A single touch resolves to at most one of Tap / LongPress / DragStart.
//! 2. DragMove and DragEnd only ever follow a DragStart.
//! 3. The recognizer is Idle after every end or cancel.
//! 4. No panics on arbitrary move sequences.

use proptest::prelude::*;
use sprout_core::geometry::Point;
use sprout_core::gesture::{TouchGesture, TouchGestureRecognizer, TouchPhase};
use web_time::{Duration, Instant};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Move { dx: f64, dy: f64, after_ms: u64 },
    Poll { after_ms: u64 },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (-40.0f64..40.0, -40.0f64..40.0, 0u64..200)
            .prop_map(|(dx, dy, after_ms)| Step::Move { dx, dy, after_ms }),
        (0u64..400).prop_map(|after_ms| Step::Poll { after_ms }),
    ]
}

fn is_resolution(gesture: &TouchGesture) -> bool {
    matches!(
        gesture,
        TouchGesture::Tap { .. } | TouchGesture::LongPress { .. } | TouchGesture::DragStart { .. }
    )
}

fn run_touch(steps: &[Step], end_after_ms: u64, cancel: bool) -> Vec<TouchGesture> {
    let mut gr = TouchGestureRecognizer::default();
    let start = Point::new(100.0, 100.0);
    let mut t = Instant::now();
    let mut out = Vec::new();

    gr.touch_start(start, t);
    let mut pos = start;
    for step in steps {
        match *step {
            Step::Move { dx, dy, after_ms } => {
                t += Duration::from_millis(after_ms);
                pos = Point::new(pos.x + dx, pos.y + dy);
                out.extend(gr.touch_move(pos, t));
            }
            Step::Poll { after_ms } => {
                t += Duration::from_millis(after_ms);
                out.extend(gr.poll(t));
            }
        }
    }

    t += Duration::from_millis(end_after_ms);
    if cancel {
        gr.touch_cancel();
    } else {
        out.extend(gr.touch_end(pos, t));
    }
    assert_eq!(gr.phase(), TouchPhase::Idle);
    out
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn one_resolution_per_touch(
        steps in prop::collection::vec(step_strategy(), 0..24),
        end_after_ms in 0u64..800,
    ) {
        let out = run_touch(&steps, end_after_ms, false);
        let resolutions = out.iter().filter(|g| is_resolution(g)).count();
        prop_assert!(resolutions <= 1, "got {out:?}");
        // An ended touch always resolves to something.
        prop_assert_eq!(resolutions, 1, "got {:?}", out);
    }

    #[test]
    fn drag_events_are_well_formed(
        steps in prop::collection::vec(step_strategy(), 0..24),
        end_after_ms in 0u64..800,
    ) {
        let out = run_touch(&steps, end_after_ms, false);
        let mut started = false;
        for gesture in &out {
            match gesture {
                TouchGesture::DragStart { .. } => {
                    prop_assert!(!started);
                    started = true;
                }
                TouchGesture::DragMove { .. } | TouchGesture::DragEnd { .. } => {
                    prop_assert!(started);
                }
                _ => {}
            }
        }
        let ends = out.iter().filter(|g| matches!(g, TouchGesture::DragEnd { .. })).count();
        prop_assert_eq!(ends, usize::from(started));
    }

    #[test]
    fn cancel_never_taps(
        steps in prop::collection::vec(step_strategy(), 0..12),
    ) {
        let out = run_touch(&steps, 0, true);
        prop_assert!(!out.iter().any(|g| matches!(g, TouchGesture::Tap { .. })), "unexpected Tap");
        prop_assert!(!out.iter().any(|g| matches!(g, TouchGesture::DragEnd { .. })), "unexpected DragEnd");
    }
}
