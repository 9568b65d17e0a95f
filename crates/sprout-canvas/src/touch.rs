#![forbid(unsafe_code)]

//! Multi-touch routing onto a [`SpatialCanvas`].
//!
//! Each finger gets its own [`TouchGestureRecognizer`] and is bound to the
//! object under it at touch start. Recognized gestures drive the canvas:
//! a tap selects, a long press asks the host for a context menu, a drag
//! runs the same pipeline as a mouse drag. A second finger at a distinct
//! point turns the interaction into a pinch zoom and silences both
//! recognizers until they lift.

use std::collections::BTreeMap;

use sprout_core::event::{TouchEvent, TouchEventKind, TouchId};
use sprout_core::geometry::Point;
use sprout_core::gesture::{GestureConfig, TouchGesture, TouchGestureRecognizer};
use web_time::Instant;

use crate::canvas::{Commit, SpatialCanvas};
use crate::model::ObjectId;

/// What a touch event did, for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchOutcome {
    /// A tap changed the selection.
    Selected(Option<ObjectId>),
    /// A long press; the host may open a context menu here.
    ContextMenu { object: Option<ObjectId>, pos: Point },
    /// A drag ended (or was cut short) with the object moved.
    Commit(Commit),
    /// Pinch changed the zoom.
    Zoomed(f64),
}

#[derive(Debug)]
struct TouchSlot {
    recognizer: TouchGestureRecognizer,
    pos: Point,
    target: Option<ObjectId>,
}

/// Per-touch gesture state plus the pinch pair.
#[derive(Debug, Default)]
pub struct TouchRouter {
    config: GestureConfig,
    touches: BTreeMap<TouchId, TouchSlot>,
    pinch: Option<(TouchId, TouchId)>,
    drag_owner: Option<TouchId>,
}

impl TouchRouter {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Number of fingers currently down.
    #[must_use]
    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Feed one touch event.
    pub fn handle(
        &mut self,
        canvas: &mut SpatialCanvas,
        event: TouchEvent,
        now: Instant,
    ) -> Vec<TouchOutcome> {
        match event.kind {
            TouchEventKind::Start => self.on_start(canvas, event.id, event.pos, now),
            TouchEventKind::Move => self.on_move(canvas, event.id, event.pos, now),
            TouchEventKind::End => self.on_end(canvas, event.id, event.pos, now),
            TouchEventKind::Cancel => self.on_cancel(canvas, event.id),
        }
    }

    /// Check long-press deadlines. Call on every host tick.
    pub fn poll(&mut self, canvas: &mut SpatialCanvas, now: Instant) -> Vec<TouchOutcome> {
        let mut out = Vec::new();
        for slot in self.touches.values_mut() {
            if let Some(gesture) = slot.recognizer.poll(now) {
                out.extend(apply_gesture(canvas, slot.target, gesture, &mut None, None));
            }
        }
        out
    }

    fn on_start(
        &mut self,
        canvas: &mut SpatialCanvas,
        id: TouchId,
        pos: Point,
        now: Instant,
    ) -> Vec<TouchOutcome> {
        let mut recognizer = TouchGestureRecognizer::new(self.config.clone());
        if self.pinch.is_none() {
            recognizer.touch_start(pos, now);
        }
        self.touches.insert(
            id,
            TouchSlot {
                recognizer,
                pos,
                target: canvas.hit_test(pos),
            },
        );
        if self.touches.len() == 2 && self.pinch.is_none() {
            return self.begin_pinch(canvas);
        }
        Vec::new()
    }

    fn begin_pinch(&mut self, canvas: &mut SpatialCanvas) -> Vec<TouchOutcome> {
        let mut fingers = self.touches.iter();
        let (Some((&a, first)), Some((&b, second))) = (fingers.next(), fingers.next()) else {
            return Vec::new();
        };
        if !canvas.viewport_mut().begin_pinch(first.pos.distance(second.pos)) {
            return Vec::new();
        }
        self.pinch = Some((a, b));
        tracing::trace!(target: "sprout.touch", "pinch started");

        let mut out = Vec::new();
        if let Some(commit) = canvas.end_drag() {
            out.push(TouchOutcome::Commit(commit));
        }
        self.drag_owner = None;
        for slot in self.touches.values_mut() {
            slot.recognizer.touch_cancel();
        }
        out
    }

    fn on_move(
        &mut self,
        canvas: &mut SpatialCanvas,
        id: TouchId,
        pos: Point,
        now: Instant,
    ) -> Vec<TouchOutcome> {
        let Some(slot) = self.touches.get_mut(&id) else {
            return Vec::new();
        };
        slot.pos = pos;
        if let Some((a, b)) = self.pinch {
            if id != a && id != b {
                return Vec::new();
            }
            let (Some(first), Some(second)) = (self.touches.get(&a), self.touches.get(&b)) else {
                return Vec::new();
            };
            let distance = first.pos.distance(second.pos);
            return canvas
                .viewport_mut()
                .update_pinch(distance)
                .map(TouchOutcome::Zoomed)
                .into_iter()
                .collect();
        }
        let target = slot.target;
        match slot.recognizer.touch_move(pos, now) {
            Some(gesture) => apply_gesture(canvas, target, gesture, &mut self.drag_owner, Some(id)),
            None => Vec::new(),
        }
    }

    fn on_end(
        &mut self,
        canvas: &mut SpatialCanvas,
        id: TouchId,
        pos: Point,
        now: Instant,
    ) -> Vec<TouchOutcome> {
        let Some(mut slot) = self.touches.remove(&id) else {
            return Vec::new();
        };
        if self.end_pinch_if_member(canvas, id) {
            return Vec::new();
        }
        match slot.recognizer.touch_end(pos, now) {
            Some(gesture) => {
                apply_gesture(canvas, slot.target, gesture, &mut self.drag_owner, Some(id))
            }
            None => Vec::new(),
        }
    }

    fn on_cancel(&mut self, canvas: &mut SpatialCanvas, id: TouchId) -> Vec<TouchOutcome> {
        let Some(mut slot) = self.touches.remove(&id) else {
            return Vec::new();
        };
        slot.recognizer.touch_cancel();
        self.end_pinch_if_member(canvas, id);
        if self.drag_owner == Some(id) {
            self.drag_owner = None;
            // The object already moved locally; keep the store in step.
            return canvas.end_drag().map(TouchOutcome::Commit).into_iter().collect();
        }
        Vec::new()
    }

    fn end_pinch_if_member(&mut self, canvas: &mut SpatialCanvas, id: TouchId) -> bool {
        match self.pinch {
            Some((a, b)) if id == a || id == b => {
                self.pinch = None;
                canvas.viewport_mut().end_pinch();
                tracing::trace!(target: "sprout.touch", "pinch ended");
                true
            }
            _ => false,
        }
    }
}

fn apply_gesture(
    canvas: &mut SpatialCanvas,
    target: Option<ObjectId>,
    gesture: TouchGesture,
    drag_owner: &mut Option<TouchId>,
    touch: Option<TouchId>,
) -> Vec<TouchOutcome> {
    match gesture {
        TouchGesture::Tap { pos } => vec![TouchOutcome::Selected(canvas.select_at(pos))],
        TouchGesture::LongPress { pos, .. } => {
            if let Some(object) = target {
                let _ = canvas.select(object);
            }
            vec![TouchOutcome::ContextMenu {
                object: target,
                pos,
            }]
        }
        TouchGesture::DragStart { origin, current } => {
            if let Some(object) = target {
                if canvas.begin_drag(object, origin).is_ok() {
                    *drag_owner = touch;
                    canvas.pointer_move(current);
                }
            }
            Vec::new()
        }
        TouchGesture::DragMove { current, .. } => {
            if touch.is_some() && *drag_owner == touch {
                canvas.pointer_move(current);
            }
            Vec::new()
        }
        TouchGesture::DragEnd { end, .. } => {
            if touch.is_none() || *drag_owner != touch {
                return Vec::new();
            }
            *drag_owner = None;
            canvas
                .pointer_up(end)
                .map(TouchOutcome::Commit)
                .into_iter()
                .collect()
        }
    }
}
