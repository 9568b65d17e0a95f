#![forbid(unsafe_code)]

//! The spatial canvas: objects on a plot, hit-testing, drag, rotate,
//! keyboard movement and selection.
//!
//! The canvas is synchronous. Every mutation updates local state first and
//! hands back a [`Commit`] describing the store write; the caller decides
//! when (and whether) to persist it.
//!
//! # Invariants
//!
//! After any move, rotate or resize the object's rectangle lies inside
//! the plot: `0 <= x`, `0 <= y`, `x + width <= plot.width`,
//! `y + height <= plot.height`.

use sprout_core::event::{InputFocus, KeyCode, KeyEvent, Modifiers, PointerEvent, PointerEventKind};
use sprout_core::geometry::{Point, Rect};
use sprout_core::units::DimensionParseError;
use sprout_layout::ObjectMetadata;

use crate::config::CanvasConfig;
use crate::error::ValidationError;
use crate::labels::normalize_label;
use crate::model::{ObjectId, ObjectPatch, ObjectRecord, PlacedObject, Plot, Rotation};
use crate::viewport::Viewport;

/// A store write produced by a canvas mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Move {
        object: ObjectId,
        x: f64,
        y: f64,
    },
    /// Position, size and rotation written together.
    Transform {
        object: ObjectId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: Rotation,
    },
    Resize {
        object: ObjectId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        metadata: ObjectMetadata,
    },
    Restack {
        object: ObjectId,
        z: i32,
    },
    Rename {
        object: ObjectId,
        label: String,
    },
    Recolor {
        object: ObjectId,
        color: String,
    },
}

impl Commit {
    #[must_use]
    pub const fn object(&self) -> ObjectId {
        match self {
            Self::Move { object, .. }
            | Self::Transform { object, .. }
            | Self::Resize { object, .. }
            | Self::Restack { object, .. }
            | Self::Rename { object, .. }
            | Self::Recolor { object, .. } => *object,
        }
    }

    /// The partial update a store should apply.
    #[must_use]
    pub fn to_patch(&self) -> ObjectPatch {
        match self {
            Self::Move { x, y, .. } => ObjectPatch {
                x: Some(*x),
                y: Some(*y),
                ..ObjectPatch::default()
            },
            Self::Transform {
                x,
                y,
                width,
                height,
                rotation,
                ..
            } => ObjectPatch {
                x: Some(*x),
                y: Some(*y),
                width: Some(*width),
                height: Some(*height),
                rotation: Some(*rotation),
                ..ObjectPatch::default()
            },
            Self::Resize {
                x,
                y,
                width,
                height,
                metadata,
                ..
            } => ObjectPatch {
                x: Some(*x),
                y: Some(*y),
                width: Some(*width),
                height: Some(*height),
                metadata: Some(metadata.clone()),
                ..ObjectPatch::default()
            },
            Self::Restack { z, .. } => ObjectPatch {
                z: Some(*z),
                ..ObjectPatch::default()
            },
            Self::Rename { label, .. } => ObjectPatch {
                label: Some(label.clone()),
                ..ObjectPatch::default()
            },
            Self::Recolor { color, .. } => ObjectPatch {
                color: Some(color.clone()),
                ..ObjectPatch::default()
            },
        }
    }
}

/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self, step: f64) -> (f64, f64) {
        match self {
            Self::Up => (0.0, -step),
            Self::Down => (0.0, step),
            Self::Left => (-step, 0.0),
            Self::Right => (step, 0.0),
        }
    }
}

/// Where a restack sends an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOrder {
    Front,
    Back,
}

/// What the canvas did with a key event.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not a canvas key, or the canvas is not focused.
    Ignored,
    /// Consumed with no store write.
    Handled,
    Commit(Commit),
    /// Consumed, but the action was refused.
    Rejected(ValidationError),
    /// Delete pressed with a selection; the host confirms and deletes.
    DeleteRequested(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    object: ObjectId,
    /// Pointer minus object top-left, plot space.
    offset: Point,
    /// Pointer position at drag start, screen pixels.
    start_px: Point,
    moved: bool,
}

/// Objects on one plot plus the interaction state around them.
#[derive(Debug, Clone)]
pub struct SpatialCanvas {
    plot: Plot,
    /// Ascending stacking order; ties keep insertion order.
    objects: Vec<PlacedObject>,
    selected: Option<ObjectId>,
    drag: Option<DragState>,
    viewport: Viewport,
    focus: InputFocus,
    config: CanvasConfig,
}

impl SpatialCanvas {
    /// An invalid `config` is replaced by the defaults.
    #[must_use]
    pub fn new(plot: Plot, config: CanvasConfig) -> Self {
        let config = config.or_default();
        Self {
            plot,
            objects: Vec::new(),
            selected: None,
            drag: None,
            viewport: Viewport::new(&config),
            focus: InputFocus::Canvas,
            config,
        }
    }

    /// Replace the object list with stored records, ordered by stacking
    /// order. Records with equal `z` keep the order they arrived in.
    pub fn load(&mut self, records: Vec<ObjectRecord>) {
        self.objects = records.into_iter().map(PlacedObject::from_record).collect();
        self.sort_by_stack();
        self.selected = None;
        self.drag = None;
        tracing::debug!(
            target: "sprout.canvas",
            plot = %self.plot.id,
            objects = self.objects.len(),
            "canvas loaded"
        );
    }

    // --- Accessors ------------------------------------------------------

    #[must_use]
    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    /// Objects in stacking order, bottom first.
    #[must_use]
    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    #[must_use]
    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    #[must_use]
    pub fn selected_object(&self) -> Option<&PlacedObject> {
        self.selected.and_then(|id| self.object(id))
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn focus(&self) -> InputFocus {
        self.focus
    }

    /// Tell the canvas where keyboard focus is. Keys are ignored while a
    /// text field has it.
    pub fn set_focus(&mut self, focus: InputFocus) {
        self.focus = focus;
    }

    /// Every object's label.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.objects.iter().map(|object| object.label.as_str()).collect()
    }

    /// Stacking order that puts a new object on top.
    #[must_use]
    pub fn next_z(&self) -> i32 {
        self.objects
            .iter()
            .map(|object| object.z)
            .max()
            .map_or(0, |z| z.saturating_add(1))
    }

    // --- Membership -----------------------------------------------------

    /// Add an object the store has just created.
    pub fn insert(&mut self, object: PlacedObject) {
        self.objects.push(object);
        self.sort_by_stack();
    }

    /// Drop an object and any selection or drag pointing at it.
    pub fn remove(&mut self, id: ObjectId) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.is_some_and(|drag| drag.object == id) {
            self.drag = None;
        }
        Some(self.objects.remove(index))
    }

    // --- Hit-testing and selection --------------------------------------

    /// Topmost object under a screen point.
    #[must_use]
    pub fn hit_test(&self, px: Point) -> Option<ObjectId> {
        let point = self.viewport.to_plot(px);
        self.objects
            .iter()
            .rev()
            .find(|object| object.rect().contains(point))
            .map(|object| object.id)
    }

    /// Select whatever is under a screen point; empty space clears the
    /// selection.
    pub fn select_at(&mut self, px: Point) -> Option<ObjectId> {
        self.selected = self.hit_test(px);
        self.selected
    }

    pub fn select(&mut self, id: ObjectId) -> Result<(), ValidationError> {
        if self.object(id).is_none() {
            return Err(ValidationError::UnknownObject(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Move the selection to the next (or previous) object in list order,
    /// wrapping at either end.
    pub fn cycle_selection(&mut self, forward: bool) -> Option<ObjectId> {
        let count = self.objects.len();
        if count == 0 {
            return None;
        }
        let current = self
            .selected
            .and_then(|id| self.objects.iter().position(|object| object.id == id));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        };
        self.selected = Some(self.objects[next].id);
        self.selected
    }

    // --- Drag -----------------------------------------------------------

    /// Pointer pressed. Starts a drag on a hit, clears the selection on a
    /// miss. Ignored while a pinch is active.
    pub fn pointer_down(&mut self, px: Point) -> Option<ObjectId> {
        if self.viewport.is_pinching() {
            return None;
        }
        match self.hit_test(px) {
            Some(id) => {
                self.begin_drag(id, px).ok()?;
                Some(id)
            }
            None => {
                self.selected = None;
                None
            }
        }
    }

    /// Start dragging `id` from screen point `px` and select it.
    pub fn begin_drag(&mut self, id: ObjectId, px: Point) -> Result<(), ValidationError> {
        let origin = self
            .object(id)
            .ok_or(ValidationError::UnknownObject(id))?
            .rect()
            .origin();
        self.drag = Some(DragState {
            object: id,
            offset: self.viewport.to_plot(px) - origin,
            start_px: px,
            moved: false,
        });
        self.selected = Some(id);
        Ok(())
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer moved. Returns whether the dragged object changed position.
    pub fn pointer_move(&mut self, px: Point) -> bool {
        let Some(mut drag) = self.drag else {
            return false;
        };
        if !drag.moved {
            if px.distance(drag.start_px) <= self.config.drag_dead_zone_px {
                return false;
            }
            drag.moved = true;
            self.drag = Some(drag);
        }
        let target = self.viewport.to_plot(px) - drag.offset;
        let target = self.viewport.snap(target, self.plot.grid_unit);
        let bounds = self.plot.bounds();
        let Some(object) = self.object_mut(drag.object) else {
            return false;
        };
        let Some(rect) = object.rect().with_origin(target).clamped_within(&bounds) else {
            return false;
        };
        let changed = rect.x != object.x || rect.y != object.y;
        object.x = rect.x;
        object.y = rect.y;
        changed
    }

    /// Route a mouse or pen event through the drag pipeline.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<Commit> {
        match event.kind {
            PointerEventKind::Down => {
                self.pointer_down(event.pos);
                None
            }
            PointerEventKind::Move => {
                self.pointer_move(event.pos);
                None
            }
            PointerEventKind::Up => self.pointer_up(event.pos),
        }
    }

    /// Pointer released: apply the final position and end the drag.
    pub fn pointer_up(&mut self, px: Point) -> Option<Commit> {
        self.pointer_move(px);
        self.end_drag()
    }

    /// End the drag where it stands. Yields a move commit if the object
    /// left the dead zone.
    pub fn end_drag(&mut self) -> Option<Commit> {
        let drag = self.drag.take()?;
        if !drag.moved {
            return None;
        }
        let object = self.object(drag.object)?;
        tracing::debug!(
            target: "sprout.canvas",
            object = %object.id,
            x = object.x,
            y = object.y,
            "drag committed"
        );
        Some(Commit::Move {
            object: object.id,
            x: object.x,
            y: object.y,
        })
    }

    // --- Rotate / move / restack ----------------------------------------

    /// Rotate 90° clockwise about the center, swapping width and height,
    /// then snap and clamp.
    pub fn rotate(&mut self, id: ObjectId) -> Result<Commit, ValidationError> {
        let bounds = self.plot.bounds();
        let object = self.object(id).ok_or(ValidationError::UnknownObject(id))?;
        let turned = Rect::centered_at(object.rect().center(), object.height, object.width);
        let turned = turned.with_origin(self.viewport.snap(turned.origin(), self.plot.grid_unit));
        let placed = turned
            .clamped_within(&bounds)
            .ok_or(ValidationError::TooLarge {
                width: turned.width,
                height: turned.height,
                plot_width: bounds.width,
                plot_height: bounds.height,
            })?;
        let rotation = object.rotation.clockwise();

        let object = self
            .object_mut(id)
            .ok_or(ValidationError::UnknownObject(id))?;
        object.set_rect(placed);
        object.rotation = rotation;
        tracing::debug!(
            target: "sprout.canvas",
            object = %id,
            rotation = rotation.degrees(),
            width = placed.width,
            height = placed.height,
            "object rotated"
        );
        Ok(Commit::Transform {
            object: id,
            x: placed.x,
            y: placed.y,
            width: placed.width,
            height: placed.height,
            rotation,
        })
    }

    /// Nudge the selected object one keyboard step, snapped and clamped
    /// like a drag. `None` when nothing is selected or the object is
    /// already against that edge.
    pub fn move_selected(&mut self, direction: Direction) -> Option<Commit> {
        let id = self.selected?;
        let grid_unit = self.plot.grid_unit;
        let (dx, dy) = direction.delta(self.viewport.keyboard_step(grid_unit));
        let bounds = self.plot.bounds();
        let object = self.object(id)?;
        let target = self
            .viewport
            .snap(Point::new(object.x + dx, object.y + dy), grid_unit);
        let rect = object.rect().with_origin(target).clamped_within(&bounds)?;
        let object = self.object_mut(id)?;
        if rect.x == object.x && rect.y == object.y {
            return None;
        }
        object.x = rect.x;
        object.y = rect.y;
        tracing::debug!(
            target: "sprout.canvas",
            object = %id,
            ?direction,
            x = rect.x,
            y = rect.y,
            "keyboard move"
        );
        Some(Commit::Move {
            object: id,
            x: rect.x,
            y: rect.y,
        })
    }

    /// Bring an object above every other, or send it below.
    pub fn restack(&mut self, id: ObjectId, order: StackOrder) -> Result<Commit, ValidationError> {
        if self.object(id).is_none() {
            return Err(ValidationError::UnknownObject(id));
        }
        let others = self.objects.iter().filter(|object| object.id != id).map(|o| o.z);
        let z = match order {
            StackOrder::Front => others.max().map_or(0, |z| z.saturating_add(1)),
            StackOrder::Back => others.min().map_or(0, |z| z.saturating_sub(1)),
        };
        if let Some(object) = self.object_mut(id) {
            object.z = z;
        }
        self.sort_by_stack();
        Ok(Commit::Restack { object: id, z })
    }

    // --- Edits ----------------------------------------------------------

    /// Rename; the label must be non-empty and unused by any sibling.
    pub fn rename(&mut self, id: ObjectId, label: &str) -> Result<Commit, ValidationError> {
        let label = normalize_label(label)?.to_owned();
        if self.object(id).is_none() {
            return Err(ValidationError::UnknownObject(id));
        }
        let clash = self
            .objects
            .iter()
            .any(|object| object.id != id && object.label.trim() == label);
        if clash {
            return Err(ValidationError::DuplicateLabel(label));
        }
        if let Some(object) = self.object_mut(id) {
            object.label.clone_from(&label);
        }
        Ok(Commit::Rename { object: id, label })
    }

    pub fn recolor(&mut self, id: ObjectId, color: &str) -> Result<Commit, ValidationError> {
        let object = self
            .object_mut(id)
            .ok_or(ValidationError::UnknownObject(id))?;
        object.color = color.trim().to_owned();
        Ok(Commit::Recolor {
            object: id,
            color: object.color.clone(),
        })
    }

    /// Where `id` would land at a new size: same top-left, pulled back
    /// inside the plot if needed. Nothing changes.
    pub fn preview_resize(
        &self,
        id: ObjectId,
        width: f64,
        height: f64,
    ) -> Result<Rect, ValidationError> {
        let object = self.object(id).ok_or(ValidationError::UnknownObject(id))?;
        if !(width > 0.0 && height > 0.0) {
            return Err(ValidationError::Size(DimensionParseError::NonPositive));
        }
        let bounds = self.plot.bounds();
        Rect::new(object.x, object.y, width, height)
            .clamped_within(&bounds)
            .ok_or(ValidationError::TooLarge {
                width,
                height,
                plot_width: bounds.width,
                plot_height: bounds.height,
            })
    }

    /// Apply a new size (and the metadata describing it).
    pub fn resize(
        &mut self,
        id: ObjectId,
        width: f64,
        height: f64,
        metadata: ObjectMetadata,
    ) -> Result<Commit, ValidationError> {
        let rect = self.preview_resize(id, width, height)?;
        let object = self
            .object_mut(id)
            .ok_or(ValidationError::UnknownObject(id))?;
        object.set_rect(rect);
        object.metadata = metadata.clone();
        Ok(Commit::Resize {
            object: id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            metadata,
        })
    }

    // --- Keyboard -------------------------------------------------------

    /// Route a key press. Suppressed while a text field has focus.
    pub fn handle_key(&mut self, key: &KeyEvent) -> KeyOutcome {
        if !self.accepts_key(key) {
            return KeyOutcome::Ignored;
        }
        let direction = match key.code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        };
        if let Some(direction) = direction {
            if self.selected.is_none() {
                return KeyOutcome::Ignored;
            }
            return self
                .move_selected(direction)
                .map_or(KeyOutcome::Handled, KeyOutcome::Commit);
        }
        match key.code {
            KeyCode::Tab => {
                self.cycle_selection(!key.shift());
                KeyOutcome::Handled
            }
            KeyCode::BackTab => {
                self.cycle_selection(false);
                KeyOutcome::Handled
            }
            KeyCode::Escape => {
                self.selected = None;
                KeyOutcome::Handled
            }
            KeyCode::Delete => self
                .selected
                .map_or(KeyOutcome::Ignored, KeyOutcome::DeleteRequested),
            KeyCode::Char('r' | 'R') => match self.selected {
                Some(id) => match self.rotate(id) {
                    Ok(commit) => KeyOutcome::Commit(commit),
                    Err(err) => KeyOutcome::Rejected(err),
                },
                None => KeyOutcome::Ignored,
            },
            KeyCode::Char('+' | '=') => {
                self.viewport.zoom_in();
                KeyOutcome::Handled
            }
            KeyCode::Char('-') => {
                self.viewport.zoom_out();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// The object `key` would rotate, if [`handle_key`](Self::handle_key)
    /// were called with it now.
    #[must_use]
    pub fn rotation_target(&self, key: &KeyEvent) -> Option<ObjectId> {
        if !self.accepts_key(key) || !matches!(key.code, KeyCode::Char('r' | 'R')) {
            return None;
        }
        self.selected
    }

    // --- Internal -------------------------------------------------------

    /// Presses and repeats outside text fields, without Ctrl/Alt/Super.
    fn accepts_key(&self, key: &KeyEvent) -> bool {
        self.focus != InputFocus::TextField
            && key.is_actionable()
            && !key
                .modifiers
                .intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::SUPER)
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    fn sort_by_stack(&mut self) {
        self.objects.sort_by_key(|object| object.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlotId, SeasonId};
    use sprout_core::event::KeyEventKind;
    use sprout_layout::ObjectKind;

    fn record(id: u64, label: &str, x: f64, y: f64, w: f64, h: f64, z: i32) -> ObjectRecord {
        ObjectRecord {
            id: ObjectId(id),
            plot: PlotId(1),
            season: SeasonId(1),
            kind: ObjectKind::RaisedBed,
            label: label.into(),
            x,
            y,
            width: w,
            height: h,
            rotation: None,
            z,
            color: "#8d6e63".into(),
            metadata: ObjectMetadata::default(),
        }
    }

    fn canvas_with(records: Vec<ObjectRecord>) -> SpatialCanvas {
        let mut canvas = SpatialCanvas::new(
            Plot::new(PlotId(1), 96.0, 192.0),
            CanvasConfig::default(),
        );
        canvas.load(records);
        canvas
    }

    fn assert_inside(canvas: &SpatialCanvas) {
        let plot = canvas.plot();
        for o in canvas.objects() {
            assert!(o.x >= 0.0 && o.y >= 0.0, "{o:?}");
            assert!(o.x + o.width <= plot.width && o.y + o.height <= plot.height, "{o:?}");
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code)
    }

    #[test]
    fn load_orders_by_z_stably() {
        let canvas = canvas_with(vec![
            record(1, "a", 0.0, 0.0, 12.0, 12.0, 2),
            record(2, "b", 0.0, 0.0, 12.0, 12.0, 0),
            record(3, "c", 0.0, 0.0, 12.0, 12.0, 2),
            record(4, "d", 0.0, 0.0, 12.0, 12.0, 0),
        ]);
        let ids: Vec<u64> = canvas.objects().iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
        assert!(canvas.objects().iter().all(|o| o.rotation == Rotation::Deg0));
    }

    #[test]
    fn hit_test_prefers_topmost_and_respects_zoom() {
        let mut canvas = canvas_with(vec![
            record(1, "low", 0.0, 0.0, 48.0, 48.0, 0),
            record(2, "high", 24.0, 24.0, 48.0, 48.0, 1),
        ]);
        assert_eq!(canvas.hit_test(Point::new(30.0, 30.0)), Some(ObjectId(2)));
        assert_eq!(canvas.hit_test(Point::new(10.0, 10.0)), Some(ObjectId(1)));
        assert_eq!(canvas.hit_test(Point::new(90.0, 150.0)), None);

        canvas.viewport_mut().set_zoom(2.0);
        // 20px at 2x is 10in: only the low object.
        assert_eq!(canvas.hit_test(Point::new(20.0, 20.0)), Some(ObjectId(1)));
    }

    #[test]
    fn miss_clears_selection() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        assert_eq!(canvas.select_at(Point::new(5.0, 5.0)), Some(ObjectId(1)));
        assert_eq!(canvas.select_at(Point::new(80.0, 80.0)), None);
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn drag_within_dead_zone_does_not_move() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        assert_eq!(canvas.pointer_down(Point::new(5.0, 5.0)), Some(ObjectId(1)));
        assert!(!canvas.pointer_move(Point::new(7.0, 6.0)));
        assert_eq!(canvas.pointer_up(Point::new(7.0, 7.0)), None);
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.x), Some(0.0));
        assert_eq!(canvas.selected(), Some(ObjectId(1)));
    }

    #[test]
    fn drag_snaps_and_commits() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.pointer_down(Point::new(5.0, 5.0));
        assert!(canvas.pointer_move(Point::new(20.0, 5.0)));
        // 15in offset snaps to 12.
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.x), Some(12.0));
        let commit = canvas.pointer_up(Point::new(33.0, 40.0)).unwrap();
        assert_eq!(
            commit,
            Commit::Move {
                object: ObjectId(1),
                x: 24.0,
                y: 36.0
            }
        );
        assert!(!canvas.is_dragging());
    }

    #[test]
    fn drag_clamps_to_plot() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.pointer_down(Point::new(5.0, 5.0));
        canvas.pointer_move(Point::new(500.0, -300.0));
        let object = canvas.object(ObjectId(1)).unwrap();
        assert_eq!((object.x, object.y), (72.0, 0.0));
        assert_inside(&canvas);
    }

    #[test]
    fn drag_without_snap_is_free() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.viewport_mut().set_snap_enabled(false);
        canvas.pointer_down(Point::new(5.0, 5.0));
        canvas.pointer_move(Point::new(10.5, 9.0));
        let object = canvas.object(ObjectId(1)).unwrap();
        assert_eq!((object.x, object.y), (5.5, 4.0));
    }

    #[test]
    fn fine_snap_uses_fine_unit() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.viewport_mut().set_fine_snap(true);
        canvas.pointer_down(Point::new(5.0, 5.0));
        canvas.pointer_move(Point::new(12.4, 5.0));
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.x), Some(7.0));
    }

    #[test]
    fn pointer_events_route_to_drag() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        let down = PointerEvent::new(PointerEventKind::Down, Point::new(5.0, 5.0));
        let up = PointerEvent::new(PointerEventKind::Up, Point::new(29.0, 5.0));
        assert_eq!(canvas.handle_pointer(&down), None);
        assert_eq!(
            canvas.handle_pointer(&up),
            Some(Commit::Move {
                object: ObjectId(1),
                x: 24.0,
                y: 0.0
            })
        );
    }

    #[test]
    fn pointer_down_ignored_while_pinching() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.viewport_mut().begin_pinch(100.0);
        assert_eq!(canvas.pointer_down(Point::new(5.0, 5.0)), None);
        assert!(!canvas.is_dragging());
    }

    #[test]
    fn rotate_swaps_footprint_about_center() {
        let mut canvas = canvas_with(vec![record(1, "a", 24.0, 48.0, 24.0, 48.0, 0)]);
        let commit = canvas.rotate(ObjectId(1)).unwrap();
        assert_eq!(
            commit,
            Commit::Transform {
                object: ObjectId(1),
                x: 12.0,
                y: 60.0,
                width: 48.0,
                height: 24.0,
                rotation: Rotation::Deg90,
            }
        );
        canvas.rotate(ObjectId(1)).unwrap();
        let object = canvas.object(ObjectId(1)).unwrap();
        assert_eq!((object.width, object.height), (24.0, 48.0));
        assert_eq!(object.rect().center(), Point::new(36.0, 72.0));
        assert_eq!(object.rotation, Rotation::Deg180);
    }

    #[test]
    fn rotate_near_edge_is_clamped() {
        let mut canvas = canvas_with(vec![record(1, "a", 72.0, 0.0, 24.0, 72.0, 0)]);
        canvas.rotate(ObjectId(1)).unwrap();
        assert_inside(&canvas);
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.width), Some(72.0));
    }

    #[test]
    fn rotate_that_cannot_fit_is_rejected() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 48.0, 120.0, 0)]);
        let err = canvas.rotate(ObjectId(1)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
        let object = canvas.object(ObjectId(1)).unwrap();
        assert_eq!((object.width, object.height), (48.0, 120.0));
        assert_eq!(object.rotation, Rotation::Deg0);
    }

    #[test]
    fn inverted_zoom_config_does_not_panic() {
        let config = CanvasConfig {
            zoom_min: 2.0,
            zoom_max: 1.0,
            ..CanvasConfig::default()
        };
        let mut canvas = SpatialCanvas::new(Plot::new(PlotId(1), 96.0, 192.0), config);
        assert_eq!(canvas.config(), &CanvasConfig::default());
        assert_eq!(canvas.viewport_mut().set_zoom(10.0), 3.0);
    }

    #[test]
    fn three_right_moves() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.select(ObjectId(1)).unwrap();
        for _ in 0..3 {
            assert!(matches!(
                canvas.handle_key(&key(KeyCode::Right)),
                KeyOutcome::Commit(_)
            ));
        }
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.x), Some(36.0));
    }

    #[test]
    fn keyboard_move_clamps_then_noops() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 48.0, 24.0, 0)]);
        canvas.select(ObjectId(1)).unwrap();
        for _ in 0..10 {
            canvas.handle_key(&key(KeyCode::Right));
        }
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.x), Some(48.0));
        assert_eq!(canvas.handle_key(&key(KeyCode::Right)), KeyOutcome::Handled);
        assert_eq!(canvas.handle_key(&key(KeyCode::Up)), KeyOutcome::Handled);
    }

    #[test]
    fn keyboard_half_step_without_snap() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.viewport_mut().set_snap_enabled(false);
        canvas.select(ObjectId(1)).unwrap();
        canvas.handle_key(&key(KeyCode::Down));
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.y), Some(6.0));
    }

    #[test]
    fn keyboard_move_resnaps_off_grid_object() {
        let mut canvas = canvas_with(vec![record(1, "a", 5.0, 7.0, 24.0, 24.0, 0)]);
        canvas.select(ObjectId(1)).unwrap();
        assert_eq!(
            canvas.move_selected(Direction::Right),
            Some(Commit::Move {
                object: ObjectId(1),
                x: 12.0,
                y: 12.0
            })
        );
        canvas.move_selected(Direction::Down);
        let object = canvas.object(ObjectId(1)).unwrap();
        assert_eq!((object.x, object.y), (12.0, 24.0));
    }

    #[test]
    fn rotation_target_follows_key_gating() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        let r = key(KeyCode::Char('r'));
        assert_eq!(canvas.rotation_target(&r), None);
        canvas.select(ObjectId(1)).unwrap();
        assert_eq!(canvas.rotation_target(&r), Some(ObjectId(1)));
        assert_eq!(canvas.rotation_target(&key(KeyCode::Right)), None);
        assert_eq!(canvas.rotation_target(&r.with_modifiers(Modifiers::CTRL)), None);
        canvas.set_focus(InputFocus::TextField);
        assert_eq!(canvas.rotation_target(&r), None);
    }

    #[test]
    fn keys_suppressed_in_text_field() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.select(ObjectId(1)).unwrap();
        canvas.set_focus(InputFocus::TextField);
        assert_eq!(canvas.handle_key(&key(KeyCode::Right)), KeyOutcome::Ignored);
        assert_eq!(canvas.handle_key(&key(KeyCode::Escape)), KeyOutcome::Ignored);
        assert_eq!(canvas.selected(), Some(ObjectId(1)));
    }

    #[test]
    fn release_and_chorded_keys_ignored() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 24.0, 0)]);
        canvas.select(ObjectId(1)).unwrap();
        let release = key(KeyCode::Right).with_kind(KeyEventKind::Release);
        assert_eq!(canvas.handle_key(&release), KeyOutcome::Ignored);
        let ctrl = key(KeyCode::Right).with_modifiers(Modifiers::CTRL);
        assert_eq!(canvas.handle_key(&ctrl), KeyOutcome::Ignored);
    }

    #[test]
    fn tab_cycles_and_wraps() {
        let mut canvas = canvas_with(vec![
            record(1, "a", 0.0, 0.0, 12.0, 12.0, 0),
            record(2, "b", 24.0, 0.0, 12.0, 12.0, 1),
            record(3, "c", 48.0, 0.0, 12.0, 12.0, 2),
        ]);
        canvas.handle_key(&key(KeyCode::Tab));
        assert_eq!(canvas.selected(), Some(ObjectId(1)));
        canvas.handle_key(&key(KeyCode::Tab));
        canvas.handle_key(&key(KeyCode::Tab));
        canvas.handle_key(&key(KeyCode::Tab));
        assert_eq!(canvas.selected(), Some(ObjectId(1)));
        canvas.handle_key(&key(KeyCode::BackTab));
        assert_eq!(canvas.selected(), Some(ObjectId(3)));
        canvas.handle_key(&key(KeyCode::Tab).with_modifiers(Modifiers::SHIFT));
        assert_eq!(canvas.selected(), Some(ObjectId(2)));
        canvas.handle_key(&key(KeyCode::Escape));
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn delete_and_rotate_keys() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 24.0, 48.0, 0)]);
        assert_eq!(canvas.handle_key(&key(KeyCode::Delete)), KeyOutcome::Ignored);
        canvas.select(ObjectId(1)).unwrap();
        assert_eq!(
            canvas.handle_key(&key(KeyCode::Delete)),
            KeyOutcome::DeleteRequested(ObjectId(1))
        );
        assert!(matches!(
            canvas.handle_key(&key(KeyCode::Char('r'))),
            KeyOutcome::Commit(Commit::Transform { .. })
        ));
    }

    #[test]
    fn restack_front_and_back() {
        let mut canvas = canvas_with(vec![
            record(1, "a", 0.0, 0.0, 12.0, 12.0, 0),
            record(2, "b", 0.0, 0.0, 12.0, 12.0, 5),
        ]);
        let commit = canvas.restack(ObjectId(1), StackOrder::Front).unwrap();
        assert_eq!(commit, Commit::Restack { object: ObjectId(1), z: 6 });
        assert_eq!(canvas.hit_test(Point::new(1.0, 1.0)), Some(ObjectId(1)));
        let commit = canvas.restack(ObjectId(1), StackOrder::Back).unwrap();
        assert_eq!(commit, Commit::Restack { object: ObjectId(1), z: 4 });
        assert_eq!(canvas.hit_test(Point::new(1.0, 1.0)), Some(ObjectId(2)));
    }

    #[test]
    fn rename_rejects_sibling_collision() {
        let mut canvas = canvas_with(vec![
            record(1, "Bed 1", 0.0, 0.0, 12.0, 12.0, 0),
            record(2, "Bed 2", 24.0, 0.0, 12.0, 12.0, 0),
        ]);
        assert_eq!(
            canvas.rename(ObjectId(1), "Bed 2"),
            Err(ValidationError::DuplicateLabel("Bed 2".into()))
        );
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.label.as_str()), Some("Bed 1"));
        assert_eq!(canvas.rename(ObjectId(1), "  "), Err(ValidationError::EmptyLabel));
        // Keeping one's own label is fine.
        assert!(canvas.rename(ObjectId(1), "Bed 1").is_ok());
        assert!(canvas.rename(ObjectId(1), " Herbs ").is_ok());
        assert_eq!(canvas.object(ObjectId(1)).map(|o| o.label.as_str()), Some("Herbs"));
    }

    #[test]
    fn resize_keeps_origin_or_clamps() {
        let mut canvas = canvas_with(vec![record(1, "a", 60.0, 0.0, 24.0, 24.0, 0)]);
        let rect = canvas.preview_resize(ObjectId(1), 48.0, 24.0).unwrap();
        assert_eq!((rect.x, rect.width), (48.0, 48.0));
        assert!(matches!(
            canvas.preview_resize(ObjectId(1), 120.0, 24.0),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(canvas.preview_resize(ObjectId(1), 0.0, 24.0).is_err());

        let commit = canvas
            .resize(ObjectId(1), 36.0, 36.0, ObjectMetadata::default())
            .unwrap();
        assert_eq!(commit.to_patch().width, Some(36.0));
        assert_inside(&canvas);
    }

    #[test]
    fn remove_clears_selection() {
        let mut canvas = canvas_with(vec![record(1, "a", 0.0, 0.0, 12.0, 12.0, 0)]);
        canvas.select(ObjectId(1)).unwrap();
        assert!(canvas.remove(ObjectId(1)).is_some());
        assert_eq!(canvas.selected(), None);
        assert!(canvas.remove(ObjectId(1)).is_none());
        assert_eq!(canvas.next_z(), 0);
    }
}
