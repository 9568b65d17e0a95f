#![forbid(unsafe_code)]

//! A store-backed editing session for one plot and season.
//!
//! The session owns a [`SpatialCanvas`] and a [`PlotStore`]. Interactive
//! edits (drag, keyboard, rotate, restack, rename, recolor, resize) change
//! the canvas first and are then written to the store. A failed write keeps
//! the local change, records a non-blocking [`Notice`], and returns the
//! error. Adds, deletes and planting edits need store-assigned ids or
//! user confirmation, so they reach the store before the canvas.

use std::collections::{BTreeMap, BTreeSet};

use sprout_core::event::KeyEvent;
use sprout_core::geometry::Point;
use sprout_layout::{
    CELL_SIZE, CellRect, Footprint, GridDims, GridPlacementEngine, LayoutSchema, ObjectKind,
    ObjectMetadata, Occupancy, PlantingMethod, calculate_schema,
};

use crate::arrange::{arrange_batch, clamp_batch};
use crate::canvas::{Commit, Direction, KeyOutcome, SpatialCanvas, StackOrder};
use crate::config::CanvasConfig;
use crate::error::{CanvasError, Notice, Result, StoreError, ValidationError};
use crate::labels::{normalize_label, unique_labels};
use crate::model::{
    NewObject, NewPlanting, ObjectId, PlacedObject, Planting, PlantingId, Plot, Rotation, SeasonId,
};
use crate::sizing::{SizeSource, resolve_size};
use crate::store::PlotStore;

/// A request to add one or more objects of a kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AddObjects {
    pub kind: ObjectKind,
    pub size: SizeSource,
    pub count: usize,
    /// Base label; the kind's default label when absent.
    pub label: Option<String>,
    /// Fill color; the kind's default color when absent.
    pub color: Option<String>,
}

impl AddObjects {
    #[must_use]
    pub fn new(kind: ObjectKind, size: SizeSource) -> Self {
        Self {
            kind,
            size,
            count: 1,
            label: None,
            color: None,
        }
    }

    #[must_use]
    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { plantings_removed: usize },
    /// The object still holds plantings. Ask the user, then call again
    /// with `confirmed = true`.
    ConfirmationRequired { planting_count: usize },
}

/// A crop to place in an object.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantingRequest {
    pub crop: String,
    /// Spacing the crop needs between plants, inches.
    pub spacing: f64,
    pub method: PlantingMethod,
    /// Origin cell; the first free cell when absent.
    pub origin: Option<(i32, i32)>,
}

impl PlantingRequest {
    #[must_use]
    pub fn new(crop: impl Into<String>, spacing: f64) -> Self {
        Self {
            crop: crop.into(),
            spacing,
            method: PlantingMethod::default(),
            origin: None,
        }
    }

    #[must_use]
    pub fn at(mut self, col: i32, row: i32) -> Self {
        self.origin = Some((col, row));
        self
    }

    #[must_use]
    pub fn method(mut self, method: PlantingMethod) -> Self {
        self.method = method;
        self
    }
}

/// Canvas plus store for one plot and season.
#[derive(Debug)]
pub struct PlotSession<S> {
    store: S,
    canvas: SpatialCanvas,
    season: SeasonId,
    notices: Vec<Notice>,
}

fn report(notices: &mut Vec<Notice>, err: StoreError, action: &'static str) -> CanvasError {
    tracing::warn!(target: "sprout.session", action, error = %err, "store write failed");
    let err = CanvasError::Persistence(err);
    notices.push(err.notice());
    err
}

/// A record that is already gone counts as deleted.
fn already_gone(result: std::result::Result<(), StoreError>) -> std::result::Result<(), StoreError> {
    match result {
        Err(StoreError::NotFound) => Ok(()),
        other => other,
    }
}

/// Plantings a schema could no longer hold.
fn orphaned(schema: &LayoutSchema, plantings: &[Planting]) -> usize {
    if let Some(dims) = schema.grid_dims() {
        return plantings
            .iter()
            .filter(|p| !p.cell_rect().within(dims))
            .count();
    }
    if schema.is_flexible() {
        return 0;
    }
    let mut per_season: BTreeMap<SeasonId, usize> = BTreeMap::new();
    for planting in plantings {
        *per_season.entry(planting.season).or_default() += 1;
    }
    let capacity = schema.capacity() as usize;
    per_season
        .values()
        .map(|count| count.saturating_sub(capacity))
        .sum()
}

/// First row or slot index no planting uses.
fn lowest_free_index(plantings: &[Planting]) -> i32 {
    let used: BTreeSet<i32> = plantings.iter().map(|p| p.row).collect();
    (0..i32::MAX).find(|i| !used.contains(i)).unwrap_or(i32::MAX)
}

fn cell_size_of(schema: &LayoutSchema) -> f64 {
    match schema {
        LayoutSchema::Grid { cell_size, .. } => *cell_size,
        LayoutSchema::Rows { .. } | LayoutSchema::Slots { .. } => CELL_SIZE,
    }
}

impl<S: PlotStore> PlotSession<S> {
    #[must_use]
    pub fn new(store: S, plot: Plot, season: SeasonId, config: CanvasConfig) -> Self {
        Self {
            store,
            canvas: SpatialCanvas::new(plot, config),
            season,
            notices: Vec::new(),
        }
    }

    /// Fetch the plot's objects for the season into the canvas.
    pub async fn load(&mut self) -> Result<usize> {
        let plot = self.canvas.plot().id;
        let records = self.store.list_objects(plot, self.season).await?;
        let count = records.len();
        self.canvas.load(records);
        Ok(count)
    }

    // --- Accessors ------------------------------------------------------

    #[must_use]
    pub fn canvas(&self) -> &SpatialCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut SpatialCanvas {
        &mut self.canvas
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn season(&self) -> SeasonId {
        self.season
    }

    /// Notices recorded since the last drain.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // --- Commits --------------------------------------------------------

    /// Write a canvas commit to the store. A rotation also carries the
    /// object's plantings and planting space along with it.
    pub async fn persist(&mut self, commit: &Commit) -> Result<()> {
        let object = commit.object();
        self.store
            .update_object(object, commit.to_patch())
            .await
            .map_err(|err| report(&mut self.notices, err, "update object"))?;
        if let Commit::Transform { width, height, .. } = *commit {
            self.follow_rotation(object, width, height).await?;
        }
        Ok(())
    }

    /// Finish a pointer drag and persist it.
    pub async fn pointer_up(&mut self, px: Point) -> Result<Option<Commit>> {
        let commit = self.canvas.pointer_up(px);
        if let Some(commit) = &commit {
            self.persist(commit).await?;
        }
        Ok(commit)
    }

    /// Route a key to the canvas and persist whatever it commits.
    pub async fn handle_key(&mut self, key: &KeyEvent) -> Result<KeyOutcome> {
        if let Some(id) = self.canvas.rotation_target(key) {
            match self.check_rotation(id).await {
                Ok(()) => {}
                Err(CanvasError::Validation(err)) => return Ok(KeyOutcome::Rejected(err)),
                Err(err) => return Err(err),
            }
        }
        let outcome = self.canvas.handle_key(key);
        if let KeyOutcome::Commit(commit) = &outcome {
            self.persist(commit).await?;
        }
        Ok(outcome)
    }

    pub async fn move_selected(&mut self, direction: Direction) -> Result<Option<Commit>> {
        let commit = self.canvas.move_selected(direction);
        if let Some(commit) = &commit {
            self.persist(commit).await?;
        }
        Ok(commit)
    }

    /// Rotate a quarter turn clockwise. Refused when the turned layout
    /// could not hold the object's plantings.
    pub async fn rotate(&mut self, id: ObjectId) -> Result<Commit> {
        self.check_rotation(id).await?;
        let commit = self.canvas.rotate(id)?;
        self.persist(&commit).await?;
        Ok(commit)
    }

    pub async fn restack(&mut self, id: ObjectId, order: StackOrder) -> Result<Commit> {
        let commit = self.canvas.restack(id, order)?;
        self.persist(&commit).await?;
        Ok(commit)
    }

    pub async fn rename(&mut self, id: ObjectId, label: &str) -> Result<Commit> {
        let commit = self.canvas.rename(id, label)?;
        self.persist(&commit).await?;
        Ok(commit)
    }

    pub async fn recolor(&mut self, id: ObjectId, color: &str) -> Result<Commit> {
        let commit = self.canvas.recolor(id, color)?;
        self.persist(&commit).await?;
        Ok(commit)
    }

    // --- Sizing ---------------------------------------------------------

    /// Resize to explicit inches, keeping the object's metadata.
    pub async fn resize(&mut self, id: ObjectId, width: f64, height: f64) -> Result<Commit> {
        let metadata = self.object(id)?.metadata.clone();
        self.apply_size(id, width, height, metadata).await
    }

    /// Resize from a size source (typed text, preset or volume).
    pub async fn resize_to(&mut self, id: ObjectId, source: &SizeSource) -> Result<Commit> {
        let object = self.object(id)?;
        let resolved = resolve_size(object.kind, source, self.canvas.config().default_unit)?;
        let metadata = ObjectMetadata {
            preset: resolved.metadata.preset,
            volume_gallons: resolved.metadata.volume_gallons,
            ..object.metadata.clone()
        };
        self.apply_size(id, resolved.width, resolved.height, metadata)
            .await
    }

    /// Change layout metadata (cell size, row spacing, row count) at the
    /// current size.
    pub async fn set_metadata(&mut self, id: ObjectId, metadata: ObjectMetadata) -> Result<Commit> {
        let object = self.object(id)?;
        let (width, height) = (object.width, object.height);
        self.apply_size(id, width, height, metadata).await
    }

    async fn apply_size(
        &mut self,
        id: ObjectId,
        width: f64,
        height: f64,
        metadata: ObjectMetadata,
    ) -> Result<Commit> {
        let kind = self.object(id)?.kind;
        self.canvas.preview_resize(id, width, height)?;
        let schema = calculate_schema(kind, width, height, &metadata);
        if let Some(schema) = &schema {
            let plantings = self
                .store
                .list_plantings(id, None)
                .await
                .map_err(|err| report(&mut self.notices, err, "list plantings"))?;
            let count = orphaned(schema, &plantings);
            if count > 0 {
                return Err(ValidationError::OrphanedPlantings { count }.into());
            }
        }
        let commit = self.canvas.resize(id, width, height, metadata)?;
        self.persist(&commit).await?;
        self.sync_space(id, schema).await?;
        Ok(commit)
    }

    // --- Add / delete ---------------------------------------------------

    /// Add a batch of objects arranged near-square from the plot corner.
    /// Returns the new ids in creation order.
    pub async fn add_objects(&mut self, request: AddObjects) -> Result<Vec<ObjectId>> {
        if request.count == 0 {
            return Ok(Vec::new());
        }
        let kind = request.kind;
        let caps = kind.capabilities();
        let config = self.canvas.config();
        let size = resolve_size(kind, &request.size, config.default_unit)?;
        let (width, height) = (size.width, size.height);

        let plot = self.canvas.plot();
        let bounds = plot.bounds();
        let arranged = arrange_batch(
            request.count,
            width,
            height,
            config.arrange_margin,
            config.arrange_spacing,
        );
        let origins = clamp_batch(&arranged, width, height, &bounds).ok_or(
            ValidationError::TooLarge {
                width,
                height,
                plot_width: bounds.width,
                plot_height: bounds.height,
            },
        )?;

        let base = match &request.label {
            Some(label) => normalize_label(label)?.to_owned(),
            None => caps.default_label.to_owned(),
        };
        let labels = unique_labels(&base, request.count, &self.canvas.labels());
        let color = request
            .color
            .clone()
            .unwrap_or_else(|| caps.default_color.to_owned());
        let schema = calculate_schema(kind, width, height, &size.metadata);
        let plot_id = plot.id;

        let mut ids = Vec::with_capacity(request.count);
        for (origin, label) in origins.into_iter().zip(labels) {
            let new = NewObject {
                plot: plot_id,
                season: self.season,
                kind,
                label,
                x: origin.x,
                y: origin.y,
                width,
                height,
                rotation: Rotation::Deg0,
                z: self.canvas.next_z(),
                color: color.clone(),
                metadata: size.metadata.clone(),
            };
            let record = self
                .store
                .create_object(new)
                .await
                .map_err(|err| report(&mut self.notices, err, "create object"))?;
            let id = record.id;
            self.canvas.insert(PlacedObject::from_record(record));
            ids.push(id);
            if let Some(schema) = schema {
                self.store
                    .create_space(id, schema)
                    .await
                    .map_err(|err| report(&mut self.notices, err, "create space"))?;
            }
        }
        tracing::info!(
            target: "sprout.session",
            kind = ?kind,
            count = ids.len(),
            "objects added"
        );
        Ok(ids)
    }

    /// Delete an object with its planting space and plantings.
    ///
    /// When plantings exist and `confirmed` is false nothing is deleted and
    /// the count is returned for the confirmation prompt.
    pub async fn delete_object(&mut self, id: ObjectId, confirmed: bool) -> Result<DeleteOutcome> {
        self.object(id)?;
        let space = self
            .store
            .get_space(id)
            .await
            .map_err(|err| report(&mut self.notices, err, "get space"))?;
        let plantings = match &space {
            Some(_) => self
                .store
                .list_plantings(id, None)
                .await
                .map_err(|err| report(&mut self.notices, err, "list plantings"))?,
            None => Vec::new(),
        };
        if !plantings.is_empty() && !confirmed {
            return Ok(DeleteOutcome::ConfirmationRequired {
                planting_count: plantings.len(),
            });
        }

        for planting in &plantings {
            already_gone(self.store.delete_planting(planting.id).await)
                .map_err(|err| report(&mut self.notices, err, "delete planting"))?;
        }
        if let Some(space) = space {
            already_gone(self.store.delete_space(space.id).await)
                .map_err(|err| report(&mut self.notices, err, "delete space"))?;
        }
        already_gone(self.store.delete_object(id).await)
            .map_err(|err| report(&mut self.notices, err, "delete object"))?;
        self.canvas.remove(id);
        tracing::info!(
            target: "sprout.session",
            object = %id,
            plantings = plantings.len(),
            "object deleted"
        );
        Ok(DeleteOutcome::Deleted {
            plantings_removed: plantings.len(),
        })
    }

    // --- Plantings ------------------------------------------------------

    /// This season's plantings in an object.
    pub async fn plantings(&mut self, object: ObjectId) -> Result<Vec<Planting>> {
        self.object(object)?;
        self.store
            .list_plantings(object, Some(self.season))
            .await
            .map_err(|err| report(&mut self.notices, err, "list plantings"))
    }

    /// Used vs. available capacity this season.
    pub async fn occupancy(&mut self, object: ObjectId) -> Result<Occupancy> {
        let schema = self.schema_of(object)?;
        let rects: Vec<CellRect> = self
            .plantings(object)
            .await?
            .iter()
            .map(Planting::cell_rect)
            .collect();
        Ok(schema.occupancy(&rects))
    }

    /// The placement grid of a grid object, filled with this season's
    /// plantings.
    pub async fn placement_grid(
        &mut self,
        object: ObjectId,
    ) -> Result<GridPlacementEngine<PlantingId>> {
        let kind = self.object(object)?.kind;
        let dims = self
            .schema_of(object)?
            .grid_dims()
            .ok_or(ValidationError::NoGrid(kind))?;
        let plantings = self.plantings(object).await?;
        Ok(build_grid(dims, &plantings))
    }

    /// Place a crop in an object.
    pub async fn place_planting(
        &mut self,
        object: ObjectId,
        request: PlantingRequest,
    ) -> Result<Planting> {
        let crop = request.crop.trim();
        if crop.is_empty() {
            return Err(ValidationError::EmptyCrop.into());
        }
        let schema = self.schema_of(object)?;
        let existing = self.plantings(object).await?;

        let rect = match schema.grid_dims() {
            Some(dims) => {
                let footprint = request.method.footprint(request.spacing, cell_size_of(&schema));
                let grid = build_grid(dims, &existing);
                let (col, row) = match request.origin {
                    Some(origin) => origin,
                    None => grid
                        .first_free_origin(footprint)
                        .ok_or(ValidationError::NoFreeCells)?,
                };
                let rect = CellRect::new(col, row, footprint);
                grid.check(rect, None).map_err(ValidationError::from)?;
                rect
            }
            None => {
                let full = ValidationError::CapacityReached {
                    capacity: schema.capacity(),
                };
                let count = u32::try_from(existing.len()).unwrap_or(u32::MAX);
                if !schema.admits_another(count) {
                    return Err(full.into());
                }
                let index = lowest_free_index(&existing);
                if !schema.is_flexible() && i64::from(index) >= i64::from(schema.capacity()) {
                    return Err(full.into());
                }
                CellRect::new(0, index, Footprint::SINGLE)
            }
        };

        let planting = self
            .store
            .create_planting(NewPlanting {
                object,
                season: self.season,
                crop: crop.to_owned(),
                rect,
            })
            .await
            .map_err(|err| report(&mut self.notices, err, "create planting"))?;
        tracing::info!(
            target: "sprout.session",
            object = %object,
            planting = %planting.id,
            col = rect.col,
            row = rect.row,
            "planting placed"
        );
        Ok(planting)
    }

    /// Move a planting's origin within its object's grid.
    pub async fn move_planting(
        &mut self,
        object: ObjectId,
        planting: PlantingId,
        col: i32,
        row: i32,
    ) -> Result<CellRect> {
        let mut grid = self.placement_grid(object).await?;
        if grid.rect_of(planting).is_none() {
            return Err(ValidationError::UnknownPlanting(planting).into());
        }
        let rect = grid
            .move_to(planting, col, row)
            .map_err(ValidationError::from)?;
        self.store
            .update_planting(planting, rect)
            .await
            .map_err(|err| report(&mut self.notices, err, "update planting"))?;
        Ok(rect)
    }

    pub async fn remove_planting(&mut self, planting: PlantingId) -> Result<()> {
        match self.store.delete_planting(planting).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(ValidationError::UnknownPlanting(planting).into()),
            Err(err) => Err(report(&mut self.notices, err, "delete planting")),
        }
    }

    // --- Internal -------------------------------------------------------

    fn object(&self, id: ObjectId) -> std::result::Result<&PlacedObject, ValidationError> {
        self.canvas
            .object(id)
            .ok_or(ValidationError::UnknownObject(id))
    }

    fn schema_of(&self, id: ObjectId) -> std::result::Result<LayoutSchema, ValidationError> {
        let object = self.object(id)?;
        object
            .schema()
            .ok_or(ValidationError::NotPlantable(object.kind))
    }

    /// Grid plantings turn with their object. Row and slot layouts are
    /// recounted for the swapped footprint and must still hold every
    /// planting.
    async fn check_rotation(&mut self, id: ObjectId) -> Result<()> {
        let object = self.object(id)?;
        let Some(after) =
            calculate_schema(object.kind, object.height, object.width, &object.metadata)
        else {
            return Ok(());
        };
        if after.grid_dims().is_some() {
            return Ok(());
        }
        let plantings = self
            .store
            .list_plantings(id, None)
            .await
            .map_err(|err| report(&mut self.notices, err, "list plantings"))?;
        let count = orphaned(&after, &plantings);
        if count > 0 {
            return Err(ValidationError::OrphanedPlantings { count }.into());
        }
        Ok(())
    }

    /// Rotate stored plantings with their object and refresh its space.
    /// `width`/`height` are the footprint after the turn.
    async fn follow_rotation(&mut self, id: ObjectId, width: f64, height: f64) -> Result<()> {
        let Some(object) = self.canvas.object(id) else {
            return Ok(());
        };
        let before = calculate_schema(object.kind, height, width, &object.metadata);
        let after = calculate_schema(object.kind, width, height, &object.metadata);
        if let Some(dims) = before.as_ref().and_then(LayoutSchema::grid_dims) {
            let plantings = self
                .store
                .list_plantings(id, None)
                .await
                .map_err(|err| report(&mut self.notices, err, "list plantings"))?;
            for planting in &plantings {
                let rect = planting.cell_rect().rotated_clockwise(dims);
                self.store
                    .update_planting(planting.id, rect)
                    .await
                    .map_err(|err| report(&mut self.notices, err, "update planting"))?;
            }
        }
        self.sync_space(id, after).await
    }

    /// Make the stored planting space match `schema`.
    async fn sync_space(&mut self, id: ObjectId, schema: Option<LayoutSchema>) -> Result<()> {
        let Some(schema) = schema else {
            return Ok(());
        };
        let space = self
            .store
            .get_space(id)
            .await
            .map_err(|err| report(&mut self.notices, err, "get space"))?;
        match space {
            Some(space) if space.schema == schema => Ok(()),
            Some(space) => self
                .store
                .update_space(space.id, schema)
                .await
                .map_err(|err| report(&mut self.notices, err, "update space")),
            None => self
                .store
                .create_space(id, schema)
                .await
                .map(|_| ())
                .map_err(|err| report(&mut self.notices, err, "create space")),
        }
    }
}

/// Grid filled with stored plantings. Records that no longer fit (from
/// an older layout) are skipped.
fn build_grid(dims: GridDims, plantings: &[Planting]) -> GridPlacementEngine<PlantingId> {
    let mut grid = GridPlacementEngine::new(dims);
    for planting in plantings {
        if let Err(err) = grid.place(planting.id, planting.cell_rect()) {
            tracing::warn!(
                target: "sprout.session",
                planting = %planting.id,
                error = %err,
                "stored planting does not fit its grid"
            );
        }
    }
    grid
}
