#![forbid(unsafe_code)]

//! The plot canvas and its editing session.
//!
//! # Role in sprout
//! `sprout-canvas` holds the interactive state of one garden plot: placed
//! objects, selection, viewport, drag and touch routing. The canvas itself
//! is synchronous and produces [`Commit`]s; a [`PlotSession`] writes them
//! to a [`PlotStore`].
//!
//! - [`model`]: ids, plots, placed objects, planting spaces, plantings.
//! - [`canvas`]: the [`SpatialCanvas`] (hit test, drag, keyboard, rotate).
//! - [`touch`]: multi-touch routing onto the canvas (tap, long press,
//!   drag, pinch).
//! - [`viewport`]: zoom, pinch tracking and grid snapping.
//! - [`session`]: store-backed edits, batch add, cascade delete, plantings.
//! - [`store`]: the async persistence boundary and an in-memory store.

pub mod arrange;
pub mod canvas;
pub mod config;
pub mod error;
pub mod labels;
pub mod model;
pub mod session;
pub mod sizing;
pub mod store;
pub mod touch;
pub mod viewport;

pub use canvas::{Commit, Direction, KeyOutcome, SpatialCanvas, StackOrder};
pub use config::{CanvasConfig, ConfigError, GestureSettings};
pub use error::{CanvasError, Notice, Result, Severity, StoreError, ValidationError};
pub use model::{
    NewObject, NewPlanting, ObjectId, ObjectPatch, ObjectRecord, PlacedObject, Planting,
    PlantingId, PlantingSpace, Plot, PlotId, Rotation, SeasonId, SpaceId,
};
pub use session::{AddObjects, DeleteOutcome, PlantingRequest, PlotSession};
pub use sizing::{ResolvedSize, SizeSource, resolve_size};
pub use store::{MemoryStore, PlotStore};
pub use touch::{TouchOutcome, TouchRouter};
pub use viewport::Viewport;
