#![forbid(unsafe_code)]

//! Planting layout: what an object can hold and where plantings go.
//!
//! # Role in sprout
//! `sprout-layout` is pure computation over sizes and cells. It has no
//! notion of a plot, a viewport or a store.
//!
//! - [`kind`]: the closed set of object kinds and their capability records.
//! - [`schema`]: derives a [`LayoutSchema`] (grid / rows / slots) from a kind,
//!   a size and metadata.
//! - [`placement`]: the [`GridPlacementEngine`] that accepts or rejects
//!   planting rectangles on an object's cell grid.

pub mod kind;
pub mod placement;
pub mod schema;

pub use kind::{KindCapabilities, ObjectKind, ObjectMetadata, SizePreset, footprint_for_volume};
pub use placement::{
    CELL_SIZE, CellRect, CellRole, Footprint, GridDims, GridPlacementEngine, Occupant,
    PlacementError, PlantingMethod,
};
pub use schema::{
    DEFAULT_CELL_SIZE, DEFAULT_ROW_SPACING, DEFAULT_SLOT_CAPACITY, LayoutSchema, Occupancy,
    calculate_schema,
};
