#![forbid(unsafe_code)]

//! Error model and the severity each error carries for the host UI.
//!
//! Validation errors are detected before any state changes and block the
//! action that caused them. Persistence errors happen after the canvas has
//! already updated locally; they are reported as non-blocking notices and
//! the local state is kept.

use sprout_core::units::DimensionParseError;
use sprout_layout::{ObjectKind, PlacementError};
use thiserror::Error;

use crate::model::{ObjectId, PlantingId};

/// A request that cannot be honoured as asked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("a {width}x{height} object does not fit in a {plot_width}x{plot_height} plot")]
    TooLarge {
        width: f64,
        height: f64,
        plot_width: f64,
        plot_height: f64,
    },
    #[error("planting rejected: {0}")]
    Placement(#[from] PlacementError),
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("another object is already labelled {0:?}")]
    DuplicateLabel(String),
    #[error("invalid size: {0}")]
    Size(#[from] DimensionParseError),
    #[error("{kind:?} objects cannot be sized by {method}")]
    UnsupportedSizeSource {
        kind: ObjectKind,
        method: &'static str,
    },
    #[error("unknown size preset {0:?}")]
    UnknownPreset(String),
    #[error("container volume must be a positive number of gallons")]
    InvalidVolume,
    #[error("no {0}")]
    UnknownObject(ObjectId),
    #[error("no {0}")]
    UnknownPlanting(PlantingId),
    #[error("{0:?} objects cannot hold plantings")]
    NotPlantable(ObjectKind),
    #[error("{0:?} objects have no planting grid")]
    NoGrid(ObjectKind),
    #[error("crop name must not be empty")]
    EmptyCrop,
    #[error("all {capacity} slots are taken")]
    CapacityReached { capacity: u32 },
    #[error("no free cells fit the planting")]
    NoFreeCells,
    #[error("the new layout would leave {count} planting(s) without a place")]
    OrphanedPlantings { count: usize },
}

/// Failure reported by a [`PlotStore`](crate::store::PlotStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("store backend failed: {0}")]
    Backend(String),
}

/// Any error a canvas session surfaces.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not save changes: {0}")]
    Persistence(#[from] StoreError),
}

/// How the host should present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The action did not happen; tell the user why.
    Blocking,
    /// The action happened locally but was not saved.
    NonBlocking,
}

/// A message for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl CanvasError {
    /// Severity the host should present this error with.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Validation(_) => Severity::Blocking,
            Self::Persistence(_) => Severity::NonBlocking,
        }
    }

    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice {
            severity: self.severity(),
            message: self.to_string(),
        }
    }
}

/// Standard result type for canvas sessions.
pub type Result<T> = std::result::Result<T, CanvasError>;
