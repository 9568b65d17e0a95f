#![forbid(unsafe_code)]

//! Grid placement of plantings inside one object.
//!
//! An object's planting area is divided into square cells of
//! [`CELL_SIZE`] inches. A planting occupies a rectangle of whole cells
//! starting at its origin cell. The [`GridPlacementEngine`] holds every
//! occupant of one object and enforces two rules:
//!
//! 1. Every covered cell lies inside `[0, columns) × [0, rows)`.
//! 2. No two occupants' rectangles overlap.
//!
//! Only an occupant's origin cell is its interactive anchor; the other
//! cells it covers are passive (see [`CellRole`]).

use std::fmt;

use serde::{Deserialize, Serialize};
use sprout_core::geometry::Rect;

/// Edge length of one planting cell, in inches.
pub const CELL_SIZE: f64 = 12.0;

/// Under [`PlantingMethod::Compact`], spacing at or above this many inches
/// takes a 2×2 block.
pub const COMPACT_LARGE_SPACING: f64 = 18.0;

/// Column/row count of an object's cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridDims {
    pub columns: u32,
    pub rows: u32,
}

impl GridDims {
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Whole cells that fit in a `width × height` inch area.
    #[must_use]
    pub fn from_size(width: f64, height: f64, cell_size: f64) -> Self {
        if !(cell_size > 0.0) {
            return Self::default();
        }
        Self {
            columns: whole_cells(width, cell_size),
            rows: whole_cells(height, cell_size),
        }
    }

    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// Dimensions after a quarter turn.
    #[must_use]
    pub const fn transposed(&self) -> Self {
        Self::new(self.rows, self.columns)
    }
}

fn whole_cells(length: f64, cell_size: f64) -> u32 {
    let cells = (length / cell_size).floor();
    if cells.is_finite() && cells > 0.0 {
        cells as u32
    } else {
        0
    }
}

/// Cell span of one planting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    pub span_cols: u32,
    pub span_rows: u32,
}

impl Footprint {
    pub const SINGLE: Footprint = Footprint::new(1, 1);

    #[must_use]
    pub const fn new(span_cols: u32, span_rows: u32) -> Self {
        Self {
            span_cols,
            span_rows,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.span_cols == 0 || self.span_rows == 0
    }
}

/// How a plant's spacing requirement becomes a cell footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantingMethod {
    /// Square-foot style: small plants share one cell, large plants take a
    /// 2×2 block.
    #[default]
    Compact,
    /// Each axis spans `ceil(spacing / cell_size)` cells.
    Spaced,
}

impl PlantingMethod {
    /// Footprint for a plant needing `spacing` inches between neighbours.
    #[must_use]
    pub fn footprint(self, spacing: f64, cell_size: f64) -> Footprint {
        match self {
            Self::Compact => {
                if spacing >= COMPACT_LARGE_SPACING {
                    Footprint::new(2, 2)
                } else {
                    Footprint::SINGLE
                }
            }
            Self::Spaced => {
                let span = if cell_size > 0.0 && spacing.is_finite() && spacing > 0.0 {
                    ((spacing / cell_size).ceil() as u32).max(1)
                } else {
                    1
                };
                Footprint::new(span, span)
            }
        }
    }
}

/// A rectangle of cells: origin plus span.
///
/// The origin is signed so that requests falling off the top or left edge
/// can be expressed and rejected rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRect {
    pub col: i32,
    pub row: i32,
    pub span_cols: u32,
    pub span_rows: u32,
}

impl CellRect {
    #[must_use]
    pub const fn new(col: i32, row: i32, footprint: Footprint) -> Self {
        Self {
            col,
            row,
            span_cols: footprint.span_cols,
            span_rows: footprint.span_rows,
        }
    }

    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        Footprint::new(self.span_cols, self.span_rows)
    }

    /// One past the last covered column.
    #[must_use]
    pub fn end_col(&self) -> i64 {
        i64::from(self.col) + i64::from(self.span_cols)
    }

    /// One past the last covered row.
    #[must_use]
    pub fn end_row(&self) -> i64 {
        i64::from(self.row) + i64::from(self.span_rows)
    }

    #[must_use]
    pub fn contains_cell(&self, col: i32, row: i32) -> bool {
        i64::from(col) >= i64::from(self.col)
            && i64::from(col) < self.end_col()
            && i64::from(row) >= i64::from(self.row)
            && i64::from(row) < self.end_row()
    }

    /// Axis-aligned overlap test.
    #[must_use]
    pub fn overlaps(&self, other: &CellRect) -> bool {
        i64::from(self.col) < other.end_col()
            && i64::from(other.col) < self.end_col()
            && i64::from(self.row) < other.end_row()
            && i64::from(other.row) < self.end_row()
    }

    /// Whether every covered cell lies inside the grid.
    #[must_use]
    pub fn within(&self, dims: GridDims) -> bool {
        self.col >= 0
            && self.row >= 0
            && self.end_col() <= i64::from(dims.columns)
            && self.end_row() <= i64::from(dims.rows)
    }

    #[must_use]
    pub const fn area(&self) -> u32 {
        self.span_cols * self.span_rows
    }

    /// Physical rectangle inside the object, in inches from its top-left.
    #[must_use]
    pub fn to_local_rect(&self, cell_size: f64) -> Rect {
        Rect::new(
            f64::from(self.col) * cell_size,
            f64::from(self.row) * cell_size,
            f64::from(self.span_cols) * cell_size,
            f64::from(self.span_rows) * cell_size,
        )
    }

    /// The same cells after the grid of `dims` turns 90° clockwise.
    #[must_use]
    pub fn rotated_clockwise(&self, dims: GridDims) -> CellRect {
        let rows = i64::from(dims.rows);
        let col = rows - self.end_row();
        CellRect {
            col: col as i32,
            row: self.col,
            span_cols: self.span_rows,
            span_rows: self.span_cols,
        }
    }
}

/// What a single cell means for input and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole<K> {
    Empty,
    /// Origin cell of occupant `K`: the only interactive cell it owns.
    Anchor(K),
    /// Covered by occupant `K` but not its origin. Must not take input.
    Covered(K),
}

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// The footprint has a zero span.
    EmptyFootprint,
    /// Some covered cell falls outside the grid.
    OutOfBounds { rect: CellRect, dims: GridDims },
    /// The rectangle overlaps another occupant.
    Collision { rect: CellRect, occupied: CellRect },
    /// No occupant with that key.
    UnknownOccupant,
    /// An occupant with that key is already placed.
    DuplicateOccupant,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFootprint => write!(f, "planting footprint is empty"),
            Self::OutOfBounds { rect, dims } => write!(
                f,
                "cells {}x{} at ({}, {}) fall outside the {}x{} grid",
                rect.span_cols, rect.span_rows, rect.col, rect.row, dims.columns, dims.rows
            ),
            Self::Collision { rect, occupied } => write!(
                f,
                "cells at ({}, {}) overlap the planting at ({}, {})",
                rect.col, rect.row, occupied.col, occupied.row
            ),
            Self::UnknownOccupant => write!(f, "no such planting"),
            Self::DuplicateOccupant => write!(f, "planting is already placed"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// A placed occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant<K> {
    pub key: K,
    pub rect: CellRect,
}

/// Collision detection and placement for one object's cell grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPlacementEngine<K> {
    dims: GridDims,
    occupants: Vec<Occupant<K>>,
}

impl<K: Copy + Eq> GridPlacementEngine<K> {
    /// An empty grid.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            occupants: Vec::new(),
        }
    }

    /// An empty grid for an object of `width × height` inches with the
    /// standard cell.
    #[must_use]
    pub fn for_object(width: f64, height: f64) -> Self {
        Self::new(GridDims::from_size(width, height, CELL_SIZE))
    }

    /// Build a grid from stored occupants, validating each in order.
    pub fn with_occupants(
        dims: GridDims,
        occupants: impl IntoIterator<Item = (K, CellRect)>,
    ) -> Result<Self, PlacementError> {
        let mut engine = Self::new(dims);
        for (key, rect) in occupants {
            engine.place(key, rect)?;
        }
        Ok(engine)
    }

    #[inline]
    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[must_use]
    pub fn occupants(&self) -> &[Occupant<K>] {
        &self.occupants
    }

    #[must_use]
    pub fn rect_of(&self, key: K) -> Option<CellRect> {
        self.occupants
            .iter()
            .find(|occupant| occupant.key == key)
            .map(|occupant| occupant.rect)
    }

    /// Validate a rectangle against the bounds and every occupant other
    /// than `exclude`.
    pub fn check(&self, rect: CellRect, exclude: Option<K>) -> Result<(), PlacementError> {
        if rect.footprint().is_empty() {
            return Err(PlacementError::EmptyFootprint);
        }
        if !rect.within(self.dims) {
            return Err(PlacementError::OutOfBounds {
                rect,
                dims: self.dims,
            });
        }
        let clash = self
            .occupants
            .iter()
            .filter(|occupant| Some(occupant.key) != exclude)
            .find(|occupant| occupant.rect.overlaps(&rect));
        match clash {
            Some(occupant) => Err(PlacementError::Collision {
                rect,
                occupied: occupant.rect,
            }),
            None => Ok(()),
        }
    }

    /// Whether `rect` could be placed as a new occupant.
    #[must_use]
    pub fn can_place(&self, rect: CellRect) -> bool {
        self.check(rect, None).is_ok()
    }

    /// Add a new occupant.
    pub fn place(&mut self, key: K, rect: CellRect) -> Result<(), PlacementError> {
        if self.rect_of(key).is_some() {
            return Err(PlacementError::DuplicateOccupant);
        }
        self.check(rect, None)?;
        self.occupants.push(Occupant { key, rect });
        Ok(())
    }

    /// Move an occupant to a new origin, keeping its footprint. The occupant
    /// does not collide with its own old position.
    pub fn move_to(&mut self, key: K, col: i32, row: i32) -> Result<CellRect, PlacementError> {
        let index = self.index_of(key)?;
        let rect = CellRect::new(col, row, self.occupants[index].rect.footprint());
        self.check(rect, Some(key))?;
        self.occupants[index].rect = rect;
        Ok(rect)
    }

    /// Change an occupant's footprint in place.
    pub fn reshape(&mut self, key: K, footprint: Footprint) -> Result<CellRect, PlacementError> {
        let index = self.index_of(key)?;
        let current = self.occupants[index].rect;
        let rect = CellRect::new(current.col, current.row, footprint);
        self.check(rect, Some(key))?;
        self.occupants[index].rect = rect;
        Ok(rect)
    }

    pub fn remove(&mut self, key: K) -> Option<CellRect> {
        let index = self.index_of(key).ok()?;
        Some(self.occupants.remove(index).rect)
    }

    /// Role of one cell for rendering and hit-testing.
    #[must_use]
    pub fn cell_role(&self, col: i32, row: i32) -> CellRole<K> {
        for occupant in &self.occupants {
            if occupant.rect.col == col && occupant.rect.row == row {
                return CellRole::Anchor(occupant.key);
            }
            if occupant.rect.contains_cell(col, row) {
                return CellRole::Covered(occupant.key);
            }
        }
        CellRole::Empty
    }

    /// The occupant whose anchor is at this cell, if any. Covered cells
    /// never resolve to an occupant.
    #[must_use]
    pub fn anchor_at(&self, col: i32, row: i32) -> Option<K> {
        match self.cell_role(col, row) {
            CellRole::Anchor(key) => Some(key),
            CellRole::Empty | CellRole::Covered(_) => None,
        }
    }

    /// Row-major roles for the whole grid.
    #[must_use]
    pub fn cell_map(&self) -> Vec<CellRole<K>> {
        let mut map = Vec::with_capacity(self.dims.cell_count() as usize);
        for row in 0..self.dims.rows {
            for col in 0..self.dims.columns {
                map.push(self.cell_role(col as i32, row as i32));
            }
        }
        map
    }

    /// First origin, scanning row by row, where `footprint` fits.
    #[must_use]
    pub fn first_free_origin(&self, footprint: Footprint) -> Option<(i32, i32)> {
        if footprint.is_empty()
            || footprint.span_cols > self.dims.columns
            || footprint.span_rows > self.dims.rows
        {
            return None;
        }
        let last_row = self.dims.rows - footprint.span_rows;
        let last_col = self.dims.columns - footprint.span_cols;
        (0..=last_row)
            .flat_map(|row| (0..=last_col).map(move |col| (col as i32, row as i32)))
            .find(|&(col, row)| self.can_place(CellRect::new(col, row, footprint)))
    }

    /// Cells covered by some occupant. Occupants never overlap, so this is
    /// the sum of their areas.
    #[must_use]
    pub fn occupied_cells(&self) -> u32 {
        self.occupants.iter().map(|occupant| occupant.rect.area()).sum()
    }

    #[must_use]
    pub fn free_cells(&self) -> u32 {
        self.dims.cell_count().saturating_sub(self.occupied_cells())
    }

    /// The grid after its object turns 90° clockwise, with every occupant
    /// carried along.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            dims: self.dims.transposed(),
            occupants: self
                .occupants
                .iter()
                .map(|occupant| Occupant {
                    key: occupant.key,
                    rect: occupant.rect.rotated_clockwise(self.dims),
                })
                .collect(),
        }
    }

    /// The same occupants on a grid of new dimensions. Fails if any
    /// occupant would fall outside.
    pub fn resized(&self, dims: GridDims) -> Result<Self, PlacementError> {
        if let Some(occupant) = self.occupants.iter().find(|o| !o.rect.within(dims)) {
            return Err(PlacementError::OutOfBounds {
                rect: occupant.rect,
                dims,
            });
        }
        Ok(Self {
            dims,
            occupants: self.occupants.clone(),
        })
    }

    fn index_of(&self, key: K) -> Result<usize, PlacementError> {
        self.occupants
            .iter()
            .position(|occupant| occupant.key == key)
            .ok_or(PlacementError::UnknownOccupant)
    }
}
