#![forbid(unsafe_code)]

//! Plot, placed objects, planting spaces, plantings, and the records a
//! store exchanges for them.

use std::fmt;

use serde::{Deserialize, Serialize};
use sprout_core::geometry::Rect;
use sprout_layout::{CellRect, Footprint, LayoutSchema, ObjectKind, ObjectMetadata, calculate_schema};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

id_type!(PlotId, "plot");
id_type!(
    /// Assigned by the store on creation.
    ObjectId,
    "object"
);
id_type!(SpaceId, "space");
id_type!(PlantingId, "planting");
id_type!(
    /// A growing season. Plantings belong to one; objects are listed per
    /// season.
    SeasonId,
    "season"
);

/// Quarter-turn orientation of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// The next orientation, 90° clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Whether the footprint is transposed relative to 0°.
    #[must_use]
    pub const fn is_quarter(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees).ok_or_else(|| format!("rotation must be 0/90/180/270, got {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// The bounded area objects are laid out on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: PlotId,
    pub width: f64,
    pub height: f64,
    /// Snap unit and visible grid spacing, inches.
    pub grid_unit: f64,
    pub show_grid: bool,
    pub background: String,
}

impl Plot {
    #[must_use]
    pub fn new(id: PlotId, width: f64, height: f64) -> Self {
        Self {
            id,
            width,
            height,
            grid_unit: 12.0,
            show_grid: true,
            background: "#f1f8e9".to_owned(),
        }
    }

    #[must_use]
    pub fn with_grid_unit(mut self, grid_unit: f64) -> Self {
        self.grid_unit = grid_unit;
        self
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }
}

/// An object as the canvas holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Current footprint width. Already swapped for quarter turns.
    pub width: f64,
    pub height: f64,
    pub rotation: Rotation,
    /// Stacking order; higher draws on top.
    pub z: i32,
    pub color: String,
    pub metadata: ObjectMetadata,
}

impl PlacedObject {
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Planting layout for the current size, `None` when not plantable.
    #[must_use]
    pub fn schema(&self) -> Option<LayoutSchema> {
        calculate_schema(self.kind, self.width, self.height, &self.metadata)
    }

    /// Build from a stored record. Missing or malformed rotation reads as 0°.
    #[must_use]
    pub fn from_record(record: ObjectRecord) -> Self {
        let rotation = record
            .rotation
            .and_then(Rotation::from_degrees)
            .unwrap_or_default();
        Self {
            id: record.id,
            kind: record.kind,
            label: record.label,
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            rotation,
            z: record.z,
            color: record.color,
            metadata: record.metadata,
        }
    }
}

/// An object as a store persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub plot: PlotId,
    pub season: SeasonId,
    pub kind: ObjectKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees; older records may lack it.
    #[serde(default)]
    pub rotation: Option<u16>,
    #[serde(default)]
    pub z: i32,
    pub color: String,
    #[serde(default)]
    pub metadata: ObjectMetadata,
}

impl ObjectRecord {
    /// Apply the fields a patch carries.
    pub fn apply(&mut self, patch: &ObjectPatch) {
        if let Some(label) = &patch.label {
            self.label.clone_from(label);
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = Some(rotation.degrees());
        }
        if let Some(z) = patch.z {
            self.z = z;
        }
        if let Some(color) = &patch.color {
            self.color.clone_from(color);
        }
        if let Some(metadata) = &patch.metadata {
            self.metadata = metadata.clone();
        }
    }
}

/// Fields for a new object; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObject {
    pub plot: PlotId,
    pub season: SeasonId,
    pub kind: ObjectKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: Rotation,
    pub z: i32,
    pub color: String,
    pub metadata: ObjectMetadata,
}

impl NewObject {
    #[must_use]
    pub fn into_record(self, id: ObjectId) -> ObjectRecord {
        ObjectRecord {
            id,
            plot: self.plot,
            season: self.season,
            kind: self.kind,
            label: self.label,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: Some(self.rotation.degrees()),
            z: self.z,
            color: self.color,
            metadata: self.metadata,
        }
    }
}

/// A partial object update. Absent fields are left as stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMetadata>,
}

/// The persisted schema of a plantable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingSpace {
    pub id: SpaceId,
    pub object: ObjectId,
    pub schema: LayoutSchema,
}

/// One crop placed in an object for a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planting {
    pub id: PlantingId,
    pub object: ObjectId,
    pub season: SeasonId,
    pub crop: String,
    pub col: i32,
    pub row: i32,
    pub span_cols: u32,
    pub span_rows: u32,
}

impl Planting {
    #[must_use]
    pub const fn cell_rect(&self) -> CellRect {
        CellRect::new(self.col, self.row, Footprint::new(self.span_cols, self.span_rows))
    }

    pub fn set_cell_rect(&mut self, rect: CellRect) {
        self.col = rect.col;
        self.row = rect.row;
        self.span_cols = rect.span_cols;
        self.span_rows = rect.span_rows;
    }
}

/// Fields for a new planting; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlanting {
    pub object: ObjectId,
    pub season: SeasonId,
    pub crop: String,
    pub rect: CellRect,
}

impl NewPlanting {
    #[must_use]
    pub fn into_planting(self, id: PlantingId) -> Planting {
        Planting {
            id,
            object: self.object,
            season: self.season,
            crop: self.crop,
            col: self.rect.col,
            row: self.rect.row,
            span_cols: self.rect.span_cols,
            span_rows: self.rect.span_rows,
        }
    }
}
