#![forbid(unsafe_code)]

//! Capacity schemas derived from an object's kind, size and metadata.

use serde::{Deserialize, Serialize};

use crate::kind::{ObjectKind, ObjectMetadata};
use crate::placement::{CellRect, GridDims};

pub const DEFAULT_CELL_SIZE: f64 = 12.0;
pub const DEFAULT_ROW_SPACING: f64 = 12.0;
/// Slot count for plantable kinds with no more specific layout.
pub const DEFAULT_SLOT_CAPACITY: u32 = 10;

/// How plantings are arranged inside an object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutSchema {
    /// Square cells; plantings occupy rectangles of cells.
    Grid {
        columns: u32,
        rows: u32,
        cell_size: f64,
    },
    /// Parallel rows across the object's width.
    Rows { count: u32, spacing: f64 },
    /// Unstructured slots. A flexible schema takes any number of
    /// occupants and counts them instead of measuring coverage.
    Slots { count: u32, flexible: bool },
}

/// Used vs. available capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Occupancy {
    pub used: u32,
    pub capacity: u32,
}

impl Occupancy {
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.used)
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.used >= self.capacity
    }

    /// Fill ratio in `[0, ∞)`; flexible schemas may exceed 1.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        f64::from(self.used) / f64::from(self.capacity)
    }
}

impl LayoutSchema {
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        match *self {
            Self::Grid { columns, rows, .. } => columns * rows,
            Self::Rows { count, .. } => count,
            Self::Slots { count, .. } => count,
        }
    }

    #[must_use]
    pub const fn is_flexible(&self) -> bool {
        matches!(self, Self::Slots { flexible: true, .. })
    }

    /// Cell grid for grid schemas; `None` for rows and slots.
    #[must_use]
    pub const fn grid_dims(&self) -> Option<GridDims> {
        match *self {
            Self::Grid { columns, rows, .. } => Some(GridDims::new(columns, rows)),
            Self::Rows { .. } | Self::Slots { .. } => None,
        }
    }

    /// Occupancy given the occupants' cell rectangles.
    ///
    /// Grids count covered cells; rows and slots count occupants.
    #[must_use]
    pub fn occupancy(&self, occupants: &[CellRect]) -> Occupancy {
        let used = match self {
            Self::Grid { .. } => occupants.iter().map(CellRect::area).sum(),
            Self::Rows { .. } | Self::Slots { .. } => {
                u32::try_from(occupants.len()).unwrap_or(u32::MAX)
            }
        };
        Occupancy {
            used,
            capacity: self.capacity(),
        }
    }

    /// Whether a count-based schema can take one more occupant beside
    /// `current` existing ones. Grids always defer to placement checks.
    #[must_use]
    pub const fn admits_another(&self, current: u32) -> bool {
        match *self {
            Self::Grid { .. } => true,
            Self::Slots { flexible: true, .. } => true,
            Self::Rows { count, .. } | Self::Slots { count, .. } => current < count,
        }
    }

    /// The schema after a quarter turn of its object.
    #[must_use]
    pub const fn transposed(&self) -> Self {
        match *self {
            Self::Grid {
                columns,
                rows,
                cell_size,
            } => Self::Grid {
                columns: rows,
                rows: columns,
                cell_size,
            },
            other => other,
        }
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn whole(length: f64, unit: f64) -> u32 {
    let n = (length / unit).floor();
    if n.is_finite() && n > 0.0 { n as u32 } else { 0 }
}

/// Derive the schema for an object. Non-plantable kinds have none.
#[must_use]
pub fn calculate_schema(
    kind: ObjectKind,
    width: f64,
    height: f64,
    metadata: &ObjectMetadata,
) -> Option<LayoutSchema> {
    let caps = kind.capabilities();
    if !caps.plantable {
        return None;
    }
    let schema = if caps.grid_based {
        let cell_size = positive_or(metadata.cell_size, DEFAULT_CELL_SIZE);
        LayoutSchema::Grid {
            columns: whole(width, cell_size),
            rows: whole(height, cell_size),
            cell_size,
        }
    } else if caps.row_based {
        let spacing = positive_or(metadata.row_spacing, DEFAULT_ROW_SPACING);
        let count = metadata
            .row_count
            .unwrap_or_else(|| whole(width, spacing));
        LayoutSchema::Rows { count, spacing }
    } else if caps.single_slot {
        LayoutSchema::Slots {
            count: 1,
            flexible: true,
        }
    } else {
        LayoutSchema::Slots {
            count: DEFAULT_SLOT_CAPACITY,
            flexible: false,
        }
    };
    Some(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Footprint;

    #[test]
    fn raised_bed_four_by_eight() {
        let schema =
            calculate_schema(ObjectKind::RaisedBed, 48.0, 96.0, &ObjectMetadata::default())
                .unwrap();
        assert_eq!(
            schema,
            LayoutSchema::Grid {
                columns: 4,
                rows: 8,
                cell_size: 12.0
            }
        );
        assert_eq!(schema.capacity(), 32);
        assert_eq!(schema.grid_dims(), Some(GridDims::new(4, 8)));
    }

    #[test]
    fn grid_honours_cell_size_metadata() {
        let meta = ObjectMetadata {
            cell_size: Some(6.0),
            ..ObjectMetadata::default()
        };
        let schema = calculate_schema(ObjectKind::InGroundBed, 30.0, 30.0, &meta).unwrap();
        assert_eq!(schema.capacity(), 25);

        let bogus = ObjectMetadata {
            cell_size: Some(-1.0),
            ..ObjectMetadata::default()
        };
        let schema = calculate_schema(ObjectKind::InGroundBed, 30.0, 30.0, &bogus).unwrap();
        assert_eq!(schema.capacity(), 4);
    }

    #[test]
    fn rows_from_spacing_or_override() {
        let schema =
            calculate_schema(ObjectKind::RowPlot, 120.0, 240.0, &ObjectMetadata::default())
                .unwrap();
        assert_eq!(
            schema,
            LayoutSchema::Rows {
                count: 10,
                spacing: 12.0
            }
        );

        let meta = ObjectMetadata {
            row_spacing: Some(30.0),
            ..ObjectMetadata::default()
        };
        let schema = calculate_schema(ObjectKind::RowPlot, 120.0, 240.0, &meta).unwrap();
        assert_eq!(schema.capacity(), 4);

        let meta = ObjectMetadata {
            row_count: Some(3),
            row_spacing: Some(30.0),
            ..ObjectMetadata::default()
        };
        let schema = calculate_schema(ObjectKind::RowPlot, 120.0, 240.0, &meta).unwrap();
        assert_eq!(schema.capacity(), 3);
    }

    #[test]
    fn slots_for_single_and_unclassified() {
        let meta = ObjectMetadata::default();
        let pot = calculate_schema(ObjectKind::Container, 14.0, 14.0, &meta).unwrap();
        assert_eq!(
            pot,
            LayoutSchema::Slots {
                count: 1,
                flexible: true
            }
        );
        assert!(pot.is_flexible());
        let tree = calculate_schema(ObjectKind::Tree, 96.0, 96.0, &meta).unwrap();
        assert!(tree.is_flexible());
        let other = calculate_schema(ObjectKind::Other, 50.0, 50.0, &meta).unwrap();
        assert_eq!(
            other,
            LayoutSchema::Slots {
                count: 10,
                flexible: false
            }
        );
    }

    #[test]
    fn non_plantable_has_no_schema() {
        let meta = ObjectMetadata::default();
        for kind in [ObjectKind::Path, ObjectKind::Structure, ObjectKind::Compost] {
            assert_eq!(calculate_schema(kind, 48.0, 48.0, &meta), None);
        }
    }

    #[test]
    fn occupancy_by_coverage_or_count() {
        let occupants = [
            CellRect::new(0, 0, Footprint::new(2, 2)),
            CellRect::new(3, 0, Footprint::SINGLE),
        ];
        let grid = LayoutSchema::Grid {
            columns: 4,
            rows: 8,
            cell_size: 12.0,
        };
        assert_eq!(
            grid.occupancy(&occupants),
            Occupancy {
                used: 5,
                capacity: 32
            }
        );

        let pot = LayoutSchema::Slots {
            count: 1,
            flexible: true,
        };
        let occ = pot.occupancy(&occupants);
        assert_eq!(occ.used, 2);
        assert!(occ.is_full());
        assert_eq!(occ.remaining(), 0);
        assert!(pot.admits_another(5));

        let fixed = LayoutSchema::Slots {
            count: 2,
            flexible: false,
        };
        assert!(fixed.admits_another(1));
        assert!(!fixed.admits_another(2));
    }

    #[test]
    fn schema_serializes_tagged() {
        let json = serde_json::to_string(&LayoutSchema::Rows {
            count: 3,
            spacing: 12.0,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"rows","count":3,"spacing":12.0}"#);
    }
}
