#![forbid(unsafe_code)]

//! Object kinds and their capability records.
//!
//! Every decision that depends on what an object *is* (how its size is
//! entered, whether it can hold plantings, which capacity schema applies)
//! reads the kind's [`KindCapabilities`] instead of comparing kind names.

use serde::{Deserialize, Serialize};

/// The closed set of things that can be placed on a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    RaisedBed,
    InGroundBed,
    RowPlot,
    Container,
    Tree,
    Path,
    Structure,
    Compost,
    /// Plantable area that fits none of the other kinds.
    Other,
}

/// A named fixed footprint, in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePreset {
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
}

/// What a kind supports. Resolved once per kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindCapabilities {
    /// Can hold plantings (and gets a planting space on creation).
    pub plantable: bool,
    /// Plantings go on a square cell grid.
    pub grid_based: bool,
    /// Plantings go in parallel rows.
    pub row_based: bool,
    /// Footprint comes from container volume.
    pub volume_based: bool,
    /// Holds a single flexible slot (one tree, one pot).
    pub single_slot: bool,
    /// Accepts free-form `"WxH"` dimension text.
    pub accepts_dimensions: bool,
    /// Fixed size choices, empty when the kind has none.
    pub presets: &'static [SizePreset],
    pub default_label: &'static str,
    pub default_color: &'static str,
}

const NO_PRESETS: &[SizePreset] = &[];

const TREE_PRESETS: &[SizePreset] = &[
    SizePreset {
        name: "Dwarf",
        width: 96.0,
        height: 96.0,
    },
    SizePreset {
        name: "Semi-dwarf",
        width: 144.0,
        height: 144.0,
    },
    SizePreset {
        name: "Standard",
        width: 240.0,
        height: 240.0,
    },
];

const COMPOST_PRESETS: &[SizePreset] = &[
    SizePreset {
        name: "Single bin",
        width: 36.0,
        height: 36.0,
    },
    SizePreset {
        name: "Double bin",
        width: 72.0,
        height: 36.0,
    },
    SizePreset {
        name: "Triple bin",
        width: 108.0,
        height: 36.0,
    },
];

const BASE: KindCapabilities = KindCapabilities {
    plantable: false,
    grid_based: false,
    row_based: false,
    volume_based: false,
    single_slot: false,
    accepts_dimensions: true,
    presets: NO_PRESETS,
    default_label: "Object",
    default_color: "#9e9e9e",
};

const RAISED_BED: KindCapabilities = KindCapabilities {
    plantable: true,
    grid_based: true,
    default_label: "Raised Bed",
    default_color: "#8d6e63",
    ..BASE
};

const IN_GROUND_BED: KindCapabilities = KindCapabilities {
    plantable: true,
    grid_based: true,
    default_label: "Bed",
    default_color: "#6d4c41",
    ..BASE
};

const ROW_PLOT: KindCapabilities = KindCapabilities {
    plantable: true,
    row_based: true,
    default_label: "Rows",
    default_color: "#a1887f",
    ..BASE
};

const CONTAINER: KindCapabilities = KindCapabilities {
    plantable: true,
    volume_based: true,
    single_slot: true,
    default_label: "Container",
    default_color: "#ff8a65",
    ..BASE
};

const TREE: KindCapabilities = KindCapabilities {
    plantable: true,
    single_slot: true,
    accepts_dimensions: false,
    presets: TREE_PRESETS,
    default_label: "Tree",
    default_color: "#43a047",
    ..BASE
};

const PATH: KindCapabilities = KindCapabilities {
    default_label: "Path",
    default_color: "#d7ccc8",
    ..BASE
};

const STRUCTURE: KindCapabilities = KindCapabilities {
    default_label: "Structure",
    default_color: "#78909c",
    ..BASE
};

const COMPOST: KindCapabilities = KindCapabilities {
    presets: COMPOST_PRESETS,
    default_label: "Compost",
    default_color: "#5d4037",
    ..BASE
};

const OTHER: KindCapabilities = KindCapabilities {
    plantable: true,
    default_label: "Area",
    default_color: "#aed581",
    ..BASE
};

impl ObjectKind {
    pub const ALL: [ObjectKind; 9] = [
        Self::RaisedBed,
        Self::InGroundBed,
        Self::RowPlot,
        Self::Container,
        Self::Tree,
        Self::Path,
        Self::Structure,
        Self::Compost,
        Self::Other,
    ];

    /// The capability record for this kind.
    #[must_use]
    pub fn capabilities(self) -> &'static KindCapabilities {
        match self {
            Self::RaisedBed => &RAISED_BED,
            Self::InGroundBed => &IN_GROUND_BED,
            Self::RowPlot => &ROW_PLOT,
            Self::Container => &CONTAINER,
            Self::Tree => &TREE,
            Self::Path => &PATH,
            Self::Structure => &STRUCTURE,
            Self::Compost => &COMPOST,
            Self::Other => &OTHER,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_plantable(self) -> bool {
        self.capabilities().plantable
    }

    /// Look up a preset by name (case-insensitive).
    #[must_use]
    pub fn preset(self, name: &str) -> Option<&'static SizePreset> {
        self.capabilities()
            .presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
    }
}

/// Type-specific settings carried by a placed object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectMetadata {
    /// Grid cell edge in inches; the 12-inch default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_spacing: Option<f64>,
    /// Explicit row count, overriding the spacing-derived count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_gallons: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

/// Container volume (gallons) to square footprint edge (inches).
///
/// Sorted by volume. A volume between entries takes the next larger pot.
const CONTAINER_FOOTPRINTS: &[(f64, f64)] = &[
    (1.0, 8.0),
    (2.0, 10.0),
    (3.0, 12.0),
    (5.0, 14.0),
    (7.0, 16.0),
    (10.0, 18.0),
    (15.0, 20.0),
    (20.0, 24.0),
    (25.0, 26.0),
    (30.0, 28.0),
];

/// Square footprint edge for a container of `gallons`.
///
/// Volumes past the end of the table use the largest footprint. Returns
/// `None` for non-positive or non-finite volumes.
#[must_use]
pub fn footprint_for_volume(gallons: f64) -> Option<f64> {
    if !(gallons.is_finite() && gallons > 0.0) {
        return None;
    }
    CONTAINER_FOOTPRINTS
        .iter()
        .find(|(volume, _)| *volume >= gallons)
        .or(CONTAINER_FOOTPRINTS.last())
        .map(|(_, edge)| *edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plantable_kinds() {
        let plantable: Vec<_> = ObjectKind::ALL
            .into_iter()
            .filter(|kind| kind.is_plantable())
            .collect();
        assert_eq!(
            plantable,
            vec![
                ObjectKind::RaisedBed,
                ObjectKind::InGroundBed,
                ObjectKind::RowPlot,
                ObjectKind::Container,
                ObjectKind::Tree,
                ObjectKind::Other,
            ]
        );
    }

    #[test]
    fn each_kind_has_at_most_one_layout_style() {
        for kind in ObjectKind::ALL {
            let caps = kind.capabilities();
            let styles = [caps.grid_based, caps.row_based, caps.single_slot]
                .into_iter()
                .filter(|flag| *flag)
                .count();
            assert!(styles <= 1, "{kind:?}");
        }
    }

    #[test]
    fn every_kind_has_some_size_source() {
        for kind in ObjectKind::ALL {
            let caps = kind.capabilities();
            assert!(
                caps.accepts_dimensions || caps.volume_based || !caps.presets.is_empty(),
                "{kind:?}"
            );
        }
    }

    #[test]
    fn preset_lookup_ignores_case() {
        let preset = ObjectKind::Tree.preset("semi-DWARF").unwrap();
        assert_eq!(preset.width, 144.0);
        assert!(ObjectKind::RaisedBed.preset("Dwarf").is_none());
    }

    #[test]
    fn volume_lookup_rounds_up_and_saturates() {
        assert_eq!(footprint_for_volume(1.0), Some(8.0));
        assert_eq!(footprint_for_volume(4.0), Some(14.0));
        assert_eq!(footprint_for_volume(0.5), Some(8.0));
        assert_eq!(footprint_for_volume(500.0), Some(28.0));
        assert_eq!(footprint_for_volume(0.0), None);
        assert_eq!(footprint_for_volume(f64::NAN), None);
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ObjectKind::RaisedBed).unwrap();
        assert_eq!(json, "\"raised_bed\"");
    }

    #[test]
    fn empty_metadata_serializes_empty() {
        let json = serde_json::to_string(&ObjectMetadata::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
