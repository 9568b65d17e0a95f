#![forbid(unsafe_code)]

//! Resolve the size of a new or resized object.
//!
//! A kind's capability record decides which sources it accepts: typed
//! dimensions, a named preset, or a container volume.

use sprout_core::units::{LengthUnit, parse_dimensions};
use sprout_layout::{ObjectKind, ObjectMetadata, footprint_for_volume};

use crate::error::ValidationError;

/// Where a size comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeSource {
    /// `"WxH"` text, e.g. `"4x8"` or `"120cm x 60cm"`.
    Dimensions(String),
    /// A named preset of the kind.
    Preset(String),
    /// Container volume in gallons.
    Volume(f64),
}

impl SizeSource {
    fn method(&self) -> &'static str {
        match self {
            Self::Dimensions(_) => "dimensions",
            Self::Preset(_) => "preset",
            Self::Volume(_) => "volume",
        }
    }
}

/// A resolved footprint plus the metadata that records how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSize {
    pub width: f64,
    pub height: f64,
    pub metadata: ObjectMetadata,
}

/// Turn a size source into inches for `kind`.
pub fn resolve_size(
    kind: ObjectKind,
    source: &SizeSource,
    default_unit: LengthUnit,
) -> Result<ResolvedSize, ValidationError> {
    let caps = kind.capabilities();
    let unsupported = || ValidationError::UnsupportedSizeSource {
        kind,
        method: source.method(),
    };
    match source {
        SizeSource::Dimensions(text) => {
            if !caps.accepts_dimensions {
                return Err(unsupported());
            }
            let (width, height) = parse_dimensions(text, default_unit)?;
            Ok(ResolvedSize {
                width,
                height,
                metadata: ObjectMetadata::default(),
            })
        }
        SizeSource::Preset(name) => {
            if caps.presets.is_empty() {
                return Err(unsupported());
            }
            let preset = kind
                .preset(name)
                .ok_or_else(|| ValidationError::UnknownPreset(name.clone()))?;
            Ok(ResolvedSize {
                width: preset.width,
                height: preset.height,
                metadata: ObjectMetadata {
                    preset: Some(preset.name.to_owned()),
                    ..ObjectMetadata::default()
                },
            })
        }
        SizeSource::Volume(gallons) => {
            if !caps.volume_based {
                return Err(unsupported());
            }
            let edge = footprint_for_volume(*gallons).ok_or(ValidationError::InvalidVolume)?;
            Ok(ResolvedSize {
                width: edge,
                height: edge,
                metadata: ObjectMetadata {
                    volume_gallons: Some(*gallons),
                    ..ObjectMetadata::default()
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::units::DimensionParseError;

    #[test]
    fn bed_from_feet() {
        let size = resolve_size(
            ObjectKind::RaisedBed,
            &SizeSource::Dimensions("4x8".into()),
            LengthUnit::Feet,
        )
        .unwrap();
        assert_eq!((size.width, size.height), (48.0, 96.0));
        assert_eq!(size.metadata, ObjectMetadata::default());
    }

    #[test]
    fn bad_text_is_a_size_error() {
        let err = resolve_size(
            ObjectKind::RaisedBed,
            &SizeSource::Dimensions("four by".into()),
            LengthUnit::Feet,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Size(_)));

        let err = resolve_size(
            ObjectKind::Path,
            &SizeSource::Dimensions("0x8".into()),
            LengthUnit::Feet,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Size(DimensionParseError::NonPositive));
    }

    #[test]
    fn tree_takes_presets_only() {
        let size = resolve_size(
            ObjectKind::Tree,
            &SizeSource::Preset("dwarf".into()),
            LengthUnit::Feet,
        )
        .unwrap();
        assert_eq!((size.width, size.height), (96.0, 96.0));
        assert_eq!(size.metadata.preset.as_deref(), Some("Dwarf"));

        let err = resolve_size(
            ObjectKind::Tree,
            &SizeSource::Dimensions("8x8".into()),
            LengthUnit::Feet,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedSizeSource { .. }));

        let err = resolve_size(
            ObjectKind::Tree,
            &SizeSource::Preset("Giant".into()),
            LengthUnit::Feet,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownPreset("Giant".into()));
    }

    #[test]
    fn container_from_volume() {
        let size = resolve_size(ObjectKind::Container, &SizeSource::Volume(5.0), LengthUnit::Feet)
            .unwrap();
        assert_eq!((size.width, size.height), (14.0, 14.0));
        assert_eq!(size.metadata.volume_gallons, Some(5.0));

        assert_eq!(
            resolve_size(ObjectKind::Container, &SizeSource::Volume(-1.0), LengthUnit::Feet),
            Err(ValidationError::InvalidVolume)
        );
        assert!(matches!(
            resolve_size(ObjectKind::RaisedBed, &SizeSource::Volume(5.0), LengthUnit::Feet),
            Err(ValidationError::UnsupportedSizeSource { method: "volume", .. })
        ));
    }
}
