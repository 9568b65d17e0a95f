#![forbid(unsafe_code)]

//! Length units and `"WxH"` dimension parsing.
//!
//! Every stored length in sprout is inches. User-entered sizes are parsed
//! and converted here, once, at the edge.
//!
//! Accepted forms (case-insensitive, whitespace tolerant):
//!
//! - `4x8` (both values in the caller's default unit)
//! - `4ft x 8ft`, `4' x 8'`, `48" x 96"`, `120cm × 240cm`, `1.2m by 2.4m`
//! - `4x8ft` (a unit on one side applies to a bare number on the other)

use std::fmt;

/// A unit of length a user may type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LengthUnit {
    #[default]
    Inches,
    Feet,
    Centimeters,
    Meters,
}

impl LengthUnit {
    /// Inches per one of this unit.
    #[must_use]
    pub const fn inches_per_unit(self) -> f64 {
        match self {
            Self::Inches => 1.0,
            Self::Feet => 12.0,
            Self::Centimeters => 1.0 / 2.54,
            Self::Meters => 100.0 / 2.54,
        }
    }

    /// Convert a value in this unit to inches.
    #[must_use]
    pub fn to_inches(self, value: f64) -> f64 {
        value * self.inches_per_unit()
    }

    /// Parse a unit suffix such as `ft`, `'`, `"`, `cm`.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "\"" | "''" | "in" | "inch" | "inches" => Some(Self::Inches),
            "'" | "ft" | "foot" | "feet" => Some(Self::Feet),
            "cm" => Some(Self::Centimeters),
            "m" => Some(Self::Meters),
            _ => None,
        }
    }
}

/// Why a dimension string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionParseError {
    /// Input was blank.
    Empty,
    /// No `x`, `×`, `*` or `by` between the two values.
    MissingSeparator,
    /// A side did not start with a number.
    InvalidNumber(String),
    /// A side carried a suffix that is not a known unit.
    UnknownUnit(String),
    /// Width or height was zero or negative.
    NonPositive,
}

impl fmt::Display for DimensionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no size given"),
            Self::MissingSeparator => write!(f, "expected a size like 4x8"),
            Self::InvalidNumber(part) => write!(f, "'{part}' is not a number"),
            Self::UnknownUnit(unit) => write!(f, "unknown unit '{unit}'"),
            Self::NonPositive => write!(f, "width and height must be greater than zero"),
        }
    }
}

impl std::error::Error for DimensionParseError {}

/// Parse `"WxH"` text into `(width, height)` in inches.
///
/// Bare numbers are read in `default_unit` unless the other side names a
/// unit, in which case that unit is shared.
pub fn parse_dimensions(
    text: &str,
    default_unit: LengthUnit,
) -> Result<(f64, f64), DimensionParseError> {
    let normalized = text
        .trim()
        .to_lowercase()
        .replace('×', "x")
        .replace('*', "x")
        .replace(" by ", "x");
    if normalized.is_empty() {
        return Err(DimensionParseError::Empty);
    }

    let mut parts = normalized.split('x');
    let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(DimensionParseError::MissingSeparator);
    };

    let (w_value, w_unit) = parse_side(w)?;
    let (h_value, h_unit) = parse_side(h)?;
    let shared = w_unit.or(h_unit).unwrap_or(default_unit);
    let width = w_unit.unwrap_or(shared).to_inches(w_value);
    let height = h_unit.unwrap_or(shared).to_inches(h_value);

    if !(width > 0.0 && height > 0.0) {
        return Err(DimensionParseError::NonPositive);
    }
    Ok((width, height))
}

fn parse_side(side: &str) -> Result<(f64, Option<LengthUnit>), DimensionParseError> {
    let side = side.trim();
    let split = side
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(side.len());
    let (number, suffix) = side.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| DimensionParseError::InvalidNumber(side.to_string()))?;
    if !value.is_finite() {
        return Err(DimensionParseError::InvalidNumber(side.to_string()));
    }

    let suffix = suffix.trim();
    if suffix.is_empty() {
        return Ok((value, None));
    }
    LengthUnit::from_suffix(suffix)
        .map(|unit| (value, Some(unit)))
        .ok_or_else(|| DimensionParseError::UnknownUnit(suffix.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feet(text: &str) -> Result<(f64, f64), DimensionParseError> {
        parse_dimensions(text, LengthUnit::Feet)
    }

    #[test]
    fn bare_numbers_use_default_unit() {
        assert_eq!(feet("4x8"), Ok((48.0, 96.0)));
        assert_eq!(parse_dimensions("4x8", LengthUnit::Inches), Ok((4.0, 8.0)));
    }

    #[test]
    fn separators_and_spacing() {
        assert_eq!(feet(" 4 X 8 "), Ok((48.0, 96.0)));
        assert_eq!(feet("4×8"), Ok((48.0, 96.0)));
        assert_eq!(feet("4*8"), Ok((48.0, 96.0)));
        assert_eq!(feet("4 by 8"), Ok((48.0, 96.0)));
    }

    #[test]
    fn explicit_units_override_default() {
        assert_eq!(feet("48\" x 96\""), Ok((48.0, 96.0)));
        assert_eq!(feet("3' x 6in"), Ok((36.0, 6.0)));
        assert_eq!(parse_dimensions("2ft x 3 feet", LengthUnit::Inches), Ok((24.0, 36.0)));
    }

    #[test]
    fn single_unit_is_shared() {
        assert_eq!(parse_dimensions("4x8ft", LengthUnit::Inches), Ok((48.0, 96.0)));
    }

    #[test]
    fn metric_units_convert() {
        let (w, h) = parse_dimensions("254cm x 1m", LengthUnit::Inches).unwrap();
        assert!((w - 100.0).abs() < 1e-9);
        assert!((h - 39.370_078_740_157_48).abs() < 1e-9);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(feet(""), Err(DimensionParseError::Empty));
        assert_eq!(feet("48"), Err(DimensionParseError::MissingSeparator));
        assert_eq!(feet("4x8x2"), Err(DimensionParseError::MissingSeparator));
        assert_eq!(
            feet("fourx8"),
            Err(DimensionParseError::InvalidNumber("four".into()))
        );
        assert_eq!(
            feet("4yd x 8"),
            Err(DimensionParseError::UnknownUnit("yd".into()))
        );
        assert_eq!(feet("0x8"), Err(DimensionParseError::NonPositive));
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            DimensionParseError::MissingSeparator.to_string(),
            "expected a size like 4x8"
        );
    }
}
