//! Physical measurement embedded in a portfolio project.
//!
//! # Responsibility
//! - Hold an area with its unit of record.
//! - Keep a square-foot normalized copy for ordering and comparison.
//!
//! # Invariants
//! - `area` is non-negative, has at most 2 decimal places and 12 digits.
//! - `area_normalized == round2(convert(area, unit, SquareFoot))` whenever a
//!   measurement is constructed, mutated or deserialized.
//! - Unit accessors read `area` and `unit`, never `area_normalized`.

use crate::model::unit::{convert, AreaUnit, ConversionError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Decimal places kept for stored areas.
pub const AREA_DECIMAL_PLACES: u32 = 2;
/// Exclusive upper bound for `area` (12 digits, 2 of them fractional).
// 10^10 = 2 * 2^32 + 1_410_065_408.
const AREA_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Measurement validation and comparison errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasurementError {
    NegativeArea(Decimal),
    /// More fractional digits than the stored precision allows.
    AreaTooPrecise(Decimal),
    AreaOutOfRange(Decimal),
    /// No live measurement, or a zero maximum, to compare against.
    NoComparisonBasis,
    Conversion(ConversionError),
}

impl Display for MeasurementError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeArea(area) => write!(f, "area must be non-negative, got {area}"),
            Self::AreaTooPrecise(area) => write!(
                f,
                "area {area} has more than {AREA_DECIMAL_PLACES} decimal places"
            ),
            Self::AreaOutOfRange(area) => {
                write!(f, "area {area} exceeds the maximum of {AREA_LIMIT}")
            }
            Self::NoComparisonBasis => write!(f, "no basis for comparison"),
            Self::Conversion(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MeasurementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Conversion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConversionError> for MeasurementError {
    fn from(value: ConversionError) -> Self {
        Self::Conversion(value)
    }
}

/// Area with its unit of record and a cached square-foot value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMeasurement")]
pub struct Measurement {
    area: Decimal,
    unit: AreaUnit,
    area_normalized: Decimal,
}

// Wire shape accepted on input; the normalized value is always recomputed.
#[derive(Deserialize)]
struct RawMeasurement {
    area: Decimal,
    #[serde(default)]
    unit: AreaUnit,
}

impl TryFrom<RawMeasurement> for Measurement {
    type Error = MeasurementError;

    fn try_from(value: RawMeasurement) -> Result<Self, Self::Error> {
        Measurement::new(value.area, value.unit)
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            area: Decimal::ZERO,
            unit: AreaUnit::SquareFoot,
            area_normalized: Decimal::ZERO,
        }
    }
}

impl Measurement {
    /// Builds a validated measurement and computes its normalized value.
    pub fn new(area: Decimal, unit: AreaUnit) -> Result<Self, MeasurementError> {
        validate_area(area)?;
        let mut measurement = Self {
            area,
            unit,
            area_normalized: Decimal::ZERO,
        };
        measurement.normalize()?;
        Ok(measurement)
    }

    pub fn area(&self) -> Decimal {
        self.area
    }

    pub fn unit(&self) -> AreaUnit {
        self.unit
    }

    /// Cached area in square feet, rounded to the stored precision.
    pub fn area_normalized(&self) -> Decimal {
        self.area_normalized
    }

    /// Replaces the area and refreshes the normalized value.
    pub fn set_area(&mut self, area: Decimal) -> Result<(), MeasurementError> {
        validate_area(area)?;
        self.area = area;
        self.normalize()
    }

    /// Replaces the unit of record and refreshes the normalized value.
    ///
    /// The magnitude is kept as-is; it is reinterpreted in the new unit.
    pub fn set_unit(&mut self, unit: AreaUnit) -> Result<(), MeasurementError> {
        self.unit = unit;
        self.normalize()
    }

    /// Recomputes `area_normalized` from `area` and `unit`.
    pub fn normalize(&mut self) -> Result<(), MeasurementError> {
        let square_feet = convert(self.area, self.unit, AreaUnit::SquareFoot)?;
        self.area_normalized = square_feet.round_dp(AREA_DECIMAL_PLACES);
        Ok(())
    }

    /// Converts the recorded area into `unit`.
    pub fn in_unit(&self, unit: AreaUnit) -> Result<Decimal, ConversionError> {
        convert(self.area, self.unit, unit)
    }

    pub fn square_feet(&self) -> Result<Decimal, ConversionError> {
        self.in_unit(AreaUnit::SquareFoot)
    }

    pub fn square_meters(&self) -> Result<Decimal, ConversionError> {
        self.in_unit(AreaUnit::SquareMeter)
    }

    pub fn acres(&self) -> Result<Decimal, ConversionError> {
        self.in_unit(AreaUnit::Acre)
    }

    pub fn hectares(&self) -> Result<Decimal, ConversionError> {
        self.in_unit(AreaUnit::Hectare)
    }

    /// Restores a measurement read back from storage.
    ///
    /// Rejects rows whose cached value disagrees with `area` and `unit`.
    pub(crate) fn from_stored(
        area: Decimal,
        unit: AreaUnit,
        area_normalized: Decimal,
    ) -> Result<Self, String> {
        let measurement = Self::new(area, unit).map_err(|err| err.to_string())?;
        if measurement.area_normalized != area_normalized {
            return Err(format!(
                "stored area_normalized {area_normalized} does not match {}",
                measurement.area_normalized
            ));
        }
        Ok(measurement)
    }
}

/// Percentage of `value` against the largest live value.
///
/// # Errors
/// - [`MeasurementError::NoComparisonBasis`] when `max` is absent or zero.
pub fn relative_size(value: Decimal, max: Option<Decimal>) -> Result<Decimal, MeasurementError> {
    match max {
        Some(max) if !max.is_zero() => Ok(value / max * Decimal::ONE_HUNDRED),
        _ => Err(MeasurementError::NoComparisonBasis),
    }
}

fn validate_area(area: Decimal) -> Result<(), MeasurementError> {
    if area.is_sign_negative() && !area.is_zero() {
        return Err(MeasurementError::NegativeArea(area));
    }
    if area.normalize().scale() > AREA_DECIMAL_PLACES {
        return Err(MeasurementError::AreaTooPrecise(area));
    }
    if area >= AREA_LIMIT {
        return Err(MeasurementError::AreaOutOfRange(area));
    }
    Ok(())
}
