//! Area units and the fixed conversion table.
//!
//! # Responsibility
//! - Define the four units a project area can be recorded in.
//! - Convert a magnitude between units using historical literal factors.
//!
//! # Invariants
//! - Converting to the same unit returns the input unchanged.
//! - Factors are one literal per ordered pair; they are not derived from a
//!   common base unit, so a round trip does not invert exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Unit of record for a project area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaUnit {
    #[default]
    SquareFoot,
    SquareMeter,
    Acre,
    Hectare,
}

impl AreaUnit {
    /// All known units, in display order.
    pub const ALL: [AreaUnit; 4] = [
        AreaUnit::SquareFoot,
        AreaUnit::SquareMeter,
        AreaUnit::Acre,
        AreaUnit::Hectare,
    ];

    /// Plural label used in listings (`square feet`, `acres`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Self::SquareFoot => "square feet",
            Self::SquareMeter => "square meters",
            Self::Acre => "acres",
            Self::Hectare => "hectares",
        }
    }

    /// Stable storage code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SquareFoot => "square_foot",
            Self::SquareMeter => "square_meter",
            Self::Acre => "acre",
            Self::Hectare => "hectare",
        }
    }

    /// Parses a storage code or a common abbreviation.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "square_foot" | "sqft" | "ft2" => Some(Self::SquareFoot),
            "square_meter" | "sqm" | "m2" => Some(Self::SquareMeter),
            "acre" | "ac" => Some(Self::Acre),
            "hectare" | "ha" => Some(Self::Hectare),
            _ => None,
        }
    }
}

impl Display for AreaUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Conversion failure for a unit pair missing from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    UnsupportedConversion { from: AreaUnit, to: AreaUnit },
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedConversion { from, to } => {
                write!(f, "unsupported conversion from {from} to {to}")
            }
        }
    }
}

impl Error for ConversionError {}

// (from, to, factor). Literal values carried over from the historical table.
const CONVERSIONS: &[(AreaUnit, AreaUnit, Decimal)] = &[
    (AreaUnit::SquareFoot, AreaUnit::SquareMeter, Decimal::from_parts(929, 0, 0, false, 4)),
    (AreaUnit::SquareFoot, AreaUnit::Acre, Decimal::from_parts(23, 0, 0, false, 6)),
    (AreaUnit::SquareFoot, AreaUnit::Hectare, Decimal::from_parts(93, 0, 0, false, 7)),
    (AreaUnit::SquareMeter, AreaUnit::SquareFoot, Decimal::from_parts(1076, 0, 0, false, 2)),
    (AreaUnit::SquareMeter, AreaUnit::Acre, Decimal::from_parts(25, 0, 0, false, 5)),
    (AreaUnit::SquareMeter, AreaUnit::Hectare, Decimal::from_parts(1, 0, 0, false, 4)),
    (AreaUnit::Acre, AreaUnit::SquareFoot, Decimal::from_parts(43560, 0, 0, false, 0)),
    (AreaUnit::Acre, AreaUnit::SquareMeter, Decimal::from_parts(4047, 0, 0, false, 0)),
    (AreaUnit::Acre, AreaUnit::Hectare, Decimal::from_parts(4047, 0, 0, false, 4)),
    (AreaUnit::Hectare, AreaUnit::SquareFoot, Decimal::from_parts(10763910, 0, 0, false, 2)),
    (AreaUnit::Hectare, AreaUnit::SquareMeter, Decimal::from_parts(1000000, 0, 0, false, 2)),
    (AreaUnit::Hectare, AreaUnit::Acre, Decimal::from_parts(247, 0, 0, false, 2)),
];

/// Returns the literal factor for an ordered unit pair, if tabulated.
pub fn conversion_factor(from: AreaUnit, to: AreaUnit) -> Option<Decimal> {
    CONVERSIONS
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, factor)| *factor)
}

/// Converts `value` from one unit to another.
///
/// Same-unit conversion is the exact identity. Every other pair multiplies
/// by its tabulated factor.
///
/// # Errors
/// - [`ConversionError::UnsupportedConversion`] when the pair is not tabulated.
pub fn convert(value: Decimal, from: AreaUnit, to: AreaUnit) -> Result<Decimal, ConversionError> {
    if from == to {
        return Ok(value);
    }

    let factor =
        conversion_factor(from, to).ok_or(ConversionError::UnsupportedConversion { from, to })?;
    Ok(value * factor)
}

#[cfg(test)]
mod tests {
    use super::{conversion_factor, convert, AreaUnit, CONVERSIONS};
    use rust_decimal::Decimal;

    #[test]
    fn table_covers_every_distinct_pair() {
        assert_eq!(CONVERSIONS.len(), 12);
        for from in AreaUnit::ALL {
            for to in AreaUnit::ALL {
                if from != to {
                    assert!(
                        conversion_factor(from, to).is_some(),
                        "missing factor {from:?} -> {to:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn table_holds_the_literal_factors() {
        let expected = [
            (AreaUnit::SquareFoot, AreaUnit::SquareMeter, "0.0929"),
            (AreaUnit::SquareFoot, AreaUnit::Acre, "0.000023"),
            (AreaUnit::SquareFoot, AreaUnit::Hectare, "0.0000093"),
            (AreaUnit::SquareMeter, AreaUnit::SquareFoot, "10.76"),
            (AreaUnit::SquareMeter, AreaUnit::Acre, "0.00025"),
            (AreaUnit::SquareMeter, AreaUnit::Hectare, "0.0001"),
            (AreaUnit::Acre, AreaUnit::SquareFoot, "43560"),
            (AreaUnit::Acre, AreaUnit::SquareMeter, "4047"),
            (AreaUnit::Acre, AreaUnit::Hectare, "0.4047"),
            (AreaUnit::Hectare, AreaUnit::SquareFoot, "107639.10"),
            (AreaUnit::Hectare, AreaUnit::SquareMeter, "10000.00"),
            (AreaUnit::Hectare, AreaUnit::Acre, "2.47"),
        ];
        for (from, to, factor) in expected {
            assert_eq!(
                conversion_factor(from, to).unwrap().to_string(),
                factor,
                "{from:?} -> {to:?}"
            );
        }
    }

    #[test]
    fn identity_keeps_scale() {
        let value = Decimal::new(12345, 3);
        let converted = convert(value, AreaUnit::Hectare, AreaUnit::Hectare).unwrap();
        assert_eq!(converted, value);
        assert_eq!(converted.scale(), 3);
    }

    #[test]
    fn round_trip_is_not_exact() {
        let one = Decimal::ONE;
        let there = convert(one, AreaUnit::Acre, AreaUnit::Hectare).unwrap();
        let back = convert(there, AreaUnit::Hectare, AreaUnit::Acre).unwrap();
        assert_ne!(back, one);
    }

    #[test]
    fn parse_accepts_codes_and_abbreviations() {
        assert_eq!(AreaUnit::parse("square_meter"), Some(AreaUnit::SquareMeter));
        assert_eq!(AreaUnit::parse(" HA "), Some(AreaUnit::Hectare));
        assert_eq!(AreaUnit::parse("furlong"), None);
    }
}
