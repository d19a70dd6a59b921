use futuregreen_core::{convert, relative_size, AreaUnit, Measurement, MeasurementError};
use rust_decimal::Decimal;

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

#[test]
fn same_unit_conversion_is_identity() {
    for unit in AreaUnit::ALL {
        assert_eq!(convert(dec("123.45"), unit, unit).unwrap(), dec("123.45"));
    }
}

#[test]
fn literal_factors_are_applied() {
    assert_eq!(
        convert(dec("100"), AreaUnit::SquareFoot, AreaUnit::SquareMeter).unwrap(),
        dec("9.29")
    );
    assert_eq!(
        convert(dec("1"), AreaUnit::Acre, AreaUnit::SquareFoot).unwrap(),
        dec("43560")
    );
    assert_eq!(
        convert(dec("2"), AreaUnit::Hectare, AreaUnit::Acre).unwrap(),
        dec("4.94")
    );
}

#[test]
fn round_trip_is_not_exact() {
    let there = convert(dec("1"), AreaUnit::SquareMeter, AreaUnit::SquareFoot).unwrap();
    let back = convert(there, AreaUnit::SquareFoot, AreaUnit::SquareMeter).unwrap();
    assert_ne!(back, dec("1"));
}

#[test]
fn measurement_normalizes_to_square_feet() {
    let measurement = Measurement::new(dec("2"), AreaUnit::Acre).unwrap();
    assert_eq!(measurement.area_normalized(), dec("87120"));

    let measurement = Measurement::new(dec("1.5"), AreaUnit::SquareMeter).unwrap();
    // 1.5 * 10.76 = 16.14
    assert_eq!(measurement.area_normalized(), dec("16.14"));
}

#[test]
fn normalized_value_is_rounded_to_two_places() {
    // 0.01 ha * 107639.10 = 1076.391
    let measurement = Measurement::new(dec("0.01"), AreaUnit::Hectare).unwrap();
    assert_eq!(measurement.area_normalized(), dec("1076.39"));
}

#[test]
fn changing_unit_reinterprets_magnitude() {
    let mut measurement = Measurement::new(dec("3"), AreaUnit::SquareFoot).unwrap();
    assert_eq!(measurement.area_normalized(), dec("3"));

    measurement.set_unit(AreaUnit::Acre).unwrap();
    assert_eq!(measurement.area(), dec("3"));
    assert_eq!(measurement.area_normalized(), dec("130680"));
}

#[test]
fn unit_accessors_use_table_factors() {
    let measurement = Measurement::new(dec("10"), AreaUnit::SquareMeter).unwrap();
    assert_eq!(measurement.square_meters().unwrap(), dec("10"));
    assert_eq!(measurement.square_feet().unwrap(), dec("107.6"));
    assert_eq!(measurement.hectares().unwrap(), dec("0.001"));
    assert_eq!(measurement.acres().unwrap(), dec("0.0025"));
}

#[test]
fn relative_size_is_a_percentage_of_the_max() {
    assert_eq!(
        relative_size(dec("250"), Some(dec("1000"))).unwrap(),
        dec("25")
    );
    assert_eq!(
        relative_size(dec("1000"), Some(dec("1000"))).unwrap(),
        dec("100")
    );
}

#[test]
fn relative_size_without_basis_is_an_error() {
    assert_eq!(
        relative_size(dec("10"), None).unwrap_err(),
        MeasurementError::NoComparisonBasis
    );
    assert_eq!(
        relative_size(dec("10"), Some(Decimal::ZERO)).unwrap_err(),
        MeasurementError::NoComparisonBasis
    );
}
