//! Per-payload `As` helpers.

use pretty_assertions::assert_eq;
use valuegen_integration_tests::catalog::{Height, Quantity, Width};
use valuegen_integration_tests::generated::{AsF64, F64AsExt, I32AsExt, OptionI32AsExt};
use valuegen_integration_tests::people::Age;

#[test]
fn one_payload_many_wrappers() {
    let as_f64 = 2.5_f64.wrap();
    assert_eq!(as_f64.width(), Width::from(2.5_f64));
    assert_eq!(as_f64.height(), Height::from(2.5_f64));
    assert_eq!(*as_f64.payload(), 2.5);
}

#[test]
fn holder_can_be_built_directly() {
    assert_eq!(AsF64::new(1.0).height(), 1.0_f64);
}

#[test]
fn groups_are_per_payload_type() {
    assert_eq!(40_i32.wrap().age(), Age::from(40_i32));
    assert_eq!(Some(3_i32).wrap().quantity(), Quantity::from(Some(3_i32)));
}
