//! Generated `Parseable` / `FromStr` behavior per payload kind.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use valuegen::bson::oid::ObjectId;
use valuegen::rust_decimal::Decimal;
use valuegen::uuid::Uuid;
use valuegen::{Culture, Parseable, Value};
use valuegen_integration_tests::catalog::{EntityId, Price, Quantity, Width};
use valuegen_integration_tests::people::{Age, Name, UserId, Verified};

#[test]
fn integer_payload_parses() {
    let age = Age::try_parse("42").expect("42 is an i32");
    assert_eq!(age, 42_i32);
    assert_eq!(Age::try_parse(" -7 "), Some(Age::from(-7_i32)));
}

#[rstest]
#[case::absent(None)]
#[case::empty(Some(""))]
#[case::letters(Some("abc"))]
#[case::decimal(Some("4.2"))]
#[case::grouped(Some("1,000"))]
#[case::overflow(Some("3000000000"))]
fn integer_payload_rejects(#[case] text: Option<&str>) {
    assert_eq!(Age::try_parse(text), None);
}

#[test]
fn decimal_payload_uses_culture() {
    let german = Culture::from_name("de").expect("de is a known culture");
    let expected = Decimal::new(1999, 2);

    assert_eq!(Price::try_parse_with(Some("19,99"), Some(&german)), Some(Price::from(expected)));
    assert_eq!(Price::try_parse("19.99"), Some(Price::from(expected)));
    assert_eq!(Price::try_parse("19,99"), None);
}

#[test]
fn float_payload_parses() {
    assert_eq!(Width::try_parse("2.5"), Some(Width::from(2.5_f64)));
    assert_eq!(Width::try_parse_with(Some("2,5"), Some(&Culture::GERMAN)), Some(Width::from(2.5_f64)));
    assert_eq!(Width::try_parse("wide"), None);
}

#[test]
fn nullable_payload_wraps_in_some() {
    assert_eq!(Quantity::try_parse("7"), Some(Quantity::from(Some(7_i32))));
    assert_eq!(Quantity::try_parse(""), None);
    assert_eq!(Quantity::try_parse("seven"), None);
}

#[test]
fn identifier_payload_accepts_every_format() {
    let expected = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").expect("valid uuid");
    for text in [
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "67e5504410b1426f9247bb680e5fe0c8",
        "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
        "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
    ] {
        let id = UserId::try_parse(text).unwrap_or_else(|| panic!("{text} should parse"));
        assert_eq!(*id.payload(), expected);
    }
    assert_eq!(UserId::try_parse("not-a-uuid"), None);
}

#[test]
fn document_id_payload_swallows_parser_errors() {
    let id = EntityId::try_parse("507f1f77bcf86cd799439011").expect("24 hex digits");
    assert_eq!(id.into_payload().to_hex(), "507f1f77bcf86cd799439011");
    assert_eq!(EntityId::try_parse("bad-token"), None);
}

#[test]
fn string_payload_keeps_text_as_is() {
    assert_eq!(Name::try_parse("Ada"), Some(Name::from("Ada".to_owned())));
    assert_eq!(Name::try_parse("  "), Some(Name::from("  ".to_owned())));
    assert_eq!(Name::try_parse(""), None);
}

#[test]
fn other_payload_parses_through_its_own_parser() {
    assert_eq!(Verified::try_parse("TRUE"), Some(Verified::from(true)));
    assert_eq!(Verified::try_parse("yes"), None);
}

#[test]
fn from_str_reports_input() {
    let age: Age = "30".parse().expect("30 parses");
    assert_eq!(age, 30_i32);

    let err = "thirty".parse::<Age>().unwrap_err();
    assert_eq!(err.input(), "thirty");
    assert!(err.type_name().ends_with("Age"));
}

#[test]
fn object_id_round_trips_through_text() {
    let oid = ObjectId::new();
    let parsed = EntityId::try_parse(oid.to_hex().as_str()).expect("fresh id parses");
    assert_eq!(parsed, EntityId::from(oid));
}

proptest! {
    #[test]
    fn integer_wrapper_round_trips_through_text(v in any::<i32>()) {
        let age = Age::from(v);
        prop_assert_eq!(Age::try_parse(age.to_string().as_str()), Some(age));
        prop_assert_eq!(age.to_string().parse::<Age>(), Ok(age));
    }

    #[test]
    fn float_wrapper_round_trips_through_text(v in prop::num::f64::NORMAL | prop::num::f64::ZERO) {
        let width = Width::from(v);
        prop_assert_eq!(Width::try_parse(width.to_string().as_str()), Some(width));
    }

    #[test]
    fn decimal_wrapper_round_trips_through_text(mantissa in any::<i64>(), scale in 0_u32..=28) {
        let price = Price::from(Decimal::new(mantissa, scale));
        prop_assert_eq!(Price::try_parse(price.to_string().as_str()), Some(price));
    }

    #[test]
    fn nullable_wrapper_round_trips_through_text(v in any::<i32>()) {
        let quantity = Quantity::from(Some(v));
        prop_assert_eq!(Quantity::try_parse(quantity.to_string().as_str()), Some(quantity));
    }

    #[test]
    fn identifier_wrapper_round_trips_through_text(bits in any::<u128>()) {
        let id = UserId::from(Uuid::from_u128(bits));
        prop_assert_eq!(UserId::try_parse(id.to_string().as_str()), Some(id));
    }
}
