//! Parse strategies used by generated `Parseable` implementations.
//!
//! Generated code checks the absent/empty precondition once through
//! [`has_text`] and then dispatches on the payload kind:
//!
//! | Kind | Strategy |
//! |------|----------|
//! | string | wrap the text directly |
//! | numeric | [`number`], culture-aware, invariant by default |
//! | identifier | [`identifier`] |
//! | document id | [`document_id`], parser failure becomes `None` |
//! | other | the payload's own [`ParsePayload`] |
//!
//! Every strategy reports failure as `None`. Nothing here panics on bad
//! input.

use bson::oid::ObjectId;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::{Culture, ParseValueError};

// ============================================================================
// PARSEABLE
// ============================================================================

/// Text parsing implemented by every generated wrapper.
pub trait Parseable: Sized {
    /// Parse `text` using `culture` (invariant when `None`).
    ///
    /// Absent or empty text is always a failure.
    fn try_parse_with(text: Option<&str>, culture: Option<&Culture>) -> Option<Self>;

    /// Parse `text` with the invariant culture.
    fn try_parse<'a>(text: impl Into<Option<&'a str>>) -> Option<Self> {
        Self::try_parse_with(text.into(), None)
    }

    /// Parse `text`, reporting failure as a [`ParseValueError`].
    fn parse_with(text: &str, culture: Option<&Culture>) -> Result<Self, ParseValueError> {
        Self::try_parse_with(Some(text), culture)
            .ok_or_else(|| ParseValueError::new(std::any::type_name::<Self>(), text))
    }
}

/// The shared precondition: `None` for absent or empty text.
///
/// Whitespace-only text passes; kinds that cannot use it fail later.
#[inline]
pub fn has_text(text: Option<&str>) -> Option<&str> {
    text.filter(|text| !text.is_empty())
}

// ============================================================================
// NUMERIC
// ============================================================================

/// Which characters a numeric payload accepts besides digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Surrounding whitespace and a leading sign.
    Integer,
    /// `Integer` plus a decimal separator and an exponent.
    Float,
}

impl NumberStyle {
    /// Whether the culture's decimal separator takes part in parsing.
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Float)
    }
}

/// A payload parsed by [`number`].
pub trait NumericPayload: Sized + Copy {
    /// Accepted number style.
    const STYLE: NumberStyle;

    /// Parse trimmed text that already uses `.` as decimal separator.
    fn parse_normalized(text: &str) -> Option<Self>;
}

macro_rules! numeric_payload {
    ($style:ident => $($t:ty),+ $(,)?) => {
        $(
            impl NumericPayload for $t {
                const STYLE: NumberStyle = NumberStyle::$style;

                #[inline]
                fn parse_normalized(text: &str) -> Option<Self> {
                    text.parse().ok()
                }
            }
        )+
    };
}

numeric_payload!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numeric_payload!(Float => f32, f64);

impl NumericPayload for Decimal {
    const STYLE: NumberStyle = NumberStyle::Float;

    fn parse_normalized(text: &str) -> Option<Self> {
        Self::from_str(text)
            .or_else(|_| Self::from_scientific(text))
            .ok()
    }
}

/// Parse a numeric payload.
///
/// Surrounding whitespace is ignored. Floating styles accept the culture's
/// decimal separator, which is normalized to `.` first. Group separators are
/// rejected.
pub fn number<T: NumericPayload>(text: &str, culture: Option<&Culture>) -> Option<T> {
    let culture = culture.copied().unwrap_or_default();
    let text = text.trim();
    if text.is_empty() || text.contains(culture.group_separator()) {
        return None;
    }
    if T::STYLE.is_floating() {
        T::parse_normalized(&culture.normalize_decimal(text))
    } else {
        T::parse_normalized(text)
    }
}

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Parse a 128-bit identifier in any of the hyphenated, simple, braced or
/// URN forms.
///
/// The culture is accepted for signature parity with [`number`]; identifier
/// text is culture independent.
pub fn identifier(text: &str, culture: Option<&Culture>) -> Option<Uuid> {
    let _ = culture;
    Uuid::parse_str(text.trim()).ok()
}

/// Parse a document-store object id (24 hex digits).
///
/// The underlying parser reports malformed text as an error; it is turned
/// into `None` here so generated code never propagates it.
pub fn document_id(text: &str) -> Option<ObjectId> {
    match ObjectId::parse_str(text.trim()) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::trace!(%err, "rejected document id");
            None
        }
    }
}

// ============================================================================
// OTHER PAYLOADS
// ============================================================================

/// Two-argument parse capability for payloads outside the built-in kinds.
///
/// Implement it (or use [`parse_payload_from_str!`](crate::parse_payload_from_str))
/// for a custom payload to get a generated `Parseable` implementation.
pub trait ParsePayload: Sized {
    /// Parse `text`; `culture` is `None` for the invariant culture.
    fn parse_payload(text: &str, culture: Option<&Culture>) -> Option<Self>;
}

impl ParsePayload for bool {
    fn parse_payload(text: &str, _culture: Option<&Culture>) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl ParsePayload for char {
    fn parse_payload(text: &str, _culture: Option<&Culture>) -> Option<Self> {
        let mut chars = text.chars();
        let first = chars.next()?;
        chars.next().is_none().then_some(first)
    }
}

impl ParsePayload for String {
    fn parse_payload(text: &str, _culture: Option<&Culture>) -> Option<Self> {
        Some(text.to_owned())
    }
}

impl ParsePayload for Uuid {
    fn parse_payload(text: &str, culture: Option<&Culture>) -> Option<Self> {
        identifier(text, culture)
    }
}

impl ParsePayload for ObjectId {
    fn parse_payload(text: &str, _culture: Option<&Culture>) -> Option<Self> {
        document_id(text)
    }
}

macro_rules! numeric_parse_payload {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ParsePayload for $t {
                #[inline]
                fn parse_payload(text: &str, culture: Option<&Culture>) -> Option<Self> {
                    number(text, culture)
                }
            }
        )+
    };
}

numeric_parse_payload!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Decimal
);

/// Implement [`ParsePayload`] through `FromStr`, ignoring the culture.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Sku(String);
///
/// impl std::str::FromStr for Sku { /* ... */ }
///
/// valuegen::parse_payload_from_str!(Sku);
/// ```
#[macro_export]
macro_rules! parse_payload_from_str {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::parse::ParsePayload for $t {
                fn parse_payload(
                    text: &str,
                    _culture: ::core::option::Option<&$crate::Culture>,
                ) -> ::core::option::Option<Self> {
                    <$t as ::core::str::FromStr>::from_str(text).ok()
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn has_text_rejects_absent_and_empty() {
        assert_eq!(has_text(None), None);
        assert_eq!(has_text(Some("")), None);
        assert_eq!(has_text(Some("  ")), Some("  "));
    }

    #[rstest]
    #[case("42", Some(42))]
    #[case(" 42 ", Some(42))]
    #[case("-7", Some(-7))]
    #[case("+7", Some(7))]
    #[case("abc", None)]
    #[case("4.2", None)]
    #[case("1,000", None)]
    #[case("   ", None)]
    fn number_parses_integers(#[case] text: &str, #[case] expected: Option<i32>) {
        assert_eq!(number::<i32>(text, None), expected);
    }

    #[test]
    fn number_rejects_out_of_range() {
        assert_eq!(number::<u8>("256", None), None);
        assert_eq!(number::<u8>("-1", None), None);
    }

    #[test]
    fn number_normalizes_comma_for_floating_kinds() {
        let de = Culture::GERMAN;
        assert_eq!(number::<f64>("19,99", Some(&de)), Some(19.99));
        assert_eq!(
            number::<Decimal>("19,99", Some(&de)),
            Some(Decimal::new(1999, 2))
        );
    }

    #[test]
    fn number_invariant_rejects_comma_decimal() {
        assert_eq!(number::<f64>("19,99", None), None);
        assert_eq!(number::<Decimal>("19,99", None), None);
    }

    #[test]
    fn number_german_rejects_group_separator() {
        assert_eq!(number::<f64>("1.234,5", Some(&Culture::GERMAN)), None);
    }

    #[test]
    fn number_decimal_accepts_scientific_notation() {
        assert_eq!(number::<Decimal>("1.5e2", None), Some(Decimal::new(150, 0)));
    }

    #[test]
    fn identifier_accepts_common_forms() {
        let hyphenated = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let expected = Uuid::parse_str(hyphenated).unwrap();
        assert_eq!(identifier(hyphenated, None), Some(expected));
        assert_eq!(
            identifier("{67e55044-10b1-426f-9247-bb680e5fe0c8}", None),
            Some(expected)
        );
        assert_eq!(identifier("67e5504410b1426f9247bb680e5fe0c8", None), Some(expected));
        assert_eq!(identifier("not-a-guid", None), None);
    }

    #[test]
    fn document_id_converts_parser_failure() {
        assert_eq!(document_id("bad-token"), None);
        let id = ObjectId::new();
        assert_eq!(document_id(&id.to_hex()), Some(id));
    }

    #[rstest]
    #[case("true", Some(true))]
    #[case("FALSE", Some(false))]
    #[case(" True ", Some(true))]
    #[case("yes", None)]
    fn bool_parse_payload(#[case] text: &str, #[case] expected: Option<bool>) {
        assert_eq!(bool::parse_payload(text, None), expected);
    }

    #[test]
    fn char_parse_payload_requires_single_char() {
        assert_eq!(char::parse_payload("x", None), Some('x'));
        assert_eq!(char::parse_payload("xy", None), None);
    }

    #[derive(Debug, PartialEq)]
    struct Sku(String);

    impl FromStr for Sku {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.starts_with("SKU-").then(|| Sku(s.to_owned())).ok_or(())
        }
    }

    crate::parse_payload_from_str!(Sku);

    #[test]
    fn parse_payload_from_str_macro_delegates() {
        assert_eq!(
            Sku::parse_payload("SKU-1", None),
            Some(Sku("SKU-1".to_owned()))
        );
        assert_eq!(Sku::parse_payload("1", None), None);
    }

    proptest::proptest! {
        #[test]
        fn integer_text_round_trips(value: i64) {
            proptest::prop_assert_eq!(number::<i64>(&value.to_string(), None), Some(value));
        }

        #[test]
        fn float_text_round_trips(value in proptest::num::f64::NORMAL) {
            proptest::prop_assert_eq!(number::<f64>(&value.to_string(), None), Some(value));
        }
    }
}
