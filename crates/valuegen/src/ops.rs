//! Payload arithmetic behind the generated `Add` / `Sub` operators.
//!
//! Nullable payloads (`Option<T>`) propagate `None`: if either side is
//! `None`, so is the result. Overflow behaves like the primitive's own
//! operator.

use rust_decimal::Decimal;

/// Payloads supporting `+` (numeric addition, text concatenation).
pub trait Additive: Sized {
    /// `self + rhs`.
    fn plus(self, rhs: Self) -> Self;
}

/// Payloads supporting `-`.
pub trait Subtractive: Sized {
    /// `self - rhs`.
    fn minus(self, rhs: Self) -> Self;
}

macro_rules! numeric_ops {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Additive for $t {
                #[inline]
                fn plus(self, rhs: Self) -> Self {
                    self + rhs
                }
            }

            impl Subtractive for $t {
                #[inline]
                fn minus(self, rhs: Self) -> Self {
                    self - rhs
                }
            }
        )+
    };
}

numeric_ops!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Decimal
);

impl Additive for String {
    fn plus(mut self, rhs: Self) -> Self {
        self.push_str(&rhs);
        self
    }
}

impl<T: Additive> Additive for Option<T> {
    fn plus(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Some(lhs), Some(rhs)) => Some(lhs.plus(rhs)),
            _ => None,
        }
    }
}

impl<T: Subtractive> Subtractive for Option<T> {
    fn minus(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Some(lhs), Some(rhs)) => Some(lhs.minus(rhs)),
            _ => None,
        }
    }
}
