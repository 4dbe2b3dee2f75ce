//! # valuegen
//!
//! Runtime support for value objects whose boilerplate is produced by
//! `valuegen-build`.
//!
//! A value object is a small type carrying exactly one payload, used in
//! place of a bare primitive for domain clarity. It declares itself by
//! implementing [`Value`], usually through `#[derive(Value)]`:
//!
//! ```rust,ignore
//! use valuegen::Value;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Value)]
//! pub struct Age(i32);
//! ```
//!
//! The build script then emits, per wrapper, conversions, equality against
//! the payload, ordering and arithmetic where the payload kind allows it,
//! a [`Parseable`] implementation and the optional persistence adapters in
//! [`relational`] and [`document`].
//!
//! ## Modules
//!
//! - [`parse`] - per-kind parse strategies called by generated code
//! - [`ops`] - payload arithmetic with `None` propagation
//! - [`relational`] - converter registry for the relational adapter
//! - [`document`] - BSON serializer registry for the document-store adapter

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod culture;
pub mod document;
mod error;
pub mod ops;
pub mod parse;
pub mod relational;

pub use culture::Culture;
pub use error::{DocumentError, ParseValueError};
pub use parse::Parseable;

#[cfg(feature = "derive")]
pub use valuegen_macros::Value;

// Payload crates, re-exported so generated code resolves the same versions.
pub use bson;
pub use rust_decimal;
pub use serde;
#[cfg(feature = "relational")]
pub use sqlx;
pub use uuid;

/// A type carrying exactly one payload value.
///
/// This is the capability the generator looks for. The payload must be a
/// concrete type; generic wrappers are not candidates.
///
/// Wrapper/wrapper equality is expected to come from `#[derive(PartialEq)]`
/// on the wrapper itself. Generated code only adds equality against the
/// bare payload.
pub trait Value: Sized {
    /// The wrapped primitive.
    type Payload;

    /// Borrow the payload.
    fn payload(&self) -> &Self::Payload;

    /// Consume the wrapper and return the payload.
    fn into_payload(self) -> Self::Payload;

    /// Wrap a payload.
    fn from_payload(payload: Self::Payload) -> Self;
}
