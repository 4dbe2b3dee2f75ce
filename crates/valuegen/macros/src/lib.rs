//! # valuegen-macros
//!
//! Proc-macros for valuegen value objects.
//!
//! | Macro | Description |
//! |-------|-------------|
//! | [`Value`](derive@Value) | Implements `valuegen::Value` for a single-field struct |
//!
//! The derive only declares the capability. Conversions, operators,
//! parsing and adapters are emitted by `valuegen-build` from the consumer's
//! build script, which finds every `#[derive(Value)]` in the crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

extern crate proc_macro;

use proc_macro::TokenStream;

mod support;
mod value;

/// Derive macro for the `valuegen::Value` trait.
///
/// The struct must have exactly one field (named or tuple) and no generic
/// parameters; that field is the payload.
///
/// # Attributes
///
/// ## Container attributes (`#[value(...)]` on the struct)
///
/// - `crate = path` - Path to the `valuegen` crate (default: `::valuegen`)
///
/// # Example
///
/// ```ignore
/// use valuegen::Value;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Value)]
/// pub struct Age(i32);
///
/// #[derive(Debug, Clone, PartialEq, Value)]
/// pub struct Email {
///     value: String,
/// }
/// ```
#[proc_macro_derive(Value, attributes(value))]
pub fn derive_value(input: TokenStream) -> TokenStream {
    value::derive(input)
}
