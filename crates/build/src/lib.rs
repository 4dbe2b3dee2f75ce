//! # valuegen-build
//!
//! Build-script code generator for `valuegen` value objects.
//!
//! The generator scans the crate being built for types implementing
//! `valuegen::Value` (derived or hand-written), classifies each payload,
//! and writes one Rust file per wrapper and emitter into `OUT_DIR`:
//! conversions and operators, parsing, `As` extension helpers per payload
//! type, and optionally the relational and document-store adapters.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     valuegen_build::compile()?;
//!     Ok(())
//! }
//!
//! // src/lib.rs
//! pub mod domain;
//!
//! pub mod generated {
//!     include!(concat!(env!("OUT_DIR"), "/valuegen.rs"));
//! }
//! ```
//!
//! Adapters are toggled by an optional `valuegen.toml` next to
//! `Cargo.toml`; see [`GeneratorConfig`].
//!
//! ## Pipeline
//!
//! 1. [`SourceTree::load`] follows `mod` declarations from the crate root.
//! 2. [`discover_candidates`] yields sorted [`ValueDescriptor`]s;
//!    [`discover_entities`] yields [`EntityProperty`] rows.
//! 3. [`Generator::emit`] runs every enabled emitter; a unit that fails
//!    validation becomes a diagnostic without affecting the others.
//! 4. [`GenerationOutput::write_to`] replaces the previous output as a whole.

#![forbid(unsafe_code)]

mod config;
mod descriptor;
pub mod discovery;
pub mod emit;
mod error;
mod generator;
pub mod kind;
mod unit;

pub use config::{CONFIG_FILE, GeneratorConfig};
pub use descriptor::{EntityProperty, PayloadGroup, ValueDescriptor};
pub use discovery::{SourceTree, discover_candidates, discover_entities};
pub use emit::EmitterKind;
pub use error::{GenerateError, GenerateResult};
pub use generator::{Builder, GenerationOutput, Generator, INDEX_FILE, UNIT_DIR, compile, group_by_payload};
pub use kind::{Classification, KindClassifier, NumericType, PayloadKind};
pub use unit::{GeneratedUnit, HEADER};
