//! Internal support utilities for proc-macros.
//!
//! Attribute parsing, diagnostics, and struct shape checks.

pub mod attrs;
pub mod diag;
pub mod utils;
