//! Domain types whose boilerplate comes from `valuegen-build`.
//!
//! `build.rs` runs the generator over this crate; the output is included
//! into [`generated`].

pub mod catalog;
pub mod people;

/// Everything `valuegen-build` wrote for this crate.
#[allow(missing_docs, unused_qualifications, clippy::all, clippy::pedantic, clippy::nursery)]
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/valuegen.rs"));
}
