//! Generated compilation units.

use proc_macro2::TokenStream;

use crate::emit::EmitterKind;
use crate::error::{GenerateError, GenerateResult};

/// First line of every generated file.
pub const HEADER: &str = "// @generated by valuegen-build; do not edit.";

/// One generated Rust source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    name: String,
    emitter: EmitterKind,
    contents: String,
}

impl GeneratedUnit {
    /// Validate `tokens` as a Rust file and render them.
    ///
    /// `stem` is the unit-name prefix; the emitter suffix and `.rs` are
    /// appended.
    pub fn render(stem: &str, emitter: EmitterKind, tokens: TokenStream) -> GenerateResult<Self> {
        let name = format!("{stem}.{}.rs", emitter.suffix());
        if let Err(err) = syn::parse2::<syn::File>(tokens.clone()) {
            return Err(GenerateError::InvalidOutput {
                unit: name,
                message: err.to_string(),
            });
        }

        Ok(Self {
            contents: format!("{HEADER}\n{tokens}\n"),
            name,
            emitter,
        })
    }

    /// File name, e.g. `domain.Age.operators.rs`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn emitter(&self) -> EmitterKind {
        self.emitter
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Parse the contents back into items.
    pub fn parse(&self) -> syn::Result<syn::File> {
        syn::parse_file(&self.contents)
    }
}
