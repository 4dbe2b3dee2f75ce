use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields};

/// Ensure input is a struct and return its fields.
pub fn require_struct_fields(input: &DeriveInput) -> syn::Result<&Fields> {
    match &input.data {
        Data::Struct(s) => Ok(&s.fields),
        _ => Err(syn::Error::new(
            input.ident.span(),
            "This derive can only be used on structs",
        )),
    }
}

/// Return the only field of a single-field struct; otherwise error.
pub fn require_single_field(input: &DeriveInput) -> syn::Result<&Field> {
    let fields = require_struct_fields(input)?;
    let mut iter = fields.iter();
    match (iter.next(), iter.next()) {
        (Some(field), None) => Ok(field),
        (None, _) => Err(syn::Error::new(
            fields.span(),
            "This derive requires a struct with exactly one field (the payload)",
        )),
        (Some(_), Some(extra)) => Err(syn::Error::new(
            extra.span(),
            "This derive requires a struct with exactly one field (the payload)",
        )),
    }
}

/// Value objects wrap one concrete payload; generic parameters are rejected.
pub fn reject_generics(input: &DeriveInput) -> syn::Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(syn::Error::new(
            input.generics.span(),
            "This derive does not support generic parameters; the payload must be a concrete type",
        ))
    }
}
