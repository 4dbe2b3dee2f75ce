use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Index, Member, parse_macro_input};

use crate::support::{attrs, diag, utils};

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(ts) => ts.into(),
        Err(e) => diag::to_compile_error(e),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;

    let value_attrs = attrs::parse_attrs(&input.attrs, "value")?;
    value_attrs.ensure_only(&["crate"])?;
    let krate = value_attrs
        .get_path("crate")?
        .map_or_else(|| quote!(::valuegen), |path| quote!(#path));

    utils::reject_generics(input)?;
    let field = utils::require_single_field(input)?;
    let payload = &field.ty;
    let member = field
        .ident
        .clone()
        .map_or_else(|| Member::Unnamed(Index::from(0)), Member::Named);

    Ok(quote! {
        impl #krate::Value for #struct_name {
            type Payload = #payload;

            #[inline]
            fn payload(&self) -> &Self::Payload {
                &self.#member
            }

            #[inline]
            fn into_payload(self) -> Self::Payload {
                self.#member
            }

            #[inline]
            fn from_payload(payload: Self::Payload) -> Self {
                Self { #member: payload }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syn::parse_quote;

    fn expand_to_string(input: DeriveInput) -> String {
        expand(&input).unwrap().to_string()
    }

    #[test]
    fn tuple_struct_uses_index_member() {
        let out = expand_to_string(parse_quote! {
            pub struct Age(i32);
        });
        assert!(out.contains("type Payload = i32"));
        assert!(out.contains("& self . 0"));
        assert!(out.contains("Self { 0 : payload }"));
    }

    #[test]
    fn named_struct_uses_field_name() {
        let out = expand_to_string(parse_quote! {
            pub struct Email { value: String }
        });
        assert!(out.contains("type Payload = String"));
        assert!(out.contains("self . value"));
    }

    #[test]
    fn crate_attribute_overrides_runtime_path() {
        let out = expand_to_string(parse_quote! {
            #[value(crate = my::runtime)]
            pub struct Age(i32);
        });
        assert!(out.starts_with("impl my :: runtime :: Value for Age"));
    }

    #[test]
    fn multiple_fields_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Point { x: i32, y: i32 }
        };
        let err = expand(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This derive requires a struct with exactly one field (the payload)"
        );
    }

    #[test]
    fn unit_struct_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Marker;
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn generics_rejected() {
        let input: DeriveInput = parse_quote! {
            pub struct Wrapper<T>(T);
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn enums_rejected() {
        let input: DeriveInput = parse_quote! {
            pub enum Either { A(i32), B(i32) }
        };
        assert!(expand(&input).is_err());
    }
}
