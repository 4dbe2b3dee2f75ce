//! `Parseable` and `FromStr` per wrapper.
//!
//! The precondition (absent or empty text) is checked once up front; the
//! kind then picks the strategy. Nothing generated here panics or falls
//! back to a default payload.

use proc_macro2::TokenStream;
use quote::quote;

use super::WrapperContext;
use crate::kind::PayloadKind;

pub fn emit(ctx: &WrapperContext<'_>) -> TokenStream {
    let WrapperContext { wrapper, inner, .. } = ctx;

    let strategy = match ctx.classification.kind {
        PayloadKind::String => quote! {
            let _ = culture;
            let value: ::std::string::String = ::std::string::ToString::to_string(text);
        },
        PayloadKind::Numeric(_) => quote! {
            let value: #inner = ::valuegen::parse::number::<#inner>(text, culture)?;
        },
        PayloadKind::Identifier => quote! {
            let value: #inner = ::valuegen::parse::identifier(text, culture)?;
        },
        PayloadKind::DocumentId => quote! {
            let _ = culture;
            let value: #inner = ::valuegen::parse::document_id(text)?;
        },
        PayloadKind::Other => quote! {
            let value: #inner = <#inner as ::valuegen::parse::ParsePayload>::parse_payload(text, culture)?;
        },
    };

    let payload = if ctx.classification.nullable {
        quote!(::core::option::Option::Some(value))
    } else {
        quote!(value)
    };

    quote! {
        impl ::valuegen::Parseable for #wrapper {
            fn try_parse_with(
                text: ::core::option::Option<&str>,
                culture: ::core::option::Option<&::valuegen::Culture>,
            ) -> ::core::option::Option<Self> {
                let text = ::valuegen::parse::has_text(text)?;
                #strategy
                ::core::option::Option::Some(<Self as ::valuegen::Value>::from_payload(#payload))
            }
        }

        impl ::core::str::FromStr for #wrapper {
            type Err = ::valuegen::ParseValueError;

            fn from_str(text: &str) -> ::core::result::Result<Self, Self::Err> {
                <Self as ::valuegen::Parseable>::parse_with(text, ::core::option::Option::None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ValueDescriptor;
    use crate::emit::tests_support::{impl_headers, render};
    use crate::kind::classify;
    use pretty_assertions::assert_eq;
    use quote::ToTokens;
    use syn::{ImplItem, Item};

    fn body_of(display: &str) -> String {
        let descriptor = ValueDescriptor::new("W", None, display);
        let classification = classify(display);
        let ctx = WrapperContext::new(&descriptor, &classification).unwrap();
        let file = render(emit(&ctx));
        assert_eq!(
            impl_headers(&file),
            vec!["Parseable for crate::W", "FromStr for crate::W"]
        );

        let Item::Impl(parseable) = &file.items[0] else {
            panic!("first item is the Parseable impl");
        };
        let Some(ImplItem::Fn(function)) = parseable.items.first() else {
            panic!("Parseable impl has try_parse_with");
        };
        function.block.to_token_stream().to_string().split_whitespace().collect()
    }

    #[test]
    fn every_body_checks_the_precondition_first() {
        for display in ["String", "i32", "uuid::Uuid", "bson::oid::ObjectId", "bool"] {
            let body = body_of(display);
            assert!(body.starts_with("{lettext=::valuegen::parse::has_text(text)?"), "{display}: {body}");
        }
    }

    #[test]
    fn string_wraps_directly() {
        let body = body_of("String");
        assert!(body.contains("ToString::to_string(text)"));
        assert!(!body.contains("parse::number") && !body.contains("ParsePayload"));
    }

    #[test]
    fn numeric_uses_culture_aware_number() {
        let body = body_of("rust_decimal::Decimal");
        assert!(body.contains("number::<::valuegen::rust_decimal::Decimal>(text,culture)"));
    }

    #[test]
    fn nullable_wraps_in_some() {
        let body = body_of("Option<u16>");
        assert!(body.contains("number::<u16>"));
        assert!(body.contains("from_payload(::core::option::Option::Some(value))"));
    }

    #[test]
    fn document_id_ignores_culture() {
        let body = body_of("bson::oid::ObjectId");
        assert!(body.contains("document_id(text)"));
    }

    #[test]
    fn other_defers_to_parse_payload() {
        let body = body_of("bool");
        assert!(body.contains("<boolas::valuegen::parse::ParsePayload>::parse_payload(text,culture)"));
    }
}
