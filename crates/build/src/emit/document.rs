//! Document-store adapter: serde impls reading and writing the single
//! payload, a `DocumentSerializer` per wrapper, and one registration
//! function for all of them.

use proc_macro2::TokenStream;
use quote::quote;

use super::WrapperContext;

pub fn emit(ctx: &WrapperContext<'_>) -> TokenStream {
    let WrapperContext { wrapper, payload, .. } = ctx;
    let type_name = ctx.type_name_literal();

    quote! {
        impl ::valuegen::serde::Serialize for #wrapper {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::valuegen::serde::Serializer,
            {
                <#payload as ::valuegen::serde::Serialize>::serialize(
                    <Self as ::valuegen::Value>::payload(self),
                    serializer,
                )
            }
        }

        impl<'de> ::valuegen::serde::Deserialize<'de> for #wrapper {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::valuegen::serde::Deserializer<'de>,
            {
                <#payload as ::valuegen::serde::Deserialize<'de>>::deserialize(deserializer)
                    .map(<Self as ::valuegen::Value>::from_payload)
            }
        }

        impl ::valuegen::document::DocumentSerializer for #wrapper {
            fn to_bson(&self) -> ::core::result::Result<::valuegen::bson::Bson, ::valuegen::DocumentError> {
                ::valuegen::document::payload_to_bson(#type_name, <Self as ::valuegen::Value>::payload(self))
            }

            fn from_bson(
                value: ::valuegen::bson::Bson,
            ) -> ::core::result::Result<Self, ::valuegen::DocumentError> {
                ::valuegen::document::payload_from_bson::<#payload>(#type_name, value)
                    .map(<Self as ::valuegen::Value>::from_payload)
            }
        }
    }
}

/// `register_document_serializers` over every wrapper, in descriptor order.
///
/// Emitted even when there are no wrappers, so callers can rely on it.
pub fn emit_registration(wrappers: &[TokenStream]) -> TokenStream {
    let body = if wrappers.is_empty() {
        quote!(let _ = registry;)
    } else {
        quote! {
            #(registry.register::<#wrappers>();)*
        }
    };

    quote! {
        /// Register the document serializer of every generated wrapper.
        pub fn register_document_serializers(registry: &mut ::valuegen::document::SerializerRegistry) {
            #body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ValueDescriptor;
    use crate::emit::tests_support::{impl_headers, item_names, render};
    use crate::kind::classify;
    use pretty_assertions::assert_eq;

    #[test]
    fn serde_and_serializer_impls() {
        let descriptor = ValueDescriptor::new("UserId", Some("accounts".into()), "uuid::Uuid");
        let classification = classify("uuid::Uuid");
        let ctx = WrapperContext::new(&descriptor, &classification).unwrap();
        let file = render(emit(&ctx));

        assert_eq!(
            impl_headers(&file),
            vec![
                "Serialize for crate::accounts::UserId",
                "Deserialize<'de> for crate::accounts::UserId",
                "DocumentSerializer for crate::accounts::UserId",
            ]
        );
    }

    #[test]
    fn registration_lists_every_wrapper() {
        let wrappers = vec![quote!(crate::Age), quote!(crate::domain::Price)];
        let tokens = emit_registration(&wrappers);
        let file = render(tokens.clone());

        assert_eq!(item_names(&file), vec!["register_document_serializers"]);
        let text: String = tokens.to_string().split_whitespace().collect();
        assert!(text.contains("registry.register::<crate::Age>();registry.register::<crate::domain::Price>();"));
    }

    #[test]
    fn empty_registration_still_compiles() {
        let file = render(emit_registration(&[]));
        assert_eq!(item_names(&file), vec!["register_document_serializers"]);
    }
}
