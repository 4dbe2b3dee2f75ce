//! Relational adapter: value converters, sqlx plumbing and per-entity
//! converter registration.

use proc_macro2::TokenStream;
use quote::quote;

use super::{WrapperContext, crate_path, ident};
use crate::descriptor::EntityProperty;
use crate::error::GenerateResult;

/// `{stem}Converter`, `{stem}NullableConverter` and the sqlx impls for one wrapper.
pub fn emit(ctx: &WrapperContext<'_>, stem: &str) -> GenerateResult<TokenStream> {
    let WrapperContext { wrapper, payload, .. } = ctx;
    let converter = ident(&format!("{stem}Converter"), "converter name")?;
    let nullable = ident(&format!("{stem}NullableConverter"), "converter name")?;
    let converter_doc = format!("Column converter for `{}`.", ctx.descriptor.wrapper_path());
    let nullable_doc = format!("Column converter for `Option<{}>`.", ctx.descriptor.wrapper_path());

    Ok(quote! {
        #[doc = #converter_doc]
        pub struct #converter;

        impl ::valuegen::relational::ValueConverter for #converter {
            type Model = #wrapper;
            type Provider = #payload;
            const NULLABLE: bool = false;

            #[inline]
            fn to_provider(model: &#wrapper) -> #payload {
                ::core::clone::Clone::clone(<#wrapper as ::valuegen::Value>::payload(model))
            }

            #[inline]
            fn from_provider(provider: #payload) -> #wrapper {
                <#wrapper as ::valuegen::Value>::from_payload(provider)
            }
        }

        #[doc = #nullable_doc]
        pub struct #nullable;

        impl ::valuegen::relational::ValueConverter for #nullable {
            type Model = ::core::option::Option<#wrapper>;
            type Provider = ::core::option::Option<#payload>;
            const NULLABLE: bool = true;

            #[inline]
            fn to_provider(model: &::core::option::Option<#wrapper>) -> ::core::option::Option<#payload> {
                model.as_ref().map(|model| {
                    ::core::clone::Clone::clone(<#wrapper as ::valuegen::Value>::payload(model))
                })
            }

            #[inline]
            fn from_provider(provider: ::core::option::Option<#payload>) -> ::core::option::Option<#wrapper> {
                provider.map(<#wrapper as ::valuegen::Value>::from_payload)
            }
        }

        impl<DB> ::valuegen::sqlx::Type<DB> for #wrapper
        where
            DB: ::valuegen::sqlx::Database,
            #payload: ::valuegen::sqlx::Type<DB>,
        {
            fn type_info() -> <DB as ::valuegen::sqlx::Database>::TypeInfo {
                <#payload as ::valuegen::sqlx::Type<DB>>::type_info()
            }

            fn compatible(ty: &<DB as ::valuegen::sqlx::Database>::TypeInfo) -> bool {
                <#payload as ::valuegen::sqlx::Type<DB>>::compatible(ty)
            }
        }

        impl<'q, DB> ::valuegen::sqlx::Encode<'q, DB> for #wrapper
        where
            DB: ::valuegen::sqlx::Database,
            #payload: ::valuegen::sqlx::Encode<'q, DB>,
        {
            fn encode_by_ref(
                &self,
                buf: &mut <DB as ::valuegen::sqlx::Database>::ArgumentBuffer<'q>,
            ) -> ::core::result::Result<::valuegen::sqlx::encode::IsNull, ::valuegen::sqlx::error::BoxDynError> {
                <#payload as ::valuegen::sqlx::Encode<'q, DB>>::encode_by_ref(
                    <Self as ::valuegen::Value>::payload(self),
                    buf,
                )
            }

            fn size_hint(&self) -> usize {
                <#payload as ::valuegen::sqlx::Encode<'q, DB>>::size_hint(<Self as ::valuegen::Value>::payload(self))
            }
        }

        impl<'r, DB> ::valuegen::sqlx::Decode<'r, DB> for #wrapper
        where
            DB: ::valuegen::sqlx::Database,
            #payload: ::valuegen::sqlx::Decode<'r, DB>,
        {
            fn decode(
                value: <DB as ::valuegen::sqlx::Database>::ValueRef<'r>,
            ) -> ::core::result::Result<Self, ::valuegen::sqlx::error::BoxDynError> {
                <#payload as ::valuegen::sqlx::Decode<'r, DB>>::decode(value)
                    .map(<Self as ::valuegen::Value>::from_payload)
            }
        }
    })
}

/// `EntityConverters` for one entity; `properties` all belong to it.
///
/// The registry key is the entity's `crate::` path, so same-named entities
/// in different modules do not overwrite each other. `stem_of` maps a property to the converter stem of its wrapper.
pub fn emit_entity<F>(properties: &[EntityProperty], stem_of: F) -> GenerateResult<TokenStream>
where
    F: Fn(&EntityProperty) -> String,
{
    let Some(first) = properties.first() else {
        return Ok(TokenStream::new());
    };
    let entity = crate_path(first.entity_namespace.as_deref(), &first.entity_name)?;
    let entity_name = first.entity_path();

    let registrations = properties
        .iter()
        .map(|property| {
            let suffix = if property.is_nullable { "NullableConverter" } else { "Converter" };
            let converter = ident(&format!("{}{suffix}", stem_of(property)), "converter name")?;
            ident(&property.property_name, "property name")?;
            let property_name = property.property_name.strip_prefix("r#").unwrap_or(&property.property_name);
            Ok(quote! {
                registry.register::<#converter>(
                    <Self as ::valuegen::relational::EntityConverters>::ENTITY,
                    #property_name,
                );
            })
        })
        .collect::<GenerateResult<Vec<_>>>()?;

    Ok(quote! {
        impl ::valuegen::relational::EntityConverters for #entity {
            const ENTITY: &'static str = #entity_name;

            fn register_converters(registry: &mut ::valuegen::relational::ConverterRegistry) {
                #(#registrations)*
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ValueDescriptor;
    use crate::emit::tests_support::{impl_headers, item_names, render};
    use crate::kind::classify;
    use pretty_assertions::assert_eq;
    use quote::ToTokens;
    use syn::{ImplItem, Item};

    #[test]
    fn converters_and_sqlx_impls() {
        let descriptor = ValueDescriptor::new("Age", Some("people".into()), "i32");
        let classification = classify("i32");
        let ctx = WrapperContext::new(&descriptor, &classification).unwrap();
        let file = render(emit(&ctx, "Age").unwrap());

        assert_eq!(item_names(&file), vec!["AgeConverter", "AgeNullableConverter"]);
        assert_eq!(
            impl_headers(&file),
            vec![
                "ValueConverter for AgeConverter",
                "ValueConverter for AgeNullableConverter",
                "Type<DB> for crate::people::Age",
                "Encode<'q,DB> for crate::people::Age",
                "Decode<'r,DB> for crate::people::Age",
            ]
        );
    }

    #[test]
    fn nullable_converter_declares_itself() {
        let descriptor = ValueDescriptor::new("Age", None, "i32");
        let classification = classify("i32");
        let ctx = WrapperContext::new(&descriptor, &classification).unwrap();
        let file = render(emit(&ctx, "Age").unwrap());

        let consts: Vec<String> = file
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Impl(item) => Some(item),
                _ => None,
            })
            .flat_map(|item| &item.items)
            .filter_map(|item| match item {
                ImplItem::Const(constant) => Some(constant.expr.to_token_stream().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(consts, vec!["false", "true"]);
    }

    #[test]
    fn entity_registers_each_property() {
        let properties = vec![
            EntityProperty {
                entity_name: "Customer".into(),
                entity_namespace: Some("shop".into()),
                property_name: "age".into(),
                wrapper_type_name: "Age".into(),
                wrapper_namespace: None,
                is_nullable: true,
            },
            EntityProperty {
                entity_name: "Customer".into(),
                entity_namespace: Some("shop".into()),
                property_name: "r#type".into(),
                wrapper_type_name: "Kind".into(),
                wrapper_namespace: None,
                is_nullable: false,
            },
        ];
        let tokens = emit_entity(&properties, |p| p.wrapper_type_name.clone()).unwrap();
        let file = render(tokens.clone());

        assert_eq!(impl_headers(&file), vec!["EntityConverters for crate::shop::Customer"]);
        let compact = |tokens: TokenStream| tokens.to_string().split_whitespace().collect::<String>();
        let text = compact(tokens);
        for expected in [
            quote! {
                registry.register::<AgeNullableConverter>(
                    <Self as ::valuegen::relational::EntityConverters>::ENTITY,
                    "age",
                );
            },
            quote! {
                registry.register::<KindConverter>(
                    <Self as ::valuegen::relational::EntityConverters>::ENTITY,
                    "type",
                );
            },
            quote!(const ENTITY: &'static str = "crate::shop::Customer";),
        ] {
            let expected = compact(expected);
            assert!(text.contains(&expected), "missing {expected} in {text}");
        }
    }
}
