//! Per-payload "As" helpers: `2.5_f64.wrap().width()`.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{WrapperContext, method_ident, snake_case};
use crate::descriptor::{PayloadGroup, ValueDescriptor};
use crate::error::GenerateResult;

const RESERVED: &[&str] = &["new", "payload"];

/// Emit `As{Name}` and `{Name}AsExt` for one group.
///
/// `members` holds the validated context of every group member, in group order.
pub fn emit(group: &PayloadGroup, members: &[WrapperContext<'_>]) -> GenerateResult<TokenStream> {
    let holder = super::ident(&format!("As{}", group.name), "extension struct")?;
    let ext = format_ident!("{}AsExt", group.name);
    let Some(first) = members.first() else {
        return Ok(TokenStream::new());
    };
    let payload = &first.payload;

    let names = accessor_names(&group.members);
    let accessors = members
        .iter()
        .zip(&names)
        .map(|(ctx, name)| {
            let method = method_ident(name)?;
            let wrapper = &ctx.wrapper;
            let doc = format!("The payload as `{}`.", ctx.descriptor.wrapper_path());
            Ok(quote! {
                #[doc = #doc]
                #[inline]
                pub fn #method(&self) -> #wrapper {
                    <#wrapper as ::core::convert::From<#payload>>::from(::core::clone::Clone::clone(&self.value))
                }
            })
        })
        .collect::<GenerateResult<Vec<_>>>()?;

    let holder_doc = format!("Wrapper accessors for a `{}` payload.", group.payload_type_display);
    let ext_doc = format!("`.wrap()` for `{}` payloads.", group.payload_type_display);

    Ok(quote! {
        #[doc = #holder_doc]
        pub struct #holder {
            value: #payload,
        }

        impl #holder {
            #[inline]
            pub fn new(value: #payload) -> Self {
                Self { value }
            }

            #[inline]
            pub fn payload(&self) -> &#payload {
                &self.value
            }

            #(#accessors)*
        }

        #[doc = #ext_doc]
        pub trait #ext {
            fn wrap(&self) -> #holder;
        }

        impl #ext for #payload {
            #[inline]
            fn wrap(&self) -> #holder {
                #holder::new(::core::clone::Clone::clone(self))
            }
        }
    })
}

/// snake_case accessor per member; namespace-prefixed on collision.
fn accessor_names(members: &[ValueDescriptor]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for member in members {
        *counts.entry(snake_case(&member.type_name)).or_default() += 1;
    }

    members
        .iter()
        .map(|member| {
            let base = snake_case(&member.type_name);
            if counts[&base] > 1 || RESERVED.contains(&base.as_str()) {
                let prefix = member
                    .namespace
                    .as_deref()
                    .map_or_else(|| "crate".to_owned(), |ns| ns.split("::").map(snake_case).collect::<Vec<_>>().join("_"));
                format!("{prefix}_{base}")
            } else {
                base
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::tests_support::{impl_headers, item_names, render};
    use crate::kind::{Classification, classify};
    use pretty_assertions::assert_eq;
    use quote::ToTokens;
    use syn::{ImplItem, Item};

    fn group(name: &str, display: &str, members: Vec<ValueDescriptor>) -> PayloadGroup {
        PayloadGroup {
            payload_type_display: display.to_owned(),
            name: name.to_owned(),
            members,
        }
    }

    fn emit_group(group: &PayloadGroup) -> syn::File {
        let classification: Classification = classify(&group.payload_type_display);
        let contexts: Vec<_> = group
            .members
            .iter()
            .map(|d| WrapperContext::new(d, &classification).unwrap())
            .collect();
        render(emit(group, &contexts).unwrap())
    }

    fn inherent_methods(file: &syn::File) -> Vec<String> {
        file.items
            .iter()
            .filter_map(|item| match item {
                Item::Impl(item) if item.trait_.is_none() => Some(item),
                _ => None,
            })
            .flat_map(|item| &item.items)
            .filter_map(|item| match item {
                ImplItem::Fn(function) => Some(function.sig.ident.to_token_stream().to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn f64_group_has_one_accessor_per_wrapper() {
        let file = emit_group(&group(
            "F64",
            "f64",
            vec![
                ValueDescriptor::new("Height", None, "f64"),
                ValueDescriptor::new("Width", None, "f64"),
            ],
        ));

        assert_eq!(item_names(&file), vec!["AsF64", "F64AsExt"]);
        assert_eq!(impl_headers(&file), vec!["AsF64", "F64AsExt for f64"]);
        assert_eq!(inherent_methods(&file), vec!["new", "payload", "height", "width"]);
    }

    #[test]
    fn colliding_names_are_namespace_prefixed() {
        let file = emit_group(&group(
            "U64",
            "u64",
            vec![
                ValueDescriptor::new("Id", Some("orders".into()), "u64"),
                ValueDescriptor::new("Id", Some("shop::items".into()), "u64"),
                ValueDescriptor::new("Payload", None, "u64"),
            ],
        ));
        assert_eq!(
            inherent_methods(&file),
            vec!["new", "payload", "orders_id", "shop_items_id", "crate_payload"]
        );
    }

    #[test]
    fn keyword_names_become_raw_identifiers() {
        let file = emit_group(&group("U8", "u8", vec![ValueDescriptor::new("Type", None, "u8")]));
        assert_eq!(inherent_methods(&file), vec!["new", "payload", "r#type"]);
    }
}
