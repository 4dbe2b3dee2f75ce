//! Conversions, payload equality, text representation, and the
//! kind-dependent ordering and arithmetic operators.

use proc_macro2::TokenStream;
use quote::quote;

use super::WrapperContext;

pub fn emit(ctx: &WrapperContext<'_>) -> TokenStream {
    let conversions = conversions(ctx);
    let equality = equality(ctx);
    let display = display(ctx);
    let ordering = ctx.classification.supports_ordering().then(|| ordering(ctx));
    let addition = ctx.classification.supports_addition().then(|| addition(ctx));
    let subtraction = ctx.classification.supports_subtraction().then(|| subtraction(ctx));

    quote! {
        #conversions
        #equality
        #display
        #ordering
        #addition
        #subtraction
    }
}

fn conversions(ctx: &WrapperContext<'_>) -> TokenStream {
    let WrapperContext { wrapper, payload, .. } = ctx;
    quote! {
        impl ::core::convert::From<#payload> for #wrapper {
            #[inline]
            fn from(payload: #payload) -> Self {
                <Self as ::valuegen::Value>::from_payload(payload)
            }
        }

        impl ::core::convert::From<#wrapper> for #payload {
            #[inline]
            fn from(wrapper: #wrapper) -> Self {
                <#wrapper as ::valuegen::Value>::into_payload(wrapper)
            }
        }
    }
}

fn equality(ctx: &WrapperContext<'_>) -> TokenStream {
    let WrapperContext { wrapper, payload, .. } = ctx;
    quote! {
        impl ::core::cmp::PartialEq<#payload> for #wrapper {
            #[inline]
            fn eq(&self, other: &#payload) -> bool {
                <Self as ::valuegen::Value>::payload(self) == other
            }
        }

        impl ::core::cmp::PartialEq<#wrapper> for #payload {
            #[inline]
            fn eq(&self, other: &#wrapper) -> bool {
                self == <#wrapper as ::valuegen::Value>::payload(other)
            }
        }
    }
}

fn display(ctx: &WrapperContext<'_>) -> TokenStream {
    let wrapper = &ctx.wrapper;
    let body = if ctx.classification.nullable {
        quote! {
            match <Self as ::valuegen::Value>::payload(self) {
                ::core::option::Option::Some(value) => ::core::fmt::Display::fmt(value, f),
                ::core::option::Option::None => ::core::result::Result::Ok(()),
            }
        }
    } else {
        quote! {
            ::core::fmt::Display::fmt(<Self as ::valuegen::Value>::payload(self), f)
        }
    };
    quote! {
        impl ::core::fmt::Display for #wrapper {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                #body
            }
        }
    }
}

fn ordering(ctx: &WrapperContext<'_>) -> TokenStream {
    let WrapperContext { wrapper, payload, .. } = ctx;
    quote! {
        impl ::core::cmp::PartialOrd for #wrapper {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::cmp::PartialOrd::partial_cmp(
                    <Self as ::valuegen::Value>::payload(self),
                    <Self as ::valuegen::Value>::payload(other),
                )
            }
        }

        impl ::core::cmp::PartialOrd<#payload> for #wrapper {
            #[inline]
            fn partial_cmp(&self, other: &#payload) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::cmp::PartialOrd::partial_cmp(<Self as ::valuegen::Value>::payload(self), other)
            }
        }

        impl ::core::cmp::PartialOrd<#wrapper> for #payload {
            #[inline]
            fn partial_cmp(&self, other: &#wrapper) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::cmp::PartialOrd::partial_cmp(self, <#wrapper as ::valuegen::Value>::payload(other))
            }
        }
    }
}

fn addition(ctx: &WrapperContext<'_>) -> TokenStream {
    binary(ctx, &quote!(::core::ops::Add), &quote!(add), &quote!(::valuegen::ops::Additive::plus))
}

fn subtraction(ctx: &WrapperContext<'_>) -> TokenStream {
    binary(ctx, &quote!(::core::ops::Sub), &quote!(sub), &quote!(::valuegen::ops::Subtractive::minus))
}

/// `W op W`, `W op P` and `P op W`, all producing `W`.
fn binary(ctx: &WrapperContext<'_>, op: &TokenStream, method: &TokenStream, apply: &TokenStream) -> TokenStream {
    let WrapperContext { wrapper, payload, .. } = ctx;
    quote! {
        impl #op for #wrapper {
            type Output = #wrapper;

            #[inline]
            fn #method(self, rhs: Self) -> Self::Output {
                <Self as ::valuegen::Value>::from_payload(#apply(
                    <Self as ::valuegen::Value>::into_payload(self),
                    <Self as ::valuegen::Value>::into_payload(rhs),
                ))
            }
        }

        impl #op<#payload> for #wrapper {
            type Output = #wrapper;

            #[inline]
            fn #method(self, rhs: #payload) -> Self::Output {
                <Self as ::valuegen::Value>::from_payload(#apply(
                    <Self as ::valuegen::Value>::into_payload(self),
                    rhs,
                ))
            }
        }

        impl #op<#wrapper> for #payload {
            type Output = #wrapper;

            #[inline]
            fn #method(self, rhs: #wrapper) -> Self::Output {
                <#wrapper as ::valuegen::Value>::from_payload(#apply(
                    self,
                    <#wrapper as ::valuegen::Value>::into_payload(rhs),
                ))
            }
        }
    }
}
