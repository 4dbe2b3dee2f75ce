//! Emitters.
//!
//! Every emitter is a pure function from a descriptor (or a payload group,
//! or an entity's property rows) to one [`GeneratedUnit`]. Emitters never
//! see each other's output; the generator decides which ones run.
//!
//! Generated code addresses the runtime through `::valuegen` and the
//! consumer's types through `crate::` paths, so units can be `include!`d
//! into any module of the consumer crate.

pub mod document;
pub mod extensions;
pub mod operators;
pub mod parse;
pub mod relational;

use std::fmt;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type};

use crate::descriptor::ValueDescriptor;
use crate::error::{GenerateError, GenerateResult};
use crate::kind::{Classification, NumericType, PayloadKind};

// ============================================================================
// EMITTER KINDS
// ============================================================================

/// Which emitter produced a unit; also the unit-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmitterKind {
    Operators,
    Parse,
    Extensions,
    Relational,
    EntityConverters,
    Document,
    Registration,
}

impl EmitterKind {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Operators => "operators",
            Self::Parse => "parse",
            Self::Extensions => "extensions",
            Self::Relational => "relational",
            Self::EntityConverters => "entity_converters",
            Self::Document => "document",
            Self::Registration => "registration",
        }
    }
}

impl fmt::Display for EmitterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

// ============================================================================
// WRAPPER CONTEXT
// ============================================================================

/// Validated tokens for one wrapper, shared by the per-descriptor emitters.
pub struct WrapperContext<'a> {
    pub descriptor: &'a ValueDescriptor,
    pub classification: &'a Classification,
    /// `crate::ns::TypeName`
    pub wrapper: TokenStream,
    /// The payload type as generated code spells it.
    pub payload: TokenStream,
    /// The payload without its outer `Option` when nullable.
    pub inner: TokenStream,
}

impl<'a> WrapperContext<'a> {
    /// Validate the descriptor and build its tokens.
    ///
    /// Fails when the type name, a namespace segment or the payload display
    /// cannot be spelled in Rust.
    pub fn new(descriptor: &'a ValueDescriptor, classification: &'a Classification) -> GenerateResult<Self> {
        let wrapper = crate_path(descriptor.namespace.as_deref(), &descriptor.type_name)?;

        syn::parse_str::<Type>(&descriptor.payload_type_display).map_err(|_| {
            GenerateError::InvalidPayloadType {
                type_name: descriptor.type_name.clone(),
                display: descriptor.payload_type_display.clone(),
            }
        })?;

        let inner = kind_tokens(classification, &wrapper)?;
        let payload = if classification.nullable {
            quote!(::core::option::Option<#inner>)
        } else {
            inner.clone()
        };

        Ok(Self {
            descriptor,
            classification,
            wrapper,
            payload,
            inner,
        })
    }

    /// Type name reported by document errors.
    pub fn type_name_literal(&self) -> String {
        self.descriptor.wrapper_path()
    }
}

/// Tokens for the payload of a known kind; the display or a projection otherwise.
fn kind_tokens(classification: &Classification, wrapper: &TokenStream) -> GenerateResult<TokenStream> {
    Ok(match classification.kind {
        PayloadKind::String => quote!(::std::string::String),
        PayloadKind::Numeric(NumericType::Decimal) => quote!(::valuegen::rust_decimal::Decimal),
        PayloadKind::Numeric(ty) => {
            let ident = format_ident!("{}", ty.display());
            quote!(#ident)
        }
        PayloadKind::Identifier => quote!(::valuegen::uuid::Uuid),
        PayloadKind::DocumentId => quote!(::valuegen::bson::oid::ObjectId),
        PayloadKind::Other => other_payload_tokens(&classification.inner_display, wrapper)?,
    })
}

/// Primitives and `crate::` paths resolve anywhere; everything else is
/// reached through the wrapper's own `Value::Payload`.
fn other_payload_tokens(display: &str, wrapper: &TokenStream) -> GenerateResult<TokenStream> {
    const ANYWHERE: &[&str] = &["bool", "char"];
    if ANYWHERE.contains(&display) || display.starts_with("crate::") {
        let ty: Type = syn::parse_str(display).map_err(|_| GenerateError::InvalidPayloadType {
            type_name: wrapper.to_string(),
            display: display.to_owned(),
        })?;
        return Ok(quote!(#ty));
    }
    Ok(quote!(<#wrapper as ::valuegen::Value>::Payload))
}

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// Parse `name` as an identifier; raw identifiers are accepted.
pub fn ident(name: &str, context: &str) -> GenerateResult<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| GenerateError::InvalidIdentifier {
        name: name.to_owned(),
        context: context.to_owned(),
    })
}

/// `crate::a::b::Name` with every segment validated.
pub fn crate_path(namespace: Option<&str>, name: &str) -> GenerateResult<TokenStream> {
    let segments = namespace
        .into_iter()
        .flat_map(|ns| ns.split("::"))
        .map(|segment| ident(segment, "namespace"))
        .collect::<GenerateResult<Vec<_>>>()?;
    let name = ident(name, "type name")?;
    Ok(quote!(crate #(:: #segments)* :: #name))
}

/// Identifier for a generated method; keywords become raw identifiers, and
/// the few that cannot be raw get a trailing underscore.
pub fn method_ident(name: &str) -> GenerateResult<Ident> {
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Ok(ident);
    }
    if let Ok(ident) = syn::parse_str::<Ident>(&format!("r#{name}")) {
        return Ok(ident);
    }
    ident(&format!("{name}_"), "method name")
}

/// `EntityId` -> `entity_id`, `HTTPStatus` -> `http_status`.
pub fn snake_case(name: &str) -> String {
    let name = name.strip_prefix("r#").unwrap_or(name);
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(prev) if prev == '_' => false,
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `domain::billing` -> `DomainBilling`; the crate root is `Crate`.
pub fn namespace_camel(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => ns.split("::").map(crate::kind::upper_camel).collect(),
        None => "Crate".to_owned(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::classify;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Age", "age")]
    #[case("EntityId", "entity_id")]
    #[case("HTTPStatus", "http_status")]
    #[case("Utf8Text", "utf8_text")]
    #[case("Already_Snake", "already_snake")]
    fn snake_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snake_case(input), expected);
    }

    #[rstest]
    #[case("age", "age")]
    #[case("type", "r#type")]
    #[case("self", "self_")]
    fn method_idents(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(method_ident(input).unwrap().to_string(), expected);
    }

    #[test]
    fn crate_path_validates_segments() {
        assert_eq!(
            crate_path(Some("domain::people"), "Age").unwrap().to_string(),
            quote!(crate::domain::people::Age).to_string()
        );
        assert!(matches!(
            crate_path(None, "Not A Name"),
            Err(GenerateError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn payload_tokens_per_kind() {
        let cases = [
            ("String", quote!(::std::string::String)),
            ("i32", quote!(i32)),
            ("rust_decimal::Decimal", quote!(::valuegen::rust_decimal::Decimal)),
            ("uuid::Uuid", quote!(::valuegen::uuid::Uuid)),
            ("Option<u8>", quote!(::core::option::Option<u8>)),
            ("bool", quote!(bool)),
            ("crate::money::Money", quote!(crate::money::Money)),
            ("Vec<u8>", quote!(<crate::W as ::valuegen::Value>::Payload)),
        ];
        for (display, expected) in cases {
            let descriptor = ValueDescriptor::new("W", None, display);
            let classification = classify(display);
            let ctx = WrapperContext::new(&descriptor, &classification).unwrap();
            assert_eq!(ctx.payload.to_string(), expected.to_string(), "{display}");
        }
    }

    #[test]
    fn invalid_payload_display_is_reported() {
        let descriptor = ValueDescriptor::new("W", None, "Vec<");
        let classification = classify("Vec<");
        let err = WrapperContext::new(&descriptor, &classification).err().unwrap();
        assert!(matches!(err, GenerateError::InvalidPayloadType { .. }));
    }

    #[test]
    fn namespace_camel_names() {
        assert_eq!(namespace_camel(Some("domain::billing_v2")), "DomainBillingV2");
        assert_eq!(namespace_camel(None), "Crate");
    }
}
