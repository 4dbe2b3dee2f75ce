//! Payload kind classification.
//!
//! The kind of a payload decides which operators, which parse strategy and
//! which persistence plumbing a wrapper receives. Classification works on the
//! canonical display string produced by discovery, so `Option<i32>`,
//! `::core::option::Option<i32>` and `Option < i32 >` all classify alike.

use std::collections::HashMap;

use syn::{GenericArgument, PathArguments, Type};

// ============================================================================
// KINDS
// ============================================================================

/// Numeric payloads, including the fixed-point `rust_decimal::Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericType {
    I8,
    I16,
    I32,
    I64,
    I128,
    ISize,
    U8,
    U16,
    U32,
    U64,
    U128,
    USize,
    F32,
    F64,
    Decimal,
}

impl NumericType {
    /// Every numeric type, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::I128,
        Self::ISize,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::U128,
        Self::USize,
        Self::F32,
        Self::F64,
        Self::Decimal,
    ];

    /// Canonical display of the type.
    pub fn display(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::ISize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::USize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "rust_decimal::Decimal",
        }
    }

    pub fn from_display(display: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.display() == display)
    }

    /// Floating kinds accept a culture-specific decimal separator.
    pub fn is_floating(self) -> bool {
        matches!(self, Self::F32 | Self::F64 | Self::Decimal)
    }
}

/// Closed set of payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    String,
    Numeric(NumericType),
    /// `uuid::Uuid`
    Identifier,
    /// `bson::oid::ObjectId`
    DocumentId,
    Other,
}

/// Result of classifying one payload display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: PayloadKind,
    /// Payload is `Option<inner>` with a known inner kind.
    pub nullable: bool,
    /// Display of the payload with the outer `Option` removed when `nullable`.
    pub inner_display: String,
}

impl Classification {
    pub fn numeric(&self) -> Option<NumericType> {
        match self.kind {
            PayloadKind::Numeric(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric().is_some()
    }

    /// Wrapper/wrapper and wrapper/payload ordering.
    pub fn supports_ordering(&self) -> bool {
        self.is_numeric()
    }

    /// `+` in all three forms.
    pub fn supports_addition(&self) -> bool {
        matches!(self.kind, PayloadKind::Numeric(_) | PayloadKind::String)
    }

    /// `-` in all three forms.
    pub fn supports_subtraction(&self) -> bool {
        self.is_numeric()
    }
}

/// Classify one canonical payload display.
pub fn classify(display: &str) -> Classification {
    if let Some(inner) = option_inner(display) {
        let kind = classify_plain(inner);
        if kind != PayloadKind::Other {
            return Classification {
                kind,
                nullable: true,
                inner_display: inner.to_owned(),
            };
        }
    }

    Classification {
        kind: classify_plain(display),
        nullable: false,
        inner_display: display.to_owned(),
    }
}

fn classify_plain(display: &str) -> PayloadKind {
    match display {
        "String" => PayloadKind::String,
        "uuid::Uuid" => PayloadKind::Identifier,
        "bson::oid::ObjectId" => PayloadKind::DocumentId,
        other => NumericType::from_display(other).map_or(PayloadKind::Other, PayloadKind::Numeric),
    }
}

/// `Option<X>` -> `X` on a canonical display.
pub(crate) fn option_inner(display: &str) -> Option<&str> {
    display.strip_prefix("Option<")?.strip_suffix('>')
}

// ============================================================================
// MEMOIZATION
// ============================================================================

/// Classification cache keyed by display string, owned by one generator run.
#[derive(Debug, Default)]
pub struct KindClassifier {
    cache: HashMap<String, Classification>,
}

impl KindClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&mut self, display: &str) -> &Classification {
        if !self.cache.contains_key(display) {
            let classification = classify(display);
            let payload = display;
            tracing::trace!(payload, kind = ?classification.kind, "classified payload");
            self.cache.insert(display.to_owned(), classification);
        }
        &self.cache[display]
    }

    /// Number of distinct displays classified so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

// ============================================================================
// NAMING
// ============================================================================

/// UpperCamel simple name of a payload, used to name its extension group.
///
/// `i32` -> `I32`, `rust_decimal::Decimal` -> `Decimal`,
/// `Option<i32>` -> `OptionI32`, `Vec<u8>` -> `VecU8`.
pub fn simple_name(display: &str) -> String {
    match syn::parse_str::<Type>(display) {
        Ok(ty) => type_name(&ty, false),
        Err(_) => fallback_name(display),
    }
}

/// UpperCamel name built from every path segment of a payload.
///
/// `rust_decimal::Decimal` -> `RustDecimalDecimal`; used when two groups
/// would otherwise share a simple name.
pub fn full_name(display: &str) -> String {
    match syn::parse_str::<Type>(display) {
        Ok(ty) => type_name(&ty, true),
        Err(_) => fallback_name(display),
    }
}

fn type_name(ty: &Type, full: bool) -> String {
    match ty {
        Type::Path(type_path) => {
            let segments = &type_path.path.segments;
            let mut name = String::new();
            let skip = if full { 0 } else { segments.len().saturating_sub(1) };
            for segment in segments.iter().skip(skip) {
                name.push_str(&upper_camel(&segment.ident.to_string()));
            }
            let args = segments.last().map(|last| &last.arguments);
            if let Some(PathArguments::AngleBracketed(args)) = args {
                for arg in &args.args {
                    if let GenericArgument::Type(inner) = arg {
                        name.push_str(&type_name(inner, full));
                    }
                }
            }
            name
        }
        Type::Reference(reference) => format!("Ref{}", type_name(&reference.elem, full)),
        Type::Slice(slice) => format!("Slice{}", type_name(&slice.elem, full)),
        Type::Array(array) => format!("Array{}", type_name(&array.elem, full)),
        Type::Tuple(tuple) if tuple.elems.is_empty() => "Unit".to_owned(),
        Type::Tuple(tuple) => {
            let mut name = "Tuple".to_owned();
            for elem in &tuple.elems {
                name.push_str(&type_name(elem, full));
            }
            name
        }
        Type::Paren(paren) => type_name(&paren.elem, full),
        Type::Group(group) => type_name(&group.elem, full),
        other => fallback_name(&quote::ToTokens::to_token_stream(other).to_string()),
    }
}

fn fallback_name(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|part| !part.is_empty())
        .map(upper_camel)
        .collect()
}

/// `rust_decimal` -> `RustDecimal`, `i32` -> `I32`, `Uuid` -> `Uuid`.
pub(crate) fn upper_camel(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    ident
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
