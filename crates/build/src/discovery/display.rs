//! Canonical payload display strings.
//!
//! Two payloads that name the same type must produce the same display,
//! since the display keys both classification and extension grouping.

use quote::ToTokens;
use syn::{GenericArgument, Path, PathArguments, PathSegment, Type, parse_quote};

const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64",
];

/// Canonical display of a payload type.
pub fn canonical_display(ty: &Type) -> String {
    let mut ty = ty.clone();
    canonicalize(&mut ty);
    compact(&ty.to_token_stream().to_string())
}

/// Canonical display of payload text; the text itself when it is not a type.
pub fn canonical_display_str(text: &str) -> String {
    match syn::parse_str::<Type>(text) {
        Ok(ty) => canonical_display(&ty),
        Err(_) => compact(text),
    }
}

fn canonicalize(ty: &mut Type) {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => {
            canonicalize_path(&mut type_path.path);
        }
        Type::Path(type_path) => {
            if let Some(qself) = type_path.qself.as_mut() {
                canonicalize(&mut qself.ty);
            }
        }
        Type::Reference(reference) => canonicalize(&mut reference.elem),
        Type::Slice(slice) => canonicalize(&mut slice.elem),
        Type::Array(array) => canonicalize(&mut array.elem),
        Type::Ptr(ptr) => canonicalize(&mut ptr.elem),
        Type::Tuple(tuple) => tuple.elems.iter_mut().for_each(canonicalize),
        Type::Paren(paren) => {
            let mut inner = (*paren.elem).clone();
            canonicalize(&mut inner);
            *ty = inner;
        }
        Type::Group(group) => {
            let mut inner = (*group.elem).clone();
            canonicalize(&mut inner);
            *ty = inner;
        }
        _ => {}
    }
}

fn canonicalize_path(path: &mut Path) {
    for segment in &mut path.segments {
        if let PathArguments::AngleBracketed(args) = &mut segment.arguments {
            for arg in &mut args.args {
                if let GenericArgument::Type(inner) = arg {
                    canonicalize(inner);
                }
            }
        }
    }

    let idents: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let Some(last) = path.segments.last().cloned() else {
        return;
    };
    let last_name = last.ident.to_string();

    if let Some(replacement) = well_known(&idents, &last_name) {
        let mut replaced: Path = replacement;
        if let Some(tail) = replaced.segments.last_mut() {
            tail.arguments = last.arguments;
        }
        *path = replaced;
        return;
    }

    let std_prefixed = matches!(idents.first().map(String::as_str), Some("std" | "core" | "alloc"));
    let preluded = last_name == "String" || last_name == "Option" || PRIMITIVES.contains(&last_name.as_str());
    if std_prefixed && preluded {
        *path = Path::from(PathSegment {
            ident: last.ident,
            arguments: last.arguments,
        });
        return;
    }

    path.leading_colon = None;
}

/// Payload crates known to the generator, under any import path.
fn well_known(idents: &[String], last: &str) -> Option<Path> {
    let single = idents.len() == 1;
    let ends_with = |suffix: &[&str]| {
        idents.len() >= suffix.len()
            && idents[idents.len() - suffix.len()..]
                .iter()
                .zip(suffix)
                .all(|(a, b)| a == b)
    };

    match last {
        "Uuid" if single || ends_with(&["uuid", "Uuid"]) => Some(parse_quote!(uuid::Uuid)),
        "Decimal" if single || ends_with(&["rust_decimal", "Decimal"]) => {
            Some(parse_quote!(rust_decimal::Decimal))
        }
        "ObjectId" if single || ends_with(&["bson", "oid", "ObjectId"]) => {
            Some(parse_quote!(bson::oid::ObjectId))
        }
        _ => None,
    }
}

/// Drop whitespace except a single space between two word characters.
fn compact(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && out.chars().next_back().is_some_and(is_word) && is_word(c) {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
