//! Candidate scan: which structs are value objects.

use std::collections::HashSet;

use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{Fields, ImplItem, Item, ItemImpl, ItemStruct, Path, Token, Type, Visibility};

use super::{SourceTree, canonical_display};
use crate::descriptor::ValueDescriptor;

const CAPABILITY: &str = "Value";

/// Scan the tree and return one descriptor per value object.
///
/// Sorted by `(type_name, payload_type_display, namespace)`; a type that is
/// found twice (derived and hand-implemented) is reported once.
pub fn discover_candidates(tree: &SourceTree) -> Vec<ValueDescriptor> {
    let mut found = Vec::new();

    for module in tree.modules() {
        let namespace = module.namespace();
        for item in module.items() {
            let descriptor = match item {
                // Stage 1 keeps derive-carrying structs and trait impls only.
                Item::Struct(item) if has_derives(item) => from_derive(namespace, item),
                Item::Impl(item) if item.trait_.is_some() => from_impl(tree, namespace, item),
                _ => None,
            };
            found.extend(descriptor);
        }
    }

    found.sort();
    let mut seen = HashSet::new();
    found.retain(|d| seen.insert((d.namespace.clone(), d.type_name.clone())));

    tracing::debug!(count = found.len(), "discovered value objects");
    found
}

fn from_derive(namespace: Option<&str>, item: &ItemStruct) -> Option<ValueDescriptor> {
    let derives = derives(item);
    if !derives.iter().any(|name| name == CAPABILITY) {
        return None;
    }
    if !item.generics.params.is_empty() {
        tracing::debug!(name = %item.ident, "generic value object skipped");
        return None;
    }
    let field = single_field(&item.fields)?;

    Some(ValueDescriptor {
        type_name: item.ident.to_string(),
        payload_type_display: canonical_display(&field.ty),
        namespace: namespace.map(str::to_owned),
        is_value_kind: derives.iter().any(|name| name == "Copy"),
        is_immutable_binding: is_private(&item.fields),
    })
}

fn from_impl(tree: &SourceTree, namespace: Option<&str>, item: &ItemImpl) -> Option<ValueDescriptor> {
    let (negative, trait_path, _) = item.trait_.as_ref()?;
    if negative.is_some() || !last_segment_is(trait_path, CAPABILITY) {
        return None;
    }
    if !item.generics.params.is_empty() {
        tracing::debug!("generic Value impl skipped");
        return None;
    }

    let Type::Path(self_ty) = item.self_ty.as_ref() else {
        return None;
    };
    if self_ty.qself.is_some() {
        return None;
    }
    let (owner_ns, type_name) = resolve_self_type(namespace, &self_ty.path)?;

    let payload = item.items.iter().find_map(|impl_item| match impl_item {
        ImplItem::Type(assoc) if assoc.ident == "Payload" => Some(&assoc.ty),
        _ => None,
    })?;
    if !is_concrete(&payload.to_token_stream()) {
        tracing::debug!(name = %type_name, "Value impl with a non-concrete payload skipped");
        return None;
    }

    let descriptor = ValueDescriptor::new(type_name.clone(), owner_ns.clone(), canonical_display(payload));
    Some(match tree.find_struct(owner_ns.as_deref(), &type_name) {
        Some(declared) => descriptor
            .with_value_kind(derives(declared).iter().any(|name| name == "Copy"))
            .with_immutable_binding(is_private(&declared.fields)),
        None => descriptor,
    })
}

/// `Foo`, `self::Foo` or `crate::a::Foo` to `(namespace, name)`.
fn resolve_self_type(namespace: Option<&str>, path: &Path) -> Option<(Option<String>, String)> {
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    if path.segments.iter().any(|s| !s.arguments.is_empty()) {
        return None;
    }
    let (name, prefix) = segments.split_last()?;
    let owner = match prefix.split_first() {
        None => namespace.map(str::to_owned),
        Some((head, rest)) if head == "crate" => (!rest.is_empty()).then(|| rest.join("::")),
        Some((head, rest)) if head == "self" && rest.is_empty() => namespace.map(str::to_owned),
        _ => {
            tracing::debug!(path = %path.to_token_stream(), "Value impl for a relative path skipped");
            return None;
        }
    };
    Some((owner, name.clone()))
}

/// Payloads spelled with `Self`, `_` or `impl` are not concrete.
fn is_concrete(tokens: &TokenStream) -> bool {
    tokens.clone().into_iter().all(|tree| match tree {
        TokenTree::Ident(ident) => ident != "Self" && ident != "_" && ident != "impl",
        TokenTree::Group(group) => is_concrete(&group.stream()),
        TokenTree::Punct(punct) => punct.as_char() != '_',
        TokenTree::Literal(_) => true,
    })
}

fn has_derives(item: &ItemStruct) -> bool {
    !derives(item).is_empty()
}

/// Last path segment of every `#[derive(..)]` entry.
fn derives(item: &ItemStruct) -> Vec<String> {
    item.attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .filter_map(|path| path.segments.last().map(|s| s.ident.to_string()))
        .collect()
}

fn last_segment_is(path: &Path, name: &str) -> bool {
    path.segments.last().is_some_and(|s| s.ident == name && s.arguments.is_empty())
}

fn single_field(fields: &Fields) -> Option<&syn::Field> {
    let mut iter = fields.iter();
    match (iter.next(), iter.next()) {
        (Some(field), None) => Some(field),
        _ => None,
    }
}

fn is_private(fields: &Fields) -> bool {
    fields.iter().all(|field| matches!(field.vis, Visibility::Inherited))
}
