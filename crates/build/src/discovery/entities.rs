//! Entity scan: structs with wrapper-typed fields.
//!
//! Runs after the candidate scan. Every struct with named fields that is
//! not itself a value object is an entity candidate; each of its fields
//! whose type (possibly `Option<..>`) names a discovered wrapper becomes an
//! [`EntityProperty`].

use std::collections::HashSet;

use syn::{Fields, GenericArgument, PathArguments, Type, TypePath};

use super::SourceTree;
use crate::descriptor::{EntityProperty, ValueDescriptor};

pub fn discover_entities(tree: &SourceTree, candidates: &[ValueDescriptor]) -> Vec<EntityProperty> {
    let wrappers: HashSet<(Option<&str>, &str)> = candidates
        .iter()
        .map(|d| (d.namespace.as_deref(), d.type_name.as_str()))
        .collect();

    let mut properties = Vec::new();
    for module in tree.modules() {
        let namespace = module.namespace();
        for item in module.structs() {
            let entity_name = item.ident.to_string();
            if wrappers.contains(&(namespace, entity_name.as_str())) {
                continue;
            }
            let Fields::Named(fields) = &item.fields else {
                continue;
            };
            if !item.generics.params.is_empty() {
                tracing::debug!(entity = %entity_name, "generic entity skipped");
                continue;
            }

            for field in &fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let (ty, is_nullable) = unwrap_option(&field.ty);
                let Some(matched) = resolve(namespace, ty, candidates) else {
                    continue;
                };
                properties.push(EntityProperty {
                    entity_name: entity_name.clone(),
                    entity_namespace: namespace.map(str::to_owned),
                    property_name: ident.to_string(),
                    wrapper_type_name: matched.type_name.clone(),
                    wrapper_namespace: matched.namespace.clone(),
                    is_nullable,
                });
            }
        }
    }

    properties.sort();
    tracing::debug!(count = properties.len(), "discovered entity properties");
    properties
}

/// `Option<T>` (under any std path) to `(T, true)`.
fn unwrap_option(ty: &Type) -> (&Type, bool) {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return (ty, false);
    };
    let Some(last) = path.segments.last() else {
        return (ty, false);
    };
    let prefix_ok = path.segments.len() == 1
        || path
            .segments
            .first()
            .is_some_and(|s| s.ident == "std" || s.ident == "core");
    if last.ident != "Option" || !prefix_ok {
        return (ty, false);
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first() {
            Some(GenericArgument::Type(inner)) => (inner, true),
            _ => (ty, false),
        },
        _ => (ty, false),
    }
}

/// Find the candidate a field type refers to.
///
/// Qualified paths resolve against the namespace they spell out; bare names
/// prefer a candidate in the entity's own module, then a unique name match.
fn resolve<'a>(
    namespace: Option<&str>,
    ty: &Type,
    candidates: &'a [ValueDescriptor],
) -> Option<&'a ValueDescriptor> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    if path.segments.iter().any(|s| !s.arguments.is_empty()) {
        return None;
    }
    let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let (name, prefix) = segments.split_last()?;

    let named: Vec<&ValueDescriptor> = candidates.iter().filter(|d| &d.type_name == name).collect();
    if named.is_empty() {
        return None;
    }

    let in_namespace = |target: Option<&str>| named.iter().copied().find(|d| d.namespace.as_deref() == target);

    if !prefix.is_empty() {
        for target in qualified_namespaces(namespace, prefix) {
            if let Some(found) = in_namespace(target.as_deref()) {
                return Some(found);
            }
        }
    }
    if let Some(found) = in_namespace(namespace) {
        return Some(found);
    }
    if let [only] = named.as_slice() {
        return Some(*only);
    }

    tracing::debug!(
        wrapper = %name,
        candidates = named.len(),
        "ambiguous wrapper reference skipped"
    );
    None
}

/// Namespaces a qualified prefix may denote, most specific first.
fn qualified_namespaces(current: Option<&str>, prefix: &[String]) -> Vec<Option<String>> {
    let join = |parts: &[String]| (!parts.is_empty()).then(|| parts.join("::"));
    let mut base: Vec<String> = current
        .map(|ns| ns.split("::").map(str::to_owned).collect())
        .unwrap_or_default();

    match prefix.first().map(String::as_str) {
        Some("crate") => vec![join(&prefix[1..])],
        Some("self") => {
            base.extend_from_slice(&prefix[1..]);
            vec![join(&base)]
        }
        Some("super") => {
            let mut rest = prefix;
            while let Some((head, tail)) = rest.split_first() {
                if head != "super" {
                    break;
                }
                base.pop();
                rest = tail;
            }
            base.extend_from_slice(rest);
            vec![join(&base)]
        }
        _ => {
            let mut relative = base;
            relative.extend_from_slice(prefix);
            vec![join(&relative), join(prefix)]
        }
    }
}
