//! Discovery output: one descriptor per value object, one row per entity property.

use std::fmt;

/// What the generator knows about one discovered value object.
///
/// Field order is the sort order: type name, payload display, namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValueDescriptor {
    /// Wrapper identifier, e.g. `Age`.
    pub type_name: String,
    /// Canonical payload type text, e.g. `i32` or `Option<rust_decimal::Decimal>`.
    pub payload_type_display: String,
    /// Owning module relative to the crate root; `None` at the root.
    pub namespace: Option<String>,
    /// Wrapper derives `Copy`.
    pub is_value_kind: bool,
    /// Payload field is not `pub`.
    pub is_immutable_binding: bool,
}

impl ValueDescriptor {
    /// Descriptor with the defaults used for hand-written `Value` impls.
    pub fn new(
        type_name: impl Into<String>,
        namespace: Option<String>,
        payload_type_display: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            payload_type_display: payload_type_display.into(),
            namespace,
            is_value_kind: false,
            is_immutable_binding: true,
        }
    }

    pub fn with_value_kind(mut self, is_value_kind: bool) -> Self {
        self.is_value_kind = is_value_kind;
        self
    }

    pub fn with_immutable_binding(mut self, is_immutable_binding: bool) -> Self {
        self.is_immutable_binding = is_immutable_binding;
        self
    }

    /// `crate::a::b::TypeName`.
    pub fn wrapper_path(&self) -> String {
        qualified_path(self.namespace.as_deref(), &self.type_name)
    }

    /// Unit-name prefix: namespace with `::` replaced by `.`, then the type name.
    pub fn unit_stem(&self) -> String {
        dotted_stem(self.namespace.as_deref(), &self.type_name)
    }
}

impl fmt::Display for ValueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.wrapper_path(), self.payload_type_display)
    }
}

/// Descriptors sharing one payload display; one extension unit each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadGroup {
    pub payload_type_display: String,
    /// UpperCamel group name, unique across the pass (`I32`, `OptionI32`).
    pub name: String,
    /// In descriptor order.
    pub members: Vec<ValueDescriptor>,
}

/// A named field of some struct whose type is a discovered wrapper.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityProperty {
    pub entity_name: String,
    pub entity_namespace: Option<String>,
    pub property_name: String,
    pub wrapper_type_name: String,
    pub wrapper_namespace: Option<String>,
    /// Field type is `Option<Wrapper>`.
    pub is_nullable: bool,
}

impl EntityProperty {
    pub fn entity_path(&self) -> String {
        qualified_path(self.entity_namespace.as_deref(), &self.entity_name)
    }

    pub fn wrapper_path(&self) -> String {
        qualified_path(self.wrapper_namespace.as_deref(), &self.wrapper_type_name)
    }

    pub fn entity_stem(&self) -> String {
        dotted_stem(self.entity_namespace.as_deref(), &self.entity_name)
    }
}

pub(crate) fn qualified_path(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("crate::{ns}::{name}"),
        None => format!("crate::{name}"),
    }
}

pub(crate) fn dotted_stem(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{}.{name}", ns.replace("::", ".")),
        None => name.to_owned(),
    }
}
