//! Relational adapter: value converters and per-entity registration.
//!
//! For every wrapper the generator emits two converters (plain and
//! nullable) implementing [`ValueConverter`], and sqlx `Type` / `Encode` /
//! `Decode` impls that delegate to the payload. For every struct with a
//! wrapper-typed field it emits an [`EntityConverters`] impl, so a whole
//! model can be configured in one call:
//!
//! ```rust,ignore
//! let mut registry = ConverterRegistry::new();
//! registry.configure::<Customer>().configure::<Order>();
//!
//! let entry = registry.get("crate::people::Customer", "age").unwrap();
//! assert!(entry.is_nullable());
//! ```

use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt;

/// Maps a model value to the primitive stored in a column and back.
pub trait ValueConverter: 'static {
    /// Type as seen by the application.
    type Model: 'static;
    /// Type as stored by the database driver.
    type Provider: 'static;
    /// Whether the converter handles `Option` on both sides.
    const NULLABLE: bool;

    /// Model to provider.
    fn to_provider(model: &Self::Model) -> Self::Provider;

    /// Provider to model.
    fn from_provider(provider: Self::Provider) -> Self::Model;
}

/// Implemented by generated code for every entity with wrapper-typed fields.
pub trait EntityConverters {
    /// Registry key of the entity: its `crate::` path, e.g.
    /// `crate::people::Customer`.
    const ENTITY: &'static str;

    /// Register the converter of every wrapper-typed property.
    fn register_converters(registry: &mut ConverterRegistry);
}

type ErasedTo = fn(&dyn Any) -> Option<Box<dyn Any>>;
type ErasedFrom = fn(Box<dyn Any>) -> Option<Box<dyn Any>>;

fn erased_to_provider<C: ValueConverter>(model: &dyn Any) -> Option<Box<dyn Any>> {
    model
        .downcast_ref::<C::Model>()
        .map(|model| Box::new(C::to_provider(model)) as Box<dyn Any>)
}

fn erased_from_provider<C: ValueConverter>(provider: Box<dyn Any>) -> Option<Box<dyn Any>> {
    provider
        .downcast::<C::Provider>()
        .ok()
        .map(|provider| Box::new(C::from_provider(*provider)) as Box<dyn Any>)
}

/// A converter bound to one entity property.
#[derive(Clone)]
pub struct ConverterEntry {
    entity: &'static str,
    property: &'static str,
    model_type: &'static str,
    provider_type: &'static str,
    nullable: bool,
    to_provider: ErasedTo,
    from_provider: ErasedFrom,
}

impl ConverterEntry {
    fn of<C: ValueConverter>(entity: &'static str, property: &'static str) -> Self {
        Self {
            entity,
            property,
            model_type: type_name::<C::Model>(),
            provider_type: type_name::<C::Provider>(),
            nullable: C::NULLABLE,
            to_provider: erased_to_provider::<C>,
            from_provider: erased_from_provider::<C>,
        }
    }

    /// Owning entity.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Property name.
    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Fully qualified model type name.
    pub fn model_type(&self) -> &'static str {
        self.model_type
    }

    /// Fully qualified provider type name.
    pub fn provider_type(&self) -> &'static str {
        self.provider_type
    }

    /// Whether the property is `Option<Wrapper>`.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Convert a model value; `None` if `M` is not this entry's model type.
    pub fn convert_to_provider<M: Any, P: Any>(&self, model: &M) -> Option<P> {
        (self.to_provider)(model)
            .and_then(|boxed| boxed.downcast::<P>().ok())
            .map(|provider| *provider)
    }

    /// Convert a provider value; `None` if `P` is not this entry's provider type.
    pub fn convert_from_provider<P: Any, M: Any>(&self, provider: P) -> Option<M> {
        (self.from_provider)(Box::new(provider))
            .and_then(|boxed| boxed.downcast::<M>().ok())
            .map(|model| *model)
    }
}

impl fmt::Debug for ConverterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterEntry")
            .field("entity", &self.entity)
            .field("property", &self.property)
            .field("model_type", &self.model_type)
            .field("provider_type", &self.provider_type)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Converters keyed by entity, then property.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    entities: BTreeMap<&'static str, BTreeMap<&'static str, ConverterEntry>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind converter `C` to `entity.property`, replacing any previous one.
    pub fn register<C: ValueConverter>(
        &mut self,
        entity: &'static str,
        property: &'static str,
    ) -> &mut Self {
        tracing::debug!(
            entity,
            property,
            model = type_name::<C::Model>(),
            "registered value converter"
        );
        self.entities
            .entry(entity)
            .or_default()
            .insert(property, ConverterEntry::of::<C>(entity, property));
        self
    }

    /// Register every converter of entity `E`.
    pub fn configure<E: EntityConverters>(&mut self) -> &mut Self {
        E::register_converters(self);
        self
    }

    /// Converter bound to `entity.property`.
    pub fn get(&self, entity: &str, property: &str) -> Option<&ConverterEntry> {
        self.entities.get(entity)?.get(property)
    }

    /// All converters of one entity, ordered by property name.
    pub fn for_entity(&self, entity: &str) -> impl Iterator<Item = &ConverterEntry> {
        self.entities.get(entity).into_iter().flat_map(BTreeMap::values)
    }

    /// All converters, ordered by entity then property.
    pub fn iter(&self) -> impl Iterator<Item = &ConverterEntry> {
        self.entities.values().flat_map(BTreeMap::values)
    }

    /// Number of bound properties.
    pub fn len(&self) -> usize {
        self.entities.values().map(BTreeMap::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Age(i32);

    struct AgeConverter;

    impl ValueConverter for AgeConverter {
        type Model = Age;
        type Provider = i32;
        const NULLABLE: bool = false;

        fn to_provider(model: &Age) -> i32 {
            model.0
        }

        fn from_provider(provider: i32) -> Age {
            Age(provider)
        }
    }

    struct AgeNullableConverter;

    impl ValueConverter for AgeNullableConverter {
        type Model = Option<Age>;
        type Provider = Option<i32>;
        const NULLABLE: bool = true;

        fn to_provider(model: &Option<Age>) -> Option<i32> {
            model.map(|age| age.0)
        }

        fn from_provider(provider: Option<i32>) -> Option<Age> {
            provider.map(Age)
        }
    }

    struct Person;

    impl EntityConverters for Person {
        const ENTITY: &'static str = "Person";

        fn register_converters(registry: &mut ConverterRegistry) {
            registry
                .register::<AgeConverter>(Self::ENTITY, "age")
                .register::<AgeNullableConverter>(Self::ENTITY, "previous_age");
        }
    }

    #[test]
    fn configure_registers_every_property() {
        let mut registry = ConverterRegistry::new();
        registry.configure::<Person>();

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.for_entity("Person").map(ConverterEntry::property).collect();
        assert_eq!(names, vec!["age", "previous_age"]);
        assert!(registry.get("Person", "previous_age").unwrap().is_nullable());
        assert!(!registry.get("Person", "age").unwrap().is_nullable());
    }

    #[test]
    fn entry_converts_through_erased_functions() {
        let mut registry = ConverterRegistry::new();
        registry.register::<AgeConverter>("Person", "age");
        let entry = registry.get("Person", "age").unwrap();

        assert_eq!(entry.convert_to_provider::<Age, i32>(&Age(42)), Some(42));
        assert_eq!(entry.convert_from_provider::<i32, Age>(7), Some(Age(7)));
        assert_eq!(entry.convert_to_provider::<i64, i32>(&1), None);
    }

    struct BillingOrder;

    impl EntityConverters for BillingOrder {
        const ENTITY: &'static str = "crate::billing::Order";

        fn register_converters(registry: &mut ConverterRegistry) {
            registry.register::<AgeConverter>(Self::ENTITY, "age");
        }
    }

    struct ShippingOrder;

    impl EntityConverters for ShippingOrder {
        const ENTITY: &'static str = "crate::shipping::Order";

        fn register_converters(registry: &mut ConverterRegistry) {
            registry.register::<AgeNullableConverter>(Self::ENTITY, "age");
        }
    }

    #[test]
    fn same_named_entities_keep_their_own_converters() {
        let mut registry = ConverterRegistry::new();
        registry.configure::<BillingOrder>().configure::<ShippingOrder>();

        assert_eq!(registry.len(), 2);
        assert!(!registry.get("crate::billing::Order", "age").unwrap().is_nullable());
        assert!(registry.get("crate::shipping::Order", "age").unwrap().is_nullable());
        let entities: Vec<_> = registry.iter().map(ConverterEntry::entity).collect();
        assert_eq!(entities, vec!["crate::billing::Order", "crate::shipping::Order"]);
    }

    #[test]
    fn reregistering_a_property_replaces_it() {
        let mut registry = ConverterRegistry::new();
        registry
            .register::<AgeConverter>("Person", "age")
            .register::<AgeNullableConverter>("Person", "age");

        assert_eq!(registry.len(), 1);
        assert!(registry.get("Person", "age").unwrap().is_nullable());
        assert_eq!(registry.for_entity("Nobody").count(), 0);
    }

    #[test]
    fn get_unknown_property_is_none() {
        let registry = ConverterRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("Person", "age").is_none());
    }
}
