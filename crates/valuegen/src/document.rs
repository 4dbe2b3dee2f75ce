//! Document-store adapter: BSON serializers and their registry.
//!
//! Generated code implements serde `Serialize` / `Deserialize` for each
//! wrapper (reading and writing the single payload) together with
//! [`DocumentSerializer`], and one `register_document_serializers` function
//! enumerating every wrapper for one-call startup registration.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use bson::Bson;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::DocumentError;

/// Reads and writes a wrapper as its payload's BSON value.
pub trait DocumentSerializer: Sized + 'static {
    /// Wrapper as BSON.
    fn to_bson(&self) -> Result<Bson, DocumentError>;

    /// Wrapper from BSON.
    fn from_bson(value: Bson) -> Result<Self, DocumentError>;
}

/// Serialize a payload on behalf of wrapper `type_name`.
pub fn payload_to_bson<P: Serialize + ?Sized>(
    type_name: &'static str,
    payload: &P,
) -> Result<Bson, DocumentError> {
    bson::to_bson(payload).map_err(|source| DocumentError::Serialize { type_name, source })
}

/// Deserialize a payload on behalf of wrapper `type_name`.
pub fn payload_from_bson<P: DeserializeOwned>(
    type_name: &'static str,
    value: Bson,
) -> Result<P, DocumentError> {
    bson::from_bson(value).map_err(|source| DocumentError::Deserialize { type_name, source })
}

type Encode = fn(&dyn Any) -> Option<Result<Bson, DocumentError>>;
type Decode = fn(Bson) -> Result<Box<dyn Any>, DocumentError>;

fn erased_encode<T: DocumentSerializer>(value: &dyn Any) -> Option<Result<Bson, DocumentError>> {
    value.downcast_ref::<T>().map(T::to_bson)
}

fn erased_decode<T: DocumentSerializer>(value: Bson) -> Result<Box<dyn Any>, DocumentError> {
    T::from_bson(value).map(|decoded| Box::new(decoded) as Box<dyn Any>)
}

#[derive(Clone, Copy)]
struct Registration {
    type_name: &'static str,
    encode: Encode,
    decode: Decode,
}

/// Serializers known to the application, keyed by wrapper type.
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    by_type: HashMap<TypeId, Registration>,
    order: Vec<TypeId>,
}

impl SerializerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T`. Returns `false` if it was already registered.
    pub fn register<T: DocumentSerializer>(&mut self) -> bool {
        let id = TypeId::of::<T>();
        if self.by_type.contains_key(&id) {
            return false;
        }
        tracing::debug!(type_name = type_name::<T>(), "registered document serializer");
        self.by_type.insert(
            id,
            Registration {
                type_name: type_name::<T>(),
                encode: erased_encode::<T>,
                decode: erased_decode::<T>,
            },
        );
        self.order.push(id);
        true
    }

    /// Whether `T` is registered.
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    /// Encode `value` with its registered serializer.
    pub fn encode<T: 'static>(&self, value: &T) -> Result<Bson, DocumentError> {
        let registration = self.lookup::<T>()?;
        (registration.encode)(value).unwrap_or(Err(DocumentError::NotRegistered {
            type_name: type_name::<T>(),
        }))
    }

    /// Decode a `T` with its registered serializer.
    pub fn decode<T: 'static>(&self, value: Bson) -> Result<T, DocumentError> {
        let registration = self.lookup::<T>()?;
        let decoded = (registration.decode)(value)?;
        decoded
            .downcast::<T>()
            .map(|decoded| *decoded)
            .map_err(|_| DocumentError::NotRegistered {
                type_name: type_name::<T>(),
            })
    }

    /// Registered type names in registration order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.by_type.get(id))
            .map(|registration| registration.type_name)
    }

    /// Number of registered serializers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn lookup<T: 'static>(&self) -> Result<&Registration, DocumentError> {
        self.by_type
            .get(&TypeId::of::<T>())
            .ok_or(DocumentError::NotRegistered {
                type_name: type_name::<T>(),
            })
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.type_names()).finish()
    }
}
