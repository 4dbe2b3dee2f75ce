use valuegen::Value;
use valuegen::bson::oid::ObjectId;
use valuegen::rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Value)]
pub struct Price {
    value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Value)]
pub struct Width(f64);

#[derive(Debug, Clone, Copy, PartialEq, Value)]
pub struct Height(f64);

/// Units on hand; unknown until counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Value)]
pub struct Quantity(Option<i32>);

/// Hand-written `Value` impls are discovered like derived ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(ObjectId);

impl Value for EntityId {
    type Payload = ObjectId;

    fn payload(&self) -> &ObjectId {
        &self.0
    }

    fn into_payload(self) -> ObjectId {
        self.0
    }

    fn from_payload(payload: ObjectId) -> Self {
        Self(payload)
    }
}

/// A catalog entry stored as a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: EntityId,
    pub price: Price,
    pub width: Width,
    pub height: Height,
    pub stock: Option<Quantity>,
}
