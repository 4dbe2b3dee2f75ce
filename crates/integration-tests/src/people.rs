use valuegen::Value;
use valuegen::uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Value)]
pub struct Age(i32);

#[derive(Debug, Clone, PartialEq, Eq, Value)]
pub struct Name(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Value)]
pub struct UserId(Uuid);

/// Email verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Value)]
pub struct Verified(bool);

/// A row with wrapper-typed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: UserId,
    pub name: Name,
    pub age: Option<Age>,
    pub verified: Verified,
    pub notes: String,
}
