//! Error types surfaced by generated code.

/// Returned by the generated `FromStr` implementations when text cannot be
/// parsed into a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse `{input}` as {type_name}")]
pub struct ParseValueError {
    type_name: &'static str,
    input: String,
}

impl ParseValueError {
    /// Create an error for `input` that failed to parse as `type_name`.
    pub fn new(type_name: &'static str, input: impl Into<String>) -> Self {
        Self {
            type_name,
            input: input.into(),
        }
    }

    /// Name of the target type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The rejected input.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Failure converting a wrapper to or from its BSON representation.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The payload could not be written as BSON.
    #[error("cannot serialize {type_name} to BSON: {source}")]
    Serialize {
        /// Wrapper type name.
        type_name: &'static str,
        /// Underlying serializer error.
        source: bson::ser::Error,
    },

    /// The BSON value does not hold a valid payload.
    #[error("cannot deserialize {type_name} from BSON: {source}")]
    Deserialize {
        /// Wrapper type name.
        type_name: &'static str,
        /// Underlying deserializer error.
        source: bson::de::Error,
    },

    /// No serializer is registered for the requested type.
    #[error("no document serializer registered for {type_name}")]
    NotRegistered {
        /// Requested type name.
        type_name: &'static str,
    },
}
