use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single FHIR resource as returned by the upstream API.
///
/// The upstream server owns the schema, so payloads pass through
/// unmodified: the envelope is a thin wrapper over the raw JSON with
/// accessors for the two fields every resource carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Value);

impl Resource {
    /// Wraps a raw JSON value as a resource.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The `resourceType` discriminator, when present.
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        self.0.get("resourceType").and_then(Value::as_str)
    }

    /// The logical `id`, when present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Borrows the underlying JSON.
    #[must_use]
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the envelope, returning the underlying JSON.
    #[must_use]
    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for Resource {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
