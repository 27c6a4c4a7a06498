//! Generic document shapes returned by the store gateway.
//!
//! Identity is assigned by the store on creation and never changes.
//! Timestamp fields are always ISO-8601 strings by the time a document
//! reaches these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored document: id plus its plain JSON fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self { id: id.into(), data }
    }

    /// Convenience accessor for a string field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// Result of a collection query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub items: Vec<Document>,
    pub count: usize,
}

impl CollectionPage {
    pub fn new(items: Vec<Document>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}
