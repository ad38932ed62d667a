//! Record type and JSON shaping.

use serde_json::{Map, Value};

use crate::schema::EntitySchema;

/// A single stored entity instance.
///
/// `values` are positionally aligned with the owning schema's field
/// list. The `id` is assigned by the collection and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unique, immutable record id
    pub id: u64,
    /// Field values in schema order
    pub values: Vec<String>,
}

impl Record {
    /// Serializes the record as a flat JSON object:
    /// `{"id": <int>, "<field>": "<string>", ...}`.
    pub fn to_json(&self, schema: &EntitySchema) -> Value {
        let mut obj = Map::with_capacity(1 + self.values.len());
        obj.insert("id".to_string(), Value::from(self.id));
        for (name, value) in schema.fields().iter().zip(&self.values) {
            obj.insert(name.clone(), Value::String(value.clone()));
        }
        Value::Object(obj)
    }
}
