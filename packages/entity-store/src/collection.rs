//! Insertion-ordered record collection with id-indexed lookup.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::StoreError;
use crate::record::Record;
use crate::schema::EntitySchema;

/// In-memory collection of records for one entity type.
///
/// Records are kept in insertion order in a `Vec`; a separate
/// `id -> position` map gives O(1) lookup. The id counter is
/// monotonic for the lifetime of the collection: deleted ids are
/// never reassigned.
///
/// The collection is not internally synchronized. Callers serving
/// concurrent requests must route all access through a single owner
/// (see the store worker in `entity-api`).
#[derive(Debug)]
pub struct Collection {
    schema: Arc<EntitySchema>,
    records: Vec<Record>,
    index: HashMap<u64, usize>,
    next_id: u64,
}

impl Collection {
    /// Creates an empty collection.
    pub fn new(schema: Arc<EntitySchema>) -> Self {
        Self {
            schema,
            records: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Creates a collection pre-populated with seed rows.
    ///
    /// Rows are inserted in order with ids starting at 1; the id
    /// counter continues above the last seeded id.
    ///
    /// # Panics
    /// Panics if a row's value count does not match the schema.
    /// Seed data is fixed at compile time, so a mismatch is a
    /// programming error.
    pub fn with_seed<R, V>(schema: Arc<EntitySchema>, rows: R) -> Self
    where
        R: IntoIterator<Item = V>,
        V: IntoIterator<Item = &'static str>,
    {
        let mut collection = Self::new(schema);
        for row in rows {
            let values: Vec<String> = row.into_iter().map(String::from).collect();
            assert_eq!(
                values.len(),
                collection.schema.field_count(),
                "seed row does not match schema '{}'",
                collection.schema.entity()
            );
            collection.insert(values);
        }
        collection
    }

    /// The schema this collection stores records for.
    pub fn schema(&self) -> &Arc<EntitySchema> {
        &self.schema
    }

    /// Number of records currently present.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are present.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the next successful create will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Creates a record from a parsed field map.
    ///
    /// Every schema field must be present and string-valued;
    /// otherwise the collection is left untouched and the error names
    /// all missing fields. Unknown keys in `fields` are ignored.
    pub fn create(&mut self, fields: &Map<String, Value>) -> Result<Record, StoreError> {
        let mut values = Vec::with_capacity(self.schema.field_count());
        let mut missing = Vec::new();
        for name in self.schema.fields() {
            match fields.get(name) {
                Some(Value::String(v)) => values.push(v.clone()),
                Some(_) => {
                    return Err(StoreError::InvalidFieldValue {
                        field: name.clone(),
                    })
                }
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(StoreError::MissingFields {
                entity: self.schema.entity().to_string(),
                fields: missing,
            });
        }

        let record = self.insert(values);
        debug!(id = record.id, entity = self.schema.entity(), "record created");
        Ok(record)
    }

    /// Looks up a record by id.
    pub fn get(&self, id: u64) -> Result<&Record, StoreError> {
        self.index
            .get(&id)
            .map(|&pos| &self.records[pos])
            .ok_or_else(|| self.not_found(id))
    }

    /// Partially updates a record.
    ///
    /// Only schema fields present in `fields` are overwritten; absent
    /// fields keep their prior values and `id` is immutable. A known
    /// field supplied with a non-string value fails the whole request
    /// before any mutation. Unknown keys are ignored.
    pub fn update(&mut self, id: u64, fields: &Map<String, Value>) -> Result<Record, StoreError> {
        let pos = *self.index.get(&id).ok_or_else(|| self.not_found(id))?;

        // Validate before touching the record so a rejected request
        // never applies partially.
        let mut changes = Vec::new();
        for (key, value) in fields {
            let Some(field_pos) = self.schema.field_index(key) else {
                continue;
            };
            match value {
                Value::String(v) => changes.push((field_pos, v.clone())),
                _ => {
                    return Err(StoreError::InvalidFieldValue {
                        field: key.clone(),
                    })
                }
            }
        }

        let record = &mut self.records[pos];
        for (field_pos, value) in changes {
            record.values[field_pos] = value;
        }
        debug!(id, entity = self.schema.entity(), "record updated");
        Ok(record.clone())
    }

    /// Deletes a record, preserving the relative order of survivors.
    ///
    /// The deleted id is never reassigned. Returns the deleted id.
    pub fn delete(&mut self, id: u64) -> Result<u64, StoreError> {
        let pos = self.index.remove(&id).ok_or_else(|| self.not_found(id))?;
        self.records.remove(pos);
        // Records after the removed one shifted left by one.
        for index_pos in self.index.values_mut() {
            if *index_pos > pos {
                *index_pos -= 1;
            }
        }
        debug!(id, entity = self.schema.entity(), "record deleted");
        Ok(id)
    }

    fn insert(&mut self, values: Vec<String>) -> Record {
        let record = Record {
            id: self.next_id,
            values,
        };
        self.next_id += 1;
        self.index.insert(record.id, self.records.len());
        self.records.push(record.clone());
        record
    }

    fn not_found(&self, id: u64) -> StoreError {
        StoreError::NotFound {
            entity: self.schema.entity().to_string(),
            id,
        }
    }
}
