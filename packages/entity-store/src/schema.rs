//! Entity schema describing one record shape.

use std::sync::Arc;

/// Describes the shape of one entity type: its noun, the URL path
/// segment for the collection, and the ordered list of required
/// string fields.
///
/// Field order is fixed at construction and determines the positional
/// layout of [`crate::Record`] values.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    /// Singular noun used in messages, e.g. "book"
    entity: String,
    /// Plural path segment, e.g. "books" (routes as `/books`)
    collection: String,
    /// Required string field names in declaration order
    fields: Vec<String>,
}

impl EntitySchema {
    /// Creates a schema for an entity type.
    ///
    /// # Arguments
    /// * `entity` - Singular noun, e.g. "book"
    /// * `collection` - Plural URL segment, e.g. "books"
    /// * `fields` - Required string field names, in order
    pub fn new(
        entity: impl Into<String>,
        collection: impl Into<String>,
        fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            entity: entity.into(),
            collection: collection.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        })
    }

    /// Singular entity noun.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Plural collection segment.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Required field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields besides `id`.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Position of a field name within the schema, if it is known.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }
}
