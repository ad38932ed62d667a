//! Store error types.

use thiserror::Error;

/// Collection operation errors.
///
/// Every failure is per-request and leaves the collection unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Required fields missing from a create request
    #[error("Missing required fields for {entity}: {}", .fields.join(", "))]
    MissingFields { entity: String, fields: Vec<String> },

    /// A known field was supplied with a non-string value
    #[error("Field '{field}' must be a string")]
    InvalidFieldValue { field: String },

    /// Referenced record id does not exist
    #[error("{entity} with id {id} not found")]
    NotFound { entity: String, id: u64 },
}
