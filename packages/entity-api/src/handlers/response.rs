//! Response body types for HTTP endpoints.

use serde::Serialize;
use serde_json::Value;

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Message naming the problem
    pub error: String,
}

/// Confirmation body for create and update:
/// `{"message": "...", "record": {...}}`.
#[derive(Debug, Serialize)]
pub struct MutationReply {
    /// Human-readable confirmation
    pub message: String,
    /// The record after the mutation
    pub record: Value,
}

/// Confirmation body for delete: `{"message": "...", "id": <int>}`.
#[derive(Debug, Serialize)]
pub struct DeleteReply {
    /// Human-readable confirmation
    pub message: String,
    /// Id of the deleted record
    pub id: u64,
}

/// Capitalizes the entity noun for confirmation messages
/// ("book" -> "Book added successfully").
pub fn confirmation(entity: &str, verb: &str) -> String {
    let mut chars = entity.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("{capitalized} {verb} successfully")
}
