//! Request plumbing shared by the endpoint handlers.

use http_body_util::BodyExt;
use hyper::{body::Bytes, Request, Response};
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tokio::time;

use crate::router::RouterError;
use entity_store::StoreError;

/// Reads the full request body, bounded by the configured timeout.
pub async fn read_request_body(
    req: Request<hyper::body::Incoming>,
    timeout_ms: u64,
) -> Result<Bytes, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let body = time::timeout(timeout_duration, req.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::BadRequest(format!("Failed to read request body: {e}")))?;
    Ok(body.to_bytes())
}

/// Parses a request body as a JSON object (the generic field map the
/// store consumes). Anything else is a 400.
pub fn parse_field_map(body: &Bytes) -> Result<Map<String, Value>, RouterError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| RouterError::BadRequest(format!("Invalid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RouterError::BadRequest(format!(
            "Invalid JSON: expected an object, got {other}"
        ))),
    }
}

/// Awaits the store worker's reply, bounded by the configured timeout.
pub async fn wait_for_reply(
    rx: oneshot::Receiver<Result<Value, StoreError>>,
    timeout_ms: u64,
) -> Result<Result<Value, StoreError>, RouterError> {
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    time::timeout(timeout_duration, rx)
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::Internal(format!("Reply channel closed: {e}")))
}

/// Maps a store failure to its HTTP classification.
pub fn map_store_error(err: StoreError) -> RouterError {
    match err {
        StoreError::NotFound { .. } => RouterError::NotFound(err.to_string()),
        StoreError::MissingFields { .. } | StoreError::InvalidFieldValue { .. } => {
            RouterError::BadRequest(err.to_string())
        }
    }
}

/// Builds a JSON response with the given status.
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::Internal(format!("Failed to build response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_map_accepts_objects_only() {
        let map = parse_field_map(&Bytes::from_static(br#"{"title": "A"}"#)).unwrap();
        assert_eq!(map.get("title"), Some(&Value::String("A".to_string())));

        assert!(matches!(
            parse_field_map(&Bytes::from_static(b"[1, 2]")),
            Err(RouterError::BadRequest(_))
        ));
        assert!(matches!(
            parse_field_map(&Bytes::from_static(b"not json")),
            Err(RouterError::BadRequest(_))
        ));
    }

    #[test]
    fn store_errors_map_to_their_status() {
        let not_found = map_store_error(StoreError::NotFound {
            entity: "book".to_string(),
            id: 9,
        });
        assert!(matches!(not_found, RouterError::NotFound(_)));

        let missing = map_store_error(StoreError::MissingFields {
            entity: "book".to_string(),
            fields: vec!["title".to_string()],
        });
        assert!(matches!(missing, RouterError::BadRequest(_)));
    }
}
