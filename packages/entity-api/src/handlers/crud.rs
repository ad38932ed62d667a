//! CRUD endpoint handlers.
//!
//! Each handler turns the parsed HTTP request into a
//! [`StoreRequest`], sends it to the store worker, and renders the
//! reply. The handlers never touch the collection directly.

use hyper::{body::Bytes, Request, Response};
use tokio::sync::oneshot;

use crate::router::{AppState, RouterError};
use crate::worker::StoreRequest;

use super::response::{confirmation, DeleteReply, MutationReply};
use super::util::{
    build_response, map_store_error, parse_field_map, read_request_body, wait_for_reply,
};

/// `GET /{entities}` — the full collection as a JSON array.
pub async fn list_records(state: AppState) -> Result<Response<Bytes>, RouterError> {
    let (tx, rx) = oneshot::channel();
    send_to_store(&state, StoreRequest::List { response: tx }).await?;

    let records = wait_for_reply(rx, state.config.response_timeout_ms)
        .await?
        .map_err(map_store_error)?;

    let json = serde_json::to_vec(&records)
        .map_err(|e| RouterError::Internal(format!("Failed to serialize response: {e}")))?;
    build_response(200, json)
}

/// `POST /{entities}` — create a record.
///
/// Body must be a JSON object carrying every required field as a
/// string; unknown keys are ignored. Replies 201 with
/// `{"message": ..., "record": ...}`.
pub async fn create_record(
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let body = read_request_body(req, state.config.request_timeout_ms).await?;
    let fields = parse_field_map(&body)?;

    let (tx, rx) = oneshot::channel();
    send_to_store(
        &state,
        StoreRequest::Create {
            fields,
            response: tx,
        },
    )
    .await?;

    let record = wait_for_reply(rx, state.config.response_timeout_ms)
        .await?
        .map_err(map_store_error)?;

    let reply = MutationReply {
        message: confirmation(state.schema.entity(), "added"),
        record,
    };
    let json = serde_json::to_vec(&reply)
        .map_err(|e| RouterError::Internal(format!("Failed to serialize response: {e}")))?;
    build_response(201, json)
}

/// `GET /{entities}/{id}` — a single record, or 404.
pub async fn get_record(id: u64, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let (tx, rx) = oneshot::channel();
    send_to_store(&state, StoreRequest::Get { id, response: tx }).await?;

    let record = wait_for_reply(rx, state.config.response_timeout_ms)
        .await?
        .map_err(map_store_error)?;

    let json = serde_json::to_vec(&record)
        .map_err(|e| RouterError::Internal(format!("Failed to serialize response: {e}")))?;
    build_response(200, json)
}

/// `PUT /{entities}/{id}` — partial update.
///
/// Only fields present in the body change; `id` is immutable.
/// Replies 200 with `{"message": ..., "record": ...}`.
pub async fn update_record(
    req: Request<hyper::body::Incoming>,
    id: u64,
    state: AppState,
) -> Result<Response<Bytes>, RouterError> {
    let body = read_request_body(req, state.config.request_timeout_ms).await?;
    let fields = parse_field_map(&body)?;

    let (tx, rx) = oneshot::channel();
    send_to_store(
        &state,
        StoreRequest::Update {
            id,
            fields,
            response: tx,
        },
    )
    .await?;

    let record = wait_for_reply(rx, state.config.response_timeout_ms)
        .await?
        .map_err(map_store_error)?;

    let reply = MutationReply {
        message: confirmation(state.schema.entity(), "updated"),
        record,
    };
    let json = serde_json::to_vec(&reply)
        .map_err(|e| RouterError::Internal(format!("Failed to serialize response: {e}")))?;
    build_response(200, json)
}

/// `DELETE /{entities}/{id}` — remove a record.
///
/// Replies 200 with `{"message": ..., "id": ...}`; the id is never
/// reassigned.
pub async fn delete_record(id: u64, state: AppState) -> Result<Response<Bytes>, RouterError> {
    let (tx, rx) = oneshot::channel();
    send_to_store(&state, StoreRequest::Delete { id, response: tx }).await?;

    wait_for_reply(rx, state.config.response_timeout_ms)
        .await?
        .map_err(map_store_error)?;

    let reply = DeleteReply {
        message: confirmation(state.schema.entity(), "deleted"),
        id,
    };
    let json = serde_json::to_vec(&reply)
        .map_err(|e| RouterError::Internal(format!("Failed to serialize response: {e}")))?;
    build_response(200, json)
}

async fn send_to_store(state: &AppState, request: StoreRequest) -> Result<(), RouterError> {
    state
        .store_tx
        .send(request)
        .await
        .map_err(|e| RouterError::Internal(format!("Store queue closed: {e}")))
}
