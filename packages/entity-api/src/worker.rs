//! Single-owner store worker.
//!
//! The collection is not internally synchronized, so all access is
//! serialized through one task that owns it. Handlers send a
//! [`StoreRequest`] over an mpsc channel and await the reply on a
//! oneshot; the worker drains the queue one request at a time, which
//! restores the store's invariants under concurrent HTTP traffic.

use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use entity_store::{Collection, StoreError};

/// Reply channel for one store request.
pub type ResponseSender = oneshot::Sender<Result<Value, StoreError>>;

/// A request for the store worker.
#[derive(Debug)]
pub enum StoreRequest {
    /// List all records
    List { response: ResponseSender },
    /// Create a record from a parsed field map
    Create {
        fields: Map<String, Value>,
        response: ResponseSender,
    },
    /// Read a record by id
    Get { id: u64, response: ResponseSender },
    /// Partially update a record
    Update {
        id: u64,
        fields: Map<String, Value>,
        response: ResponseSender,
    },
    /// Delete a record by id
    Delete { id: u64, response: ResponseSender },
}

/// Owner task for one collection.
pub struct StoreWorker {
    collection: Collection,
    requests: mpsc::Receiver<StoreRequest>,
}

impl StoreWorker {
    /// Creates a worker owning `collection` and the sender half of its
    /// request queue.
    pub fn new(collection: Collection, queue_capacity: usize) -> (mpsc::Sender<StoreRequest>, Self) {
        let (tx, rx) = mpsc::channel(queue_capacity);
        (
            tx,
            Self {
                collection,
                requests: rx,
            },
        )
    }

    /// Serves requests until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.handle(request);
        }
        info!(
            entity = self.collection.schema().entity(),
            "store worker stopped"
        );
    }

    fn handle(&mut self, request: StoreRequest) {
        let schema = self.collection.schema().clone();
        let (result, response) = match request {
            StoreRequest::List { response } => {
                let records: Vec<Value> = self
                    .collection
                    .list()
                    .iter()
                    .map(|r| r.to_json(&schema))
                    .collect();
                (Ok(Value::Array(records)), response)
            }
            StoreRequest::Create { fields, response } => (
                self.collection
                    .create(&fields)
                    .map(|r| r.to_json(&schema)),
                response,
            ),
            StoreRequest::Get { id, response } => (
                self.collection.get(id).map(|r| r.to_json(&schema)),
                response,
            ),
            StoreRequest::Update {
                id,
                fields,
                response,
            } => (
                self.collection
                    .update(id, &fields)
                    .map(|r| r.to_json(&schema)),
                response,
            ),
            StoreRequest::Delete { id, response } => (
                self.collection.delete(id).map(Value::from),
                response,
            ),
        };
        // A dropped receiver means the HTTP side gave up (timeout or
        // closed connection); nothing left to do with the result.
        let _ = response.send(result);
    }
}
