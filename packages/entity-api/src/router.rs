//! Matchit routing and method dispatch.

use std::sync::Arc;

use hyper::{body::Bytes, Request, Response};
use matchit::Router as MatchitRouter;
use tokio::sync::mpsc;
use tracing::error;

use crate::handlers;
use crate::worker::StoreRequest;
use entity_store::{EntitySchema, ServiceConfig};

/// Shared per-request state.
#[derive(Clone)]
pub struct AppState {
    /// Schema of the entity this service exposes
    pub schema: Arc<EntitySchema>,
    /// Service configuration
    pub config: Arc<ServiceConfig>,
    /// Request sender to the store worker
    pub store_tx: mpsc::Sender<StoreRequest>,
}

/// HTTP request router for one entity service.
///
/// Two routes are derived from the schema: `/{entities}` for
/// list/create and `/{entities}/{id}` for get/update/delete.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a router over the entity's collection and item paths.
    pub fn new(
        schema: Arc<EntitySchema>,
        config: Arc<ServiceConfig>,
        store_tx: mpsc::Sender<StoreRequest>,
    ) -> Self {
        let collection_path = format!("/{}", schema.collection());
        let item_path = format!("{collection_path}/{{id}}");

        let mut router = MatchitRouter::new();
        router
            .insert(&collection_path, RouteHandler::Collection)
            .expect("Failed to insert collection route");
        router
            .insert(&item_path, RouteHandler::Item)
            .expect("Failed to insert item route");

        Self {
            inner: router,
            state: AppState {
                schema,
                config,
                store_tx,
            },
        }
    }

    /// Routes an incoming request and renders any handler failure as
    /// its JSON error response.
    pub async fn route(&self, req: Request<hyper::body::Incoming>) -> Response<Bytes> {
        let path = req.uri().path().to_string();

        let result = match self.inner.at(&path) {
            Ok(matched) => {
                let id = matched.params.get("id").map(str::to_string);
                matched.value.handle(req, id, self.state.clone()).await
            }
            Err(_) => Err(RouterError::NotFound(format!("No route found for {path}"))),
        };

        match result {
            Ok(response) => response,
            Err(err) => {
                if let RouterError::Internal(msg) = &err {
                    error!(path, "internal error handling request: {msg}");
                }
                err.into()
            }
        }
    }
}

/// Which route shape a request matched.
enum RouteHandler {
    /// `/{entities}` — list and create
    Collection,
    /// `/{entities}/{id}` — get, update, delete
    Item,
}

impl RouteHandler {
    async fn handle(
        &self,
        req: Request<hyper::body::Incoming>,
        id: Option<String>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError> {
        match self {
            RouteHandler::Collection => {
                if req.method() == hyper::Method::GET {
                    handlers::list_records(state).await
                } else if req.method() == hyper::Method::POST {
                    handlers::create_record(req, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
            RouteHandler::Item => {
                let raw_id = id.unwrap_or_default();
                let record_id: u64 = raw_id
                    .parse()
                    .map_err(|e| RouterError::BadRequest(format!("Invalid id '{raw_id}': {e}")))?;

                if req.method() == hyper::Method::GET {
                    handlers::get_record(record_id, state).await
                } else if req.method() == hyper::Method::PUT {
                    handlers::update_record(req, record_id, state).await
                } else if req.method() == hyper::Method::DELETE {
                    handlers::delete_record(record_id, state).await
                } else {
                    Err(RouterError::MethodNotAllowed)
                }
            }
        }
    }
}

/// Handler-level failure, rendered as a JSON error body.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    BadRequest(String),
    NotFound(String),
    Timeout,
    Internal(String),
}

impl RouterError {
    fn status(&self) -> u16 {
        match self {
            RouterError::MethodNotAllowed => 405,
            RouterError::BadRequest(_) => 400,
            RouterError::NotFound(_) => 404,
            RouterError::Timeout => 408,
            RouterError::Internal(_) => 500,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method not allowed"),
            RouterError::BadRequest(msg) => write!(f, "{msg}"),
            RouterError::NotFound(msg) => write!(f, "{msg}"),
            RouterError::Timeout => write!(f, "Request timeout"),
            RouterError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        // An internal error is not the caller's business in detail.
        let message = match &err {
            RouterError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let body = serde_json::to_vec(&handlers::ErrorBody { error: message })
            .unwrap_or_else(|_| br#"{"error":"Internal server error"}"#.to_vec());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                Response::builder()
                    .status(500)
                    .body(Bytes::from_static(b"Internal Server Error"))
                    .expect("Failed to build fallback error response")
            })
    }
}
