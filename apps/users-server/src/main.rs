//! User directory service.
//!
//! Serves an in-memory collection of users (name, email) over the
//! HTTP CRUD surface: `GET/POST /users`, `GET/PUT/DELETE /users/{id}`.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use entity_api::{router::Router, server::Server, worker::StoreWorker};
use entity_store::{Collection, EntitySchema, ServiceConfig};

/// Command-line arguments for the user service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 9080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Store reply timeout in milliseconds
    #[arg(long, default_value_t = 10000)]
    response_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt::init();

    let config = Arc::new(ServiceConfig {
        host: args.host,
        port: args.port,
        request_timeout_ms: args.request_timeout_ms,
        response_timeout_ms: args.response_timeout_ms,
        ..ServiceConfig::default()
    });

    let schema = EntitySchema::new("user", "users", ["name", "email"]);
    let collection = Collection::with_seed(
        schema.clone(),
        [
            ["John Doe", "john.doe@example.com"],
            ["Jane Doe", "jane.doe@example.com"],
        ],
    );

    let (store_tx, worker) = StoreWorker::new(collection, config.queue_capacity);
    tokio::spawn(worker.run());

    let router = Router::new(schema, config.clone(), store_tx);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let server = Server::bind(addr, router).await?;

    info!("Starting user service on http://{addr}");
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            error!("Server error: {e}");
        }
    });

    signal::ctrl_c().await?;
    info!("Shutting down user service");
    server_handle.abort();

    Ok(())
}
