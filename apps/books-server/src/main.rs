//! Book catalog service.
//!
//! Serves an in-memory collection of books (title, author) over the
//! HTTP CRUD surface: `GET/POST /books`, `GET/PUT/DELETE /books/{id}`.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use entity_api::{router::Router, server::Server, worker::StoreWorker};
use entity_store::{Collection, EntitySchema, ServiceConfig};

/// Command-line arguments for the book service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
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

    let schema = EntitySchema::new("book", "books", ["title", "author"]);
    let collection = Collection::with_seed(
        schema.clone(),
        [
            ["The Hitchhiker's Guide to the Galaxy", "Douglas Adams"],
            ["Pride and Prejudice", "Jane Austen"],
        ],
    );

    let (store_tx, worker) = StoreWorker::new(collection, config.queue_capacity);
    tokio::spawn(worker.run());

    let router = Router::new(schema, config.clone(), store_tx);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let server = Server::bind(addr, router).await?;

    info!("Starting book service on http://{addr}");
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            error!("Server error: {e}");
        }
    });

    signal::ctrl_c().await?;
    info!("Shutting down book service");
    server_handle.abort();

    Ok(())
}
