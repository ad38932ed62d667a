//! End-to-end HTTP tests: a real server on an ephemeral port, driven
//! with raw HTTP/1.1 requests over a TCP socket.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use entity_api::router::Router;
use entity_api::server::Server;
use entity_api::worker::StoreWorker;
use entity_store::{Collection, EntitySchema, ServiceConfig};

async fn start_books_service() -> SocketAddr {
    let schema = EntitySchema::new("book", "books", ["title", "author"]);
    let collection = Collection::with_seed(schema.clone(), [["A", "X"], ["B", "Y"]]);
    let config = Arc::new(ServiceConfig::default());

    let (store_tx, worker) = StoreWorker::new(collection, config.queue_capacity);
    tokio::spawn(worker.run());

    let router = Router::new(schema, config, store_tx);
    let server = Server::bind("127.0.0.1:0".parse().unwrap(), router)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    addr
}

/// Sends one HTTP/1.1 request and returns (status, body text).
async fn request(addr: SocketAddr, method: &str, path: &str, body: Option<&str>) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();

    let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    match body {
        Some(body) => {
            raw.push_str(&format!(
                "Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            ));
        }
        None => raw.push_str("\r\n"),
    }
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    let text = String::from_utf8(response).unwrap();

    let status: u16 = text
        .split_whitespace()
        .nth(1)
        .expect("missing status line")
        .parse()
        .unwrap();
    let body = text
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("response body is not JSON")
}

#[tokio::test]
async fn crud_lifecycle_over_http() {
    let addr = start_books_service().await;

    // Seeded collection.
    let (status, body) = request(addr, "GET", "/books", None).await;
    assert_eq!(status, 200);
    assert_eq!(
        parse(&body),
        json!([
            {"id": 1, "title": "A", "author": "X"},
            {"id": 2, "title": "B", "author": "Y"},
        ])
    );

    // Create assigns id 3 and confirms.
    let (status, body) = request(
        addr,
        "POST",
        "/books",
        Some(r#"{"title": "C", "author": "Z"}"#),
    )
    .await;
    assert_eq!(status, 201);
    let created = parse(&body);
    assert_eq!(created["message"], json!("Book added successfully"));
    assert_eq!(created["record"], json!({"id": 3, "title": "C", "author": "Z"}));

    // Get it back.
    let (status, body) = request(addr, "GET", "/books/3", None).await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body), json!({"id": 3, "title": "C", "author": "Z"}));

    // Delete id 1, then a new create gets id 4, never 1.
    let (status, body) = request(addr, "DELETE", "/books/1", None).await;
    assert_eq!(status, 200);
    let deleted = parse(&body);
    assert_eq!(deleted["message"], json!("Book deleted successfully"));
    assert_eq!(deleted["id"], json!(1));

    let (status, body) = request(
        addr,
        "POST",
        "/books",
        Some(r#"{"title": "D", "author": "W"}"#),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(parse(&body)["record"]["id"], json!(4));

    // Survivors keep insertion order.
    let (status, body) = request(addr, "GET", "/books", None).await;
    assert_eq!(status, 200);
    let ids: Vec<u64> = parse(&body)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let addr = start_books_service().await;

    let (status, body) = request(addr, "PUT", "/books/2", Some(r#"{"author": "Y2"}"#)).await;
    assert_eq!(status, 200);
    let updated = parse(&body);
    assert_eq!(updated["message"], json!("Book updated successfully"));
    assert_eq!(updated["record"], json!({"id": 2, "title": "B", "author": "Y2"}));

    // The id in the body is ignored; the record keeps its own.
    let (status, body) = request(
        addr,
        "PUT",
        "/books/2",
        Some(r#"{"id": 99, "title": "B2"}"#),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(
        parse(&body)["record"],
        json!({"id": 2, "title": "B2", "author": "Y2"})
    );
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let addr = start_books_service().await;

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(r#"{"title": "x"}"#)),
        ("DELETE", None),
    ] {
        let (status, response) = request(addr, method, "/books/42", body).await;
        assert_eq!(status, 404, "{method} /books/42");
        assert_eq!(parse(&response)["error"], json!("book with id 42 not found"));
    }
}

#[tokio::test]
async fn create_validation_is_a_400_and_mutates_nothing() {
    let addr = start_books_service().await;

    let (status, body) = request(addr, "POST", "/books", Some("{}")).await;
    assert_eq!(status, 400);
    assert_eq!(
        parse(&body)["error"],
        json!("Missing required fields for book: title, author")
    );

    let (status, body) = request(addr, "POST", "/books", Some(r#"{"title": "C"}"#)).await;
    assert_eq!(status, 400);
    assert_eq!(
        parse(&body)["error"],
        json!("Missing required fields for book: author")
    );

    // Nothing was created; the next id is still 3.
    let (_, body) = request(addr, "GET", "/books", None).await;
    assert_eq!(parse(&body).as_array().unwrap().len(), 2);
    let (status, body) = request(
        addr,
        "POST",
        "/books",
        Some(r#"{"title": "C", "author": "Z"}"#),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(parse(&body)["record"]["id"], json!(3));
}

#[tokio::test]
async fn malformed_bodies_are_400() {
    let addr = start_books_service().await;

    let (status, body) = request(addr, "POST", "/books", Some("not json")).await;
    assert_eq!(status, 400);
    assert!(parse(&body)["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON"));

    let (status, _) = request(addr, "POST", "/books", Some("[1, 2]")).await;
    assert_eq!(status, 400);

    let (status, _) = request(addr, "PUT", "/books/1", Some("not json")).await;
    assert_eq!(status, 400);

    // Known field with a non-string value.
    let (status, body) = request(
        addr,
        "POST",
        "/books",
        Some(r#"{"title": 42, "author": "Z"}"#),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(parse(&body)["error"], json!("Field 'title' must be a string"));
}

#[tokio::test]
async fn unknown_fields_are_ignored() {
    let addr = start_books_service().await;

    let (status, body) = request(
        addr,
        "POST",
        "/books",
        Some(r#"{"title": "C", "author": "Z", "isbn": "123"}"#),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(
        parse(&body)["record"],
        json!({"id": 3, "title": "C", "author": "Z"})
    );
}

#[tokio::test]
async fn unsupported_verbs_are_405() {
    let addr = start_books_service().await;

    let (status, _) = request(addr, "DELETE", "/books", None).await;
    assert_eq!(status, 405);
    let (status, _) = request(addr, "PUT", "/books", Some("{}")).await;
    assert_eq!(status, 405);
    let (status, body) = request(addr, "PATCH", "/books/1", Some("{}")).await;
    assert_eq!(status, 405);
    assert_eq!(parse(&body)["error"], json!("Method not allowed"));
    let (status, _) = request(addr, "POST", "/books/1", Some("{}")).await;
    assert_eq!(status, 405);
}

#[tokio::test]
async fn unknown_paths_and_bad_ids() {
    let addr = start_books_service().await;

    let (status, body) = request(addr, "GET", "/authors", None).await;
    assert_eq!(status, 404);
    assert_eq!(parse(&body)["error"], json!("No route found for /authors"));

    let (status, body) = request(addr, "GET", "/books/abc", None).await;
    assert_eq!(status, 400);
    assert!(parse(&body)["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid id 'abc'"));
}
