//! HTTP CRUD API for in-memory entity collections.
//!
//! Wires an `entity_store::Collection` behind a single-owner worker
//! task and exposes it over HTTP: list/create on `/{entities}`,
//! get/update/delete on `/{entities}/{id}`.

pub mod handlers;
pub mod router;
pub mod server;
pub mod worker;
