//! In-memory entity collection with CRUD operations.
//!
//! One [`Collection`] holds the records of a single entity type
//! (books, users, ...) described by an [`EntitySchema`]. Records live
//! only in process memory; there is no persistence.

pub mod collection;
pub mod config;
pub mod error;
pub mod record;
pub mod schema;

pub use collection::Collection;
pub use config::ServiceConfig;
pub use error::StoreError;
pub use record::Record;
pub use schema::EntitySchema;
