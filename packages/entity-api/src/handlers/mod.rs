//! HTTP endpoint implementations for the CRUD surface.

mod crud;
mod response;
mod util;

pub use crud::{create_record, delete_record, get_record, list_records, update_record};
pub use response::ErrorBody;
