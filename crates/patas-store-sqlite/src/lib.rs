//! SQLite backend for the patas document store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Documents are stored schemaless:
//! one table, one JSON column, exactly like the hosted store this system was
//! built against.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
