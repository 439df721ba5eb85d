//! cdr-db - SQLite CDR row source
//!
//! This crate provides read-only access to the call detail record table.
//! Rows are returned in storage order; correlation and presentation ordering
//! happen in `cdr-core`.

pub mod connection;
pub mod queries;
pub mod schema;

pub use connection::*;
pub use queries::*;
