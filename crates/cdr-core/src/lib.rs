//! cdr-core - Core types and business logic for call detail records
//!
//! This crate provides the row types read from the CDR store, the call UUID
//! validity rules shared with the recording index, and the leg correlation
//! engine that folds transferred call legs into one logical call.

pub mod call_uuid;
pub mod correlate;
pub mod error;
pub mod stats;
pub mod types;

pub use call_uuid::*;
pub use correlate::*;
pub use error::*;
pub use stats::*;
pub use types::*;
