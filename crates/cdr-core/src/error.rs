//! Error types for the core crate

use thiserror::Error;

/// Core errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid call UUID: {0:?}")]
    InvalidUuid(String),
}
