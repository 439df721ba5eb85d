//! Output formatting for the different formats

pub mod colors;
pub mod human;
pub mod json;
pub mod minimal;
