//! CLI command implementations

pub mod audio;
pub mod doctor;
pub mod export;
pub mod search;
pub mod show;
pub mod stats;
pub mod watch;
