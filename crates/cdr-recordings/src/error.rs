//! Recording index errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("Recording index disabled: {0} is not a directory")]
    Disabled(PathBuf),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
