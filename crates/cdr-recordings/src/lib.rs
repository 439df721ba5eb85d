//! cdr-recordings - Live index of call recordings on disk
//!
//! Maps call UUIDs to recording files (`<anything>_<uuid>.wav`) in a single
//! directory. The index is built once at startup, kept current by a file
//! watcher, and rescanned on a lookup miss when the directory has changed.

pub mod error;
pub mod index;
pub mod scan;
pub mod watcher;

pub use error::RecordingError;
pub use index::{RecordingIndex, WatchEventKind};
pub use scan::{default_recordings_dir, scan_recordings};
pub use watcher::RecordingWatcher;
