//! UUID -> recording path index
//!
//! Reads go through a copy-on-write snapshot (`RwLock<Arc<HashMap>>`) and
//! never wait on a directory scan. Every mutation (watch events, full
//! rebuilds) is serialized through one writer lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, trace, warn};

use cdr_core::{extract_recording_uuid, CallUuid};

use crate::scan::scan_recordings;

type Entries = HashMap<String, PathBuf>;

/// A directory mtime this close to a scan start may predate files the scan missed
const MTIME_SETTLE: Duration = Duration::from_secs(2);

/// Filesystem change reported for a single file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    /// Created or renamed; whether the file exists now decides the outcome
    Create,
    /// Content changed in place
    Modify,
    /// Removed; treated like `Create` since a new file may already be back
    Remove,
}

/// State owned by the single mutation authority
#[derive(Debug, Default)]
struct WriterState {
    /// When the last successful scan started, `None` before the first one
    scan_started: Option<SystemTime>,
    /// Directory mtime observed just before the last successful scan
    dir_modified: Option<SystemTime>,
}

/// Live index of call recordings in one directory
#[derive(Debug)]
pub struct RecordingIndex {
    configured_dir: PathBuf,
    /// `None` when the configured directory was missing at startup
    dir: Option<PathBuf>,
    entries: RwLock<Arc<Entries>>,
    writer: Mutex<WriterState>,
    rebuilds: AtomicU64,
}

impl RecordingIndex {
    /// Create the index and build it with a full scan
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let index = Self::cold(dir);
        index.rebuild_full();
        index
    }

    /// Create an empty index without scanning.
    ///
    /// A missing directory disables the index: every lookup reports not
    /// found without touching the filesystem.
    pub fn cold(dir: impl Into<PathBuf>) -> Self {
        let configured_dir = dir.into();

        let dir = if configured_dir.is_dir() {
            Some(
                configured_dir
                    .canonicalize()
                    .unwrap_or_else(|_| configured_dir.clone()),
            )
        } else {
            warn!(
                dir = %configured_dir.display(),
                "recordings directory does not exist, audio lookups are disabled"
            );
            None
        };

        Self {
            configured_dir,
            dir,
            entries: RwLock::new(Arc::new(HashMap::new())),
            writer: Mutex::new(WriterState::default()),
            rebuilds: AtomicU64::new(0),
        }
    }

    /// Directory as configured
    pub fn configured_dir(&self) -> &Path {
        &self.configured_dir
    }

    /// Resolved directory, `None` when indexing is disabled
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    /// Number of full rebuilds attempted so far
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Current snapshot of the index
    pub fn snapshot(&self) -> Arc<Entries> {
        Arc::clone(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Cache-only lookup, no I/O
    pub fn cached(&self, uuid: &CallUuid) -> Option<PathBuf> {
        self.snapshot().get(uuid.as_str()).cloned()
    }

    /// Resolve a call UUID to its recording.
    ///
    /// A hit is answered from the snapshot. A miss triggers one synchronous
    /// rescan, unless the directory is unchanged since the last scan, and
    /// the result after that is final.
    pub fn lookup(&self, uuid: &CallUuid) -> Option<PathBuf> {
        let dir = self.dir.as_deref()?;

        if let Some(path) = self.cached(uuid) {
            return Some(path);
        }

        let mut writer = self.lock_writer();

        // Another caller may have rebuilt while we waited for the lock
        if let Some(path) = self.cached(uuid) {
            return Some(path);
        }

        if needs_rescan(dir, &writer) {
            debug!(uuid = %uuid, "recording index miss, rescanning");
            self.rebuild_locked(dir, &mut writer);
        }

        self.cached(uuid)
    }

    /// Whether a recording exists for the call
    pub fn has_recording(&self, uuid: &CallUuid) -> bool {
        self.lookup(uuid).is_some()
    }

    /// Replace the index with a fresh scan of the directory.
    ///
    /// A failed scan is logged and the previous entries are kept.
    pub fn rebuild_full(&self) {
        let Some(dir) = self.dir.as_deref() else {
            return;
        };
        let mut writer = self.lock_writer();
        self.rebuild_locked(dir, &mut writer);
    }

    fn rebuild_locked(&self, dir: &Path, writer: &mut WriterState) {
        self.rebuilds.fetch_add(1, Ordering::Relaxed);

        // Read the mtime first so a change racing the listing forces a later rescan
        let scan_started = SystemTime::now();
        let dir_modified = modified_time(dir);

        match scan_recordings(dir) {
            Ok(found) => {
                let count = found.len();
                *self.entries.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(found);
                writer.scan_started = Some(scan_started);
                writer.dir_modified = dir_modified;
                info!(dir = %dir.display(), recordings = count, "recording index rebuilt");
            }
            Err(err) => {
                warn!(
                    dir = %dir.display(),
                    error = %err,
                    "recording directory scan failed, keeping previous index"
                );
            }
        }
    }

    /// Apply a single filesystem notification for `file_name`.
    ///
    /// Names that are not recordings are ignored.
    pub fn apply_event(&self, kind: WatchEventKind, file_name: &str) {
        let Some(dir) = self.dir.as_deref() else {
            return;
        };
        let Some(name) = Path::new(file_name).file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let Some(uuid) = extract_recording_uuid(name) else {
            trace!(file = name, "ignoring non-recording file event");
            return;
        };

        let path = dir.join(name);
        let present = match kind {
            WatchEventKind::Modify => true,
            WatchEventKind::Create | WatchEventKind::Remove => path.is_file(),
        };

        let _writer = self.lock_writer();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let map = Arc::make_mut(&mut entries);

        if present {
            debug!(uuid = %uuid, path = %path.display(), "recording indexed");
            map.insert(uuid.into(), path);
        } else if map.remove(uuid.as_str()).is_some() {
            debug!(uuid = %uuid, "recording removed from index");
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, WriterState> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A miss skips the rescan only when the directory is provably unchanged:
/// its mtime matches the last scan and was already settled when that scan
/// started. Coarse or cached mtimes fall through to a rescan.
fn needs_rescan(dir: &Path, writer: &WriterState) -> bool {
    let (Some(started), Some(seen)) = (writer.scan_started, writer.dir_modified) else {
        return true;
    };

    let settled = seen
        .checked_add(MTIME_SETTLE)
        .is_some_and(|limit| limit < started);

    !settled || modified_time(dir) != Some(seen)
}

fn modified_time(dir: &Path) -> Option<SystemTime> {
    std::fs::metadata(dir).and_then(|m| m.modified()).ok()
}
