//! File watcher feeding the recording index
//!
//! The `notify` callback only forwards raw events into a bounded queue. One
//! dedicated worker thread drains the queue and is the only place watch
//! events are applied to the index.

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::error::RecordingError;
use crate::index::{RecordingIndex, WatchEventKind};

/// Default capacity of the event queue between watcher and worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Running watch on the recordings directory. Dropping it stops the watch.
pub struct RecordingWatcher {
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
}

impl RecordingWatcher {
    /// Start watching the index's directory
    pub fn spawn(index: Arc<RecordingIndex>) -> Result<Self, RecordingError> {
        Self::spawn_with_capacity(index, DEFAULT_QUEUE_CAPACITY)
    }

    /// Start watching with a specific event queue capacity
    pub fn spawn_with_capacity(
        index: Arc<RecordingIndex>,
        capacity: usize,
    ) -> Result<Self, RecordingError> {
        let dir = index
            .dir()
            .map(|d| d.to_path_buf())
            .ok_or_else(|| RecordingError::Disabled(index.configured_dir().to_path_buf()))?;

        let (tx, rx) = mpsc::sync_channel::<notify::Result<Event>>(capacity.max(1));

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Blocks when the worker falls behind; fails only after shutdown
            let _ = tx.send(res);
        })?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let worker = thread::Builder::new()
            .name("recording-watch".into())
            .spawn(move || run_worker(rx, |event| apply_event(&index, event)))?;

        info!(dir = %dir.display(), "watching recordings directory");

        Ok(Self {
            watcher: Some(watcher),
            worker: Some(worker),
        })
    }

    /// Stop watching and wait for queued events to drain
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        // Dropping the watcher drops the queue sender, which ends the worker loop
        drop(self.watcher.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("recording watch worker panicked");
            }
        }
    }
}

impl Drop for RecordingWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(rx: Receiver<notify::Result<Event>>, apply: impl Fn(&Event)) {
    for res in rx {
        match res {
            Ok(event) => {
                // A bad event must never take down the watch stream
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| apply(&event)));
                if outcome.is_err() {
                    warn!(?event, "failed to apply recording event");
                }
            }
            Err(err) => {
                warn!(error = %err, "recording watch error");
            }
        }
    }
    debug!("recording watch worker stopped");
}

/// Apply one raw watch event to the index
pub fn apply_event(index: &RecordingIndex, event: &Event) {
    let Some(kind) = classify(&event.kind) else {
        return;
    };

    for path in &event.paths {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            index.apply_event(kind, name);
        }
    }
}

/// Map a `notify` event kind onto the index's event kinds.
///
/// Renames and unspecified modifications are resolved by checking whether the
/// file exists, the same as creation.
pub fn classify(kind: &EventKind) -> Option<WatchEventKind> {
    match kind {
        EventKind::Create(_) => Some(WatchEventKind::Create),
        EventKind::Modify(ModifyKind::Data(_)) => Some(WatchEventKind::Modify),
        EventKind::Modify(_) => Some(WatchEventKind::Create),
        EventKind::Remove(_) => Some(WatchEventKind::Remove),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdr_core::CallUuid;
    use notify::event::{CreateKind, DataChange, RemoveKind, RenameMode};
    use std::fs;
    use std::time::{Duration, Instant};

    const UUID_A: &str = "abcd1234-1234-4abc-89ab-1234567890ab";

    fn uuid() -> CallUuid {
        CallUuid::parse(UUID_A).unwrap()
    }

    fn wait_for(mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&EventKind::Create(CreateKind::File)),
            Some(WatchEventKind::Create)
        );
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(WatchEventKind::Modify)
        );
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Name(RenameMode::From))),
            Some(WatchEventKind::Create)
        );
        assert_eq!(
            classify(&EventKind::Remove(RemoveKind::File)),
            Some(WatchEventKind::Remove)
        );
        assert_eq!(classify(&EventKind::Any), None);
    }

    #[test]
    fn test_apply_rename_event_with_both_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().canonicalize().unwrap();
        let old = dir.join(format!("tmp_{UUID_A}.part"));
        let new = dir.join(format!("call_{UUID_A}.wav"));
        fs::write(&new, b"RIFF").unwrap();

        let index = RecordingIndex::cold(&dir);
        let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(old)
            .add_path(new.clone());
        apply_event(&index, &event);

        assert_eq!(index.cached(&uuid()), Some(new));
    }

    #[test]
    fn test_worker_survives_failing_event() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().canonicalize().unwrap();
        let good = dir.join(format!("call_{UUID_A}.wav"));
        fs::write(&good, b"RIFF").unwrap();
        let index = RecordingIndex::cold(&dir);

        let (tx, rx) = mpsc::sync_channel(8);
        let create = || Event::new(EventKind::Create(CreateKind::File));
        tx.send(Ok(create().add_path(dir.join("corrupt.wav")))).unwrap();
        tx.send(Err(notify::Error::generic("inotify queue overflow"))).unwrap();
        tx.send(Ok(create().add_path(good.clone()))).unwrap();
        drop(tx);

        run_worker(rx, |event| {
            if event.paths.iter().any(|p| p.ends_with("corrupt.wav")) {
                panic!("cannot apply event");
            }
            apply_event(&index, event);
        });

        assert_eq!(index.cached(&uuid()), Some(good));
    }

    #[test]
    fn test_spawn_on_disabled_index_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let index = Arc::new(RecordingIndex::cold(tmp.path().join("missing")));
        assert!(matches!(
            RecordingWatcher::spawn(index),
            Err(RecordingError::Disabled(_))
        ));
    }

    #[test]
    fn test_watcher_tracks_create_and_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let index = Arc::new(RecordingIndex::open(tmp.path()));
        let watcher = RecordingWatcher::spawn(Arc::clone(&index)).unwrap();

        let path = tmp.path().join(format!("call_20240101_{UUID_A}.wav"));
        fs::write(&path, b"RIFF").unwrap();
        assert!(wait_for(|| index.cached(&uuid()).is_some()));

        fs::remove_file(&path).unwrap();
        assert!(wait_for(|| index.cached(&uuid()).is_none()));

        watcher.shutdown();
        assert_eq!(index.rebuild_count(), 1);
    }
}
