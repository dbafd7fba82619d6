//! File system watcher for live reload.
//!
//! Watches the currently open document and tells the event loop to rebuild
//! the snapshot and outline when the file changes on disk.

use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// Watches one file at a time and reports debounced modifications.
pub struct ReloadWatcher {
    watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    watched: Option<PathBuf>,
    last_reload: Instant,
    debounce: Duration,
}

impl ReloadWatcher {
    pub fn new() -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(tx)?;

        Ok(Self {
            watcher,
            receiver: rx,
            watched: None,
            last_reload: Instant::now(),
            debounce: Duration::from_millis(100),
        })
    }

    /// Start watching a file, dropping any previous watch.
    pub fn watch(&mut self, path: &Path) -> Result<(), notify::Error> {
        if let Some(ref old) = self.watched {
            let _ = self.watcher.unwatch(old);
        }

        self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        self.watched = Some(path.to_path_buf());
        self.last_reload = Instant::now();
        Ok(())
    }

    /// Drain pending events; true when a reload should run.
    pub fn check_for_changes(&mut self) -> bool {
        let mut changed = false;

        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) => {
                    if is_relevant(&event) {
                        changed = true;
                    }
                }
                // Watch errors and a disconnected sender both end the drain
                Ok(Err(_)) => {}
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if changed && self.last_reload.elapsed() >= self.debounce {
            self.last_reload = Instant::now();
            return true;
        }
        false
    }
}

fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
            | EventKind::Create(_)
    )
}
