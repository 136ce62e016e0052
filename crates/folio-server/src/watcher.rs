//! File watching for hot reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Quiet period after the last event before a batch is delivered.
const QUIET_PERIOD: Duration = Duration::from_millis(100);

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// A page or folder `meta.json` was modified
    ContentModified(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Generic modification
    Modified(PathBuf),
}

impl WatchEvent {
    /// Path the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::ContentModified(path)
            | Self::Created(path)
            | Self::Deleted(path)
            | Self::Modified(path) => path,
        }
    }

    /// Whether the content source has to be reloaded.
    pub fn affects_content(&self) -> bool {
        match self {
            Self::ContentModified(_) | Self::Created(_) | Self::Deleted(_) => true,
            Self::Modified(_) => false,
        }
    }
}

/// File watcher for detecting changes.
///
/// Events are delivered in batches: a batch closes once no new event has
/// arrived for [`QUIET_PERIOD`], and holds at most one event per path.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive event batches.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<Vec<WatchEvent>>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(16);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::warn!("Not watching missing path {}", path.display());
            }
        }

        std::thread::spawn(move || debounce(sync_rx, async_tx, QUIET_PERIOD));

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Collect raw events until `quiet` passes without a new one, then forward
/// the merged batch. Returns when either channel closes.
fn debounce(
    rx: mpsc::Receiver<notify::Event>,
    tx: async_mpsc::Sender<Vec<WatchEvent>>,
    quiet: Duration,
) {
    while let Ok(first) = rx.recv() {
        let mut batch = Vec::new();
        merge_event(&mut batch, &first);

        let disconnected = loop {
            match rx.recv_timeout(quiet) {
                Ok(event) => merge_event(&mut batch, &event),
                Err(RecvTimeoutError::Timeout) => break false,
                Err(RecvTimeoutError::Disconnected) => break true,
            }
        };

        if !batch.is_empty() && tx.blocking_send(batch).is_err() {
            return;
        }
        if disconnected {
            return;
        }
    }
}

/// Add a notify event to a batch, keeping one entry per path.
///
/// A later event replaces an earlier one for the same path unless that would
/// turn a content change into a plain modification.
fn merge_event(batch: &mut Vec<WatchEvent>, event: &notify::Event) {
    for path in &event.paths {
        let Some(classified) = classify_event(path, &event.kind) else {
            continue;
        };

        match batch.iter_mut().find(|e| e.path() == classified.path()) {
            Some(existing) => {
                if classified.affects_content() || !existing.affects_content() {
                    *existing = classified;
                }
            }
            None => batch.push(classified),
        }
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) if is_content_file(path) => {
            Some(WatchEvent::ContentModified(path.to_path_buf()))
        }
        EventKind::Modify(_) => Some(WatchEvent::Modified(path.to_path_buf())),
        _ => None,
    }
}

fn is_content_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    ext == "md" || ext == "mdx" || name == "meta.json"
}
