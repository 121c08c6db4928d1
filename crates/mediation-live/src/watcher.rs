//! Watch one page file and publish debounced change notifications.
//!
//! ```text
//! notify (OS thread) → raw channel → debounce task → FileChange receiver
//! ```
//!
//! The parent directory is watched so editors that save by rename or
//! delete-then-create are still seen. Events for other files in the directory
//! are dropped before they reach the debouncer.

use crate::config::WatchConfig;
use crate::debounce::debounce_changes;
use crate::error::LiveError;
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What happened to the watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// A debounced notification. `kind` is the latest event of the burst.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
    /// Raw events collapsed into this notification.
    pub events: usize,
}

/// The watched file, split into its canonical directory and file name.
#[derive(Debug, Clone)]
struct WatchTarget {
    dir: PathBuf,
    name: OsString,
}

impl WatchTarget {
    fn resolve(path: &Path) -> Result<Self, LiveError> {
        let invalid = || LiveError::InvalidWatchPath {
            path: path.to_path_buf(),
        };
        let name = path.file_name().ok_or_else(invalid)?.to_os_string();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let dir = parent.canonicalize().map_err(|source| LiveError::Read {
            path: parent.to_path_buf(),
            source,
        })?;
        if !dir.is_dir() {
            return Err(invalid());
        }
        Ok(Self { dir, name })
    }

    fn file(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    fn matches(&self, candidate: &Path) -> bool {
        if candidate.file_name() != Some(self.name.as_os_str()) {
            return false;
        }
        let Some(parent) = candidate.parent() else {
            return false;
        };
        parent == self.dir || parent.canonicalize().is_ok_and(|p| p == self.dir)
    }

    /// Map a raw event onto a change of the watched file, if it is one.
    fn classify(&self, event: &notify::Event) -> Option<FileChange> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(ModifyKind::Metadata(_)) => return None,
            EventKind::Modify(_) | EventKind::Any => ChangeKind::Modified,
            EventKind::Access(_) | EventKind::Other => return None,
        };
        event.paths.iter().any(|p| self.matches(p)).then(|| FileChange {
            path: self.file(),
            kind,
            events: 1,
        })
    }
}

/// Handle on a running watcher. Dropping it stops watching.
pub struct ReloadWatcher {
    target: WatchTarget,
    watcher: Option<RecommendedWatcher>,
    task: Option<JoinHandle<()>>,
}

impl ReloadWatcher {
    /// Start watching `path`. Must be called inside a tokio runtime.
    pub fn spawn(
        path: &Path,
        config: &WatchConfig,
    ) -> Result<(Self, mpsc::Receiver<FileChange>), LiveError> {
        let target = WatchTarget::resolve(path)?;
        let capacity = config.channel_capacity.max(1);
        let (raw_tx, raw_rx) = mpsc::channel(capacity);
        let (out_tx, out_rx) = mpsc::channel(capacity);

        let filter = target.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => match filter.classify(&event) {
                    Some(change) => {
                        log::trace!("accepted {:?} {:?}", event.kind, event.paths);
                        if raw_tx.try_send(change).is_err() {
                            log::trace!("raw event dropped: channel full or closed");
                        }
                    }
                    None => log::trace!("ignored {:?} {:?}", event.kind, event.paths),
                },
                Err(e) => log::warn!("watch error: {e}"),
            }
        })?;
        watcher.watch(&target.dir, RecursiveMode::NonRecursive)?;

        let task = tokio::spawn(debounce_changes(raw_rx, out_tx, config.debounce));
        log::debug!("watching {}", target.file().display());

        Ok((
            Self {
                target,
                watcher: Some(watcher),
                task: Some(task),
            },
            out_rx,
        ))
    }

    /// Canonical path of the watched file.
    pub fn path(&self) -> PathBuf {
        self.target.file()
    }

    /// Unwatch, release the OS handle and stop the debounce task.
    /// The notification receiver then yields `None`.
    pub fn shutdown(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            if let Err(e) = watcher.unwatch(&self.target.dir) {
                log::debug!("unwatch {}: {e}", self.target.dir.display());
            }
            drop(watcher);
        }
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("stopped watching {}", self.target.file().display());
        }
    }
}

impl Drop for ReloadWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ReloadWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadWatcher")
            .field("path", &self.target.file())
            .field("running", &self.task.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind};
    use pretty_assertions::assert_eq;

    fn event(kind: EventKind, path: PathBuf) -> notify::Event {
        notify::Event {
            kind,
            paths: vec![path],
            attrs: Default::default(),
        }
    }

    fn target() -> (tempfile::TempDir, WatchTarget) {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = WatchTarget::resolve(&dir.path().join("page.yaml")).expect("resolve");
        (dir, target)
    }

    #[test]
    fn classifies_events_for_the_watched_file() {
        let (_dir, target) = target();
        let file = target.file();

        let created = target.classify(&event(EventKind::Create(CreateKind::File), file.clone()));
        assert_eq!(created.map(|c| c.kind), Some(ChangeKind::Created));

        let modified = target.classify(&event(
            EventKind::Modify(ModifyKind::Data(DataChange::Any)),
            file.clone(),
        ));
        assert_eq!(modified.map(|c| c.kind), Some(ChangeKind::Modified));

        let removed = target.classify(&event(EventKind::Remove(RemoveKind::File), file));
        assert_eq!(removed.map(|c| c.kind), Some(ChangeKind::Removed));
    }

    #[test]
    fn ignores_siblings_and_metadata() {
        let (_dir, target) = target();
        let sibling = target.dir.join("other.yaml");
        assert!(
            target
                .classify(&event(EventKind::Create(CreateKind::File), sibling))
                .is_none()
        );
        assert!(
            target
                .classify(&event(
                    EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)),
                    target.file(),
                ))
                .is_none()
        );
    }

    #[test]
    fn rejects_paths_without_a_file_name() {
        let err = WatchTarget::resolve(Path::new("/")).expect_err("root has no file name");
        assert!(matches!(err, LiveError::InvalidWatchPath { .. }));
    }

    #[test]
    fn missing_directory_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = WatchTarget::resolve(&dir.path().join("absent/page.yaml"))
            .expect_err("parent does not exist");
        assert!(matches!(err, LiveError::Read { .. }));
    }
}
