//! Collapse bursts of file events into single notifications.
//!
//! [`Debouncer`] is pure timing state; [`debounce_changes`] drives it from a
//! channel with a timer that is re-armed by every incoming event. Both use
//! `tokio::time::Instant` so tests can run on a paused clock.

use crate::watcher::FileChange;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Sleep used while nothing is pending; the timer branch is disabled then.
const IDLE: Duration = Duration::from_secs(86_400);

/// Holds the latest change of the current burst until the window is quiet.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<FileChange>,
    last_event: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_event: None,
        }
    }

    /// Record an event. The latest event of a burst wins; the count of
    /// collapsed events is carried along.
    pub fn push(&mut self, change: FileChange, now: Instant) {
        let events = self.pending.as_ref().map_or(0, |p| p.events) + change.events;
        self.pending = Some(FileChange { events, ..change });
        self.last_event = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending change becomes ready, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref()?;
        self.last_event.map(|last| last + self.window)
    }

    /// Take the pending change once the window has elapsed without events.
    pub fn take_if_ready(&mut self, now: Instant) -> Option<FileChange> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.last_event = None;
        self.pending.take()
    }
}

/// Forward debounced changes from `raw` to `out` until either side closes.
pub async fn debounce_changes(
    mut raw: mpsc::Receiver<FileChange>,
    out: mpsc::Sender<FileChange>,
    window: Duration,
) {
    let mut debouncer = Debouncer::new(window);
    loop {
        let deadline = debouncer
            .deadline()
            .unwrap_or_else(|| Instant::now() + IDLE);

        tokio::select! {
            biased;
            received = raw.recv() => match received {
                Some(change) => debouncer.push(change, Instant::now()),
                None => break,
            },
            _ = tokio::time::sleep_until(deadline), if debouncer.is_pending() => {
                if let Some(change) = debouncer.take_if_ready(Instant::now()) {
                    log::debug!(
                        "{} changed ({:?}, {} event(s) collapsed)",
                        change.path.display(),
                        change.kind,
                        change.events
                    );
                    if out.send(change).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
    log::trace!("debounce loop stopped");
}
