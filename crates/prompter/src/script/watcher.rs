use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::time::Duration;

use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

use super::LibraryError;

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounced file watcher over the script path.
///
/// `on_change` runs on the watcher thread after each debounced batch, which
/// is where the UI asks for a repaint so [`LibraryWatcher::poll`] gets
/// called promptly.
pub struct LibraryWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<DebounceEventResult>,
}

impl LibraryWatcher {
    pub fn new(
        path: &Path,
        on_change: impl Fn() + Send + 'static,
    ) -> Result<Self, LibraryError> {
        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(DEBOUNCE, move |result: DebounceEventResult| {
            if tx.send(result).is_ok() {
                on_change();
            }
        })?;
        debouncer
            .watcher()
            .watch(path, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %path.display(), "watching scripts");
        Ok(Self {
            _debouncer: debouncer,
            events: rx,
        })
    }

    /// Drain pending batches. Returns true if anything changed on disk.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(Ok(events)) => changed |= !events.is_empty(),
                Ok(Err(e)) => tracing::warn!("script watcher error: {e:?}"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        changed
    }
}
