use crate::errors::BundleError;
use crate::history::DirectoryHistory;
use crate::source::ProjectSource;
use crate::tree::DirectoryEntry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Quiet period after the last path edit before the tree is fetched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Idle,
    /// A path edit is waiting out the debounce timer.
    Pending,
    /// A directory fetch is in flight.
    Loading,
    Loaded,
    Failed,
}

/// Messages posted to the controller's own queue by its timer and fetch
/// tasks.
#[derive(Debug)]
pub enum LoadEvent {
    DebounceElapsed {
        ticket: u64,
    },
    Fetched {
        generation: u64,
        path: String,
        result: Result<Vec<DirectoryEntry>, BundleError>,
    },
}

/// What a handled event means for whoever displays the tree.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded {
        path: String,
        tree: Vec<DirectoryEntry>,
    },
    /// The previous tree, if any, stays on display.
    Failed { path: String, error: String },
}

/// Owns the directory path being edited, debounces edits, dispatches tree
/// fetches, and records successful loads in the history.
///
/// All state changes happen in [`LoadController::handle`], called from one
/// sequential context. Each edit aborts the previous debounce timer; fetches
/// are never cancelled, but only the response to the most recently
/// dispatched fetch is applied.
pub struct LoadController {
    source: Arc<dyn ProjectSource>,
    history: DirectoryHistory,
    debounce: Duration,
    state: LoadState,
    path: String,
    loaded_path: Option<String>,
    last_error: Option<String>,
    ticket: u64,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    events_tx: mpsc::UnboundedSender<LoadEvent>,
    events_rx: mpsc::UnboundedReceiver<LoadEvent>,
}

impl LoadController {
    pub fn new(
        source: Arc<dyn ProjectSource>,
        history: DirectoryHistory,
        debounce: Duration,
        initial_path: impl Into<String>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        LoadController {
            source,
            history,
            debounce,
            state: LoadState::Idle,
            path: initial_path.into(),
            loaded_path: None,
            last_error: None,
            ticket: 0,
            timer: None,
            generation: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// The path as currently edited.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path the displayed tree came from.
    pub fn loaded_path(&self) -> Option<&str> {
        self.loaded_path.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &DirectoryHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut DirectoryHistory {
        &mut self.history
    }

    /// Records a path edit and restarts the debounce timer. Only the path
    /// held when the timer finally fires gets fetched.
    pub fn edit_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
        self.cancel_timer();

        self.ticket += 1;
        let ticket = self.ticket;
        let delay = self.debounce;
        let tx = self.events_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(LoadEvent::DebounceElapsed { ticket });
        }));

        trace!("Path edited to '{}', debounce ticket {}", self.path, ticket);
        self.state = LoadState::Pending;
    }

    /// Fetches the current path right away, even if it is already loaded.
    pub fn reload(&mut self) {
        self.cancel_timer();
        self.dispatch();
    }

    /// Waits for the next timer or fetch event.
    pub async fn next_event(&mut self) -> LoadEvent {
        match self.events_rx.recv().await {
            Some(event) => event,
            // The controller holds a sender, so the queue never closes.
            None => std::future::pending().await,
        }
    }

    /// Applies one event. Returns an outcome when a fetch result was
    /// accepted.
    pub fn handle(&mut self, event: LoadEvent) -> Option<LoadOutcome> {
        match event {
            LoadEvent::DebounceElapsed { ticket } => {
                if ticket != self.ticket || self.timer.is_none() {
                    trace!("Ignoring superseded debounce ticket {}", ticket);
                    return None;
                }
                self.timer = None;
                self.dispatch();
                None
            }
            LoadEvent::Fetched {
                generation,
                path,
                result,
            } => {
                if generation != self.generation {
                    debug!(
                        "Discarding stale tree for '{}' (generation {} < {})",
                        path, generation, self.generation
                    );
                    return None;
                }
                Some(self.apply(path, result))
            }
        }
    }

    fn apply(
        &mut self,
        path: String,
        result: Result<Vec<DirectoryEntry>, BundleError>,
    ) -> LoadOutcome {
        // A newer edit waiting on its timer keeps the controller pending.
        let pending = self.timer.is_some();

        match result {
            Ok(tree) => {
                info!("Loaded '{}' ({} top-level entries)", path, tree.len());
                self.state = if pending {
                    LoadState::Pending
                } else {
                    LoadState::Loaded
                };
                self.loaded_path = Some(path.clone());
                self.last_error = None;
                if let Err(e) = self.history.record(&path) {
                    warn!("Could not update directory history: {}", e);
                }
                LoadOutcome::Loaded { path, tree }
            }
            Err(e) => {
                warn!("Loading '{}' failed: {}", path, e);
                self.state = if pending {
                    LoadState::Pending
                } else {
                    LoadState::Failed
                };
                let error = e.to_string();
                self.last_error = Some(error.clone());
                LoadOutcome::Failed { path, error }
            }
        }
    }

    fn dispatch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let path = self.path.clone();
        let source = self.source.clone();
        let tx = self.events_tx.clone();

        debug!("Fetching tree for '{}' (generation {})", path, generation);
        self.state = LoadState::Loading;
        tokio::spawn(async move {
            let result = source.list(&path).await;
            let _ = tx.send(LoadEvent::Fetched {
                generation,
                path,
                result,
            });
        });
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for LoadController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
