use crate::aggregate::{AggregateResult, Aggregator};
use crate::config::{SessionConfig, SourceConfig};
use crate::controller::{LoadController, LoadEvent, LoadOutcome, LoadState};
use crate::errors::BundleError;
use crate::export::{export_text, ClipboardSink, ExportNotice};
use crate::history::DirectoryHistory;
use crate::ignore::ExclusionPolicy;
use crate::model::{ToggleOutcome, TreeModel};
use crate::source::{HttpSource, LocalSource, ProjectSource};
use crate::tokens::{TiktokenCounter, TokenCounter};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Everything one user works with: the load controller, the tree and its
/// selection, the trailing text, and the last built bundle.
pub struct Session {
    controller: LoadController,
    model: TreeModel,
    aggregator: Aggregator,
    trailing_text: String,
    last_result: Option<AggregateResult>,
}

impl Session {
    pub fn new(
        source: Arc<dyn ProjectSource>,
        counter: Arc<dyn TokenCounter>,
        history: DirectoryHistory,
        debounce: Duration,
        initial_path: impl Into<String>,
    ) -> Self {
        Session {
            controller: LoadController::new(source.clone(), history, debounce, initial_path),
            model: TreeModel::new(),
            aggregator: Aggregator::new(source, counter),
            trailing_text: String::new(),
            last_result: None,
        }
    }

    /// Wires the configured source, tokenizer and history together.
    pub fn from_config(config: &SessionConfig) -> Result<Self, BundleError> {
        let source: Arc<dyn ProjectSource> = match &config.source {
            SourceConfig::Local { base } => Arc::new(LocalSource::new(
                base.clone(),
                ExclusionPolicy::new(Some(config.ignore_patterns.clone())),
            )),
            SourceConfig::Remote { url } => Arc::new(HttpSource::new(url.clone())),
        };
        let counter = Arc::new(TiktokenCounter::for_model(&config.model)?);
        let history = match &config.history_file {
            Some(path) => DirectoryHistory::load(path.clone()),
            None => DirectoryHistory::in_memory(),
        };
        Ok(Session::new(
            source,
            counter,
            history,
            config.debounce,
            config.initial_dir.clone(),
        ))
    }

    pub fn controller(&self) -> &LoadController {
        &self.controller
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    pub fn load_state(&self) -> LoadState {
        self.controller.state()
    }

    pub fn history(&self) -> &DirectoryHistory {
        self.controller.history()
    }

    pub fn clear_history(&mut self) -> Result<(), BundleError> {
        self.controller.history_mut().clear()
    }

    pub fn edit_path(&mut self, path: impl Into<String>) {
        self.controller.edit_path(path);
    }

    pub fn reload(&mut self) {
        self.controller.reload();
    }

    pub async fn next_event(&mut self) -> LoadEvent {
        self.controller.next_event().await
    }

    /// Applies a controller event; a successful load replaces the tree and
    /// selects every file, a failed one leaves the current tree alone.
    pub fn handle_event(&mut self, event: LoadEvent) -> Option<LoadOutcome> {
        let outcome = self.controller.handle(event)?;
        if let LoadOutcome::Loaded { tree, .. } = &outcome {
            self.model.ingest(tree.clone());
        }
        Some(outcome)
    }

    /// Processes events until a load settles.
    pub async fn wait_for_load(&mut self) -> LoadOutcome {
        loop {
            let event = self.next_event().await;
            if let Some(outcome) = self.handle_event(event) {
                return outcome;
            }
        }
    }

    pub fn toggle(&mut self, path: &str) -> ToggleOutcome {
        self.model.toggle(path)
    }

    pub fn select_all(&mut self, selected: bool) {
        self.model.select_all(selected);
    }

    pub fn set_extension_filter<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.model.set_extension_filter(extensions);
    }

    pub fn set_trailing_text(&mut self, text: impl Into<String>) {
        self.trailing_text = text.into();
    }

    pub fn trailing_text(&self) -> &str {
        &self.trailing_text
    }

    /// Rebuilds the bundle from scratch against the directory the current
    /// tree was loaded from.
    pub async fn build(&mut self) -> &AggregateResult {
        let dir = self
            .controller
            .loaded_path()
            .unwrap_or(self.controller.path())
            .to_owned();
        debug!("Building bundle from '{}'", dir);
        let result = self
            .aggregator
            .aggregate(&self.model, &dir, &self.trailing_text)
            .await;
        self.last_result.insert(result)
    }

    pub fn last_result(&self) -> Option<&AggregateResult> {
        self.last_result.as_ref()
    }

    /// Copies the last bundle. `None` when nothing has been built yet.
    pub fn export(&self, sink: &mut dyn ClipboardSink) -> Option<ExportNotice> {
        self.last_result
            .as_ref()
            .map(|result| export_text(sink, &result.text))
    }
}
