#![allow(dead_code)]

use async_trait::async_trait;
use codebundle::errors::BundleError;
use codebundle::source::ProjectSource;
use codebundle::tokens::TokenCounter;
use codebundle::tree::DirectoryEntry;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// In-memory source with optional per-key delays, recording every listing
/// request.
#[derive(Default)]
pub struct MockSource {
    trees: HashMap<String, Vec<DirectoryEntry>>,
    contents: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    list_calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        MockSource::default()
    }

    pub fn with_tree(mut self, dir: &str, tree: Vec<DirectoryEntry>) -> Self {
        self.trees.insert(dir.to_owned(), tree);
        self
    }

    pub fn with_content(mut self, path: &str, content: &str) -> Self {
        self.contents.insert(path.to_owned(), content.to_owned());
        self
    }

    /// Delays listing `key` as a dir, or fetching it as a file path.
    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_owned(), delay);
        self
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    async fn wait(&self, key: &str) {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl ProjectSource for MockSource {
    async fn list(&self, dir: &str) -> Result<Vec<DirectoryEntry>, BundleError> {
        self.list_calls.lock().unwrap().push(dir.to_owned());
        self.wait(dir).await;
        self.trees
            .get(dir)
            .cloned()
            .ok_or_else(|| BundleError::DirectoryLoadError(format!("no tree for '{}'", dir)))
    }

    async fn fetch(&self, _dir: &str, path: &str) -> Result<String, BundleError> {
        self.wait(path).await;
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| BundleError::ReadError(format!("{}: not found", path)))
    }
}

/// Counts whitespace-separated words.
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// `a.ts` and `b/c.ts`.
pub fn sample_tree() -> Vec<DirectoryEntry> {
    vec![
        DirectoryEntry::file("a.ts"),
        DirectoryEntry::directory("b", vec![DirectoryEntry::file("c.ts")]),
    ]
}
