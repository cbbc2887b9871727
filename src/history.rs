use crate::errors::BundleError;
use indexmap::IndexSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directories that loaded successfully, oldest first, persisted as a JSON
/// array of strings.
///
/// Membership is by the exact string typed, not the canonical path.
#[derive(Debug, Default)]
pub struct DirectoryHistory {
    entries: IndexSet<String>,
    store: Option<PathBuf>,
}

impl DirectoryHistory {
    /// History kept only in memory.
    pub fn in_memory() -> Self {
        DirectoryHistory::default()
    }

    /// `<data dir>/codebundle/history.json`, when the platform has a data dir.
    pub fn default_store_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("codebundle").join("history.json"))
    }

    /// Reads the persisted list once. A missing file is an empty history; an
    /// unreadable or corrupt one is logged and treated as empty.
    pub fn load(store: PathBuf) -> Self {
        let entries = match fs::read_to_string(&store) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(list) => list.into_iter().collect(),
                Err(e) => {
                    warn!("Ignoring corrupt history file {}: {}", store.display(), e);
                    IndexSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexSet::new(),
            Err(e) => {
                warn!("Could not read history file {}: {}", store.display(), e);
                IndexSet::new()
            }
        };
        debug!("Loaded {} history entries", entries.len());

        DirectoryHistory {
            entries,
            store: Some(store),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(path)
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    /// Appends `path` unless already present. Returns whether it was added.
    pub fn record(&mut self, path: &str) -> Result<bool, BundleError> {
        if !self.entries.insert(path.to_owned()) {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empties the list and removes the persisted file.
    pub fn clear(&mut self) -> Result<(), BundleError> {
        self.entries.clear();
        if let Some(store) = &self.store {
            match fs::remove_file(store) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(BundleError::HistoryError(format!(
                        "{}: {}",
                        store.display(),
                        e
                    )))
                }
            }
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), BundleError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        if let Some(parent) = store.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| BundleError::HistoryError(format!("{}: {}", parent.display(), e)))?;
        }
        let list: Vec<&String> = self.entries.iter().collect();
        let json = serde_json::to_string(&list)?;
        fs::write(store, json)
            .map_err(|e| BundleError::HistoryError(format!("{}: {}", store.display(), e)))
    }
}
