use crate::tree::{join_path, render_listing, walk, DirectoryEntry};
use crate::utils::{extension_of, normalize_extension};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Directories are only selected through their files.
    NotAFile,
    Unknown,
}

/// The last loaded tree plus the set of files chosen for the bundle.
///
/// Every path known to the tree is indexed once per [`TreeModel::ingest`],
/// in depth-first order, so queries never re-walk the tree. The selection
/// only ever holds file paths from the current tree.
#[derive(Debug, Default)]
pub struct TreeModel {
    tree: Vec<DirectoryEntry>,
    index: IndexMap<String, EntryKind>,
    selection: HashSet<String>,
    extension_filter: BTreeSet<String>,
}

impl TreeModel {
    pub fn new() -> Self {
        TreeModel::default()
    }

    /// Replaces the tree wholesale and selects every file in it.
    pub fn ingest(&mut self, tree: Vec<DirectoryEntry>) {
        let mut index = IndexMap::new();
        walk(&tree, &mut |path, entry| {
            let kind = if entry.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            index.insert(path.to_owned(), kind);
        });

        self.selection = index
            .iter()
            .filter(|(_, kind)| **kind == EntryKind::File)
            .map(|(path, _)| path.clone())
            .collect();
        debug!(
            "Ingested tree with {} entries, {} files selected",
            index.len(),
            self.selection.len()
        );
        self.index = index;
        self.tree = tree;
    }

    pub fn tree(&self) -> &[DirectoryEntry] {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn kind(&self, path: &str) -> Option<EntryKind> {
        self.index.get(path).copied()
    }

    /// Every indexed path, directories included, depth-first.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn file_paths(&self) -> impl Iterator<Item = &str> {
        self.index
            .iter()
            .filter(|(_, kind)| **kind == EntryKind::File)
            .map(|(path, _)| path.as_str())
    }

    pub fn file_count(&self) -> usize {
        self.file_paths().count()
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selection.contains(path)
    }

    /// Selected files in depth-first tree order.
    pub fn selected_paths(&self) -> Vec<&str> {
        self.file_paths().filter(|p| self.selection.contains(*p)).collect()
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Flips one file in or out of the selection.
    pub fn toggle(&mut self, path: &str) -> ToggleOutcome {
        match self.kind(path) {
            Some(EntryKind::File) => {
                if self.selection.remove(path) {
                    ToggleOutcome::Deselected
                } else {
                    self.selection.insert(path.to_owned());
                    ToggleOutcome::Selected
                }
            }
            Some(EntryKind::Directory) => ToggleOutcome::NotAFile,
            None => ToggleOutcome::Unknown,
        }
    }

    /// True when every file of a non-empty tree is selected. An empty tree
    /// is never "all selected".
    pub fn is_all_selected(&self) -> bool {
        let mut files = self.file_paths().peekable();
        if files.peek().is_none() {
            return false;
        }
        files.all(|p| self.selection.contains(p))
    }

    pub fn select_all(&mut self, selected: bool) {
        self.selection = if selected {
            self.file_paths().map(str::to_owned).collect()
        } else {
            HashSet::new()
        };
    }

    /// Sets the extensions shown by the filter overlay. An empty set shows
    /// everything. The selection is left untouched.
    pub fn set_extension_filter<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extension_filter = extensions
            .into_iter()
            .map(|ext| normalize_extension(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();
    }

    pub fn extension_filter(&self) -> &BTreeSet<String> {
        &self.extension_filter
    }

    /// Whether a file passes the extension filter. Directories are visible
    /// when any file below them is.
    pub fn is_visible(&self, path: &str) -> bool {
        match self.kind(path) {
            Some(EntryKind::File) => self.file_passes_filter(path),
            Some(EntryKind::Directory) if self.extension_filter.is_empty() => true,
            Some(EntryKind::Directory) => {
                let prefix = format!("{}/", path);
                self.file_paths()
                    .any(|p| p.starts_with(&prefix) && self.file_passes_filter(p))
            }
            None => false,
        }
    }

    /// Visible entries, depth-first, each with its depth for indentation.
    pub fn visible_entries(&self) -> Vec<(String, usize, EntryKind)> {
        let mut out = Vec::new();
        self.collect_visible(&self.tree, "", 0, &mut out);
        out
    }

    fn collect_visible(
        &self,
        entries: &[DirectoryEntry],
        prefix: &str,
        depth: usize,
        out: &mut Vec<(String, usize, EntryKind)>,
    ) -> bool {
        let mut any_visible = false;
        for entry in entries {
            let path = join_path(prefix, &entry.name);
            match &entry.children {
                Some(children) => {
                    let at = out.len();
                    out.push((path.clone(), depth, EntryKind::Directory));
                    let has_visible = self.collect_visible(children, &path, depth + 1, out);
                    if has_visible || self.extension_filter.is_empty() {
                        any_visible = true;
                    } else {
                        out.truncate(at);
                    }
                }
                None => {
                    if self.file_passes_filter(&path) {
                        out.push((path, depth, EntryKind::File));
                        any_visible = true;
                    }
                }
            }
        }
        any_visible
    }

    fn file_passes_filter(&self, path: &str) -> bool {
        self.extension_filter.is_empty()
            || extension_of(path).is_some_and(|ext| self.extension_filter.contains(&ext))
    }

    /// One path per line, depth-first, directories included.
    pub fn listing(&self) -> String {
        render_listing(&self.tree)
    }
}
