use serde::{Deserialize, Serialize};

/// A node in a listed project tree.
///
/// A present `children` field (even an empty one) marks a directory; files
/// serialize without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirectoryEntry>>,
}

impl DirectoryEntry {
    pub fn file(name: impl Into<String>) -> Self {
        DirectoryEntry {
            name: name.into(),
            children: None,
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<DirectoryEntry>) -> Self {
        DirectoryEntry {
            name: name.into(),
            children: Some(children),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }
}

/// Joins a parent relative path and an entry name with `/`.
pub fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{}/{}", prefix, name)
    }
}

/// Visits every entry depth-first (parents before children) together with
/// its relative path.
pub fn walk<'a, F>(entries: &'a [DirectoryEntry], visit: &mut F)
where
    F: FnMut(&str, &'a DirectoryEntry),
{
    walk_with_prefix(entries, "", visit);
}

fn walk_with_prefix<'a, F>(entries: &'a [DirectoryEntry], prefix: &str, visit: &mut F)
where
    F: FnMut(&str, &'a DirectoryEntry),
{
    for entry in entries {
        let path = join_path(prefix, &entry.name);
        visit(&path, entry);
        if let Some(children) = &entry.children {
            walk_with_prefix(children, &path, visit);
        }
    }
}

/// Every relative path in the tree, directories included, depth-first.
pub fn flatten(entries: &[DirectoryEntry]) -> Vec<String> {
    let mut paths = Vec::new();
    walk(entries, &mut |path, _| paths.push(path.to_owned()));
    paths
}

/// Relative paths of the leaf (file) entries only, depth-first.
pub fn file_paths(entries: &[DirectoryEntry]) -> Vec<String> {
    let mut paths = Vec::new();
    walk(entries, &mut |path, entry| {
        if !entry.is_dir() {
            paths.push(path.to_owned());
        }
    });
    paths
}

/// The flattened listing used as the first block of an aggregate: one path
/// per line.
pub fn render_listing(entries: &[DirectoryEntry]) -> String {
    flatten(entries).join("\n")
}
