use crate::ignore::ExclusionPolicy;
use crate::tree::DirectoryEntry;
use crate::utils::normalize_path;
use std::path::Path;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Lists `root` recursively into a tree, applying the exclusion policy at
/// every level before descending.
///
/// Children are sorted by file name. A directory that cannot be read shows
/// up with an empty child list; an unreadable or missing root yields an
/// empty tree.
pub fn read_directory(root: &Path, policy: &ExclusionPolicy) -> Vec<DirectoryEntry> {
    debug!("Reading directory tree at {}", root.display());

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            let relative = relative_path(root, entry.path());
            let excluded = policy.should_exclude(&name, &relative, entry.file_type().is_dir());
            if excluded {
                trace!("Excluding {}", relative);
            }
            !excluded
        });

    // Open directories, innermost last. The bottom frame holds the root's
    // children; an entry at depth `d` belongs to frame `d - 1`.
    let mut stack: Vec<(String, Vec<DirectoryEntry>)> = vec![(String::new(), Vec::new())];

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        close_frames(&mut stack, entry.depth());

        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            stack.push((name, Vec::new()));
        } else if let Some((_, children)) = stack.last_mut() {
            children.push(DirectoryEntry::file(name));
        }
    }

    close_frames(&mut stack, 1);
    stack.pop().map(|(_, children)| children).unwrap_or_default()
}

fn close_frames(stack: &mut Vec<(String, Vec<DirectoryEntry>)>, depth: usize) {
    while stack.len() > depth {
        let Some((name, children)) = stack.pop() else {
            break;
        };
        match stack.last_mut() {
            Some((_, parent)) => parent.push(DirectoryEntry::directory(name, children)),
            None => {
                stack.push((name, children));
                break;
            }
        }
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    normalize_path(&relative.to_string_lossy())
}
