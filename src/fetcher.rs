use crate::errors::BundleError;
use crate::utils::normalize_path;
use std::path::{Path, PathBuf};
use tokio::fs as async_fs;
use tracing::{debug, warn};

/// Maximum accepted length of a requested relative path.
pub const MAX_PATH_LENGTH: usize = 4096;

/// Resolves `relative_path` under `root` and verifies the result stays inside
/// the root.
///
/// The check runs twice: lexically, so a `..` that climbs above the root is
/// refused before touching the filesystem, and again on the canonicalized
/// paths, so a symlink pointing outside the root is refused as well. The
/// returned path is canonical.
pub fn resolve_contained(root: &Path, relative_path: &str) -> Result<PathBuf, BundleError> {
    if relative_path.len() > MAX_PATH_LENGTH {
        return Err(BundleError::InvalidPath("path exceeds maximum length".to_owned()));
    }
    if relative_path.contains('\0') {
        return Err(BundleError::InvalidPath("path contains a NUL byte".to_owned()));
    }

    let normalized = normalize_path(relative_path);
    let mut components: Vec<&str> = Vec::new();
    for component in normalized.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                if components.pop().is_none() {
                    warn!("Access denied: {} climbs above the root", relative_path);
                    return Err(BundleError::AccessDenied(relative_path.to_owned()));
                }
            }
            c => components.push(c),
        }
    }
    if components.is_empty() {
        return Err(BundleError::InvalidPath(format!(
            "'{}' does not name a file",
            relative_path
        )));
    }

    let root_canonical = root
        .canonicalize()
        .map_err(|e| BundleError::ReadError(format!("{}: {}", root.display(), e)))?;

    let mut candidate = root_canonical.clone();
    candidate.extend(components);

    let canonical = candidate
        .canonicalize()
        .map_err(|e| BundleError::ReadError(format!("{}: {}", relative_path, e)))?;

    if !canonical.starts_with(&root_canonical) {
        warn!(
            "Access denied: {:?} resolves outside {:?}",
            canonical, root_canonical
        );
        return Err(BundleError::AccessDenied(relative_path.to_owned()));
    }

    Ok(canonical)
}

/// Reads one file of the project as text, after the containment check.
pub async fn read_content(root: &Path, relative_path: &str) -> Result<String, BundleError> {
    let path = resolve_contained(root, relative_path)?;
    debug!("Reading content of {}", path.display());
    async_fs::read_to_string(&path)
        .await
        .map_err(|e| BundleError::ReadError(format!("{}: {}", relative_path, e)))
}
