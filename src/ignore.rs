use crate::utils::extension_of;
use glob::Pattern;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Directories that are never listed or descended into.
pub const EXCLUDED_FOLDERS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Build output and caches
    "target",
    "dist",
    "build",
    "out",
    ".next",
    ".nuxt",
    ".turbo",
    ".cache",
    "coverage",
    ".gradle",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    // Dependency caches
    "node_modules",
    "vendor",
    ".venv",
    "venv",
    ".bundle",
    // Editors
    ".idea",
    ".vscode",
];

/// File extensions that are never listed: binaries, media, secrets, scripts.
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    // Images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp", "tiff", "avif",
    // Fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // Media
    "mp3", "mp4", "wav", "mov", "webm",
    // Archives and binaries
    "zip", "tar", "gz", "7z", "rar", "exe", "dll", "so", "dylib", "class", "jar", "pyc",
    "wasm", "pdf",
    // Secrets
    "env", "pem", "key", "crt",
    // Shell scripts
    "sh", "bash", "zsh", "ps1", "bat", "cmd",
];

/// Exact file names that are never listed: lockfiles, generated
/// declarations, framework configuration.
pub const EXCLUDED_FILES: &[&str] = &[
    ".DS_Store",
    ".env",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "Gemfile.lock",
    "composer.lock",
    "poetry.lock",
    "uv.lock",
    "go.sum",
    "next-env.d.ts",
    "next.config.js",
    "next.config.mjs",
    "tailwind.config.js",
    "tailwind.config.ts",
    "postcss.config.js",
    "postcss.config.mjs",
];

#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    folders: HashSet<String>,
    extensions: HashSet<String>,
    files: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        ExclusionPolicy::new(None)
    }
}

impl ExclusionPolicy {
    /// Builds the fixed denylists plus any extra glob patterns, which are
    /// matched against the entry's relative path.
    pub fn new(extra_patterns: Option<Vec<String>>) -> Self {
        let patterns: Vec<Pattern> = extra_patterns
            .unwrap_or_default()
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid ignore pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        debug!("Using {} extra ignore patterns", patterns.len());

        ExclusionPolicy {
            folders: EXCLUDED_FOLDERS.iter().map(|s| s.to_string()).collect(),
            extensions: EXCLUDED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            files: EXCLUDED_FILES.iter().map(|s| s.to_string()).collect(),
            patterns,
        }
    }

    /// Whether an entry is left out of the listing. `relative_path` is the
    /// `/`-joined path from the listed root.
    pub fn should_exclude(&self, name: &str, relative_path: &str, is_dir: bool) -> bool {
        if self.patterns.iter().any(|p| p.matches(relative_path)) {
            return true;
        }

        if is_dir {
            return self.folders.contains(name);
        }

        if self.files.contains(name) || name.starts_with(".env.") {
            return true;
        }

        extension_of(name).is_some_and(|ext| self.extensions.contains(&ext))
    }
}
