use crate::controller::DEFAULT_DEBOUNCE;
use crate::tokens::DEFAULT_MODEL;
use std::path::PathBuf;
use std::time::Duration;

/// Project subpath served when a request names no `dir`.
pub const DEFAULT_PROJECT_DIR: &str = "app";

pub const DEFAULT_PORT: u16 = 3030;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory that `dir` query values are resolved against.
    pub base: PathBuf,
    pub default_dir: String,
    pub ignore_patterns: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: DEFAULT_PORT,
            base: PathBuf::from("."),
            default_dir: DEFAULT_PROJECT_DIR.to_owned(),
            ignore_patterns: Vec::new(),
        }
    }
}

/// Where a session reads trees and contents from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Local { base: PathBuf },
    Remote { url: String },
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub source: SourceConfig,
    pub initial_dir: String,
    pub debounce: Duration,
    pub model: String,
    /// `None` keeps history in memory only.
    pub history_file: Option<PathBuf>,
    pub ignore_patterns: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            source: SourceConfig::Local {
                base: PathBuf::from("."),
            },
            initial_dir: DEFAULT_PROJECT_DIR.to_owned(),
            debounce: DEFAULT_DEBOUNCE,
            model: DEFAULT_MODEL.to_owned(),
            history_file: None,
            ignore_patterns: Vec::new(),
        }
    }
}

/// One-shot bundle of a directory.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    pub session: SessionConfig,
    /// Relative paths to leave out of the default all-files selection.
    pub exclude: Vec<String>,
    pub trailing_text: String,
    pub no_copy: bool,
    pub print: bool,
    pub no_stats: bool,
}
