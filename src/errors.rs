use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("Error reading file content: {0}")]
    ReadError(String),

    #[error("Directory load failed: {0}")]
    DirectoryLoadError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Tokenizer Error: {0}")]
    TokenizerError(String),

    #[error("History error: {0}")]
    HistoryError(String),

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInitError(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO Error: {0}")]
    IoError(String),
}

impl BundleError {
    /// HTTP status the server answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            BundleError::InvalidPath(_) => 400,
            BundleError::AccessDenied(_) => 403,
            _ => 500,
        }
    }
}

impl From<std::io::Error> for BundleError {
    fn from(err: std::io::Error) -> Self {
        BundleError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for BundleError {
    fn from(err: reqwest::Error) -> Self {
        BundleError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        BundleError::HistoryError(err.to_string())
    }
}
