use crate::errors::BundleError;
use arboard::Clipboard;
use std::fmt;
use tracing::{error, info};

/// Somewhere a finished bundle can be written.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), BundleError>;
}

/// The system clipboard.
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, BundleError> {
        let clipboard =
            Clipboard::new().map_err(|e| BundleError::ClipboardInitError(e.to_string()))?;
        Ok(SystemClipboard { clipboard })
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), BundleError> {
        self.clipboard
            .set_text(text.to_owned())
            .map_err(|e| BundleError::ClipboardWriteError(e.to_string()))
    }
}

/// Transient notice shown after an export attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportNotice {
    Copied,
    Failed(String),
}

impl fmt::Display for ExportNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportNotice::Copied => write!(f, "Copied to clipboard!"),
            ExportNotice::Failed(_) => write!(f, "Failed to copy"),
        }
    }
}

/// Attempts the write and reports the outcome; never fails itself.
pub fn export_text(sink: &mut dyn ClipboardSink, text: &str) -> ExportNotice {
    match sink.write_text(text) {
        Ok(()) => {
            info!("Bundle copied to clipboard ({} bytes)", text.len());
            ExportNotice::Copied
        }
        Err(e) => {
            error!("Failed to copy text: {}", e);
            ExportNotice::Failed(e.to_string())
        }
    }
}
