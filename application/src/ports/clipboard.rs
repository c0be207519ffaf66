//! Clipboard port

use thiserror::Error;

/// Errors that can occur while writing to the clipboard
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("No clipboard tool available")]
    Unavailable,

    #[error("Clipboard command failed: {0}")]
    CommandFailed(String),
}

/// Plain-text clipboard access
///
/// Implementations live in the infrastructure layer.
pub trait ClipboardPort: Send + Sync {
    fn copy_text(&self, text: &str) -> Result<(), ClipboardError>;
}
