use dsstore_format::ParsingError;
use thiserror::Error;

/// Errors from loading layout data.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("invalid asset path: {0}")]
    InvalidPath(String),

    #[error("fetch of {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse .DS_Store: {0}")]
    Parse(#[from] ParsingError),

    #[error("invalid layout configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
