use thiserror::Error;

/// Result type alias for engram-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the Engram tool server
///
/// Most tool-level failures are converted into user-facing text by the
/// handlers; [Error::UnknownTool] is the one variant that is allowed to
/// propagate to the protocol layer, since it indicates a caller/dispatcher
/// mismatch rather than a data or environment condition.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (missing or malformed environment values)
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote service errors (document service, notification sink)
    #[error("service error: {0}")]
    Service(String),

    /// Local storage errors
    #[error("store error: {0}")]
    Store(String),

    /// Validation errors (invalid block kind, unparseable table text)
    #[error("validation error: {0}")]
    Validation(String),

    /// Parse/serialization errors
    #[error("parse error: {0}")]
    Parse(String),

    /// Unroutable operation name (protocol-level failure)
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a remote service error with a message
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    /// Create a validation error with a message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
