//! Error types for the memory store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the memory store
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection/worker error from the async wrapper
    #[error("connection error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    /// JSON serialization error for metadata
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database corruption or schema mismatch
    #[error("database error: {0}")]
    Database(String),
}

impl Error {
    /// Create a database error with a message
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// True when the underlying message indicates the full-text engine is
    /// unavailable (missing column/module or FTS query syntax error), the
    /// signature that triggers the substring fallback path.
    pub fn is_fts_unavailable(&self) -> bool {
        let msg = self.to_string().to_lowercase();
        msg.contains("no such column")
            || msg.contains("no such module")
            || msg.contains("unable to use function match")
            || msg.contains("syntax error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::database("schema mismatch");
        assert_eq!(err.to_string(), "database error: schema mismatch");
    }

    #[test]
    fn test_fts_unavailable_signatures() {
        assert!(Error::database("no such column: rank").is_fts_unavailable());
        assert!(Error::database("no such module: fts5").is_fts_unavailable());
        assert!(Error::database("unable to use function MATCH in the requested context").is_fts_unavailable());
        assert!(Error::database("fts5: syntax error near \"-\"").is_fts_unavailable());
        assert!(!Error::database("disk I/O error").is_fts_unavailable());
    }

    #[test]
    fn test_error_from_sqlite() {
        let sqlite_err = rusqlite::Error::InvalidPath("bad path".into());
        let err: Error = sqlite_err.into();
        assert!(matches!(err, Error::Sqlite(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
