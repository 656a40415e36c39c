//! Append-only memory log with ranked search and a substring fallback.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::schema;

/// Record metadata: an opaque, key-ordered string mapping serialized to JSON
/// at rest. Keys in active use: `type`, `timestamp`, plus tool-specific
/// fields such as `page_id`, `title`, `url`.
pub type MemoryMeta = BTreeMap<String, String>;

/// A handle to the append-only memory log.
///
/// Records are never updated or deleted; the SQLite `rowid` provides the
/// insertion sequence that defines recency order. The handle is opened once
/// at startup and shared for the process lifetime.
#[derive(Clone)]
pub struct MemoryStore {
    conn: Arc<Connection>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    /// Open or create the memory store at the given path.
    ///
    /// Attempts to create the FTS5 virtual table; on any failure a plain
    /// two-column table is created instead. This fallback is a one-time,
    /// startup-only decision.
    #[instrument(skip_all, fields(db_path = %db_path.display()))]
    pub async fn open(db_path: &Path) -> Result<Self> {
        tracing::info!("opening memory store at {}", db_path.display());

        let conn = Connection::open(db_path.to_path_buf())
            .await
            .map_err(|e| Error::database(format!("failed to open database: {e}")))?;

        conn.call(|conn| {
            // Substring fallback is specified as case-sensitive; SQLite's
            // LIKE is case-insensitive for ASCII unless told otherwise.
            conn.pragma_update(None, "case_sensitive_like", true)?;

            if let Err(e) = conn.execute_batch(schema::MEMORY_FTS_SQL) {
                tracing::warn!("FTS5 table creation failed, falling back to plain table: {e}");
                conn.execute_batch(schema::MEMORY_PLAIN_SQL)?;
            }
            Ok::<_, rusqlite::Error>(())
        })
        .await?;

        tracing::debug!("memory store ready");
        Ok(Self { conn: Arc::new(conn) })
    }

    /// Append a record to the log.
    ///
    /// Never returns an error: memory logging must not abort the primary
    /// operation it accompanies, so failures are logged and swallowed.
    #[instrument(skip_all, fields(len = content.len()))]
    pub async fn append(&self, content: &str, meta: MemoryMeta) {
        if let Err(e) = self.try_append(content, meta).await {
            tracing::error!("error saving to memory store: {e}");
        }
    }

    async fn try_append(&self, content: &str, meta: MemoryMeta) -> Result<()> {
        let content = content.to_owned();
        let meta_json = if meta.is_empty() {
            "{}".to_string()
        } else {
            serde_json::to_string(&meta)?
        };

        self.conn
            .call(move |conn| {
                conn.execute(schema::INSERT_SQL, params![content, meta_json])?;
                Ok::<_, rusqlite::Error>(())
            })
            .await?;

        Ok(())
    }

    /// Search the log for records matching `query`, best match first.
    ///
    /// The query is stripped of all characters outside `[A-Za-z0-9\s]`
    /// before use, to avoid full-text query-syntax injection. When the
    /// full-text path reports that FTS is unavailable, a case-sensitive
    /// substring match ordered by recency takes over; any other failure is
    /// surfaced as an error.
    ///
    /// Returned lines prefix the content with the record's bracketed
    /// `timestamp` metadata when present.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        let sanitized = sanitize_query(query);
        tracing::debug!("searching memory for {sanitized:?}");

        match self.search_fts(sanitized.clone(), limit).await {
            Ok(rows) => Ok(format_rows(rows, "timestamp")),
            Err(e) if e.is_fts_unavailable() => {
                tracing::debug!("full-text path unavailable ({e}), using substring fallback");
                let rows = self.search_like(sanitized, limit).await?;
                Ok(format_rows(rows, "timestamp"))
            }
            Err(e) => Err(e),
        }
    }

    /// List the most recent records, newest first.
    ///
    /// Returned lines prefix the content with the record's bracketed `type`
    /// metadata when present.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: usize) -> Result<Vec<String>> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(schema::RECENT_SQL)?;
                let rows = stmt
                    .query_map(params![limit as i64], row_pair)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok::<_, rusqlite::Error>(rows)
            })
            .await?;

        Ok(format_rows(rows, "type"))
    }

    async fn search_fts(&self, query: String, limit: usize) -> Result<Vec<(String, String)>> {
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(schema::SEARCH_MATCH_SQL)?;
                let rows = stmt
                    .query_map(params![query, limit as i64], row_pair)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok::<_, rusqlite::Error>(rows)
            })
            .await?;
        Ok(rows)
    }

    async fn search_like(&self, query: String, limit: usize) -> Result<Vec<(String, String)>> {
        let pattern = format!("%{query}%");
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(schema::SEARCH_LIKE_SQL)?;
                let rows = stmt
                    .query_map(params![pattern, limit as i64], row_pair)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok::<_, rusqlite::Error>(rows)
            })
            .await?;
        Ok(rows)
    }
}

fn row_pair(row: &rusqlite::Row<'_>) -> std::result::Result<(String, String), rusqlite::Error> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Strip everything outside `[A-Za-z0-9\s]` from the query.
fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Render `(content, metadata)` rows as display lines, prefixing the content
/// with the bracketed metadata value under `key` when present. Missing or
/// unparseable metadata degrades to the bare content line.
fn format_rows(rows: Vec<(String, String)>, key: &str) -> Vec<String> {
    rows.into_iter()
        .map(|(content, metadata)| match meta_field(&metadata, key) {
            Some(value) => format!("[{value}] {content}"),
            None => content,
        })
        .collect()
}

fn meta_field(metadata: &str, key: &str) -> Option<String> {
    let parsed: BTreeMap<String, serde_json::Value> = serde_json::from_str(metadata).ok()?;
    match parsed.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
