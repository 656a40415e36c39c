//! SQLite schema for the memory store.
//!
//! One append-only table, `memory_index`, preferably an FTS5 virtual table
//! with Porter-stemming tokenization. When FTS5 is unavailable in the host
//! SQLite, a plain two-column table of the same name takes its place; the
//! choice is made once at startup and never revisited.

/// Primary schema: FTS5 virtual table with stemming-aware tokenization.
pub const MEMORY_FTS_SQL: &str =
    "CREATE VIRTUAL TABLE IF NOT EXISTS memory_index USING fts5(content, metadata, tokenize='porter')";

/// Fallback schema: plain two-column table, substring search only.
pub const MEMORY_PLAIN_SQL: &str = "CREATE TABLE IF NOT EXISTS memory_index (content TEXT, metadata TEXT)";

/// Ranked full-text lookup (FTS5 `rank` is best-match-first).
pub const SEARCH_MATCH_SQL: &str =
    "SELECT content, metadata FROM memory_index WHERE memory_index MATCH ?1 ORDER BY rank LIMIT ?2";

/// Substring fallback, most recent first.
pub const SEARCH_LIKE_SQL: &str =
    "SELECT content, metadata FROM memory_index WHERE content LIKE ?1 ORDER BY rowid DESC LIMIT ?2";

/// Recency listing, most recent first.
pub const RECENT_SQL: &str = "SELECT content, metadata FROM memory_index ORDER BY rowid DESC LIMIT ?1";

/// Append one record.
pub const INSERT_SQL: &str = "INSERT INTO memory_index (content, metadata) VALUES (?1, ?2)";
