//! Memory store implementation with a SQLite FTS5 backend.
//!
//! Provides a durable, append-only log of short text records with ranked
//! keyword search. When the SQLite build lacks FTS5 the store degrades at
//! startup to a plain two-column table, and searches fall back to substring
//! matching ordered by recency.
//!
//! # Example
//!
//! ```ignore
//! use engram_store::MemoryStore;
//! use std::collections::BTreeMap;
//!
//! let store = MemoryStore::open(&db_path).await?;
//!
//! let mut meta = BTreeMap::new();
//! meta.insert("type".to_string(), "manual_fact".to_string());
//! store.append("the deploy key rotates on Mondays", meta).await;
//!
//! for line in store.search("deploy", 10).await? {
//!     println!("{line}");
//! }
//! ```

mod error;
mod memory_store;
mod schema;

pub use error::{Error, Result};
pub use memory_store::{MemoryMeta, MemoryStore};
