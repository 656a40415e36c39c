//! Remote service clients for the Engram tool server.
//!
//! Two narrow seams: [DocumentService] (the collaborative-document backend,
//! implemented against the Notion REST API) and [NotificationSink] (a
//! fire-and-forget push channel, implemented against the Telegram Bot API).
//! Both are trait objects so the tool layer can be exercised against the
//! in-memory [mock] implementations.

pub mod mock;
pub mod notion;
pub mod telegram;
pub mod wire;

use async_trait::async_trait;
use engram_content::Block;
use engram_core::Result;

/// Identity of a freshly created page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPage {
    pub id: String,
    pub url: String,
}

/// A simplified view of one remote block: the `type` discriminator, the
/// joined plain-text runs, and the two kind-specific fields the reader
/// cares about. Everything else on the wire is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub id: String,
    pub kind: String,
    pub text: String,
    /// Present only for code blocks
    pub language: Option<String>,
    /// Present only for child pages
    pub child_title: Option<String>,
}

/// An `{id, title}` descriptor for a database or a page inside one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub id: String,
    pub title: String,
}

/// The collaborative-document backend.
///
/// Writes submit [Block] sequences produced by `engram-content`; reads
/// return simplified descriptors. No retry, no queuing: a failed call is
/// reported to the caller as-is.
#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Create a page under `parent_id` with the given initial blocks.
    async fn create_page(&self, parent_id: &str, title: &str, children: &[Block]) -> Result<CreatedPage>;

    /// Append blocks to an existing page or block.
    async fn append_blocks(&self, block_id: &str, children: &[Block]) -> Result<()>;

    /// List the direct children of a page or block.
    async fn list_children(&self, block_id: &str) -> Result<Vec<BlockInfo>>;

    /// List databases visible to the integration.
    async fn list_databases(&self) -> Result<Vec<ObjectRef>>;

    /// Query a database, optionally with a backend-native filter object.
    async fn query_database(&self, database_id: &str, filter: Option<serde_json::Value>) -> Result<Vec<ObjectRef>>;

    /// Delete (archive) a block.
    async fn delete_block(&self, block_id: &str) -> Result<()>;
}

/// Fire-and-forget push notifications. No retry.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

pub use mock::{MockDocumentService, MockNotifier, RecordedCall};
pub use notion::NotionClient;
pub use telegram::TelegramNotifier;
