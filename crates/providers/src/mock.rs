//! In-memory test doubles for the remote service seams.
//!
//! The mocks record every call so tests can assert on exactly what would
//! have gone over the wire, and can be armed to fail to exercise the
//! error-reporting paths.

use std::sync::Mutex;

use engram_content::Block;
use engram_core::{Error, Result};
use serde_json::Value;

use crate::{BlockInfo, CreatedPage, DocumentService, NotificationSink, ObjectRef};

/// One recorded document-service invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    CreatePage { parent_id: String, title: String, children: Vec<Block> },
    AppendBlocks { block_id: String, children: Vec<Block> },
    ListChildren { block_id: String },
    ListDatabases,
    QueryDatabase { database_id: String, filter: Option<Value> },
    DeleteBlock { block_id: String },
}

/// Document service double: canned responses, recorded calls.
#[derive(Debug, Default)]
pub struct MockDocumentService {
    calls: Mutex<Vec<RecordedCall>>,
    /// When set, every call fails with this message
    fail_with: Option<String>,
    created: Mutex<Option<CreatedPage>>,
    children: Mutex<Vec<BlockInfo>>,
    databases: Mutex<Vec<ObjectRef>>,
    items: Mutex<Vec<ObjectRef>>,
}

impl MockDocumentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { fail_with: Some(message.into()), ..Self::default() }
    }

    pub fn set_created(&self, page: CreatedPage) {
        if let Ok(mut created) = self.created.lock() {
            *created = Some(page);
        }
    }

    pub fn set_children(&self, children: Vec<BlockInfo>) {
        if let Ok(mut slot) = self.children.lock() {
            *slot = children;
        }
    }

    pub fn set_databases(&self, databases: Vec<ObjectRef>) {
        if let Ok(mut slot) = self.databases.lock() {
            *slot = databases;
        }
    }

    pub fn set_items(&self, items: Vec<ObjectRef>) {
        if let Ok(mut slot) = self.items.lock() {
            *slot = items;
        }
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match &self.fail_with {
            Some(message) => Err(Error::service(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl DocumentService for MockDocumentService {
    async fn create_page(&self, parent_id: &str, title: &str, children: &[Block]) -> Result<CreatedPage> {
        self.record(RecordedCall::CreatePage {
            parent_id: parent_id.to_string(),
            title: title.to_string(),
            children: children.to_vec(),
        })?;
        let canned = self.created.lock().map(|c| c.clone()).unwrap_or_default();
        Ok(canned.unwrap_or(CreatedPage {
            id: "mock-page-id".to_string(),
            url: "https://notion.so/mock-page".to_string(),
        }))
    }

    async fn append_blocks(&self, block_id: &str, children: &[Block]) -> Result<()> {
        self.record(RecordedCall::AppendBlocks {
            block_id: block_id.to_string(),
            children: children.to_vec(),
        })
    }

    async fn list_children(&self, block_id: &str) -> Result<Vec<BlockInfo>> {
        self.record(RecordedCall::ListChildren { block_id: block_id.to_string() })?;
        Ok(self.children.lock().map(|c| c.clone()).unwrap_or_default())
    }

    async fn list_databases(&self) -> Result<Vec<ObjectRef>> {
        self.record(RecordedCall::ListDatabases)?;
        Ok(self.databases.lock().map(|d| d.clone()).unwrap_or_default())
    }

    async fn query_database(&self, database_id: &str, filter: Option<Value>) -> Result<Vec<ObjectRef>> {
        self.record(RecordedCall::QueryDatabase { database_id: database_id.to_string(), filter })?;
        Ok(self.items.lock().map(|i| i.clone()).unwrap_or_default())
    }

    async fn delete_block(&self, block_id: &str) -> Result<()> {
        self.record(RecordedCall::DeleteBlock { block_id: block_id.to_string() })
    }
}

/// Notification sink double.
#[derive(Debug, Default)]
pub struct MockNotifier {
    messages: Mutex<Vec<String>>,
    pub fail_with: Option<String>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { messages: Mutex::new(Vec::new()), fail_with: Some(message.into()) }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl NotificationSink for MockNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(text.to_string());
        }
        match &self.fail_with {
            Some(message) => Err(Error::service(message.clone())),
            None => Ok(()),
        }
    }
}
