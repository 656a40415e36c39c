//! Tool dispatch.
//!
//! [Dispatcher::dispatch] runs one [ToolCall] to completion and always
//! yields caller-facing text. Domain failures (remote errors, bad block
//! kinds, missing configuration) are reported inside that text so the
//! calling agent can read and react to them; they never escape as `Err`.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use engram_content::{page_blocks, section_blocks, BlockKind};
use engram_providers::{DocumentService, NotificationSink};
use engram_store::{MemoryMeta, MemoryStore};
use tracing::{debug, instrument};

use crate::call::{
    CreatePageArgs, DeleteBlockArgs, ListSubPagesArgs, LogToNotionArgs, QueryDatabaseArgs,
    ReadPageContentArgs, RecentMemoriesArgs, RememberFactArgs, SearchMemoryArgs, SendAlertArgs,
    ToolCall, UpdatePageArgs,
};

const SEARCH_LIMIT: usize = 10;
const AUDIT_PREVIEW_LEN: usize = 100;

/// Executes tool calls against the memory store and remote services.
pub struct Dispatcher {
    store: MemoryStore,
    docs: Arc<dyn DocumentService>,
    notifier: Option<Arc<dyn NotificationSink>>,
    default_page_id: Option<String>,
    max_block_len: usize,
}

impl Dispatcher {
    pub fn new(
        store: MemoryStore,
        docs: Arc<dyn DocumentService>,
        notifier: Option<Arc<dyn NotificationSink>>,
        default_page_id: Option<String>,
        max_block_len: usize,
    ) -> Self {
        Self {
            store,
            docs,
            notifier,
            default_page_id,
            max_block_len,
        }
    }

    /// Run a call and return its result text.
    #[instrument(skip(self, call), fields(tool = call.name()))]
    pub async fn dispatch(&self, call: ToolCall) -> String {
        debug!("dispatching tool call");
        match call {
            ToolCall::RememberFact(args) => self.remember_fact(args).await,
            ToolCall::SearchMemory(args) => self.search_memory(args).await,
            ToolCall::GetRecentMemories(args) => self.get_recent_memories(args).await,
            ToolCall::CreatePage(args) => self.create_page(args).await,
            ToolCall::UpdatePage(args) => self.update_page(args).await,
            ToolCall::LogToNotion(args) => self.log_to_notion(args).await,
            ToolCall::ListSubPages(args) => self.list_sub_pages(args).await,
            ToolCall::ReadPageContent(args) => self.read_page_content(args).await,
            ToolCall::ListDatabases => self.list_databases().await,
            ToolCall::QueryDatabase(args) => self.query_database(args).await,
            ToolCall::DeleteBlock(args) => self.delete_block(args).await,
            ToolCall::SendAlert(args) => self.send_alert(args).await,
        }
    }

    async fn remember_fact(&self, args: RememberFactArgs) -> String {
        let mut meta = MemoryMeta::new();
        meta.insert("type".to_string(), "manual_fact".to_string());
        meta.insert("timestamp".to_string(), now_rfc3339());
        self.store.append(&args.fact, meta).await;
        format!("Remembered: {}", args.fact)
    }

    async fn search_memory(&self, args: SearchMemoryArgs) -> String {
        match self.store.search(&args.query, SEARCH_LIMIT).await {
            Ok(lines) if lines.is_empty() => "No matching memories found.".to_string(),
            Ok(lines) => lines.join("\n"),
            Err(e) => format!("Error searching memory: {e}"),
        }
    }

    async fn get_recent_memories(&self, args: RecentMemoriesArgs) -> String {
        match self.store.recent(args.limit).await {
            Ok(lines) if lines.is_empty() => "No memories found.".to_string(),
            Ok(lines) => lines.join("\n"),
            Err(e) => format!("Error retrieving recent memories: {e}"),
        }
    }

    async fn create_page(&self, args: CreatePageArgs) -> String {
        let Some(parent_id) = args.parent_id.as_deref().or(self.default_page_id.as_deref())
        else {
            return "Error: No parent_id provided and NOTION_PAGE_ID not set. Please specify \
                    where to create this page."
                .to_string();
        };

        let children = page_blocks(&args.content, self.max_block_len);
        let result = self.docs.create_page(parent_id, &args.title, &children).await;

        // The audit record is written for failed attempts too, so later
        // memory searches surface what the agent tried to do.
        let mut meta = MemoryMeta::new();
        meta.insert("type".to_string(), "create_page".to_string());
        meta.insert("title".to_string(), args.title.clone());
        if let Ok(page) = &result {
            meta.insert("url".to_string(), page.url.clone());
        }
        meta.insert("timestamp".to_string(), now_rfc3339());
        let audit = format!(
            "Created Page: {}. Content snippet: {}",
            args.title,
            truncate_chars(&args.content, AUDIT_PREVIEW_LEN)
        );
        self.store.append(&audit, meta).await;

        match result {
            Ok(page) => format!("Successfully created page '{}'. URL: {}", args.title, page.url),
            Err(e) => format!("Error creating page: {e}"),
        }
    }

    async fn update_page(&self, args: UpdatePageArgs) -> String {
        let mut meta = MemoryMeta::new();
        meta.insert("type".to_string(), "update_page".to_string());
        meta.insert("page_id".to_string(), args.page_id.clone());
        meta.insert("section_title".to_string(), args.title.clone());
        meta.insert("timestamp".to_string(), now_rfc3339());
        let audit = format!(
            "Updated Page {} with section '{}'. Content: {}...",
            args.page_id,
            args.title,
            truncate_chars(&args.content, AUDIT_PREVIEW_LEN)
        );
        self.store.append(&audit, meta).await;

        let kind = match args.kind.parse::<BlockKind>() {
            Ok(kind) => kind,
            Err(e) => return format!("Error: {e}"),
        };
        let blocks = match section_blocks(
            &args.title,
            &args.content,
            kind,
            &args.language,
            self.max_block_len,
        ) {
            Ok(blocks) => blocks,
            Err(e) => return format!("Error: {e}"),
        };

        match self.docs.append_blocks(&args.page_id, &blocks).await {
            Ok(()) => format!("Successfully updated page {}: {}", args.page_id, args.title),
            Err(e) => format!("Error updating page: {e}"),
        }
    }

    async fn log_to_notion(&self, args: LogToNotionArgs) -> String {
        let Some(page_id) = args.page_id.or_else(|| self.default_page_id.clone()) else {
            return "Error: No page_id provided and NOTION_PAGE_ID not set.".to_string();
        };
        self.update_page(UpdatePageArgs {
            page_id,
            title: args.title,
            content: args.content,
            kind: args.kind,
            language: args.language,
        })
        .await
    }

    async fn list_sub_pages(&self, args: ListSubPagesArgs) -> String {
        let Some(parent_id) = args.parent_id.as_deref().or(self.default_page_id.as_deref())
        else {
            return "Error: NOTION_PAGE_ID not set and no parent_id provided.".to_string();
        };

        match self.docs.list_children(parent_id).await {
            Ok(blocks) => {
                let lines: Vec<String> = blocks
                    .iter()
                    .filter(|b| b.kind == "child_page")
                    .map(|b| {
                        let title = b.child_title.as_deref().unwrap_or("Untitled");
                        format!("- {} (ID: {})", title, b.id)
                    })
                    .collect();
                if lines.is_empty() {
                    "No sub-pages found.".to_string()
                } else {
                    lines.join("\n")
                }
            }
            Err(e) => format!("Error listing sub-pages: {e}"),
        }
    }

    async fn read_page_content(&self, args: ReadPageContentArgs) -> String {
        match self.docs.list_children(&args.page_id).await {
            Ok(blocks) => {
                let mut parts = Vec::new();
                for block in &blocks {
                    match block.kind.as_str() {
                        "paragraph" if !block.text.is_empty() => parts.push(block.text.clone()),
                        "heading_1" | "heading_2" | "heading_3" if !block.text.is_empty() => {
                            parts.push(format!(
                                "[{}] {}",
                                block.kind.to_uppercase(),
                                block.text
                            ));
                        }
                        "bulleted_list_item" if !block.text.is_empty() => {
                            parts.push(format!("- {}", block.text));
                        }
                        "code" => {
                            let language = block.language.as_deref().unwrap_or_default();
                            parts.push(format!("```{}\n{}\n```", language, block.text));
                        }
                        _ => {}
                    }
                }
                if parts.is_empty() {
                    "Page is empty or contains unsupported block types.".to_string()
                } else {
                    parts.join("\n\n")
                }
            }
            Err(e) => format!("Error reading page: {e}"),
        }
    }

    async fn list_databases(&self) -> String {
        match self.docs.list_databases().await {
            Ok(refs) if refs.is_empty() => "No databases found.".to_string(),
            Ok(refs) => refs
                .iter()
                .map(|r| format!("- {} (ID: {})", r.title, r.id))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => format!("Error listing databases: {e}"),
        }
    }

    async fn query_database(&self, args: QueryDatabaseArgs) -> String {
        match self
            .docs
            .query_database(&args.database_id, args.query_filter)
            .await
        {
            Ok(refs) if refs.is_empty() => "No pages found in database.".to_string(),
            Ok(refs) => refs
                .iter()
                .map(|r| format!("- {} (ID: {})", r.title, r.id))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => format!("Error querying database: {e}"),
        }
    }

    async fn delete_block(&self, args: DeleteBlockArgs) -> String {
        match self.docs.delete_block(&args.block_id).await {
            Ok(()) => format!("Successfully deleted block {}.", args.block_id),
            Err(e) => format!("Error deleting block: {e}"),
        }
    }

    async fn send_alert(&self, args: SendAlertArgs) -> String {
        let Some(notifier) = &self.notifier else {
            return "Error: Telegram credentials not set.".to_string();
        };
        match notifier.send(&args.message).await {
            Ok(()) => "Alert sent successfully.".to_string(),
            Err(e) => format!("Failed to send alert: {e}"),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_content::Block;
    use engram_providers::{BlockInfo, MockDocumentService, MockNotifier, ObjectRef, RecordedCall};
    use serde_json::json;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: MemoryStore,
        docs: Arc<MockDocumentService>,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::open(&dir.path().join("memory.db")).await.unwrap();
        let docs = Arc::new(MockDocumentService::new());
        Fixture {
            _dir: dir,
            store,
            docs,
        }
    }

    fn dispatcher(fx: &Fixture) -> Dispatcher {
        Dispatcher::new(
            fx.store.clone(),
            fx.docs.clone(),
            None,
            Some("default-page".to_string()),
            1800,
        )
    }

    fn dispatcher_no_default(fx: &Fixture) -> Dispatcher {
        Dispatcher::new(fx.store.clone(), fx.docs.clone(), None, None, 1800)
    }

    async fn call(d: &Dispatcher, name: &str, args: serde_json::Value) -> String {
        d.dispatch(ToolCall::parse(name, args).unwrap()).await
    }

    #[tokio::test]
    async fn test_remember_fact_and_recent() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "remember_fact", json!({ "fact": "the sky is blue" })).await;
        assert_eq!(out, "Remembered: the sky is blue");

        let recent = call(&d, "get_recent_memories", json!({})).await;
        assert_eq!(recent, "[manual_fact] the sky is blue");
    }

    #[tokio::test]
    async fn test_search_memory_empty() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "search_memory", json!({ "query": "nothing" })).await;
        assert_eq!(out, "No matching memories found.");
    }

    #[tokio::test]
    async fn test_search_memory_finds_fact() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        call(&d, "remember_fact", json!({ "fact": "deploys happen on friday" })).await;
        let out = call(&d, "search_memory", json!({ "query": "deploys" })).await;
        assert!(out.contains("deploys happen on friday"));
        assert!(out.starts_with('['));
    }

    #[tokio::test]
    async fn test_recent_memories_empty() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "get_recent_memories", json!({})).await;
        assert_eq!(out, "No memories found.");
    }

    #[tokio::test]
    async fn test_create_page_without_parent() {
        let fx = fixture().await;
        let d = dispatcher_no_default(&fx);
        let out = call(&d, "create_page", json!({ "title": "Notes" })).await;
        assert_eq!(
            out,
            "Error: No parent_id provided and NOTION_PAGE_ID not set. Please specify where to \
             create this page."
        );
        assert!(fx.docs.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_page_chunks_long_content() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let content = "a".repeat(5000);
        let out = call(&d, "create_page", json!({ "title": "Big", "content": content })).await;
        assert_eq!(
            out,
            "Successfully created page 'Big'. URL: https://notion.so/mock-page"
        );

        let calls = fx.docs.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            RecordedCall::CreatePage { parent_id, title, children } => {
                assert_eq!(parent_id, "default-page");
                assert_eq!(title, "Big");
                assert_eq!(children.len(), 3);
                assert!(children
                    .iter()
                    .all(|b| matches!(b, Block::Paragraph { .. })));
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_page_audit_record() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let content = "x".repeat(200);
        call(&d, "create_page", json!({ "title": "Audit", "content": content })).await;

        let recent = fx.store.recent(1).await.unwrap();
        let line = &recent[0];
        assert!(line.starts_with("[create_page]"));
        assert!(line.contains("Created Page: Audit. Content snippet: "));
        assert!(line.contains(&"x".repeat(100)));
        assert!(!line.contains(&"x".repeat(101)));
    }

    #[tokio::test]
    async fn test_create_page_failure_still_audits() {
        let fx = fixture().await;
        let docs = Arc::new(MockDocumentService::failing("503: down"));
        let d = Dispatcher::new(
            fx.store.clone(),
            docs,
            None,
            Some("default-page".to_string()),
            1800,
        );
        let out = call(&d, "create_page", json!({ "title": "T", "content": "c" })).await;
        assert_eq!(out, "Error creating page: service error: 503: down");

        let recent = fx.store.recent(1).await.unwrap();
        assert!(recent[0].starts_with("[create_page]"));
    }

    #[tokio::test]
    async fn test_update_page_success() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(
            &d,
            "update_page",
            json!({ "page_id": "p1", "title": "Status", "content": "all good" }),
        )
        .await;
        assert_eq!(out, "Successfully updated page p1: Status");

        let calls = fx.docs.calls();
        match &calls[0] {
            RecordedCall::AppendBlocks { block_id, children } => {
                assert_eq!(block_id, "p1");
                assert!(matches!(&children[0], Block::Heading { text } if text == "Status"));
                assert_eq!(children.len(), 2);
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_page_invalid_kind() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(
            &d,
            "update_page",
            json!({ "page_id": "p1", "title": "T", "content": "c", "type": "quote" }),
        )
        .await;
        assert_eq!(
            out,
            "Error: Invalid type 'quote'. Must be 'paragraph', 'bulleted_list_item', 'code', or \
             'table'."
        );
        assert!(fx.docs.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_page_unparseable_table() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(
            &d,
            "update_page",
            json!({ "page_id": "p1", "title": "T", "content": "|---|", "type": "table" }),
        )
        .await;
        assert_eq!(out, "Error: Could not parse table content.");
        assert!(fx.docs.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_page_audits_before_remote_failure() {
        let fx = fixture().await;
        let docs = Arc::new(MockDocumentService::failing("401: unauthorized"));
        let d = Dispatcher::new(fx.store.clone(), docs, None, None, 1800);
        let out = call(
            &d,
            "update_page",
            json!({ "page_id": "p9", "title": "Sec", "content": "body" }),
        )
        .await;
        assert_eq!(out, "Error updating page: service error: 401: unauthorized");

        let recent = fx.store.recent(1).await.unwrap();
        assert!(recent[0].starts_with("[update_page]"));
        assert!(recent[0].contains("Updated Page p9 with section 'Sec'. Content: body..."));
    }

    #[tokio::test]
    async fn test_log_to_notion_uses_default_page() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(
            &d,
            "log_to_notion",
            json!({ "title": "Log", "content": "entry" }),
        )
        .await;
        assert_eq!(out, "Successfully updated page default-page: Log");
    }

    #[tokio::test]
    async fn test_log_to_notion_without_target() {
        let fx = fixture().await;
        let d = dispatcher_no_default(&fx);
        let out = call(
            &d,
            "log_to_notion",
            json!({ "title": "Log", "content": "entry" }),
        )
        .await;
        assert_eq!(out, "Error: No page_id provided and NOTION_PAGE_ID not set.");
        assert!(fx.docs.calls().is_empty());
    }

    #[tokio::test]
    async fn test_list_sub_pages() {
        let fx = fixture().await;
        fx.docs.set_children(vec![
            BlockInfo {
                id: "c1".to_string(),
                kind: "child_page".to_string(),
                text: String::new(),
                language: None,
                child_title: Some("Meeting Notes".to_string()),
            },
            BlockInfo {
                id: "c2".to_string(),
                kind: "paragraph".to_string(),
                text: "not a page".to_string(),
                language: None,
                child_title: None,
            },
        ]);
        let d = dispatcher(&fx);
        let out = call(&d, "list_sub_pages", json!({})).await;
        assert_eq!(out, "- Meeting Notes (ID: c1)");
    }

    #[tokio::test]
    async fn test_list_sub_pages_empty() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "list_sub_pages", json!({})).await;
        assert_eq!(out, "No sub-pages found.");
    }

    #[tokio::test]
    async fn test_list_sub_pages_without_parent() {
        let fx = fixture().await;
        let d = dispatcher_no_default(&fx);
        let out = call(&d, "list_sub_pages", json!({})).await;
        assert_eq!(out, "Error: NOTION_PAGE_ID not set and no parent_id provided.");
    }

    #[tokio::test]
    async fn test_read_page_content_rendering() {
        let fx = fixture().await;
        fx.docs.set_children(vec![
            BlockInfo {
                id: "b1".to_string(),
                kind: "heading_2".to_string(),
                text: "Overview".to_string(),
                language: None,
                child_title: None,
            },
            BlockInfo {
                id: "b2".to_string(),
                kind: "paragraph".to_string(),
                text: "Plain text.".to_string(),
                language: None,
                child_title: None,
            },
            BlockInfo {
                id: "b3".to_string(),
                kind: "bulleted_list_item".to_string(),
                text: "item one".to_string(),
                language: None,
                child_title: None,
            },
            BlockInfo {
                id: "b4".to_string(),
                kind: "code".to_string(),
                text: "fn main() {}".to_string(),
                language: Some("rust".to_string()),
                child_title: None,
            },
            BlockInfo {
                id: "b5".to_string(),
                kind: "paragraph".to_string(),
                text: String::new(),
                language: None,
                child_title: None,
            },
        ]);
        let d = dispatcher(&fx);
        let out = call(&d, "read_page_content", json!({ "page_id": "p1" })).await;
        assert_eq!(
            out,
            "[HEADING_2] Overview\n\nPlain text.\n\n- item one\n\n```rust\nfn main() {}\n```"
        );
    }

    #[tokio::test]
    async fn test_read_page_content_empty() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "read_page_content", json!({ "page_id": "p1" })).await;
        assert_eq!(out, "Page is empty or contains unsupported block types.");
    }

    #[tokio::test]
    async fn test_list_databases() {
        let fx = fixture().await;
        fx.docs.set_databases(vec![ObjectRef {
            id: "db1".to_string(),
            title: "Tasks".to_string(),
        }]);
        let d = dispatcher(&fx);
        let out = call(&d, "list_databases", json!({})).await;
        assert_eq!(out, "- Tasks (ID: db1)");
    }

    #[tokio::test]
    async fn test_query_database_passes_filter() {
        let fx = fixture().await;
        fx.docs.set_items(vec![ObjectRef {
            id: "pg1".to_string(),
            title: "Task A".to_string(),
        }]);
        let d = dispatcher(&fx);
        let filter = json!({ "property": "Done", "checkbox": { "equals": false } });
        let out = call(
            &d,
            "query_database",
            json!({ "database_id": "db1", "query_filter": filter }),
        )
        .await;
        assert_eq!(out, "- Task A (ID: pg1)");

        match &fx.docs.calls()[0] {
            RecordedCall::QueryDatabase { database_id, filter } => {
                assert_eq!(database_id, "db1");
                assert!(filter.is_some());
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_query_database_empty() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "query_database", json!({ "database_id": "db1" })).await;
        assert_eq!(out, "No pages found in database.");
    }

    #[tokio::test]
    async fn test_delete_block() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "delete_block", json!({ "block_id": "b1" })).await;
        assert_eq!(out, "Successfully deleted block b1.");
    }

    #[tokio::test]
    async fn test_send_alert_without_credentials() {
        let fx = fixture().await;
        let d = dispatcher(&fx);
        let out = call(&d, "send_alert", json!({ "message": "ping" })).await;
        assert_eq!(out, "Error: Telegram credentials not set.");
    }

    #[tokio::test]
    async fn test_send_alert_success_and_failure() {
        let fx = fixture().await;
        let notifier = Arc::new(MockNotifier::new());
        let d = Dispatcher::new(
            fx.store.clone(),
            fx.docs.clone(),
            Some(notifier.clone()),
            None,
            1800,
        );
        let out = call(&d, "send_alert", json!({ "message": "deploy done" })).await;
        assert_eq!(out, "Alert sent successfully.");
        assert_eq!(notifier.messages(), vec!["deploy done".to_string()]);

        let failing = Arc::new(MockNotifier::failing("HTTP error! status: 404"));
        let d = Dispatcher::new(fx.store.clone(), fx.docs.clone(), Some(failing), None, 1800);
        let out = call(&d, "send_alert", json!({ "message": "ping" })).await;
        assert_eq!(out, "Failed to send alert: service error: HTTP error! status: 404");
    }
}
