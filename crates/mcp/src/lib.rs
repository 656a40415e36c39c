//! Engram MCP server.
//!
//! Exposes the agent tool surface over the Model Context Protocol: memory
//! tools backed by the local SQLite store, page tools backed by Notion, and
//! a Telegram alert tool. Every tool returns plain text; domain failures
//! are reported inside that text, and only an unknown tool name or
//! unparseable arguments surface as protocol errors.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};
use serde_json::{Value, json};

use engram_core::Error;
use engram_tools::{Dispatcher, ToolCall};

/// MCP server wrapping the tool dispatcher.
#[derive(Clone)]
pub struct EngramServer {
    dispatcher: Arc<Dispatcher>,
}

impl std::fmt::Debug for EngramServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngramServer").finish_non_exhaustive()
    }
}

impl EngramServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}

fn tool(name: &'static str, title: &'static str, description: &'static str, schema: Value) -> Tool {
    let input_schema = match schema {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    };
    Tool {
        name: name.into(),
        title: Some(title.into()),
        description: Some(description.into()),
        input_schema,
        output_schema: None,
        annotations: None,
        icons: None,
        meta: None,
    }
}

/// The full tool surface, in presentation order.
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        tool(
            "remember_fact",
            "Remember Fact",
            "Stores a fact in the agent's internal SQLite memory.",
            json!({
                "type": "object",
                "properties": { "fact": { "type": "string" } },
                "required": ["fact"],
            }),
        ),
        tool(
            "search_memory",
            "Search Memory",
            "Searches the agent's internal memory for facts matching the query.",
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"],
            }),
        ),
        tool(
            "get_recent_memories",
            "Get Recent Memories",
            "Retrieves the most recent memories from the agent's internal database.",
            json!({
                "type": "object",
                "properties": { "limit": { "type": "integer", "default": 5 } },
            }),
        ),
        tool(
            "create_page",
            "Create Page",
            "Creates a new sub-page in Notion.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "content": { "type": "string" },
                    "parent_id": { "type": "string" },
                },
                "required": ["title"],
            }),
        ),
        tool(
            "update_page",
            "Update Page",
            "Appends content to a specific Notion page.",
            json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" },
                    "title": { "type": "string" },
                    "content": { "type": "string" },
                    "type": {
                        "type": "string",
                        "enum": ["paragraph", "bulleted_list_item", "code", "table"],
                        "default": "paragraph",
                    },
                    "language": { "type": "string", "default": "plain text" },
                },
                "required": ["page_id", "title", "content"],
            }),
        ),
        tool(
            "log_to_notion",
            "Log to Notion",
            "Logs an entry to a Notion page.",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "content": { "type": "string" },
                    "type": {
                        "type": "string",
                        "enum": ["paragraph", "bulleted_list_item", "code", "table"],
                        "default": "paragraph",
                    },
                    "language": { "type": "string", "default": "plain text" },
                    "page_id": { "type": "string" },
                },
                "required": ["title", "content"],
            }),
        ),
        tool(
            "list_sub_pages",
            "List Sub-pages",
            "Lists sub-pages under a parent page.",
            json!({
                "type": "object",
                "properties": { "parent_id": { "type": "string" } },
            }),
        ),
        tool(
            "read_page_content",
            "Read Page Content",
            "Reads the content of a Notion page and returns a simplified text representation.",
            json!({
                "type": "object",
                "properties": { "page_id": { "type": "string" } },
                "required": ["page_id"],
            }),
        ),
        tool(
            "list_databases",
            "List Databases",
            "Lists the Notion databases shared with the integration.",
            json!({
                "type": "object",
                "properties": {},
            }),
        ),
        tool(
            "query_database",
            "Query Database",
            "Queries a Notion database and returns the matching pages.",
            json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string" },
                    "query_filter": { "type": "object" },
                },
                "required": ["database_id"],
            }),
        ),
        tool(
            "delete_block",
            "Delete Block",
            "Deletes a Notion block or page by its identifier.",
            json!({
                "type": "object",
                "properties": { "block_id": { "type": "string" } },
                "required": ["block_id"],
            }),
        ),
        tool(
            "send_alert",
            "Send Alert",
            "Sends a push notification via Telegram.",
            json!({
                "type": "object",
                "properties": { "message": { "type": "string" } },
                "required": ["message"],
            }),
        ),
    ]
}

impl ServerHandler for EngramServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Engram gives the agent persistent memory and Notion access. Use the memory \
                tools (remember_fact, search_memory, get_recent_memories) for facts worth \
                keeping across sessions, the page tools to create, append to, and read Notion \
                pages, and send_alert to push a Telegram notification."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: tool_definitions(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = match request.arguments {
            Some(map) => Value::Object(map),
            None => json!({}),
        };
        let call = ToolCall::parse(&request.name, args).map_err(|e| match e {
            Error::UnknownTool(name) => {
                McpError::invalid_params(format!("Unknown tool: {name}"), None)
            }
            other => McpError::invalid_params(format!("Invalid parameters: {other}"), None),
        })?;
        let text = self.dispatcher.dispatch(call).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}
