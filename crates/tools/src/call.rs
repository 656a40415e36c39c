//! The closed set of tool operations and their typed arguments.
//!
//! A flat name-to-handler table would accept any string; modelling the
//! surface as an enum instead gives compile-time coverage checking of the
//! dispatcher. Parsing an unknown name is the one hard (protocol-level)
//! failure in the system.

use engram_core::{Error, Result};
use serde::Deserialize;
use serde_json::Value;

use engram_content::DEFAULT_CODE_LANGUAGE;

fn default_recent_limit() -> usize {
    5
}

fn default_kind() -> String {
    "paragraph".to_string()
}

fn default_language() -> String {
    DEFAULT_CODE_LANGUAGE.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RememberFactArgs {
    pub fact: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchMemoryArgs {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentMemoriesArgs {
    #[serde(default = "default_recent_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageArgs {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePageArgs {
    pub page_id: String,
    pub title: String,
    pub content: String,
    /// Requested block kind; validated by the handler, not here, so the
    /// user-facing error can name the allowed set. Accepts the legacy
    /// argument name `type`.
    #[serde(default = "default_kind", alias = "type")]
    pub kind: String,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogToNotionArgs {
    pub title: String,
    pub content: String,
    #[serde(default = "default_kind", alias = "type")]
    pub kind: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub page_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSubPagesArgs {
    #[serde(default)]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadPageContentArgs {
    pub page_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryDatabaseArgs {
    pub database_id: String,
    #[serde(default)]
    pub query_filter: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteBlockArgs {
    pub block_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendAlertArgs {
    pub message: String,
}

/// One variant per exposed tool.
#[derive(Debug, Clone)]
pub enum ToolCall {
    RememberFact(RememberFactArgs),
    SearchMemory(SearchMemoryArgs),
    GetRecentMemories(RecentMemoriesArgs),
    CreatePage(CreatePageArgs),
    UpdatePage(UpdatePageArgs),
    LogToNotion(LogToNotionArgs),
    ListSubPages(ListSubPagesArgs),
    ReadPageContent(ReadPageContentArgs),
    ListDatabases,
    QueryDatabase(QueryDatabaseArgs),
    DeleteBlock(DeleteBlockArgs),
    SendAlert(SendAlertArgs),
}

impl ToolCall {
    /// Every exposed tool name, in presentation order.
    pub const NAMES: &[&str] = &[
        "remember_fact",
        "search_memory",
        "get_recent_memories",
        "create_page",
        "update_page",
        "log_to_notion",
        "list_sub_pages",
        "read_page_content",
        "list_databases",
        "query_database",
        "delete_block",
        "send_alert",
    ];

    /// Parse an operation name plus argument record into a typed call.
    ///
    /// Missing or ill-typed required arguments are a parse error; an
    /// unknown name is [Error::UnknownTool], the only failure that
    /// propagates to the protocol layer instead of becoming result text.
    pub fn parse(name: &str, args: Value) -> Result<Self> {
        match name {
            "remember_fact" => parse_args(name, args).map(Self::RememberFact),
            "search_memory" => parse_args(name, args).map(Self::SearchMemory),
            "get_recent_memories" => parse_args(name, args).map(Self::GetRecentMemories),
            "create_page" => parse_args(name, args).map(Self::CreatePage),
            "update_page" => parse_args(name, args).map(Self::UpdatePage),
            "log_to_notion" => parse_args(name, args).map(Self::LogToNotion),
            "list_sub_pages" => parse_args(name, args).map(Self::ListSubPages),
            "read_page_content" => parse_args(name, args).map(Self::ReadPageContent),
            "list_databases" => Ok(Self::ListDatabases),
            "query_database" => parse_args(name, args).map(Self::QueryDatabase),
            "delete_block" => parse_args(name, args).map(Self::DeleteBlock),
            "send_alert" => parse_args(name, args).map(Self::SendAlert),
            other => Err(Error::UnknownTool(other.to_string())),
        }
    }

    /// The wire name of this call.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RememberFact(_) => "remember_fact",
            Self::SearchMemory(_) => "search_memory",
            Self::GetRecentMemories(_) => "get_recent_memories",
            Self::CreatePage(_) => "create_page",
            Self::UpdatePage(_) => "update_page",
            Self::LogToNotion(_) => "log_to_notion",
            Self::ListSubPages(_) => "list_sub_pages",
            Self::ReadPageContent(_) => "read_page_content",
            Self::ListDatabases => "list_databases",
            Self::QueryDatabase(_) => "query_database",
            Self::DeleteBlock(_) => "delete_block",
            Self::SendAlert(_) => "send_alert",
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(name: &str, args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| Error::Parse(format!("invalid arguments for {name}: {e}")))
}
