//! Engram MCP server binary.
//!
//! Runs the tool server over stdio. All logging goes to stderr so it never
//! interferes with the protocol stream on stdout.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rmcp::ServiceExt;

use engram_core::Config;
use engram_mcp::EngramServer;
use engram_providers::{DocumentService, NotificationSink, NotionClient, TelegramNotifier};
use engram_store::MemoryStore;
use engram_tools::Dispatcher;

#[derive(Debug, Parser)]
#[command(name = "engram-mcp", about = "Agent memory and Notion tools over MCP")]
struct Args {
    /// Override the memory database path (otherwise AGENT_MEMORY_PATH or
    /// the platform default)
    #[arg(long)]
    memory_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    engram_core::logging::init()?;

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(path) = args.memory_path {
        config.memory_path = path;
    }

    let db_path = config.prepare_memory_path();
    tracing::info!("memory database at {}", db_path.display());
    let store = MemoryStore::open(&db_path).await?;

    let docs: Arc<dyn DocumentService> = Arc::new(NotionClient::new(config.notion_api_key.clone()));
    let notifier: Option<Arc<dyn NotificationSink>> =
        match (&config.telegram_bot_token, &config.telegram_chat_id) {
            (Some(token), Some(chat_id)) => {
                Some(Arc::new(TelegramNotifier::new(token.clone(), chat_id.clone())))
            }
            _ => None,
        };
    if notifier.is_none() {
        tracing::warn!("Telegram credentials not set; send_alert will report an error");
    }

    let dispatcher = Dispatcher::new(
        store,
        docs,
        notifier,
        config.default_page_id.clone(),
        config.max_block_len,
    );
    let server = EngramServer::new(dispatcher);

    tracing::info!("starting engram MCP server on stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("failed to start MCP service: {e}");
        })?;

    service.waiting().await?;

    tracing::info!("engram MCP server shutting down");
    Ok(())
}
