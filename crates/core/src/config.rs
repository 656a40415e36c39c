//! Environment-driven configuration.
//!
//! All settings come from environment variables (optionally loaded from a
//! `.env` file by the binary before this module is consulted):
//!
//! - `NOTION_API_KEY`: document service credential
//! - `NOTION_PAGE_ID`: default parent/target page for page tools
//! - `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`: notification sink credentials
//! - `AGENT_MEMORY_PATH`: memory database location (supports a leading `~`)
//! - `ENGRAM_MAX_BLOCK_LEN`: per-block character budget (default 1800)

use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default per-block character budget.
///
/// The hosted document service rejects text runs over 2000 characters; 1800
/// leaves headroom for encoding overhead. Overridable via
/// `ENGRAM_MAX_BLOCK_LEN`.
pub const DEFAULT_MAX_BLOCK_LEN: usize = 1800;

/// Filename of the memory database.
pub const MEMORY_DB_FILE: &str = "agent_memory.db";

/// Runtime configuration for the tool server
#[derive(Debug, Clone)]
pub struct Config {
    /// Document service API credential (tools fail with a text error when absent)
    pub notion_api_key: Option<String>,
    /// Default parent/target page for page tools
    pub default_page_id: Option<String>,
    /// Notification sink bot token
    pub telegram_bot_token: Option<String>,
    /// Notification sink chat id
    pub telegram_chat_id: Option<String>,
    /// Location of the memory database
    pub memory_path: PathBuf,
    /// Per-block character budget for the synthesizer
    pub max_block_len: usize,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Only `ENGRAM_MAX_BLOCK_LEN` can fail (non-numeric value); every other
    /// setting is optional and degrades to a tool-level text error when a
    /// tool that needs it runs.
    pub fn from_env() -> Result<Self> {
        let max_block_len = match env::var("ENGRAM_MAX_BLOCK_LEN") {
            Ok(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| Error::config(format!("ENGRAM_MAX_BLOCK_LEN must be a positive integer, got '{raw}'")))?,
            Err(_) => DEFAULT_MAX_BLOCK_LEN,
        };

        Ok(Self {
            notion_api_key: non_empty_var("NOTION_API_KEY"),
            default_page_id: non_empty_var("NOTION_PAGE_ID"),
            telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
            memory_path: resolve_memory_path(),
            max_block_len,
        })
    }

    /// Ensure the memory database directory exists, returning the path to use.
    ///
    /// When the parent directory cannot be created (e.g. permission denied)
    /// the store falls back to a database file in the working directory, the
    /// same degradation the rest of the store applies to missing FTS support.
    pub fn prepare_memory_path(&self) -> PathBuf {
        if let Some(parent) = self.memory_path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("could not create database directory {}: {e}", parent.display());
            return PathBuf::from(MEMORY_DB_FILE);
        }
        self.memory_path.clone()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the memory database path from `AGENT_MEMORY_PATH` or the
/// platform default, expanding a leading `~`.
fn resolve_memory_path() -> PathBuf {
    match non_empty_var("AGENT_MEMORY_PATH") {
        Some(raw) => expand_tilde(&raw),
        None => default_memory_path(),
    }
}

fn expand_tilde(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        let rest = rest.trim_start_matches(['/', '\\']);
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Platform default: `~/.engram/data/agent_memory.db`, with the macOS
/// variant nested under `~/Library`.
fn default_memory_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let base = if cfg!(target_os = "macos") {
        home.join("Library").join(".engram").join("data")
    } else {
        home.join(".engram").join("data")
    };
    base.join(MEMORY_DB_FILE)
}
