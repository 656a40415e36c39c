//! Notion REST API client.

use engram_content::Block;
use engram_core::{Error, Result};
use reqwest::Client as HttpClient;
use serde_json::{Value, json};
use tracing::instrument;

use crate::wire;
use crate::{BlockInfo, CreatedPage, DocumentService, ObjectRef};

const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Document service backed by the Notion REST API.
///
/// One client is constructed at startup and shared for the process
/// lifetime. An absent API key is not an error here: requests simply fail
/// with the service's own authentication message, which the tool layer
/// reports as text.
pub struct NotionClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
}

impl NotionClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            client: HttpClient::new(),
            api_key: api_key.unwrap_or_default(),
            base_url,
        }
    }

    async fn request(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self
            .client
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Notion-Version", NOTION_VERSION);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::service(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::service(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::service(api_message(status, &text)));
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::service(format!("malformed response from {url}: {e}")))
    }

    fn results(value: &Value) -> Vec<Value> {
        value
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}

/// Prefer the API's own `message` field; fall back to the raw body.
fn api_message(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("{status}: {detail}")
    }
}

#[async_trait::async_trait]
impl DocumentService for NotionClient {
    #[instrument(skip(self, children), fields(blocks = children.len()))]
    async fn create_page(&self, parent_id: &str, title: &str, children: &[Block]) -> Result<CreatedPage> {
        let body = json!({
            "parent": { "page_id": parent_id },
            "properties": {
                "title": [{ "text": { "content": title } }]
            },
            "children": wire::children_to_json(children)
        });
        let response = self.request(reqwest::Method::POST, "/pages", Some(body)).await?;

        Ok(CreatedPage {
            id: response.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
            url: response
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or("URL not found")
                .to_string(),
        })
    }

    #[instrument(skip(self, children), fields(blocks = children.len()))]
    async fn append_blocks(&self, block_id: &str, children: &[Block]) -> Result<()> {
        let body = json!({ "children": wire::children_to_json(children) });
        self.request(reqwest::Method::PATCH, &format!("/blocks/{block_id}/children"), Some(body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_children(&self, block_id: &str) -> Result<Vec<BlockInfo>> {
        let response = self
            .request(reqwest::Method::GET, &format!("/blocks/{block_id}/children"), None)
            .await?;
        Ok(Self::results(&response)
            .iter()
            .filter_map(wire::block_info_from_json)
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_databases(&self) -> Result<Vec<ObjectRef>> {
        let body = json!({
            "filter": { "property": "object", "value": "database" }
        });
        let response = self.request(reqwest::Method::POST, "/search", Some(body)).await?;
        Ok(Self::results(&response)
            .iter()
            .filter(|v| v.get("object").and_then(Value::as_str) == Some("database"))
            .map(|v| ObjectRef {
                id: v.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
                title: wire::database_title(v),
            })
            .collect())
    }

    #[instrument(skip(self, filter))]
    async fn query_database(&self, database_id: &str, filter: Option<Value>) -> Result<Vec<ObjectRef>> {
        let body = match filter {
            Some(filter) => json!({ "filter": filter }),
            None => json!({}),
        };
        let response = self
            .request(reqwest::Method::POST, &format!("/databases/{database_id}/query"), Some(body))
            .await?;
        Ok(Self::results(&response)
            .iter()
            .map(|v| ObjectRef {
                id: v.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
                title: wire::page_title(v),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete_block(&self, block_id: &str) -> Result<()> {
        self.request(reqwest::Method::DELETE, &format!("/blocks/{block_id}"), None)
            .await?;
        Ok(())
    }
}
