//! JSON mapping between [Block] records and the Notion REST wire format.

use engram_content::Block;
use serde_json::{Value, json};

use crate::BlockInfo;

/// A rich-text array with a single text run.
fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

/// Render one block as a Notion block object.
///
/// Headings map to `heading_2` (section headings, not page titles); tables
/// carry their rows inline as `table_row` children.
pub fn block_to_json(block: &Block) -> Value {
    match block {
        Block::Heading { text } => json!({
            "object": "block",
            "type": "heading_2",
            "heading_2": { "rich_text": rich_text(text) }
        }),
        Block::Paragraph { text } => json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": rich_text(text) }
        }),
        Block::Bulleted { text } => json!({
            "object": "block",
            "type": "bulleted_list_item",
            "bulleted_list_item": { "rich_text": rich_text(text) }
        }),
        Block::Code { text, language } => json!({
            "object": "block",
            "type": "code",
            "code": { "rich_text": rich_text(text), "language": language }
        }),
        Block::Table(table) => {
            let children: Vec<Value> = table
                .rows
                .iter()
                .map(|row| {
                    let cells: Vec<Value> = row.iter().map(|cell| rich_text(cell)).collect();
                    json!({
                        "object": "block",
                        "type": "table_row",
                        "table_row": { "cells": cells }
                    })
                })
                .collect();
            json!({
                "object": "block",
                "type": "table",
                "table": {
                    "table_width": table.width,
                    "has_column_header": table.has_header,
                    "has_row_header": false,
                    "children": children
                }
            })
        }
    }
}

/// Render a block sequence as a `children` array.
pub fn children_to_json(blocks: &[Block]) -> Value {
    Value::Array(blocks.iter().map(block_to_json).collect())
}

/// Join the `plain_text` runs of a rich-text array.
pub fn join_plain_text(rich: &Value) -> String {
    rich.as_array()
        .map(|runs| {
            runs.iter()
                .filter_map(|run| run.get("plain_text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Extract the simplified [BlockInfo] view from one result object.
///
/// Only the `type` discriminator, the kind-specific `rich_text` runs, a
/// code block's `language`, and a child page's `title` are read.
pub fn block_info_from_json(value: &Value) -> Option<BlockInfo> {
    let id = value.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
    let kind = value.get("type").and_then(Value::as_str)?.to_string();
    let payload = value.get(kind.as_str());

    let text = payload
        .and_then(|p| p.get("rich_text"))
        .map(join_plain_text)
        .unwrap_or_default();
    let language = payload
        .and_then(|p| p.get("language"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let child_title = payload
        .and_then(|p| p.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(BlockInfo { id, kind, text, language, child_title })
}

/// Title of a database object: its top-level `title` rich-text array.
pub fn database_title(value: &Value) -> String {
    value.get("title").map(join_plain_text).unwrap_or_default()
}

/// Title of a page object: the joined runs of its first `title`-typed
/// property.
pub fn page_title(value: &Value) -> String {
    let Some(properties) = value.get("properties").and_then(Value::as_object) else {
        return String::new();
    };
    properties
        .values()
        .find_map(|prop| prop.get("title").filter(|t| t.is_array()))
        .map(join_plain_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_content::{Block, TableBlock};

    #[test]
    fn test_heading_maps_to_heading_2() {
        let v = block_to_json(&Block::Heading { text: "Section".to_string() });
        assert_eq!(v["type"], "heading_2");
        assert_eq!(v["heading_2"]["rich_text"][0]["text"]["content"], "Section");
    }

    #[test]
    fn test_code_block_carries_language() {
        let v = block_to_json(&Block::Code { text: "fn main() {}".to_string(), language: "rust".to_string() });
        assert_eq!(v["type"], "code");
        assert_eq!(v["code"]["language"], "rust");
        assert_eq!(v["code"]["rich_text"][0]["text"]["content"], "fn main() {}");
    }

    #[test]
    fn test_table_wire_shape() {
        let table = TableBlock {
            width: 2,
            has_header: true,
            rows: vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["1".to_string(), "2".to_string()],
            ],
        };
        let v = block_to_json(&Block::Table(table));
        assert_eq!(v["type"], "table");
        assert_eq!(v["table"]["table_width"], 2);
        assert_eq!(v["table"]["has_column_header"], true);
        assert_eq!(v["table"]["has_row_header"], false);
        let children = v["table"]["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["type"], "table_row");
        assert_eq!(children[1]["table_row"]["cells"][1][0]["text"]["content"], "2");
    }

    #[test]
    fn test_join_plain_text() {
        let rich = serde_json::json!([
            { "plain_text": "Hello " },
            { "plain_text": "world" }
        ]);
        assert_eq!(join_plain_text(&rich), "Hello world");
        assert_eq!(join_plain_text(&serde_json::Value::Null), "");
    }

    #[test]
    fn test_block_info_from_paragraph() {
        let v = serde_json::json!({
            "id": "blk-1",
            "type": "paragraph",
            "paragraph": { "rich_text": [{ "plain_text": "Hello world" }] }
        });
        let info = block_info_from_json(&v).unwrap();
        assert_eq!(info.kind, "paragraph");
        assert_eq!(info.text, "Hello world");
        assert!(info.language.is_none());
    }

    #[test]
    fn test_block_info_from_child_page() {
        let v = serde_json::json!({
            "id": "page-1",
            "type": "child_page",
            "child_page": { "title": "Roadmap" }
        });
        let info = block_info_from_json(&v).unwrap();
        assert_eq!(info.kind, "child_page");
        assert_eq!(info.child_title.as_deref(), Some("Roadmap"));
    }

    #[test]
    fn test_block_info_from_code() {
        let v = serde_json::json!({
            "id": "blk-2",
            "type": "code",
            "code": { "rich_text": [{ "plain_text": "x = 1" }], "language": "python" }
        });
        let info = block_info_from_json(&v).unwrap();
        assert_eq!(info.language.as_deref(), Some("python"));
        assert_eq!(info.text, "x = 1");
    }

    #[test]
    fn test_page_title_scans_properties() {
        let v = serde_json::json!({
            "id": "page-1",
            "properties": {
                "Status": { "select": { "name": "Done" } },
                "Name": { "id": "title", "title": [{ "plain_text": "Page Title" }] }
            }
        });
        assert_eq!(page_title(&v), "Page Title");
    }

    #[test]
    fn test_database_title() {
        let v = serde_json::json!({
            "id": "db-1",
            "title": [{ "plain_text": "My Database" }]
        });
        assert_eq!(database_title(&v), "My Database");
    }
}
